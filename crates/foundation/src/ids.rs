/// Numeric identifier shared by topology features and the country-name table.
///
/// Source data spells ids as zero-padded strings (`"004"`) or bare numbers, so
/// both parse to the same value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(i64);

impl FeatureId {
    pub fn new(n: i64) -> Self {
        FeatureId(n)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Parses an integer id, ignoring surrounding whitespace and leading zeros.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<i64>().ok().map(FeatureId)
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureId;

    #[test]
    fn zero_padded_and_bare_ids_match() {
        assert_eq!(FeatureId::parse("004"), Some(FeatureId::new(4)));
        assert_eq!(FeatureId::parse(" 682 "), Some(FeatureId::new(682)));
        assert_eq!(FeatureId::parse("-99"), Some(FeatureId::new(-99)));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(FeatureId::parse(""), None);
        assert_eq!(FeatureId::parse("XK"), None);
    }
}
