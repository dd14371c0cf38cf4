use std::collections::HashMap;
use std::fmt;

use foundation::ids::FeatureId;

/// One data row of the country-name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRow {
    /// The id column as written in the source.
    pub raw_id: String,
    pub id: Option<FeatureId>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryNamesError {
    MissingHeader,
    MissingColumn(&'static str),
    RowOutOfRange { index: usize, len: usize },
}

impl fmt::Display for CountryNamesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryNamesError::MissingHeader => write!(f, "country-name table has no header row"),
            CountryNamesError::MissingColumn(col) => {
                write!(f, "country-name table has no {col:?} column")
            }
            CountryNamesError::RowOutOfRange { index, len } => {
                write!(f, "row {index} out of range (table has {len} rows)")
            }
        }
    }
}

impl std::error::Error for CountryNamesError {}

/// Country names keyed by numeric id, parsed from a tab-separated table.
#[derive(Debug, Clone, Default)]
pub struct CountryNames {
    rows: Vec<CountryRow>,
    by_id: HashMap<FeatureId, usize>,
}

impl CountryNames {
    /// Parses a TSV whose header names at least the `id` and `name` columns.
    /// Blank lines are skipped; surrounding double quotes are stripped.
    pub fn from_tsv(text: &str) -> Result<Self, CountryNamesError> {
        let mut lines = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty());

        let header: Vec<&str> = lines
            .next()
            .ok_or(CountryNamesError::MissingHeader)?
            .split('\t')
            .map(unquote)
            .collect();
        let column = |name: &'static str| {
            header
                .iter()
                .position(|h| *h == name)
                .ok_or(CountryNamesError::MissingColumn(name))
        };
        let id_col = column("id")?;
        let name_col = column("name")?;

        let rows = lines
            .map(|line| {
                let fields: Vec<&str> = line.split('\t').map(unquote).collect();
                let raw_id = fields.get(id_col).copied().unwrap_or_default().to_string();
                CountryRow {
                    id: FeatureId::parse(&raw_id),
                    raw_id,
                    name: fields.get(name_col).copied().unwrap_or_default().to_string(),
                }
            })
            .collect();

        Ok(Self::from_rows(rows))
    }

    pub fn from_rows(rows: Vec<CountryRow>) -> Self {
        let mut by_id = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if let Some(id) = row.id {
                by_id.entry(id).or_insert(i);
            }
        }
        Self { rows, by_id }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&CountryRow> {
        self.rows.get(index)
    }

    /// Name for `id`; the first row carrying that id wins.
    pub fn name(&self, id: FeatureId) -> Option<&str> {
        self.by_id
            .get(&id)
            .map(|&i| self.rows[i].name.as_str())
    }

    /// Overwrites the name in data row `index` (0-based, header excluded).
    pub fn rename_row(&mut self, index: usize, name: &str) -> Result<(), CountryNamesError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(CountryNamesError::RowOutOfRange { index, len })?;
        row.name = name.to_string();
        Ok(())
    }
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::{CountryNames, CountryNamesError};
    use foundation::ids::FeatureId;

    #[test]
    fn parses_header_and_rows() {
        let names = CountryNames::from_tsv("id\tname\n004\tAfghanistan\r\n\n8\t\"Albania\"\n")
            .expect("parse");
        assert_eq!(names.len(), 2);
        assert_eq!(names.name(FeatureId::new(4)), Some("Afghanistan"));
        assert_eq!(names.name(FeatureId::new(8)), Some("Albania"));
        assert_eq!(names.row(0).map(|r| r.raw_id.as_str()), Some("004"));
    }

    #[test]
    fn column_order_comes_from_header() {
        let names = CountryNames::from_tsv("name\tid\nFiji\t242\n").expect("parse");
        assert_eq!(names.name(FeatureId::new(242)), Some("Fiji"));
    }

    #[test]
    fn duplicate_ids_keep_first_row() {
        let names = CountryNames::from_tsv("id\tname\n10\tFirst\n10\tSecond\n").expect("parse");
        assert_eq!(names.name(FeatureId::new(10)), Some("First"));
    }

    #[test]
    fn rename_row_is_bounds_checked() {
        let mut names = CountryNames::from_tsv("id\tname\n1\tA\n").expect("parse");
        names.rename_row(0, "B").expect("rename");
        assert_eq!(names.name(FeatureId::new(1)), Some("B"));
        assert_eq!(
            names.rename_row(5, "C"),
            Err(CountryNamesError::RowOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn header_problems_are_errors() {
        assert_eq!(
            CountryNames::from_tsv("").unwrap_err(),
            CountryNamesError::MissingHeader
        );
        assert_eq!(
            CountryNames::from_tsv("id\tlabel\n1\tA\n").unwrap_err(),
            CountryNamesError::MissingColumn("name")
        );
    }
}
