use std::collections::HashMap;

use foundation::ids::FeatureId;

use crate::features::Feature;

/// Stable identity of a country within one loaded [`World`].
///
/// Source features may lack an id, so identity is positional.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey(u32);

impl FeatureKey {
    pub fn new(index: u32) -> Self {
        FeatureKey(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Land mass and country features, indexed once at load time.
#[derive(Debug, Default)]
pub struct World {
    land: Vec<Feature>,
    countries: Vec<Feature>,
    by_id: HashMap<FeatureId, FeatureKey>,
}

impl World {
    pub fn new(land: Vec<Feature>, countries: Vec<Feature>) -> Self {
        let mut by_id = HashMap::with_capacity(countries.len());
        for (i, feature) in countries.iter().enumerate() {
            if let Some(id) = feature.id {
                // First occurrence wins, matching a front-to-back search.
                by_id.entry(id).or_insert(FeatureKey(i as u32));
            }
        }
        Self {
            land,
            countries,
            by_id,
        }
    }

    pub fn land(&self) -> &[Feature] {
        &self.land
    }

    pub fn countries(&self) -> &[Feature] {
        &self.countries
    }

    pub fn country(&self, key: FeatureKey) -> Option<&Feature> {
        self.countries.get(key.index() as usize)
    }

    pub fn key_for_id(&self, id: FeatureId) -> Option<FeatureKey> {
        self.by_id.get(&id).copied()
    }

    pub fn iter_countries(&self) -> impl Iterator<Item = (FeatureKey, &Feature)> {
        self.countries
            .iter()
            .enumerate()
            .map(|(i, f)| (FeatureKey(i as u32), f))
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureKey, World};
    use crate::features::{Feature, Geometry};
    use foundation::ids::FeatureId;

    fn country(id: Option<i64>) -> Feature {
        Feature::new(id.map(FeatureId::new), None, Geometry::Empty)
    }

    #[test]
    fn indexes_by_id_first_wins() {
        let world = World::new(
            Vec::new(),
            vec![country(Some(4)), country(None), country(Some(4)), country(Some(8))],
        );
        assert_eq!(world.key_for_id(FeatureId::new(4)), Some(FeatureKey::new(0)));
        assert_eq!(world.key_for_id(FeatureId::new(8)), Some(FeatureKey::new(3)));
        assert_eq!(world.key_for_id(FeatureId::new(99)), None);
        assert_eq!(world.iter_countries().count(), 4);
    }

    #[test]
    fn country_lookup_is_bounds_checked() {
        let world = World::new(Vec::new(), vec![country(Some(1))]);
        assert!(world.country(FeatureKey::new(0)).is_some());
        assert!(world.country(FeatureKey::new(1)).is_none());
    }
}
