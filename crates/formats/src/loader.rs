use std::fmt;

use scene::{Feature, FeatureKey, World};
use serde::Deserialize;
use tracing::{info, warn};

use crate::country_names::{CountryNames, CountryNamesError};
use crate::topology::{Topology, TopologyError};

/// Fixed correction applied to the third-party name table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamePatch {
    /// Data row index, header excluded.
    pub row: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub land_object: String,
    pub countries_object: String,
    pub name_patch: Option<NamePatch>,
    /// Country rendered with the pinned emphasis, matched by name.
    pub pinned_country: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            land_object: "land".to_string(),
            countries_object: "countries".to_string(),
            name_patch: Some(NamePatch {
                row: 110,
                name: "Palestine".to_string(),
            }),
            pinned_country: Some("Saudi Arabia".to_string()),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Topology(TopologyError),
    CountryNames(CountryNamesError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Topology(err) => write!(f, "world topology: {err}"),
            LoadError::CountryNames(err) => write!(f, "country names: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Topology(err) => Some(err),
            LoadError::CountryNames(err) => Some(err),
        }
    }
}

impl From<TopologyError> for LoadError {
    fn from(err: TopologyError) -> Self {
        LoadError::Topology(err)
    }
}

impl From<CountryNamesError> for LoadError {
    fn from(err: CountryNamesError) -> Self {
        LoadError::CountryNames(err)
    }
}

/// Everything the globe needs after startup.
#[derive(Debug)]
pub struct LoadedWorld {
    pub world: World,
    pub names: CountryNames,
    pub pinned: Option<FeatureKey>,
}

impl LoadedWorld {
    /// Label text for a country: the name table first, then the geometry's own
    /// name, then empty.
    pub fn display_name(&self, key: FeatureKey) -> &str {
        let Some(feature) = self.world.country(key) else {
            return "";
        };
        feature_name(feature, &self.names)
    }
}

pub fn feature_name<'a>(feature: &'a Feature, names: &'a CountryNames) -> &'a str {
    feature
        .id
        .and_then(|id| names.name(id))
        .or(feature.name.as_deref())
        .unwrap_or("")
}

/// First country, in feature order, whose id maps to `name` in the table.
pub fn resolve_pinned(world: &World, names: &CountryNames, name: &str) -> Option<FeatureKey> {
    names
        .rows()
        .iter()
        .filter_map(|row| row.id)
        .filter(|&id| names.name(id) == Some(name))
        .filter_map(|id| world.key_for_id(id))
        .min()
}

/// Decodes the world topology and the name table, applies the name patch and
/// resolves the pinned country.
pub fn load_world(
    topology_json: &str,
    names_tsv: &str,
    options: &LoadOptions,
) -> Result<LoadedWorld, LoadError> {
    let topology = Topology::from_json_str(topology_json)?;
    let land = topology.features(&options.land_object)?;
    let countries = topology.features(&options.countries_object)?;

    let mut names = CountryNames::from_tsv(names_tsv)?;
    if let Some(patch) = &options.name_patch {
        names.rename_row(patch.row, &patch.name)?;
    }

    let world = World::new(land, countries);
    let pinned = match &options.pinned_country {
        Some(name) => {
            let key = resolve_pinned(&world, &names, name);
            if key.is_none() {
                warn!(country = %name, "pinned country not found; nothing will be pinned");
            }
            key
        }
        None => None,
    };

    info!(
        countries = world.countries().len(),
        names = names.len(),
        pinned = pinned.is_some(),
        "world loaded"
    );

    Ok(LoadedWorld {
        world,
        names,
        pinned,
    })
}
