use formats::{LoadOptions, NamePatch};
use layers::{Palette, Rgb};
use scene::Rotation;
use serde::{Deserialize, Deserializer};

pub const WORLD_URL: &str = "https://unpkg.com/world-atlas@2.0.2/countries-110m.json";
pub const NAMES_URL: &str = "https://gist.githubusercontent.com/mbostock/4090846/raw/07e73f3c2d21558489604a0bc434b3a5cf41a867/world-country-names.tsv";

/// Initial rotation; `x` is longitude, `y` latitude, `z` roll.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Angles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Angles {
    fn default() -> Self {
        Self {
            x: -100.0,
            y: -20.0,
            z: 0.0,
        }
    }
}

impl From<Angles> for Rotation {
    fn from(a: Angles) -> Self {
        Rotation::new(a.x, a.y, a.z)
    }
}

/// Hex colors, e.g. `"#DBDBDB"`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Colors {
    #[serde(deserialize_with = "hex_color")]
    pub water: Rgb,
    #[serde(deserialize_with = "hex_color")]
    pub land: Rgb,
    #[serde(deserialize_with = "hex_color")]
    pub pinned: Rgb,
    #[serde(deserialize_with = "hex_color")]
    pub hover: Rgb,
    #[serde(deserialize_with = "hex_color")]
    pub highlight: Rgb,
    #[serde(deserialize_with = "hex_color")]
    pub label_hover: Rgb,
}

impl Default for Colors {
    fn default() -> Self {
        let p = Palette::default();
        Self {
            water: p.water,
            land: p.land,
            pinned: p.pinned,
            hover: p.hover,
            highlight: p.highlight,
            label_hover: p.label_hover,
        }
    }
}

impl From<Colors> for Palette {
    fn from(c: Colors) -> Self {
        Palette {
            water: c.water,
            land: c.land,
            pinned: c.pinned,
            hover: c.hover,
            highlight: c.highlight,
            label_hover: c.label_hover,
        }
    }
}

fn hex_color<'de, D>(deserializer: D) -> Result<Rgb, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Rgb::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid hex color {s:?}")))
}

/// Every tunable of the globe. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub world_url: String,
    pub names_url: String,
    /// Delay before auto-rotation resumes after a drag.
    pub rotation_delay_ms: f64,
    /// Canvas size relative to the viewport.
    pub scale_factor: f64,
    pub deg_per_sec: f64,
    /// Longest tick interval auto-rotation integrates.
    pub frame_budget_ms: f64,
    pub drag_sensitivity: f64,
    pub angles: Angles,
    pub colors: Colors,
    /// Length of each highlight phase.
    pub animation_duration_ms: f64,
    pub pinned_country: Option<String>,
    pub name_patch: Option<NamePatch>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            world_url: WORLD_URL.to_string(),
            names_url: NAMES_URL.to_string(),
            rotation_delay_ms: 0.0,
            scale_factor: 1.8,
            deg_per_sec: 6.0,
            frame_budget_ms: 100.0,
            drag_sensitivity: 0.25,
            angles: Angles::default(),
            colors: Colors::default(),
            animation_duration_ms: 2000.0,
            pinned_country: load.pinned_country,
            name_patch: load.name_patch,
        }
    }
}

impl GlobeConfig {
    /// Parses a JSON override; blank input yields the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    pub fn palette(&self) -> Palette {
        self.colors.into()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            pinned_country: self.pinned_country.clone(),
            name_patch: self.name_patch.clone(),
            ..LoadOptions::default()
        }
    }
}
