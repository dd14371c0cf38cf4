use std::fmt;

/// Opaque 8-bit sRGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize, w: usize| u8::from_str_radix(hex.get(i..i + w)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            3 => {
                let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }

    /// Per-channel linear blend, rounded to the nearest integer.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fill color plus global alpha.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FillStyle {
    pub color: Rgb,
    pub alpha: f64,
}

impl FillStyle {
    pub const fn new(color: Rgb, alpha: f64) -> Self {
        Self { color, alpha }
    }

    pub const fn opaque(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }
}

/// Colors used by the renderer and the highlight animation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub water: Rgb,
    pub land: Rgb,
    pub pinned: Rgb,
    pub hover: Rgb,
    pub highlight: Rgb,
    /// Label color while a non-pinned country is hovered.
    pub label_hover: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            water: Rgb::new(0xF2, 0xF5, 0xF6),
            land: Rgb::new(0xDB, 0xDB, 0xDB),
            pinned: Rgb::new(0x1A, 0x7F, 0x4B),
            hover: Rgb::new(0x9A, 0xA5, 0xAB),
            highlight: Rgb::new(0x4A, 0x90, 0xD9),
            label_hover: Rgb::WHITE,
        }
    }
}
