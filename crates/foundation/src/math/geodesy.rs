use super::Vec3;

/// Geographic position on the unit sphere, in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }

    /// Unit vector with +x at (0°, 0°), +y at (90°E, 0°) and +z at the north pole.
    pub fn to_unit(self) -> Vec3 {
        let lon = self.lon_deg.to_radians();
        let lat = self.lat_deg.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    pub fn from_unit(v: Vec3) -> Self {
        let lat = v.z.clamp(-1.0, 1.0).asin();
        let lon = v.y.atan2(v.x);
        Self::new(lon.to_degrees(), lat.to_degrees())
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

/// Wraps a longitude into `[-180, 180)`.
pub fn wrap_lon_deg(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}
