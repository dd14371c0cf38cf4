use foundation::math::{LonLat, Vec3, wrap_lon_deg};

/// Three-axis globe rotation in degrees: longitude (λ), latitude (φ) and roll (γ).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub roll_deg: f64,
}

impl Rotation {
    pub fn new(lon_deg: f64, lat_deg: f64, roll_deg: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            roll_deg,
        }
    }
}

/// Orthographic globe projection.
///
/// Points are rotated first around the polar axis by λ, then by φ and γ, so a
/// rotation of `(-λ, -φ, 0)` centers the view on `(λ, φ)`. Screen y grows
/// downwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orthographic {
    rotation: Rotation,
    scale: f64,
    translate: [f64; 2],
    // Cached trig of the current rotation.
    sin_phi: f64,
    cos_phi: f64,
    sin_gamma: f64,
    cos_gamma: f64,
}

impl Default for Orthographic {
    fn default() -> Self {
        let mut projection = Self {
            rotation: Rotation::default(),
            scale: 250.0,
            translate: [480.0, 250.0],
            sin_phi: 0.0,
            cos_phi: 1.0,
            sin_gamma: 0.0,
            cos_gamma: 1.0,
        };
        projection.set_rotation(Rotation::default());
        projection
    }
}

impl Orthographic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_angles(&mut self, lon_deg: f64, lat_deg: f64, roll_deg: f64) {
        self.set_rotation(Rotation::new(lon_deg, lat_deg, roll_deg));
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = Rotation::new(
            rotation.lon_deg % 360.0,
            rotation.lat_deg % 360.0,
            rotation.roll_deg % 360.0,
        );
        let (sin_phi, cos_phi) = self.rotation.lat_deg.to_radians().sin_cos();
        let (sin_gamma, cos_gamma) = self.rotation.roll_deg.to_radians().sin_cos();
        self.sin_phi = sin_phi;
        self.cos_phi = cos_phi;
        self.sin_gamma = sin_gamma;
        self.cos_gamma = cos_gamma;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Fits the globe to a `width × height` surface: radius is half the minor
    /// dimension and the center sits in the middle.
    pub fn scale_to(&mut self, width: f64, height: f64) {
        self.scale = width.min(height) / 2.0;
        self.translate = [width / 2.0, height / 2.0];
    }

    /// Globe radius in pixels.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Screen position of the globe center.
    pub fn translate(&self) -> [f64; 2] {
        self.translate
    }

    /// Rotates a position into view space; `x > 0` faces the viewer, `y` is
    /// screen-right and `z` is screen-up.
    pub fn rotate(&self, p: LonLat) -> Vec3 {
        let v = LonLat::new(p.lon_deg + self.rotation.lon_deg, p.lat_deg).to_unit();
        let k = v.z * self.cos_phi + v.x * self.sin_phi;
        Vec3::new(
            v.x * self.cos_phi - v.z * self.sin_phi,
            v.y * self.cos_gamma - k * self.sin_gamma,
            k * self.cos_gamma + v.y * self.sin_gamma,
        )
    }

    /// Inverse of [`Orthographic::rotate`] for unit vectors.
    pub fn unrotate(&self, v: Vec3) -> LonLat {
        let k = v.z * self.cos_gamma - v.y * self.sin_gamma;
        let u = Vec3::new(
            v.x * self.cos_phi + k * self.sin_phi,
            v.y * self.cos_gamma + v.z * self.sin_gamma,
            k * self.cos_phi - v.x * self.sin_phi,
        );
        let p = LonLat::from_unit(u);
        LonLat::new(wrap_lon_deg(p.lon_deg - self.rotation.lon_deg), p.lat_deg)
    }

    /// Screen position of a view-space vector (depth is ignored).
    pub fn to_screen(&self, v: Vec3) -> [f64; 2] {
        [
            self.translate[0] + self.scale * v.y,
            self.translate[1] - self.scale * v.z,
        ]
    }

    /// Projects a position on the visible hemisphere; back-facing points yield `None`.
    pub fn project(&self, p: LonLat) -> Option<[f64; 2]> {
        let v = self.rotate(p);
        (v.x >= 0.0).then(|| self.to_screen(v))
    }

    /// Screen point to lon/lat. Points off the globe disk have no inverse.
    pub fn invert(&self, point: [f64; 2]) -> Option<LonLat> {
        if self.scale <= 0.0 {
            return None;
        }
        let sy = (point[0] - self.translate[0]) / self.scale;
        let sz = (self.translate[1] - point[1]) / self.scale;
        let r2 = sy * sy + sz * sz;
        if !r2.is_finite() || r2 > 1.0 {
            return None;
        }
        let sx = (1.0 - r2).max(0.0).sqrt();
        Some(self.unrotate(Vec3::new(sx, sy, sz)))
    }
}
