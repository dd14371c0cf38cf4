use foundation::bounds::Aabb2;
use foundation::ids::FeatureId;
use foundation::math::LonLat;

/// A closed ring of positions; the last point repeats the first.
pub type Ring = Vec<LonLat>;

/// One exterior ring followed by zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Even-odd containment over all rings, so points inside a hole are outside.
    pub fn contains(&self, p: LonLat) -> bool {
        self.rings
            .iter()
            .filter(|ring| ring_contains(ring, p))
            .count()
            % 2
            == 1
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Geometry {
    #[default]
    Empty,
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Empty => &[],
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons().iter().all(|p| p.rings.is_empty())
    }
}

/// A named area loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<FeatureId>,
    /// Name carried by the geometry source itself, if any.
    pub name: Option<String>,
    pub geometry: Geometry,
    bounds: Aabb2,
}

impl Feature {
    pub fn new(id: Option<FeatureId>, name: Option<String>, geometry: Geometry) -> Self {
        let mut bounds = Aabb2::empty();
        for polygon in geometry.polygons() {
            for p in polygon.rings.iter().flatten() {
                bounds.extend([p.lon_deg, p.lat_deg]);
            }
        }
        Self {
            id,
            name,
            geometry,
            bounds,
        }
    }

    /// Lon/lat bounding box of every ring.
    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    pub fn contains(&self, p: LonLat) -> bool {
        if !p.is_finite() || !self.bounds.contains([p.lon_deg, p.lat_deg]) {
            return false;
        }
        self.geometry.polygons().iter().any(|poly| poly.contains(p))
    }
}

/// Planar crossing test on raw lon/lat coordinates.
pub fn ring_contains(ring: &[LonLat], p: LonLat) -> bool {
    let Some(last) = ring.last() else {
        return false;
    };
    let (x, y) = (p.lon_deg, p.lat_deg);
    let (mut x0, mut y0) = (last.lon_deg, last.lat_deg);
    let mut inside = false;
    for q in ring {
        let (x1, y1) = (q.lon_deg, q.lat_deg);
        if ((y1 > y) != (y0 > y)) && (x < (x0 - x1) * (y - y1) / (y0 - y1) + x1) {
            inside = !inside;
        }
        x0 = x1;
        y0 = y1;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::{Feature, Geometry, Polygon, ring_contains};
    use foundation::ids::FeatureId;
    use foundation::math::LonLat;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(x0, y0),
            LonLat::new(x1, y0),
            LonLat::new(x1, y1),
            LonLat::new(x0, y1),
            LonLat::new(x0, y0),
        ]
    }

    #[test]
    fn ring_contains_interior_only() {
        let ring = square(0.0, 0.0, 10.0, 10.0);
        assert!(ring_contains(&ring, LonLat::new(5.0, 5.0)));
        assert!(!ring_contains(&ring, LonLat::new(15.0, 5.0)));
        assert!(!ring_contains(&ring, LonLat::new(f64::NAN, 5.0)));
        assert!(!ring_contains(&[], LonLat::new(5.0, 5.0)));
    }

    #[test]
    fn holes_are_excluded() {
        let poly = Polygon::new(vec![
            square(0.0, 0.0, 10.0, 10.0),
            square(4.0, 4.0, 6.0, 6.0),
        ]);
        assert!(poly.contains(LonLat::new(1.0, 1.0)));
        assert!(!poly.contains(LonLat::new(5.0, 5.0)));
    }

    #[test]
    fn feature_checks_every_part_of_a_multipolygon() {
        let feature = Feature::new(
            Some(FeatureId::new(1)),
            None,
            Geometry::MultiPolygon(vec![
                Polygon::new(vec![square(0.0, 0.0, 1.0, 1.0)]),
                Polygon::new(vec![square(20.0, 20.0, 21.0, 21.0)]),
            ]),
        );
        assert!(feature.contains(LonLat::new(20.5, 20.5)));
        assert!(!feature.contains(LonLat::new(10.0, 10.0)));
        assert_eq!(feature.bounds().min, [0.0, 0.0]);
        assert_eq!(feature.bounds().max, [21.0, 21.0]);
    }

    #[test]
    fn empty_geometry_contains_nothing() {
        let feature = Feature::new(None, None, Geometry::Empty);
        assert!(feature.geometry.is_empty());
        assert!(!feature.contains(LonLat::new(0.0, 0.0)));
    }
}
