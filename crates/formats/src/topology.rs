use std::collections::BTreeMap;
use std::fmt;

use foundation::ids::FeatureId;
use foundation::math::LonLat;
use scene::{Feature, Geometry, Polygon, Ring};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Quantization transform: `position = quantized * scale + translate`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct TopoTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<TopoTransform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: BTreeMap<String, Value>,
}

#[derive(Debug)]
pub enum TopologyError {
    Parse(serde_json::Error),
    NotATopology { found: String },
    MissingObject(String),
    InvalidArc { index: usize, reason: String },
    InvalidGeometry {
        object: String,
        index: usize,
        reason: String,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::Parse(err) => write!(f, "topology parse error: {err}"),
            TopologyError::NotATopology { found } => {
                write!(f, "expected a Topology, found type {found:?}")
            }
            TopologyError::MissingObject(name) => write!(f, "topology has no object {name:?}"),
            TopologyError::InvalidArc { index, reason } => {
                write!(f, "invalid arc {index}: {reason}")
            }
            TopologyError::InvalidGeometry {
                object,
                index,
                reason,
            } => write!(f, "invalid geometry {index} in object {object:?}: {reason}"),
        }
    }
}

impl std::error::Error for TopologyError {}

/// A decoded TopoJSON topology: shared arcs in absolute lon/lat plus named objects.
#[derive(Debug, Clone)]
pub struct Topology {
    arcs: Vec<Vec<LonLat>>,
    objects: BTreeMap<String, Value>,
}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_str(payload).map_err(TopologyError::Parse)?;
        if raw.kind != "Topology" {
            return Err(TopologyError::NotATopology { found: raw.kind });
        }

        let mut arcs = Vec::with_capacity(raw.arcs.len());
        for (index, arc) in raw.arcs.iter().enumerate() {
            arcs.push(decode_arc(arc, raw.transform).map_err(|reason| TopologyError::InvalidArc {
                index,
                reason,
            })?);
        }

        Ok(Self {
            arcs,
            objects: raw.objects,
        })
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Converts a named object into features.
    ///
    /// A `GeometryCollection` yields one feature per member; any other object
    /// yields a single feature. Null or non-areal geometries become empty.
    pub fn features(&self, object: &str) -> Result<Vec<Feature>, TopologyError> {
        let value = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject(object.to_string()))?;

        let invalid = |index: usize, reason: String| TopologyError::InvalidGeometry {
            object: object.to_string(),
            index,
            reason,
        };

        if geometry_type(value) == Some("GeometryCollection") {
            let members = value
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid(0, "GeometryCollection missing geometries".to_string()))?;
            let mut features = Vec::with_capacity(members.len());
            for (index, member) in members.iter().enumerate() {
                features.push(self.feature(member).map_err(|reason| invalid(index, reason))?);
            }
            Ok(features)
        } else {
            Ok(vec![self.feature(value).map_err(|reason| invalid(0, reason))?])
        }
    }

    fn feature(&self, value: &Value) -> Result<Feature, String> {
        let obj = value
            .as_object()
            .ok_or("geometry must be an object".to_string())?;

        let id = match obj.get("id") {
            Some(Value::String(s)) => FeatureId::parse(s),
            Some(Value::Number(n)) => n.as_i64().map(FeatureId::new),
            _ => None,
        };
        let name = obj
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|props| props.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let geometry = match geometry_type(value) {
            Some("Polygon") => Geometry::Polygon(self.polygon(arcs_of(obj)?)?),
            Some("MultiPolygon") => {
                let parts = arcs_of(obj)?
                    .as_array()
                    .ok_or("MultiPolygon arcs must be an array of polygons".to_string())?;
                let mut polygons = Vec::with_capacity(parts.len());
                for part in parts {
                    polygons.push(self.polygon(part)?);
                }
                Geometry::MultiPolygon(polygons)
            }
            _ => Geometry::Empty,
        };

        Ok(Feature::new(id, name, geometry))
    }

    fn polygon(&self, rings: &Value) -> Result<Polygon, String> {
        let rings = rings
            .as_array()
            .ok_or("Polygon arcs must be an array of rings".to_string())?;
        let mut out = Vec::with_capacity(rings.len());
        for ring in rings {
            let indexes = ring
                .as_array()
                .ok_or("ring must be an array of arc indexes".to_string())?
                .iter()
                .map(|i| i.as_i64().ok_or("arc index must be an integer".to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(self.ring(&indexes)?);
        }
        Ok(Polygon::new(out))
    }

    /// Stitches arcs into a closed ring. Negative indexes (`!i`) walk arc `i`
    /// backwards; the joint point shared by consecutive arcs is kept once.
    fn ring(&self, indexes: &[i64]) -> Result<Ring, String> {
        let mut points: Ring = Vec::new();
        for &i in indexes {
            let (arc_index, reversed) = if i < 0 { (!i, true) } else { (i, false) };
            let arc = usize::try_from(arc_index)
                .ok()
                .and_then(|k| self.arcs.get(k))
                .ok_or_else(|| format!("arc index {i} out of range"))?;
            points.pop();
            if reversed {
                points.extend(arc.iter().rev().copied());
            } else {
                points.extend(arc.iter().copied());
            }
        }
        // Degenerate rings are padded so they remain valid closed rings.
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }
}

fn geometry_type(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn arcs_of(obj: &Map<String, Value>) -> Result<&Value, String> {
    obj.get("arcs").ok_or("geometry missing arcs".to_string())
}

fn decode_arc(arc: &[Vec<f64>], transform: Option<TopoTransform>) -> Result<Vec<LonLat>, String> {
    let mut out = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0.0, 0.0);
    for position in arc {
        if position.len() < 2 {
            return Err("position must have [x, y]".to_string());
        }
        match transform {
            Some(t) => {
                // Quantized arcs are delta-encoded.
                x += position[0];
                y += position[1];
                out.push(LonLat::new(
                    x * t.scale[0] + t.translate[0],
                    y * t.scale[1] + t.translate[1],
                ));
            }
            None => out.push(LonLat::new(position[0], position[1])),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{Topology, TopologyError};
    use foundation::ids::FeatureId;
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;
    use scene::Geometry;

    const SAMPLE: &str = include_str!("../../apps/globe_web/assets/sample-world.topo.json");

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    #[test]
    fn decodes_sample_objects() {
        let topo = Topology::from_json_str(SAMPLE).expect("parse topology");
        assert_eq!(topo.object_names().collect::<Vec<_>>(), vec!["countries", "land"]);
        assert_eq!(topo.arc_count(), 4);

        let countries = topo.features("countries").expect("countries");
        assert_eq!(countries.len(), 3);
        assert_eq!(countries[0].id, Some(FeatureId::new(818)));
        assert_eq!(countries[1].id, Some(FeatureId::new(682)));
        assert_eq!(countries[2].id, None);
        assert_eq!(countries[2].name.as_deref(), Some("Socotra"));

        let land = topo.features("land").expect("land");
        assert_eq!(land.len(), 1);
        assert!(matches!(land[0].geometry, Geometry::MultiPolygon(ref ps) if ps.len() == 2));
    }

    #[test]
    fn dequantizes_and_stitches_shared_arcs() {
        let topo = Topology::from_json_str(SAMPLE).expect("parse topology");
        let countries = topo.features("countries").expect("countries");

        // Both rings run clockwise; Egypt walks the shared border reversed.
        let cases = [
            (0, [(35.0, 15.0), (25.0, 15.0), (25.0, 30.0), (35.0, 30.0), (35.0, 15.0)]),
            (1, [(35.0, 15.0), (35.0, 30.0), (55.0, 30.0), (55.0, 15.0), (35.0, 15.0)]),
        ];
        for (index, expected) in cases {
            let Geometry::Polygon(poly) = &countries[index].geometry else {
                panic!("expected polygon");
            };
            let ring = &poly.rings[0];
            assert_eq!(ring.len(), expected.len());
            for (p, (lon, lat)) in ring.iter().zip(expected) {
                assert_close(p.lon_deg, lon);
                assert_close(p.lat_deg, lat);
            }
        }
        assert!(countries[1].contains(LonLat::new(45.0, 24.0)));
        assert!(!countries[0].contains(LonLat::new(45.0, 24.0)));
    }

    #[test]
    fn raw_arcs_without_transform() {
        let payload = r#"{
            "type": "Topology",
            "arcs": [[[0, 0], [10, 0], [10, 10], [0, 0]]],
            "objects": {
                "tri": {"type": "Polygon", "arcs": [[0]], "id": "7"},
                "dot": {"type": null}
            }
        }"#;
        let topo = Topology::from_json_str(payload).expect("parse topology");
        let tri = topo.features("tri").expect("tri");
        assert_eq!(tri[0].id, Some(FeatureId::new(7)));
        assert!(tri[0].contains(LonLat::new(6.0, 2.0)));
        let dot = topo.features("dot").expect("dot");
        assert!(dot[0].geometry.is_empty());
    }

    #[test]
    fn short_rings_are_padded() {
        let payload = r#"{
            "type": "Topology",
            "arcs": [[[1, 1], [2, 2]]],
            "objects": {"x": {"type": "Polygon", "arcs": [[0]]}}
        }"#;
        let topo = Topology::from_json_str(payload).expect("parse topology");
        let x = topo.features("x").expect("x");
        let Geometry::Polygon(poly) = &x[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(poly.rings[0].len(), 4);
        assert_eq!(poly.rings[0][3], LonLat::new(1.0, 1.0));
    }

    #[test]
    fn reports_bad_input() {
        assert!(matches!(
            Topology::from_json_str("{"),
            Err(TopologyError::Parse(_))
        ));
        assert!(matches!(
            Topology::from_json_str(r#"{"type": "FeatureCollection", "arcs": [], "objects": {}}"#),
            Err(TopologyError::NotATopology { .. })
        ));

        let topo = Topology::from_json_str(
            r#"{"type": "Topology", "arcs": [], "objects": {"x": {"type": "Polygon", "arcs": [[3]]}}}"#,
        )
        .expect("parse topology");
        assert!(matches!(
            topo.features("missing"),
            Err(TopologyError::MissingObject(_))
        ));
        assert!(matches!(
            topo.features("x"),
            Err(TopologyError::InvalidGeometry { index: 0, .. })
        ));
    }
}
