//! Screen-space paths for features on an orthographic globe.
//!
//! Rings follow the clockwise-exterior convention of world-atlas data: seen
//! from outside the sphere, a polygon's interior lies to the right of each
//! ring. Rings are rotated into view space and cut at the horizon (`x = 0`);
//! the visible pieces are rejoined by walking the limb clockwise from each
//! exit to the next entry. Output rings keep their orientation, so holes come
//! out under a nonzero fill.

use std::f64::consts::TAU;

use foundation::math::{LonLat, Vec3};
use scene::{Feature, Orthographic, Polygon};

/// Angular step between sampled limb points.
const LIMB_STEP_RAD: f64 = std::f64::consts::PI / 36.0;

/// Samples in a full limb circle.
const LIMB_SAMPLES: usize = 72;

pub type ScreenRing = Vec<[f64; 2]>;

/// Visible run of a ring, from a horizon entry to a horizon exit.
#[derive(Debug, Clone)]
struct Segment {
    points: Vec<Vec3>,
    entry: f64,
    exit: f64,
}

/// How one rotated ring meets the visible hemisphere.
#[derive(Debug)]
enum Cut {
    Front(Vec<Vec3>),
    Back(Vec<Vec3>),
    Crossing(Vec<Segment>),
}

/// All visible rings of `features`, flattened for a single fill.
pub fn project_features<'a, I>(projection: &Orthographic, features: I) -> Vec<ScreenRing>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let mut rings = Vec::new();
    for feature in features {
        for polygon in feature.geometry.polygons() {
            rings.extend(project_polygon(projection, polygon));
        }
    }
    rings
}

/// Clips one polygon to the visible hemisphere and projects it. A polygon
/// whose interior covers the whole limb yields the full disc outline.
pub fn project_polygon(projection: &Orthographic, polygon: &Polygon) -> Vec<ScreenRing> {
    clip_polygon(projection, polygon)
        .into_iter()
        .filter(|ring| ring.len() >= 3)
        .map(|ring| ring.into_iter().map(|v| projection.to_screen(v)).collect())
        .collect()
}

fn clip_polygon(projection: &Orthographic, polygon: &Polygon) -> Vec<Vec<Vec3>> {
    let mut front = Vec::new();
    let mut segments = Vec::new();
    let mut cut_any = false;
    let mut limb_inside = true;

    for ring in &polygon.rings {
        let mut points: Vec<Vec3> = ring.iter().map(|&p| projection.rotate(p)).collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            continue;
        }
        cut_any = true;
        match cut_ring(&points) {
            Cut::Front(points) => {
                limb_inside &= signed_area(&points) > 0.0;
                front.push(points);
            }
            // Seen through the sphere the winding flips.
            Cut::Back(points) => limb_inside &= signed_area(&points) < 0.0,
            Cut::Crossing(mut pieces) => segments.append(&mut pieces),
        }
    }

    let mut out = if segments.is_empty() {
        let mut out = Vec::new();
        if cut_any && limb_inside {
            out.push(limb_circle());
        }
        out
    } else {
        rejoin(segments)
    };
    out.append(&mut front);
    out
}

fn cut_ring(points: &[Vec3]) -> Cut {
    let n = points.len();
    let visible = |v: &Vec3| v.x >= 0.0;
    let Some(start) = (0..n).find(|&i| !visible(&points[i]) && visible(&points[(i + 1) % n])) else {
        return if visible(&points[0]) {
            Cut::Front(points.to_vec())
        } else {
            Cut::Back(points.to_vec())
        };
    };

    let mut segments = Vec::new();
    let mut current: Vec<Vec3> = Vec::new();
    for k in 0..n {
        let cur = points[(start + k) % n];
        let next = points[(start + k + 1) % n];
        match (visible(&cur), visible(&next)) {
            (false, true) => {
                current = vec![horizon_crossing(cur, next), next];
            }
            (true, true) => current.push(next),
            (true, false) => {
                current.push(horizon_crossing(cur, next));
                let points = std::mem::take(&mut current);
                segments.push(Segment {
                    entry: limb_angle(points[0]),
                    exit: limb_angle(points[points.len() - 1]),
                    points,
                });
            }
            (false, false) => {}
        }
    }
    Cut::Crossing(segments)
}

/// Chains segments into closed rings, turning clockwise along the limb from
/// each exit to the nearest entry.
fn rejoin(segments: Vec<Segment>) -> Vec<Vec<Vec3>> {
    let mut used = vec![false; segments.len()];
    let mut rings = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut ring = segments[start].points.clone();
        let mut at = start;
        loop {
            let exit = segments[at].exit;
            let next = (0..segments.len())
                .filter(|&j| j == start || !used[j])
                .min_by(|&a, &b| {
                    clockwise_gap(exit, segments[a].entry)
                        .total_cmp(&clockwise_gap(exit, segments[b].entry))
                })
                .unwrap_or(start);
            limb_arc(exit, clockwise_gap(exit, segments[next].entry), &mut ring);
            if next == start {
                break;
            }
            used[next] = true;
            ring.extend_from_slice(&segments[next].points);
            at = next;
        }
        rings.push(ring);
    }
    rings
}

fn clockwise_gap(from: f64, to: f64) -> f64 {
    (from - to).rem_euclid(TAU)
}

/// Point where the great circle through `a` and `b` meets the horizon.
fn horizon_crossing(a: Vec3, b: Vec3) -> Vec3 {
    let t = a.x / (a.x - b.x);
    let p = a.lerp(b, t);
    let limb = Vec3::new(0.0, p.y, p.z);
    limb.normalized().unwrap_or(limb)
}

fn limb_angle(v: Vec3) -> f64 {
    v.z.atan2(v.y)
}

fn limb_point(angle: f64) -> Vec3 {
    Vec3::new(0.0, angle.cos(), angle.sin())
}

/// Interior samples going clockwise by `sweep` radians from `from`.
fn limb_arc(from: f64, sweep: f64, out: &mut Vec<Vec3>) {
    let steps = (sweep / LIMB_STEP_RAD).ceil() as usize;
    for s in 1..steps {
        out.push(limb_point(from - sweep * (s as f64 / steps as f64)));
    }
}

fn limb_circle() -> Vec<Vec3> {
    (0..LIMB_SAMPLES)
        .map(|k| limb_point(-(k as f64) * TAU / LIMB_SAMPLES as f64))
        .collect()
}

/// Twice the signed area in the screen-facing `(y, z)` plane; positive is
/// counter-clockwise.
fn signed_area(points: &[Vec3]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.y * b.z - b.y * a.z
        })
        .sum()
}
