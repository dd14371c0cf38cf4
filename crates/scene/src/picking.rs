use foundation::math::LonLat;

use crate::World;
use crate::projection::Orthographic;
use crate::world::FeatureKey;

/// First country, in source order, whose geometry contains `at`.
///
/// Non-finite positions never match, so a failed inverse projection reads as
/// "nothing under the pointer". Containment is even-odd over all rings, so a
/// point inside a hole (an enclave) does not pick the surrounding country.
pub fn pick_country(world: &World, at: LonLat) -> Option<FeatureKey> {
    if !at.is_finite() {
        return None;
    }
    world
        .iter_countries()
        .find(|(_, feature)| feature.contains(at))
        .map(|(key, _)| key)
}

/// Screen picking: inverse-projects the pointer, then tests every country.
pub fn pick_screen(world: &World, projection: &Orthographic, point: [f64; 2]) -> Option<FeatureKey> {
    let at = projection.invert(point)?;
    pick_country(world, at)
}
