//! Synthetic outline profiles with known landmark positions.

use landmark_detector::profile::CircularProfile;
use landmark_detector::{ProfileKind, ProfileSet};

/// Where the features of [`hooked_angle_values`] sit.
pub const HOOK_TIP: usize = 10;
pub const HOOK_TAIL_SOCKET: usize = 50;
pub const HOOK_VENTRAL_UPPER: usize = 30;
pub const HOOK_VENTRAL_LOWER: usize = 80;
pub const HOOK_LEN: usize = 100;

/// Angle profile of a hook-shaped outline, 100 points on a 150 baseline:
/// a sharp dip to 100 at index 10 (the hook tip), a peak to 200 at 30, a
/// flat 180 plateau over 50..=65 (the tail socket region) and a peak to
/// 200 at 80. The plateau bias keeps the front half-sum ahead of the rear
/// so the outline is correctly wound as written.
pub fn hooked_angle_values() -> Vec<f32> {
    let mut values = vec![150.0f32; HOOK_LEN];
    // tent shapes give the strictly monotone flanks local-extremum
    // detection expects
    for d in 0..=5usize {
        values[HOOK_TIP - d] = 100.0 + 10.0 * d as f32;
        values[HOOK_TIP + d] = 100.0 + 10.0 * d as f32;
        values[HOOK_VENTRAL_UPPER - d] = 200.0 - 10.0 * d as f32;
        values[HOOK_VENTRAL_UPPER + d] = 200.0 - 10.0 * d as f32;
        values[HOOK_VENTRAL_LOWER - d] = 200.0 - 10.0 * d as f32;
        values[HOOK_VENTRAL_LOWER + d] = 200.0 - 10.0 * d as f32;
    }
    for v in values.iter_mut().take(66).skip(HOOK_TAIL_SOCKET) {
        *v = 180.0;
    }
    values
}

/// Profile set for the hook-shaped outline, correctly wound.
pub fn hooked_outline() -> ProfileSet {
    outline_from_angle(hooked_angle_values())
}

/// The same outline indexed in the opposite direction; processing it must
/// trigger exactly one reversal.
pub fn hooked_outline_reversed() -> ProfileSet {
    let mut values = hooked_angle_values();
    values.reverse();
    outline_from_angle(values)
}

/// Round outline: flat angle profile and a diameter profile with a single
/// sharp peak at `peak`.
pub fn round_outline(len: usize, peak: usize) -> ProfileSet {
    let mut diameter = vec![10.0f32; len];
    diameter[peak] = 25.0;
    ProfileSet::builder()
        .with(ProfileKind::Angle, CircularProfile::new(vec![180.0; len]).unwrap())
        .with(ProfileKind::Diameter, CircularProfile::new(diameter).unwrap())
        .build()
        .unwrap()
}

fn outline_from_angle(values: Vec<f32>) -> ProfileSet {
    let len = values.len();
    ProfileSet::builder()
        .with(ProfileKind::Angle, CircularProfile::new(values).unwrap())
        .with(ProfileKind::Diameter, CircularProfile::new(vec![12.0; len]).unwrap())
        .build()
        .unwrap()
}
