//! Indexing-direction (chirality) detection and bounded self-correction.
//!
//! The convention: viewed from the reference anchor, the half of the
//! outline with the larger accumulated angle sum must lie ahead, in the
//! increasing-index direction. If the halves are swapped the entire index
//! space is reversed and landmarks are re-resolved exactly once — reversal
//! changes derived quantities that feed back into resolution, so an
//! unbounded correction loop could oscillate. The single retry is encoded
//! in an explicit state machine rather than a loop: there is no code path
//! that reverses twice.

use crate::nucleus::Nucleus;
use crate::profile::CircularProfile;
use crate::resolver;
use crate::rules::{ProfileKind, RuleSetCollection};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Where a nucleus stands in the orientation check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationState {
    /// Not yet examined.
    Unchecked,
    /// Examined and found correctly wound.
    Ok,
    /// Reversed once; the re-check passed.
    ReversedOnce,
    /// Still judged incorrect after the permitted retry. Non-fatal: the
    /// shape keeps its last computed orientation.
    Failed,
}

/// Three-valued verdict carried by the analysis report. Collapses the
/// state machine: `Unchecked` and `Failed` both surface as `Uncertain`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationOutcome {
    Correct,
    Reversed,
    Uncertain,
}

impl From<OrientationState> for OrientationOutcome {
    fn from(state: OrientationState) -> Self {
        match state {
            OrientationState::Ok => OrientationOutcome::Correct,
            OrientationState::ReversedOnce => OrientationOutcome::Reversed,
            OrientationState::Unchecked | OrientationState::Failed => {
                OrientationOutcome::Uncertain
            }
        }
    }
}

/// Test whether the index space winds in the expected direction.
///
/// The profile is rotated to start at the reference anchor, then split at
/// the midpoint; values strictly before it form the front half, values
/// strictly after it the rear half. Correct orientation means the front
/// sum strictly exceeds the rear sum.
pub fn is_orientation_ok(nucleus: &Nucleus, collection: &RuleSetCollection) -> bool {
    let reference = collection.reference();
    let anchor = nucleus
        .landmark(reference)
        .map(|r| r.index)
        .unwrap_or(0);

    let profile = orientation_profile(nucleus);
    let rotated = profile.start_from(anchor as isize);

    let mid = rotated.len() / 2;
    let mut front = 0.0f64;
    let mut rear = 0.0f64;
    for (i, v) in rotated.values().iter().enumerate() {
        if i < mid {
            front += f64::from(*v);
        } else if i > mid {
            rear += f64::from(*v);
        }
    }
    debug!(
        "orientation check at anchor {anchor}: front={front:.1} rear={rear:.1}"
    );
    front > rear
}

/// The orientation judgement reads the angle profile when the outline
/// provides one; otherwise the first available profile stands in.
fn orientation_profile(nucleus: &Nucleus) -> &CircularProfile {
    nucleus.profile(ProfileKind::Angle).unwrap_or_else(|| {
        let kind = nucleus.profiles().kinds()[0];
        nucleus.profile(kind).expect("profile set is never empty")
    })
}

/// Check orientation and correct it at most once.
///
/// On a failed check the whole index space is reversed (`i -> len-1-i`,
/// landmarks and segments remapped), landmarks are re-resolved, and the
/// check runs again. A second failure is reported as a warning and the
/// nucleus keeps its current orientation. The resulting state is written
/// to the nucleus and returned.
pub fn correct_orientation(
    nucleus: &mut Nucleus,
    collection: &RuleSetCollection,
) -> OrientationState {
    let state = if is_orientation_ok(nucleus, collection) {
        OrientationState::Ok
    } else {
        nucleus.reverse();
        resolver::assign_landmarks(nucleus, collection);
        if is_orientation_ok(nucleus, collection) {
            OrientationState::ReversedOnce
        } else {
            warn!(
                "orientation still incorrect after one reversal; keeping current orientation"
            );
            OrientationState::Failed
        }
    };
    nucleus.set_orientation(state);
    state
}
