//! Rule-based landmark resolution.
//!
//! For each landmark in a collection, the resolver evaluates its rule sets
//! in declaration order against the profile of each set's configured kind,
//! intersecting the surviving masks, then picks one index deterministically:
//! a singleton is used as-is, multiple survivors resolve to the lowest
//! index, and an empty result falls back to index 0 with the `defaulted`
//! flag set. The fallback is a deliberate leniency — downstream code still
//! receives a valid index and one malformed outline never aborts a batch —
//! but it is recorded and logged rather than silent.
//!
//! The resolver writes landmark slots on the nucleus and mutates nothing
//! else.

use crate::nucleus::{Nucleus, ProfileSet, ResolvedLandmark};
use crate::profile::IndexMask;
use crate::rules::{Landmark, RuleSet, RuleSetCollection};
use log::debug;

/// Find the index matching a list of rule sets, intersecting their masks.
///
/// Returns the lowest surviving index, or `None` when no index matches or
/// the list is empty. A rule set whose profile kind is absent from the set
/// cannot match; collection validation rules this out before batch work
/// starts.
pub fn identify_index(profiles: &ProfileSet, rule_sets: &[RuleSet]) -> Option<usize> {
    if rule_sets.is_empty() {
        return None;
    }
    let mut combined = IndexMask::new(profiles.len(), true);
    for set in rule_sets {
        let Some(profile) = profiles.get(set.kind) else {
            debug!("no {} profile available for rule set; no match", set.kind);
            return None;
        };
        combined = combined.and(&set.evaluate(profile));
        if !combined.any() {
            return None;
        }
    }
    combined.first_true()
}

/// Resolve a single landmark, applying the fallback policy.
pub fn resolve_landmark(
    profiles: &ProfileSet,
    landmark: &Landmark,
    rule_sets: &[RuleSet],
) -> ResolvedLandmark {
    match identify_index(profiles, rule_sets) {
        Some(index) => ResolvedLandmark {
            index,
            defaulted: false,
        },
        None => {
            debug!("unable to detect '{landmark}'; falling back to index 0");
            ResolvedLandmark {
                index: 0,
                defaulted: true,
            }
        }
    }
}

/// Resolve every landmark of the collection and write the results into the
/// nucleus' landmark slots.
pub fn assign_landmarks(nucleus: &mut Nucleus, collection: &RuleSetCollection) {
    for landmark in collection.landmarks() {
        let resolved = resolve_landmark(
            nucleus.profiles(),
            landmark,
            collection.rule_sets(landmark),
        );
        nucleus.set_landmark(landmark.clone(), resolved);
    }
}
