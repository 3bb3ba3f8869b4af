//! Declarative rule chains for landmark index detection.
//!
//! A [`Rule`] is one atomic test or transform over a profile and a candidate
//! index mask; a [`RuleSet`] is an ordered chain of rules scoped to one
//! profile kind. Evaluation is a strict sequential pipeline: starting from
//! the full index range, rule k's input mask is rule k-1's output mask —
//! never an independent evaluation against the original range. If any rule
//! empties the mask, the remaining rules cannot resurrect candidates other
//! than through explicitly expanding operations (`Invert`,
//! `IndexWithinFractionOf`), so the set as a whole reports "no match"
//! rather than returning an arbitrary index.
//!
//! Rules are a closed sum type: the evaluation match is exhaustive and the
//! compiler enforces that every operation kind is handled.

mod collection;
pub mod presets;

pub use collection::{
    ConfigError, Landmark, OrientationMark, PriorityAxis, RuleApplication, RuleSetCollection,
    RuleSetCollectionBuilder,
};

use crate::profile::{CircularProfile, Extremum, IndexMask};
use serde::{Deserialize, Serialize};

/// The measurement a profile was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Interior angle at each border point.
    Angle,
    /// Local diameter through the centre of mass.
    Diameter,
    /// Distance from the centre of mass.
    Radius,
}

impl ProfileKind {
    /// Every kind the crate knows about, for collection validation.
    pub const ALL: [ProfileKind; 3] =
        [ProfileKind::Angle, ProfileKind::Diameter, ProfileKind::Radius];
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileKind::Angle => write!(f, "angle"),
            ProfileKind::Diameter => write!(f, "diameter"),
            ProfileKind::Radius => write!(f, "radius"),
        }
    }
}

/// One atomic candidate-index test or transform.
///
/// `wanted: false` selects the complement of what the rule would match.
/// Fractions are of the profile length, in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Rule {
    /// The global minimum among surviving candidates.
    IsMinimum { wanted: bool },
    /// The global maximum among surviving candidates.
    IsMaximum { wanted: bool },
    /// Local minima under the monotone walk-out criterion.
    IsLocalMinimum { wanted: bool, window: usize },
    /// Local maxima under the monotone walk-out criterion.
    IsLocalMaximum { wanted: bool, window: usize },
    /// Exactly index 0, regardless of profile values or prior candidates.
    IsZeroIndex,
    ValueLessThan { value: f32 },
    ValueMoreThan { value: f32 },
    /// Indices below `ceil(len * fraction)`.
    IndexLessThan { fraction: f32 },
    /// Indices at or above `floor(len * fraction)`.
    IndexMoreThan { fraction: f32 },
    /// The first run of at least `min_run` consecutive values within
    /// `tolerance` of `value`.
    IsConstantRegion {
        value: f32,
        tolerance: f32,
        min_run: usize,
    },
    /// Keep only the lowest surviving candidate (or drop only it).
    FirstTrue { wanted: bool },
    /// Keep only the highest surviving candidate (or drop only it).
    LastTrue { wanted: bool },
    /// Widen every candidate by `round(len * fraction)` indices either side.
    IndexWithinFractionOf { fraction: f32 },
    /// Complement of the widened candidate region.
    IndexOutsideFractionOf { fraction: f32 },
    /// Complement of the candidate set over the full range.
    Invert,
}

impl Rule {
    /// Apply this rule to the incoming candidate mask, producing the new
    /// candidate mask. Pure: neither profile nor rule is mutated.
    pub fn apply(&self, profile: &CircularProfile, mask: &IndexMask) -> IndexMask {
        match *self {
            Rule::IsMinimum { wanted } => {
                extreme_mask(profile.min_index(mask), profile.len(), wanted)
            }
            Rule::IsMaximum { wanted } => {
                extreme_mask(profile.max_index(mask), profile.len(), wanted)
            }
            Rule::IsLocalMinimum { wanted, window } => {
                local_extrema_mask(profile, mask, Extremum::Minimum, window, wanted)
            }
            Rule::IsLocalMaximum { wanted, window } => {
                local_extrema_mask(profile, mask, Extremum::Maximum, window, wanted)
            }
            Rule::IsZeroIndex => {
                let mut out = IndexMask::new(profile.len(), false);
                out.set(0, true);
                out
            }
            Rule::ValueLessThan { value } => {
                value_mask(profile, mask, |v| v < value)
            }
            Rule::ValueMoreThan { value } => {
                value_mask(profile, mask, |v| v > value)
            }
            Rule::IndexLessThan { fraction } => {
                let cut = (profile.len() as f32 * fraction).ceil() as usize;
                let mut out = IndexMask::new(profile.len(), false);
                for i in 0..cut.min(profile.len()) {
                    out.set(i, true);
                }
                out.and(mask)
            }
            Rule::IndexMoreThan { fraction } => {
                let cut = (profile.len() as f32 * fraction).floor() as usize;
                let mut out = IndexMask::new(profile.len(), false);
                for i in cut..profile.len() {
                    out.set(i, true);
                }
                out.and(mask)
            }
            Rule::IsConstantRegion {
                value,
                tolerance,
                min_run,
            } => constant_region_mask(profile, mask, value, tolerance, min_run),
            Rule::FirstTrue { wanted } => pick_one(mask, mask.first_true(), wanted),
            Rule::LastTrue { wanted } => pick_one(mask, mask.last_true(), wanted),
            Rule::IndexWithinFractionOf { fraction } => widen(mask, fraction),
            Rule::IndexOutsideFractionOf { fraction } => widen(mask, fraction).invert(),
            Rule::Invert => mask.invert(),
        }
    }

    /// True if the rule can only shrink (or keep) the candidate set.
    ///
    /// `Invert` and the fraction-widening rules can expand it; everything
    /// else intersects with, or selects within, the incoming mask.
    /// `IsZeroIndex` is treated as a filter for narrowing purposes even
    /// though it ignores its input: its output never exceeds one candidate.
    pub fn is_pure_filter(&self) -> bool {
        !matches!(
            self,
            Rule::Invert
                | Rule::IndexWithinFractionOf { .. }
                | Rule::IndexOutsideFractionOf { .. }
                | Rule::IsMinimum { wanted: false }
                | Rule::IsMaximum { wanted: false }
                | Rule::IsLocalMinimum { wanted: false, .. }
                | Rule::IsLocalMaximum { wanted: false, .. }
                | Rule::FirstTrue { wanted: false }
                | Rule::LastTrue { wanted: false }
        )
    }
}

fn extreme_mask(index: Option<usize>, len: usize, wanted: bool) -> IndexMask {
    let mut out = IndexMask::new(len, !wanted);
    match index {
        Some(i) => out.set(i, wanted),
        // No candidates survive to search within: nothing can match.
        None => out = IndexMask::new(len, false),
    }
    out
}

fn local_extrema_mask(
    profile: &CircularProfile,
    mask: &IndexMask,
    kind: Extremum,
    window: usize,
    wanted: bool,
) -> IndexMask {
    let extrema = profile.local_extrema(window.max(1), kind).and(mask);
    if wanted {
        extrema
    } else {
        extrema.invert()
    }
}

fn value_mask(
    profile: &CircularProfile,
    mask: &IndexMask,
    predicate: impl Fn(f32) -> bool,
) -> IndexMask {
    let mut out = IndexMask::new(profile.len(), false);
    for (i, v) in profile.values().iter().enumerate() {
        if predicate(*v) {
            out.set(i, true);
        }
    }
    out.and(mask)
}

/// Mark the first non-wrapping run of at least `min_run` consecutive values
/// within `tolerance` of `value`. The marked range spans the run and the
/// index that broke it, matching the behaviour shipped rule chains were
/// tuned against. A run still open at the end of the profile does not count.
fn constant_region_mask(
    profile: &CircularProfile,
    mask: &IndexMask,
    value: f32,
    tolerance: f32,
    min_run: usize,
) -> IndexMask {
    let mut out = IndexMask::new(profile.len(), false);

    let mut run_start: Option<usize> = None;
    let mut run_len = 0usize;
    for (i, v) in profile.values().iter().enumerate() {
        if (v - value).abs() < tolerance {
            if run_start.is_none() {
                run_start = Some(i);
                run_len = 0;
            }
            run_len += 1;
        } else {
            if let Some(start) = run_start {
                if run_len >= min_run {
                    for j in start..=i {
                        out.set(j, true);
                    }
                    return out.and(mask);
                }
            }
            run_start = None;
        }
    }
    out.and(mask)
}

fn pick_one(mask: &IndexMask, index: Option<usize>, wanted: bool) -> IndexMask {
    let mut out = if wanted {
        IndexMask::new(mask.len(), false)
    } else {
        mask.clone()
    };
    if let Some(i) = index {
        out.set(i, wanted);
    }
    out
}

// A zero range keeps nothing, not even the candidate itself: the interval
// `[i-range, i+range)` is empty. Shipped rule chains rely on that edge.
fn widen(mask: &IndexMask, fraction: f32) -> IndexMask {
    let range = (mask.len() as f32 * fraction).round() as isize;
    let mut out = IndexMask::new(mask.len(), false);
    for i in mask.indices() {
        for j in (i as isize - range)..(i as isize + range) {
            out.set_wrapped(j, true);
        }
    }
    out
}

/// An ordered chain of rules scoped to one profile kind. Immutable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub kind: ProfileKind,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(kind: ProfileKind, rules: Vec<Rule>) -> Self {
        Self { kind, rules }
    }

    /// Evaluate the chain against a profile. The empty chain is the
    /// identity: every index is a candidate. The returned mask is the full
    /// surviving set; tie-breaking among survivors belongs to the resolver.
    pub fn evaluate(&self, profile: &CircularProfile) -> IndexMask {
        let mut mask = IndexMask::new(profile.len(), true);
        for rule in &self.rules {
            mask = rule.apply(profile, &mask);
            if !mask.any() {
                // Short-circuit: only expanding rules could follow, and a
                // match grown out of nothing is never meaningful.
                return mask;
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(values: &[f32]) -> CircularProfile {
        CircularProfile::new(values.to_vec()).unwrap()
    }

    fn full(len: usize) -> IndexMask {
        IndexMask::new(len, true)
    }

    #[test]
    fn global_minimum_rule_finds_single_dip() {
        let p = profile(&[5.0, 5.0, 5.0, 1.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]);
        let set = RuleSet::new(ProfileKind::Diameter, vec![Rule::IsMinimum { wanted: true }]);
        let mask = set.evaluate(&p);
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn minimum_search_is_scoped_to_surviving_candidates() {
        // The global minimum sits at 0, but the index filter has already
        // excluded the first half, so the search happens among survivors.
        let p = profile(&[0.0, 9.0, 9.0, 9.0, 9.0, 9.0, 3.0, 9.0, 9.0, 9.0]);
        let set = RuleSet::new(
            ProfileKind::Angle,
            vec![
                Rule::IndexMoreThan { fraction: 0.5 },
                Rule::IsMinimum { wanted: true },
            ],
        );
        assert_eq!(set.evaluate(&p).first_true(), Some(6));
    }

    #[test]
    fn value_less_than_zero_on_nonnegative_profile_is_empty() {
        let p = profile(&[5.0, 1.0, 0.0, 2.0]);
        let set = RuleSet::new(ProfileKind::Angle, vec![Rule::ValueLessThan { value: 0.0 }]);
        assert!(!set.evaluate(&p).any());
    }

    #[test]
    fn empty_rule_set_is_identity() {
        let p = profile(&[1.0, 2.0, 3.0]);
        let set = RuleSet::new(ProfileKind::Angle, vec![]);
        assert_eq!(set.evaluate(&p).count(), 3);
    }

    #[test]
    fn index_bounds_use_ceil_and_floor() {
        let p = profile(&[0.0; 10]);
        let less = Rule::IndexLessThan { fraction: 0.25 };
        let kept = less.apply(&p, &full(10));
        // ceil(10 * 0.25) = 3 -> indices 0..3
        assert_eq!(kept.indices().collect::<Vec<_>>(), vec![0, 1, 2]);

        let more = Rule::IndexMoreThan { fraction: 0.55 };
        let kept = more.apply(&p, &full(10));
        // floor(10 * 0.55) = 5 -> indices 5..10
        assert_eq!(kept.first_true(), Some(5));
        assert_eq!(kept.count(), 5);
    }

    #[test]
    fn zero_index_ignores_profile_and_prior_mask() {
        let p = profile(&[7.0, 8.0, 9.0]);
        let none = IndexMask::new(3, false);
        let mask = Rule::IsZeroIndex.apply(&p, &none);
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn constant_region_marks_first_qualifying_run() {
        let p = profile(&[
            10.0, 180.0, 181.0, 179.5, 180.5, 10.0, 180.0, 180.0, 10.0, 10.0,
        ]);
        let rule = Rule::IsConstantRegion {
            value: 180.0,
            tolerance: 2.0,
            min_run: 3,
        };
        let mask = rule.apply(&p, &full(10));
        // Run 1..=4 qualifies; the breaking index 5 is included.
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn constant_region_too_short_is_empty() {
        let p = profile(&[10.0, 180.0, 180.0, 10.0, 10.0, 10.0]);
        let rule = Rule::IsConstantRegion {
            value: 180.0,
            tolerance: 2.0,
            min_run: 3,
        };
        assert!(!rule.apply(&p, &full(6)).any());
    }

    #[test]
    fn first_and_last_true_select_within_survivors() {
        let p = profile(&[0.0; 6]);
        let mut survivors = IndexMask::new(6, false);
        survivors.set(2, true);
        survivors.set(4, true);

        let first = Rule::FirstTrue { wanted: true }.apply(&p, &survivors);
        assert_eq!(first.indices().collect::<Vec<_>>(), vec![2]);

        let not_last = Rule::LastTrue { wanted: false }.apply(&p, &survivors);
        assert_eq!(not_last.indices().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn widen_wraps_across_the_seam() {
        let p = profile(&[0.0; 10]);
        let mut survivors = IndexMask::new(10, false);
        survivors.set(0, true);
        let rule = Rule::IndexWithinFractionOf { fraction: 0.2 };
        let mask = rule.apply(&p, &survivors);
        // round(10 * 0.2) = 2 -> indices 8, 9, 0, 1 (upper bound exclusive)
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0, 1, 8, 9]);
    }

    #[test]
    fn widen_with_zero_range_keeps_nothing() {
        // round(10 * 0.04) = 0: the half-open interval around each
        // candidate is empty, so even the candidate itself is dropped.
        let p = profile(&[0.0; 10]);
        let mut survivors = IndexMask::new(10, false);
        survivors.set(4, true);
        let rule = Rule::IndexWithinFractionOf { fraction: 0.04 };
        assert!(!rule.apply(&p, &survivors).any());
    }

    #[test]
    fn invert_complements_full_range() {
        let p = profile(&[0.0; 4]);
        let mut survivors = IndexMask::new(4, false);
        survivors.set(1, true);
        let mask = Rule::Invert.apply(&p, &survivors);
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn filter_only_chain_never_grows() {
        let p = profile(&[5.0, 4.0, 3.0, 1.0, 3.0, 4.0, 5.0, 6.0, 7.0, 6.0]);
        let set = RuleSet::new(
            ProfileKind::Angle,
            vec![
                Rule::ValueLessThan { value: 6.5 },
                Rule::IsLocalMinimum {
                    wanted: true,
                    window: 2,
                },
                Rule::FirstTrue { wanted: true },
            ],
        );
        assert!(set.rules.iter().all(Rule::is_pure_filter));

        let mut mask = IndexMask::new(p.len(), true);
        let mut last = mask.count();
        for rule in &set.rules {
            mask = rule.apply(&p, &mask);
            assert!(mask.count() <= last, "filter rule grew the candidate set");
            last = mask.count();
        }
        assert_eq!(mask.first_true(), Some(3));
    }

    #[test]
    fn rule_serde_round_trip() {
        let rules = vec![
            Rule::IsLocalMinimum {
                wanted: true,
                window: 5,
            },
            Rule::IsConstantRegion {
                value: 180.0,
                tolerance: 20.0,
                min_run: 10,
            },
            Rule::Invert,
        ];
        let json = serde_json::to_string(&rules).unwrap();
        let back: Vec<Rule> = serde_json::from_str(&json).unwrap();
        assert_eq!(rules, back);
    }
}
