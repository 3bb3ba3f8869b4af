//! Built-in rule set collections for common shape classes.
//!
//! These ship as default presets, not as the only permitted configurations:
//! arbitrary collections load through [`crate::config`]. Each preset is
//! hard-coded and statically valid, so construction cannot fail.

use super::{
    OrientationMark, PriorityAxis, ProfileKind, Rule, RuleApplication, RuleSet, RuleSetCollection,
};

/// Elongated, hook-shaped outline with asymmetric anchors on both axes.
///
/// The reference point is the sharp tip of the hook (deepest local angle
/// minimum), the secondary-Y anchor sits where the outline flattens by the
/// tail attachment, and two verticals bound the ventral edge.
pub fn hooked() -> RuleSetCollection {
    RuleSetCollection::builder("Hooked")
        .rule_set(
            "tip of hook",
            RuleSet::new(
                ProfileKind::Angle,
                vec![
                    Rule::IsLocalMinimum {
                        wanted: true,
                        window: 5,
                    },
                    Rule::ValueLessThan { value: 150.0 },
                    Rule::FirstTrue { wanted: true },
                ],
            ),
        )
        .rule_set(
            "tail socket",
            RuleSet::new(
                ProfileKind::Angle,
                vec![
                    Rule::IndexMoreThan { fraction: 0.3 },
                    Rule::IsConstantRegion {
                        value: 180.0,
                        tolerance: 20.0,
                        min_run: 10,
                    },
                    Rule::FirstTrue { wanted: true },
                ],
            ),
        )
        .rule_set(
            "ventral upper",
            RuleSet::new(
                ProfileKind::Angle,
                vec![
                    Rule::IsLocalMaximum {
                        wanted: true,
                        window: 5,
                    },
                    Rule::IndexLessThan { fraction: 0.5 },
                    Rule::FirstTrue { wanted: true },
                ],
            ),
        )
        .rule_set(
            "ventral lower",
            RuleSet::new(
                ProfileKind::Angle,
                vec![
                    Rule::IsLocalMaximum {
                        wanted: true,
                        window: 5,
                    },
                    Rule::IndexMoreThan { fraction: 0.5 },
                    Rule::LastTrue { wanted: true },
                ],
            ),
        )
        .orientation(OrientationMark::Reference, "tip of hook")
        .orientation(OrientationMark::Left, "tip of hook")
        .orientation(OrientationMark::Top, "ventral upper")
        .orientation(OrientationMark::Bottom, "ventral lower")
        .orientation(OrientationMark::SecondaryY, "tail socket")
        .priority_axis(PriorityAxis::Y)
        .application(RuleApplication::ViaMedian)
        .build(&ProfileKind::ALL)
        .expect("hooked preset is statically valid")
}

/// Bilaterally symmetric outline using a single reference-point rule.
pub fn symmetric() -> RuleSetCollection {
    RuleSetCollection::builder("Symmetric")
        .rule_set(
            "tail socket",
            RuleSet::new(ProfileKind::Angle, vec![Rule::IsMinimum { wanted: true }]),
        )
        .orientation(OrientationMark::Reference, "tail socket")
        .orientation(OrientationMark::SecondaryY, "tail socket")
        .priority_axis(PriorityAxis::Y)
        .application(RuleApplication::ViaMedian)
        .build(&ProfileKind::ALL)
        .expect("symmetric preset is statically valid")
}

/// Round outline: the reference point is simply the longest diameter.
pub fn round() -> RuleSetCollection {
    RuleSetCollection::builder("Round")
        .rule_set(
            "longest axis",
            RuleSet::new(ProfileKind::Diameter, vec![Rule::IsMaximum { wanted: true }]),
        )
        .orientation(OrientationMark::Reference, "longest axis")
        .orientation(OrientationMark::Top, "longest axis")
        .orientation(OrientationMark::SecondaryY, "longest axis")
        .priority_axis(PriorityAxis::Y)
        .application(RuleApplication::ViaMedian)
        .build(&ProfileKind::ALL)
        .expect("round preset is statically valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for rsc in [hooked(), symmetric(), round()] {
            assert!(rsc.validate(&ProfileKind::ALL).is_ok());
            assert!(rsc.orientation_landmark(OrientationMark::Reference).is_some());
        }
    }

    #[test]
    fn hooked_is_asymmetric_on_both_axes() {
        let rsc = hooked();
        assert!(rsc.is_asymmetric_x());
        assert!(rsc.is_asymmetric_y());
        assert_eq!(rsc.priority_axis(), Some(PriorityAxis::Y));
    }

    #[test]
    fn round_uses_only_the_diameter_profile() {
        assert_eq!(round().required_kinds(), vec![ProfileKind::Diameter]);
    }
}
