//! Shared, read-only configuration mapping landmarks to their rule sets.
//!
//! A [`RuleSetCollection`] is immutable once built; "editing" one means
//! building a new value through [`RuleSetCollectionBuilder`], so concurrent
//! per-nucleus resolution never races against configuration mutation.
//! Validation happens at build time: a landmark declared as an orientation
//! anchor without a rule set, or a rule set naming a profile kind the
//! outline does not provide, is a configuration error and aborts the run
//! before any nucleus is processed.

use super::{ProfileKind, RuleSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, resolvable position on a profile with anatomical meaning.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Landmark(String);

impl Landmark {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Landmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Landmark {
    fn from(name: &str) -> Self {
        Landmark::new(name)
    }
}

/// Geometric axis roles a landmark can anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationMark {
    /// Primary anchor; fixes index 0 of landmark-rotated views and drives
    /// the orientation check.
    Reference,
    Left,
    Right,
    Top,
    Bottom,
    SecondaryX,
    SecondaryY,
}

/// Which axis wins when both carry anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityAxis {
    X,
    Y,
}

/// How rule sets are applied across a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleApplication {
    /// Resolve once against an aggregate (median) profile and propagate to
    /// individual profiles by best-fit offset.
    ViaMedian,
    /// Resolve independently against every individual profile.
    PerNucleus,
}

/// Configuration errors detected when building or loading a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An orientation anchor points at a landmark with no rule sets.
    UnresolvableAnchor {
        mark: OrientationMark,
        landmark: Landmark,
    },
    /// A rule set names a profile kind the outline does not provide.
    MissingProfileKind {
        landmark: Landmark,
        kind: ProfileKind,
    },
    /// No reference anchor was declared.
    MissingReference,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnresolvableAnchor { mark, landmark } => write!(
                f,
                "orientation anchor {mark:?} maps to landmark '{landmark}' which has no rule sets"
            ),
            ConfigError::MissingProfileKind { landmark, kind } => write!(
                f,
                "landmark '{landmark}' uses a {kind} rule set but no {kind} profile is available"
            ),
            ConfigError::MissingReference => {
                write!(f, "collection declares no reference landmark")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Maps every landmark of one shape class to its rule sets, plus the
/// orientation metadata. Shared read-only across all nuclei of an analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSetCollection {
    name: String,
    rule_sets: BTreeMap<Landmark, Vec<RuleSet>>,
    orientation: BTreeMap<OrientationMark, Landmark>,
    priority_axis: Option<PriorityAxis>,
    application: RuleApplication,
}

impl RuleSetCollection {
    pub fn builder(name: impl Into<String>) -> RuleSetCollectionBuilder {
        RuleSetCollectionBuilder {
            name: name.into(),
            rule_sets: BTreeMap::new(),
            orientation: BTreeMap::new(),
            priority_axis: None,
            application: RuleApplication::PerNucleus,
        }
    }

    /// Rebuild through a builder, e.g. to edit a loaded collection. The
    /// result must be re-validated before use.
    pub fn to_builder(&self) -> RuleSetCollectionBuilder {
        RuleSetCollectionBuilder {
            name: self.name.clone(),
            rule_sets: self.rule_sets.clone(),
            orientation: self.orientation.clone(),
            priority_axis: self.priority_axis,
            application: self.application,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn application(&self) -> RuleApplication {
        self.application
    }

    pub fn priority_axis(&self) -> Option<PriorityAxis> {
        self.priority_axis
    }

    /// Landmarks in deterministic (name) order.
    pub fn landmarks(&self) -> impl Iterator<Item = &Landmark> {
        self.rule_sets.keys()
    }

    pub fn rule_sets(&self, landmark: &Landmark) -> &[RuleSet] {
        self.rule_sets.get(landmark).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Landmark anchoring the given axis role, if declared.
    pub fn orientation_landmark(&self, mark: OrientationMark) -> Option<&Landmark> {
        self.orientation.get(&mark)
    }

    /// The reference landmark. Guaranteed present by validation.
    pub fn reference(&self) -> &Landmark {
        self.orientation
            .get(&OrientationMark::Reference)
            .expect("validated collection always has a reference anchor")
    }

    /// True if an anchor left or right of the centre of mass is declared.
    pub fn is_asymmetric_x(&self) -> bool {
        self.orientation.contains_key(&OrientationMark::Left)
            || self.orientation.contains_key(&OrientationMark::Right)
    }

    /// True if an anchor above or below the centre of mass is declared.
    pub fn is_asymmetric_y(&self) -> bool {
        self.orientation.contains_key(&OrientationMark::Top)
            || self.orientation.contains_key(&OrientationMark::Bottom)
    }

    /// Profile kinds this collection's rules touch.
    pub fn required_kinds(&self) -> Vec<ProfileKind> {
        let mut kinds: Vec<ProfileKind> = self
            .rule_sets
            .values()
            .flatten()
            .map(|rs| rs.kind)
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// Check this collection against the profile kinds an outline provides.
    ///
    /// Every orientation anchor must be resolvable and every rule set's kind
    /// must be available. Surfaced at load time, never deferred to
    /// per-nucleus resolution.
    pub fn validate(&self, available: &[ProfileKind]) -> Result<(), ConfigError> {
        if !self.orientation.contains_key(&OrientationMark::Reference) {
            return Err(ConfigError::MissingReference);
        }
        for (mark, landmark) in &self.orientation {
            if self.rule_sets(landmark).is_empty() {
                return Err(ConfigError::UnresolvableAnchor {
                    mark: *mark,
                    landmark: landmark.clone(),
                });
            }
        }
        for (landmark, sets) in &self.rule_sets {
            for set in sets {
                if !available.contains(&set.kind) {
                    return Err(ConfigError::MissingProfileKind {
                        landmark: landmark.clone(),
                        kind: set.kind,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builder producing immutable [`RuleSetCollection`] values.
pub struct RuleSetCollectionBuilder {
    name: String,
    rule_sets: BTreeMap<Landmark, Vec<RuleSet>>,
    orientation: BTreeMap<OrientationMark, Landmark>,
    priority_axis: Option<PriorityAxis>,
    application: RuleApplication,
}

impl RuleSetCollectionBuilder {
    /// Append a rule set for a landmark, creating the landmark on first use.
    pub fn rule_set(mut self, landmark: impl Into<Landmark>, set: RuleSet) -> Self {
        self.rule_sets.entry(landmark.into()).or_default().push(set);
        self
    }

    /// Drop all rule sets for a landmark.
    pub fn clear_rule_sets(mut self, landmark: &Landmark) -> Self {
        self.rule_sets.remove(landmark);
        self
    }

    /// Declare a landmark as the anchor for an axis role.
    pub fn orientation(mut self, mark: OrientationMark, landmark: impl Into<Landmark>) -> Self {
        self.orientation.insert(mark, landmark.into());
        self
    }

    pub fn priority_axis(mut self, axis: PriorityAxis) -> Self {
        self.priority_axis = Some(axis);
        self
    }

    pub fn application(mut self, application: RuleApplication) -> Self {
        self.application = application;
        self
    }

    /// Validate against the available profile kinds and freeze.
    pub fn build(self, available: &[ProfileKind]) -> Result<RuleSetCollection, ConfigError> {
        let collection = RuleSetCollection {
            name: self.name,
            rule_sets: self.rule_sets,
            orientation: self.orientation,
            priority_axis: self.priority_axis,
            application: self.application,
        };
        collection.validate(available)?;
        Ok(collection)
    }
}

impl From<Landmark> for String {
    fn from(l: Landmark) -> Self {
        l.0
    }
}
