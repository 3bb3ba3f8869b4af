//! Per-nucleus state: profiles, resolved landmarks and segments.
//!
//! A [`Nucleus`] owns everything mutable in the pipeline. Rule set
//! collections are shared read-only configuration; independent nuclei can
//! therefore be processed fully in parallel with no shared mutable state.

use crate::orient::{OrientationOutcome, OrientationState};
use crate::profile::{CircularProfile, ProfileError};
use crate::rules::{Landmark, ProfileKind};
use crate::segments::SegmentList;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The named profiles of one outline, all the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileSet {
    profiles: BTreeMap<ProfileKind, CircularProfile>,
    len: usize,
}

impl ProfileSet {
    pub fn builder() -> ProfileSetBuilder {
        ProfileSetBuilder {
            profiles: BTreeMap::new(),
        }
    }

    /// Number of border points shared by every profile.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, kind: ProfileKind) -> Option<&CircularProfile> {
        self.profiles.get(&kind)
    }

    /// Profile kinds this outline provides.
    pub fn kinds(&self) -> Vec<ProfileKind> {
        self.profiles.keys().copied().collect()
    }

    /// Copy with every profile's index direction reversed.
    pub fn reversed(&self) -> ProfileSet {
        ProfileSet {
            profiles: self
                .profiles
                .iter()
                .map(|(k, p)| (*k, p.reversed()))
                .collect(),
            len: self.len,
        }
    }
}

/// Accumulates profiles for one outline and checks length agreement.
pub struct ProfileSetBuilder {
    profiles: BTreeMap<ProfileKind, CircularProfile>,
}

impl ProfileSetBuilder {
    pub fn with(mut self, kind: ProfileKind, profile: CircularProfile) -> Self {
        self.profiles.insert(kind, profile);
        self
    }

    pub fn build(self) -> Result<ProfileSet, ProfileError> {
        let mut iter = self.profiles.values();
        let len = iter.next().ok_or(ProfileError::Empty)?.len();
        for p in iter {
            if p.len() != len {
                return Err(ProfileError::LengthMismatch {
                    expected: len,
                    found: p.len(),
                });
            }
        }
        Ok(ProfileSet {
            profiles: self.profiles,
            len,
        })
    }
}

/// A landmark position written by the resolver.
///
/// `defaulted` distinguishes "legitimately index 0" from "fallback because
/// no candidate matched"; downstream code can query it instead of guessing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLandmark {
    pub index: usize,
    pub defaulted: bool,
}

/// One nucleus instance: its profiles, landmark map and segmentation.
#[derive(Clone, Debug)]
pub struct Nucleus {
    profiles: ProfileSet,
    landmarks: BTreeMap<Landmark, ResolvedLandmark>,
    segments: Option<SegmentList>,
    orientation: OrientationState,
}

impl Nucleus {
    pub fn new(profiles: ProfileSet) -> Self {
        Self {
            profiles,
            landmarks: BTreeMap::new(),
            segments: None,
            orientation: OrientationState::Unchecked,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn profile(&self, kind: ProfileKind) -> Option<&CircularProfile> {
        self.profiles.get(kind)
    }

    pub fn landmark(&self, landmark: &Landmark) -> Option<ResolvedLandmark> {
        self.landmarks.get(landmark).copied()
    }

    /// Overwrite a landmark slot. Used by the resolver and by manual
    /// curation; later writes win.
    pub fn set_landmark(&mut self, landmark: Landmark, resolved: ResolvedLandmark) {
        self.landmarks.insert(landmark, resolved);
    }

    pub fn landmarks(&self) -> impl Iterator<Item = (&Landmark, &ResolvedLandmark)> {
        self.landmarks.iter()
    }

    pub fn segments(&self) -> Option<&SegmentList> {
        self.segments.as_ref()
    }

    pub fn segments_mut(&mut self) -> Option<&mut SegmentList> {
        self.segments.as_mut()
    }

    pub fn set_segments(&mut self, segments: SegmentList) {
        self.segments = Some(segments);
    }

    pub fn orientation(&self) -> OrientationState {
        self.orientation
    }

    pub fn set_orientation(&mut self, state: OrientationState) {
        self.orientation = state;
    }

    /// Reverse the indexing direction of the whole outline: every profile
    /// is flipped, every resolved landmark index `i` becomes `len-1-i`, and
    /// segment boundaries are remapped to match.
    pub fn reverse(&mut self) {
        let len = self.profiles.len();
        self.profiles = self.profiles.reversed();
        for resolved in self.landmarks.values_mut() {
            resolved.index = len - 1 - resolved.index;
        }
        if let Some(segments) = &mut self.segments {
            segments.reverse();
        }
    }

    /// Assemble the externally visible output contract. Downstream
    /// consumers read this; they never re-derive landmarks.
    pub fn report(&self, collection_name: &str) -> AnalysisReport {
        AnalysisReport {
            collection: collection_name.to_string(),
            length: self.len(),
            landmarks: self
                .landmarks
                .iter()
                .map(|(l, r)| (l.name().to_string(), *r))
                .collect(),
            orientation: self.orientation.into(),
            segments: self
                .segments
                .as_ref()
                .map(|list| {
                    (0..list.count())
                        .map(|pos| SegmentDescriptor {
                            name: list.get(pos).name.clone(),
                            start: list.get(pos).start,
                            end: list.end_of(pos),
                            locked: list.get(pos).locked,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Serializable per-nucleus result: landmark map, orientation flag and
/// segment list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub collection: String,
    pub length: usize,
    pub landmarks: BTreeMap<String, ResolvedLandmark>,
    pub orientation: OrientationOutcome,
    pub segments: Vec<SegmentDescriptor>,
}

/// Flat segment view for the report; `end` is exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub locked: bool,
}
