//! End-to-end outline analysis: resolve landmarks, correct orientation,
//! segment.
//!
//! [`OutlineAnalyzer`] owns one validated [`RuleSetCollection`] and applies
//! it to any number of outlines. Per-outline processing is a pure function
//! of the profiles plus the shared read-only collection, so batches run on
//! the rayon pool with no coordination beyond the final collect.

use crate::nucleus::{Nucleus, ProfileSet, ResolvedLandmark};
use crate::orient;
use crate::profile::CircularProfile;
use crate::resolver;
use crate::rules::{ConfigError, ProfileKind, RuleApplication, RuleSetCollection};
use crate::segments::{SegmentList, SegmentUpdateError};
use log::debug;
use rayon::prelude::*;

/// Fresh equal divisions use these names unless overridden.
const DEFAULT_SEGMENT_NAMES: [&str; 4] = ["Seg_0", "Seg_1", "Seg_2", "Seg_3"];

/// Applies one rule set collection to outlines.
#[derive(Clone, Debug)]
pub struct OutlineAnalyzer {
    collection: RuleSetCollection,
    segment_names: Vec<String>,
}

impl OutlineAnalyzer {
    /// Wrap a collection, re-validating it. Collections straight from the
    /// builder always pass; deserialized ones may not.
    pub fn new(collection: RuleSetCollection) -> Result<OutlineAnalyzer, ConfigError> {
        collection.validate(&ProfileKind::ALL)?;
        Ok(OutlineAnalyzer {
            collection,
            segment_names: DEFAULT_SEGMENT_NAMES.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Replace the names used for fresh equal divisions. The name count
    /// fixes the segment count.
    pub fn with_segment_names(mut self, names: &[&str]) -> OutlineAnalyzer {
        assert!(!names.is_empty(), "segmentation needs at least one name");
        self.segment_names = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn collection(&self) -> &RuleSetCollection {
        &self.collection
    }

    /// Run the full pipeline on one outline: landmark resolution,
    /// orientation correction (bounded to a single reversal), then a fresh
    /// equal division anchored at the reference landmark.
    pub fn process(&self, profiles: ProfileSet) -> Nucleus {
        let mut nucleus = Nucleus::new(profiles);
        resolver::assign_landmarks(&mut nucleus, &self.collection);
        orient::correct_orientation(&mut nucleus, &self.collection);

        let anchor = nucleus
            .landmark(self.collection.reference())
            .map(|r| r.index)
            .unwrap_or(0);
        let names: Vec<&str> = self.segment_names.iter().map(String::as_str).collect();
        nucleus.set_segments(SegmentList::equal_division(nucleus.len(), &names, anchor));
        debug!(
            "processed outline of {} points with '{}': anchor {anchor}, {} segments",
            nucleus.len(),
            self.collection.name(),
            names.len()
        );
        nucleus
    }

    /// Process independent outlines in parallel. The collection is shared
    /// read-only; each outline owns its result.
    pub fn process_batch(&self, batches: Vec<ProfileSet>) -> Vec<Nucleus> {
        batches.into_par_iter().map(|p| self.process(p)).collect()
    }

    /// Via-median propagation: resolve landmarks on an aggregate template
    /// and transfer them onto `nucleus` through the best-fit rotation of
    /// its profile against the template.
    ///
    /// Under the `PerNucleus` policy this is a no-op; the nucleus keeps the
    /// landmarks it resolved itself. When the reference anchor moves, the
    /// existing segmentation is relocated with it; a relocation that cannot
    /// respect segment locks fails loudly for this nucleus.
    pub fn propagate_from_template(
        &self,
        nucleus: &mut Nucleus,
        template: &ProfileSet,
    ) -> Result<(), SegmentUpdateError> {
        if self.collection.application() != RuleApplication::ViaMedian {
            return Ok(());
        }

        let n = nucleus.len();
        let subject = alignment_profile(nucleus.profiles());
        let offset = subject.best_fit_offset(alignment_profile(template));
        let old_anchor = nucleus
            .landmark(self.collection.reference())
            .map(|r| r.index);

        // Resolve into a staging map first: if the segmentation cannot
        // follow the moved anchor, the nucleus must come out of the error
        // branch exactly as it went in.
        let mut mapped_landmarks = Vec::new();
        for landmark in self.collection.landmarks() {
            let on_template =
                resolver::resolve_landmark(template, landmark, self.collection.rule_sets(landmark));
            // Template index as a fraction of its length, rescaled to this
            // outline and shifted by the alignment offset.
            let fraction = on_template.index as f32 / template.len() as f32;
            let mapped = (offset + (fraction * n as f32).round() as usize) % n;
            debug!("propagating '{landmark}': template {} -> {mapped}", on_template.index);
            mapped_landmarks.push((
                landmark.clone(),
                ResolvedLandmark {
                    index: mapped,
                    defaulted: on_template.defaulted,
                },
            ));
        }

        let new_anchor = mapped_landmarks
            .iter()
            .find(|(l, _)| l == self.collection.reference())
            .map(|(_, r)| r.index);
        if let (Some(old), Some(new), Some(segments)) =
            (old_anchor, new_anchor, nucleus.segments_mut())
        {
            if old != new {
                segments.relocate_anchor(old, new)?;
            }
        }
        for (landmark, resolved) in mapped_landmarks {
            nucleus.set_landmark(landmark, resolved);
        }
        Ok(())
    }
}

/// Alignment and orientation read the angle profile when present, falling
/// back to whichever kind the set carries first.
fn alignment_profile(set: &ProfileSet) -> &CircularProfile {
    set.get(ProfileKind::Angle).unwrap_or_else(|| {
        let kind = set.kinds()[0];
        set.get(kind).expect("profile set is never empty")
    })
}
