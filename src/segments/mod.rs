//! Contiguous, named, boundary-locked segmentation of the circular index
//! space.
//!
//! A [`SegmentList`] partitions `[0, len)` into half-open slices in cyclic
//! order: each segment runs from its own start to the next segment's start,
//! so the slices are contiguous, non-overlapping and cover the circle
//! exactly once. Adjacency is carried by list order rather than by linked
//! objects; [`SegmentList::next_of`] and [`SegmentList::prev_of`] expose it.
//!
//! The anchor contract: one boundary always coincides with the anchor
//! landmark's index, so a profile view rotated to that landmark has a
//! boundary at index 0. When the anchor moves, [`SegmentList::relocate_anchor`]
//! rotates every unlocked boundary by the delta while locked boundaries
//! stay, forcing their unlocked neighbours to absorb the offset. The
//! operation is idempotent for a fixed target index.

use serde::{Deserialize, Serialize};

/// Errors raised when a segment boundary update cannot be honoured.
///
/// These fail loudly for the affected nucleus: a conflicting lock indicates
/// an inconsistent prior manual edit, not a condition to paper over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentUpdateError {
    /// No segment boundary sits at the expected anchor index.
    NoBoundaryAtAnchor { index: usize },
    /// The anchor boundary is locked and cannot move.
    LockedBoundary { name: String },
    /// Absorbing the offset would shrink a segment to nothing.
    EmptySegment { name: String },
}

impl std::fmt::Display for SegmentUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentUpdateError::NoBoundaryAtAnchor { index } => {
                write!(f, "no segment boundary at anchor index {index}")
            }
            SegmentUpdateError::LockedBoundary { name } => {
                write!(f, "segment '{name}' is locked; its boundary cannot move")
            }
            SegmentUpdateError::EmptySegment { name } => {
                write!(f, "relocation would leave segment '{name}' empty")
            }
        }
    }
}

impl std::error::Error for SegmentUpdateError {}

/// One contiguous named slice of the circular index space. The slice runs
/// from `start` up to (excluding) the next segment's start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub start: usize,
    /// A locked segment's start index must never be altered by anchor
    /// relocation.
    pub locked: bool,
}

/// An ordered partition of `[0, len)` into named segments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentList {
    segments: Vec<Segment>,
    len: usize,
}

impl SegmentList {
    /// Divide the circle into `names.len()` near-equal segments, the first
    /// boundary at `anchor`. The remainder goes to the final segment. An
    /// outline too short to give every name at least one index keeps only
    /// the first `len` names, so any non-empty outline segments cleanly.
    pub fn equal_division(len: usize, names: &[&str], anchor: usize) -> SegmentList {
        assert!(!names.is_empty(), "segmentation needs at least one segment");
        let count = names.len().min(len);
        let size = len / count;
        let segments = names[..count]
            .iter()
            .enumerate()
            .map(|(i, name)| Segment {
                name: (*name).to_string(),
                start: (anchor + i * size) % len,
                locked: false,
            })
            .collect();
        SegmentList { segments, len }
    }

    #[inline]
    pub fn profile_len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.segments.len()
    }

    pub fn get(&self, position: usize) -> &Segment {
        &self.segments[position]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Position of the segment following `position`, wrapping.
    #[inline]
    pub fn next_of(&self, position: usize) -> usize {
        (position + 1) % self.segments.len()
    }

    /// Position of the segment preceding `position`, wrapping.
    #[inline]
    pub fn prev_of(&self, position: usize) -> usize {
        (position + self.segments.len() - 1) % self.segments.len()
    }

    /// Exclusive end index of the segment at `position` (the next start).
    pub fn end_of(&self, position: usize) -> usize {
        self.segments[self.next_of(position)].start
    }

    /// Number of indices the segment at `position` covers. A lone segment
    /// covers the whole circle.
    pub fn length_of(&self, position: usize) -> usize {
        if self.segments.len() == 1 {
            return self.len;
        }
        let start = self.segments[position].start;
        let end = self.end_of(position);
        (end + self.len - start) % self.len
    }

    /// Position of the segment containing the wrapped `index`.
    pub fn containing(&self, index: usize) -> usize {
        let index = index % self.len;
        for pos in 0..self.segments.len() {
            let start = self.segments[pos].start;
            let offset = (index + self.len - start) % self.len;
            if offset < self.length_of(pos) {
                return pos;
            }
        }
        // Full cyclic cover guarantees a hit; a single segment covers all.
        0
    }

    /// True if some segment starts at the wrapped `index`.
    pub fn has_boundary_at(&self, index: usize) -> bool {
        let index = index % self.len;
        self.segments.iter().any(|s| s.start == index)
    }

    pub fn set_locked(&mut self, position: usize, locked: bool) {
        self.segments[position].locked = locked;
    }

    /// Rotate every boundary by `delta`, preserving length, name, lock
    /// state and adjacency. Lock flags do not pin boundaries here: this is
    /// the whole-outline rotation used when the index space itself moves.
    pub fn offset_all(&mut self, delta: isize) {
        let len = self.len as isize;
        for seg in &mut self.segments {
            seg.start = (seg.start as isize + delta).rem_euclid(len) as usize;
        }
    }

    /// Move the boundary at `old_anchor` to `new_anchor`, shifting unlocked
    /// boundaries by the same delta and leaving locked boundaries in place.
    ///
    /// Fails loudly if the anchor boundary itself is locked, if no boundary
    /// sits at `old_anchor`, or if a locked neighbour would be squeezed to
    /// nothing. Re-running with the same `new_anchor` is a no-op.
    pub fn relocate_anchor(
        &mut self,
        old_anchor: usize,
        new_anchor: usize,
    ) -> Result<(), SegmentUpdateError> {
        let old_anchor = old_anchor % self.len;
        let new_anchor = new_anchor % self.len;

        let anchor_pos = self
            .segments
            .iter()
            .position(|s| s.start == old_anchor)
            .ok_or(SegmentUpdateError::NoBoundaryAtAnchor { index: old_anchor })?;

        let delta = (new_anchor as isize - old_anchor as isize).rem_euclid(self.len as isize);
        if delta == 0 {
            return Ok(());
        }
        if self.segments[anchor_pos].locked {
            return Err(SegmentUpdateError::LockedBoundary {
                name: self.segments[anchor_pos].name.clone(),
            });
        }

        let mut moved = self.clone();
        for seg in &mut moved.segments {
            if !seg.locked {
                seg.start = (seg.start as isize + delta).rem_euclid(self.len as isize) as usize;
            }
        }

        // Locked boundaries stayed put while their neighbours moved; the
        // partition is only valid if every segment kept at least one index
        // and the cyclic order survived.
        for pos in 0..moved.count() {
            if moved.length_of(pos) == 0 {
                return Err(SegmentUpdateError::EmptySegment {
                    name: moved.segments[pos].name.clone(),
                });
            }
        }
        let total: usize = (0..moved.count()).map(|p| moved.length_of(p)).sum();
        if total != moved.len {
            return Err(SegmentUpdateError::EmptySegment {
                name: moved.segments[0].name.clone(),
            });
        }

        *self = moved;
        Ok(())
    }

    /// Remap all boundaries under index reversal (`i -> len-1-i`).
    ///
    /// A half-open slice `[start, end)` maps to `[len-end, len-start)`, and
    /// cyclic order flips. Applying twice restores the original exactly.
    pub fn reverse(&mut self) {
        let len = self.len;
        let count = self.segments.len();
        let mut reversed: Vec<Segment> = Vec::with_capacity(count);
        for pos in (0..count).rev() {
            let end = self.end_of(pos);
            let mut seg = self.segments[pos].clone();
            seg.start = (len - end) % len;
            reversed.push(seg);
        }
        self.segments = reversed;
    }
}
