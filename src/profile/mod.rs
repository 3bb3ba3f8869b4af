//! Circular profile primitives.
//!
//! A [`CircularProfile`] is an immutable, fixed-length sequence of per-point
//! measurements taken around a closed outline. Index arithmetic is modulo
//! the profile length and lives in exactly one place ([`CircularProfile::wrap`]);
//! callers never compute wrap-around offsets themselves, which avoids the
//! class of bugs where different call sites wrap inconsistently.
//!
//! The module also provides the sliding-window operations the rule engine
//! builds on: neighbourhood extraction, mean smoothing and local-extremum
//! detection under a monotone walk-out criterion.

mod mask;

pub use mask::IndexMask;

use serde::{Deserialize, Serialize};

/// Which side of an index a window is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Values at decreasing indices, nearest first.
    Before,
    /// Values at increasing indices, nearest first.
    After,
}

/// Kind of local extremum to detect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extremum {
    Minimum,
    Maximum,
}

/// Errors raised when constructing profiles or profile sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileError {
    /// A profile must contain at least one value.
    Empty,
    /// Profiles of one outline must share a length.
    LengthMismatch { expected: usize, found: usize },
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Empty => write!(f, "profile must contain at least one value"),
            ProfileError::LengthMismatch { expected, found } => {
                write!(f, "profile length {found} does not match outline length {expected}")
            }
        }
    }
}

impl std::error::Error for ProfileError {}

/// An ordered, fixed-length sequence of real values with wrap-around index
/// arithmetic. Index 0 has no geometric meaning until a landmark fixes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct CircularProfile {
    values: Vec<f32>,
}

impl TryFrom<Vec<f32>> for CircularProfile {
    type Error = ProfileError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        CircularProfile::new(values)
    }
}

impl From<CircularProfile> for Vec<f32> {
    fn from(p: CircularProfile) -> Self {
        p.values
    }
}

impl CircularProfile {
    /// Build a profile from raw values. Fails only on an empty sequence.
    pub fn new(values: Vec<f32>) -> Result<Self, ProfileError> {
        if values.is_empty() {
            return Err(ProfileError::Empty);
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Profiles are never empty; provided for clippy symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Normalize any signed index into `[0, len)`.
    #[inline]
    pub fn wrap(&self, index: isize) -> usize {
        index.rem_euclid(self.values.len() as isize) as usize
    }

    /// Value at the wrapped index.
    #[inline]
    pub fn value_at(&self, index: isize) -> f32 {
        self.values[self.wrap(index)]
    }

    /// The `size` values strictly before or after `index`, nearest first,
    /// wrapping as needed. Any `size` is safe: every lookup resolves.
    pub fn window(&self, index: usize, size: usize, direction: Direction) -> Vec<f32> {
        let step: isize = match direction {
            Direction::Before => -1,
            Direction::After => 1,
        };
        (1..=size as isize)
            .map(|j| self.value_at(index as isize + j * step))
            .collect()
    }

    /// Mean-smoothed copy: each value becomes the unweighted mean of itself
    /// and `window_size` neighbours on each side (`2*window_size+1` samples).
    pub fn smooth(&self, window_size: usize) -> CircularProfile {
        assert!(window_size >= 1, "smoothing window must be at least 1");
        let samples = (window_size * 2 + 1) as f32;
        let values = (0..self.values.len())
            .map(|i| {
                let mut sum = self.values[i];
                for j in 1..=window_size as isize {
                    sum += self.value_at(i as isize - j);
                    sum += self.value_at(i as isize + j);
                }
                sum / samples
            })
            .collect();
        CircularProfile { values }
    }

    /// Mask of local extrema under a sliding window.
    ///
    /// Index `i` qualifies only if walking outward `window_size` steps on
    /// both sides is strictly monotone away from the extreme: the first
    /// neighbour on each side must beat the centre, and every further step
    /// must beat the previous step in that direction. A point that is merely
    /// extreme relative to its centre does not qualify.
    pub fn local_extrema(&self, window_size: usize, kind: Extremum) -> IndexMask {
        assert!(window_size >= 1, "extremum window must be at least 1");
        // "outer beats inner" comparison: strictly greater walking away from
        // a minimum, strictly less walking away from a maximum.
        let outward = |outer: f32, inner: f32| match kind {
            Extremum::Minimum => outer > inner,
            Extremum::Maximum => outer < inner,
        };

        let mut mask = IndexMask::new(self.values.len(), false);
        for i in 0..self.values.len() {
            let before = self.window(i, window_size, Direction::Before);
            let after = self.window(i, window_size, Direction::After);

            let mut ok = outward(before[0], self.values[i]) && outward(after[0], self.values[i]);
            for k in 1..window_size {
                ok = ok && outward(before[k], before[k - 1]) && outward(after[k], after[k - 1]);
            }
            mask.set(i, ok);
        }
        mask
    }

    /// Index of the smallest value among mask candidates; ties resolve to
    /// the lowest index. `None` when the mask has no candidates.
    pub fn min_index(&self, mask: &IndexMask) -> Option<usize> {
        self.extreme_index(mask, |candidate, best| candidate < best)
    }

    /// Index of the largest value among mask candidates; ties resolve to
    /// the lowest index. `None` when the mask has no candidates.
    pub fn max_index(&self, mask: &IndexMask) -> Option<usize> {
        self.extreme_index(mask, |candidate, best| candidate > best)
    }

    fn extreme_index(&self, mask: &IndexMask, better: impl Fn(f32, f32) -> bool) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in mask.indices() {
            match best {
                None => best = Some(i),
                Some(b) if better(self.values[i], self.values[b]) => best = Some(i),
                _ => {}
            }
        }
        best
    }

    /// Copy with the index direction reversed (`i -> len-1-i`).
    pub fn reversed(&self) -> CircularProfile {
        let mut values = self.values.clone();
        values.reverse();
        CircularProfile { values }
    }

    /// Copy rotated so the wrapped `index` becomes index 0.
    pub fn start_from(&self, index: isize) -> CircularProfile {
        let start = self.wrap(index);
        let mut values = Vec::with_capacity(self.values.len());
        values.extend_from_slice(&self.values[start..]);
        values.extend_from_slice(&self.values[..start]);
        CircularProfile { values }
    }

    /// Linear resampling to `new_len` points over the same circular domain.
    pub fn interpolate(&self, new_len: usize) -> CircularProfile {
        assert!(new_len >= 1, "interpolation target must be at least 1");
        if new_len == self.values.len() {
            return self.clone();
        }
        let n = self.values.len();
        let values = (0..new_len)
            .map(|i| {
                let pos = i as f32 * n as f32 / new_len as f32;
                let lo = pos.floor() as isize;
                let frac = pos - pos.floor();
                let a = self.value_at(lo);
                let b = self.value_at(lo + 1);
                a + (b - a) * frac
            })
            .collect();
        CircularProfile { values }
    }

    /// Sum of squared differences against `other`, resampling `other` to
    /// this profile's length first.
    pub fn absolute_square_difference(&self, other: &CircularProfile) -> f32 {
        let resampled = other.interpolate(self.values.len());
        self.values
            .iter()
            .zip(resampled.values.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Rotation offset that best aligns this profile with `template`:
    /// the `k` minimizing the squared difference of `start_from(k)` against
    /// the template. Ties resolve to the smallest offset.
    pub fn best_fit_offset(&self, template: &CircularProfile) -> usize {
        let mut best_k = 0usize;
        let mut best_score = f32::INFINITY;
        for k in 0..self.values.len() {
            let score = self.start_from(k as isize).absolute_square_difference(template);
            if score < best_score {
                best_score = score;
                best_k = k;
            }
        }
        best_k
    }
}
