#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analyzer;
pub mod config;
pub mod nucleus;
pub mod rules;

// Lower-level building blocks – public for tools and tests, but more
// likely to shift than the surface above.
pub mod orient;
pub mod profile;
pub mod resolver;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

// Main entry points: analyzer + results.
pub use crate::analyzer::OutlineAnalyzer;
pub use crate::nucleus::{AnalysisReport, Nucleus, ProfileSet, ResolvedLandmark};

// Configuration surface.
pub use crate::rules::{
    presets, Landmark, OrientationMark, ProfileKind, Rule, RuleApplication, RuleSet,
    RuleSetCollection,
};

// Orientation outcome carried by the report.
pub use crate::orient::{OrientationOutcome, OrientationState};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::profile::CircularProfile;
    pub use crate::rules::presets;
    pub use crate::{Nucleus, OutlineAnalyzer, ProfileKind, ProfileSet, RuleSetCollection};
}
