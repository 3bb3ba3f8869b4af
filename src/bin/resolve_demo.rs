//! Resolve landmarks on an outline stored as JSON.
//!
//! Usage: resolve_demo <outline.json> [--collection <collection.json>]
//!                     [--json-out <report.json>]
//!
//! The outline document maps profile kinds to value arrays:
//! `{"profiles": {"Angle": [178.2, ...], "Diameter": [10.4, ...]}}`.
//! Without `--collection` the built-in round preset is used.

use landmark_detector::config;
use landmark_detector::nucleus::AnalysisReport;
use landmark_detector::profile::CircularProfile;
use landmark_detector::rules::presets;
use landmark_detector::{OutlineAnalyzer, ProfileKind, ProfileSet};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[derive(Deserialize)]
struct OutlineDocument {
    profiles: BTreeMap<ProfileKind, CircularProfile>,
}

struct CliOptions {
    outline_path: PathBuf,
    collection_path: Option<PathBuf>,
    json_out: Option<PathBuf>,
}

fn run() -> Result<(), String> {
    let options = parse_cli()?;

    let collection = match &options.collection_path {
        Some(path) => config::load_collection(path)?,
        None => presets::round(),
    };
    let profiles = load_outline(&options.outline_path)?;

    let analyzer = OutlineAnalyzer::new(collection.clone())
        .map_err(|e| format!("Invalid collection '{}': {e}", collection.name()))?;
    let nucleus = analyzer.process(profiles);
    let report = nucleus.report(collection.name());

    print_text_summary(&report);

    if let Some(path) = &options.json_out {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {e}"))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write report {}: {e}", path.display()))?;
        println!("\nJSON report written to {}", path.display());
    }

    Ok(())
}

fn parse_cli() -> Result<CliOptions, String> {
    let mut args = env::args().skip(1);
    let mut outline_path = None;
    let mut collection_path = None;
    let mut json_out = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--collection" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--collection requires a path".to_string())?;
                collection_path = Some(PathBuf::from(value));
            }
            "--json-out" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--json-out requires a path".to_string())?;
                json_out = Some(PathBuf::from(value));
            }
            _ if outline_path.is_none() => outline_path = Some(PathBuf::from(arg)),
            _ => return Err(format!("Unexpected argument '{arg}'")),
        }
    }

    Ok(CliOptions {
        outline_path: outline_path.ok_or_else(|| {
            "Usage: resolve_demo <outline.json> [--collection <path>] [--json-out <path>]"
                .to_string()
        })?,
        collection_path,
        json_out,
    })
}

fn load_outline(path: &Path) -> Result<ProfileSet, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read outline {}: {e}", path.display()))?;
    let document: OutlineDocument = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse outline {}: {e}", path.display()))?;

    let mut builder = ProfileSet::builder();
    for (kind, profile) in document.profiles {
        builder = builder.with(kind, profile);
    }
    builder
        .build()
        .map_err(|e| format!("Invalid outline {}: {e}", path.display()))
}

fn print_text_summary(report: &AnalysisReport) {
    println!("Analysis summary");
    println!("  collection: {}", report.collection);
    println!("  outline length: {}", report.length);
    println!("  orientation: {:?}", report.orientation);
    println!("  landmarks:");
    for (name, resolved) in &report.landmarks {
        let note = if resolved.defaulted { " (defaulted)" } else { "" };
        println!("    {name}: {}{note}", resolved.index);
    }
    println!("  segments:");
    for seg in &report.segments {
        let lock = if seg.locked { " [locked]" } else { "" };
        println!("    {}: [{}, {}){lock}", seg.name, seg.start, seg.end);
    }
}
