//! Write a built-in rule set collection to a JSON file, as a starting
//! point for custom configurations.
//!
//! Usage: collection_export <hooked|symmetric|round> <out.json>

use landmark_detector::config;
use landmark_detector::rules::presets;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let usage = "Usage: collection_export <hooked|symmetric|round> <out.json>";

    let name = args.next().ok_or_else(|| usage.to_string())?;
    let out: PathBuf = args.next().ok_or_else(|| usage.to_string())?.into();

    let collection = match name.as_str() {
        "hooked" => presets::hooked(),
        "symmetric" => presets::symmetric(),
        "round" => presets::round(),
        other => return Err(format!("Unknown preset '{other}'. {usage}")),
    };

    config::save_collection(&out, &collection)?;
    println!("Collection '{}' written to {}", collection.name(), out.display());
    Ok(())
}
