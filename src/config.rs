//! JSON persistence for rule set collections.
//!
//! Collections round-trip through serde: a reloaded collection resolves
//! the same landmark indices as the one that was saved. Loading validates
//! the document, so a malformed collection fails here, before any outline
//! is processed.

use crate::rules::{ProfileKind, RuleSetCollection};
use std::fs;
use std::path::Path;

pub fn load_collection(path: &Path) -> Result<RuleSetCollection, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read collection {}: {e}", path.display()))?;
    let collection: RuleSetCollection = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse collection {}: {e}", path.display()))?;
    collection
        .validate(&ProfileKind::ALL)
        .map_err(|e| format!("Invalid collection {}: {e}", path.display()))?;
    Ok(collection)
}

pub fn save_collection(path: &Path, collection: &RuleSetCollection) -> Result<(), String> {
    let contents = serde_json::to_string_pretty(collection)
        .map_err(|e| format!("Failed to serialize collection '{}': {e}", collection.name()))?;
    fs::write(path, contents)
        .map_err(|e| format!("Failed to write collection {}: {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::presets;

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join("landmark_detector_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hooked.json");

        let original = presets::hooked();
        save_collection(&path, &original).unwrap();
        let reloaded = load_collection(&path).unwrap();
        assert_eq!(reloaded, original);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn loading_a_malformed_document_fails_with_context() {
        let dir = std::env::temp_dir().join("landmark_detector_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_collection(&path).unwrap_err();
        assert!(err.contains("Failed to parse"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn loading_a_missing_file_fails_with_context() {
        let err = load_collection(Path::new("/nonexistent/collection.json")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
