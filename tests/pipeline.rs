mod common;

use common::synthetic_profile::{
    hooked_outline, hooked_outline_reversed, round_outline, HOOK_LEN, HOOK_TAIL_SOCKET, HOOK_TIP,
    HOOK_VENTRAL_LOWER, HOOK_VENTRAL_UPPER,
};
use landmark_detector::orient::OrientationOutcome;
use landmark_detector::rules::{presets, Rule, RuleSet};
use landmark_detector::{
    config, Landmark, OrientationMark, OutlineAnalyzer, ProfileKind, RuleSetCollection,
};

#[test]
fn hooked_outline_resolves_all_landmarks() {
    let analyzer = OutlineAnalyzer::new(presets::hooked()).unwrap();
    let nucleus = analyzer.process(hooked_outline());
    let report = nucleus.report("Hooked");

    assert_eq!(report.length, HOOK_LEN);
    assert_eq!(report.orientation, OrientationOutcome::Correct);
    assert_eq!(report.landmarks["tip of hook"].index, HOOK_TIP);
    assert_eq!(report.landmarks["tail socket"].index, HOOK_TAIL_SOCKET);
    assert_eq!(report.landmarks["ventral upper"].index, HOOK_VENTRAL_UPPER);
    assert_eq!(report.landmarks["ventral lower"].index, HOOK_VENTRAL_LOWER);
    assert!(report.landmarks.values().all(|r| !r.defaulted));

    // Segmentation is anchored at the reference landmark.
    assert!(report.segments.iter().any(|s| s.start == HOOK_TIP));
}

#[test]
fn reversed_outline_is_corrected_to_the_same_landmarks() {
    let analyzer = OutlineAnalyzer::new(presets::hooked()).unwrap();
    let forward = analyzer.process(hooked_outline()).report("Hooked");
    let corrected = analyzer.process(hooked_outline_reversed()).report("Hooked");

    assert_eq!(corrected.orientation, OrientationOutcome::Reversed);
    assert_eq!(corrected.landmarks, forward.landmarks);
    assert_eq!(corrected.segments, forward.segments);
}

#[test]
fn round_outline_anchors_at_the_longest_diameter() {
    let analyzer = OutlineAnalyzer::new(presets::round()).unwrap();
    let nucleus = analyzer.process(round_outline(60, 23));
    let report = nucleus.report("Round");

    assert_eq!(report.landmarks["longest axis"].index, 23);
    assert!(report.segments.iter().any(|s| s.start == 23));
}

#[test]
fn reloaded_collection_resolves_identically() {
    let dir = std::env::temp_dir().join("landmark_detector_pipeline_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("hooked.json");

    config::save_collection(&path, &presets::hooked()).unwrap();
    let reloaded = config::load_collection(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let original = OutlineAnalyzer::new(presets::hooked()).unwrap();
    let roundtripped = OutlineAnalyzer::new(reloaded).unwrap();
    assert_eq!(
        original.process(hooked_outline()).report("Hooked"),
        roundtripped.process(hooked_outline()).report("Hooked")
    );
}

#[test]
fn unresolvable_landmark_defaults_to_zero_without_aborting() {
    // No angle value is negative, so the chain always empties.
    let collection = RuleSetCollection::builder("Impossible")
        .rule_set(
            "nowhere",
            RuleSet::new(ProfileKind::Angle, vec![Rule::ValueLessThan { value: -1.0 }]),
        )
        .orientation(OrientationMark::Reference, "nowhere")
        .build(&ProfileKind::ALL)
        .unwrap();

    let analyzer = OutlineAnalyzer::new(collection).unwrap();
    let nucleus = analyzer.process(round_outline(40, 7));
    let resolved = nucleus.landmark(&Landmark::new("nowhere")).unwrap();
    assert_eq!(resolved.index, 0);
    assert!(resolved.defaulted);
    assert!(nucleus.segments().unwrap().has_boundary_at(0));
}
