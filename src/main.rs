use landmark_detector::prelude::*;

fn main() {
    // Demo stub: builds a synthetic round outline and runs the analyzer
    let n = 120usize;
    let mut diameter = vec![10.0f32; n];
    for (i, d) in diameter.iter_mut().enumerate() {
        // gentle ellipse-like modulation, widest at index 30
        let phase = (i as f32 - 30.0) / n as f32 * std::f32::consts::TAU;
        *d += 2.0 * phase.cos();
    }
    let angle = vec![180.0f32; n];

    let profiles = ProfileSet::builder()
        .with(ProfileKind::Angle, CircularProfile::new(angle).unwrap())
        .with(ProfileKind::Diameter, CircularProfile::new(diameter).unwrap())
        .build()
        .unwrap();

    let analyzer = OutlineAnalyzer::new(presets::round()).unwrap();
    let nucleus = analyzer.process(profiles);
    let report = nucleus.report("Round");
    println!(
        "length={} orientation={:?} landmarks={} segments={}",
        report.length,
        report.orientation,
        report.landmarks.len(),
        report.segments.len()
    );
}
