mod common;

use common::fixtures::init_logging;
use pedestrian_detector::config::scale_table::load_config;
use pedestrian_detector::detector::{IntegralChannelsDetector, WindowAnchor};
use pedestrian_detector::diagnostics::ScaleTableReport;
use pedestrian_detector::geometry::ImageSize;
use pedestrian_detector::io::write_json_file;
use std::fs;
use std::path::Path;

#[test]
fn bundled_config_builds_a_pruned_table() {
    init_logging();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/scale_table.json");
    let config = load_config(&path).expect("bundled config");
    let input = config.input.resolve().expect("input size");
    assert_eq!(input, ImageSize::new(640, 480));
    assert_eq!(config.pyramid.num_scales, 55);
    assert_eq!(config.detector.window_anchor, WindowAnchor::TopLeft);

    let mut detector = IntegralChannelsDetector::from_pyramid(
        config.model.clone(),
        config.detector.clone(),
        input,
        config.pyramid.clone(),
    )
    .expect("detector");
    let ground_plane = config.ground_plane.as_ref().expect("ground plane section");
    let corridor = ground_plane.corridor(input).expect("corridor");
    assert_eq!(corridor.horizon_row(), Some(241));
    detector
        .set_ground_plane_corridor(corridor.rows())
        .expect("pruned geometry");

    let report = ScaleTableReport::from_geometry(&detector.geometry());
    assert_eq!(report.scales.len(), 55);
    assert!(report.corridor_applied);
    assert!(report.total_positions() > 0);
}

#[test]
fn image_input_and_reports_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("frame.png");
    image::GrayImage::new(320, 240)
        .save(&image_path)
        .expect("save png");

    let config_path = dir.path().join("config.json");
    let scales_json = dir.path().join("out/scales.json");
    let config = serde_json::json!({
        "input": { "image": image_path },
        "pyramid": { "min_scale": 0.5, "max_scale": 2.0, "num_scales": 3 },
        "detector": { "x_stride": 4, "y_stride": 4 },
        "output": { "scales_json": scales_json }
    });
    fs::write(&config_path, config.to_string()).expect("write config");

    let config = load_config(&config_path).expect("config");
    let input = config.input.resolve().expect("image header");
    assert_eq!(input, ImageSize::new(320, 240));

    let detector = IntegralChannelsDetector::from_pyramid(
        config.model.clone(),
        config.detector.clone(),
        input,
        config.pyramid.clone(),
    )
    .expect("detector");
    let report = ScaleTableReport::from_geometry(&detector.geometry());
    let out = config.output.scales_json.as_ref().expect("output path");
    write_json_file(out, &report).expect("write report");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out).expect("read report")).expect("json");
    assert_eq!(written["scales"].as_array().map(Vec::len), Some(3));
    assert_eq!(written["input"]["width"], 320);
    // base stride 4 at scale one is one channel pixel
    assert_eq!(written["scales"][1]["stride"]["x"], 1);
}

#[test]
fn unreadable_config_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write");
    let err = load_config(&path).unwrap_err();
    assert!(err.contains("Failed to parse config"), "{err}");
    assert!(err.contains("broken.json"), "{err}");
}
