mod common;

use common::fixtures::{constant_corridor, flat_ground, init_logging, level_camera, linear_corridor};
use pedestrian_detector::detector::{DetectorOptions, IntegralChannelsDetector};
use pedestrian_detector::geometry::{BoundingBox, DetectionWindowSize, ImageSize, SearchRange, Stride};
use pedestrian_detector::ground_plane::estimate_corridor;
use pedestrian_detector::model::ModelGeometry;
use pedestrian_detector::pyramid::ScalePyramidOptions;
use pedestrian_detector::types::Stixel;
use pedestrian_detector::{ConfigError, DetectorError, GeometryFault};
use std::sync::Arc;

const VGA: ImageSize = ImageSize {
    width: 640,
    height: 480,
};

/// Scale whose 64x128 model window becomes exactly 100 px tall.
const HUNDRED_PX_SCALE: f32 = 0.781_25;

fn single_scale(range: SearchRange) -> IntegralChannelsDetector<ModelGeometry> {
    IntegralChannelsDetector::new(
        ModelGeometry::default(),
        DetectorOptions::default(),
        VGA,
        vec![range],
    )
    .expect("detector")
}

fn octave_pyramid(options: DetectorOptions) -> IntegralChannelsDetector<ModelGeometry> {
    IntegralChannelsDetector::from_pyramid(
        ModelGeometry::default(),
        options,
        VGA,
        ScalePyramidOptions::new(0.5, 4.0, 4),
    )
    .expect("pyramid detector")
}

#[test]
fn unit_scale_full_frame_geometry() {
    init_logging();
    let detector = single_scale(SearchRange::new(1.0, 1.0, 0, 0, 576, 352));
    let geometry = detector.geometry();
    assert_eq!(geometry.generation(), 1);
    assert!(!geometry.corridor_applied());

    let scale = &geometry.scales()[0];
    assert_eq!(scale.channel_image_size(4), ImageSize::new(160, 120));
    assert_eq!(scale.stride, Stride::new(2, 2));
    assert_eq!(scale.scaled_detection_window_size, DetectionWindowSize::new(64, 128));
    assert_eq!(
        detector.scale_templates()[0].channel_window_size(4),
        DetectionWindowSize::new(16, 32)
    );
    let range = scale.scaled_search_range;
    assert_eq!((range.max_x, range.max_y), (144, 88));
    assert!(range.max_x + 16 <= 160 && range.max_y + 32 <= 120);
}

#[test]
fn corridor_narrows_band_to_twice_the_margin() {
    init_logging();
    let mut detector = single_scale(SearchRange::new(HUNDRED_PX_SCALE, 1.0, 0, 0, 587, 378));
    assert_eq!(
        detector.geometry().scales()[0].scaled_detection_window_size.height,
        100
    );

    detector
        .set_ground_plane_corridor(&linear_corridor(480, 200))
        .expect("corridor");
    let geometry = detector.geometry();
    assert_eq!(geometry.generation(), 2);
    assert!(geometry.corridor_applied());

    // 100 px objects stand on row 300, their top sits on row 200
    let range = geometry.search_ranges()[0];
    assert_eq!((range.min_y, range.max_y), (190, 210));
    assert_eq!((range.min_x, range.max_x), (0, 587));

    let pruning = detector.last_pruning().expect("pruning report");
    assert_eq!(pruning.scales[0].updated_height(), 20);
    assert!(pruning.expected_speed_gain() > 10.0);
}

#[test]
fn corridor_band_is_clipped_when_the_match_is_near_the_top() {
    let mut detector = single_scale(SearchRange::new(HUNDRED_PX_SCALE, 1.0, 0, 0, 587, 378));
    detector
        .set_ground_plane_corridor(&constant_corridor(480, 100, 100))
        .expect("corridor");
    let range = detector.geometry().search_ranges()[0];
    assert_eq!((range.min_y, range.max_y), (0, 10));
}

#[test]
fn clearing_the_corridor_restores_base_ranges() {
    let base = SearchRange::new(HUNDRED_PX_SCALE, 1.0, 0, 0, 587, 378);
    let mut detector = single_scale(base);
    detector
        .set_ground_plane_corridor(&linear_corridor(480, 200))
        .expect("corridor");
    detector.clear_ground_plane_corridor().expect("clear");

    let geometry = detector.geometry();
    assert_eq!(geometry.generation(), 3);
    assert_eq!(geometry.search_ranges(), &[base]);
    assert!(detector.last_pruning().is_none());
    assert!(detector.ground_plane_corridor().is_none());
}

#[test]
fn repeated_corridors_prune_from_the_base_ranges() {
    let mut detector = single_scale(SearchRange::new(HUNDRED_PX_SCALE, 1.0, 0, 0, 587, 378));
    detector
        .set_ground_plane_corridor(&linear_corridor(480, 200))
        .expect("first corridor");
    detector
        .set_ground_plane_corridor(&linear_corridor(480, 150))
        .expect("second corridor");
    // row 250 matches; band [140, 160] lies outside the first band
    let range = detector.geometry().search_ranges()[0];
    assert_eq!((range.min_y, range.max_y), (140, 160));
}

#[test]
fn held_snapshot_survives_a_rebuild() {
    let mut detector = single_scale(SearchRange::new(HUNDRED_PX_SCALE, 1.0, 0, 0, 587, 378));
    let before = detector.geometry();
    detector
        .set_ground_plane_corridor(&linear_corridor(480, 200))
        .expect("corridor");
    let after = detector.geometry();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.generation(), 1);
    assert_eq!(before.search_ranges()[0].max_y, 378);
    assert_eq!(after.search_ranges()[0].max_y, 210);
}

#[test]
fn corridor_of_wrong_length_is_rejected() {
    let mut detector = single_scale(SearchRange::new(1.0, 1.0, 0, 0, 576, 352));
    let err = detector
        .set_ground_plane_corridor(&linear_corridor(479, 200))
        .unwrap_err();
    assert_eq!(
        err,
        DetectorError::Config(ConfigError::CorridorLength {
            expected: 480,
            actual: 479
        })
    );
    assert_eq!(detector.geometry().generation(), 1);
}

#[test]
fn corridor_tops_below_the_foot_row_are_rejected() {
    let mut detector = single_scale(SearchRange::new(1.0, 1.0, 0, 0, 576, 352));
    let inverted: Vec<i32> = (0..480)
        .map(|v| if v >= 200 { v + 50 } else { -1 })
        .collect();
    let err = detector.set_ground_plane_corridor(&inverted).unwrap_err();
    assert_eq!(
        err,
        DetectorError::Config(ConfigError::InvalidCorridorEntry { row: 200, top: 250 })
    );

    let mut huge = linear_corridor(480, 200);
    huge[0] = i32::MAX;
    let err = detector.set_ground_plane_corridor(&huge).unwrap_err();
    assert_eq!(
        err,
        DetectorError::Config(ConfigError::InvalidCorridorEntry {
            row: 0,
            top: i32::MAX
        })
    );

    // a top on the foot row itself has zero height
    let mut flat = linear_corridor(480, 200);
    flat[300] = 300;
    assert!(detector.set_ground_plane_corridor(&flat).is_err());

    assert_eq!(detector.geometry().generation(), 1);
    assert!(detector.ground_plane_corridor().is_none());
}

#[test]
fn border_and_corridor_cannot_be_combined() {
    let mut detector = IntegralChannelsDetector::new(
        ModelGeometry::default(),
        DetectorOptions {
            additional_border: 6,
            ..Default::default()
        },
        VGA,
        vec![SearchRange::new(1.0, 1.0, 6, 6, 570, 346)],
    )
    .expect("detector");
    let err = detector
        .set_ground_plane_corridor(&linear_corridor(468, 200))
        .unwrap_err();
    assert_eq!(
        err,
        DetectorError::Config(ConfigError::BorderWithCorridor { border: 6 })
    );
}

#[test]
fn model_shrinking_factor_must_match_the_channels() {
    let model = ModelGeometry {
        shrinking_factor: 2,
        ..Default::default()
    };
    let err = IntegralChannelsDetector::new(
        model,
        DetectorOptions::default(),
        VGA,
        vec![SearchRange::new(1.0, 1.0, 0, 0, 576, 352)],
    )
    .err()
    .expect("mismatch rejected");
    assert_eq!(
        err,
        DetectorError::Config(ConfigError::ShrinkingFactorMismatch {
            model: 2,
            channels: 4
        })
    );
}

#[test]
fn oversized_configured_range_is_a_geometry_fault() {
    let err = IntegralChannelsDetector::new(
        ModelGeometry::default(),
        DetectorOptions::default(),
        VGA,
        vec![SearchRange::new(1.0, 1.0, 0, 0, 576, 356)],
    )
    .err()
    .expect("overflow rejected");
    assert!(
        matches!(
            err,
            DetectorError::Geometry(GeometryFault::WindowOverflow { scale_index: 0, .. })
        ),
        "unexpected error {err:?}"
    );
}

#[test]
fn resolution_change_regenerates_pyramid_ranges() {
    init_logging();
    let mut detector = octave_pyramid(DetectorOptions::default());
    let before = detector.geometry();
    assert_eq!(before.len(), 4);
    assert!(!before.search_ranges()[1].is_null());
    assert!(before.search_ranges()[3].is_null());

    detector
        .set_input_size(ImageSize::new(320, 240))
        .expect("resize");
    let after = detector.geometry();
    assert_eq!(after.generation(), 2);
    assert_eq!(after.len(), 4);
    assert_eq!(after.input_size(), ImageSize::new(320, 240));
    assert!(after.search_ranges()[1].max_y < before.search_ranges()[1].max_y);

    // same size again is a no-op
    detector
        .set_input_size(ImageSize::new(320, 240))
        .expect("same size");
    assert_eq!(detector.geometry().generation(), 2);
}

#[test]
fn resolution_change_drops_a_mismatched_corridor() {
    let mut detector = octave_pyramid(DetectorOptions::default());
    detector
        .set_ground_plane_corridor(&linear_corridor(480, 240))
        .expect("corridor");
    detector
        .set_input_size(ImageSize::new(320, 240))
        .expect("resize");
    assert!(detector.ground_plane_corridor().is_none());
    assert!(!detector.geometry().corridor_applied());
}

#[test]
fn scale_order_and_neighbourhood() {
    let detector = octave_pyramid(DetectorOptions {
        stixels_scales_margin: 1,
        ..Default::default()
    });
    assert_eq!(detector.scale_order(), vec![0, 1, 2, 3]);
    // window heights 64, 128, 256, 512
    assert_eq!(detector.scale_neighbourhood(250), vec![1, 2, 3]);
    assert_eq!(detector.scale_neighbourhood(10), vec![0, 1]);

    let all = octave_pyramid(DetectorOptions {
        stixels_scales_margin: 0,
        ..Default::default()
    });
    assert_eq!(all.scale_neighbourhood(250), vec![0, 1, 2, 3]);
}

#[test]
fn stixels_select_scales_per_column() {
    let mut detector = octave_pyramid(DetectorOptions {
        stixels_scales_margin: 1,
        ..Default::default()
    });
    let short = vec![
        Stixel {
            x: 0,
            bottom_y: 300,
            top_y: 170,
        };
        639
    ];
    assert_eq!(
        detector.set_stixels(&short),
        Err(ConfigError::StixelsLength {
            expected: 640,
            actual: 639
        })
    );
    assert!(detector.scales_for_stixel(0).is_none());

    let stixels: Vec<Stixel> = (0..640)
        .map(|x| Stixel {
            x,
            bottom_y: 300,
            top_y: 170,
        })
        .collect();
    detector.set_stixels(&stixels).expect("stixels");
    assert_eq!(detector.scales_for_stixel(10), Some(vec![0, 1, 2]));
    assert!(detector.scales_for_stixel(640).is_none());
}

#[test]
fn detections_map_back_to_input_pixels() {
    let detector = octave_pyramid(DetectorOptions::default());
    let mut detections = Vec::new();
    // scale 2 (index 2): one channel pixel is 8 input pixels
    detector
        .add_detection(2, 12, 20, 1.5, &mut detections)
        .expect("known scale");
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].bounding_box, BoundingBox::new(96, 160, 224, 416));
    assert_eq!(detections[0].score, 1.5);

    let err = detector
        .add_detection(7, 0, 0, 0.0, &mut detections)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownScale {
            scale_index: 7,
            num_scales: 4
        }
    );
    assert_eq!(detections.len(), 1);

    detector.add_detection_for_bootstrapping(3, 4, -1.0, &mut detections);
    assert_eq!(detections[1].bounding_box, BoundingBox::new(3, 4, 19, 36));
}

#[test]
fn estimated_corridor_prunes_the_default_pyramid() {
    init_logging();
    let mut detector = IntegralChannelsDetector::from_pyramid(
        ModelGeometry::default(),
        DetectorOptions::default(),
        VGA,
        ScalePyramidOptions::default(),
    )
    .expect("default pyramid");
    let corridor =
        estimate_corridor(&level_camera(), &flat_ground(), 640, 480, 1.8).expect("corridor");
    detector
        .set_ground_plane_corridor(corridor.rows())
        .expect("pruned geometry");

    let geometry = detector.geometry();
    for (range, base) in geometry
        .search_ranges()
        .iter()
        .zip(detector.base_search_ranges())
    {
        assert!(range.min_y >= base.min_y && range.max_y <= base.max_y);
    }
    let pruning = detector.last_pruning().expect("report");
    assert!(pruning.expected_speed_gain() > 1.0);
}
