use pedestrian_detector::config::scale_table::load_config;
use pedestrian_detector::diagnostics::ScaleTableReport;
use pedestrian_detector::io::write_json_file;
use pedestrian_detector::IntegralChannelsDetector;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let input = config.input.resolve()?;

    let mut detector = IntegralChannelsDetector::from_pyramid(
        config.model.clone(),
        config.detector.clone(),
        input,
        config.pyramid.clone(),
    )
    .map_err(|e| format!("Failed to build detector: {e}"))?;

    if let Some(ground_plane) = &config.ground_plane {
        let corridor = ground_plane
            .corridor(input)
            .map_err(|e| format!("Failed to estimate ground plane corridor: {e}"))?;
        detector
            .set_ground_plane_corridor(corridor.rows())
            .map_err(|e| format!("Failed to apply ground plane corridor: {e}"))?;
    }

    let geometry = detector.geometry();
    let report = ScaleTableReport::from_geometry(&geometry);
    println!(
        "{}x{} input, {} scales, {} window positions, built in {:.3} ms",
        input.width,
        input.height,
        geometry.len(),
        report.total_positions(),
        geometry.build_ms()
    );
    if let Some(pruning) = detector.last_pruning() {
        println!(
            "ground plane corridor: expected speed gain {:.2}x",
            pruning.expected_speed_gain()
        );
    }

    if let Some(path) = &config.output.scales_json {
        write_json_file(path, &report)?;
        println!("Saved scale table to {}", path.display());
    }
    if let (Some(path), Some(pruning)) = (&config.output.pruning_json, detector.last_pruning()) {
        write_json_file(path, pruning)?;
        println!("Saved pruning summary to {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: scale_table_demo <config.json>".to_string()
}
