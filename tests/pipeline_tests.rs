//! End-to-end tests: calibration files on disk through the assembled pipeline
use std::fs;
use std::path::Path;

use gcode_filter::config::{CalibrationSource, find_calibration};
use gcode_filter::filter::StringSink;
use gcode_filter::{
    CalibrationDocument, Config, ConfigError, LineFilter, MappingFilter, MappingMode, Pipeline,
    pipeline,
};
use tempfile::TempDir;

const MAP_JSON: &str = r#"{
  "map": [
    { "domain": [0, 0, 0], "range": [0, 0, 0] },
    { "domain": [0, 0, 1], "range": [0, 0, 1.01] },
    { "domain": [0, 1, 0], "range": [0, 1, 0.02] },
    { "domain": [0, 1, 1], "range": [0, 1, 1.02] }
  ]
}"#;

const MAP_TOML: &str = r#"
[[map]]
domain = [0, 0, 0]
range = [0, 0, 0]

[[map]]
domain = [0, 0, 1]
range = [0, 0, 1.01]

[[map]]
domain = [0, 1, 0]
range = [0, 1, 0.02]

[[map]]
domain = [0, 1, 1]
range = [0, 1, 1.02]
"#;

fn config_for(calibration: Option<CalibrationSource>) -> Config {
    Config {
        calibration,
        radius: None,
        delta: false,
        input: None,
        output: None,
        log_level: "info".to_string(),
    }
}

fn run_file(dir: &Path, config: Config, input: &str) -> Vec<String> {
    let input_path = dir.join("input.gcode");
    let output_path = dir.join("output.gcode");
    fs::write(&input_path, input).unwrap();

    let config = Config {
        input: Some(input_path),
        output: Some(output_path.clone()),
        ..config
    };
    pipeline::run(&config).unwrap();

    fs::read_to_string(&output_path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_json_calibration_end_to_end() {
    let doc = CalibrationDocument::from_json_str(MAP_JSON).unwrap();
    let (mut filter, result) =
        MappingFilter::with_document(StringSink::new(), MappingMode::Absolute, &doc);
    assert_eq!(result.unwrap(), 4);
    assert_eq!(filter.radius(), 1.0);

    filter.write_line("G0X0Y0Z1 E3F4").unwrap();
    filter.write_line("G28 Z1 Y0").unwrap();

    let sink = filter.into_next();
    assert_eq!(sink.lines(), ["G0X0Y0Z1.01E3F4", "G28X0Y0Z0"]);
}

#[test]
fn test_toml_calibration_file_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let calibration = temp_dir.path().join("bed.toml");
    fs::write(&calibration, MAP_TOML).unwrap();

    let config = config_for(Some(CalibrationSource {
        path: calibration,
        mode: Some(MappingMode::Absolute),
    }));
    let lines = run_file(
        temp_dir.path(),
        config,
        "; start\r\nG0X0Y0Z1 E3F4\r\nG28 Z1 Y0\r\nM104 S200\r\n",
    );

    assert_eq!(
        lines,
        ["; start", "G0X0Y0Z1.01E3F4", "G28X0Y0Z0", "M104 S200"]
    );
}

#[test]
fn test_delta_stage_after_mapping() {
    let temp_dir = TempDir::new().unwrap();
    let calibration = temp_dir.path().join("bed.json");
    fs::write(&calibration, MAP_JSON).unwrap();

    let config = Config {
        delta: true,
        ..config_for(Some(CalibrationSource {
            path: calibration,
            mode: None,
        }))
    };
    let lines = run_file(temp_dir.path(), config, "G0 Z1 F600\nG1 E2\nG28\n");

    assert_eq!(lines, ["G0X0Y0Z1.01F600", "G1X0Y0Z1.01E2", "G28X0Y0Z0"]);
}

#[test]
fn test_offsets_file_detected_from_document() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("calibration.json"),
        r#"{ "offsets": [ { "point": [0, 0, 0], "offset": [0, 0, 0.5] } ] }"#,
    )
    .unwrap();

    let source = find_calibration(&[temp_dir.path().to_path_buf()]).unwrap();
    assert_eq!(source.mode, None);

    let lines = run_file(temp_dir.path(), config_for(Some(source)), "G1 X10 Y20 Z1\n");
    assert_eq!(lines, ["G1X10Y20Z1.5"]);
}

#[test]
fn test_find_calibration_prefers_json() {
    let temp_dir = TempDir::new().unwrap();
    assert!(find_calibration(&[temp_dir.path().to_path_buf()]).is_none());

    fs::write(temp_dir.path().join("calibration.toml"), MAP_TOML).unwrap();
    let source = find_calibration(&[temp_dir.path().to_path_buf()]).unwrap();
    assert_eq!(source.path, temp_dir.path().join("calibration.toml"));

    fs::write(temp_dir.path().join("calibration.json"), MAP_JSON).unwrap();
    let source = find_calibration(&[temp_dir.path().to_path_buf()]).unwrap();
    assert_eq!(source.path, temp_dir.path().join("calibration.json"));
}

#[test]
fn test_bad_entries_are_skipped() {
    let doc = CalibrationDocument::from_json_str(
        r#"{
          "map": [
            { "domain": [0, 0, 0], "range": [1, 2, 3] },
            { "domain": [0, 0], "range": [0, 0, 1] },
            { "domain": [0, 0, 1], "range": [0, "zero", 1] },
            "not an entry"
          ]
        }"#,
    )
    .unwrap();

    let (mut filter, result) =
        MappingFilter::with_document(StringSink::new(), MappingMode::Absolute, &doc);
    match result {
        Err(ConfigError::InvalidEntries { rejected, accepted }) => {
            assert_eq!(accepted, 1);
            let indices: Vec<usize> = rejected.iter().map(|r| r.index).collect();
            assert_eq!(indices, [1, 2, 3]);
        }
        other => panic!("expected InvalidEntries, got {:?}", other),
    }

    // The valid entry still applies
    assert_eq!(filter.table().len(), 1);
    filter.write_line("G1 X1").unwrap();
    assert_eq!(&filter.next()[0], "G1X2Y2Z3");
}

#[test]
fn test_non_array_mapping_rejected() {
    let doc = CalibrationDocument::from_json_str(r#"{ "map": { "domain": [0, 0, 0] } }"#).unwrap();
    let (filter, result) =
        MappingFilter::with_document(StringSink::new(), MappingMode::Absolute, &doc);

    assert!(matches!(result, Err(ConfigError::NotAnArray { ref key }) if key == "map"));
    assert!(filter.table().is_empty());
}

#[test]
fn test_document_and_cli_radius() {
    let temp_dir = TempDir::new().unwrap();
    let calibration = temp_dir.path().join("bed.json");
    fs::write(
        &calibration,
        r#"{
          "map": [
            { "domain": [0, 0, 0], "range": [0, 0, 0] },
            { "domain": [0, 0, 1], "range": [0, 0, 1.01] },
            { "domain": [0, 1, 0], "range": [0, 1, 0.02] },
            { "domain": [0, 1, 1], "range": [0, 1, 1.02] }
          ],
          "radius": 0.5
        }"#,
    )
    .unwrap();

    // Document radius leaves (0, 0.5, 1) with no neighbors: no correction
    let config = config_for(Some(CalibrationSource {
        path: calibration.clone(),
        mode: None,
    }));
    let lines = run_file(temp_dir.path(), config, "G1 Y0.5 Z1\n");
    assert_eq!(lines, ["G1X0Y0.5Z1"]);

    // A command-line radius overrides it
    let config = Config {
        radius: Some(1.0),
        ..config_for(Some(CalibrationSource {
            path: calibration,
            mode: None,
        }))
    };
    let lines = run_file(temp_dir.path(), config, "G1 Y0.5 Z1\n");
    assert_ne!(lines, ["G1X0Y0.5Z1"]);
    assert!(lines[0].starts_with("G1X0Y0.5Z1.01"));
}

#[test]
fn test_missing_calibration_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(Some(CalibrationSource {
        path: temp_dir.path().join("missing.json"),
        mode: None,
    }));

    let err = match Pipeline::from_config(&config, Box::new(std::io::sink())) {
        Ok(_) => panic!("expected missing calibration file to fail"),
        Err(e) => e,
    };
    assert!(format!("{:#}", err).contains("missing.json"));
}

#[test]
fn test_unsupported_calibration_extension_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let calibration = temp_dir.path().join("bed.yaml");
    fs::write(&calibration, "map: []").unwrap();

    let config = config_for(Some(CalibrationSource {
        path: calibration,
        mode: None,
    }));
    assert!(Pipeline::from_config(&config, Box::new(std::io::sink())).is_err());
}
