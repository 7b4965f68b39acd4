use air_quality_stats::output::encode_readings_json;
use air_quality_stats::parser::{InputFormat, load_readings, parse_csv, parse_json};
use air_quality_stats::reading::Pollutant;
use air_quality_stats::stats::Summary;
use std::path::Path;

#[test]
fn test_full_pipeline_csv() {
    let bytes = include_bytes!("fixtures/readings.csv");
    let readings = parse_csv(bytes).expect("Failed to parse readings");
    let summary = Summary::from_readings(&readings);

    assert_eq!(summary.reading_count, 3);
    let pm25 = summary.global_averages.get(Pollutant::Pm25).unwrap();
    let co2 = summary.global_averages.get(Pollutant::Co2).unwrap();
    assert!((pm25 - 11.667).abs() < 1e-3);
    assert!((co2 - 13.333).abs() < 1e-3);
    assert_eq!(summary.hourly_dominant.name(8), "co2");
    assert_eq!(summary.hourly_dominant.name(14), "pm25");
    assert_eq!(summary.hourly_dominant.iter().count(), 24);
}

#[test]
fn test_csv_and_json_agree() {
    let csv = parse_csv(include_bytes!("fixtures/readings.csv")).unwrap();
    let json = parse_json(include_bytes!("fixtures/readings.json")).unwrap();

    let from_csv = Summary::from_readings(&csv);
    let from_json = Summary::from_readings(&json);

    // no2/ozone in the JSON file do not change the result
    assert_eq!(from_csv.global_averages, from_json.global_averages);
    assert_eq!(from_csv.hourly_dominant, from_json.hourly_dominant);
}

#[test]
fn test_json_round_trip() {
    let readings = parse_json(include_bytes!("fixtures/readings.json")).unwrap();
    let encoded = encode_readings_json(&readings).unwrap();
    let decoded = parse_json(encoded.as_bytes()).unwrap();

    assert_eq!(decoded, readings);
    assert_eq!(encoded.matches("\"no2\"").count(), 1);
    assert_eq!(encoded.matches("\"ozone\"").count(), 1);
}

#[test]
fn test_load_readings_detects_format() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");

    let csv = load_readings(&dir.join("readings.csv"), None).unwrap();
    let json = load_readings(&dir.join("readings.json"), Some(InputFormat::Json)).unwrap();

    assert_eq!(csv.len(), 3);
    assert_eq!(json.len(), 3);
}

#[test]
fn test_empty_input_summary() {
    let summary = Summary::from_readings(&[]);

    assert!(summary.global_averages.is_empty());
    assert!(summary.hourly_dominant.iter().all(|(_, d)| d.is_none()));
    assert_eq!(summary.hourly_dominant.iter().count(), 24);
}
