//! Output formatting and persistence for reading summaries.
//!
//! Supports a plain-text report, JSON serialization, CSV append, and
//! re-encoding parsed readings back to JSON.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::reading::{Pollutant, Reading};
use crate::stats::Summary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row per hour of a [`Summary`].
#[derive(Debug, Serialize)]
struct HourRecord<'a> {
    hour: usize,
    dominant: &'a str,
    pm25_avg: Option<f64>,
    co2_avg: Option<f64>,
    reading_count: usize,
}

/// Logs each parsed reading using Rust's debug pretty-print format.
pub fn print_pretty(readings: &[Reading]) {
    for reading in readings {
        debug!("{:#?}", reading);
    }
}

/// Renders the human-readable report: overall averages, then the dominant
/// pollutant for every hour.
pub fn render_text(summary: &Summary) -> String {
    let mut lines = vec!["Averages for all readings:".to_string()];
    if summary.global_averages.is_empty() {
        lines.push("(no readings)".to_string());
    }
    lines.extend(
        summary
            .global_averages
            .iter()
            .map(|(pollutant, avg)| format!("{pollutant}: {avg:.2}")),
    );

    lines.push(String::new());
    lines.push("Highest pollutant by hour:".to_string());
    lines.extend(summary.hourly_dominant.iter().map(|(hour, dominant)| {
        format!("Hour {hour}: {}", dominant.map_or("", Pollutant::name))
    }));

    lines.join("\n")
}

/// Serializes a [`Summary`] as pretty-printed JSON.
pub fn to_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Re-encodes readings as a JSON array, omitting unmeasured pollutants.
pub fn encode_readings_json(readings: &[Reading]) -> Result<String> {
    Ok(serde_json::to_string_pretty(readings)?)
}

/// Appends one row per hour of a [`Summary`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, summary: &Summary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for (hour, dominant) in summary.hourly_dominant.iter() {
        let [pm25_avg, co2_avg] = summary.hourly_averages[hour];
        writer.serialize(HourRecord {
            hour,
            dominant: dominant.map_or("", Pollutant::name),
            pm25_avg,
            co2_avg,
            reading_count: summary.reading_count,
        })?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_readings());
    }

    #[test]
    fn test_render_text_lists_every_hour() {
        let summary = Summary::from_readings(&sample_readings());
        let text = render_text(&summary);

        assert!(text.contains("pm25: 11.67"));
        assert!(text.contains("co2: 13.33"));
        assert!(text.contains("Hour 8: co2\n"));
        assert!(text.contains("Hour 14: pm25\n"));
        assert!(text.contains("Hour 0: \n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("Hour ")).count(), 24);
        assert!(text.starts_with("Averages for all readings:\npm25: 11.67\nco2: 13.33\n\n"));
        assert!(text.ends_with("Hour 23: "));

        // pm25 is listed before co2
        assert!(text.find("pm25:").unwrap() < text.find("co2:").unwrap());
    }

    #[test]
    fn test_render_text_empty() {
        let summary = Summary::from_readings(&[]);
        let text = render_text(&summary);

        assert!(text.starts_with("Averages for all readings:\n(no readings)\n\n"));
        assert!(!text.contains("pm25:"));
    }

    #[test]
    fn test_to_json_shape() {
        let summary = Summary::from_readings(&[]);
        let json: serde_json::Value = serde_json::from_str(&to_json(&summary).unwrap()).unwrap();

        assert_eq!(json["reading_count"], 0);
        assert_eq!(json["global_averages"], serde_json::json!({}));
        assert_eq!(json["hourly_dominant"].as_array().unwrap().len(), 24);
    }

    #[test]
    fn test_encode_readings_json_omits_absent() {
        let mut readings = sample_readings();
        readings[0].no2 = Some(0.4);

        let json = encode_readings_json(&readings).unwrap();
        let back: Vec<Reading> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, readings);
        assert_eq!(json.matches("\"no2\"").count(), 1);
        assert!(!json.contains("ozone"));
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("air_quality_stats_test_header.csv");
        let _ = fs::remove_file(&path);

        let summary = Summary::from_readings(&sample_readings());
        append_record(&path, &summary).unwrap();
        append_record(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("hour,")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 * 24 hour rows
        assert_eq!(content.lines().count(), 49);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_row_values() {
        let path = temp_path("air_quality_stats_test_rows.csv");
        let _ = fs::remove_file(&path);

        let summary = Summary::from_readings(&sample_readings());
        append_record(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "hour,dominant,pm25_avg,co2_avg,reading_count");
        assert_eq!(lines[1], "0,,,,3");
        assert_eq!(lines[9], "8,co2,15.0,17.5,3");

        fs::remove_file(&path).unwrap();
    }

    // Helper functions for tests
    fn sample_readings() -> Vec<Reading> {
        vec![
            reading("2024-03-01T08:05:00Z", 10.0, 5.0),
            reading("2024-03-01T08:45:00Z", 20.0, 30.0),
            reading("2024-03-01T14:00:00Z", 5.0, 5.0),
        ]
    }

    fn reading(ts: &str, pm25: f64, co2: f64) -> Reading {
        Reading::new("s1", DateTime::parse_from_rfc3339(ts).unwrap(), pm25, co2)
    }
}
