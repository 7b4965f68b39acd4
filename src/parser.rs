//! CSV and JSON decoders for sensor readings.

use chrono::DateTime;
use clap::ValueEnum;
use csv::StringRecord;
use std::path::Path;
use tracing::debug;

use crate::error::ReadingError;
use crate::reading::Reading;

/// Supported input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Header row followed by `sensor_id,timestamp,pm25,co2` rows
    Csv,
    /// Array of reading objects, optionally carrying `no2` and `ozone`
    Json,
}

impl InputFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ReadingError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            _ => Err(ReadingError::UnknownFormat(path.to_path_buf())),
        }
    }
}

/// Reads `path` and decodes it, using `format` when given and the file
/// extension otherwise.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_readings(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<Vec<Reading>, ReadingError> {
    let bytes = std::fs::read(path).map_err(|source| ReadingError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let format = match format {
        Some(f) => f,
        None => InputFormat::from_path(path)?,
    };

    let readings = match format {
        InputFormat::Csv => parse_csv(&bytes)?,
        InputFormat::Json => parse_json(&bytes)?,
    };

    debug!(?format, count = readings.len(), "Readings loaded");
    Ok(readings)
}

/// Decodes CSV readings.
///
/// The first row is a header and is skipped. Columns are positional
/// (`sensor_id, timestamp, pm25, co2`); any further columns are ignored, but
/// every row must have as many fields as the header. Fields are taken
/// verbatim, without trimming.
///
/// # Errors
///
/// Fails on the first malformed row, field-count mismatch, bad RFC 3339
/// timestamp, or unparsable number.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Reading>, ReadingError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    reader
        .headers()
        .map_err(|source| ReadingError::Csv { line: 1, source })?;

    let mut readings = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, lines are 1-based
        let line = idx + 2;
        let record = result.map_err(|e| row_error(e, line))?;
        readings.push(parse_row(&record, line)?);
    }

    Ok(readings)
}

/// Maps a reader error onto the row it came from.
fn row_error(err: csv::Error, line: usize) -> ReadingError {
    if let csv::ErrorKind::UnequalLengths {
        expected_len, len, ..
    } = *err.kind()
    {
        return ReadingError::FieldCount {
            line,
            expected: expected_len as usize,
            found: len as usize,
        };
    }
    ReadingError::Csv { line, source: err }
}

fn parse_row(record: &StringRecord, line: usize) -> Result<Reading, ReadingError> {
    if record.len() < 4 {
        return Err(ReadingError::FieldCount {
            line,
            expected: 4,
            found: record.len(),
        });
    }

    let timestamp =
        DateTime::parse_from_rfc3339(&record[1]).map_err(|source| ReadingError::Timestamp {
            line,
            value: record[1].to_string(),
            source,
        })?;

    let pm25 = parse_number(record, 2, "pm25", line)?;
    let co2 = parse_number(record, 3, "co2", line)?;

    Ok(Reading::new(&record[0], timestamp, pm25, co2))
}

fn parse_number(
    record: &StringRecord,
    idx: usize,
    field: &'static str,
    line: usize,
) -> Result<f64, ReadingError> {
    record[idx]
        .parse::<f64>()
        .map_err(|source| ReadingError::Number {
            line,
            field,
            value: record[idx].to_string(),
            source,
        })
}

/// Decodes a JSON array of readings.
pub fn parse_json(bytes: &[u8]) -> Result<Vec<Reading>, ReadingError> {
    Ok(serde_json::from_slice(bytes)?)
}
