//! File parsing functionality for accident records
//!
//! This module handles loading the input CSV file into an [`AccidentTable`].

use crate::common::data_structures::{is_missing_marker, AccidentTable};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("CSV input contains no header row")]
    MissingHeader,

    #[error("Line {line}: expected {expected} fields, found {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Parse the accident CSV file and load the records for analysis
///
/// # Arguments
/// * `file_path` - Path to the CSV file
///
/// # Returns
/// * `Ok(AccidentTable)` - All records, with missing markers read as [`None`]
/// * `Err(ParsingError)` - If the file could not be opened or is not valid CSV
pub fn parse_accidents(file_path: &Path) -> Result<AccidentTable> {
    let file = File::open(file_path).map_err(|source| ParsingError::FileRead {
        path: file_path.to_path_buf(),
        source,
    })?;

    let table = parse_accidents_from_reader(file)?;
    log::info!(
        "Loaded {} records with {} columns from {}",
        table.row_count(),
        table.headers().len(),
        file_path.display()
    );

    Ok(table)
}

/// Parse accident records from any CSV source
///
/// Short rows are padded with missing cells. A row with more fields than the header
/// is rejected, since its cells can no longer be matched to columns.
pub fn parse_accidents_from_reader<R: Read>(source: R) -> Result<AccidentTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(ParsingError::MissingHeader);
    }

    let expected = headers.len();
    let mut table = AccidentTable::new(headers);
    for result in reader.records() {
        let record = result?;
        if record.len() > expected {
            return Err(ParsingError::TooManyFields {
                line: record.position().map_or(0, |position| position.line()),
                expected,
                found: record.len(),
            });
        }
        table.push_row(
            record
                .iter()
                .map(|cell| (!is_missing_marker(cell)).then(|| cell.to_owned()))
                .collect(),
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_and_missing_values() {
        let csv = "Weather_conditions,Accident_severity,Time\n\
                   Normal,Slight Injury,17:02:00\n\
                   ,Fatal injury,NA\n\
                   Raining,Serious Injury\n";

        let table = parse_accidents_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(
            table.headers(),
            ["Weather_conditions", "Accident_severity", "Time"]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[1][0], None);
        assert_eq!(table.rows()[1][2], None);
        assert_eq!(table.rows()[2][2], None);
        assert_eq!(table.rows()[2][0].as_deref(), Some("Raining"));
    }

    #[test]
    fn rows_longer_than_header_are_rejected() {
        let csv = "Cause_of_accident,Accident_severity,Type_of_collision\n\
                   Moving Backward,Slight Injury,Rollover\n\
                   Overtaking, no distance,Fatal injury,Rollover\n";

        let err = parse_accidents_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParsingError::TooManyFields {
                line: 3,
                expected: 3,
                found: 4
            }
        ));
        assert!(err.to_string().contains("Line 3"));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let csv = "Cause_of_accident\n\"Overtaking, no distance\"\n";
        let table = parse_accidents_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(
            table.rows()[0][0].as_deref(),
            Some("Overtaking, no distance")
        );
    }

    #[test]
    fn header_only_input_is_empty() {
        let table = parse_accidents_from_reader("a,b\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers().len(), 2);
    }

    #[test]
    fn empty_input_has_no_header() {
        let result = parse_accidents_from_reader("".as_bytes());
        assert!(matches!(result, Err(ParsingError::MissingHeader)));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.csv");

        let err = parse_accidents(&path).unwrap_err();
        assert!(matches!(err, ParsingError::FileRead { .. }));
        assert!(err.to_string().contains("does-not-exist.csv"));
    }
}
