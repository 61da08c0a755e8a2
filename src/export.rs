//! CSV export of the cleaned records and the chi-square summary
//!
//! Both files always get a header row, so an empty analysis still produces
//! well-formed, header-only CSV files. Existing files are overwritten.

use crate::analysis::ChiSquareResult;
use crate::common::AccidentTable;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing CSV output
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV file: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, ExportError>;

/// Header of the chi-square summary file
const CHI_SQUARE_HEADER: [&str; 5] = ["variable", "chi2", "p_value", "dof", "table_shape"];

/// One line of the chi-square summary file
#[derive(Debug, Serialize)]
struct ChiSquareRecord<'a> {
    variable: &'a str,
    chi2: f64,
    p_value: f64,
    dof: usize,
    table_shape: String,
}

impl<'a> From<&'a ChiSquareResult> for ChiSquareRecord<'a> {
    fn from(result: &'a ChiSquareResult) -> Self {
        Self {
            variable: &result.variable,
            chi2: result.statistic,
            p_value: result.p_value,
            dof: result.dof,
            table_shape: result.shape_label(),
        }
    }
}

/// Create the output directory and any missing parents
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDirectory {
        path: output_dir.to_path_buf(),
        source,
    })
}

/// Write every column of the cleaned records, with missing cells left empty
///
/// # Arguments
/// * `table` - The cleaned records
/// * `output_path` - Destination CSV file
pub fn write_cleaned_table(table: &AccidentTable, output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {} cleaned records to {}",
        table.row_count(),
        output_path.display()
    );
    Ok(())
}

/// Write the chi-square summary with columns `variable, chi2, p_value, dof, table_shape`
///
/// # Arguments
/// * `results` - Test results in the order they should appear
/// * `output_path` - Destination CSV file
pub fn write_chi_square_summary(results: &[ChiSquareResult], output_path: &Path) -> Result<()> {
    // Header written by hand so an empty summary still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)?;

    writer.write_record(CHI_SQUARE_HEADER)?;
    for result in results {
        writer.serialize(ChiSquareRecord::from(result))?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {} chi-square results to {}",
        results.len(),
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_structures::test_support::table_from;

    fn result(variable: &str) -> ChiSquareResult {
        ChiSquareResult {
            variable: variable.to_string(),
            statistic: 1.5,
            p_value: 0.25,
            dof: 2,
            shape: (3, 2),
            expected: Vec::new(),
        }
    }

    #[test]
    fn cleaned_table_keeps_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        let table = table_from(
            &["Weather_conditions", "Notes"],
            &[&["Normal", ""], &["Raining, heavy", "x"]],
        );

        write_cleaned_table(&table, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Weather_conditions,Notes\nNormal,\n\"Raining, heavy\",x\n"
        );
    }

    #[test]
    fn empty_outputs_are_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let cleaned = dir.path().join("cleaned.csv");
        let summary = dir.path().join("summary.csv");

        write_cleaned_table(&table_from(&["a", "b"], &[]), &cleaned).unwrap();
        write_chi_square_summary(&[], &summary).unwrap();

        assert_eq!(fs::read_to_string(&cleaned).unwrap(), "a,b\n");
        assert_eq!(
            fs::read_to_string(&summary).unwrap(),
            "variable,chi2,p_value,dof,table_shape\n"
        );
    }

    #[test]
    fn summary_rows_follow_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        write_chi_square_summary(&[result("Weather_conditions")], &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "variable,chi2,p_value,dof,table_shape\nWeather_conditions,1.5,0.25,2,\"(3, 2)\"\n"
        );
    }

    #[test]
    fn rewriting_overwrites_and_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let results = [result("Light_conditions"), result("Types_of_Junction")];

        write_chi_square_summary(&results, &path).unwrap();
        let first = fs::read(&path).unwrap();
        write_chi_square_summary(&results, &path).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_output_dir(&nested).unwrap();
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
