//! Record cleaning
//!
//! Drops every record which lacks a value in any of the required columns.

use crate::common::data_structures::AccidentTable;
use thiserror::Error;

/// Errors that can occur while cleaning records
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CleaningError {
    #[error("Required column '{0}' is not present in the input")]
    MissingColumn(String),
}

type Result<T> = core::result::Result<T, CleaningError>;

/// Number of missing values found in one required column before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Output of [`drop_missing`]
#[derive(Debug)]
pub struct CleaningOutcome {
    /// Records with a value in every required column
    pub table: AccidentTable,
    /// Missing values per required column, counted before filtering, in `required` order
    pub missing_before: Vec<MissingCount>,
}

impl CleaningOutcome {
    /// Number of records removed by the cleaning step
    pub fn dropped(&self, original_rows: usize) -> usize {
        original_rows - self.table.row_count()
    }
}

/// Remove records missing a value in any of the `required` columns
///
/// An empty result is not an error.
///
/// # Arguments
/// * `table` - The raw records
/// * `required` - Column names which must all hold a value
///
/// # Returns
/// * `Ok(CleaningOutcome)` - The filtered records and the per-column missing counts
/// * `Err(CleaningError)` - If a required column is not in the header
pub fn drop_missing(mut table: AccidentTable, required: &[&str]) -> Result<CleaningOutcome> {
    let indices = required
        .iter()
        .map(|column| {
            table
                .column_index(column)
                .ok_or_else(|| CleaningError::MissingColumn(column.to_string()))
        })
        .collect::<Result<Vec<usize>>>()?;

    let missing_before = required
        .iter()
        .zip(&indices)
        .map(|(column, &index)| MissingCount {
            column: column.to_string(),
            missing: table.rows().iter().filter(|row| row[index].is_none()).count(),
        })
        .collect();

    table.retain_rows(|row| indices.iter().all(|&index| row[index].is_some()));

    Ok(CleaningOutcome {
        table,
        missing_before,
    })
}
