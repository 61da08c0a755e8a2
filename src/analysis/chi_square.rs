//! Chi-square tests of independence
//!
//! Each tested variable is cross-tabulated against accident severity and the
//! Pearson chi-square statistic is computed from observed and expected counts:
//!
//! - `expected[i][j] = row_total[i] * column_total[j] / grand_total`
//! - `statistic = Σ (observed - expected)² / expected`
//! - `dof = (rows - 1) * (columns - 1)`
//! - `p_value = P(χ²(dof) > statistic)`
//!
//! Degenerate tables (no observations, or a zero expected frequency) are rejected
//! with [`ChiSquareError`] instead of producing NaN.

use super::crosstab::ContingencyTable;
use crate::common::data_structures::AccidentTable;
use crate::common::distributions::chi_square_sf;
use thiserror::Error;

/// Errors that can occur when testing a contingency table
#[derive(Error, Debug, PartialEq)]
pub enum ChiSquareError {
    #[error("Column '{0}' is not present in the cleaned records")]
    MissingColumn(String),

    #[error("Contingency table for '{0}' has no observations")]
    EmptyTable(String),

    #[error("Contingency table for '{variable}' has a zero expected frequency at ({row}, {column})")]
    ZeroExpected {
        variable: String,
        row: String,
        column: String,
    },
}

type Result<T> = core::result::Result<T, ChiSquareError>;

/// Outcome of a chi-square test of independence
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareResult {
    /// Row variable of the tested table
    pub variable: String,
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    /// `(rows, columns)` of the contingency table
    pub shape: (usize, usize),
    /// Expected frequencies under independence
    pub expected: Vec<Vec<f64>>,
}

impl ChiSquareResult {
    /// Table shape rendered as `(rows, columns)`
    pub fn shape_label(&self) -> String {
        format!("({}, {})", self.shape.0, self.shape.1)
    }
}

/// Expected cell frequencies under independence of rows and columns
pub fn expected_frequencies(table: &ContingencyTable) -> Vec<Vec<f64>> {
    let row_totals = table.row_totals();
    let column_totals = table.column_totals();
    let grand_total = table.grand_total() as f64;

    row_totals
        .iter()
        .map(|&row_total| {
            column_totals
                .iter()
                .map(|&column_total| row_total as f64 * column_total as f64 / grand_total)
                .collect()
        })
        .collect()
}

/// Run a chi-square test of independence on a contingency table
///
/// # Arguments
/// * `table` - Observed counts
/// * `yates_correction` - Apply Yates' continuity correction when `dof == 1`
///
/// # Returns
/// * `Ok(ChiSquareResult)` - Statistic, p-value, degrees of freedom and table shape
/// * `Err(ChiSquareError)` - If the table is empty or an expected frequency is zero
pub fn chi_square_test(table: &ContingencyTable, yates_correction: bool) -> Result<ChiSquareResult> {
    let variable = table.row_variable().to_string();
    if table.is_empty() || table.grand_total() == 0 {
        return Err(ChiSquareError::EmptyTable(variable));
    }

    let expected = expected_frequencies(table);
    for (i, row) in expected.iter().enumerate() {
        if let Some(j) = row.iter().position(|&value| value == 0.0) {
            return Err(ChiSquareError::ZeroExpected {
                variable,
                row: table.row_labels()[i].clone(),
                column: table.column_labels()[j].clone(),
            });
        }
    }

    let (rows, columns) = table.shape();
    let dof = (rows - 1) * (columns - 1);

    // A single row or column has nothing to compare against
    if dof == 0 {
        return Ok(ChiSquareResult {
            variable,
            statistic: 0.0,
            p_value: 1.0,
            dof,
            shape: (rows, columns),
            expected,
        });
    }

    let apply_correction = yates_correction && dof == 1;
    let mut statistic = 0.0;
    for (observed_row, expected_row) in table.counts().iter().zip(&expected) {
        for (&observed, &expected_count) in observed_row.iter().zip(expected_row) {
            let mut difference = observed as f64 - expected_count;
            if apply_correction {
                // Shrink towards expected by at most 0.5
                difference = difference.signum() * (difference.abs() - 0.5).max(0.0);
            }
            statistic += difference * difference / expected_count;
        }
    }

    let p_value = chi_square_sf(statistic, dof);
    log::debug!(
        "chi-square {variable}: statistic={statistic}, p={p_value}, dof={dof}, shape=({rows}, {columns})"
    );

    Ok(ChiSquareResult {
        variable,
        statistic,
        p_value,
        dof,
        shape: (rows, columns),
        expected,
    })
}

/// Cross-tabulate `variable` against `severity_column` and test for independence
pub fn association_with_severity(
    table: &AccidentTable,
    variable: &str,
    severity_column: &str,
    yates_correction: bool,
) -> Result<ChiSquareResult> {
    let contingency = ContingencyTable::from_columns(table, variable, severity_column)
        .ok_or_else(|| {
            let missing = if table.column_index(variable).is_none() {
                variable
            } else {
                severity_column
            };
            ChiSquareError::MissingColumn(missing.to_string())
        })?;

    chi_square_test(&contingency, yates_correction)
}
