//! ASCII table formatting for counts and test results
//!
//! This module provides the row types shown on the terminal and in the text report:
//! - [`FrequencyEntry`] for category counts with their share of the total
//! - [`MissingEntry`] for missing values per required column
//! - [`ChiSquareEntry`] for chi-square test results
//!
//! All tables are rendered with the [`tabled`] crate.

use crate::analysis::{ChiSquareResult, FrequencyTable, MissingCount};
use tabled::{Table, Tabled};

/// A category with its count and percentage of the table total
#[derive(Debug, Clone, Tabled)]
pub struct FrequencyEntry {
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Count")]
    pub count: u64,
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

impl FrequencyEntry {
    /// Creates a new entry with formatted percentage
    pub fn new(value: String, count: u64, total: u64) -> Self {
        let percentage = if total == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", (count as f64 / total as f64) * 100.0)
        };

        Self {
            value,
            count,
            percentage,
        }
    }
}

/// Missing values in a single required column
#[derive(Debug, Clone, Tabled)]
pub struct MissingEntry {
    #[tabled(rename = "Column")]
    pub column: String,
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

impl From<&MissingCount> for MissingEntry {
    fn from(count: &MissingCount) -> Self {
        Self {
            column: count.column.clone(),
            missing: count.missing,
        }
    }
}

/// A chi-square test result formatted for display
#[derive(Debug, Clone, Tabled)]
pub struct ChiSquareEntry {
    #[tabled(rename = "Variable")]
    pub variable: String,
    #[tabled(rename = "Chi2")]
    pub chi2: String,
    #[tabled(rename = "p-value")]
    pub p_value: String,
    #[tabled(rename = "dof")]
    pub dof: usize,
    #[tabled(rename = "Table shape")]
    pub table_shape: String,
}

impl From<&ChiSquareResult> for ChiSquareEntry {
    fn from(result: &ChiSquareResult) -> Self {
        Self {
            variable: result.variable.clone(),
            chi2: format!("{:.4}", result.statistic),
            p_value: format!("{:.4e}", result.p_value),
            dof: result.dof,
            table_shape: result.shape_label(),
        }
    }
}

/// Formats rows as an ASCII table with an optional underlined title
///
/// # Arguments
/// * `rows` - The rows to format
/// * `title` - Optional title for the table
/// * `empty_message` - Text returned instead of a table when `rows` is empty
pub fn format_table<T: Tabled>(rows: &[T], title: Option<&str>, empty_message: &str) -> String {
    let body = if rows.is_empty() {
        empty_message.to_string()
    } else {
        Table::new(rows).to_string()
    };

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), body)
    } else {
        body
    }
}

/// Formats a frequency table with counts and percentages of its own total
pub fn format_frequency_table(frequency: &FrequencyTable, title: Option<&str>) -> String {
    let total = frequency.total();
    let rows: Vec<FrequencyEntry> = frequency
        .entries()
        .iter()
        .map(|entry| FrequencyEntry::new(entry.value.clone(), entry.count, total))
        .collect();

    format_table(&rows, title, "No records to count")
}

/// Formats the per-column missing value counts
pub fn format_missing_table(missing: &[MissingCount], title: Option<&str>) -> String {
    let rows: Vec<MissingEntry> = missing.iter().map(MissingEntry::from).collect();
    format_table(&rows, title, "No required columns")
}

/// Formats chi-square test results
pub fn format_chi_square_table(results: &[ChiSquareResult], title: Option<&str>) -> String {
    let rows: Vec<ChiSquareEntry> = results.iter().map(ChiSquareEntry::from).collect();
    format_table(&rows, title, "No tests could be computed")
}
