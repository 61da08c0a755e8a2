//! Cross-tabulation of two categorical columns
//!
//! Row and column labels are sorted lexicographically. Only combinations where both
//! cells hold a value are counted.

use crate::common::data_structures::AccidentTable;
use std::collections::{BTreeMap, BTreeSet};

/// Co-occurrence counts between the categories of two columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    row_variable: String,
    column_variable: String,
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Cross-tabulate `row_column` against `col_column`
    ///
    /// Returns [`None`] if either column does not exist.
    pub fn from_columns(table: &AccidentTable, row_column: &str, col_column: &str) -> Option<Self> {
        let row_index = table.column_index(row_column)?;
        let col_index = table.column_index(col_column)?;

        let mut pairs: BTreeMap<(&str, &str), u64> = BTreeMap::new();
        let mut row_labels = BTreeSet::new();
        let mut column_labels = BTreeSet::new();

        for row in table.rows() {
            if let (Some(r), Some(c)) = (row[row_index].as_deref(), row[col_index].as_deref()) {
                *pairs.entry((r, c)).or_insert(0) += 1;
                row_labels.insert(r);
                column_labels.insert(c);
            }
        }

        let row_labels: Vec<&str> = row_labels.into_iter().collect();
        let column_labels: Vec<&str> = column_labels.into_iter().collect();
        let counts = row_labels
            .iter()
            .map(|r| {
                column_labels
                    .iter()
                    .map(|c| pairs.get(&(*r, *c)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Some(Self {
            row_variable: row_column.to_string(),
            column_variable: col_column.to_string(),
            row_labels: row_labels.into_iter().map(str::to_owned).collect(),
            column_labels: column_labels.into_iter().map(str::to_owned).collect(),
            counts,
        })
    }

    /// Build a table directly from labels and counts
    ///
    /// Every row of `counts` must have one entry per column label.
    pub fn from_counts(
        row_variable: &str,
        column_variable: &str,
        row_labels: Vec<String>,
        column_labels: Vec<String>,
        counts: Vec<Vec<u64>>,
    ) -> Self {
        debug_assert_eq!(counts.len(), row_labels.len());
        debug_assert!(counts.iter().all(|row| row.len() == column_labels.len()));
        Self {
            row_variable: row_variable.to_string(),
            column_variable: column_variable.to_string(),
            row_labels,
            column_labels,
            counts,
        }
    }

    pub fn row_variable(&self) -> &str {
        &self.row_variable
    }

    pub fn column_variable(&self) -> &str {
        &self.column_variable
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.column_labels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.column_labels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    pub fn grand_total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Divide every row by its sum; rows summing to zero become all zeros
    pub fn row_normalized(&self) -> ProportionTable {
        let proportions = self
            .counts
            .iter()
            .map(|row| {
                let total: u64 = row.iter().sum();
                row.iter()
                    .map(|&count| {
                        if total == 0 {
                            0.0
                        } else {
                            count as f64 / total as f64
                        }
                    })
                    .collect()
            })
            .collect();

        ProportionTable {
            row_variable: self.row_variable.clone(),
            column_variable: self.column_variable.clone(),
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
            proportions,
        }
    }
}

/// Row-normalised contingency table
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionTable {
    pub row_variable: String,
    pub column_variable: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub proportions: Vec<Vec<f64>>,
}

impl ProportionTable {
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }
}
