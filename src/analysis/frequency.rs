//! Category frequency counting
//!
//! A [`FrequencyTable`] holds the distinct values of one column ordered by
//! descending count. Values with equal counts keep the order in which they first
//! appeared, so repeated runs over the same file give identical tables.

use crate::common::data_structures::AccidentTable;
use std::collections::HashMap;

/// A single category and the number of records holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: String,
    pub count: u64,
}

/// Distinct value counts for a single column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    column: String,
    entries: Vec<CategoryCount>,
}

impl FrequencyTable {
    /// Count the distinct values of `column`, skipping missing cells
    ///
    /// Returns [`None`] if the column does not exist.
    pub fn from_column(table: &AccidentTable, column: &str) -> Option<Self> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<CategoryCount> = Vec::new();

        for value in table.column(column)?.flatten() {
            match positions.get(value) {
                Some(&position) => entries[position].count += 1,
                None => {
                    positions.insert(value, entries.len());
                    entries.push(CategoryCount {
                        value: value.to_string(),
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-seen order among ties
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        Some(Self {
            column: column.to_string(),
            entries,
        })
    }

    /// Name of the counted column
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn entries(&self) -> &[CategoryCount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Largest single count, or 0 for an empty table
    pub fn max_count(&self) -> u64 {
        self.entries.first().map_or(0, |entry| entry.count)
    }

    /// The `limit` most frequent categories
    pub fn top(&self, limit: usize) -> Self {
        Self {
            column: self.column.clone(),
            entries: self.entries.iter().take(limit).cloned().collect(),
        }
    }

    /// Same categories ordered by ascending count
    ///
    /// Used for horizontal bar charts, where the first entry is drawn at the bottom.
    pub fn sorted_ascending(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.count.cmp(&b.count));
        Self {
            column: self.column.clone(),
            entries,
        }
    }
}
