//! In-memory table holding the accident records
//!
//! Every cell is kept as text. A cell is [`None`] when the source value was empty or
//! one of the conventional missing-value markers (see [`is_missing_marker`]).

/// Tokens which are read as missing values rather than as categories
const MISSING_MARKERS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// Returns true if a raw CSV value denotes a missing value
pub fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

/// Row-oriented table of accident records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccidentTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl AccidentTable {
    /// Creates an empty table with the given column headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with missing values and dropping surplus cells
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header row
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == column)
    }

    /// Iterates over the cells of a single column, or [`None`] if the column does not exist
    pub fn column(&self, column: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| row[index].as_deref()))
    }

    /// Keeps only the rows for which `keep` returns true
    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Vec<Option<String>>) -> bool,
    {
        self.rows.retain(keep);
    }
}
