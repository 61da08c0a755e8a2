//! Common infrastructure modules shared across analysis phases
//!
//! This module provides reusable infrastructure for:
//! - The in-memory record table
//! - Chi-square distribution tail probabilities
//! - Plotting bar, stacked bar and heatmap charts
//! - ASCII table formatting

pub mod data_structures;
pub mod distributions;
pub mod plots;
pub mod tables;

// Re-export commonly used items
pub use data_structures::AccidentTable;
pub use plots::PlotError;
