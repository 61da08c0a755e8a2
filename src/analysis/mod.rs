//! Domain-specific analysis modules
//!
//! This module contains the analysis steps applied to the accident records:
//! - Record cleaning
//! - Category frequency counting
//! - Cross-tabulation
//! - Chi-square tests of independence

pub mod chi_square;
pub mod cleaning;
pub mod crosstab;
pub mod frequency;

// Re-export analysis types for convenience
pub use chi_square::{association_with_severity, ChiSquareError, ChiSquareResult};
pub use cleaning::{drop_missing, CleaningError, MissingCount};
pub use crosstab::{ContingencyTable, ProportionTable};
pub use frequency::FrequencyTable;
