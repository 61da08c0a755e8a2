//! Run configuration and fixed analysis constants
//!
//! Column names, tested variables and output file names are constants. Paths and
//! a couple of switches are exposed as command line options whose defaults
//! reproduce a plain zero-flag run.

use argh::FromArgs;
use std::path::PathBuf;

/// Default input file, relative to the working directory
pub const DEFAULT_INPUT: &str = "cleaned.csv";

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "accident_analysis_outputs";

pub const ROAD_SURFACE: &str = "Road_surface_type";
pub const WEATHER: &str = "Weather_conditions";
pub const LIGHT: &str = "Light_conditions";
pub const JUNCTION: &str = "Types_of_Junction";
pub const LANES: &str = "Lanes_or_Medians";
pub const CAUSE: &str = "Cause_of_accident";
pub const SEVERITY: &str = "Accident_severity";
pub const COLLISION: &str = "Type_of_collision";

/// Columns which must all be present for a record to be analysed
pub const REQUIRED_COLUMNS: [&str; 8] = [
    ROAD_SURFACE,
    WEATHER,
    LIGHT,
    JUNCTION,
    LANES,
    CAUSE,
    SEVERITY,
    COLLISION,
];

/// Predictors tested for association with [`SEVERITY`]
pub const TESTED_VARIABLES: [&str; 4] = [WEATHER, ROAD_SURFACE, LIGHT, JUNCTION];

/// Number of causes shown in the top causes chart
pub const TOP_CAUSES_LIMIT: usize = 15;

pub const WEATHER_CHART: &str = "weather_counts.png";
pub const ROAD_SURFACE_CHART: &str = "road_surface_counts.png";
pub const LIGHT_CHART: &str = "light_conditions_counts.png";
pub const JUNCTION_CHART: &str = "junction_counts.png";
pub const TOP_CAUSES_CHART: &str = "top_causes.png";
pub const SEVERITY_BY_WEATHER_CHART: &str = "severity_by_weather_stacked.png";
pub const WEATHER_ROAD_HEATMAP: &str = "weather_vs_road_heatmap.png";

pub const CLEANED_CSV: &str = "cleaned_for_analysis.csv";
pub const CHI_SQUARE_CSV: &str = "chi2_tests_summary.csv";
pub const REPORT_FILE: &str = "analysis-report.txt";

/// Exploratory analysis of road accident records: counts, charts and chi-square tests.
#[derive(FromArgs, Debug)]
pub struct Args {
    /// input CSV file with the accident records
    #[argh(option, short = 'i', default = "PathBuf::from(DEFAULT_INPUT)")]
    pub input: PathBuf,

    /// directory receiving charts, CSV summaries and the report
    #[argh(option, short = 'o', default = "PathBuf::from(DEFAULT_OUTPUT_DIR)")]
    pub output_dir: PathBuf,

    /// apply Yates' continuity correction to 2x2 tables
    #[argh(switch)]
    pub yates: bool,

    /// skip chart rendering
    #[argh(switch)]
    pub no_charts: bool,
}

/// Settings for a single analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub yates_correction: bool,
    pub render_charts: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            yates_correction: false,
            render_charts: true,
        }
    }
}

impl From<Args> for AnalysisConfig {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output_dir: args.output_dir,
            yates_correction: args.yates,
            render_charts: !args.no_charts,
        }
    }
}
