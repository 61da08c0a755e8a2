//! The analysis run: load, clean, count, plot, test, export, report
//!
//! Every stage assumes the previous ones succeeded. The only failures that do not
//! abort the run are degenerate chi-square tables, which are logged and left out of
//! the summary, and empty tables, whose charts are skipped.

use crate::analysis::{
    association_with_severity, drop_missing, ChiSquareError, ChiSquareResult, ContingencyTable,
    FrequencyTable, MissingCount,
};
use crate::common::plots::{
    create_bar_chart, create_heatmap, create_horizontal_bar_chart, create_stacked_bar_chart,
    ChartLabels,
};
use crate::common::AccidentTable;
use crate::config::{self, AnalysisConfig};
use crate::parsing::parse_accidents;
use crate::{export, report, AnalysisError};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

type Result<T> = core::result::Result<T, AnalysisError>;

/// Number of stages reported on the progress bar
pub const STAGES: u64 = 7;

/// Everything a run computed, for display and reporting
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub output_dir: PathBuf,
    pub input_rows: usize,
    pub cleaned_rows: usize,
    pub missing_before: Vec<MissingCount>,
    pub weather: FrequencyTable,
    pub road_surface: FrequencyTable,
    pub light: FrequencyTable,
    pub junction: FrequencyTable,
    pub lanes: FrequencyTable,
    pub top_causes: FrequencyTable,
    pub chi_square: Vec<ChiSquareResult>,
    pub skipped_tests: Vec<ChiSquareError>,
    pub charts: Vec<PathBuf>,
}

fn count(table: &AccidentTable, column: &str) -> Result<FrequencyTable> {
    let frequency = FrequencyTable::from_column(table, column)
        .ok_or_else(|| AnalysisError::MissingColumn(column.to_string()))?;
    log::debug!("{column}: {} distinct values", frequency.len());
    Ok(frequency)
}

fn crosstab(table: &AccidentTable, rows: &str, columns: &str) -> Result<ContingencyTable> {
    ContingencyTable::from_columns(table, rows, columns).ok_or_else(|| {
        let missing = if table.column_index(rows).is_none() {
            rows
        } else {
            columns
        };
        AnalysisError::MissingColumn(missing.to_string())
    })
}

fn advance(progress: &ProgressBar, message: &'static str) {
    progress.inc(1);
    progress.set_message(message);
}

/// Run the complete analysis described by `config`
///
/// # Arguments
/// * `config` - Input file, output directory and switches
/// * `progress` - Bar advanced once per stage; pass [`ProgressBar::hidden`] when not needed
///
/// # Returns
/// * `Ok(AnalysisOutcome)` - Counts, test results and written chart paths
/// * `Err(AnalysisError)` - If loading, cleaning, rendering or writing failed
pub fn run(config: &AnalysisConfig, progress: &ProgressBar) -> Result<AnalysisOutcome> {
    progress.set_message("Loading records");
    let raw = parse_accidents(&config.input)?;
    let input_rows = raw.row_count();
    advance(progress, "Cleaning records");

    let cleaning = drop_missing(raw, &config::REQUIRED_COLUMNS)?;
    for missing in &cleaning.missing_before {
        log::debug!("{}: {} missing values", missing.column, missing.missing);
    }
    log::info!(
        "Kept {} of {} records ({} dropped for missing values)",
        cleaning.table.row_count(),
        input_rows,
        cleaning.dropped(input_rows)
    );
    let cleaned = cleaning.table;
    advance(progress, "Counting categories");

    let weather = count(&cleaned, config::WEATHER)?;
    let road_surface = count(&cleaned, config::ROAD_SURFACE)?;
    let light = count(&cleaned, config::LIGHT)?;
    let junction = count(&cleaned, config::JUNCTION)?;
    let lanes = count(&cleaned, config::LANES)?;
    let top_causes = count(&cleaned, config::CAUSE)?.top(config::TOP_CAUSES_LIMIT);
    advance(progress, "Rendering charts");

    export::ensure_output_dir(&config.output_dir)?;
    let charts = if config.render_charts {
        render_charts(
            &cleaned,
            &[&weather, &road_surface, &light, &junction],
            &top_causes,
            &config.output_dir,
        )?
    } else {
        log::info!("Chart rendering disabled");
        Vec::new()
    };
    advance(progress, "Testing associations");

    let mut chi_square = Vec::new();
    let mut skipped_tests = Vec::new();
    for variable in config::TESTED_VARIABLES {
        match association_with_severity(
            &cleaned,
            variable,
            config::SEVERITY,
            config.yates_correction,
        ) {
            Ok(result) => chi_square.push(result),
            Err(error) => {
                log::warn!("Skipping chi-square test for {variable}: {error}");
                skipped_tests.push(error);
            }
        }
    }
    advance(progress, "Exporting CSV files");

    export::write_cleaned_table(&cleaned, &config.output_dir.join(config::CLEANED_CSV))?;
    export::write_chi_square_summary(&chi_square, &config.output_dir.join(config::CHI_SQUARE_CSV))?;
    advance(progress, "Writing report");

    let outcome = AnalysisOutcome {
        output_dir: config.output_dir.clone(),
        input_rows,
        cleaned_rows: cleaned.row_count(),
        missing_before: cleaning.missing_before,
        weather,
        road_surface,
        light,
        junction,
        lanes,
        top_causes,
        chi_square,
        skipped_tests,
        charts,
    };
    report::write_report(&outcome, &config.output_dir.join(config::REPORT_FILE))?;
    advance(progress, "Done");

    Ok(outcome)
}

/// Title and axis descriptions of the four single-column count charts
const COUNT_CHARTS: [(&str, ChartLabels<'static>); 4] = [
    (
        config::WEATHER_CHART,
        ChartLabels {
            title: "Accident count by Weather conditions",
            x_label: "Weather conditions",
            y_label: "Number of accidents",
        },
    ),
    (
        config::ROAD_SURFACE_CHART,
        ChartLabels {
            title: "Accident count by Road surface type",
            x_label: "Road surface type",
            y_label: "Number of accidents",
        },
    ),
    (
        config::LIGHT_CHART,
        ChartLabels {
            title: "Accident count by Light conditions (proxy for time of day)",
            x_label: "Light conditions",
            y_label: "Number of accidents",
        },
    ),
    (
        config::JUNCTION_CHART,
        ChartLabels {
            title: "Accident count by Junction type",
            x_label: "Types of junction",
            y_label: "Number of accidents",
        },
    ),
];

/// Render all seven charts, skipping those whose data is empty
///
/// `counts` holds the weather, road surface, light and junction tables, in that order.
fn render_charts(
    cleaned: &AccidentTable,
    counts: &[&FrequencyTable; 4],
    top_causes: &FrequencyTable,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for ((file_name, labels), frequency) in COUNT_CHARTS.iter().zip(counts) {
        let path = output_dir.join(file_name);
        if skip_empty(frequency.is_empty(), &path) {
            continue;
        }
        create_bar_chart(frequency, labels, &path)?;
        written.push(saved(path));
    }

    let path = output_dir.join(config::TOP_CAUSES_CHART);
    if !skip_empty(top_causes.is_empty(), &path) {
        create_horizontal_bar_chart(
            &top_causes.sorted_ascending(),
            &ChartLabels {
                title: "Top contributing causes of accidents (top 15)",
                x_label: "Number of accidents",
                y_label: "Cause of accident",
            },
            &path,
        )?;
        written.push(saved(path));
    }

    let severity_by_weather = crosstab(cleaned, config::WEATHER, config::SEVERITY)?;
    let path = output_dir.join(config::SEVERITY_BY_WEATHER_CHART);
    if !skip_empty(severity_by_weather.is_empty(), &path) {
        create_stacked_bar_chart(
            &severity_by_weather.row_normalized(),
            &ChartLabels {
                title: "Proportion of Accident severity by Weather condition (stacked, normalized)",
                x_label: "Weather conditions",
                y_label: "Proportion of accidents",
            },
            &path,
        )?;
        written.push(saved(path));
    }

    let weather_by_road = crosstab(cleaned, config::WEATHER, config::ROAD_SURFACE)?;
    let path = output_dir.join(config::WEATHER_ROAD_HEATMAP);
    if !skip_empty(weather_by_road.is_empty(), &path) {
        create_heatmap(
            &weather_by_road,
            &ChartLabels {
                title: "Accident counts: Weather vs Road surface type (heatmap)",
                x_label: "Road surface type (index order)",
                y_label: "Weather conditions (index order)",
            },
            "Accident counts",
            &path,
        )?;
        written.push(saved(path));
    }

    Ok(written)
}

fn skip_empty(empty: bool, path: &Path) -> bool {
    if empty {
        log::warn!("No records to plot, skipping {}", path.display());
    }
    empty
}

fn saved(path: PathBuf) -> PathBuf {
    log::info!("Saved chart {}", path.display());
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "Time,Day_of_week,Road_surface_type,Weather_conditions,Light_conditions,\
                          Types_of_Junction,Lanes_or_Medians,Cause_of_accident,Accident_severity,\
                          Type_of_collision";

    fn write_input(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("input.csv");
        fs::write(&path, format!("{HEADER}\n{body}")).unwrap();
        path
    }

    fn config_for(dir: &Path, input: PathBuf) -> AnalysisConfig {
        AnalysisConfig {
            input,
            output_dir: dir.join("outputs"),
            yates_correction: false,
            render_charts: false,
        }
    }

    fn sample_body() -> String {
        let rows = [
            ("Dry", "Normal", "Daylight", "Y Shape", "Undivided Two way", "Changing lane to the left", "Slight Injury", "Rollover"),
            ("Dry", "Normal", "Darkness - lights lit", "No junction", "Two-way (divided with broken lines road marking)", "Moving Backward", "Serious Injury", "Collision with roadside objects"),
            ("Wet or damp", "Raining", "Daylight", "Y Shape", "Undivided Two way", "No distancing", "Slight Injury", "Vehicle with vehicle collision"),
            ("Dry", "Normal", "Daylight", "Crossing", "", "Overtaking", "Fatal injury", "Rollover"),
            ("Wet or damp", "Raining", "Darkness - no lighting", "Y Shape", "One way", "No distancing", "Serious Injury", "Vehicle with vehicle collision"),
            ("Dry", "Normal", "Daylight", "No junction", "One way", "Moving Backward", "Slight Injury", "Rollover"),
            ("Dry", "Raining", "Daylight", "Crossing", "Undivided Two way", "Overtaking", "Fatal injury", "Rollover"),
        ];

        rows.iter()
            .enumerate()
            .map(|(i, (road, weather, light, junction, lanes, cause, severity, collision))| {
                format!(
                    "17:0{i}:00,Monday,{road},{weather},{light},{junction},{lanes},{cause},{severity},{collision}\n"
                )
            })
            .collect()
    }

    #[test]
    fn full_run_without_charts() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), &sample_body());
        let config = config_for(dir.path(), input);

        let outcome = run(&config, &ProgressBar::hidden()).unwrap();

        assert_eq!(outcome.input_rows, 7);
        assert_eq!(outcome.cleaned_rows, 6);
        assert_eq!(outcome.weather.total(), 6);
        assert_eq!(outcome.road_surface.total(), 6);
        assert_eq!(outcome.weather.entries()[0].value, "Normal");
        assert_eq!(outcome.chi_square.len(), 4);
        assert!(outcome.skipped_tests.is_empty());
        assert!(outcome.charts.is_empty());

        let lanes_missing = outcome
            .missing_before
            .iter()
            .find(|missing| missing.column == config::LANES)
            .unwrap();
        assert_eq!(lanes_missing.missing, 1);

        let cleaned = fs::read_to_string(config.output_dir.join(config::CLEANED_CSV)).unwrap();
        assert_eq!(cleaned.lines().count(), 7);
        assert!(cleaned.starts_with("Time,Day_of_week,"));

        let summary = fs::read_to_string(config.output_dir.join(config::CHI_SQUARE_CSV)).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "variable,chi2,p_value,dof,table_shape");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("Weather_conditions,"));
        assert!(lines[4].starts_with("Types_of_Junction,"));

        assert!(config.output_dir.join(config::REPORT_FILE).exists());
    }

    #[test]
    fn reruns_produce_identical_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), &sample_body());
        let config = config_for(dir.path(), input);

        run(&config, &ProgressBar::hidden()).unwrap();
        let cleaned = fs::read(config.output_dir.join(config::CLEANED_CSV)).unwrap();
        let summary = fs::read(config.output_dir.join(config::CHI_SQUARE_CSV)).unwrap();

        run(&config, &ProgressBar::hidden()).unwrap();
        assert_eq!(cleaned, fs::read(config.output_dir.join(config::CLEANED_CSV)).unwrap());
        assert_eq!(summary, fs::read(config.output_dir.join(config::CHI_SQUARE_CSV)).unwrap());
    }

    #[test]
    fn zero_rows_after_cleaning_writes_header_only_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "17:00:00,Monday,,Normal,Daylight,Y Shape,One way,Overtaking,Slight Injury,Rollover\n",
        );
        let mut config = config_for(dir.path(), input);
        // Empty tables are skipped rather than rendered
        config.render_charts = true;

        let outcome = run(&config, &ProgressBar::hidden()).unwrap();

        assert_eq!(outcome.cleaned_rows, 0);
        assert!(outcome.chi_square.is_empty());
        assert_eq!(outcome.skipped_tests.len(), 4);
        assert!(outcome.charts.is_empty());

        let cleaned = fs::read_to_string(config.output_dir.join(config::CLEANED_CSV)).unwrap();
        assert_eq!(cleaned, format!("{HEADER}\n"));
        let summary = fs::read_to_string(config.output_dir.join(config::CHI_SQUARE_CSV)).unwrap();
        assert_eq!(summary, "variable,chi2,p_value,dof,table_shape\n");
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn full_run_writes_seven_charts() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), &sample_body());
        let mut config = config_for(dir.path(), input);
        config.render_charts = true;

        let outcome = run(&config, &ProgressBar::hidden()).unwrap();

        let expected = [
            config::WEATHER_CHART,
            config::ROAD_SURFACE_CHART,
            config::LIGHT_CHART,
            config::JUNCTION_CHART,
            config::TOP_CAUSES_CHART,
            config::SEVERITY_BY_WEATHER_CHART,
            config::WEATHER_ROAD_HEATMAP,
        ]
        .map(|name| config.output_dir.join(name));
        assert_eq!(outcome.charts, expected);

        for path in &expected {
            assert!(fs::metadata(path).unwrap().len() > 0, "{}", path.display());
        }
    }

    #[test]
    fn missing_input_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), dir.path().join("absent.csv"));

        let err = run(&config, &ProgressBar::hidden()).unwrap_err();
        assert!(matches!(err, AnalysisError::Parsing(_)));
    }

    #[test]
    fn missing_required_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.csv");
        fs::write(&input, "Weather_conditions,Accident_severity\nNormal,Slight Injury\n").unwrap();
        let config = config_for(dir.path(), input);

        let err = run(&config, &ProgressBar::hidden()).unwrap_err();
        assert!(matches!(err, AnalysisError::Cleaning(_)));
    }
}
