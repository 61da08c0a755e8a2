//! Text report of a completed run
//!
//! The same tables are printed to the terminal by [`display`] and saved to disk by
//! [`write_report`], the report additionally listing skipped tests and written charts.

use crate::common::tables::{format_chi_square_table, format_frequency_table, format_missing_table};
use crate::pipeline::AnalysisOutcome;
use std::fs;
use std::path::Path;

fn summary_line(outcome: &AnalysisOutcome) -> String {
    format!(
        "Records loaded: {}, kept after cleaning: {}, dropped: {}",
        outcome.input_rows,
        outcome.cleaned_rows,
        outcome.input_rows - outcome.cleaned_rows
    )
}

/// Render the full report
pub fn render_report(outcome: &AnalysisOutcome) -> String {
    let mut report = String::new();
    let sections = [
        format_missing_table(&outcome.missing_before, Some("Missing values before cleaning")),
        format_frequency_table(&outcome.weather, Some("Weather conditions")),
        format_frequency_table(&outcome.road_surface, Some("Road surface type")),
        format_frequency_table(&outcome.light, Some("Light conditions")),
        format_frequency_table(&outcome.junction, Some("Types of junction")),
        format_frequency_table(&outcome.lanes, Some("Lanes or medians")),
        format_frequency_table(&outcome.top_causes, Some("Top causes of accidents")),
        format_chi_square_table(
            &outcome.chi_square,
            Some("Chi-square tests against Accident_severity"),
        ),
    ];

    report.push_str(&format!("{}\n\n", summary_line(outcome)));
    for section in sections {
        report.push_str(&format!("{section}\n\n"));
    }

    if !outcome.skipped_tests.is_empty() {
        report.push_str("Skipped tests:\n");
        for skipped in &outcome.skipped_tests {
            report.push_str(&format!("- {skipped}\n"));
        }
        report.push('\n');
    }

    if outcome.charts.is_empty() {
        report.push_str("No charts were written.\n");
    } else {
        report.push_str("Charts:\n");
        for chart in &outcome.charts {
            report.push_str(&format!("- {}\n", chart.display()));
        }
    }

    report
}

/// Save the rendered report to `output_path`, replacing any previous report
pub fn write_report(outcome: &AnalysisOutcome, output_path: &Path) -> std::io::Result<()> {
    fs::write(output_path, render_report(outcome))?;
    log::info!("Wrote report to {}", output_path.display());
    Ok(())
}

/// Print the tables of interest to stdout
pub fn display(outcome: &AnalysisOutcome) {
    println!("{}\n", summary_line(outcome));
    println!(
        "{}\n",
        format_missing_table(&outcome.missing_before, Some("Missing values before cleaning"))
    );
    println!(
        "{}\n",
        format_frequency_table(&outcome.weather, Some("Weather condition counts"))
    );
    println!(
        "{}\n",
        format_frequency_table(&outcome.road_surface, Some("Road surface counts"))
    );
    println!(
        "{}",
        format_chi_square_table(&outcome.chi_square, Some("Chi-square tests summary"))
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ChiSquareError, ChiSquareResult, FrequencyTable, MissingCount};
    use crate::common::data_structures::test_support::table_from;
    use std::path::PathBuf;

    fn outcome() -> AnalysisOutcome {
        let records = table_from(
            &["w", "r"],
            &[&["Normal", "Dry"], &["Raining", "Dry"], &["Normal", "Wet or damp"]],
        );
        let count = |column: &str| FrequencyTable::from_column(&records, column).unwrap();

        AnalysisOutcome {
            output_dir: PathBuf::from("out"),
            input_rows: 4,
            cleaned_rows: 3,
            missing_before: vec![MissingCount {
                column: "w".into(),
                missing: 1,
            }],
            weather: count("w"),
            road_surface: count("r"),
            light: count("w"),
            junction: count("r"),
            lanes: count("r"),
            top_causes: count("w"),
            chi_square: vec![ChiSquareResult {
                variable: "w".into(),
                statistic: 0.75,
                p_value: 0.386,
                dof: 1,
                shape: (2, 2),
                expected: Vec::new(),
            }],
            skipped_tests: vec![ChiSquareError::EmptyTable("r".into())],
            charts: vec![PathBuf::from("out/weather_counts.png")],
        }
    }

    #[test]
    fn report_contains_every_section() {
        let report = render_report(&outcome());

        assert!(report.starts_with("Records loaded: 4, kept after cleaning: 3, dropped: 1"));
        for title in [
            "Missing values before cleaning",
            "Weather conditions",
            "Road surface type",
            "Light conditions",
            "Types of junction",
            "Lanes or medians",
            "Top causes of accidents",
            "Chi-square tests against Accident_severity",
            "Skipped tests:",
            "Charts:",
        ] {
            assert!(report.contains(title), "missing section {title}");
        }
        assert!(report.contains("66.67%"));
        assert!(report.contains("out/weather_counts.png"));
    }

    #[test]
    fn report_lists_skipped_tests_and_charts() {
        let report = render_report(&outcome());

        assert!(report.contains(
            "Skipped tests:\n- Contingency table for 'r' has no observations\n\n"
        ));
        assert!(report.ends_with("Charts:\n- out/weather_counts.png\n"));
    }

    #[test]
    fn report_without_charts_or_skips() {
        let mut outcome = outcome();
        outcome.charts.clear();
        outcome.skipped_tests.clear();

        let report = render_report(&outcome);
        assert!(!report.contains("Skipped tests:"));
        assert!(report.ends_with("No charts were written.\n"));
    }

    #[test]
    fn written_report_matches_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let outcome = outcome();

        write_report(&outcome, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), render_report(&outcome));
    }
}
