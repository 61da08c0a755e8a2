//! Plotting infrastructure for category charts
//!
//! This module renders count tables and cross-tabulations with the [`plotters`] crate.
//! Charts are saved as PNG files with fixed 1200x800 resolution. Four chart kinds exist:
//! - [`create_bar_chart`]: vertical bars, one per category
//! - [`create_horizontal_bar_chart`]: horizontal bars, one per category
//! - [`create_stacked_bar_chart`]: stacked proportions per row category
//! - [`create_heatmap`]: colour-scaled grid of co-occurrence counts
//!
//! Count axes use integer coordinates, so every tick mark is a whole number.

use crate::analysis::{ContingencyTable, FrequencyTable, ProportionTable};
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

const CHART_SIZE: (u32, u32) = (1200, 800);

/// Width reserved on the right of a heatmap for its colour scale
const SCALE_WIDTH: u32 = 170;

/// Width reserved on the right of a stacked bar chart for its legend
const LEGEND_WIDTH: u32 = 240;

/// Vertical distance between legend entries
const LEGEND_ROW_HEIGHT: i32 = 28;

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Colour cycle for stacked series
const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Anchor colours of the heatmap scale, from lowest to highest count
const HEAT_STOPS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Title and axis descriptions of a chart
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Index of the last category, used as the inclusive end of a segmented axis
fn last_index(count: usize) -> u32 {
    (count as u32).saturating_sub(1)
}

/// Lower edge of the segment holding category `index`
fn segment_start(index: usize) -> SegmentValue<u32> {
    SegmentValue::Exact(index as u32)
}

/// Upper edge of the segment holding category `index`
fn segment_end(index: usize, count: usize) -> SegmentValue<u32> {
    if index + 1 >= count {
        SegmentValue::Last
    } else {
        SegmentValue::Exact(index as u32 + 1)
    }
}

/// Tick label of a category axis; only segment centres are labelled
fn category_label(categories: &[&str], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(index) => categories
            .get(*index as usize)
            .map(|category| category.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Colour of the stacked series at `index`, cycling through [`SERIES_COLORS`]
fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Pixel offset of the top of legend entry `index`, below the legend title
fn legend_entry_top(index: usize) -> i32 {
    120 + index as i32 * LEGEND_ROW_HEIGHT
}

/// Upper bound of a count axis, leaving headroom above the tallest bar
fn count_axis_max(max_count: u64) -> u64 {
    max_count + max_count / 10 + 1
}

/// Colour of a heatmap cell for a value scaled into 0.0..=1.0
pub fn heat_color(fraction: f64) -> RGBColor {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scaled = fraction * (HEAT_STOPS.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(HEAT_STOPS.len() - 2);
    let t = scaled - index as f64;

    let (r0, g0, b0) = HEAT_STOPS[index];
    let (r1, g1, b1) = HEAT_STOPS[index + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

fn rotated_label_style() -> TextStyle<'static> {
    ("sans-serif", 18)
        .into_font()
        .transform(FontTransform::Rotate90)
        .into()
}

/// Creates a vertical bar chart of category counts and saves it as a PNG file
///
/// Bars are drawn in the order of the frequency table, i.e. by descending count.
///
/// # Arguments
/// * `frequency` - Category counts to plot
/// * `labels` - Chart title and axis descriptions
/// * `output_path` - Path where the PNG file should be saved
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If the table is empty or rendering failed
pub fn create_bar_chart(
    frequency: &FrequencyTable,
    labels: &ChartLabels<'_>,
    output_path: &Path,
) -> Result<()> {
    if frequency.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "No counts to plot for '{}'",
            frequency.column()
        )));
    }

    let categories: Vec<&str> = frequency
        .entries()
        .iter()
        .map(|entry| entry.value.as_str())
        .collect();

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(230)
        .y_label_area_size(85)
        .build_cartesian_2d(
            (0u32..last_index(categories.len())).into_segmented(),
            0u64..count_axis_max(frequency.max_count()),
        )
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len())
        .x_label_formatter(&|segment| category_label(&categories, segment))
        .x_label_style(rotated_label_style())
        .y_label_formatter(&|count| count.to_string())
        .y_label_style(("sans-serif", 20))
        .x_desc(labels.x_label)
        .y_desc(labels.y_label)
        .axis_desc_style(("sans-serif", 26))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BAR_COLOR.filled())
                .margin(8)
                .data(
                    frequency
                        .entries()
                        .iter()
                        .enumerate()
                        .map(|(index, entry)| (index as u32, entry.count)),
                ),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a horizontal bar chart of category counts and saves it as a PNG file
///
/// The first entry of `frequency` is drawn at the bottom, so pass an ascending table
/// (see [`FrequencyTable::sorted_ascending`]) to get the largest bar on top.
///
/// # Arguments
/// * `frequency` - Category counts to plot
/// * `labels` - Chart title and axis descriptions; `x_label` describes the count axis
/// * `output_path` - Path where the PNG file should be saved
pub fn create_horizontal_bar_chart(
    frequency: &FrequencyTable,
    labels: &ChartLabels<'_>,
    output_path: &Path,
) -> Result<()> {
    if frequency.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "No counts to plot for '{}'",
            frequency.column()
        )));
    }

    let categories: Vec<&str> = frequency
        .entries()
        .iter()
        .map(|entry| entry.value.as_str())
        .collect();
    let max_count = frequency
        .entries()
        .iter()
        .map(|entry| entry.count)
        .max()
        .unwrap_or(0);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(380)
        .build_cartesian_2d(
            0u64..count_axis_max(max_count),
            (0u32..last_index(categories.len())).into_segmented(),
        )
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(categories.len())
        .y_label_formatter(&|segment| category_label(&categories, segment))
        .y_label_style(("sans-serif", 18))
        .x_label_formatter(&|count| count.to_string())
        .x_label_style(("sans-serif", 20))
        .x_desc(labels.x_label)
        .y_desc(labels.y_label)
        .axis_desc_style(("sans-serif", 26))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            Histogram::horizontal(&chart)
                .style(BAR_COLOR.filled())
                .margin(6)
                .data(
                    frequency
                        .entries()
                        .iter()
                        .enumerate()
                        .map(|(index, entry)| (index as u32, entry.count)),
                ),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a stacked bar chart of row proportions and saves it as a PNG file
///
/// Each row category gets one bar; each column category is a coloured segment of that
/// bar, named in a legend drawn to the right of the plot.
///
/// # Arguments
/// * `proportions` - Row-normalised cross-tabulation
/// * `labels` - Chart title and axis descriptions
/// * `output_path` - Path where the PNG file should be saved
pub fn create_stacked_bar_chart(
    proportions: &ProportionTable,
    labels: &ChartLabels<'_>,
    output_path: &Path,
) -> Result<()> {
    if proportions.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "No proportions to plot for '{}' by '{}'",
            proportions.column_variable, proportions.row_variable
        )));
    }

    let categories: Vec<&str> = proportions.row_labels.iter().map(String::as_str).collect();
    let rows = categories.len();

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    let (plot_area, legend_area) = root.split_horizontally(CHART_SIZE.0 - LEGEND_WIDTH);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(labels.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(230)
        .y_label_area_size(85)
        .build_cartesian_2d((0u32..last_index(rows)).into_segmented(), 0f64..1f64)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(rows)
        .x_label_formatter(&|segment| category_label(&categories, segment))
        .x_label_style(rotated_label_style())
        .y_label_formatter(&|proportion| format!("{proportion:.1}"))
        .y_label_style(("sans-serif", 20))
        .x_desc(labels.x_label)
        .y_desc(labels.y_label)
        .axis_desc_style(("sans-serif", 26))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut bottoms = vec![0.0; rows];
    for column in 0..proportions.column_labels.len() {
        let color = series_color(column);
        let segments: Vec<Rectangle<(SegmentValue<u32>, f64)>> = proportions
            .proportions
            .iter()
            .enumerate()
            .map(|(row, values)| {
                let bottom = bottoms[row];
                let top = bottom + values[column];
                bottoms[row] = top;

                let mut segment = Rectangle::new(
                    [(segment_start(row), bottom), (segment_end(row, rows), top)],
                    color.filled(),
                );
                segment.set_margin(0, 0, 10, 10);
                segment
            })
            .collect();

        chart
            .draw_series(segments)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    // Legend sits beside the plot so it never covers a bar
    legend_area
        .draw(&Text::new(
            proportions.column_variable.as_str(),
            (10, legend_entry_top(0) - LEGEND_ROW_HEIGHT),
            ("sans-serif", 20),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (column, column_label) in proportions.column_labels.iter().enumerate() {
        let top = legend_entry_top(column);
        legend_area
            .draw(&Rectangle::new(
                [(10, top), (28, top + 18)],
                series_color(column).filled(),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        legend_area
            .draw(&Text::new(
                column_label.as_str(),
                (36, top + 1),
                ("sans-serif", 18),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a heatmap of co-occurrence counts and saves it as a PNG file
///
/// Column categories run along the X-axis and row categories up the Y-axis, with the
/// first row at the bottom. A colour scale with integer ticks is drawn on the right.
///
/// # Arguments
/// * `table` - Cross-tabulated counts
/// * `labels` - Chart title and axis descriptions
/// * `scale_label` - Description of the colour scale
/// * `output_path` - Path where the PNG file should be saved
pub fn create_heatmap(
    table: &ContingencyTable,
    labels: &ChartLabels<'_>,
    scale_label: &str,
    output_path: &Path,
) -> Result<()> {
    if table.is_empty() {
        return Err(PlotError::InvalidData(format!(
            "No counts to plot for '{}' by '{}'",
            table.row_variable(),
            table.column_variable()
        )));
    }

    let row_labels: Vec<&str> = table.row_labels().iter().map(String::as_str).collect();
    let column_labels: Vec<&str> = table.column_labels().iter().map(String::as_str).collect();
    let (rows, columns) = table.shape();
    let max_count = table.max_count().max(1);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    let (plot_area, scale_area) = root.split_horizontally(CHART_SIZE.0 - SCALE_WIDTH);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(labels.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(230)
        .y_label_area_size(220)
        .build_cartesian_2d(
            (0u32..last_index(columns)).into_segmented(),
            (0u32..last_index(rows)).into_segmented(),
        )
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(columns)
        .y_labels(rows)
        .x_label_formatter(&|segment| category_label(&column_labels, segment))
        .y_label_formatter(&|segment| category_label(&row_labels, segment))
        .x_label_style(rotated_label_style())
        .y_label_style(("sans-serif", 18))
        .x_desc(labels.x_label)
        .y_desc(labels.y_label)
        .axis_desc_style(("sans-serif", 24))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(table.counts().iter().enumerate().flat_map(|(row, counts)| {
            counts.iter().enumerate().map(move |(column, &count)| {
                Rectangle::new(
                    [
                        (segment_start(column), segment_start(row)),
                        (segment_end(column, columns), segment_end(row, rows)),
                    ],
                    heat_color(count as f64 / max_count as f64).filled(),
                )
            })
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Colour scale
    let mut scale = ChartBuilder::on(&scale_area)
        .margin_top(80)
        .margin_bottom(250)
        .margin_right(30)
        .y_label_area_size(80)
        .build_cartesian_2d(0u32..1u32, 0u64..max_count)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    scale
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_label_formatter(&|count| count.to_string())
        .y_label_style(("sans-serif", 16))
        .y_desc(scale_label)
        .axis_desc_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let step = (max_count / 256).max(1);
    scale
        .draw_series((0..max_count).step_by(step as usize).map(|value| {
            Rectangle::new(
                [(0u32, value), (1u32, (value + step).min(max_count))],
                heat_color(value as f64 / max_count as f64).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}
