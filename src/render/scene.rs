//! Builds the static-export [`RenderFrame`] from the configuration view-model
//! and the active data bundle.
//!
//! This is deliberately a presentation layer: it reads the store and bundle,
//! never mutates them, and owns the interpolation policy for the chart
//! variants that request it (the binder itself never fills gaps).

use tracing::trace;

use crate::config::{ideal_bounds, ChartConfigStore, ChartType, RenderEnvironment, Year};
use crate::data::{TimeSeriesBundle, TimeSeriesPoint};
use crate::error::ChartResult;
use crate::render::{
    Color, PolygonPrimitive, PolylinePrimitive, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};

const PALETTE: [Color; 6] = [
    Color::rgb(0.196, 0.475, 0.702),
    Color::rgb(0.839, 0.373, 0.184),
    Color::rgb(0.302, 0.624, 0.290),
    Color::rgb(0.580, 0.349, 0.663),
    Color::rgb(0.973, 0.639, 0.118),
    Color::rgb(0.420, 0.420, 0.420),
];

const AXIS_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);
const TITLE_COLOR: Color = Color::rgb(0.1, 0.1, 0.1);
const BACKGROUND: Color = Color::rgb(1.0, 1.0, 1.0);

const MARGIN: f64 = 48.0;
const TITLE_BAND: f64 = 44.0;
const TITLE_FONT_PX: f64 = 20.0;
const LABEL_FONT_PX: f64 = 12.0;

/// Plot rectangle in pixel space, y growing downward.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PlotArea {
    fn width(self) -> f64 {
        self.right - self.left
    }

    fn height(self) -> f64 {
        self.bottom - self.top
    }
}

/// One drawable series: an entity's observations for one variable, already
/// filtered to the configured time domain and entity selection.
struct SeriesSlice<'a> {
    entity: &'a str,
    points: Vec<TimeSeriesPoint>,
}

/// Builds the full export frame for the current configuration and data.
///
/// A configuration with zero dimensions (or no data yet) produces a valid
/// frame containing only the background, matching the empty-chart state.
pub fn build_frame(
    store: &ChartConfigStore,
    bundle: Option<&TimeSeriesBundle>,
    env: &RenderEnvironment,
) -> ChartResult<RenderFrame> {
    let bounds = ideal_bounds(store.chart_type(), env);
    let mut frame = RenderFrame::new(bounds).with_rect(RectPrimitive::new(
        0.0,
        0.0,
        f64::from(bounds.width),
        f64::from(bounds.height),
        BACKGROUND,
    ));

    let mut plot = PlotArea {
        left: MARGIN,
        top: MARGIN,
        right: f64::from(bounds.width) - MARGIN,
        bottom: f64::from(bounds.height) - MARGIN,
    };

    if let Some(title) = store.title().filter(|t| !t.is_empty()) {
        frame.texts.push(TextPrimitive::new(
            title,
            f64::from(bounds.width) / 2.0,
            MARGIN * 0.75,
            TITLE_FONT_PX,
            TITLE_COLOR,
            TextHAlign::Center,
        ));
        plot.top += TITLE_BAND - MARGIN * 0.25;
    }

    let series = collect_series(store, bundle);
    trace!(
        chart_type = store.chart_type().name(),
        series_count = series.len(),
        "building export frame"
    );
    if series.is_empty() {
        frame.validate()?;
        return Ok(frame);
    }

    match store.chart_type() {
        ChartType::LineChart => draw_lines(&mut frame, plot, &series),
        ChartType::SlopeChart => draw_slopes(&mut frame, plot, &series),
        ChartType::StackedArea => draw_stacked_area(&mut frame, plot, &series),
        ChartType::StackedBar => draw_stacked_bars(&mut frame, plot, &series),
        ChartType::DiscreteBar => draw_discrete_bars(&mut frame, plot, &series),
        ChartType::WorldMap => draw_choropleth_cells(&mut frame, plot, &series),
    }

    if store.chart_type() != ChartType::WorldMap {
        draw_axes(&mut frame, plot);
    }

    frame.validate()?;
    Ok(frame)
}

/// Linear gap filling for chart variants that request it.
///
/// Leading and trailing gaps are dropped; interior `None` runs are bridged
/// between their finite neighbors. The binder never applies this; it is
/// strictly a consumer-side policy.
#[must_use]
pub fn interpolate_gaps(points: &[TimeSeriesPoint]) -> Vec<(Year, f64)> {
    let mut filled: Vec<(Year, f64)> = Vec::with_capacity(points.len());
    for (index, &(year, value)) in points.iter().enumerate() {
        if let Some(value) = value {
            filled.push((year, value));
            continue;
        }
        let prev = points[..index]
            .iter()
            .rev()
            .find_map(|&(y, v)| v.map(|v| (y, v)));
        let next = points[index + 1..]
            .iter()
            .find_map(|&(y, v)| v.map(|v| (y, v)));
        if let (Some((py, pv)), Some((ny, nv))) = (prev, next) {
            // Widen before subtracting; year pairs can span the full i32 range.
            let span = f64::from(ny) - f64::from(py);
            let t = if span == 0.0 {
                0.0
            } else {
                (f64::from(year) - f64::from(py)) / span
            };
            filled.push((year, pv + (nv - pv) * t));
        }
    }
    filled
}

fn collect_series<'a>(
    store: &'a ChartConfigStore,
    bundle: Option<&'a TimeSeriesBundle>,
) -> Vec<SeriesSlice<'a>> {
    let Some(bundle) = bundle else {
        return Vec::new();
    };
    let domain = store.time_domain();
    let selection = store.entity_selection();
    let mut series = Vec::new();
    for variable_id in store.variable_ids() {
        for entity in bundle.entities_for(variable_id) {
            if !selection.is_empty() && !selection.iter().any(|e| e == entity) {
                continue;
            }
            let Some(points) = bundle.series(entity, variable_id) else {
                continue;
            };
            let points: Vec<TimeSeriesPoint> = points
                .iter()
                .copied()
                .filter(|(year, _)| domain.contains(*year))
                .collect();
            if !points.is_empty() {
                series.push(SeriesSlice { entity, points });
            }
        }
    }
    series
}

fn year_extent(series: &[SeriesSlice<'_>]) -> (Year, Year) {
    let mut min = Year::MAX;
    let mut max = Year::MIN;
    for slice in series {
        for &(year, _) in &slice.points {
            min = min.min(year);
            max = max.max(year);
        }
    }
    (min, max)
}

fn value_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = 0.0_f64;
    let mut max = f64::MIN;
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }
    if max <= min {
        max = min + 1.0;
    }
    (min, max)
}

fn x_scale(plot: PlotArea, min_year: Year, max_year: Year) -> impl Fn(Year) -> f64 {
    // Widen before subtracting; year pairs can span the full i32 range.
    let span = (f64::from(max_year) - f64::from(min_year)).max(1.0);
    move |year| plot.left + ((f64::from(year) - f64::from(min_year)) / span) * plot.width()
}

fn y_scale(plot: PlotArea, min_value: f64, max_value: f64) -> impl Fn(f64) -> f64 {
    let span = (max_value - min_value).max(f64::EPSILON);
    move |value| plot.bottom - ((value - min_value) / span) * plot.height()
}

fn series_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

fn draw_axes(frame: &mut RenderFrame, plot: PlotArea) {
    frame.polylines.push(PolylinePrimitive::new(
        vec![(plot.left, plot.top), (plot.left, plot.bottom)],
        1.0,
        AXIS_COLOR,
    ));
    frame.polylines.push(PolylinePrimitive::new(
        vec![(plot.left, plot.bottom), (plot.right, plot.bottom)],
        1.0,
        AXIS_COLOR,
    ));
}

fn draw_lines(frame: &mut RenderFrame, plot: PlotArea, series: &[SeriesSlice<'_>]) {
    let (min_year, max_year) = year_extent(series);
    let (min_value, max_value) = value_extent(
        series
            .iter()
            .flat_map(|s| s.points.iter().filter_map(|&(_, v)| v)),
    );
    let sx = x_scale(plot, min_year, max_year);
    let sy = y_scale(plot, min_value, max_value);

    for (index, slice) in series.iter().enumerate() {
        // One polyline per contiguous non-gap run; gaps stay visible as breaks.
        let mut run: Vec<(f64, f64)> = Vec::new();
        for &(year, value) in &slice.points {
            match value {
                Some(value) => run.push((sx(year), sy(value))),
                None => flush_run(frame, &mut run, index),
            }
        }
        flush_run(frame, &mut run, index);
    }
}

fn flush_run(frame: &mut RenderFrame, run: &mut Vec<(f64, f64)>, series_index: usize) {
    if run.len() >= 2 {
        frame.polylines.push(PolylinePrimitive::new(
            std::mem::take(run),
            2.0,
            series_color(series_index),
        ));
    } else {
        run.clear();
    }
}

fn draw_slopes(frame: &mut RenderFrame, plot: PlotArea, series: &[SeriesSlice<'_>]) {
    let (min_year, max_year) = year_extent(series);
    let (min_value, max_value) = value_extent(
        series
            .iter()
            .flat_map(|s| s.points.iter().filter_map(|&(_, v)| v)),
    );
    let sx = x_scale(plot, min_year, max_year);
    let sy = y_scale(plot, min_value, max_value);

    for (index, slice) in series.iter().enumerate() {
        let first = slice.points.iter().find_map(|&(y, v)| v.map(|v| (y, v)));
        let last = slice
            .points
            .iter()
            .rev()
            .find_map(|&(y, v)| v.map(|v| (y, v)));
        if let (Some((y0, v0)), Some((y1, v1))) = (first, last) {
            if y0 != y1 {
                frame.polylines.push(PolylinePrimitive::new(
                    vec![(sx(y0), sy(v0)), (sx(y1), sy(v1))],
                    2.0,
                    series_color(index),
                ));
            }
        }
    }
}

fn draw_stacked_area(frame: &mut RenderFrame, plot: PlotArea, series: &[SeriesSlice<'_>]) {
    // Stacking needs a value for every year, so this variant requests
    // interpolation.
    let filled: Vec<Vec<(Year, f64)>> = series
        .iter()
        .map(|s| interpolate_gaps(&s.points))
        .collect();

    let mut years: Vec<Year> = filled.iter().flatten().map(|&(y, _)| y).collect();
    years.sort_unstable();
    years.dedup();
    if years.is_empty() {
        return;
    }

    let mut baseline = vec![0.0_f64; years.len()];
    let mut layers: Vec<Vec<(f64, f64)>> = Vec::with_capacity(filled.len());
    for slice in &filled {
        let tops: Vec<f64> = years
            .iter()
            .enumerate()
            .map(|(i, year)| {
                let value = slice
                    .iter()
                    .find(|&&(y, _)| y == *year)
                    .map_or(0.0, |&(_, v)| v.max(0.0));
                baseline[i] + value
            })
            .collect();
        layers.push(baseline.iter().copied().zip(tops.iter().copied()).collect());
        baseline = tops;
    }

    let total_max = baseline.iter().copied().fold(1.0_f64, f64::max);
    let sx = x_scale(plot, years[0], *years.last().unwrap_or(&years[0]));
    let sy = y_scale(plot, 0.0, total_max);

    for (index, layer) in layers.iter().enumerate() {
        let mut polygon: Vec<(f64, f64)> = Vec::with_capacity(layer.len() * 2);
        for (i, &(_, top)) in layer.iter().enumerate() {
            polygon.push((sx(years[i]), sy(top)));
        }
        for (i, &(bottom, _)) in layer.iter().enumerate().rev() {
            polygon.push((sx(years[i]), sy(bottom)));
        }
        if polygon.len() >= 3 {
            frame
                .polygons
                .push(PolygonPrimitive::new(polygon, series_color(index)));
        }
    }
}

fn draw_stacked_bars(frame: &mut RenderFrame, plot: PlotArea, series: &[SeriesSlice<'_>]) {
    let mut years: Vec<Year> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|&(y, _)| y))
        .collect();
    years.sort_unstable();
    years.dedup();
    if years.is_empty() {
        return;
    }

    let totals: Vec<f64> = years
        .iter()
        .map(|year| {
            series
                .iter()
                .filter_map(|s| {
                    s.points
                        .iter()
                        .find(|&&(y, _)| y == *year)
                        .and_then(|&(_, v)| v)
                })
                .map(|v| v.max(0.0))
                .sum()
        })
        .collect();
    let total_max = totals.iter().copied().fold(1.0_f64, f64::max);
    let sy = y_scale(plot, 0.0, total_max);

    let slot_width = plot.width() / years.len() as f64;
    let bar_width = (slot_width * 0.7).max(1.0);

    for (slot, year) in years.iter().enumerate() {
        let x = plot.left + slot as f64 * slot_width + (slot_width - bar_width) / 2.0;
        let mut cumulative = 0.0;
        for (index, slice) in series.iter().enumerate() {
            let Some(value) = slice
                .points
                .iter()
                .find(|&&(y, _)| y == *year)
                .and_then(|&(_, v)| v)
            else {
                continue;
            };
            let value = value.max(0.0);
            let y_top = sy(cumulative + value);
            let y_bottom = sy(cumulative);
            frame.rects.push(RectPrimitive::new(
                x,
                y_top,
                bar_width,
                (y_bottom - y_top).max(0.0),
                series_color(index),
            ));
            cumulative += value;
        }
    }
}

fn draw_discrete_bars(frame: &mut RenderFrame, plot: PlotArea, series: &[SeriesSlice<'_>]) {
    // Horizontal bars of the latest observation per entity.
    let latest: Vec<(&str, f64)> = series
        .iter()
        .filter_map(|s| {
            s.points
                .iter()
                .rev()
                .find_map(|&(_, v)| v)
                .map(|v| (s.entity, v))
        })
        .collect();
    if latest.is_empty() {
        return;
    }

    let max_value = latest.iter().map(|&(_, v)| v).fold(1.0_f64, f64::max);
    let slot_height = plot.height() / latest.len() as f64;
    let bar_height = (slot_height * 0.6).max(1.0);

    for (index, &(entity, value)) in latest.iter().enumerate() {
        let y = plot.top + index as f64 * slot_height + (slot_height - bar_height) / 2.0;
        let width = (value.max(0.0) / max_value) * plot.width();
        frame.rects.push(RectPrimitive::new(
            plot.left,
            y,
            width,
            bar_height,
            series_color(index),
        ));
        if !entity.is_empty() {
            frame.texts.push(TextPrimitive::new(
                entity,
                plot.left + 4.0,
                y + bar_height / 2.0 + LABEL_FONT_PX / 2.0,
                LABEL_FONT_PX,
                TITLE_COLOR,
                TextHAlign::Left,
            ));
        }
    }
}

fn draw_choropleth_cells(frame: &mut RenderFrame, plot: PlotArea, series: &[SeriesSlice<'_>]) {
    // Without projection geometry the static export shades one cell per
    // entity, darker for larger latest values, with a legend ramp below.
    let latest: Vec<(&str, f64)> = series
        .iter()
        .filter_map(|s| {
            s.points
                .iter()
                .rev()
                .find_map(|&(_, v)| v)
                .map(|v| (s.entity, v))
        })
        .collect();
    if latest.is_empty() {
        return;
    }

    let max_value = latest.iter().map(|&(_, v)| v).fold(f64::MIN, f64::max);
    let min_value = latest.iter().map(|&(_, v)| v).fold(f64::MAX, f64::min);
    let span = (max_value - min_value).max(f64::EPSILON);

    let columns = (latest.len() as f64).sqrt().ceil().max(1.0) as usize;
    let rows = latest.len().div_ceil(columns);
    let cell_width = plot.width() / columns as f64;
    let cell_height = (plot.height() - 24.0) / rows as f64;

    for (index, &(entity, value)) in latest.iter().enumerate() {
        let column = index % columns;
        let row = index / columns;
        let x = plot.left + column as f64 * cell_width;
        let y = plot.top + row as f64 * cell_height;
        let intensity = (value - min_value) / span;
        let shade = Color::rgb(
            0.92 - 0.72 * intensity,
            0.95 - 0.48 * intensity,
            1.0 - 0.3 * intensity,
        );
        frame.rects.push(RectPrimitive::new(
            x + 1.0,
            y + 1.0,
            (cell_width - 2.0).max(1.0),
            (cell_height - 2.0).max(1.0),
            shade,
        ));
        if !entity.is_empty() {
            frame.texts.push(TextPrimitive::new(
                entity,
                x + cell_width / 2.0,
                y + cell_height / 2.0 + LABEL_FONT_PX / 2.0,
                LABEL_FONT_PX,
                TITLE_COLOR,
                TextHAlign::Center,
            ));
        }
    }

    // Legend ramp across the bottom band.
    let steps = 8;
    let step_width = plot.width() / steps as f64;
    for step in 0..steps {
        let intensity = step as f64 / (steps - 1) as f64;
        let shade = Color::rgb(
            0.92 - 0.72 * intensity,
            0.95 - 0.48 * intensity,
            1.0 - 0.3 * intensity,
        );
        frame.rects.push(RectPrimitive::new(
            plot.left + step as f64 * step_width,
            plot.bottom - 16.0,
            step_width,
            12.0,
            shade,
        ));
    }
}
