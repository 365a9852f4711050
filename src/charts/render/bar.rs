use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppResult;

use super::super::request::BarRequest;
use super::super::theme::ChartTheme;
use super::axis::{dashed_line, style_mesh, text, value_range};

const TITLE_FONT_SIZE: u32 = 22;
/// Half of a bar's width, in category slots.
const BAR_HALF_WIDTH: f64 = 0.4;
const MAX_X_LABELS: usize = 40;
const Y_LABELS: usize = 10;
const GRID_DASHES: u32 = 40;
const GRID_DASH_FILL: f64 = 0.5;

pub(super) fn draw_bar_chart(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    theme: &ChartTheme,
    request: &BarRequest,
) -> AppResult<()> {
    root.fill(&theme.background)?;

    let pairs: Vec<(&str, f64)> = request.pairs().collect();
    let slots = pairs.len().max(1);
    let x_range = -0.5..(slots as f64 - 0.5);
    let y_range = value_range(pairs.iter().map(|(_, value)| *value));
    let (x_bounds, y_bounds) = ((x_range.start, x_range.end), (y_range.start, y_range.end));

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60);
    if !request.title.is_empty() {
        builder.caption(&request.title, text(theme, TITLE_FONT_SIZE));
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;
    chart.plotting_area().fill(&theme.plot_background)?;

    let format_x = |x: &f64| slot_label(&pairs, *x);
    {
        let mut mesh = chart.configure_mesh();
        style_mesh(&mut mesh, theme);
        mesh.x_desc(request.xlabel.as_str())
            .y_desc(request.ylabel.as_str())
            .x_labels(slots.min(MAX_X_LABELS))
            .y_labels(Y_LABELS)
            .x_label_formatter(&format_x)
            .draw()?;
    }

    chart.draw_series(pairs.iter().enumerate().map(|(index, (_, value))| {
        let center = index as f64;
        Rectangle::new(
            [(center - BAR_HALF_WIDTH, 0.0), (center + BAR_HALF_WIDTH, *value)],
            request.color.filled(),
        )
    }))?;

    if request.grid {
        let coords = chart.as_coord_spec();
        let vertical = coords
            .x_spec()
            .key_points(slots.min(MAX_X_LABELS))
            .into_iter()
            .filter(|x| *x >= 0.0 && (x - x.round()).abs() < 1e-6)
            .map(|x| ((x, y_bounds.0), (x, y_bounds.1)));
        let horizontal = coords
            .y_spec()
            .key_points(Y_LABELS)
            .into_iter()
            .map(|y| ((x_bounds.0, y), (x_bounds.1, y)));
        chart.draw_series(
            vertical
                .chain(horizontal)
                .flat_map(|(from, to)| dashed_line(from, to, GRID_DASHES, GRID_DASH_FILL))
                .map(|segment| PathElement::new(segment, theme.grid.stroke_width(1))),
        )?;
    }

    Ok(())
}

/// Category label for an axis position; only whole slot positions get one.
fn slot_label(pairs: &[(&str, f64)], x: f64) -> String {
    let slot = x.round();
    if slot < 0.0 || (x - slot).abs() > 1e-6 {
        return String::new();
    }
    pairs
        .get(slot as usize)
        .map(|(label, _)| (*label).to_owned())
        .unwrap_or_default()
}
