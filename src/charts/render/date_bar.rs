use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppResult;

use super::super::buckets::Bucket;
use super::super::request::DateBarStyle;
use super::super::theme::ChartTheme;
use super::axis::{dashed_line, date_ticks, format_serial_day, style_mesh, text, value_range};

/// Share of each bucket's width covered by its bar.
const BAR_FILL: f64 = 0.7;
const X_LABELS: usize = 8;
const TICK_FONT_SIZE: u32 = 12;
const THRESHOLD_DASHES: u32 = 48;
const THRESHOLD_DASH_FILL: f64 = 0.6;

pub(super) fn draw_date_bar_chart(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    theme: &ChartTheme,
    buckets: &[Bucket],
    style: &DateBarStyle,
) -> AppResult<()> {
    root.fill(&theme.background)?;

    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return Ok(());
    };
    let x_range = first.start..last.end;
    let y_range = value_range(
        buckets
            .iter()
            .map(|bucket| bucket.total)
            .chain(style.threshold()),
    );
    let ticks = date_ticks(last.end - first.start);

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(if ticks.rotate { 90 } else { 40 })
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), y_range)?;
    chart.plotting_area().fill(&theme.plot_background)?;

    let format_x = |x: &f64| format_serial_day(*x, ticks.pattern);
    let tick_style = if ticks.rotate {
        text(theme, TICK_FONT_SIZE).transform(FontTransform::Rotate90)
    } else {
        text(theme, TICK_FONT_SIZE)
    };
    {
        let mut mesh = chart.configure_mesh();
        style_mesh(&mut mesh, theme);
        mesh.x_labels(X_LABELS)
            .x_label_style(tick_style)
            .x_label_formatter(&format_x)
            .draw()?;
    }

    chart.draw_series(buckets.iter().map(|bucket| {
        let inset = bucket.width() * (1.0 - BAR_FILL) / 2.0;
        Rectangle::new(
            [
                (bucket.start + inset, 0.0),
                (bucket.end - inset, bucket.total),
            ],
            style.color.filled(),
        )
    }))?;

    if let Some(threshold) = style.threshold() {
        chart.draw_series(
            dashed_line(
                (x_range.start, threshold),
                (x_range.end, threshold),
                THRESHOLD_DASHES,
                THRESHOLD_DASH_FILL,
            )
            .map(|segment| PathElement::new(segment, style.horizontal_color.stroke_width(2))),
        )?;
    }

    Ok(())
}
