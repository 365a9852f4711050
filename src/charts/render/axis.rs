use std::ops::Range;

use chrono::{NaiveDate, NaiveTime};
use plotters::chart::MeshStyle;
use plotters::prelude::*;

use super::super::theme::ChartTheme;

const HEADROOM: f64 = 0.05;
const SECONDS_PER_DAY: f64 = 86_400.0;
const LABEL_FONT_SIZE: u32 = 13;
const DESC_FONT_SIZE: u32 = 15;

pub(super) fn text(theme: &ChartTheme, size: u32) -> TextStyle<'static> {
    ("sans-serif", size).into_font().color(&theme.foreground)
}

/// Applies the dark palette to axes and labels.
///
/// Mesh lines are always off; charts that want a grid draw it dashed with
/// [`dashed_line`].
pub(super) fn style_mesh<X, Y, DB>(mesh: &mut MeshStyle<'_, '_, X, Y, DB>, theme: &ChartTheme)
where
    X: Ranged,
    Y: Ranged,
    DB: DrawingBackend,
{
    mesh.disable_mesh()
        .axis_style(&theme.foreground)
        .label_style(text(theme, LABEL_FONT_SIZE))
        .axis_desc_style(text(theme, DESC_FONT_SIZE));
}

/// Y range that always includes zero, with a little room above the tallest
/// bar (and below the deepest negative one).
pub(super) fn value_range<I>(values: I) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (low, high) = values
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(low, high), value| {
            (low.min(value), high.max(value))
        });
    let pad = (high - low) * HEADROOM;
    let pad = if pad.is_finite() { pad } else { 0.0 };
    let low = if low < 0.0 { low - pad } else { 0.0 };
    let high = if high > 0.0 { high + pad } else { 0.0 };
    if high - low > f64::EPSILON {
        low..high
    } else {
        low..low + 1.0
    }
}

/// Tick label pattern for a date axis, chosen from the visible span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct DateTicks {
    pub(super) pattern: &'static str,
    pub(super) rotate: bool,
}

pub(super) fn date_ticks(span_days: f64) -> DateTicks {
    let pattern = if span_days <= 3.0 {
        "%Y-%m-%d %H:%M"
    } else if span_days <= 90.0 {
        "%b %d"
    } else if span_days <= 3.0 * 365.0 {
        "%Y-%m"
    } else {
        "%Y"
    };
    DateTicks {
        pattern,
        rotate: span_days > 14.0,
    }
}

/// Formats a serial day number (days since 0001-01-01, fraction = time of day).
pub(super) fn format_serial_day(serial: f64, pattern: &str) -> String {
    let day = serial.floor();
    let seconds = ((serial - day) * SECONDS_PER_DAY)
        .round()
        .clamp(0.0, SECONDS_PER_DAY - 1.0) as u32;
    let Ok(day) = i32::try_from(day as i64) else {
        return String::new();
    };
    NaiveDate::from_num_days_from_ce_opt(day)
        .zip(NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0))
        .map(|(date, time)| date.and_time(time).format(pattern).to_string())
        .unwrap_or_default()
}

/// Splits the line `from -> to` into `dashes` segments in data coordinates,
/// each covering `fill` of its period.
pub(super) fn dashed_line(
    from: (f64, f64),
    to: (f64, f64),
    dashes: u32,
    fill: f64,
) -> impl Iterator<Item = Vec<(f64, f64)>> {
    let count = f64::from(dashes.max(1));
    let step = ((to.0 - from.0) / count, (to.1 - from.1) / count);
    (0..dashes.max(1)).map(move |index| {
        let offset = f64::from(index);
        let start = (from.0 + step.0 * offset, from.1 + step.1 * offset);
        vec![start, (start.0 + step.0 * fill, start.1 + step.1 * fill)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_range_includes_zero_and_headroom() -> Result<(), String> {
        let range = value_range([2.0, 10.0]);
        if range.start != 0.0 || range.end <= 10.0 {
            return Err(format!("Unexpected range {:?}", range));
        }
        let range = value_range([-4.0, 3.0]);
        if range.start >= -4.0 || range.end <= 3.0 {
            return Err(format!("Unexpected range {:?}", range));
        }
        Ok(())
    }

    #[test]
    fn value_range_is_never_empty() -> Result<(), String> {
        for values in [vec![], vec![0.0], vec![0.0, 0.0]] {
            let range = value_range(values);
            if range.end - range.start <= 0.0 {
                return Err(format!("Empty range {:?}", range));
            }
        }
        Ok(())
    }

    #[test]
    fn date_ticks_follow_span() -> Result<(), String> {
        let cases = [
            (1.0, "%Y-%m-%d %H:%M", false),
            (10.0, "%b %d", false),
            (60.0, "%b %d", true),
            (400.0, "%Y-%m", true),
            (5000.0, "%Y", true),
        ];
        for (span, pattern, rotate) in cases {
            let ticks = date_ticks(span);
            if ticks.pattern != pattern || ticks.rotate != rotate {
                return Err(format!("Unexpected ticks for {}: {:?}", span, ticks));
            }
        }
        Ok(())
    }

    #[test]
    fn serial_days_format_back_to_dates() -> Result<(), String> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).ok_or("invalid date")?;
        let serial = f64::from(chrono::Datelike::num_days_from_ce(&date)) + 0.5;
        let formatted = format_serial_day(serial, "%Y-%m-%d %H:%M");
        if formatted != "2024-01-03 12:00" {
            return Err(format!("Unexpected label {}", formatted));
        }
        Ok(())
    }

    #[test]
    fn dashes_stay_on_the_line() -> Result<(), String> {
        let segments: Vec<Vec<(f64, f64)>> =
            dashed_line((10.0, 4.0), (20.0, 4.0), 5, 0.5).collect();
        if segments.len() != 5 {
            return Err(format!("Expected 5 dashes, got {}", segments.len()));
        }
        let inside = segments
            .iter()
            .flatten()
            .all(|(x, y)| (10.0..=20.0).contains(x) && (*y - 4.0).abs() < 1e-12);
        if !inside {
            return Err(format!("Dash outside range: {:?}", segments));
        }
        Ok(())
    }

    #[test]
    fn vertical_dashes_leave_gaps() -> Result<(), String> {
        let segments: Vec<Vec<(f64, f64)>> =
            dashed_line((1.0, 0.0), (1.0, 8.0), 4, 0.5).collect();
        let expected = [(0.0, 1.0), (2.0, 3.0), (4.0, 5.0), (6.0, 7.0)];
        for (segment, (start, end)) in segments.iter().zip(expected) {
            let ys: Vec<f64> = segment.iter().map(|(_, y)| *y).collect();
            if ys.len() != 2
                || ys.first().is_none_or(|y| (y - start).abs() > 1e-12)
                || ys.last().is_none_or(|y| (y - end).abs() > 1e-12)
            {
                return Err(format!("Unexpected dash {:?}", segment));
            }
        }
        Ok(())
    }
}
