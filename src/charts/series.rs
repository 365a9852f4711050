use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ChartError;

use super::limits::MAX_SPAN_DAYS;
use super::request::DatePoint;

/// Naive formats tried after RFC 3339, most specific first.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub day: NaiveDate,
    pub value: f64,
}

/// Gap-free daily series covering every calendar day between the earliest
/// and latest submitted point, inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    points: Vec<DailyPoint>,
}

impl DailySeries {
    #[must_use]
    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.points.first().map(|point| point.day)
    }

    #[must_use]
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.points.last().map(|point| point.day)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|point| point.value).sum()
    }
}

/// Parses an ISO-8601 date-time.
///
/// Offsets are honoured only to pick the calendar date: the result is the
/// wall-clock time in the submitted offset. A bare date means midnight.
///
/// # Errors
///
/// Returns [`ChartError::InvalidTimestamp`] when no supported form matches.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ChartError> {
    let trimmed = value.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive);
        }
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ChartError::InvalidTimestamp {
            value: value.to_owned(),
        })
}

/// Parses every submitted entry, failing on the first bad timestamp.
///
/// # Errors
///
/// Returns [`ChartError::InvalidTimestamp`] for the first unparsable `x`.
pub fn parse_points(entries: &[DatePoint]) -> Result<Vec<RawPoint>, ChartError> {
    entries
        .iter()
        .map(|entry| {
            Ok(RawPoint {
                timestamp: parse_timestamp(&entry.x)?,
                value: entry.y,
            })
        })
        .collect()
}

/// Folds raw points into one entry per calendar day.
///
/// Time of day is dropped; every point falling on the same date is summed and
/// days without points hold `0.0`.
///
/// # Errors
///
/// Returns [`ChartError::EmptyInput`] when `points` is empty,
/// [`ChartError::DateSpanTooLong`] when the series would hold more than
/// [`MAX_SPAN_DAYS`] days and [`ChartError::InvalidShape`] when a day's sum
/// overflows.
pub fn normalize(points: &[RawPoint]) -> Result<DailySeries, ChartError> {
    let days = points.iter().map(|point| point.timestamp.date());
    let (Some(min_day), Some(max_day)) = (days.clone().min(), days.max()) else {
        return Err(ChartError::EmptyInput);
    };

    let days = max_day
        .signed_duration_since(min_day)
        .num_days()
        .saturating_add(1);
    if days > MAX_SPAN_DAYS {
        return Err(ChartError::DateSpanTooLong {
            days,
            max: MAX_SPAN_DAYS,
        });
    }

    let mut values = vec![0.0_f64; usize::try_from(days).unwrap_or(1)];
    for point in points {
        let offset = point
            .timestamp
            .date()
            .signed_duration_since(min_day)
            .num_days();
        if let Some(slot) = usize::try_from(offset)
            .ok()
            .and_then(|offset| values.get_mut(offset))
        {
            *slot += point.value;
        }
    }
    if values.iter().any(|value| !value.is_finite()) {
        return Err(ChartError::shape("daily totals must be finite"));
    }

    let points = min_day
        .iter_days()
        .zip(values)
        .map(|(day, value)| DailyPoint { day, value })
        .collect();
    Ok(DailySeries { points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, String> {
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| "invalid date".to_owned())
    }

    fn points(entries: &[(&str, f64)]) -> Result<Vec<RawPoint>, String> {
        let entries: Vec<DatePoint> = entries
            .iter()
            .map(|(x, y)| DatePoint {
                x: (*x).to_owned(),
                y: *y,
            })
            .collect();
        parse_points(&entries).map_err(|err| err.to_string())
    }

    #[test]
    fn accepts_common_iso_forms() -> Result<(), String> {
        for value in [
            "2024-01-02T10:30:00",
            "2024-01-02T10:30:00.125",
            "2024-01-02 10:30:00",
            "2024-01-02T10:30",
            "2024-01-02",
            "2024-01-02T10:30:00Z",
            "2024-01-02T10:30:00+09:00",
        ] {
            let parsed = parse_timestamp(value).map_err(|err| err.to_string())?;
            if parsed.date() != date(2024, 1, 2)? {
                return Err(format!("Unexpected date for {}: {}", value, parsed));
            }
        }
        Ok(())
    }

    #[test]
    fn offset_picks_the_local_calendar_day() -> Result<(), String> {
        let parsed = parse_timestamp("2024-01-01T23:30:00-05:00").map_err(|err| err.to_string())?;
        if parsed.date() != date(2024, 1, 1)? {
            return Err(format!("Expected local date, got {}", parsed));
        }
        Ok(())
    }

    #[test]
    fn rejects_unparsable_timestamps() -> Result<(), String> {
        for value in ["", "yesterday", "2024-13-01", "01/02/2024", "2024-02-30T00:00:00"] {
            match parse_timestamp(value) {
                Err(ChartError::InvalidTimestamp { .. }) => {}
                other => {
                    return Err(format!(
                        "Expected InvalidTimestamp for '{}': {:?}",
                        value, other
                    ));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn fills_gaps_with_zero() -> Result<(), String> {
        let raw = points(&[("2024-01-01T00:00:00", 5.0), ("2024-01-03T00:00:00", 3.0)])?;
        let series = normalize(&raw).map_err(|err| err.to_string())?;
        let values: Vec<f64> = series.points().iter().map(|point| point.value).collect();
        if values != [5.0, 0.0, 3.0] {
            return Err(format!("Unexpected values {:?}", values));
        }
        if series.first_day() != Some(date(2024, 1, 1)?)
            || series.last_day() != Some(date(2024, 1, 3)?)
        {
            return Err("Unexpected day range".to_owned());
        }
        Ok(())
    }

    #[test]
    fn sums_duplicates_and_ignores_time_of_day() -> Result<(), String> {
        let raw = points(&[
            ("2024-03-05T23:59:59", 1.5),
            ("2024-03-04T08:00:00", 2.0),
            ("2024-03-05T00:00:01", 2.5),
            ("2024-03-04", 1.0),
        ])?;
        let series = normalize(&raw).map_err(|err| err.to_string())?;
        let values: Vec<f64> = series.points().iter().map(|point| point.value).collect();
        if values != [3.0, 4.0] {
            return Err(format!("Unexpected values {:?}", values));
        }
        Ok(())
    }

    #[test]
    fn length_covers_full_span_and_total_is_preserved() -> Result<(), String> {
        let raw = points(&[
            ("2023-12-30", 1.0),
            ("2024-02-29", 2.0),
            ("2024-01-15", 4.0),
            ("2024-01-15", -0.5),
        ])?;
        let series = normalize(&raw).map_err(|err| err.to_string())?;
        let expected = date(2024, 2, 29)?
            .signed_duration_since(date(2023, 12, 30)?)
            .num_days()
            + 1;
        if i64::try_from(series.len()).map_err(|err| err.to_string())? != expected {
            return Err(format!("Expected {} days, got {}", expected, series.len()));
        }
        let days_increase = series
            .points()
            .windows(2)
            .all(|pair| match pair {
                [left, right] => left.day.succ_opt() == Some(right.day),
                _ => false,
            });
        if !days_increase {
            return Err("Days are not consecutive".to_owned());
        }
        if (series.total() - 6.5).abs() > 1e-9 {
            return Err(format!("Unexpected total {}", series.total()));
        }
        Ok(())
    }

    #[test]
    fn single_point_yields_single_day() -> Result<(), String> {
        let raw = points(&[("2024-06-01T12:00:00", 9.0)])?;
        let series = normalize(&raw).map_err(|err| err.to_string())?;
        if series.len() != 1 || series.total() != 9.0 {
            return Err(format!("Unexpected series {:?}", series));
        }
        Ok(())
    }

    #[test]
    fn empty_input_is_rejected() -> Result<(), String> {
        match normalize(&[]) {
            Err(ChartError::EmptyInput) => Ok(()),
            other => Err(format!("Expected EmptyInput: {:?}", other)),
        }
    }

    #[test]
    fn span_limit_is_inclusive() -> Result<(), String> {
        let start = date(2000, 1, 1)?;
        let last_allowed =
            u64::try_from(MAX_SPAN_DAYS.saturating_sub(1)).map_err(|err| err.to_string())?;
        let end = start
            .checked_add_days(chrono::Days::new(last_allowed))
            .ok_or("date out of range")?;
        let first = RawPoint {
            timestamp: start.and_hms_opt(0, 0, 0).ok_or("invalid time")?,
            value: 1.0,
        };
        let last = RawPoint {
            timestamp: end.and_hms_opt(12, 0, 0).ok_or("invalid time")?,
            value: 2.0,
        };
        let series = normalize(&[first, last]).map_err(|err| err.to_string())?;
        if i64::try_from(series.len()).ok() != Some(MAX_SPAN_DAYS) {
            return Err(format!("Expected {} days, got {}", MAX_SPAN_DAYS, series.len()));
        }

        let too_far = RawPoint {
            timestamp: end
                .succ_opt()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .ok_or("date out of range")?,
            value: 3.0,
        };
        match normalize(&[first, too_far]) {
            Err(ChartError::DateSpanTooLong { days, .. })
                if days == MAX_SPAN_DAYS.saturating_add(1) =>
            {
                Ok(())
            }
            other => Err(format!("Expected DateSpanTooLong: {:?}", other)),
        }
    }

    #[test]
    fn far_future_years_are_rejected_before_allocating() -> Result<(), String> {
        let raw = points(&[("0001-01-01", 1.0), ("+20000-01-01", 1.0)])?;
        match normalize(&raw) {
            Err(ChartError::DateSpanTooLong { .. }) => Ok(()),
            other => Err(format!("Expected DateSpanTooLong: {:?}", other.map(|s| s.len()))),
        }
    }

    #[test]
    fn overflowing_daily_sums_are_rejected() -> Result<(), String> {
        let raw = points(&[("2024-01-01T01:00:00", 1e308), ("2024-01-01T02:00:00", 1e308)])?;
        match normalize(&raw) {
            Err(ChartError::InvalidShape { .. }) => Ok(()),
            other => Err(format!("Expected InvalidShape: {:?}", other.map(|s| s.len()))),
        }
    }
}
