use chrono::Datelike;

use crate::error::ChartError;

use super::series::DailySeries;

/// Upper bound on the number of buckets a request may ask for.
pub const MAX_BUCKETS: i64 = 1024;

/// One equal-width slice of the date axis.
///
/// `start` and `end` are serial day numbers (days since 0001-01-01, the
/// proleptic Gregorian day count), so a bucket may begin part-way through a
/// day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub total: f64,
}

impl Bucket {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Splits the series' date span into `count` equal-width buckets and sums
/// each day's value into the bucket containing it.
///
/// Buckets are left-closed except the last, which also holds the final day.
/// A single-day series is treated as spanning `[day, day + 1)` so every
/// bucket keeps a non-zero width and the day lands in the first one.
///
/// # Errors
///
/// Returns [`ChartError::InvalidBucketCount`] when `count` is not in
/// `1..=MAX_BUCKETS` and [`ChartError::EmptyInput`] for an empty series.
pub fn bucketize(series: &DailySeries, count: i64) -> Result<Vec<Bucket>, ChartError> {
    let (Ok(buckets), Ok(slots)) = (u64::try_from(count), usize::try_from(count)) else {
        return Err(ChartError::InvalidBucketCount {
            value: count,
            max: MAX_BUCKETS,
        });
    };
    if !(1..=MAX_BUCKETS).contains(&count) {
        return Err(ChartError::InvalidBucketCount {
            value: count,
            max: MAX_BUCKETS,
        });
    }

    let first_day = series.first_day().ok_or(ChartError::EmptyInput)?;
    let days = u64::try_from(series.len()).unwrap_or(u64::MAX);
    // The span is measured between day starts, so `n` consecutive days cover
    // `n - 1` units; a lone day gets a unit span instead.
    let span = days.saturating_sub(1).max(1);

    let mut totals = vec![0.0_f64; slots];
    for (offset, point) in (0u64..).zip(series.points()) {
        let index = offset
            .saturating_mul(buckets)
            .checked_div(span)
            .unwrap_or(0)
            .min(buckets.saturating_sub(1));
        if let Some(slot) = usize::try_from(index)
            .ok()
            .and_then(|index| totals.get_mut(index))
        {
            *slot += point.value;
        }
    }

    let origin = f64::from(first_day.num_days_from_ce());
    let width = span as f64 / count as f64;
    Ok((0u32..)
        .zip(totals)
        .map(|(index, total)| Bucket {
            start: origin + f64::from(index) * width,
            end: origin + f64::from(index.saturating_add(1)) * width,
            total,
        })
        .collect())
}
