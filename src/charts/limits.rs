use crate::error::ChartError;

/// Longest date-bar series, in calendar days (about 270 years).
pub const MAX_SPAN_DAYS: i64 = 100_000;

/// Margin over the axis headroom padding; the padded spread must stay finite.
const SPREAD_SAFETY_FACTOR: f64 = 1.25;

/// Rejects value sets whose axis cannot be drawn: non-finite values, or a
/// `[min(0, ..), max(0, ..)]` spread too wide to pad.
pub(crate) fn check_plottable<I>(values: I, what: &str) -> Result<(), ChartError>
where
    I: IntoIterator<Item = f64>,
{
    let mut low = 0.0_f64;
    let mut high = 0.0_f64;
    for value in values {
        if !value.is_finite() {
            return Err(ChartError::shape(format!("{} must be finite", what)));
        }
        low = low.min(value);
        high = high.max(value);
    }
    let spread = high - low;
    if !(spread * SPREAD_SAFETY_FACTOR).is_finite() {
        return Err(ChartError::shape(format!(
            "{} span a range too wide to plot",
            what
        )));
    }
    Ok(())
}
