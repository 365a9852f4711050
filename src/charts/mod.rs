mod buckets;
mod color;
mod limits;
mod render;
mod request;
mod series;
mod theme;


use tracing::debug;

use crate::error::ChartError;

use limits::check_plottable;

pub use buckets::{Bucket, MAX_BUCKETS, bucketize};
pub use color::parse_color;
pub use limits::MAX_SPAN_DAYS;
pub use render::{ChartRenderer, RenderedImage};
pub use request::{
    BarRequest, ChartKind, ChartRequest, DateBarRequest, DateBarStyle, DatePoint, parse_request,
};
pub use series::{DailyPoint, DailySeries, RawPoint, normalize, parse_points, parse_timestamp};
pub use theme::{ChartTheme, ThemeOverrides};

/// Runs one request body through validation, aggregation and rendering.
///
/// Blocking: callers on an async runtime should move this onto a blocking
/// thread.
///
/// # Errors
///
/// Returns the first [`ChartError`] raised by any stage.
pub fn build_chart(
    renderer: &ChartRenderer,
    kind: ChartKind,
    body: &[u8],
) -> Result<RenderedImage, ChartError> {
    match parse_request(kind, body)? {
        ChartRequest::Bar(request) => {
            debug!(
                "Rendering bar chart with {} bars",
                request.xdata.len().min(request.ydata.len())
            );
            renderer.render_bar(&request)
        }
        ChartRequest::DateBar(request) => {
            let points = parse_points(&request.data)?;
            let series = normalize(&points)?;
            let buckets = bucketize(&series, request.buckets)?;
            check_plottable(
                buckets
                    .iter()
                    .map(|bucket| bucket.total)
                    .chain(request.style.threshold()),
                "bucket totals",
            )?;
            debug!(
                "Rendering date bar chart: {} days into {} buckets",
                series.len(),
                buckets.len()
            );
            renderer.render_date_bar(&buckets, &request.style)
        }
    }
}
