mod axis;
mod bar;
mod canvas;
mod date_bar;

use super::buckets::Bucket;
use super::request::{BarRequest, DateBarStyle};
use super::theme::ChartTheme;

use crate::error::ChartError;

use bar::draw_bar_chart;
use canvas::render_png;
use date_bar::draw_date_bar_chart;

/// PNG bytes for one response. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    bytes: Vec<u8>,
}

impl RenderedImage {
    pub const CONTENT_TYPE: &'static str = "image/png";

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Rasterizes charts with a fixed theme and canvas size.
///
/// Holds no drawing state between calls: every render gets its own bitmap,
/// so one renderer can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    theme: ChartTheme,
    width: u32,
    height: u32,
}

impl ChartRenderer {
    #[must_use]
    pub const fn new(theme: ChartTheme, width: u32, height: u32) -> Self {
        Self {
            theme,
            width,
            height,
        }
    }

    /// Renders a categorical bar chart.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Render`] when drawing or PNG encoding fails.
    pub fn render_bar(&self, request: &BarRequest) -> Result<RenderedImage, ChartError> {
        render_png(self.width, self.height, |root| {
            draw_bar_chart(root, &self.theme, request)
        })
        .map(|bytes| RenderedImage { bytes })
        .map_err(ChartError::render)
    }

    /// Renders bucket totals on a date axis, with an optional threshold line.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Render`] when drawing or PNG encoding fails.
    pub fn render_date_bar(
        &self,
        buckets: &[Bucket],
        style: &DateBarStyle,
    ) -> Result<RenderedImage, ChartError> {
        render_png(self.width, self.height, |root| {
            draw_date_bar_chart(root, &self.theme, buckets, style)
        })
        .map(|bytes| RenderedImage { bytes })
        .map_err(ChartError::render)
    }
}
