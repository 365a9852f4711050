use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{AppError, AppResult, ChartError};

const RGB_CHANNELS: usize = 3;

/// Draws onto a fresh RGB bitmap and returns it PNG-encoded.
///
/// The drawing area lives only inside this call; the pixel buffer is dropped
/// once encoding finishes, whether drawing succeeded or not.
pub(super) fn render_png<F>(width: u32, height: u32, draw: F) -> AppResult<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> AppResult<()>,
{
    let len = usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|pixels| pixels.checked_mul(RGB_CHANNELS))
        .ok_or_else(|| AppError::chart(ChartError::render("canvas size overflows memory")))?;
    let mut pixels = vec![0u8; len];

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw(&root)?;
        root.present()?;
    }

    encode_png(&pixels, width, height)
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> AppResult<Vec<u8>> {
    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded).write_image(pixels, width, height, ColorType::Rgb8)?;
    Ok(encoded)
}
