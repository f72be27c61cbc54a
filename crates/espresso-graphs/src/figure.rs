//! Renderable handles returned by the plotting facades.
//!
//! Nothing here touches the filesystem; callers decide whether to save or
//! display the encoded bytes.

use std::io::Cursor;

use espresso_common::{EspressoError, Result};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};

/// A rendered single-row figure from the timecourse plotter.
#[derive(Debug, Clone)]
pub struct Figure {
    /// PNG-encoded image.
    pub png: Vec<u8>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Panel captions (group values), left to right.
    pub panels: Vec<String>,
}

/// A rendered facet grid of synchronized panels from the cumulative
/// plotter.
#[derive(Debug, Clone)]
pub struct FacetGrid {
    /// PNG-encoded image.
    pub png: Vec<u8>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Row facet values, top to bottom. A single empty entry when the
    /// row dimension is collapsed.
    pub rows: Vec<String>,
    /// Column facet values, left to right. A single empty entry when the
    /// column dimension is collapsed.
    pub cols: Vec<String>,
    /// Hue value to line color mapping: the shared legend as data.
    pub legend: Vec<(String, (u8, u8, u8))>,
}

/// Encodes a raw RGB framebuffer as PNG bytes.
pub(crate) fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let img = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| EspressoError::Render("failed to assemble image buffer".into()))?;
    let mut output = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
