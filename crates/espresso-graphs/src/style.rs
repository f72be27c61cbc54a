//! Chart styling: background, categorical palettes, fill opacities.
//!
//! A [`PlotStyle`] value is owned by a single rendering call, so styling
//! can never leak between unrelated plots.

use plotters::style::RGBColor;

/// The default categorical palette (matplotlib's tab10).
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Visual style applied to one rendering call.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    /// Canvas background.
    pub background: RGBColor,
    /// Per-category series palette, cycled when categories outnumber it.
    pub palette: Vec<RGBColor>,
    /// Opacity of confidence bands.
    pub band_alpha: f64,
    /// Fill opacity of stacked areas.
    pub area_alpha: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            background: RGBColor(255, 255, 255),
            palette: TAB10.to_vec(),
            band_alpha: 0.2,
            area_alpha: 0.8,
        }
    }
}

impl PlotStyle {
    /// Default style with the palette replaced by caller-supplied RGB
    /// triples.
    #[must_use]
    pub fn with_palette(palette: &[(u8, u8, u8)]) -> Self {
        let palette = if palette.is_empty() {
            TAB10.to_vec()
        } else {
            palette.iter().map(|&(r, g, b)| RGBColor(r, g, b)).collect()
        };
        Self {
            palette,
            ..Self::default()
        }
    }

    /// Color for the `idx`-th category.
    #[must_use]
    pub fn color(&self, idx: usize) -> RGBColor {
        self.palette[idx % self.palette.len()]
    }
}
