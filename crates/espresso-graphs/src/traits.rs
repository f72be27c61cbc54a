//! Renderer trait for polymorphic chart types.

use espresso_common::Result;

/// Trait for chart renderers that produce encoded images.
///
/// Rendering is synchronous: every call is a self-contained computation
/// over the plotter's copy of the feed table.
pub trait ChartRenderer {
    /// The options this renderer accepts.
    type Options;

    /// Renders the chart, returning PNG-encoded bytes.
    ///
    /// # Errors
    ///
    /// Configuration and unknown-column errors surface before any
    /// rendering; drawing failures surface as render errors.
    fn render(&self, options: &Self::Options) -> Result<Vec<u8>>;

    /// Gets the name of this chart type.
    fn name(&self) -> &'static str;

    /// Gets the description of this chart type.
    fn description(&self) -> &'static str;
}
