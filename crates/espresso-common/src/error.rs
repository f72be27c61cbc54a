//! Error taxonomy shared across the espresso plotting crates.

use thiserror::Error;

/// Common result type for the espresso plotting crates.
pub type Result<T> = std::result::Result<T, EspressoError>;

/// Library-wide error type.
///
/// Every failure surfaces synchronously to the caller; there is no retry
/// logic and no partial-result mode. A plotting call either returns a
/// renderable handle or one of these.
#[derive(Debug, Error)]
pub enum EspressoError {
    /// Malformed caller input, raised before any computation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A requested grouping/coloring/facet column is not part of the
    /// feed table's categorical namespace.
    #[error("unknown column {0:?}: not a categorical column of the feed table")]
    UnknownColumn(String),

    /// Chart drawing or image encoding failure.
    #[error("failed to render plot: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync + 'static>
    From<plotters::drawing::DrawingAreaErrorKind<E>> for EspressoError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Self::Render(format!("{value:?}"))
    }
}

impl From<image::ImageError> for EspressoError {
    fn from(value: image::ImageError) -> Self {
        Self::Render(value.to_string())
    }
}
