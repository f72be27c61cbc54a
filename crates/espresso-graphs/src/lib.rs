//! # Espresso Graphs
//!
//! Timecourse and cumulative chart rendering for espresso feeding-assay
//! experiments.
//!
//! The crate turns a feed-event table into rendered figures with
//! plotters: events are bucketed into fixed-width time bins, optionally
//! accumulated per series, reshaped, and drawn as stacked area panels
//! ([`TimecoursePlotter`]) or faceted cumulative line charts with
//! confidence bands ([`CumulativePlotter`]).
//!
//! The reshaping pipeline itself is an internal stage; the public
//! contract is the renderer operations and their option structs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod axes;
pub mod cumulative;
pub mod figure;
pub mod options;
pub mod style;
pub mod timecourse;
pub mod traits;

mod munge;

pub use cumulative::*;
pub use figure::*;
pub use options::*;
pub use style::*;
pub use timecourse::*;
pub use traits::*;
