//! # Espresso Common
//!
//! Shared types, errors, and utilities for the espresso plotting workspace.
//!
//! This crate provides the feed-event data model, the error taxonomy, and
//! small helpers used across the other crates in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use types::*;
pub use utils::*;
