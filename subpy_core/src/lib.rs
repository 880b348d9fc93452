//! # Subpy Core
//!
//! Types shared by the subpy front end and analysis crates.

#![warn(missing_docs)]

pub mod error;
pub mod span;

pub use error::{SubpyError, SubpyResult};
pub use span::Span;

/// Crate version, shared by every subpy binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
