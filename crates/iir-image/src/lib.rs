#![deny(missing_docs)]
//! Image types used as sample grids by the recursive filters.

/// image representation for filtering purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image basic operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
