//! Filter operations
//!
//! This module provides the recursive exponential filters: line kernels for smoothing and
//! the first and second derivative, the applicator running them along an image axis, and
//! the 2D compositions built on top.

/// Filter error types
mod error;
pub use error::FilterError;

/// Line access traits
pub mod line;

/// Recursive line kernels
mod recursive;
pub use recursive::*;

/// Axis applicator
mod axis;
pub use axis::*;

/// 2D filter operations
mod ops;
pub use ops::*;
