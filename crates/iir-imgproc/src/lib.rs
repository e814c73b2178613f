#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// corner response module.
pub mod corners;

/// edge detection module.
pub mod edges;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

/// numeric promotion of sample types.
pub mod promote;
