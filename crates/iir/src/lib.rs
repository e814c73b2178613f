//! Recursive exponential smoothing and derivative filters for images.
//!
//! The filters run in O(n) per line whatever the scale, are separable along the image axes,
//! and accept any pixel type with a floating point promotion.

#[doc(inline)]
pub use iir_image as image;

#[doc(inline)]
pub use iir_imgproc as imgproc;
