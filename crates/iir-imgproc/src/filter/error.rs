use iir_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filter operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The filter scale is not strictly positive.
    #[error("scale must be > 0, got {0}")]
    InvalidScale(f64),

    /// The gradient threshold is negative or not a number.
    #[error("gradient threshold must be >= 0, got {0}")]
    InvalidThreshold(f64),

    /// The source and destination lines have different lengths.
    #[error("line length mismatch: source ({0}) and destination ({1})")]
    InvalidLineLength(usize, usize),

    /// Error from the image module.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Error from the parallel execution.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),
}

/// Check the scale precondition shared by all recursive filters.
pub(crate) fn check_scale(scale: f64) -> Result<(), FilterError> {
    if scale.is_nan() || scale <= 0.0 {
        return Err(FilterError::InvalidScale(scale));
    }
    Ok(())
}
