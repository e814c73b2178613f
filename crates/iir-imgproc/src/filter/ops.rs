use iir_image::{Image, ImageError, ImageSize};

use super::axis::{recursive_filter_axis, Axis};
use super::error::{check_scale, FilterError};
use super::recursive::RecursiveFilter;
use crate::parallel::ExecutionStrategy;
use crate::promote::RealPromote;

fn check_size(expected: ImageSize, actual: ImageSize) -> Result<(), ImageError> {
    if expected != actual {
        return Err(ImageError::InvalidImageSize(
            expected.width,
            expected.height,
            actual.width,
            actual.height,
        ));
    }
    Ok(())
}

/// Recursive exponential smoothing of every row.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn recursive_smooth_x<T: RealPromote, U: RealPromote, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: f64,
) -> Result<(), FilterError> {
    recursive_filter_axis(
        src,
        dst,
        RecursiveFilter::Smooth,
        Axis::X,
        scale,
        ExecutionStrategy::Auto,
    )
}

/// Recursive exponential smoothing of every column.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn recursive_smooth_y<T: RealPromote, U: RealPromote, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: f64,
) -> Result<(), FilterError> {
    recursive_filter_axis(
        src,
        dst,
        RecursiveFilter::Smooth,
        Axis::Y,
        scale,
        ExecutionStrategy::Auto,
    )
}

/// Recursive first derivative of every row.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn recursive_first_derivative_x<T: RealPromote, U: RealPromote, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: f64,
) -> Result<(), FilterError> {
    recursive_filter_axis(
        src,
        dst,
        RecursiveFilter::FirstDerivative,
        Axis::X,
        scale,
        ExecutionStrategy::Auto,
    )
}

/// Recursive first derivative of every column.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn recursive_first_derivative_y<T: RealPromote, U: RealPromote, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: f64,
) -> Result<(), FilterError> {
    recursive_filter_axis(
        src,
        dst,
        RecursiveFilter::FirstDerivative,
        Axis::Y,
        scale,
        ExecutionStrategy::Auto,
    )
}

/// Recursive second derivative of every row.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn recursive_second_derivative_x<T: RealPromote, U: RealPromote, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: f64,
) -> Result<(), FilterError> {
    recursive_filter_axis(
        src,
        dst,
        RecursiveFilter::SecondDerivative,
        Axis::X,
        scale,
        ExecutionStrategy::Auto,
    )
}

/// Recursive second derivative of every column.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn recursive_second_derivative_y<T: RealPromote, U: RealPromote, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: f64,
) -> Result<(), FilterError> {
    recursive_filter_axis(
        src,
        dst,
        RecursiveFilter::SecondDerivative,
        Axis::Y,
        scale,
        ExecutionStrategy::Auto,
    )
}

/// Smooth an image with the separable exponential kernel.
///
/// The rows are filtered first into an intermediate image of the promoted type, the columns
/// of that image are then filtered into `dst`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `scale` - The scale along (x, y). Different values give anisotropic smoothing.
/// * `strategy` - The execution strategy of both passes.
pub fn recursive_smooth_with_strategy<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: (f64, f64),
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    check_scale(scale.0)?;
    check_scale(scale.1)?;
    check_size(src.size(), dst.size())?;

    let mut tmp = Image::<T::Real, C>::from_size_val(src.size(), num_traits::Zero::zero())?;
    recursive_filter_axis(
        src,
        &mut tmp,
        RecursiveFilter::Smooth,
        Axis::X,
        scale.0,
        strategy,
    )?;
    recursive_filter_axis(
        &tmp,
        dst,
        RecursiveFilter::Smooth,
        Axis::Y,
        scale.1,
        strategy,
    )
}

/// Smooth an image with the separable exponential kernel.
///
/// Uses `ExecutionStrategy::Auto`. For explicit control, use
/// [`recursive_smooth_with_strategy`].
///
/// # Examples
///
/// ```
/// use iir_image::Image;
/// use iir_imgproc::filter::recursive_smooth;
///
/// let mut src = Image::<f32, 1>::from_size_val([5, 5].into(), 0.0).unwrap();
/// src.set_pixel(2, 2, 0, 1.0).unwrap();
///
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
/// recursive_smooth(&src, &mut dst, (1.0, 1.0)).unwrap();
///
/// let center = *dst.get_pixel(2, 2, 0).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v <= center));
/// ```
pub fn recursive_smooth<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: (f64, f64),
) -> Result<(), FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    recursive_smooth_with_strategy(src, dst, scale, ExecutionStrategy::Auto)
}

/// Compute the image gradient with recursive exponential derivative filters.
///
/// `gx` is the x derivative smoothed along y, `gy` the y derivative of the x-smoothed image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `gx` - The x derivative with shape (H, W, C).
/// * `gy` - The y derivative with shape (H, W, C).
/// * `scale` - The scale of the exponential kernel, must be > 0.
pub fn recursive_gradient<T, U, const C: usize>(
    src: &Image<T, C>,
    gx: &mut Image<U, C>,
    gy: &mut Image<U, C>,
    scale: f64,
) -> Result<(), FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    check_scale(scale)?;
    check_size(src.size(), gx.size())?;
    check_size(src.size(), gy.size())?;

    let strategy = ExecutionStrategy::Auto;
    let mut tmp = Image::<T::Real, C>::from_size_val(src.size(), num_traits::Zero::zero())?;

    recursive_filter_axis(
        src,
        &mut tmp,
        RecursiveFilter::FirstDerivative,
        Axis::X,
        scale,
        strategy,
    )?;
    recursive_filter_axis(&tmp, gx, RecursiveFilter::Smooth, Axis::Y, scale, strategy)?;

    recursive_filter_axis(src, &mut tmp, RecursiveFilter::Smooth, Axis::X, scale, strategy)?;
    recursive_filter_axis(
        &tmp,
        gy,
        RecursiveFilter::FirstDerivative,
        Axis::Y,
        scale,
        strategy,
    )
}
