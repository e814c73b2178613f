use iir_image::{Image, ImageError};
use rayon::prelude::*;

use crate::filter::{recursive_gradient, recursive_smooth, FilterError};
use crate::promote::{coefficient, RealPromote};

/// Parameters of the corner response.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CornerResponseConfig {
    /// The scale of the gradient and of the structure tensor smoothing.
    pub scale: f64,
    /// The trace weight in `det - k * trace^2`.
    pub k: f64,
}

impl Default for CornerResponseConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            k: 0.04,
        }
    }
}

impl CornerResponseConfig {
    /// Set the scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the trace weight.
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }
}

/// Compute the corner response of an image.
///
/// The gradient is taken with the recursive derivative filters, the structure tensor
/// entries `gx^2`, `gy^2` and `gx * gy` are smoothed at the same scale and combined into
/// `det - k * trace^2`. The response is positive at corners, negative along straight edges
/// and close to zero in flat regions.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `config` - The response parameters.
///
/// # Examples
///
/// ```
/// use iir_image::Image;
/// use iir_imgproc::corners::{corner_response, CornerResponseConfig};
///
/// let src = Image::<u8, 1>::from_size_val([8, 8].into(), 10).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 1.0).unwrap();
///
/// corner_response(&src, &mut dst, &CornerResponseConfig::default()).unwrap();
/// assert!(dst.as_slice().iter().all(|v| v.abs() < 1e-3));
/// ```
pub fn corner_response<T, U>(
    src: &Image<T, 1>,
    dst: &mut Image<U, 1>,
    config: &CornerResponseConfig,
) -> Result<(), FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let zero = <T::Real as num_traits::Zero>::zero();
    let mut gx = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;
    let mut gy = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;
    recursive_gradient(src, &mut gx, &mut gy, config.scale)?;

    // structure tensor entries, computed in place of the gradient buffers
    let mut gxy = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;
    gx.as_slice_mut()
        .iter_mut()
        .zip(gy.as_slice_mut())
        .zip(gxy.as_slice_mut())
        .for_each(|((x, y), xy)| {
            *xy = *x * *y;
            *x = *x * *x;
            *y = *y * *y;
        });

    let mut sxx = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;
    let mut syy = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;
    let mut sxy = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;
    let scale = (config.scale, config.scale);
    recursive_smooth(&gx, &mut sxx, scale)?;
    recursive_smooth(&gy, &mut syy, scale)?;
    recursive_smooth(&gxy, &mut sxy, scale)?;

    let k = coefficient::<T::Real>(config.k);

    dst.as_slice_mut()
        .par_iter_mut()
        .zip(sxx.as_slice().par_iter())
        .zip(syy.as_slice().par_iter())
        .zip(sxy.as_slice().par_iter())
        .for_each(|(((dst_pixel, &xx), &yy), &xy)| {
            let det = xx * yy - xy * xy;
            let trace = xx + yy;
            *dst_pixel = U::from_real(det - k * trace * trace);
        });

    Ok(())
}
