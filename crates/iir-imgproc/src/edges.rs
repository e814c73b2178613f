use iir_image::{Image, ImageError};
use num_traits::Float;

use crate::filter::{recursive_smooth, FilterError};
use crate::promote::{coefficient, RealPromote};

/// Parameters of the difference-of-exponential edge detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoeEdgeConfig {
    /// The scale of the narrower smoothing. The wider one uses twice this value.
    pub scale: f64,
    /// Minimum absolute DoE difference across a zero crossing, must be >= 0.
    pub gradient_threshold: f64,
    /// The value written at edge pixels.
    pub edge_marker: f64,
}

impl Default for DoeEdgeConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            gradient_threshold: 0.0,
            edge_marker: 1.0,
        }
    }
}

impl DoeEdgeConfig {
    /// Set the smoothing scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the gradient threshold.
    pub fn with_gradient_threshold(mut self, gradient_threshold: f64) -> Self {
        self.gradient_threshold = gradient_threshold;
        self
    }

    /// Set the edge marker value.
    pub fn with_edge_marker(mut self, edge_marker: f64) -> Self {
        self.edge_marker = edge_marker;
        self
    }
}

fn doe_image<T: RealPromote>(
    src: &Image<T, 1>,
    scale: f64,
) -> Result<Image<T::Real, 1>, FilterError> {
    let zero = <T::Real as num_traits::Zero>::zero();
    let mut narrow = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;
    let mut wide = Image::<T::Real, 1>::from_size_val(src.size(), zero)?;

    recursive_smooth(src, &mut narrow, (scale, scale))?;
    recursive_smooth(src, &mut wide, (2.0 * scale, 2.0 * scale))?;

    narrow
        .as_slice_mut()
        .iter_mut()
        .zip(wide.as_slice())
        .for_each(|(n, &w)| *n = *n - w);

    Ok(narrow)
}

/// Compute the difference of exponentials of an image.
///
/// `dst = smooth(src, scale) - smooth(src, 2 * scale)`, a band-pass response whose zero
/// crossings follow the edges of `src`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `scale` - The scale of the narrower smoothing, must be > 0.
pub fn difference_of_exponential<T, U>(
    src: &Image<T, 1>,
    dst: &mut Image<U, 1>,
    scale: f64,
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

    let doe = doe_image(src, scale)?;

    dst.as_slice_mut()
        .iter_mut()
        .zip(doe.as_slice())
        .for_each(|(d, &v)| *d = U::from_real(v));

    Ok(())
}

/// Mark the zero crossings of the difference of exponentials.
///
/// For every pixel and its right, then lower neighbour: if their DoE values have opposite
/// signs and differ by more than `config.gradient_threshold`, `config.edge_marker` is written
/// at the one with the smaller absolute DoE (the current pixel on ties). Pixels that are not
/// marked keep their value in `dst`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The edge image with shape (H, W).
/// * `config` - The detector parameters.
///
/// # Returns
///
/// The number of zero crossings found. A pixel shared by two crossings is counted twice.
///
/// # Examples
///
/// ```
/// use iir_image::Image;
/// use iir_imgproc::edges::{difference_of_exponential_edge_image, DoeEdgeConfig};
///
/// let mut src = Image::<u8, 1>::from_size_val([12, 12].into(), 0).unwrap();
/// for y in 4..8 {
///     for x in 4..8 {
///         src.set_pixel(x, y, 0, 200).unwrap();
///     }
/// }
///
/// let mut edges = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
/// let config = DoeEdgeConfig::default().with_edge_marker(255.0);
/// let num_edges = difference_of_exponential_edge_image(&src, &mut edges, &config).unwrap();
///
/// assert!(num_edges > 0);
/// assert_eq!(*edges.get_pixel(0, 0, 0).unwrap(), 0);
/// ```
pub fn difference_of_exponential_edge_image<T, U>(
    src: &Image<T, 1>,
    dst: &mut Image<U, 1>,
    config: &DoeEdgeConfig,
) -> Result<usize, FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    let threshold = config.gradient_threshold;
    if threshold.is_nan() || threshold < 0.0 {
        return Err(FilterError::InvalidThreshold(threshold));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let doe = doe_image(src, config.scale)?;
    let threshold = coefficient::<T::Real>(threshold);
    let marker = U::from_real(config.edge_marker);

    let (width, height) = (src.cols(), src.rows());
    let doe = doe.as_slice();
    let edges = dst.as_slice_mut();
    let mut num_edges = 0;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let neighbors = [
                (x + 1 < width).then_some(idx + 1),
                (y + 1 < height).then_some(idx + width),
            ];

            for n in neighbors.into_iter().flatten() {
                if let Some(edge) = zero_crossing(doe, idx, n, threshold) {
                    edges[edge] = marker;
                    num_edges += 1;
                }
            }
        }
    }

    log::debug!(
        "DoE edges: {} scale={} threshold={} marked={}",
        src.size(),
        config.scale,
        config.gradient_threshold,
        num_edges
    );

    Ok(num_edges)
}

/// The index to mark if `doe[a]` and `doe[b]` straddle zero steeply enough.
fn zero_crossing<R: Float>(doe: &[R], a: usize, b: usize, threshold: R) -> Option<usize> {
    let (va, vb) = (doe[a], doe[b]);
    let opposite = (va < R::zero() && vb > R::zero()) || (va > R::zero() && vb < R::zero());
    if !opposite || (va - vb).abs() <= threshold {
        return None;
    }
    Some(if va.abs() <= vb.abs() { a } else { b })
}
