use num_traits::Float;

use super::error::{check_scale, FilterError};
use super::line::{LineSink, LineSource};
use crate::promote::{coefficient, widen, RealPromote};

/// The recursive exponential line filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecursiveFilter {
    /// Convolution with `exp(-|x| / scale)`, normalized to unit sum.
    Smooth,
    /// Convolution with the first derivative of the exponential kernel.
    FirstDerivative,
    /// Convolution with the second derivative of the exponential kernel.
    SecondDerivative,
}

impl RecursiveFilter {
    /// Run the selected kernel over one line.
    ///
    /// See [`recursive_smooth_line`], [`recursive_first_derivative_line`] and
    /// [`recursive_second_derivative_line`].
    pub fn apply_line<S, D>(&self, src: &S, dst: &mut D, scale: f64) -> Result<(), FilterError>
    where
        S: LineSource + ?Sized,
        S::Item: RealPromote,
        D: LineSink + ?Sized,
        D::Item: RealPromote,
    {
        match self {
            RecursiveFilter::Smooth => recursive_smooth_line(src, dst, scale),
            RecursiveFilter::FirstDerivative => recursive_first_derivative_line(src, dst, scale),
            RecursiveFilter::SecondDerivative => recursive_second_derivative_line(src, dst, scale),
        }
    }
}

/// Validate the arguments of a line kernel and return the line length.
fn check_line<S, D>(src: &S, dst: &D, scale: f64) -> Result<usize, FilterError>
where
    S: LineSource + ?Sized,
    D: LineSink + ?Sized,
{
    check_scale(scale)?;

    if src.len() != dst.len() {
        return Err(FilterError::InvalidLineLength(src.len(), dst.len()));
    }

    Ok(src.len())
}

/// Decay factor `b = exp(-1 / scale)` of the exponential kernel.
fn decay(scale: f64) -> f64 {
    (-1.0 / scale).exp()
}

/// Recursive convolution of a line with the exponential `exp(-|x| / scale)`.
///
/// The kernel is decomposed into a causal and an anti-causal first order recursion, so the
/// cost does not depend on the scale. Both recursions are seeded with their steady state
/// for a signal continued with its boundary value, hence a constant line passes unchanged.
///
/// # Arguments
///
/// * `src` - The source line.
/// * `dst` - The destination line, same length as `src`. Its sample type may differ.
/// * `scale` - The kernel scale, must be > 0.
///
/// # Errors
///
/// [`FilterError::InvalidScale`] if `scale <= 0` or NaN, [`FilterError::InvalidLineLength`]
/// if the lengths differ. Nothing is written in either case. An empty line is a no-op.
///
/// # Examples
///
/// ```
/// use iir_imgproc::filter::recursive_smooth_line;
///
/// let src = [3u8; 5];
/// let mut dst = [0.0f32; 5];
/// recursive_smooth_line(&src[..], &mut dst[..], 2.0).unwrap();
///
/// assert!(dst.iter().all(|&v| (v - 3.0).abs() < 1e-5));
/// ```
pub fn recursive_smooth_line<S, D>(src: &S, dst: &mut D, scale: f64) -> Result<(), FilterError>
where
    S: LineSource + ?Sized,
    S::Item: RealPromote,
    D: LineSink + ?Sized,
    D::Item: RealPromote,
{
    let w = check_line(src, dst, scale)?;
    if w > 0 {
        smooth_kernel(src, dst, w, decay(scale));
    }
    Ok(())
}

fn smooth_kernel<S, D, R>(src: &S, dst: &mut D, w: usize, b: f64)
where
    S: LineSource + ?Sized,
    S::Item: RealPromote<Real = R>,
    D: LineSink + ?Sized,
    D::Item: RealPromote,
    R: Float,
{
    // coefficients stay in f64, only the accumulator is stored in R
    let norm = (1.0 - b) / (1.0 + b);
    let seed = 1.0 / (1.0 - b);
    let sample = |x: usize| widen(src.get(x).to_real());

    let mut line = vec![R::zero(); w];

    // causal part
    let mut old: R = coefficient(seed * sample(0));
    for (x, slot) in line.iter_mut().enumerate() {
        old = coefficient(sample(x) + b * widen(old));
        *slot = old;
    }

    // anti-causal part
    old = coefficient(seed * sample(w - 1));
    for x in (0..w).rev() {
        old = coefficient(b * widen(old));
        dst.set(x, RealPromote::from_real(norm * (widen(line[x]) + widen(old))));
        old = coefficient(sample(x) + widen(old));
    }
}

/// Recursive convolution of a line with the first derivative of `exp(-|x| / scale)`.
///
/// The causal part is stored negated, which gives the kernel its odd symmetry: the response
/// is positive where the signal rises. A constant line yields zero.
///
/// # Errors
///
/// Same preconditions as [`recursive_smooth_line`].
pub fn recursive_first_derivative_line<S, D>(
    src: &S,
    dst: &mut D,
    scale: f64,
) -> Result<(), FilterError>
where
    S: LineSource + ?Sized,
    S::Item: RealPromote,
    D: LineSink + ?Sized,
    D::Item: RealPromote,
{
    let w = check_line(src, dst, scale)?;
    if w > 0 {
        first_derivative_kernel(src, dst, w, decay(scale));
    }
    Ok(())
}

fn first_derivative_kernel<S, D, R>(src: &S, dst: &mut D, w: usize, b: f64)
where
    S: LineSource + ?Sized,
    S::Item: RealPromote<Real = R>,
    D: LineSink + ?Sized,
    D::Item: RealPromote,
    R: Float,
{
    let norm = (1.0 - b) * (1.0 - b) / 2.0 / b;
    let seed = 1.0 / (1.0 - b);
    let sample = |x: usize| widen(src.get(x).to_real());

    let mut line = vec![R::zero(); w];

    let mut old: R = coefficient(seed * sample(0));
    for (x, slot) in line.iter_mut().enumerate() {
        old = coefficient(sample(x) + b * widen(old));
        *slot = -old;
    }

    old = coefficient(seed * sample(w - 1));
    for x in (0..w).rev() {
        old = coefficient(sample(x) + b * widen(old));
        dst.set(x, RealPromote::from_real(norm * (widen(line[x]) + widen(old))));
    }
}

/// Recursive convolution of a line with the second derivative of `exp(-|x| / scale)`.
///
/// The causal pass buffers the accumulator before it absorbs the current sample, and the
/// centre tap `a = -2 / (1 - b)` is applied to the input sample in the anti-causal pass.
///
/// # Errors
///
/// Same preconditions as [`recursive_smooth_line`].
pub fn recursive_second_derivative_line<S, D>(
    src: &S,
    dst: &mut D,
    scale: f64,
) -> Result<(), FilterError>
where
    S: LineSource + ?Sized,
    S::Item: RealPromote,
    D: LineSink + ?Sized,
    D::Item: RealPromote,
{
    let w = check_line(src, dst, scale)?;
    if w > 0 {
        second_derivative_kernel(src, dst, w, decay(scale));
    }
    Ok(())
}

fn second_derivative_kernel<S, D, R>(src: &S, dst: &mut D, w: usize, b: f64)
where
    S: LineSource + ?Sized,
    S::Item: RealPromote<Real = R>,
    D: LineSink + ?Sized,
    D::Item: RealPromote,
    R: Float,
{
    let a = -2.0 / (1.0 - b);
    let norm = (1.0 - b) * (1.0 - b) * (1.0 - b) / (1.0 + b);
    let seed = 1.0 / (1.0 - b);
    let sample = |x: usize| widen(src.get(x).to_real());

    let mut line = vec![R::zero(); w];

    let mut old: R = coefficient(seed * sample(0));
    for (x, slot) in line.iter_mut().enumerate() {
        *slot = old;
        old = coefficient(sample(x) + b * widen(old));
    }

    old = coefficient(seed * sample(w - 1));
    for x in (0..w).rev() {
        let value = sample(x);
        let out = norm * (widen(line[x]) + widen(old) + a * value);
        dst.set(x, RealPromote::from_real(out));
        old = coefficient(value + b * widen(old));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCALES: [f64; 5] = [0.1, 0.5, 1.0, 3.0, 25.0];

    #[test]
    fn test_smooth_constant_line() -> Result<(), FilterError> {
        for scale in SCALES {
            let src = vec![4.5f64; 16];
            let mut dst = vec![0.0f64; 16];
            recursive_smooth_line(&src, &mut dst, scale)?;
            for v in dst {
                assert_relative_eq!(v, 4.5, max_relative = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_smooth_constant_line_u8() -> Result<(), FilterError> {
        let src = vec![200u8; 9];
        let mut dst = vec![0u8; 9];
        recursive_smooth_line(&src, &mut dst, 2.0)?;
        assert_eq!(dst, vec![200u8; 9]);
        Ok(())
    }

    #[test]
    fn test_smooth_single_sample() -> Result<(), FilterError> {
        for scale in SCALES {
            let src = [7.25f32];
            let mut dst = [0.0f32];
            recursive_smooth_line(&src[..], &mut dst[..], scale)?;
            assert_relative_eq!(dst[0], 7.25, max_relative = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_smooth_impulse() -> Result<(), FilterError> {
        let src = [0.0f64, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let mut dst = [0.0f64; 7];
        recursive_smooth_line(&src[..], &mut dst[..], 1.0)?;

        let b = (-1.0f64).exp();
        let norm = (1.0 - b) / (1.0 + b);

        for k in 0..=3 {
            assert_eq!(dst[3 - k], dst[3 + k]);
            assert_relative_eq!(dst[3 + k], norm * b.powi(k as i32), max_relative = 1e-12);
        }
        // unimodal
        for x in 0..3 {
            assert!(dst[x] < dst[x + 1]);
            assert!(dst[6 - x] < dst[5 - x]);
        }
        Ok(())
    }

    #[test]
    fn test_empty_line_is_noop() -> Result<(), FilterError> {
        let src: [f32; 0] = [];
        let mut dst: [f32; 0] = [];
        for filter in [
            RecursiveFilter::Smooth,
            RecursiveFilter::FirstDerivative,
            RecursiveFilter::SecondDerivative,
        ] {
            filter.apply_line(&src[..], &mut dst[..], 1.0)?;
        }
        Ok(())
    }

    #[test]
    fn test_invalid_scale() {
        let src = [1.0f32, 2.0, 3.0];
        for filter in [
            RecursiveFilter::Smooth,
            RecursiveFilter::FirstDerivative,
            RecursiveFilter::SecondDerivative,
        ] {
            for scale in [0.0, -1.0] {
                let mut dst = [9.0f32; 3];
                let res = filter.apply_line(&src[..], &mut dst[..], scale);
                assert_eq!(res, Err(FilterError::InvalidScale(scale)));
                assert_eq!(dst, [9.0; 3]);
            }

            let mut dst = [9.0f32; 3];
            let res = filter.apply_line(&src[..], &mut dst[..], f64::NAN);
            assert!(matches!(res, Err(FilterError::InvalidScale(s)) if s.is_nan()));

            // checked before the degenerate case
            let empty: [f32; 0] = [];
            let res = filter.apply_line(&empty[..], &mut [0.0f32; 0][..], 0.0);
            assert_eq!(res, Err(FilterError::InvalidScale(0.0)));
        }
    }

    #[test]
    fn test_length_mismatch() {
        let src = [1.0f64; 4];
        let mut dst = [0.0f64; 3];
        let res = recursive_first_derivative_line(&src[..], &mut dst[..], 1.0);
        assert_eq!(res, Err(FilterError::InvalidLineLength(4, 3)));
    }

    #[test]
    fn test_first_derivative_constant_line() -> Result<(), FilterError> {
        for scale in SCALES {
            let src = vec![-3.0f64; 12];
            let mut dst = vec![1.0f64; 12];
            recursive_first_derivative_line(&src, &mut dst, scale)?;
            for v in dst {
                approx::assert_abs_diff_eq!(v, 0.0, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_first_derivative_impulse() -> Result<(), FilterError> {
        let src = [0.0f64, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let mut dst = [0.0f64; 7];
        recursive_first_derivative_line(&src[..], &mut dst[..], 1.0)?;

        let b = (-1.0f64).exp();
        let norm = (1.0 - b) * (1.0 - b) / 2.0 / b;

        assert_eq!(dst[3], 0.0);
        for k in 1..=3 {
            assert_relative_eq!(dst[3 - k], norm * b.powi(k as i32), max_relative = 1e-12);
            assert_relative_eq!(dst[3 + k], -norm * b.powi(k as i32), max_relative = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_first_derivative_ramp() -> Result<(), FilterError> {
        // the normalization gives unit slope away from the borders
        let src = (0..64).map(|x| x as f64).collect::<Vec<_>>();
        let mut dst = vec![0.0f64; 64];
        recursive_first_derivative_line(&src, &mut dst, 2.0)?;

        for &v in &dst[24..40] {
            assert_relative_eq!(v, 1.0, max_relative = 1e-4);
        }
        Ok(())
    }

    #[test]
    fn test_second_derivative_constant_line() -> Result<(), FilterError> {
        for scale in SCALES {
            let src = vec![10.0f32; 20];
            let mut dst = vec![1.0f32; 20];
            recursive_second_derivative_line(&src, &mut dst, scale)?;
            for v in dst {
                approx::assert_abs_diff_eq!(v, 0.0, epsilon = 1e-3);
            }
        }
        Ok(())
    }

    #[test]
    fn test_second_derivative_impulse() -> Result<(), FilterError> {
        let src = [0.0f64, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let mut dst = [0.0f64; 7];
        recursive_second_derivative_line(&src[..], &mut dst[..], 1.0)?;

        let b = (-1.0f64).exp();
        let a = -2.0 / (1.0 - b);
        let norm = (1.0 - b) * (1.0 - b) * (1.0 - b) / (1.0 + b);

        assert_relative_eq!(dst[3], norm * a, max_relative = 1e-12);
        for k in 1..=3 {
            assert_eq!(dst[3 - k], dst[3 + k]);
            assert_relative_eq!(dst[3 + k], norm * b.powi(k as i32 - 1), max_relative = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_mixed_sample_types() -> Result<(), FilterError> {
        let src = [0u8, 0, 0, 255, 0, 0, 0];
        let mut dst_f64 = [0.0f64; 7];
        let mut dst_u8 = [0u8; 7];
        recursive_smooth_line(&src[..], &mut dst_f64[..], 1.0)?;
        recursive_smooth_line(&src[..], &mut dst_u8[..], 1.0)?;

        for (&f, &u) in dst_f64.iter().zip(dst_u8.iter()) {
            assert_eq!(u, f.round() as u8);
        }
        assert_eq!(dst_u8[2], dst_u8[4]);
        Ok(())
    }

    #[test]
    fn test_small_scale_f32_stays_finite() -> Result<(), FilterError> {
        // norm of the derivative kernels exceeds the f32 range at this scale
        let src = [2.0f32; 8];
        for filter in [
            RecursiveFilter::Smooth,
            RecursiveFilter::FirstDerivative,
            RecursiveFilter::SecondDerivative,
        ] {
            let mut dst = [f32::NAN; 8];
            filter.apply_line(&src[..], &mut dst[..], 0.008)?;

            let mut dst_f64 = [f64::NAN; 8];
            let src_f64 = src.map(f64::from);
            filter.apply_line(&src_f64[..], &mut dst_f64[..], 0.008)?;

            for (&v, &expected) in dst.iter().zip(dst_f64.iter()) {
                assert!(v.is_finite(), "{filter:?} gave {v}");
                assert_relative_eq!(v as f64, expected, epsilon = 1e-6, max_relative = 1e-6);
            }
        }

        let mut dst = [f32::NAN; 8];
        recursive_first_derivative_line(&src[..], &mut dst[..], 0.008)?;
        assert_eq!(dst, [0.0f32; 8]);
        Ok(())
    }
}

