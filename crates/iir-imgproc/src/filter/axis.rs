use iir_image::{Image, ImageError};

use super::error::{check_scale, FilterError};
use super::line::{StridedLine, StridedLineMut};
use super::recursive::RecursiveFilter;
use crate::parallel::{for_each_line, ExecutionStrategy};
use crate::promote::RealPromote;

/// The image axis a line filter runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Along the rows, i.e. horizontally.
    X,
    /// Along the columns, i.e. vertically.
    Y,
}

/// Apply a recursive line filter to every row or every column of an image.
///
/// Each channel of each line is filtered independently, so `dst[line] = filter(src[line])`
/// for every line along `axis`. No state is shared across lines.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C). Its pixel type may differ.
/// * `filter` - The line filter to run.
/// * `axis` - The axis the lines run along.
/// * `scale` - The filter scale, must be > 0.
/// * `strategy` - The execution strategy.
///
/// # Errors
///
/// [`FilterError::InvalidScale`] for a non-positive scale, or an image size mismatch. An
/// empty image is a no-op.
///
/// # Examples
///
/// ```
/// use iir_image::Image;
/// use iir_imgproc::filter::{recursive_filter_axis, Axis, RecursiveFilter};
/// use iir_imgproc::parallel::ExecutionStrategy;
///
/// let src = Image::<u8, 3>::from_size_val([4, 3].into(), 100).unwrap();
/// let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0).unwrap();
///
/// recursive_filter_axis(
///     &src,
///     &mut dst,
///     RecursiveFilter::Smooth,
///     Axis::Y,
///     1.5,
///     ExecutionStrategy::Serial,
/// ).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| (v - 100.0).abs() < 1e-3));
/// ```
pub fn recursive_filter_axis<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    filter: RecursiveFilter,
    axis: Axis,
    scale: f64,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    check_scale(scale)?;

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    if src.as_slice().is_empty() {
        return Ok(());
    }

    log::debug!(
        "recursive {:?} along {:?}: {} channels={} scale={} strategy={:?}",
        filter,
        axis,
        src.size(),
        C,
        scale,
        strategy
    );

    let (width, height) = (src.cols(), src.rows());

    match axis {
        Axis::X => filter_rows::<T, U, C>(
            src.as_slice(),
            dst.as_slice_mut(),
            width,
            filter,
            scale,
            strategy,
        ),
        Axis::Y if strategy.is_parallel(src.as_slice().len()) => {
            // columns become contiguous rows of the transposed buffers
            let mut src_t = src.as_slice().to_vec();
            transpose_into::<T, C>(src.as_slice(), height, width, &mut src_t);

            let mut dst_t = dst.as_slice().to_vec();
            filter_rows::<T, U, C>(&src_t, &mut dst_t, height, filter, scale, strategy)?;

            transpose_into::<U, C>(&dst_t, width, height, dst.as_slice_mut());
            Ok(())
        }
        Axis::Y => filter_columns::<T, U, C>(
            src.as_slice(),
            dst.as_slice_mut(),
            width,
            height,
            filter,
            scale,
        ),
    }
}

/// Filter every row of a flat (rows, `width`, C) buffer.
fn filter_rows<T, U, const C: usize>(
    src: &[T],
    dst: &mut [U],
    width: usize,
    filter: RecursiveFilter,
    scale: f64,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    for_each_line(src, dst, width * C, strategy, |src_row, dst_row| {
        if C == 1 {
            return filter.apply_line(src_row, dst_row, scale);
        }

        for ch in 0..C {
            let src_line = StridedLine::from_parts(src_row, ch, C, width);
            let mut dst_line = StridedLineMut::from_parts(dst_row, ch, C, width);
            filter.apply_line(&src_line, &mut dst_line, scale)?;
        }
        Ok(())
    })
}

/// Filter every column of a flat (`height`, `width`, C) buffer on the current thread.
fn filter_columns<T, U, const C: usize>(
    src: &[T],
    dst: &mut [U],
    width: usize,
    height: usize,
    filter: RecursiveFilter,
    scale: f64,
) -> Result<(), FilterError>
where
    T: RealPromote,
    U: RealPromote,
{
    let stride = width * C;
    for x in 0..width {
        for ch in 0..C {
            let offset = x * C + ch;
            let src_line = StridedLine::from_parts(src, offset, stride, height);
            let mut dst_line = StridedLineMut::from_parts(dst, offset, stride, height);
            filter.apply_line(&src_line, &mut dst_line, scale)?;
        }
    }
    Ok(())
}

/// Transpose a flat (`rows`, `cols`, C) buffer into a (`cols`, `rows`, C) buffer.
fn transpose_into<T: Copy, const C: usize>(src: &[T], rows: usize, cols: usize, dst: &mut [T]) {
    debug_assert_eq!(src.len(), rows * cols * C);
    debug_assert_eq!(src.len(), dst.len());

    for (r, src_row) in src.chunks_exact(cols * C).enumerate() {
        for (c, src_pixel) in src_row.chunks_exact(C).enumerate() {
            let idx = (c * rows + r) * C;
            dst[idx..idx + C].copy_from_slice(src_pixel);
        }
    }
}
