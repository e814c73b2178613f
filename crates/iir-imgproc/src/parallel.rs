use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The line stride must be valid.
    #[error("line stride must be > 0, got {0}")]
    InvalidLineStride(usize),

    /// Input and output sizes do not match.
    #[error("source and destination slices must have the same length")]
    SizeMismatch,
}

/// Number of elements from which [`ExecutionStrategy::Auto`] goes parallel.
pub const AUTO_PARALLEL_MIN_ELEMENTS: usize = 100_000;

/// Controls how line-wise operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process lines in parallel.
    Parallel,

    /// Parallel from [`AUTO_PARALLEL_MIN_ELEMENTS`] elements up, serial below.
    #[default]
    Auto,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether an operation over `num_elements` elements runs on more than one thread.
    pub fn is_parallel(&self, num_elements: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Auto => num_elements >= AUTO_PARALLEL_MIN_ELEMENTS,
        }
    }
}

/// Apply `op` to every pair of corresponding lines of `src` and `dst`.
///
/// Both slices are cut into consecutive chunks of `stride` elements. Lines never alias, so
/// they may be processed concurrently without synchronization. The first error returned by
/// `op` aborts the iteration.
///
/// # Arguments
///
/// * `src` - The source buffer.
/// * `dst` - The destination buffer, same length as `src`.
/// * `stride` - The number of elements per line.
/// * `strategy` - The execution strategy.
/// * `op` - The operation applied to each (source line, destination line) pair.
pub fn for_each_line<T, U, E, F>(
    src: &[T],
    dst: &mut [U],
    stride: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), E>
where
    T: Sync,
    U: Send,
    E: From<ParallelError> + Send,
    F: Fn(&[T], &mut [U]) -> Result<(), E> + Send + Sync,
{
    if stride == 0 {
        return Err(ParallelError::InvalidLineStride(stride).into());
    }

    if src.len() != dst.len() {
        return Err(ParallelError::SizeMismatch.into());
    }

    match strategy {
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| par_lines(src, dst, stride, &op))
        }
        _ if strategy.is_parallel(src.len()) => par_lines(src, dst, stride, &op),
        _ => src
            .chunks(stride)
            .zip(dst.chunks_mut(stride))
            .try_for_each(|(src_line, dst_line)| op(src_line, dst_line)),
    }
}

fn par_lines<T, U, E, F>(src: &[T], dst: &mut [U], stride: usize, op: &F) -> Result<(), E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(&[T], &mut [U]) -> Result<(), E> + Sync,
{
    src.par_chunks(stride)
        .zip(dst.par_chunks_mut(stride))
        .try_for_each(|(src_line, dst_line)| op(src_line, dst_line))
}
