//! Read and write access to one line of samples.
//!
//! A line is either a contiguous slice or a strided view into a flat image buffer, e.g. one
//! channel of a row or one channel of a column. The recursive kernels are generic over these
//! traits and monomorphized for every access pattern.

/// A readable, ordered, finite sequence of samples.
pub trait LineSource {
    /// The sample type.
    type Item: Copy;

    /// Number of samples in the line.
    fn len(&self) -> usize;

    /// Whether the line has no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the sample at `index`.
    ///
    /// Panics if `index >= self.len()`.
    fn get(&self, index: usize) -> Self::Item;
}

/// A writable, ordered, finite sequence of samples.
pub trait LineSink {
    /// The sample type.
    type Item: Copy;

    /// Number of samples in the line.
    fn len(&self) -> usize;

    /// Whether the line has no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write `value` at `index`.
    ///
    /// Panics if `index >= self.len()`.
    fn set(&mut self, index: usize, value: Self::Item);
}

impl<T: Copy> LineSource for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> T {
        self[index]
    }
}

impl<T: Copy> LineSink for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }
}

impl<T: Copy> LineSource for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> T {
        self[index]
    }
}

impl<T: Copy> LineSink for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }
}

fn strided_fits(data_len: usize, offset: usize, stride: usize, len: usize) -> bool {
    match len.checked_sub(1) {
        None => true,
        Some(last) => last
            .checked_mul(stride)
            .and_then(|v| v.checked_add(offset))
            .is_some_and(|idx| idx < data_len),
    }
}

/// A read-only strided view: element `i` is `data[offset + i * stride]`.
#[derive(Debug, Clone, Copy)]
pub struct StridedLine<'a, T> {
    data: &'a [T],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a, T> StridedLine<'a, T> {
    /// Create a strided view, or `None` if the last element falls outside `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use iir_imgproc::filter::line::{LineSource, StridedLine};
    ///
    /// // second channel of a 3-pixel, 2-channel row
    /// let row = [0, 10, 1, 11, 2, 12];
    /// let line = StridedLine::new(&row, 1, 2, 3).unwrap();
    ///
    /// assert_eq!(line.len(), 3);
    /// assert_eq!(line.get(2), 12);
    /// assert!(StridedLine::new(&row, 1, 2, 4).is_none());
    /// ```
    pub fn new(data: &'a [T], offset: usize, stride: usize, len: usize) -> Option<Self> {
        strided_fits(data.len(), offset, stride, len).then_some(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    pub(crate) fn from_parts(data: &'a [T], offset: usize, stride: usize, len: usize) -> Self {
        debug_assert!(strided_fits(data.len(), offset, stride, len));
        Self {
            data,
            offset,
            stride,
            len,
        }
    }
}

impl<T: Copy> LineSource for StridedLine<'_, T> {
    type Item = T;

    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        debug_assert!(index < self.len);
        self.data[self.offset + index * self.stride]
    }
}

/// A mutable strided view: element `i` is `data[offset + i * stride]`.
#[derive(Debug)]
pub struct StridedLineMut<'a, T> {
    data: &'a mut [T],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a, T> StridedLineMut<'a, T> {
    /// Create a mutable strided view, or `None` if the last element falls outside `data`.
    pub fn new(data: &'a mut [T], offset: usize, stride: usize, len: usize) -> Option<Self> {
        if !strided_fits(data.len(), offset, stride, len) {
            return None;
        }
        Some(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    pub(crate) fn from_parts(data: &'a mut [T], offset: usize, stride: usize, len: usize) -> Self {
        debug_assert!(strided_fits(data.len(), offset, stride, len));
        Self {
            data,
            offset,
            stride,
            len,
        }
    }
}

impl<T: Copy> LineSink for StridedLineMut<'_, T> {
    type Item = T;

    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn set(&mut self, index: usize, value: T) {
        debug_assert!(index < self.len);
        self.data[self.offset + index * self.stride] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_line() {
        let src = [1.0f32, 2.0, 3.0];
        let mut dst = vec![0.0f32; 3];

        for i in 0..LineSource::len(&src[..]) {
            LineSink::set(&mut dst, i, LineSource::get(&src[..], i) * 2.0);
        }
        assert_eq!(dst, vec![2.0, 4.0, 6.0]);
        assert!(LineSource::is_empty(&Vec::<u8>::new()));
    }

    #[test]
    fn test_strided_line() {
        // 2x3 image, 2 channels; column 1, channel 1
        let data = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
        let line = StridedLine::new(&data, 3, 6, 2).unwrap();
        assert_eq!(line.len(), 2);
        assert_eq!(line.get(0), 3);
        assert_eq!(line.get(1), 9);

        let empty = StridedLine::new(&data, 100, 6, 0).unwrap();
        assert!(empty.is_empty());

        assert!(StridedLine::new(&data, 3, 6, 3).is_none());
        assert!(StridedLine::new(&data, 0, usize::MAX, 3).is_none());
    }

    #[test]
    fn test_strided_line_mut() {
        let mut data = [0; 6];
        {
            let mut line = StridedLineMut::new(&mut data, 1, 2, 3).unwrap();
            for i in 0..line.len() {
                line.set(i, i as i32 + 1);
            }
        }
        assert_eq!(data, [0, 1, 0, 2, 0, 3]);
        assert!(StridedLineMut::new(&mut data, 2, 2, 3).is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_strided_line_index_past_len() {
        // the element exists in the buffer but lies outside the view
        let data = [0, 1, 2, 3, 4, 5];
        let line = StridedLine::new(&data, 0, 2, 2).unwrap();
        line.get(2);
    }
}

