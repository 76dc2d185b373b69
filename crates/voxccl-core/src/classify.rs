//! Binary foreground classification
//!
//! The labeling engine works on binary volumes. A [`Foreground`]
//! classifier decides, voxel by voxel within one slice, whether the voxel
//! is foreground. Closures of the form `Fn(&Slice<T>, u32, u32) -> bool`
//! are classifiers too.

use crate::{Slice, Voxel};

/// Decides whether a voxel of a slice is foreground.
pub trait Foreground<T> {
    fn is_foreground(&self, slice: &Slice<T>, x: u32, y: u32) -> bool;
}

impl<T, F> Foreground<T> for F
where
    F: Fn(&Slice<T>, u32, u32) -> bool,
{
    #[inline]
    fn is_foreground(&self, slice: &Slice<T>, x: u32, y: u32) -> bool {
        self(slice, x, y)
    }
}

/// Every non-zero voxel is foreground.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonZero;

impl<T: Voxel> Foreground<T> for NonZero {
    #[inline]
    fn is_foreground(&self, slice: &Slice<T>, x: u32, y: u32) -> bool {
        slice.get_unchecked(x, y).is_nonzero()
    }
}

/// Voxels strictly above a threshold are foreground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub value: f64,
}

impl Threshold {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl<T: Voxel> Foreground<T> for Threshold {
    #[inline]
    fn is_foreground(&self, slice: &Slice<T>, x: u32, y: u32) -> bool {
        slice.get_unchecked(x, y).to_f64() > self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers() {
        let slice = Slice::from_data(3, 1, vec![0u8, 4, 9]).unwrap();
        assert!(!NonZero.is_foreground(&slice, 0, 0));
        assert!(NonZero.is_foreground(&slice, 1, 0));

        let threshold = Threshold::new(4.0);
        assert!(!threshold.is_foreground(&slice, 1, 0));
        assert!(threshold.is_foreground(&slice, 2, 0));

        let even = |s: &Slice<u8>, x: u32, y: u32| s.get_unchecked(x, y) % 2 == 0;
        assert!(even.is_foreground(&slice, 0, 0));
        assert!(!even.is_foreground(&slice, 2, 0));
    }
}
