//! Voxel element types
//!
//! A [`Voxel`] is a plain scalar stored in a [`Slice`](crate::Slice) or
//! [`Volume`](crate::Volume). The trait carries what the labeling engine
//! and the raw slice format need: conversion from a component label,
//! a numeric view for thresholding, and a fixed little-endian encoding.

use std::fmt::Debug;

/// Scalar element of a volume.
pub trait Voxel: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Type tag used by the raw slice file format
    const TYPE_NAME: &'static str;

    /// Encoded size in bytes
    const BYTES: usize;

    /// Largest label the type stores exactly
    const MAX_LABEL: u32;

    /// Convert a component label (or the binary foreground value 1).
    ///
    /// Labels above [`Self::MAX_LABEL`] are not stored exactly: integer
    /// types saturate and `f32` rounds.
    fn from_label(label: u32) -> Self;

    /// Numeric value, used by threshold classifiers and range statistics.
    fn to_f64(self) -> f64;

    /// Whether the voxel differs from the zero value.
    fn is_nonzero(self) -> bool {
        self != Self::default()
    }

    /// Append the little-endian encoding to `out`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decode from exactly [`Self::BYTES`] little-endian bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_int_voxel {
    ($t:ty, $name:expr, $max_label:expr) => {
        impl Voxel for $t {
            const TYPE_NAME: &'static str = $name;
            const BYTES: usize = std::mem::size_of::<$t>();
            const MAX_LABEL: u32 = $max_label;

            #[inline]
            fn from_label(label: u32) -> Self {
                <$t>::try_from(label).unwrap_or(<$t>::MAX)
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(&bytes[..Self::BYTES]);
                <$t>::from_le_bytes(buf)
            }
        }
    };
}

impl_int_voxel!(u8, "u8", u8::MAX as u32);
impl_int_voxel!(u16, "u16", u16::MAX as u32);
impl_int_voxel!(u32, "u32", u32::MAX);
impl_int_voxel!(u64, "u64", u32::MAX);

impl Voxel for f32 {
    const TYPE_NAME: &'static str = "f32";
    const BYTES: usize = 4;
    // Integers above 2^24 are not all representable
    const MAX_LABEL: u32 = 1 << f32::MANTISSA_DIGITS;

    #[inline]
    fn from_label(label: u32) -> Self {
        label as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_saturates() {
        assert_eq!(u8::from_label(7), 7);
        assert_eq!(u8::from_label(300), u8::MAX);
        assert_eq!(u16::from_label(70_000), u16::MAX);
        assert_eq!(u32::from_label(70_000), 70_000);
    }

    #[test]
    fn test_max_label_is_exact() {
        assert_eq!(u8::MAX_LABEL, 255);
        assert_eq!(u16::from_label(u16::MAX_LABEL), u16::MAX);
        assert_eq!(u64::MAX_LABEL, u32::MAX);
        let largest = f32::from_label(f32::MAX_LABEL);
        assert_eq!(largest as u32, f32::MAX_LABEL);
        assert_eq!(f32::from_label(f32::MAX_LABEL + 1), largest);
    }

    #[test]
    fn test_le_encoding() {
        let mut out = Vec::new();
        0x1234u16.write_le(&mut out);
        assert_eq!(out, vec![0x34, 0x12]);
        assert_eq!(u16::read_le(&out), 0x1234);

        out.clear();
        1.5f32.write_le(&mut out);
        assert_eq!(f32::read_le(&out), 1.5);
    }

    #[test]
    fn test_nonzero() {
        assert!(!0u8.is_nonzero());
        assert!(3u32.is_nonzero());
        assert!(!0.0f32.is_nonzero());
    }
}
