//! Partition comparison of label volumes
//!
//! Two label volumes describe the same partition when they agree on which
//! voxels are background and every label of one corresponds to exactly one
//! label of the other.

use std::collections::HashMap;
use std::fmt;
use voxccl_core::{Dimensions, Volume};

/// First difference found between two label volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionMismatch {
    /// The volumes differ in size
    Dimensions {
        expected: Dimensions,
        actual: Dimensions,
    },
    /// One volume has background where the other has a label
    Background {
        at: (u32, u32, u32),
        expected: u32,
        actual: u32,
    },
    /// A label maps to two different labels of the other volume
    Label {
        at: (u32, u32, u32),
        expected: u32,
        actual: u32,
    },
}

impl fmt::Display for PartitionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimensions { expected, actual } => {
                write!(f, "dimensions differ: expected {expected}, got {actual}")
            }
            Self::Background {
                at,
                expected,
                actual,
            } => write!(
                f,
                "background differs at {at:?}: expected label {expected}, got {actual}"
            ),
            Self::Label {
                at,
                expected,
                actual,
            } => write!(
                f,
                "components differ at {at:?}: label {expected} corresponds to two labels, one of them {actual}"
            ),
        }
    }
}

/// Check that `expected` and `actual` partition the voxels the same way.
pub fn same_partition(
    expected: &Volume<u32>,
    actual: &Volume<u32>,
) -> Result<(), PartitionMismatch> {
    let dims = expected.dimensions();
    if dims != actual.dimensions() {
        return Err(PartitionMismatch::Dimensions {
            expected: dims,
            actual: actual.dimensions(),
        });
    }

    let mut forward: HashMap<u32, u32> = HashMap::new();
    let mut backward: HashMap<u32, u32> = HashMap::new();
    let position = |index: usize| {
        let slice = dims.slice_len();
        let x = dims.x as usize;
        (
            (index % x) as u32,
            ((index % slice) / x) as u32,
            (index / slice) as u32,
        )
    };

    for (index, (&e, &a)) in expected.data().iter().zip(actual.data()).enumerate() {
        if (e == 0) != (a == 0) {
            return Err(PartitionMismatch::Background {
                at: position(index),
                expected: e,
                actual: a,
            });
        }
        if e == 0 {
            continue;
        }
        let mapped = *forward.entry(e).or_insert(a);
        let mapped_back = *backward.entry(a).or_insert(e);
        if mapped != a || mapped_back != e {
            return Err(PartitionMismatch::Label {
                at: position(index),
                expected: e,
                actual: a,
            });
        }
    }
    Ok(())
}

/// Voxel count of every label in `labels`, sorted ascending.
pub fn component_sizes(labels: &Volume<u32>) -> Vec<u64> {
    let mut counts: HashMap<u32, u64> = HashMap::new();
    for &label in labels.data().iter().filter(|&&l| l != 0) {
        *counts.entry(label).or_default() += 1;
    }
    let mut sizes: Vec<u64> = counts.into_values().collect();
    sizes.sort_unstable();
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(data: Vec<u32>) -> Volume<u32> {
        Volume::from_data(Dimensions::new(3, 2, 1), data).unwrap()
    }

    #[test]
    fn test_relabeled_is_same() {
        let a = labels(vec![1, 1, 0, 2, 0, 3]);
        let b = labels(vec![7, 7, 0, 3, 0, 1]);
        assert_eq!(same_partition(&a, &b), Ok(()));
        assert_eq!(component_sizes(&a), vec![1, 1, 2]);
    }

    #[test]
    fn test_background_mismatch() {
        let a = labels(vec![1, 1, 0, 0, 0, 0]);
        let b = labels(vec![1, 1, 0, 0, 2, 0]);
        assert_eq!(
            same_partition(&a, &b),
            Err(PartitionMismatch::Background {
                at: (1, 1, 0),
                expected: 0,
                actual: 2
            })
        );
    }

    #[test]
    fn test_split_and_merge() {
        let one = labels(vec![1, 1, 1, 0, 0, 0]);
        let two = labels(vec![1, 1, 2, 0, 0, 0]);
        assert!(matches!(
            same_partition(&one, &two),
            Err(PartitionMismatch::Label { at: (2, 0, 0), .. })
        ));
        assert!(matches!(
            same_partition(&two, &one),
            Err(PartitionMismatch::Label { at: (2, 0, 0), .. })
        ));
    }
}
