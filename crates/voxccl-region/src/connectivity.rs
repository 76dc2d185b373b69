//! Voxel adjacency
//!
//! Connectivity is decided per pair of rows. Two rows at offset
//! `(dy, dz)` have a row distance `|dy| + |dz|`; two runs on them may only
//! join if the remaining Manhattan budget allows it:
//!
//! - budget below zero: the rows never connect
//! - budget exactly zero: the runs must share an x column (strict overlap)
//! - budget above zero: the runs may also meet diagonally (touching in x)
//!
//! The budget is `max_allowed_distance - row_distance`, with
//! `max_allowed_distance = 3 - adjacency`.

use crate::error::{RegionError, RegionResult};

/// Voxel connectivity in 3D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// Face neighbors only
    Six,
    /// Face and edge neighbors
    Eighteen,
    /// Face, edge and corner neighbors
    #[default]
    TwentySix,
}

/// How two x intervals on connected rows must relate to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// The intervals share at least one column
    Strict,
    /// The intervals share a column or are diagonally adjacent
    Touch,
}

impl Overlap {
    /// Whether half-open intervals `[a_lo, a_hi)` and `[b_lo, b_hi)` connect.
    #[inline]
    pub fn connects(self, a_lo: u32, a_hi: u32, b_lo: u32, b_hi: u32) -> bool {
        match self {
            Overlap::Strict => a_lo < b_hi && b_lo < a_hi,
            Overlap::Touch => a_lo <= b_hi && b_lo <= a_hi,
        }
    }
}

impl Connectivity {
    /// Numeric adjacency setting: 0 for 26-, 1 for 18-, 2 for 6-connectivity.
    pub fn adjacency(self) -> u32 {
        match self {
            Connectivity::TwentySix => 0,
            Connectivity::Eighteen => 1,
            Connectivity::Six => 2,
        }
    }

    /// Parse a numeric adjacency setting.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidParameters` for values above 2.
    pub fn from_adjacency(adjacency: u32) -> RegionResult<Self> {
        match adjacency {
            0 => Ok(Connectivity::TwentySix),
            1 => Ok(Connectivity::Eighteen),
            2 => Ok(Connectivity::Six),
            _ => Err(RegionError::InvalidParameters(format!(
                "adjacency must be 0, 1 or 2, got {adjacency}"
            ))),
        }
    }

    /// Largest Manhattan distance between two connected voxels.
    pub fn max_allowed_distance(self) -> u32 {
        3 - self.adjacency()
    }

    /// Number of neighbors of an interior voxel.
    pub fn neighbor_count(self) -> usize {
        match self {
            Connectivity::Six => 6,
            Connectivity::Eighteen => 18,
            Connectivity::TwentySix => 26,
        }
    }

    /// Overlap rule for two rows `row_distance` apart, or `None` if such
    /// rows never connect.
    pub fn row_overlap(self, row_distance: u32) -> Option<Overlap> {
        let max = self.max_allowed_distance();
        if row_distance > max {
            None
        } else if row_distance == max {
            Some(Overlap::Strict)
        } else {
            Some(Overlap::Touch)
        }
    }

    /// All `(dx, dy, dz)` neighbor offsets.
    pub fn neighbor_offsets(self) -> Vec<(i32, i32, i32)> {
        let max = self.max_allowed_distance() as i32;
        let mut offsets = Vec::with_capacity(self.neighbor_count());
        for dz in -1..=1i32 {
            for dy in -1..=1i32 {
                for dx in -1..=1i32 {
                    let d = dx.abs() + dy.abs() + dz.abs();
                    if d > 0 && d <= max {
                        offsets.push((dx, dy, dz));
                    }
                }
            }
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_offsets_count() {
        for c in [
            Connectivity::Six,
            Connectivity::Eighteen,
            Connectivity::TwentySix,
        ] {
            assert_eq!(c.neighbor_offsets().len(), c.neighbor_count());
        }
    }

    #[test]
    fn test_adjacency_roundtrip() {
        for a in 0..3 {
            assert_eq!(Connectivity::from_adjacency(a).unwrap().adjacency(), a);
        }
        assert!(Connectivity::from_adjacency(3).is_err());
        assert_eq!(Connectivity::Six.max_allowed_distance(), 1);
        assert_eq!(Connectivity::TwentySix.max_allowed_distance(), 3);
    }

    #[test]
    fn test_row_overlap() {
        assert_eq!(Connectivity::Six.row_overlap(1), Some(Overlap::Strict));
        assert_eq!(Connectivity::Six.row_overlap(2), None);
        assert_eq!(Connectivity::Eighteen.row_overlap(1), Some(Overlap::Touch));
        assert_eq!(Connectivity::Eighteen.row_overlap(2), Some(Overlap::Strict));
        assert_eq!(Connectivity::TwentySix.row_overlap(2), Some(Overlap::Touch));
    }

    #[test]
    fn test_overlap_rules() {
        // [0, 2) and [2, 4) meet diagonally but share no column
        assert!(!Overlap::Strict.connects(0, 2, 2, 4));
        assert!(Overlap::Touch.connects(0, 2, 2, 4));
        assert!(Overlap::Strict.connects(0, 3, 2, 4));
        // one column gap
        assert!(!Overlap::Touch.connects(0, 2, 3, 4));
    }
}
