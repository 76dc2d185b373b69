//! Circular row buffer
//!
//! Rows are appended in scan order, row `y` of slice `z` being the
//! `z * rows_per_slice + y`-th row added. Connecting a new row only needs
//! rows at most `rows_per_slice + 1` places back, so a buffer that holds
//! `rows_per_slice + 2` rows suffices for the merge pass. Labeling revisits
//! every row, and [`RowStorage::for_volume`] sizes the buffer to the whole
//! volume's row count for that reason.
//!
//! When the buffer wraps, the row being overwritten is detached from the
//! forest first.

use crate::connectivity::Connectivity;
use crate::error::{RegionError, RegionResult};
use crate::forest::{Forest, pair_mut};
use crate::metadata::RunMetadata;
use crate::row::Row;
use voxccl_core::Dimensions;

/// Fixed-capacity ring of the most recently added rows.
#[derive(Debug, Clone)]
pub struct RowStorage {
    rows: Vec<Row>,
    rows_per_slice: usize,
    capacity: usize,
    added: usize,
}

impl RowStorage {
    /// Create a buffer holding `capacity` rows of slices with
    /// `rows_per_slice` rows each.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidParameters` if `rows_per_slice` is 0 or
    /// `capacity` is below `rows_per_slice + 2`.
    pub fn new(rows_per_slice: usize, capacity: usize) -> RegionResult<Self> {
        if rows_per_slice == 0 {
            return Err(RegionError::InvalidParameters(
                "rows per slice must be positive".to_string(),
            ));
        }
        if capacity < rows_per_slice + 2 {
            return Err(RegionError::InvalidParameters(format!(
                "row storage capacity {capacity} cannot hold the {} rows a new row connects back to",
                rows_per_slice + 2
            )));
        }
        Ok(Self {
            rows: Vec::with_capacity(capacity),
            rows_per_slice,
            capacity,
            added: 0,
        })
    }

    /// A buffer retaining every row of a volume.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::DegenerateVolume` if the volume is too thin to
    /// label.
    pub fn for_volume(dims: Dimensions) -> RegionResult<Self> {
        if dims.is_degenerate() {
            return Err(RegionError::DegenerateVolume(dims));
        }
        Self::new(dims.y as usize, dims.row_count())
    }

    /// Append `row`, recycling the oldest slot once the buffer is full.
    pub fn add<M: RunMetadata>(&mut self, row: Row, forest: &mut Forest<M>) {
        if self.rows.len() < self.capacity {
            self.rows.push(row);
        } else {
            let slot = &mut self.rows[self.added % self.capacity];
            slot.clear(forest);
            *slot = row;
        }
        self.added += 1;
    }

    /// The most recently added row.
    pub fn latest(&self) -> Option<&Row> {
        self.slot_of(0).map(|slot| &self.rows[slot])
    }

    pub fn latest_mut(&mut self) -> Option<&mut Row> {
        self.slot_of(0).map(|slot| &mut self.rows[slot])
    }

    /// The row at offset `(dy, dz)` from the latest one, if it is still held.
    ///
    /// `dy` counts rows within a slice and `dz` whole slices, so
    /// `(1, -1)` is the row below the latest one in the previous slice.
    pub fn relative(&self, dy: i32, dz: i32) -> Option<&Row> {
        self.slot_of(self.back_offset(dy, dz)?)
            .map(|slot| &self.rows[slot])
    }

    /// Connect the latest row to the row at `(dy, dz)` from it.
    ///
    /// Returns false if that row is not held or too far away for
    /// `connectivity` to join anything.
    pub fn connect_latest<M: RunMetadata>(
        &mut self,
        dy: i32,
        dz: i32,
        connectivity: Connectivity,
        forest: &mut Forest<M>,
    ) -> bool {
        let Some(back) = self.back_offset(dy, dz) else {
            return false;
        };
        let (Some(latest), Some(other)) = (self.slot_of(0), self.slot_of(back)) else {
            return false;
        };
        let row_distance = dy.unsigned_abs() + dz.unsigned_abs();
        let (latest, other) = pair_mut(&mut self.rows, latest, other);
        latest.connect(other, row_distance, connectivity, forest)
    }

    /// The row added as number `seq` (0 based), if it is still held.
    pub fn get(&self, seq: usize) -> Option<&Row> {
        self.slot_of_seq(seq).map(|slot| &self.rows[slot])
    }

    pub fn get_mut(&mut self, seq: usize) -> Option<&mut Row> {
        self.slot_of_seq(seq).map(|slot| &mut self.rows[slot])
    }

    /// Held rows in slot order.
    ///
    /// Until the buffer wraps, slot order is the order rows were added.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn rows_per_slice(&self) -> usize {
        self.rows_per_slice
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of rows ever added.
    pub fn added(&self) -> usize {
        self.added
    }

    /// Whether any row has been overwritten.
    pub fn has_wrapped(&self) -> bool {
        self.added > self.capacity
    }

    /// How many rows before the latest one `(dy, dz)` lies, if behind it.
    fn back_offset(&self, dy: i32, dz: i32) -> Option<usize> {
        let back = -(dy as i64) - (dz as i64) * self.rows_per_slice as i64;
        usize::try_from(back).ok().filter(|&b| b > 0)
    }

    fn slot_of(&self, back: usize) -> Option<usize> {
        let seq = self.added.checked_sub(back + 1)?;
        self.slot_of_seq(seq)
    }

    fn slot_of_seq(&self, seq: usize) -> Option<usize> {
        if seq >= self.added || self.added - seq > self.capacity {
            return None;
        }
        Some(seq % self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::Root;
    use crate::run::RowPosition;

    fn filled(rows_per_slice: u32, slices: u32, capacity: usize) -> (RowStorage, Forest<()>) {
        let mut storage = RowStorage::new(rows_per_slice as usize, capacity).unwrap();
        let mut forest = Forest::new();
        for z in 0..slices {
            for y in 0..rows_per_slice {
                storage.add(
                    Row::from_intervals(RowPosition::new(y, z), &[(0, 2)]),
                    &mut forest,
                );
            }
        }
        (storage, forest)
    }

    #[test]
    fn test_capacity_validation() {
        assert!(RowStorage::new(0, 4).is_err());
        assert!(RowStorage::new(3, 4).is_err());
        assert!(RowStorage::new(3, 5).is_ok());
        assert!(RowStorage::for_volume(Dimensions::new(4, 1, 4)).is_err());
        assert_eq!(
            RowStorage::for_volume(Dimensions::new(4, 3, 5))
                .unwrap()
                .capacity(),
            15
        );
    }

    #[test]
    fn test_relative_positions() {
        let (storage, _) = filled(4, 3, 12);
        assert_eq!(storage.latest().unwrap().position(), RowPosition::new(3, 2));
        let at = |dy, dz| storage.relative(dy, dz).map(Row::position);
        assert_eq!(at(-1, 0), Some(RowPosition::new(2, 2)));
        assert_eq!(at(0, -1), Some(RowPosition::new(3, 1)));
        assert_eq!(at(-1, -1), Some(RowPosition::new(2, 1)));
        assert_eq!(at(0, -2), Some(RowPosition::new(3, 0)));
        // Not behind the latest row
        assert_eq!(at(0, 0), None);
        assert_eq!(at(1, 0), None);
    }

    #[test]
    fn test_wrap_discards_oldest() {
        let (storage, _) = filled(3, 3, 5);
        assert!(storage.has_wrapped());
        assert_eq!(storage.len(), 5);
        assert_eq!(storage.added(), 9);
        assert!(storage.get(3).is_none());
        assert_eq!(storage.get(4).unwrap().position(), RowPosition::new(1, 1));
        assert_eq!(storage.get(8).unwrap().position(), RowPosition::new(2, 2));
        assert!(storage.relative(-1, -1).is_some());
        assert!(storage.relative(0, -2).is_none());
    }

    #[test]
    fn test_connect_latest() {
        let mut storage = RowStorage::new(2, 4).unwrap();
        let mut forest = Forest::<()>::new();
        storage.add(Row::from_intervals(RowPosition::new(0, 0), &[(0, 2)]), &mut forest);
        storage.add(Row::from_intervals(RowPosition::new(1, 0), &[(2, 3)]), &mut forest);
        // Swept, but the runs only meet diagonally
        assert!(storage.connect_latest(-1, 0, Connectivity::Six, &mut forest));
        assert_eq!(forest.live_compositions(), 0);
        assert!(storage.connect_latest(-1, 0, Connectivity::Eighteen, &mut forest));
        assert_eq!(forest.live_compositions(), 1);

        let root = {
            let latest = storage.latest_mut().unwrap();
            forest.find_root(&mut latest.runs_mut()[0])
        };
        assert_ne!(root, Root::Run);
        let first = storage.get_mut(0).unwrap();
        assert_eq!(forest.find_root(&mut first.runs_mut()[0]), root);

        // Nothing three rows back yet
        assert!(!storage.connect_latest(-1, -1, Connectivity::TwentySix, &mut forest));
    }

    #[test]
    fn test_recycling_releases_compositions() {
        let mut storage = RowStorage::new(1, 3).unwrap();
        let mut forest = Forest::<()>::new();
        for z in 0..6 {
            storage.add(Row::from_intervals(RowPosition::new(0, z), &[(0, 1)]), &mut forest);
            storage.connect_latest(0, -1, Connectivity::Six, &mut forest);
        }
        // Only the runs of the three held rows still reference the chain
        assert!(forest.live_compositions() <= 2);
        let root = forest.find_root(&mut storage.latest_mut().unwrap().runs_mut()[0]);
        for seq in 3..6 {
            let row = storage.get_mut(seq).unwrap();
            assert_eq!(forest.find_root(&mut row.runs_mut()[0]), root);
        }
    }
}
