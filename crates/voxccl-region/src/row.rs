//! Rows of runs
//!
//! A [`Row`] holds the runs of one scanline in increasing x. Rows connect
//! pairwise: [`Row::connect`] sweeps both run lists once and unites every
//! pair of runs the connectivity allows.

use crate::connectivity::Connectivity;
use crate::forest::Forest;
use crate::metadata::RunMetadata;
use crate::run::{RowPosition, Run};
use voxccl_core::{Foreground, Slice, Voxel};

/// Runs of one scanline, sorted and non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    position: RowPosition,
    runs: Vec<Run>,
}

impl Row {
    /// An empty row at `position`.
    pub fn new(position: RowPosition) -> Self {
        Self {
            position,
            runs: Vec::new(),
        }
    }

    /// Extract the runs of row `position.y` of `slice`.
    pub fn extract<T, F>(slice: &Slice<T>, position: RowPosition, classifier: &F) -> Self
    where
        T: Voxel,
        F: Foreground<T> + ?Sized,
    {
        let mut runs = Vec::new();
        let mut start = None;
        let y = position.y;
        for x in 0..slice.width() {
            match (classifier.is_foreground(slice, x, y), start) {
                (true, None) => start = Some(x),
                (false, Some(lower)) => {
                    runs.push(Run::new(position, lower, x));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(lower) = start {
            runs.push(Run::new(position, lower, slice.width()));
        }
        Self { position, runs }
    }

    /// Build a row from `[lower, upper)` intervals.
    ///
    /// Intervals must be non-empty, sorted and separated by at least one
    /// background voxel, as extraction produces them.
    pub fn from_intervals(position: RowPosition, intervals: &[(u32, u32)]) -> Self {
        debug_assert!(intervals.windows(2).all(|w| w[0].1 < w[1].0));
        Self {
            position,
            runs: intervals
                .iter()
                .map(|&(lower, upper)| Run::new(position, lower, upper))
                .collect(),
        }
    }

    pub fn position(&self) -> RowPosition {
        self.position
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn runs_mut(&mut self) -> &mut [Run] {
        &mut self.runs
    }

    /// Number of runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of foreground voxels.
    pub fn voxel_count(&self) -> u64 {
        self.runs.iter().map(|r| r.len() as u64).sum()
    }

    /// Unite the runs of `self` and `other` that touch under `connectivity`.
    ///
    /// `row_distance` is `|dy| + |dz|` between the two rows. Rows too far
    /// apart for the connectivity are left alone; the return value tells
    /// whether the rows were swept at all.
    pub fn connect<M: RunMetadata>(
        &mut self,
        other: &mut Row,
        row_distance: u32,
        connectivity: Connectivity,
        forest: &mut Forest<M>,
    ) -> bool {
        let Some(overlap) = connectivity.row_overlap(row_distance) else {
            return false;
        };

        let (mut i, mut j) = (0, 0);
        while i < self.runs.len() && j < other.runs.len() {
            let a = &mut self.runs[i];
            let b = &mut other.runs[j];
            if overlap.connects(a.lower(), a.upper(), b.lower(), b.upper()) {
                forest.unite(a, b);
            }
            let (a_upper, b_upper) = (a.upper(), b.upper());
            if a_upper <= b_upper {
                i += 1;
            }
            if b_upper <= a_upper {
                j += 1;
            }
        }
        true
    }

    /// Detach every run from the forest and empty the row.
    pub(crate) fn clear<M: RunMetadata>(&mut self, forest: &mut Forest<M>) {
        for run in &mut self.runs {
            forest.release_run(run);
        }
        self.runs.clear();
    }
}
