//! Streaming connected component labeling
//!
//! [`StreamingComponents::cca`] labels a volume that is read and written
//! one slice at a time. The merge pass extracts the runs of every row and
//! unites them with the runs of already-built neighbor rows. The labeling
//! pass walks the rows again in scan order, numbers each accepted
//! component on first sight and streams the labeled slices to the sink.
//!
//! Only run endpoints are retained between the passes, never voxels.

use crate::connectivity::Connectivity;
use crate::error::{RegionError, RegionResult};
use crate::forest::Forest;
use crate::metadata::RunMetadata;
use crate::progress::{NoProgress, ProgressReporter, pass_progress};
use crate::row::Row;
use crate::row_storage::RowStorage;
use crate::run::{RowPosition, Run};
use std::fmt;
use tracing::{debug, info, trace};
use voxccl_core::{
    Dimensions, Foreground, Slice, SpatialMetadata, ValueRange, Volume, VolumeSink, VolumeSource,
    Voxel,
};
use voxccl_io::{MemorySink, MemorySource};

/// What the output volume holds for foreground voxels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// The component label, starting at 1
    #[default]
    Labels,
    /// 1 for every voxel of an accepted component
    Binary,
}

/// Options for streaming labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamingOptions {
    /// Voxel connectivity
    pub connectivity: Connectivity,
    /// Output voxel values
    pub output: OutputMode,
}

impl StreamingOptions {
    /// Create new options with the specified connectivity
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            connectivity,
            output: OutputMode::Labels,
        }
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set the output mode
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }
}

/// Totals of one labeling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CcaStats {
    /// Number of accepted components, which is also the largest label
    pub num_components: u32,
    /// Number of voxels written with a non-zero value
    pub num_voxels: u64,
}

type Constraint<'a, M> = Box<dyn Fn(&M) -> bool + 'a>;
type CompletionCallback<'a, M> = Box<dyn FnMut(u32, &M) + 'a>;

/// Two-pass streaming labeler with per-component metadata `M`.
///
/// # Examples
///
/// ```
/// use voxccl_core::{Dimensions, NonZero, Volume};
/// use voxccl_io::{MemorySink, MemorySource};
/// use voxccl_region::{Connectivity, StreamingComponents, StreamingOptions, VoxelCount};
///
/// let dims = Dimensions::new(4, 4, 2);
/// let volume = Volume::from_points(dims, &[(0, 0, 0), (1, 0, 0), (3, 3, 1)], 1u8).unwrap();
///
/// let mut sizes = Vec::new();
/// let stats = StreamingComponents::<VoxelCount>::new(StreamingOptions::new(Connectivity::Six))
///     .on_component_complete(|id, count: &VoxelCount| sizes.push((id, count.0)))
///     .cca(
///         &mut MemorySource::new(volume),
///         &mut MemorySink::<u16>::new(dims).unwrap(),
///         &NonZero,
///     )
///     .unwrap();
///
/// assert_eq!(stats.num_components, 2);
/// assert_eq!(stats.num_voxels, 3);
/// assert_eq!(sizes, vec![(1, 2), (2, 1)]);
/// ```
pub struct StreamingComponents<'a, M: RunMetadata> {
    options: StreamingOptions,
    constraint: Constraint<'a, M>,
    on_complete: CompletionCallback<'a, M>,
    progress: Box<dyn ProgressReporter + 'a>,
}

impl<M: RunMetadata> fmt::Debug for StreamingComponents<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingComponents")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a, M: RunMetadata> StreamingComponents<'a, M> {
    /// A labeler that accepts every component.
    pub fn new(options: StreamingOptions) -> Self {
        Self {
            options,
            constraint: Box::new(|_| true),
            on_complete: Box::new(|_, _| {}),
            progress: Box::new(NoProgress),
        }
    }

    pub fn options(&self) -> &StreamingOptions {
        &self.options
    }

    /// Only label components whose metadata satisfies `constraint`.
    ///
    /// Rejected components stay background in the output.
    pub fn with_constraint(mut self, constraint: impl Fn(&M) -> bool + 'a) -> Self {
        self.constraint = Box::new(constraint);
        self
    }

    /// Call `callback` once per accepted component when its label is
    /// assigned, with the component's final metadata.
    pub fn on_component_complete(mut self, callback: impl FnMut(u32, &M) + 'a) -> Self {
        self.on_complete = Box::new(callback);
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressReporter + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Label the foreground of `source` into `sink`.
    ///
    /// # Arguments
    ///
    /// * `source` - Input volume, read once slice by slice
    /// * `sink` - Output volume of the same size, written in increasing z
    /// * `classifier` - Decides which input voxels are foreground
    ///
    /// # Errors
    ///
    /// Returns `RegionError::DimensionMismatch` or
    /// `RegionError::DegenerateVolume` before any slice is read, and
    /// `RegionError::Core` for a failed slice read or write. Returns
    /// `RegionError::LabelOverflow` in label mode when the components
    /// outnumber the labels the sink's voxel type holds. After a failure
    /// the sink holds only the slices written before it.
    pub fn cca<S, D, F>(
        &mut self,
        source: &mut S,
        sink: &mut D,
        classifier: &F,
    ) -> RegionResult<CcaStats>
    where
        S: VolumeSource,
        D: VolumeSink,
        F: Foreground<S::Voxel> + ?Sized,
    {
        let dims = source.dimensions();
        let output = sink.dimensions();
        if dims != output {
            return Err(RegionError::DimensionMismatch {
                input: dims,
                output,
            });
        }
        if dims.is_degenerate() {
            return Err(RegionError::DegenerateVolume(dims));
        }

        info!(
            dims = %dims,
            connectivity = ?self.options.connectivity,
            output = ?self.options.output,
            "Starting streaming labeling"
        );

        let mut forest = Forest::<M>::new();
        let mut storage = RowStorage::for_volume(dims)?;

        self.merge_pass(source, classifier, &mut forest, &mut storage)?;
        debug!(
            rows = storage.len(),
            compositions = forest.live_compositions(),
            "Merge pass complete"
        );

        let stats = self.label_pass(sink, dims, &mut forest, &mut storage)?;
        debug!(components = stats.num_components, "Labeling pass complete");

        self.write_metadata(source.spatial_metadata(), sink, dims, stats);
        self.progress.set_progress(1.0);

        info!(
            components = stats.num_components,
            voxels = stats.num_voxels,
            "Streaming labeling complete"
        );
        Ok(stats)
    }

    fn merge_pass<S, F>(
        &mut self,
        source: &mut S,
        classifier: &F,
        forest: &mut Forest<M>,
        storage: &mut RowStorage,
    ) -> RegionResult<()>
    where
        S: VolumeSource,
        F: Foreground<S::Voxel> + ?Sized,
    {
        let dims = source.dimensions();
        let connectivity = self.options.connectivity;

        for z in 0..dims.z {
            self.progress.set_progress(pass_progress(0, z, dims.z));
            let slice = source.read_slice(z)?;
            if slice.width() != dims.x || slice.height() != dims.y {
                return Err(voxccl_core::Error::DimensionMismatch {
                    expected: Dimensions::new(dims.x, dims.y, 1),
                    actual: Dimensions::new(slice.width(), slice.height(), 1),
                }
                .into());
            }

            for y in 0..dims.y {
                let row = Row::extract(&slice, RowPosition::new(y, z), classifier);
                storage.add(row, forest);
                for (dy, dz) in backward_neighbors(y, z, dims.y) {
                    storage.connect_latest(dy, dz, connectivity, forest);
                }
            }
            trace!(z, compositions = forest.live_compositions(), "Slice merged");
        }
        Ok(())
    }

    fn label_pass<D: VolumeSink>(
        &mut self,
        sink: &mut D,
        dims: Dimensions,
        forest: &mut Forest<M>,
        storage: &mut RowStorage,
    ) -> RegionResult<CcaStats> {
        debug_assert!(!storage.has_wrapped());
        let rows_per_slice = storage.rows_per_slice();
        let foreground = D::Voxel::from_label(1);
        let max_label = match self.options.output {
            OutputMode::Labels => Some((D::Voxel::MAX_LABEL, D::Voxel::TYPE_NAME)),
            OutputMode::Binary => None,
        };
        let mut counter = 0u32;
        let mut voxels = 0u64;
        let mut out = Slice::<D::Voxel>::new(dims.x, dims.y)?;

        for (z, rows) in storage.rows_mut().chunks_mut(rows_per_slice).enumerate() {
            let z = z as u32;
            self.progress.set_progress(pass_progress(1, z, dims.z));
            out.clear();

            for row in rows.iter_mut() {
                debug_assert_eq!(row.position().z, z);
                let line = out.row_mut(row.position().y);
                for run in row.runs_mut() {
                    let Some(id) = self.resolve_id(forest, run, &mut counter, max_label)? else {
                        continue;
                    };
                    let value = match self.options.output {
                        OutputMode::Labels => D::Voxel::from_label(id),
                        OutputMode::Binary => foreground,
                    };
                    line[run.lower() as usize..run.upper() as usize].fill(value);
                    voxels += run.len() as u64;
                }
            }

            sink.write_slice(&out, z)?;
            trace!(z, components = counter, "Slice labeled");
        }

        Ok(CcaStats {
            num_components: counter,
            num_voxels: voxels,
        })
    }

    /// Label of the component of `run`, or `None` if it is rejected.
    ///
    /// `max_label` bounds new labels by what the output voxel type holds.
    fn resolve_id(
        &mut self,
        forest: &mut Forest<M>,
        run: &mut Run,
        counter: &mut u32,
        max_label: Option<(u32, &'static str)>,
    ) -> RegionResult<Option<u32>> {
        if let Some(id) = forest.id(run) {
            return Ok(Some(id));
        }
        if !(self.constraint)(&*forest.metadata(run)) {
            return Ok(None);
        }
        if let Some((limit, voxel_type)) = max_label.filter(|&(limit, _)| *counter >= limit) {
            return Err(RegionError::LabelOverflow { limit, voxel_type });
        }
        let (id, fresh) = forest.assign_id(run, counter);
        if fresh {
            (self.on_complete)(id, &*forest.metadata(run));
        }
        Ok(Some(id))
    }

    fn write_metadata<D: VolumeSink>(
        &self,
        spatial: SpatialMetadata,
        sink: &mut D,
        dims: Dimensions,
        stats: CcaStats,
    ) {
        sink.set_spatial_metadata(spatial);

        let has_background = stats.num_voxels < dims.voxel_count();
        let max = if stats.num_voxels == 0 {
            0.0
        } else {
            match self.options.output {
                OutputMode::Binary => 1.0,
                OutputMode::Labels => D::Voxel::from_label(stats.num_components).to_f64(),
            }
        };
        let min = if has_background { 0.0 } else { 1.0 };

        sink.set_min_max(ValueRange::new(min, max));
        sink.set_value_range(ValueRange::new(0.0, max));
    }
}

/// Offsets `(dy, dz)` of the already-built rows that row `(y, z)` connects to.
fn backward_neighbors(y: u32, z: u32, rows_per_slice: u32) -> impl Iterator<Item = (i32, i32)> {
    let candidates = [
        ((-1, 0), y > 0),
        ((0, -1), z > 0),
        ((1, -1), z > 0 && y + 1 < rows_per_slice),
        ((-1, -1), z > 0 && y > 0),
    ];
    candidates
        .into_iter()
        .filter_map(|(offset, used)| used.then_some(offset))
}

/// Label an in-memory volume.
///
/// Returns the label volume and the labeling totals.
///
/// # Errors
///
/// Returns `RegionError::DegenerateVolume` if any axis is one voxel or less.
pub fn label_volume<T, F>(
    volume: &Volume<T>,
    options: &StreamingOptions,
    classifier: &F,
) -> RegionResult<(Volume<u32>, CcaStats)>
where
    T: Voxel,
    F: Foreground<T> + ?Sized,
{
    let mut source = MemorySource::new(volume.clone());
    let mut sink = MemorySink::<u32>::new(volume.dimensions())?;
    let stats = StreamingComponents::<()>::new(*options).cca(&mut source, &mut sink, classifier)?;
    Ok((sink.into_volume()?, stats))
}

/// Collect the label and metadata of every component of an in-memory volume.
///
/// Components are listed in label order.
///
/// # Errors
///
/// Returns `RegionError::DegenerateVolume` if any axis is one voxel or less.
pub fn components_of_volume<M, T, F>(
    volume: &Volume<T>,
    options: &StreamingOptions,
    classifier: &F,
) -> RegionResult<Vec<(u32, M)>>
where
    M: RunMetadata,
    T: Voxel,
    F: Foreground<T> + ?Sized,
{
    let mut components = Vec::new();
    let mut source = MemorySource::new(volume.clone());
    let mut sink = MemorySink::<u32>::new(volume.dimensions())?;
    StreamingComponents::<M>::new(*options)
        .on_component_complete(|id, metadata: &M| components.push((id, metadata.clone())))
        .cca(&mut source, &mut sink, classifier)?;
    Ok(components)
}
