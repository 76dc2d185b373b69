//! In-memory volume collaborators
//!
//! [`MemorySource`] serves slices out of a resident [`Volume`] and
//! [`MemorySink`] collects written slices into one. Both can be told to
//! fail at a given slice, which is how the labeling engine's I/O failure
//! handling is exercised.

use voxccl_core::{
    Dimensions, Error, Result, Slice, SpatialMetadata, ValueRange, Volume, VolumeSink,
    VolumeSource, Voxel,
};

/// A [`VolumeSource`] backed by an in-memory volume.
#[derive(Debug, Clone)]
pub struct MemorySource<T> {
    volume: Volume<T>,
    spatial: SpatialMetadata,
    fail_at: Option<u32>,
    slices_read: u32,
}

impl<T: Voxel> MemorySource<T> {
    pub fn new(volume: Volume<T>) -> Self {
        Self {
            volume,
            spatial: SpatialMetadata::default(),
            fail_at: None,
            slices_read: 0,
        }
    }

    /// Set the spatial metadata reported to readers.
    pub fn with_spatial_metadata(mut self, spatial: SpatialMetadata) -> Self {
        self.spatial = spatial;
        self
    }

    /// Make every read of slice `z` fail with an I/O error.
    pub fn fail_at_slice(mut self, z: u32) -> Self {
        self.fail_at = Some(z);
        self
    }

    /// Number of successful slice reads so far.
    pub fn slices_read(&self) -> u32 {
        self.slices_read
    }

    pub fn volume(&self) -> &Volume<T> {
        &self.volume
    }
}

impl<T: Voxel> VolumeSource for MemorySource<T> {
    type Voxel = T;

    fn dimensions(&self) -> Dimensions {
        self.volume.dimensions()
    }

    fn read_slice(&mut self, z: u32) -> Result<Slice<T>> {
        if self.fail_at == Some(z) {
            return Err(Error::Io(std::io::Error::other(format!(
                "simulated read failure at slice {z}"
            ))));
        }
        let slice = self.volume.slice(z)?;
        self.slices_read += 1;
        Ok(slice)
    }

    fn spatial_metadata(&self) -> SpatialMetadata {
        self.spatial
    }
}

/// A [`VolumeSink`] that assembles written slices into an in-memory volume.
///
/// Slices must arrive in increasing z starting at 0. The sink keeps track
/// of how many arrived so a volume from an aborted run is detectable as
/// incomplete.
#[derive(Debug, Clone)]
pub struct MemorySink<T> {
    volume: Volume<T>,
    next_z: u32,
    spatial: Option<SpatialMetadata>,
    value_range: Option<ValueRange>,
    min_max: Option<ValueRange>,
    fail_at: Option<u32>,
}

impl<T: Voxel> MemorySink<T> {
    /// Create a sink for a volume of the given size.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any axis is 0.
    pub fn new(dims: Dimensions) -> Result<Self> {
        Ok(Self {
            volume: Volume::new(dims)?,
            next_z: 0,
            spatial: None,
            value_range: None,
            min_max: None,
            fail_at: None,
        })
    }

    /// Make the write of slice `z` fail with an I/O error.
    pub fn fail_at_slice(mut self, z: u32) -> Self {
        self.fail_at = Some(z);
        self
    }

    /// Number of slices written so far.
    pub fn slices_written(&self) -> u32 {
        self.next_z
    }

    /// Whether every slice has been written.
    pub fn is_complete(&self) -> bool {
        self.next_z == self.volume.dimensions().z
    }

    /// The volume as written so far; missing slices read as zero.
    pub fn volume(&self) -> &Volume<T> {
        &self.volume
    }

    /// Take the finished volume.
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompleteVolume` if trailing slices are missing.
    pub fn into_volume(self) -> Result<Volume<T>> {
        if !self.is_complete() {
            return Err(Error::IncompleteVolume {
                written: self.next_z,
                expected: self.volume.dimensions().z,
            });
        }
        Ok(self.volume)
    }

    pub fn spatial_metadata(&self) -> Option<SpatialMetadata> {
        self.spatial
    }

    pub fn value_range(&self) -> Option<ValueRange> {
        self.value_range
    }

    pub fn min_max(&self) -> Option<ValueRange> {
        self.min_max
    }
}

impl<T: Voxel> VolumeSink for MemorySink<T> {
    type Voxel = T;

    fn dimensions(&self) -> Dimensions {
        self.volume.dimensions()
    }

    fn write_slice(&mut self, slice: &Slice<T>, z: u32) -> Result<()> {
        if z != self.next_z {
            return Err(Error::OutOfOrderSlice {
                expected: self.next_z,
                actual: z,
            });
        }
        if self.fail_at == Some(z) {
            return Err(Error::Io(std::io::Error::other(format!(
                "simulated write failure at slice {z}"
            ))));
        }
        self.volume.set_slice(z, slice)?;
        self.next_z += 1;
        Ok(())
    }

    fn set_spatial_metadata(&mut self, metadata: SpatialMetadata) {
        self.spatial = Some(metadata);
    }

    fn set_value_range(&mut self, range: ValueRange) {
        self.value_range = Some(range);
    }

    fn set_min_max(&mut self, min_max: ValueRange) {
        self.min_max = Some(min_max);
    }
}
