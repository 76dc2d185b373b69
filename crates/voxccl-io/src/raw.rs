//! Raw slice file format
//!
//! A minimal streaming container: a text header, the voxel data slice
//! after slice, and a text trailer holding the metadata that is only known
//! once every slice has been written.
//!
//! ```text
//! \nVoxVolume Version 1\n
//! x = X, y = Y, z = Z, type = T\n
//! <Z slices of X*Y little-endian voxels>
//! \nspacing = SX SY SZ\n
//! offset = OX OY OZ\n
//! transform = M00 M01 ... M33\n
//! range = LO HI\n
//! minmax = LO HI\n
//! ```
//!
//! The trailer is written only by [`RawVolumeWriter::finish`], so the file
//! left behind by an aborted run is rejected by [`RawVolumeReader::open`]
//! as incomplete instead of being read as a plausible volume.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::Path;
use tracing::debug;
use voxccl_core::{
    Dimensions, Slice, SpatialMetadata, ValueRange, Volume, VolumeSink, VolumeSource, Voxel,
};

/// Format version
const RAW_VERSION: i32 = 1;

/// Magic line prefix
const MAGIC: &str = "VoxVolume Version ";

/// Maximum trailer size in bytes
const MAX_TRAILER_SIZE: u64 = 4096;

// ============================================================================
// Reader
// ============================================================================

/// Reads a raw slice file one slice at a time.
#[derive(Debug)]
pub struct RawVolumeReader<T> {
    reader: BufReader<File>,
    dims: Dimensions,
    data_start: u64,
    spatial: SpatialMetadata,
    value_range: ValueRange,
    min_max: ValueRange,
    buf: Vec<u8>,
    _voxel: PhantomData<T>,
}

impl<T: Voxel> RawVolumeReader<T> {
    /// Open a raw slice file and read its header and trailer.
    ///
    /// # Errors
    ///
    /// - `IoError::UnsupportedFormat` if the file holds another voxel type
    /// - `IoError::Incomplete` if slices or the trailer are missing
    /// - `IoError::InvalidData` if the header or trailer is malformed
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        let file = File::open(path.as_ref())?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let (dims, type_name, data_start) = read_header(&mut reader)?;
        if type_name != T::TYPE_NAME {
            return Err(IoError::UnsupportedFormat(format!(
                "file holds {type_name} voxels, requested {}",
                T::TYPE_NAME
            )));
        }

        let slice_bytes = dims.slice_len() as u64 * T::BYTES as u64;
        let data_end = data_start + slice_bytes * dims.z as u64;
        if file_len < data_end {
            return Err(IoError::Incomplete {
                written: ((file_len - data_start) / slice_bytes) as u32,
                expected: dims.z,
            });
        }

        reader.seek(SeekFrom::Start(data_end))?;
        let mut trailer = String::new();
        reader
            .by_ref()
            .take(MAX_TRAILER_SIZE)
            .read_to_string(&mut trailer)
            .map_err(|e| IoError::InvalidData(format!("trailer is not valid UTF-8: {e}")))?;
        if trailer.trim().is_empty() {
            return Err(IoError::Incomplete {
                written: dims.z,
                expected: dims.z,
            });
        }
        let (spatial, value_range, min_max) = parse_trailer(&trailer)?;

        debug!(%dims, voxel = T::TYPE_NAME, "Opened raw volume");

        Ok(Self {
            reader,
            dims,
            data_start,
            spatial,
            value_range,
            min_max,
            buf: vec![0; slice_bytes as usize],
            _voxel: PhantomData,
        })
    }

    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    pub fn min_max(&self) -> ValueRange {
        self.min_max
    }

    fn read_slice_raw(&mut self, z: u32) -> IoResult<Slice<T>> {
        if z >= self.dims.z {
            return Err(IoError::Core(voxccl_core::Error::IndexOutOfBounds {
                index: z as usize,
                len: self.dims.z as usize,
            }));
        }
        let offset = self.data_start + z as u64 * self.buf.len() as u64;
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(&mut self.buf)?;

        let data = self.buf.chunks_exact(T::BYTES).map(T::read_le).collect();
        Ok(Slice::from_data(self.dims.x, self.dims.y, data)?)
    }
}

impl<T: Voxel> VolumeSource for RawVolumeReader<T> {
    type Voxel = T;

    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn read_slice(&mut self, z: u32) -> voxccl_core::Result<Slice<T>> {
        Ok(self.read_slice_raw(z)?)
    }

    fn spatial_metadata(&self) -> SpatialMetadata {
        self.spatial
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Writes a raw slice file one slice at a time, in increasing z.
#[derive(Debug)]
pub struct RawVolumeWriter<T> {
    writer: BufWriter<File>,
    dims: Dimensions,
    next_z: u32,
    spatial: SpatialMetadata,
    value_range: ValueRange,
    min_max: ValueRange,
    buf: Vec<u8>,
    _voxel: PhantomData<T>,
}

impl<T: Voxel> RawVolumeWriter<T> {
    /// Create the file and write its header.
    pub fn create(path: impl AsRef<Path>, dims: Dimensions) -> IoResult<Self> {
        if dims.is_empty() {
            return Err(IoError::Core(voxccl_core::Error::InvalidDimension(dims)));
        }
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "\n{MAGIC}{RAW_VERSION}")?;
        writeln!(
            writer,
            "x = {}, y = {}, z = {}, type = {}",
            dims.x,
            dims.y,
            dims.z,
            T::TYPE_NAME
        )?;

        Ok(Self {
            writer,
            dims,
            next_z: 0,
            spatial: SpatialMetadata::default(),
            value_range: ValueRange::default(),
            min_max: ValueRange::default(),
            buf: Vec::with_capacity(dims.slice_len() * T::BYTES),
            _voxel: PhantomData,
        })
    }

    /// Number of slices written so far.
    pub fn slices_written(&self) -> u32 {
        self.next_z
    }

    /// Write the trailer and flush the file.
    ///
    /// # Errors
    ///
    /// Returns `IoError::Incomplete` if any slice is missing; the file is
    /// then left without a trailer.
    pub fn finish(mut self) -> IoResult<()> {
        if self.next_z != self.dims.z {
            return Err(IoError::Incomplete {
                written: self.next_z,
                expected: self.dims.z,
            });
        }
        let s = &self.spatial;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "spacing = {} {} {}",
            s.spacing[0], s.spacing[1], s.spacing[2]
        )?;
        writeln!(
            self.writer,
            "offset = {} {} {}",
            s.offset[0], s.offset[1], s.offset[2]
        )?;
        let transform: Vec<String> = s
            .physical_to_world
            .iter()
            .flatten()
            .map(|v| v.to_string())
            .collect();
        writeln!(self.writer, "transform = {}", transform.join(" "))?;
        writeln!(
            self.writer,
            "range = {} {}",
            self.value_range.min, self.value_range.max
        )?;
        writeln!(
            self.writer,
            "minmax = {} {}",
            self.min_max.min, self.min_max.max
        )?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_slice_raw(&mut self, slice: &Slice<T>, z: u32) -> IoResult<()> {
        if z != self.next_z {
            return Err(IoError::Core(voxccl_core::Error::OutOfOrderSlice {
                expected: self.next_z,
                actual: z,
            }));
        }
        if slice.width() != self.dims.x || slice.height() != self.dims.y {
            return Err(IoError::Core(voxccl_core::Error::DimensionMismatch {
                expected: self.dims,
                actual: Dimensions::new(slice.width(), slice.height(), self.dims.z),
            }));
        }
        self.buf.clear();
        for &v in slice.data() {
            v.write_le(&mut self.buf);
        }
        self.writer.write_all(&self.buf)?;
        self.next_z += 1;
        Ok(())
    }
}

impl<T: Voxel> VolumeSink for RawVolumeWriter<T> {
    type Voxel = T;

    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn write_slice(&mut self, slice: &Slice<T>, z: u32) -> voxccl_core::Result<()> {
        Ok(self.write_slice_raw(slice, z)?)
    }

    fn set_spatial_metadata(&mut self, metadata: SpatialMetadata) {
        self.spatial = metadata;
    }

    fn set_value_range(&mut self, range: ValueRange) {
        self.value_range = range;
    }

    fn set_min_max(&mut self, min_max: ValueRange) {
        self.min_max = min_max;
    }
}

// ============================================================================
// Whole-volume helpers
// ============================================================================

/// Write an in-memory volume as a complete raw slice file.
pub fn write_volume<T: Voxel>(
    volume: &Volume<T>,
    spatial: &SpatialMetadata,
    path: impl AsRef<Path>,
) -> IoResult<()> {
    let dims = volume.dimensions();
    let mut writer = RawVolumeWriter::<T>::create(path, dims)?;
    for z in 0..dims.z {
        writer.write_slice_raw(&volume.slice(z)?, z)?;
    }
    writer.set_spatial_metadata(*spatial);
    writer.finish()
}

/// Read a complete raw slice file into memory.
pub fn read_volume<T: Voxel>(path: impl AsRef<Path>) -> IoResult<(Volume<T>, SpatialMetadata)> {
    let mut reader = RawVolumeReader::<T>::open(path)?;
    let dims = reader.dimensions();
    let mut volume = Volume::new(dims)?;
    for z in 0..dims.z {
        volume.set_slice(z, &reader.read_slice_raw(z)?)?;
    }
    Ok((volume, reader.spatial))
}

// ============================================================================
// Internal helpers
// ============================================================================

/// Parse the two header lines, returning the offset where voxel data starts.
fn read_header(reader: &mut impl BufRead) -> IoResult<(Dimensions, String, u64)> {
    let mut consumed = 0u64;
    let mut line = String::new();

    // Leading empty line, then the magic line.
    consumed += reader.read_line(&mut line)? as u64;
    if !line.trim().is_empty() {
        return Err(IoError::InvalidData("missing leading newline".to_string()));
    }
    line.clear();
    consumed += reader.read_line(&mut line)? as u64;
    let version: i32 = line
        .trim()
        .strip_prefix(MAGIC)
        .ok_or_else(|| IoError::InvalidData("version line not found".to_string()))?
        .trim()
        .parse()
        .map_err(|e| IoError::InvalidData(format!("failed to parse version: {e}")))?;
    if version != RAW_VERSION {
        return Err(IoError::InvalidData(format!(
            "invalid raw volume version: {version}"
        )));
    }

    line.clear();
    consumed += reader.read_line(&mut line)? as u64;
    let mut x = None;
    let mut y = None;
    let mut z = None;
    let mut type_name = None;
    for field in line.trim().split(", ") {
        let (key, value) = field
            .split_once(" = ")
            .ok_or_else(|| IoError::InvalidData(format!("malformed header field '{field}'")))?;
        match key {
            "x" => x = Some(parse_u32(value)?),
            "y" => y = Some(parse_u32(value)?),
            "z" => z = Some(parse_u32(value)?),
            "type" => type_name = Some(value.to_string()),
            _ => {
                return Err(IoError::InvalidData(format!(
                    "unknown header field '{key}'"
                )));
            }
        }
    }

    match (x, y, z, type_name) {
        (Some(x), Some(y), Some(z), Some(t)) => {
            let dims = Dimensions::new(x, y, z);
            if dims.is_empty() {
                return Err(IoError::Core(voxccl_core::Error::InvalidDimension(dims)));
            }
            Ok((dims, t, consumed))
        }
        _ => Err(IoError::InvalidData(
            "dimension line is missing a field".to_string(),
        )),
    }
}

fn parse_u32(value: &str) -> IoResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|e| IoError::InvalidData(format!("failed to parse '{value}': {e}")))
}

fn parse_floats<const N: usize>(value: &str) -> IoResult<[f64; N]> {
    let parsed: Vec<f64> = value
        .split_whitespace()
        .map(|v| {
            v.parse()
                .map_err(|e| IoError::InvalidData(format!("failed to parse '{v}': {e}")))
        })
        .collect::<IoResult<_>>()?;
    parsed.try_into().map_err(|v: Vec<f64>| {
        IoError::InvalidData(format!("expected {N} values, got {}", v.len()))
    })
}

fn parse_trailer(text: &str) -> IoResult<(SpatialMetadata, ValueRange, ValueRange)> {
    let mut spatial = SpatialMetadata::default();
    let mut value_range = ValueRange::default();
    let mut min_max = ValueRange::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (key, value) = line
            .split_once(" = ")
            .ok_or_else(|| IoError::InvalidData(format!("malformed trailer line '{line}'")))?;
        match key {
            "spacing" => spatial.spacing = parse_floats::<3>(value)?,
            "offset" => spatial.offset = parse_floats::<3>(value)?,
            "transform" => {
                let m = parse_floats::<16>(value)?;
                for (row, chunk) in spatial.physical_to_world.iter_mut().zip(m.chunks_exact(4)) {
                    row.copy_from_slice(chunk);
                }
            }
            "range" => {
                let [min, max] = parse_floats::<2>(value)?;
                value_range = ValueRange::new(min, max);
            }
            "minmax" => {
                let [min, max] = parse_floats::<2>(value)?;
                min_max = ValueRange::new(min, max);
            }
            _ => {
                return Err(IoError::InvalidData(format!(
                    "unknown trailer field '{key}'"
                )));
            }
        }
    }

    Ok((spatial, value_range, min_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trailer() {
        let text = "\nspacing = 0.5 0.5 2\noffset = 1 2 3\nrange = 0 7\nminmax = 1 7\n";
        let (spatial, range, min_max) = parse_trailer(text).unwrap();
        assert_eq!(spatial.spacing, [0.5, 0.5, 2.0]);
        assert_eq!(spatial.offset, [1.0, 2.0, 3.0]);
        assert_eq!(range, ValueRange::new(0.0, 7.0));
        assert_eq!(min_max, ValueRange::new(1.0, 7.0));
    }

    #[test]
    fn test_parse_trailer_rejects_short_list() {
        assert!(parse_trailer("spacing = 1 2\n").is_err());
        assert!(parse_trailer("color = 1\n").is_err());
    }

    #[test]
    fn test_read_header() {
        let data = b"\nVoxVolume Version 1\nx = 4, y = 3, z = 2, type = u16\n\x00\x01";
        let mut reader = std::io::Cursor::new(&data[..]);
        let (dims, type_name, start) = read_header(&mut reader).unwrap();
        assert_eq!(dims, Dimensions::new(4, 3, 2));
        assert_eq!(type_name, "u16");
        assert_eq!(start as usize, data.len() - 2);
    }

    #[test]
    fn test_read_header_bad_version() {
        let data = b"\nVoxVolume Version 9\nx = 4, y = 3, z = 2, type = u16\n";
        let mut reader = std::io::Cursor::new(&data[..]);
        assert!(matches!(
            read_header(&mut reader),
            Err(IoError::InvalidData(_))
        ));
    }
}
