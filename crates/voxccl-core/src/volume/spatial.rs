//! Spatial and value metadata carried alongside voxel data

/// Placement of a volume in physical and world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMetadata {
    /// Voxel size along x, y and z
    pub spacing: [f64; 3],
    /// Physical position of voxel (0, 0, 0)
    pub offset: [f64; 3],
    /// Row-major physical-to-world transform
    pub physical_to_world: [[f64; 4]; 4],
}

impl Default for SpatialMetadata {
    fn default() -> Self {
        Self {
            spacing: [1.0; 3],
            offset: [0.0; 3],
            physical_to_world: IDENTITY,
        }
    }
}

const IDENTITY: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl SpatialMetadata {
    /// Metadata with the given spacing and offset and an identity transform.
    pub fn new(spacing: [f64; 3], offset: [f64; 3]) -> Self {
        Self {
            spacing,
            offset,
            physical_to_world: IDENTITY,
        }
    }
}

/// Closed interval of voxel values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}
