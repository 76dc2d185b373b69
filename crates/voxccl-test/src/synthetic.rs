//! Synthetic test volumes

use crate::error::{TestError, TestResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxccl_core::{Dimensions, Volume, Voxel};

/// A binary volume whose voxels are foreground (1) with probability
/// `density`, reproducible from `seed`.
///
/// # Errors
///
/// Returns `TestError::InvalidParameter` if `density` is outside `[0, 1]`.
pub fn random_volume(dims: Dimensions, density: f64, seed: u64) -> TestResult<Volume<u8>> {
    if !(0.0..=1.0).contains(&density) {
        return Err(TestError::InvalidParameter(format!(
            "density must be within [0, 1], got {density}"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..dims.voxel_count())
        .map(|_| u8::from(rng.random_bool(density)))
        .collect();
    Ok(Volume::from_data(dims, data)?)
}

/// Set every voxel of the inclusive box `min..=max` to `value`.
///
/// # Errors
///
/// Returns a core error if the box reaches outside the volume.
pub fn fill_box<T: Voxel>(
    volume: &mut Volume<T>,
    min: (u32, u32, u32),
    max: (u32, u32, u32),
    value: T,
) -> TestResult<()> {
    for z in min.2..=max.2 {
        for y in min.1..=max.1 {
            for x in min.0..=max.0 {
                volume.set(x, y, z, value)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_volume_reproducible() {
        let dims = Dimensions::new(8, 6, 4);
        let a = random_volume(dims, 0.3, 7).unwrap();
        let b = random_volume(dims, 0.3, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(random_volume(dims, 0.0, 1).unwrap().count_nonzero(), 0);
        assert_eq!(random_volume(dims, 1.0, 1).unwrap().count_nonzero(), 192);
        assert!(random_volume(dims, 1.5, 1).is_err());
    }

    #[test]
    fn test_fill_box() {
        let mut volume = Volume::<u8>::new(Dimensions::new(4, 4, 4)).unwrap();
        fill_box(&mut volume, (1, 1, 1), (2, 3, 1), 5).unwrap();
        assert_eq!(volume.count_nonzero(), 6);
        assert_eq!(volume.get(2, 3, 1), Some(5));
        assert!(fill_box(&mut volume, (3, 3, 3), (4, 3, 3), 1).is_err());
    }
}
