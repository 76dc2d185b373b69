//! In-memory flood fill labeling
//!
//! Breadth-first flood fill over the full voxel grid. It needs the whole
//! volume in memory and is the reference the streaming labeler is checked
//! against.

use crate::connectivity::Connectivity;
use crate::error::RegionResult;
use std::collections::VecDeque;
use voxccl_core::{Foreground, Volume, Voxel};

/// Label the foreground of `volume` by flood fill.
///
/// Components are numbered from 1 in the order their first voxel appears
/// in x-fastest scan order, which matches the order the streaming labeler
/// assigns labels in.
///
/// # Returns
///
/// The label volume and the number of components.
///
/// # Errors
///
/// Returns an error only if the volume's slices cannot be formed.
pub fn floodfill_label<T, F>(
    volume: &Volume<T>,
    classifier: &F,
    connectivity: Connectivity,
) -> RegionResult<(Volume<u32>, u32)>
where
    T: Voxel,
    F: Foreground<T> + ?Sized,
{
    let dims = volume.dimensions();
    let mut foreground = vec![false; dims.voxel_count() as usize];
    for z in 0..dims.z {
        let slice = volume.slice(z)?;
        for y in 0..dims.y {
            for x in 0..dims.x {
                foreground[dims.index(x, y, z)] = classifier.is_foreground(&slice, x, y);
            }
        }
    }

    let offsets = connectivity.neighbor_offsets();
    let mut labels = vec![0u32; foreground.len()];
    let mut next_label = 0u32;
    let mut queue = VecDeque::new();

    for z in 0..dims.z {
        for y in 0..dims.y {
            for x in 0..dims.x {
                let start = dims.index(x, y, z);
                if !foreground[start] || labels[start] != 0 {
                    continue;
                }
                next_label += 1;
                labels[start] = next_label;
                queue.push_back((x, y, z));

                while let Some((cx, cy, cz)) = queue.pop_front() {
                    for &(dx, dy, dz) in &offsets {
                        let (Some(nx), Some(ny), Some(nz)) = (
                            cx.checked_add_signed(dx),
                            cy.checked_add_signed(dy),
                            cz.checked_add_signed(dz),
                        ) else {
                            continue;
                        };
                        if !dims.contains(nx, ny, nz) {
                            continue;
                        }
                        let index = dims.index(nx, ny, nz);
                        if foreground[index] && labels[index] == 0 {
                            labels[index] = next_label;
                            queue.push_back((nx, ny, nz));
                        }
                    }
                }
            }
        }
    }

    Ok((Volume::from_data(dims, labels)?, next_label))
}
