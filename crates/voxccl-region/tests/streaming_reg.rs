//! Streaming labeling regression test
//!
//! Checks the streaming labeler against the in-memory flood fill on
//! synthetic volumes, for every connectivity, and exercises component
//! constraints, metadata accumulation and output statistics.
//!
//! Run with:
//! ```
//! cargo test -p voxccl-region --test streaming_reg
//! ```

use voxccl_core::{Dimensions, NonZero, Threshold, Volume};
use voxccl_io::{MemorySink, MemorySource};
use voxccl_region::{
    BoundingBox, CcaStats, ComponentSummary, Connectivity, OutputMode, StreamingComponents,
    StreamingOptions, VoxelCount, components_of_volume, floodfill_label, label_volume,
};
use voxccl_test::{RegParams, component_sizes, fill_box, random_volume};

const CONNECTIVITIES: [Connectivity; 3] = [
    Connectivity::Six,
    Connectivity::Eighteen,
    Connectivity::TwentySix,
];

fn flag(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

/// Run the labeler into a memory sink, returning the sink for inspection.
fn run_cca(
    volume: &Volume<u8>,
    options: StreamingOptions,
    min_voxels: u64,
) -> (MemorySink<u32>, CcaStats, Vec<(u32, u64)>) {
    let mut completed = Vec::new();
    let mut sink = MemorySink::<u32>::new(volume.dimensions()).expect("sink");
    let stats = StreamingComponents::<VoxelCount>::new(options)
        .with_constraint(|count| count.0 >= min_voxels)
        .on_component_complete(|id, count| completed.push((id, count.0)))
        .cca(&mut MemorySource::new(volume.clone()), &mut sink, &NonZero)
        .expect("cca");
    (sink, stats, completed)
}

#[test]
fn streaming_reg() {
    let mut rp = RegParams::new("streaming");

    // -----------------------------------------------------------
    // Two blocks in a 4x4x2 volume, 6-connected
    // -----------------------------------------------------------
    eprintln!("=== Two blocks ===");
    let dims = Dimensions::new(4, 4, 2);
    let mut volume = Volume::<u8>::new(dims).expect("volume");
    fill_box(&mut volume, (0, 0, 0), (1, 1, 0), 1).expect("fill_box");
    volume.set(3, 3, 1, 1).expect("set");

    let (sink, stats, completed) = run_cca(&volume, StreamingOptions::new(Connectivity::Six), 0);
    let labels = sink.volume();
    rp.compare_values(2.0, stats.num_components as f64, 0.0);
    rp.compare_values(5.0, stats.num_voxels as f64, 0.0);
    rp.compare_values(2.0, completed.len() as f64, 0.0);
    let mut sizes: Vec<u64> = completed.iter().map(|&(_, n)| n).collect();
    sizes.sort_unstable();
    rp.compare_values(1.0, sizes[0] as f64, 0.0);
    rp.compare_values(4.0, sizes[1] as f64, 0.0);

    let block = labels.get(0, 0, 0).unwrap_or(0);
    let single = labels.get(3, 3, 1).unwrap_or(0);
    rp.compare_values(1.0, flag(block >= 1 && single >= 1 && block != single), 0.0);
    for (x, y) in [(1, 0), (0, 1), (1, 1)] {
        rp.compare_values(block as f64, labels.get(x, y, 0).unwrap_or(0) as f64, 0.0);
    }
    rp.compare_values(5.0, labels.count_nonzero() as f64, 0.0);
    let (reference, _) = floodfill_label(&volume, &NonZero, Connectivity::Six).expect("floodfill");
    rp.compare_partitions(&reference, labels);

    // -----------------------------------------------------------
    // Partition of random volumes equals the flood fill's
    // -----------------------------------------------------------
    eprintln!("=== Random volumes ===");
    let shapes = [
        Dimensions::new(9, 7, 6),
        Dimensions::new(16, 3, 5),
        Dimensions::new(2, 11, 8),
    ];
    for (i, &shape) in shapes.iter().enumerate() {
        for (j, density) in [0.1, 0.3, 0.5, 0.7].into_iter().enumerate() {
            let seed = (i * 10 + j) as u64;
            let volume = random_volume(shape, density, seed).expect("random_volume");
            for connectivity in CONNECTIVITIES {
                let options = StreamingOptions::new(connectivity);
                let (labels, stats) =
                    label_volume(&volume, &options, &NonZero).expect("label_volume");
                let (reference, count) =
                    floodfill_label(&volume, &NonZero, connectivity).expect("floodfill");
                eprintln!(
                    "  {} density {} {:?}: {} components",
                    shape, density, connectivity, stats.num_components
                );
                rp.compare_partitions(&reference, &labels);
                rp.compare_values(count as f64, stats.num_components as f64, 0.0);
                rp.compare_values(
                    volume.count_nonzero() as f64,
                    stats.num_voxels as f64,
                    0.0,
                );
            }
        }
    }

    // Both number components in scan order of their first voxel
    let volume = random_volume(Dimensions::new(12, 10, 6), 0.35, 99).expect("random_volume");
    let (labels, _) = label_volume(&volume, &StreamingOptions::default(), &NonZero)
        .expect("label_volume");
    let (reference, _) =
        floodfill_label(&volume, &NonZero, Connectivity::TwentySix).expect("floodfill");
    rp.compare_volumes(&reference, &labels);

    // -----------------------------------------------------------
    // Neighborhood shapes
    // -----------------------------------------------------------
    eprintln!("=== Neighborhoods ===");
    let pair_count = |b: (u32, u32, u32), connectivity: Connectivity| {
        let volume =
            Volume::from_points(Dimensions::new(3, 3, 3), &[(1, 1, 1), b], 1u8).expect("volume");
        label_volume(&volume, &StreamingOptions::new(connectivity), &NonZero)
            .expect("label_volume")
            .1
            .num_components as f64
    };
    // Offsets of the second voxel from the centre, with the component
    // counts expected for 6-, 18- and 26-connectivity
    let cases: [((u32, u32, u32), [f64; 3]); 8] = [
        ((2, 1, 1), [1.0, 1.0, 1.0]),
        ((1, 0, 1), [1.0, 1.0, 1.0]),
        ((1, 1, 0), [1.0, 1.0, 1.0]),
        ((2, 2, 1), [2.0, 1.0, 1.0]),
        ((0, 2, 1), [2.0, 1.0, 1.0]),
        ((1, 2, 0), [2.0, 1.0, 1.0]),
        ((0, 1, 2), [2.0, 1.0, 1.0]),
        ((2, 0, 0), [2.0, 2.0, 1.0]),
    ];
    for (b, expected) in cases {
        for (k, connectivity) in CONNECTIVITIES.into_iter().enumerate() {
            rp.compare_values(expected[k], pair_count(b, connectivity), 0.0);
        }
    }

    // A U shape is one component even though its arms meet only at the end
    let mut u_shape = Volume::<u8>::new(Dimensions::new(5, 2, 6)).expect("volume");
    fill_box(&mut u_shape, (0, 0, 0), (0, 0, 5), 1).expect("fill_box");
    fill_box(&mut u_shape, (4, 0, 0), (4, 0, 5), 1).expect("fill_box");
    fill_box(&mut u_shape, (0, 0, 5), (4, 0, 5), 1).expect("fill_box");
    let (_, stats, completed) = run_cca(&u_shape, StreamingOptions::new(Connectivity::Six), 0);
    rp.compare_values(1.0, stats.num_components as f64, 0.0);
    rp.compare_values(15.0, completed.first().map_or(0, |c| c.1) as f64, 0.0);

    // -----------------------------------------------------------
    // Constraint filtering
    // -----------------------------------------------------------
    eprintln!("=== Constraint ===");
    // A 3x3x3 cube and a 2-voxel rod touching it along an edge only
    let mut blobs = Volume::<u8>::new(Dimensions::new(6, 6, 4)).expect("volume");
    fill_box(&mut blobs, (0, 0, 0), (2, 2, 2), 1).expect("fill_box");
    fill_box(&mut blobs, (3, 3, 0), (3, 3, 1), 1).expect("fill_box");

    let (sink, stats, completed) = run_cca(&blobs, StreamingOptions::new(Connectivity::Six), 5);
    let labels = sink.volume();
    rp.compare_values(1.0, stats.num_components as f64, 0.0);
    rp.compare_values(27.0, stats.num_voxels as f64, 0.0);
    rp.compare_values(1.0, completed.len() as f64, 0.0);
    rp.compare_values(27.0, completed.first().map_or(0, |c| c.1) as f64, 0.0);
    rp.compare_values(0.0, labels.get(3, 3, 0).unwrap_or(9) as f64, 0.0);
    rp.compare_values(0.0, labels.get(3, 3, 1).unwrap_or(9) as f64, 0.0);
    rp.compare_values(1.0, labels.get(2, 2, 2).unwrap_or(0) as f64, 0.0);
    rp.compare_values(1.0, sink.min_max().map_or(-1.0, |m| m.max), 0.0);

    // Joined through the edge the whole shape passes
    let (_, stats, completed) = run_cca(&blobs, StreamingOptions::new(Connectivity::Eighteen), 5);
    rp.compare_values(1.0, stats.num_components as f64, 0.0);
    rp.compare_values(29.0, stats.num_voxels as f64, 0.0);
    rp.compare_values(29.0, completed.first().map_or(0, |c| c.1) as f64, 0.0);

    // Nothing passes
    let (sink, stats, completed) = run_cca(&blobs, StreamingOptions::new(Connectivity::Six), 100);
    rp.compare_values(0.0, stats.num_components as f64, 0.0);
    rp.compare_values(0.0, stats.num_voxels as f64, 0.0);
    rp.compare_values(0.0, completed.len() as f64, 0.0);
    rp.compare_values(0.0, sink.volume().count_nonzero() as f64, 0.0);
    rp.compare_values(0.0, sink.min_max().map_or(-1.0, |m| m.max), 0.0);

    // -----------------------------------------------------------
    // Metadata accumulation
    // -----------------------------------------------------------
    eprintln!("=== Metadata ===");
    let volume = random_volume(Dimensions::new(14, 9, 7), 0.45, 1234).expect("random_volume");
    for connectivity in CONNECTIVITIES {
        let options = StreamingOptions::new(connectivity);
        let counts = components_of_volume::<VoxelCount, _, _>(&volume, &options, &NonZero)
            .expect("components_of_volume");
        let mut sizes: Vec<u64> = counts.iter().map(|(_, c)| c.0).collect();
        sizes.sort_unstable();
        let (reference, _) = floodfill_label(&volume, &NonZero, connectivity).expect("floodfill");
        let expected = component_sizes(&reference);
        rp.compare_values(expected.len() as f64, sizes.len() as f64, 0.0);
        rp.compare_values(1.0, flag(sizes == expected), 0.0);

        // Labels are handed out in increasing order
        let ids: Vec<u32> = counts.iter().map(|&(id, _)| id).collect();
        rp.compare_values(1.0, flag(ids.iter().copied().eq(1..=ids.len() as u32)), 0.0);
    }

    // Bounding boxes and centroids of two known shapes
    let mut shapes = Volume::<u16>::new(Dimensions::new(10, 8, 5)).expect("volume");
    fill_box(&mut shapes, (1, 1, 1), (3, 2, 3), 500).expect("fill_box");
    fill_box(&mut shapes, (7, 5, 0), (8, 7, 0), 800).expect("fill_box");
    let summaries = components_of_volume::<(BoundingBox, ComponentSummary), _, _>(
        &shapes,
        &StreamingOptions::default(),
        &Threshold::new(100.0),
    )
    .expect("components_of_volume");
    rp.compare_values(2.0, summaries.len() as f64, 0.0);
    // The z = 0 shape is seen first
    if let [(_, (box_b, sum_b)), (_, (box_a, sum_a))] = summaries.as_slice() {
        rp.compare_values(1.0, flag(box_a.min == [1, 1, 1] && box_a.max == [3, 2, 3]), 0.0);
        rp.compare_values(1.0, flag(box_b.min == [7, 5, 0] && box_b.max == [8, 7, 0]), 0.0);
        rp.compare_values(1.0, flag(sum_a.bounds == *box_a), 0.0);
        rp.compare_values(18.0, sum_a.voxels as f64, 0.0);
        rp.compare_values(6.0, sum_b.voxels as f64, 0.0);
        let [cx, cy, cz] = sum_a.centroid();
        rp.compare_values(2.0, cx, 1e-9);
        rp.compare_values(1.5, cy, 1e-9);
        rp.compare_values(2.0, cz, 1e-9);
        let [cx, cy, _] = sum_b.centroid();
        rp.compare_values(7.5, cx, 1e-9);
        rp.compare_values(6.0, cy, 1e-9);
    }

    // A threshold below every value makes each voxel foreground
    let (_, stats) = label_volume(&shapes, &StreamingOptions::default(), &Threshold::new(-1.0))
        .expect("label_volume");
    rp.compare_values(1.0, stats.num_components as f64, 0.0);
    rp.compare_values(400.0, stats.num_voxels as f64, 0.0);

    // -----------------------------------------------------------
    // Background and foreground accounting
    // -----------------------------------------------------------
    eprintln!("=== Accounting ===");
    let dims = Dimensions::new(5, 4, 3);
    let full = Volume::from_data(dims, vec![1u8; 60]).expect("volume");
    let (sink, stats, _) = run_cca(&full, StreamingOptions::default(), 0);
    rp.compare_values(60.0, stats.num_voxels as f64, 0.0);
    rp.compare_values(1.0, stats.num_components as f64, 0.0);
    let min_max = sink.min_max().expect("min_max");
    rp.compare_values(1.0, min_max.min, 0.0);
    rp.compare_values(1.0, min_max.max, 0.0);

    let empty = Volume::<u8>::new(dims).expect("volume");
    let (sink, stats, completed) = run_cca(&empty, StreamingOptions::default(), 0);
    rp.compare_values(0.0, stats.num_voxels as f64, 0.0);
    rp.compare_values(0.0, stats.num_components as f64, 0.0);
    rp.compare_values(0.0, completed.len() as f64, 0.0);
    let min_max = sink.min_max().expect("min_max");
    rp.compare_values(0.0, min_max.min, 0.0);
    rp.compare_values(0.0, min_max.max, 0.0);
    rp.compare_values(1.0, flag(sink.is_complete()), 0.0);

    let volume = random_volume(Dimensions::new(8, 8, 4), 0.3, 5).expect("random_volume");
    let (sink, stats, _) = run_cca(&volume, StreamingOptions::new(Connectivity::Six), 0);
    let range = sink.value_range().expect("value_range");
    let min_max = sink.min_max().expect("min_max");
    rp.compare_values(0.0, range.min, 0.0);
    rp.compare_values(stats.num_components as f64, range.max, 0.0);
    rp.compare_values(0.0, min_max.min, 0.0);
    rp.compare_values(stats.num_components as f64, min_max.max, 0.0);

    // -----------------------------------------------------------
    // Determinism and binary output
    // -----------------------------------------------------------
    eprintln!("=== Determinism ===");
    let volume = random_volume(Dimensions::new(10, 10, 10), 0.4, 77).expect("random_volume");
    let options = StreamingOptions::new(Connectivity::Eighteen);
    let (first, first_stats) = label_volume(&volume, &options, &NonZero).expect("label_volume");
    let (second, second_stats) = label_volume(&volume, &options, &NonZero).expect("label_volume");
    rp.compare_partitions(&first, &second);
    rp.compare_values(
        first_stats.num_components as f64,
        second_stats.num_components as f64,
        0.0,
    );

    let binary = options.with_output(OutputMode::Binary);
    let (sink, stats, _) = run_cca(&volume, binary, 0);
    let mask = sink.volume();
    rp.compare_values(first_stats.num_components as f64, stats.num_components as f64, 0.0);
    rp.compare_values(1.0, flag(mask.data().iter().all(|&v| v <= 1)), 0.0);
    rp.compare_values(volume.count_nonzero() as f64, mask.count_nonzero() as f64, 0.0);
    rp.compare_values(1.0, sink.value_range().map_or(-1.0, |r| r.max), 0.0);

    // Binary output of a filtered labeling keeps only accepted components
    let filtered = StreamingOptions::new(Connectivity::Six).with_output(OutputMode::Binary);
    let (sink, stats, _) = run_cca(&blobs, filtered, 5);
    rp.compare_values(27.0, stats.num_voxels as f64, 0.0);
    rp.compare_values(27.0, sink.volume().count_nonzero() as f64, 0.0);

    assert!(rp.cleanup(), "streaming regression test failed");
}
