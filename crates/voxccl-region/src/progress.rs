//! Progress reporting
//!
//! The labeling engine reports a fraction in `[0, 1]` once per slice: the
//! merge pass covers the first half and the labeling pass the second.

/// Receives normalized progress values.
pub trait ProgressReporter {
    fn set_progress(&mut self, progress: f32);
}

impl<F: FnMut(f32)> ProgressReporter for F {
    fn set_progress(&mut self, progress: f32) {
        self(progress)
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn set_progress(&mut self, _progress: f32) {}
}

/// Progress after `done` of `total` slices of the given pass (0 or 1).
pub(crate) fn pass_progress(pass: u32, done: u32, total: u32) -> f32 {
    let within = if total == 0 {
        1.0
    } else {
        done as f32 / total as f32
    };
    (0.5 * pass as f32 + 0.5 * within).clamp(0.0, 1.0)
}
