//! Regression test parameters and operations

use crate::partition::{PartitionMismatch, same_partition};
use voxccl_core::{Volume, Voxel};

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "streaming")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Print mismatching slices
    verbose: bool,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "streaming")
    pub fn new(test_name: &str) -> Self {
        let verbose = std::env::var("REGTEST_VERBOSE").is_ok_and(|v| v == "1");

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            verbose,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Compare two volumes voxel by voxel
    ///
    /// # Returns
    ///
    /// `true` if the volumes are identical, `false` otherwise.
    pub fn compare_volumes<T: Voxel>(&mut self, expected: &Volume<T>, actual: &Volume<T>) -> bool {
        self.index += 1;

        let dims = expected.dimensions();
        if dims != actual.dimensions() {
            let msg = format!(
                "Failure in {}_reg: volume comparison for index {} - dimension mismatch {} vs {}",
                self.test_name,
                self.index,
                dims,
                actual.dimensions()
            );
            self.fail(msg);
            return false;
        }

        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    let e = expected.get(x, y, z);
                    let a = actual.get(x, y, z);
                    if e != a {
                        let msg = format!(
                            "Failure in {}_reg: volume comparison for index {} - voxel mismatch at ({}, {}, {}): {:?} vs {:?}",
                            self.test_name, self.index, x, y, z, e, a
                        );
                        self.fail(msg);
                        self.dump_slice(expected, actual, z);
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Compare two label volumes as partitions
    ///
    /// Labels may be numbered differently; background and the grouping of
    /// voxels into components must agree.
    ///
    /// # Returns
    ///
    /// `true` if both volumes describe the same components, `false` otherwise.
    pub fn compare_partitions(&mut self, expected: &Volume<u32>, actual: &Volume<u32>) -> bool {
        self.index += 1;

        match same_partition(expected, actual) {
            Ok(()) => true,
            Err(mismatch) => {
                let msg = format!(
                    "Failure in {}_reg: partition comparison for index {} - {}",
                    self.test_name, self.index, mismatch
                );
                self.fail(msg);
                match mismatch {
                    PartitionMismatch::Background { at, .. }
                    | PartitionMismatch::Label { at, .. } => {
                        self.dump_slice(expected, actual, at.2)
                    }
                    PartitionMismatch::Dimensions { .. } => {}
                }
                false
            }
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    fn dump_slice<T: Voxel>(&self, expected: &Volume<T>, actual: &Volume<T>, z: u32) {
        if !self.verbose {
            return;
        }
        let dims = expected.dimensions();
        eprintln!("  slice z = {} (expected | actual)", z);
        for y in 0..dims.y {
            let line = |v: &Volume<T>| {
                (0..dims.x)
                    .map(|x| format!("{:?}", v.get(x, y, z).unwrap_or_default()))
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            eprintln!("  {} | {}", line(expected), line(actual));
        }
    }
}
