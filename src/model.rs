// Immutable test-result records consumed by the report writer.
//
// Records are snapshots produced upstream (by whatever filtered the full
// run down to the flaky-relevant entries); the writer never mutates or
// reorders them.

/// One test suite plus its cases, in the order they should be serialized.
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    pub full_class_name: Option<String>,
    /// Elapsed wall-clock seconds, non-negative.
    pub time_elapsed: f64,
    pub tests: u32,
    pub errors: u32,
    pub skipped: u32,
    pub failures: u32,
    pub test_cases: Vec<TestCase>,
}

/// One executed test case.
///
/// The `failure_*` fields are only meaningful when `successful` is false;
/// each may independently be absent. `system_out`/`system_error` being
/// `None` or empty both mean "no captured output".
#[derive(Debug, Clone, Default)]
pub struct TestCase {
    pub name: Option<String>,
    pub full_class_name: Option<String>,
    /// Execution time in seconds, non-negative.
    pub time: f64,
    pub successful: bool,
    pub failure_message: Option<String>,
    pub failure_type: Option<String>,
    pub failure_detail: Option<String>,
    pub system_out: Option<String>,
    pub system_error: Option<String>,
}

impl TestCase {
    /// Creates a passed case with no failure data or captured output.
    pub fn passed(name: impl Into<String>, time: f64) -> Self {
        TestCase {
            name: Some(name.into()),
            time,
            successful: true,
            ..TestCase::default()
        }
    }

    /// Creates a failed case; failure details can be filled in afterwards.
    pub fn failed(name: impl Into<String>, time: f64) -> Self {
        TestCase {
            name: Some(name.into()),
            time,
            successful: false,
            ..TestCase::default()
        }
    }
}
