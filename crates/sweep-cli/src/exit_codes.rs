//! Process exit codes for `bench-sweep`.

pub const SUCCESS: i32 = 0;
pub const RUNS_FAILED: i32 = 1; // --strict and at least one run did not exit zero
pub const INTERNAL_ERROR: i32 = 2; // Config error, output directory or report could not be written
