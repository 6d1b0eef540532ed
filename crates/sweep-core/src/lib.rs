pub mod command;
pub mod config;
pub mod launcher;
pub mod output;
pub mod plan;
pub mod report;
pub mod runner;

pub use command::BenchCommand;
pub use config::{ConfigError, SweepConfig};
pub use launcher::{LaunchOutcome, Launcher, ProcessLauncher};
pub use output::{ensure_output_dir, DirStatus};
pub use plan::{log_file_name, RunInstance, SweepPlan};
pub use report::{RunRecord, RunStatus, SweepReport, SweepSummary};
pub use runner::{run_sweep, RunOptions, SweepError};
