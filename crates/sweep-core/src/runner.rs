//! Sequential execution of a sweep plan.

use crate::command::BenchCommand;
use crate::config::{ConfigError, SweepConfig};
use crate::launcher::{LaunchOutcome, Launcher};
use crate::output::{ensure_output_dir, DirStatus};
use crate::plan::SweepPlan;
use crate::report::{RunRecord, RunStatus, SweepReport};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Plan and log every command without creating directories or spawning.
    pub dry_run: bool,
}

/// Execute every run instance of `cfg` in plan order, one at a time.
///
/// Child exit statuses are recorded in the report and never stop the sweep.
pub fn run_sweep(
    cfg: &SweepConfig,
    launcher: &dyn Launcher,
    opts: RunOptions,
) -> Result<SweepReport, SweepError> {
    let plan = SweepPlan::from_config(cfg)?;
    let mut report = SweepReport::new(&cfg.dir_name, plan.output_dir.clone(), opts.dry_run);

    if !opts.dry_run {
        let status =
            ensure_output_dir(&plan.output_dir).map_err(|source| SweepError::OutputDir {
                path: plan.output_dir.clone(),
                source,
            })?;
        match status {
            DirStatus::Created => tracing::info!(
                dir = %plan.output_dir.display(),
                "The bench result folder has been created."
            ),
            DirStatus::AlreadyExists => tracing::info!(
                dir = %plan.output_dir.display(),
                "The bench result folder already exists."
            ),
        }
    }

    tracing::info!(sweep = %cfg.dir_name, runs = plan.len(), "starting sweep");

    for run in &plan.runs {
        let command = BenchCommand::for_run(cfg, run);
        let rendered = command.display();
        tracing::debug!(command = %rendered, "benchmark command");
        tracing::info!("The log will be saved in {}", run.log_file.display());

        let mut record = RunRecord {
            batch_size: run.batch_size.clone(),
            input_output_len: run.input_output_len.clone(),
            log_file: run.log_file.clone(),
            command: rendered,
            status: RunStatus::Planned,
            exit_code: None,
            message: None,
            duration_ms: 0,
        };

        if !opts.dry_run {
            let outcome = match launcher.launch(&command, &run.log_file) {
                Ok(outcome) => outcome,
                Err(e) => LaunchOutcome {
                    status: RunStatus::Failed,
                    exit_code: None,
                    message: Some(format!(
                        "cannot open log {}: {}",
                        run.log_file.display(),
                        e
                    )),
                    duration: Duration::ZERO,
                },
            };
            if outcome.status != RunStatus::Succeeded {
                tracing::warn!(
                    batch_size = %run.batch_size,
                    input_output_len = %run.input_output_len,
                    status = ?outcome.status,
                    detail = outcome.message.as_deref().unwrap_or(""),
                    "run did not succeed; see {}",
                    run.log_file.display()
                );
            }
            record.status = outcome.status;
            record.exit_code = outcome.exit_code;
            record.message = outcome.message;
            record.duration_ms = outcome.duration.as_millis() as u64;
        }

        report.add_run(record);
    }

    report.finish();
    tracing::info!(
        total = report.summary.total,
        succeeded = report.summary.succeeded,
        failed = report.summary.failed,
        timed_out = report.summary.timed_out,
        spawn_failed = report.summary.spawn_failed,
        "sweep finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    /// Records every launch and writes a marker into the log instead of spawning.
    #[derive(Default)]
    struct RecordingLauncher {
        calls: RefCell<Vec<(BenchCommand, PathBuf)>>,
        fail_batch: Option<&'static str>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(
            &self,
            command: &BenchCommand,
            log_file: &Path,
        ) -> std::io::Result<LaunchOutcome> {
            std::fs::write(log_file, command.display())?;
            self.calls
                .borrow_mut()
                .push((command.clone(), log_file.to_path_buf()));

            let failing = self
                .fail_batch
                .is_some_and(|b| command.args.windows(2).any(|w| w[0] == "--batch_size" && w[1] == b));
            Ok(LaunchOutcome {
                status: if failing {
                    RunStatus::Failed
                } else {
                    RunStatus::Succeeded
                },
                exit_code: Some(if failing { 1 } else { 0 }),
                message: None,
                duration: Duration::from_millis(1),
            })
        }
    }

    fn config_in(dir: &Path) -> SweepConfig {
        SweepConfig {
            output_dir: Some(dir.join("llama7b_int4_gptq")),
            ..SweepConfig::default()
        }
    }

    #[test]
    fn one_launch_and_one_log_per_pair() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let launcher = RecordingLauncher::default();

        let report = run_sweep(&cfg, &launcher, RunOptions::default()).unwrap();

        assert_eq!(launcher.calls.borrow().len(), 9);
        assert_eq!(report.summary.total, 9);
        assert_eq!(report.summary.succeeded, 9);

        let out = cfg.output_dir();
        let logs = std::fs::read_dir(&out).unwrap().count();
        assert_eq!(logs, 9);
        assert!(out.join("llama7b_int4_gptq_1_128_128.log").is_file());
        assert!(out.join("llama7b_int4_gptq_8_512_512.log").is_file());
    }

    #[test]
    fn failures_do_not_stop_the_sweep() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let launcher = RecordingLauncher {
            fail_batch: Some("4"),
            ..RecordingLauncher::default()
        };

        let report = run_sweep(&cfg, &launcher, RunOptions::default()).unwrap();

        assert_eq!(launcher.calls.borrow().len(), 9);
        assert_eq!(report.summary.failed, 3);
        assert_eq!(report.summary.succeeded, 6);
        assert!(!report.all_succeeded());
        let failed: Vec<_> = report
            .runs
            .iter()
            .filter(|r| r.status == RunStatus::Failed)
            .map(|r| r.batch_size.as_str())
            .collect();
        assert_eq!(failed, vec!["4", "4", "4"]);
    }

    #[test]
    fn rerun_keeps_unrelated_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let out = cfg.output_dir();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("notes.log"), "keep me").unwrap();

        run_sweep(&cfg, &RecordingLauncher::default(), RunOptions::default()).unwrap();
        run_sweep(&cfg, &RecordingLauncher::default(), RunOptions::default()).unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("notes.log")).unwrap(),
            "keep me"
        );
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 10);
    }

    #[test]
    fn unopenable_log_fails_only_that_run() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let out = cfg.output_dir();
        std::fs::create_dir_all(out.join("llama7b_int4_gptq_4_128_512.log")).unwrap();
        let launcher = RecordingLauncher::default();

        let report = run_sweep(&cfg, &launcher, RunOptions::default()).unwrap();

        assert_eq!(launcher.calls.borrow().len(), 8);
        assert_eq!(report.summary.total, 9);
        assert_eq!(report.summary.succeeded, 8);
        assert_eq!(report.summary.failed, 1);

        let blocked = &report.runs[4];
        assert_eq!(blocked.batch_size, "4");
        assert_eq!(blocked.input_output_len, "128,512");
        assert_eq!(blocked.status, RunStatus::Failed);
        assert!(blocked
            .message
            .as_deref()
            .unwrap()
            .starts_with("cannot open log "));
        assert!(out.join("llama7b_int4_gptq_8_512_512.log").is_file());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        let launcher = RecordingLauncher::default();

        let report = run_sweep(&cfg, &launcher, RunOptions { dry_run: true }).unwrap();

        assert!(launcher.calls.borrow().is_empty());
        assert!(!cfg.output_dir().exists());
        assert_eq!(report.summary.planned, 9);
        assert!(report.dry_run);
    }

    #[test]
    fn invalid_config_fails_before_any_side_effect() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SweepConfig {
            batch_sizes: ";".to_string(),
            ..config_in(tmp.path())
        };
        let launcher = RecordingLauncher::default();

        let err = run_sweep(&cfg, &launcher, RunOptions::default()).unwrap_err();

        assert!(matches!(err, SweepError::Config(_)));
        assert!(!cfg.output_dir().exists());
        assert!(launcher.calls.borrow().is_empty());
    }

    #[test]
    fn output_dir_blocked_by_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocked = tmp.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        let cfg = SweepConfig {
            output_dir: Some(blocked),
            ..SweepConfig::default()
        };

        let err = run_sweep(&cfg, &RecordingLauncher::default(), RunOptions::default())
            .unwrap_err();
        assert!(matches!(err, SweepError::OutputDir { .. }));
    }
}
