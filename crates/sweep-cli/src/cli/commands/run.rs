use crate::cli::args::RunArgs;
use crate::cli::helpers::resolve_config;
use crate::exit_codes::{RUNS_FAILED, SUCCESS};
use anyhow::{Context, Result};
use std::time::Duration;
use sweep_core::{run_sweep, ProcessLauncher, RunOptions};

pub fn run(args: RunArgs) -> Result<i32> {
    let cfg = resolve_config(&args.sweep)?;
    let launcher = ProcessLauncher::new(cfg.timeout_secs.map(Duration::from_secs));

    let report = run_sweep(
        &cfg,
        &launcher,
        RunOptions {
            dry_run: args.dry_run,
        },
    )
    .context("sweep could not run")?;

    println!(
        "SUMMARY: total={} succeeded={} failed={} timed_out={} spawn_failed={} planned={}",
        report.summary.total,
        report.summary.succeeded,
        report.summary.failed,
        report.summary.timed_out,
        report.summary.spawn_failed,
        report.summary.planned,
    );

    if let Some(path) = &args.report {
        let json = report.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        println!("Report saved to {}", path.display());
    }

    if args.strict && !report.all_succeeded() {
        eprintln!("Some runs did not succeed; inspect the logs in {}", report.output_dir.display());
        return Ok(RUNS_FAILED);
    }
    Ok(SUCCESS)
}
