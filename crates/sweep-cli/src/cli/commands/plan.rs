use crate::cli::args::PlanArgs;
use crate::cli::helpers::resolve_config;
use crate::exit_codes::SUCCESS;
use anyhow::Result;
use sweep_core::{BenchCommand, SweepPlan};

pub fn run(args: PlanArgs) -> Result<i32> {
    let cfg = resolve_config(&args.sweep)?;
    let plan = SweepPlan::from_config(&cfg)?;

    for run in &plan.runs {
        let command = BenchCommand::for_run(&cfg, run).display();
        if args.json {
            let line = serde_json::json!({
                "batch_size": run.batch_size,
                "input_output_len": run.input_output_len,
                "log_file": run.log_file,
                "command": command,
            });
            println!("{line}");
        } else {
            println!("{}", run.log_file.display());
            println!("  {command}");
        }
    }
    if !args.json {
        println!("{} runs", plan.len());
    }
    Ok(SUCCESS)
}
