use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bench-sweep",
    version,
    about = "Run a benchmark program over every batch size × input/output length pair"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute the sweep, one benchmark process per pair
    Run(RunArgs),
    /// Print the planned log files and commands without running anything
    Plan(PlanArgs),
    Version,
}

/// Config file plus per-field overrides shared by `run` and `plan`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SweepArgs {
    /// YAML sweep definition; built-in defaults apply when omitted
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Semicolon-delimited batch sizes, e.g. "1;4;8"
    #[arg(long)]
    pub batch_sizes: Option<String>,

    /// "input,output" length pair; repeat to sweep several
    #[arg(long = "input-output-len")]
    pub input_output_lens: Vec<String>,

    /// Directory for log files (defaults to the sweep name)
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Sweep name used as log file prefix
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub engine_dir: Option<String>,

    /// Do not pass --enable_cuda_graph to the benchmark
    #[arg(long)]
    pub no_cuda_graph: bool,

    /// Kill a benchmark run after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Log commands and log paths without spawning anything
    #[arg(long)]
    pub dry_run: bool,

    /// Path to write machine-readable JSON report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Exit 1 if any run fails, times out or cannot be spawned
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Emit the plan as JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}
