//! Benchmark argv construction for a single run.

use crate::config::SweepConfig;
use crate::plan::RunInstance;
use std::process::Command;

/// Argument vector for one benchmark invocation. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl BenchCommand {
    pub fn for_run(cfg: &SweepConfig, run: &RunInstance) -> Self {
        let (program, leading) = match cfg.program.split_first() {
            Some((program, rest)) => (program.clone(), rest.to_vec()),
            None => (String::new(), Vec::new()),
        };

        let mut args = leading;
        args.extend([
            "--model".to_string(),
            cfg.model.clone(),
            "--mode".to_string(),
            cfg.mode.clone(),
            "--batch_size".to_string(),
            run.batch_size.clone(),
            "--input_output_len".to_string(),
            run.input_output_len.clone(),
            "--log_level".to_string(),
            cfg.log_level.clone(),
            "--engine_dir".to_string(),
            cfg.engine_dir.clone(),
        ]);
        if cfg.enable_cuda_graph {
            args.push("--enable_cuda_graph".to_string());
        }

        Self { program, args }
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Single-line rendering with POSIX quoting, for logs and dry runs.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|a| shell_quote(a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./,=:+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
