//! Expansion of a [`SweepConfig`] into its ordered run instances.

use crate::config::{ConfigError, SweepConfig};
use std::path::{Path, PathBuf};

/// One point of the sweep and the log file it writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInstance {
    pub batch_size: String,
    pub input_output_len: String,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub output_dir: PathBuf,
    pub runs: Vec<RunInstance>,
}

impl SweepPlan {
    /// Outer axis: input/output lengths. Inner axis: batch sizes.
    pub fn from_config(cfg: &SweepConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let output_dir = cfg.output_dir();
        let batch_sizes = cfg.batch_size_tokens();

        let mut runs = Vec::with_capacity(cfg.input_output_lens.len() * batch_sizes.len());
        for input_output_len in &cfg.input_output_lens {
            for batch_size in &batch_sizes {
                runs.push(RunInstance {
                    batch_size: (*batch_size).to_string(),
                    input_output_len: input_output_len.clone(),
                    log_file: log_file_path(
                        &output_dir,
                        &cfg.dir_name,
                        batch_size,
                        input_output_len,
                    ),
                });
            }
        }
        Ok(Self { output_dir, runs })
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// `<dir_name>_<batch_size>_<input_output_len>.log` with commas turned into underscores.
pub fn log_file_name(dir_name: &str, batch_size: &str, input_output_len: &str) -> String {
    format!(
        "{}_{}_{}.log",
        dir_name,
        batch_size,
        input_output_len.replace(',', "_")
    )
}

pub fn log_file_path(
    output_dir: &Path,
    dir_name: &str,
    batch_size: &str,
    input_output_len: &str,
) -> PathBuf {
    output_dir.join(log_file_name(dir_name, batch_size, input_output_len))
}
