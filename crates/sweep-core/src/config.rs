//! Sweep definition: defaults, YAML loading and validation.

use crate::plan::log_file_name;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BATCH_SIZE_DELIMITER: char = ';';

/// Longest file name most filesystems accept, in bytes.
pub const MAX_LOG_FILE_NAME_BYTES: usize = 255;

/// Configuration errors. Raised before any directory or process is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{axis} must contain at least one value")]
    EmptyAxis { axis: &'static str },

    #[error("{axis} contains an empty value")]
    EmptyToken { axis: &'static str },

    #[error("{axis} value {value:?} cannot be used in a log file name")]
    InvalidToken { axis: &'static str, value: String },

    #[error("log file name {name:?} is longer than {max} bytes", max = MAX_LOG_FILE_NAME_BYTES)]
    LogFileNameTooLong { name: String },

    #[error("two runs would write the same log file {name:?}")]
    DuplicateLogFile { name: String },

    #[error("program must name at least one executable")]
    EmptyProgram,

    #[error("dir_name must not be empty")]
    EmptyName,
}

/// One sweep definition. Immutable once the runner starts.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub model: String,
    pub mode: String,
    pub log_level: String,
    pub engine_dir: String,

    /// Sweep name. Prefix of every log file and the default output directory.
    pub dir_name: String,

    /// Appends `--enable_cuda_graph` to every invocation.
    pub enable_cuda_graph: bool,

    /// Semicolon-delimited, e.g. "1;4;8".
    pub batch_sizes: String,

    /// "input,output" pairs, iterated in this order.
    pub input_output_lens: Vec<String>,

    /// Executable and leading arguments of the benchmark program.
    pub program: Vec<String>,

    /// Overrides the output directory (defaults to `dir_name`).
    pub output_dir: Option<PathBuf>,

    /// Kill a run after this many seconds. No limit when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            model: "llama_7b".to_string(),
            mode: "plugin".to_string(),
            log_level: "info".to_string(),
            engine_dir: "../../examples/llama/tmp/llama/7B/trt_engines/int4_GPTQ/1-gpu/"
                .to_string(),
            dir_name: "llama7b_int4_gptq".to_string(),
            enable_cuda_graph: true,
            batch_sizes: "1;4;8".to_string(),
            input_output_lens: vec![
                "128,128".to_string(),
                "128,512".to_string(),
                "512,512".to_string(),
            ],
            program: vec!["python3".to_string(), "benchmark.py".to_string()],
            output_dir: None,
            timeout_secs: None,
        }
    }
}

impl SweepConfig {
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Batch size tokens in declaration order, untrimmed.
    pub fn batch_size_tokens(&self) -> Vec<&str> {
        self.batch_sizes.split(BATCH_SIZE_DELIMITER).collect()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.dir_name))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dir_name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        check_file_name_part("dir_name", &self.dir_name)?;
        if self.program.first().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::EmptyProgram);
        }

        if self.batch_sizes.is_empty() {
            return Err(ConfigError::EmptyAxis {
                axis: "batch_sizes",
            });
        }
        for token in self.batch_size_tokens() {
            if token.trim().is_empty() {
                return Err(ConfigError::EmptyToken {
                    axis: "batch_sizes",
                });
            }
            check_file_name_part("batch_sizes", token)?;
        }

        if self.input_output_lens.is_empty() {
            return Err(ConfigError::EmptyAxis {
                axis: "input_output_lens",
            });
        }
        for len in &self.input_output_lens {
            if len.trim().is_empty() {
                return Err(ConfigError::EmptyToken {
                    axis: "input_output_lens",
                });
            }
            check_file_name_part("input_output_lens", len)?;
        }

        let mut seen = HashSet::new();
        for len in &self.input_output_lens {
            for batch_size in self.batch_size_tokens() {
                let name = log_file_name(&self.dir_name, batch_size, len);
                if name.len() > MAX_LOG_FILE_NAME_BYTES {
                    return Err(ConfigError::LogFileNameTooLong { name });
                }
                if !seen.insert(name.clone()) {
                    return Err(ConfigError::DuplicateLogFile { name });
                }
            }
        }
        Ok(())
    }
}

fn check_file_name_part(axis: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.contains(['/', '\\', '\0']) || value == "." || value == ".." {
        return Err(ConfigError::InvalidToken {
            axis,
            value: value.to_string(),
        });
    }
    Ok(())
}
