use super::args::SweepArgs;
use anyhow::Context;
use sweep_core::SweepConfig;

/// Defaults, then the config file, then command-line overrides.
pub fn resolve_config(args: &SweepArgs) -> anyhow::Result<SweepConfig> {
    let mut cfg = match &args.config {
        Some(path) => SweepConfig::from_yaml_file(path)
            .with_context(|| format!("loading sweep config {}", path.display()))?,
        None => SweepConfig::default(),
    };

    if let Some(v) = &args.batch_sizes {
        cfg.batch_sizes = v.clone();
    }
    if !args.input_output_lens.is_empty() {
        cfg.input_output_lens = args.input_output_lens.clone();
    }
    if let Some(v) = &args.output_dir {
        cfg.output_dir = Some(v.clone());
    }
    if let Some(v) = &args.name {
        cfg.dir_name = v.clone();
    }
    if let Some(v) = &args.model {
        cfg.model = v.clone();
    }
    if let Some(v) = &args.engine_dir {
        cfg.engine_dir = v.clone();
    }
    if args.no_cuda_graph {
        cfg.enable_cuda_graph = false;
    }
    if args.timeout_secs.is_some() {
        cfg.timeout_secs = args.timeout_secs;
    }

    cfg.validate().context("invalid sweep config")?;
    Ok(cfg)
}
