use std::path::PathBuf;

use engine::RrgParams;
use engine::config::{ENV_ROC_PERIOD, ENV_SMOOTHING_PERIOD, ENV_TAIL_LENGTH};

use crate::cli::Cli;

pub const ENV_DATA_DIR: &str = "RRG_DATA_DIR";
pub const ENV_BENCHMARK: &str = "RRG_BENCHMARK";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_BENCHMARK: &str = "^NSEI";

/// Immutable configuration for one run.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Directory with `<instrument>.json` price files.
    pub data_dir: PathBuf,

    /// Benchmark id. Must be loadable from `data_dir`, otherwise the run is
    /// rejected.
    pub benchmark: String,

    /// Instruments to compute. Empty means every file in `data_dir`.
    pub instruments: Vec<String>,

    pub params: RrgParams,
}

impl AppConfig {
    /// Command-line values first, then `RRG_*` environment, then defaults.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        Self::resolve(cli, |var| std::env::var(var).ok())
    }

    pub fn resolve<F>(cli: &Cli, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let benchmark = cli
            .benchmark
            .clone()
            .or_else(|| env(ENV_BENCHMARK))
            .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string());

        let params = RrgParams::from_lookup(|var| {
            let flag = match var {
                ENV_SMOOTHING_PERIOD => cli.smoothing_period,
                ENV_ROC_PERIOD => cli.roc_period,
                ENV_TAIL_LENGTH => cli.tail_length,
                _ => None,
            };
            flag.map(|v| v.to_string()).or_else(|| env(var))
        })?;

        Ok(Self {
            data_dir,
            benchmark,
            instruments: cli.instruments.clone(),
            params,
        })
    }
}
