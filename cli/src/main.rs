pub mod cli;
pub mod config;
pub mod output;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{Instrument, field, info};

use common::logger::{TraceId, init_logger, root_span};
use corelib::error::{InstrumentFailure, RrgError, RrgResult};
use engine::{RrgReport, compute_universe};
use market::source::{JsonDirSource, load_universe};

use cli::{Cli, OutputFormat};
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger("rrg", cli.log_format());

    let cfg = AppConfig::from_cli(&cli)?;

    let trace_id = TraceId::default();
    let span = root_span("rrg", &trace_id);
    span.record("benchmark", field::display(&cfg.benchmark));

    let json = run(&cfg, cli.format).instrument(span).await?;
    println!("{json}");

    Ok(())
}

async fn run(cfg: &AppConfig, format: OutputFormat) -> anyhow::Result<String> {
    let source = Arc::new(JsonDirSource::new(&cfg.data_dir));

    let instruments = if cfg.instruments.is_empty() {
        source
            .list()
            .await?
            .into_iter()
            .filter(|id| *id != cfg.benchmark)
            .collect()
    } else {
        cfg.instruments.clone()
    };

    info!(
        data_dir = %cfg.data_dir.display(),
        count = instruments.len(),
        "loading price inputs"
    );

    let loaded = load_universe(source, &instruments, &cfg.benchmark).await;

    let computed = compute_universe(loaded.inputs, &cfg.benchmark, &cfg.params);
    let report = merge_load_failures(computed, loaded.failures, &cfg.benchmark)?;

    Ok(output::render(&report, &cfg.benchmark, format)?)
}

/// Report instruments that never loaded next to those that failed to compute.
///
/// A benchmark that was present on disk but failed to load keeps its load
/// error as context on `MissingBenchmark`.
fn merge_load_failures(
    computed: RrgResult<RrgReport>,
    mut load_failures: Vec<InstrumentFailure>,
    benchmark: &str,
) -> anyhow::Result<RrgReport> {
    match computed {
        Ok(mut report) => {
            report.failures.append(&mut load_failures);
            report
                .failures
                .sort_by(|a, b| a.instrument.cmp(&b.instrument));
            Ok(report)
        }
        Err(RrgError::NoValidInstruments { mut failures }) => {
            failures.append(&mut load_failures);
            failures.sort_by(|a, b| a.instrument.cmp(&b.instrument));
            Err(RrgError::NoValidInstruments { failures }.into())
        }
        Err(e @ RrgError::MissingBenchmark(_)) => {
            match load_failures.iter().find(|f| f.instrument == benchmark) {
                Some(f) => Err(e).with_context(|| format!("loading benchmark failed: {}", f.error)),
                None => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}
