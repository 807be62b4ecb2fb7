//! Price sources.
//!
//! The engine never fetches data itself. A [`PriceSource`] hands it fully
//! loaded inputs; the only implementation shipped here reads JSON files from
//! a directory, one file per instrument.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use corelib::error::{InstrumentFailure, RrgError, RrgResult};
use corelib::models::PriceInput;

#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Load the raw input for one instrument.
    async fn load(&self, instrument: &str) -> RrgResult<PriceInput>;
}

/// Reads `<dir>/<instrument>.json`.
///
/// The file may hold any [`PriceInput`] shape: a bare price array, a list of
/// `{ts_ms, price}` points, or a split-oriented table.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, instrument: &str) -> PathBuf {
        self.dir.join(format!("{instrument}.json"))
    }

    /// Instruments available in the directory (file stems, sorted).
    pub async fn list(&self) -> anyhow::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut out = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                out.push(stem.to_string());
            }
        }

        out.sort();
        Ok(out)
    }
}

#[async_trait::async_trait]
impl PriceSource for JsonDirSource {
    async fn load(&self, instrument: &str) -> RrgResult<PriceInput> {
        let path = self.path_for(instrument);

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| RrgError::Source(format!("{}: {e}", path.display())))?;

        let input = serde_json::from_slice::<PriceInput>(&bytes)
            .map_err(|e| RrgError::Source(format!("{}: {e}", path.display())))?;

        debug!(instrument, path = %path.display(), "loaded price input");
        Ok(input)
    }
}

/// Inputs loaded for one run, plus instruments that could not be loaded.
#[derive(Debug, Default)]
pub struct LoadedUniverse {
    pub inputs: BTreeMap<String, PriceInput>,
    pub failures: Vec<InstrumentFailure>,
}

/// Load `instruments` and `benchmark` concurrently.
///
/// A failed load is recorded per instrument. A benchmark that fails to load is
/// recorded too and left out of `inputs`, so the engine rejects the run with
/// `MissingBenchmark`.
pub async fn load_universe<S>(
    source: Arc<S>,
    instruments: &[String],
    benchmark: &str,
) -> LoadedUniverse
where
    S: PriceSource + 'static,
{
    let mut ids: Vec<String> = instruments.to_vec();
    if !ids.iter().any(|id| id == benchmark) {
        ids.push(benchmark.to_string());
    }

    let mut pending: BTreeSet<String> = ids.iter().cloned().collect();
    let mut set = JoinSet::new();
    for id in ids {
        let src = Arc::clone(&source);
        set.spawn(async move {
            let res = src.load(&id).await;
            (id, res)
        });
    }

    let mut out = LoadedUniverse::default();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((id, Ok(input))) => {
                pending.remove(&id);
                out.inputs.insert(id, input);
            }
            Ok((id, Err(e))) => {
                warn!(instrument = %id, error = %e, "failed to load price input");
                pending.remove(&id);
                out.failures.push(InstrumentFailure::new(id, e));
            }
            Err(e) => {
                warn!(error = %e, "price loading task failed");
            }
        }
    }

    // Tasks that panicked or were cancelled never reported their id.
    for id in pending {
        out.failures.push(InstrumentFailure::new(
            id,
            RrgError::Source("loading task did not complete".into()),
        ));
    }

    // JoinSet yields in completion order.
    out.failures.sort_by(|a, b| a.instrument.cmp(&b.instrument));
    out
}
