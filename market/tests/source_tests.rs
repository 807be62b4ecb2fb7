use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use corelib::error::{RrgError, RrgResult};
use corelib::models::PriceInput;
use market::extract;
use market::source::{JsonDirSource, PriceSource, load_universe};

#[derive(Default)]
struct MockSource {
    inputs: HashMap<String, PriceInput>,
}

#[async_trait::async_trait]
impl PriceSource for MockSource {
    async fn load(&self, instrument: &str) -> RrgResult<PriceInput> {
        // simulate I/O latency so tasks complete out of order
        tokio::time::sleep(std::time::Duration::from_millis(instrument.len() as u64)).await;

        self.inputs
            .get(instrument)
            .cloned()
            .ok_or_else(|| RrgError::Source(format!("{instrument}: not found")))
    }
}

fn mock() -> Arc<MockSource> {
    let mut inputs = HashMap::new();
    inputs.insert("^NSEI".to_string(), PriceInput::Raw(vec![100.0, 101.0, 102.0]));
    inputs.insert("IT".to_string(), PriceInput::Raw(vec![10.0, 10.5, 11.0]));
    inputs.insert("Bank".to_string(), PriceInput::Raw(vec![20.0, 19.0, 18.0]));
    Arc::new(MockSource { inputs })
}

/// Fresh scratch directory under the system temp dir.
fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rrg-source-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn loads_instruments_and_benchmark() {
    let ids = vec!["IT".to_string(), "Bank".to_string()];

    let loaded = load_universe(mock(), &ids, "^NSEI").await;

    assert!(loaded.failures.is_empty());
    assert_eq!(
        loaded.inputs.keys().cloned().collect::<Vec<_>>(),
        vec!["Bank", "IT", "^NSEI"]
    );
}

#[tokio::test]
async fn missing_instrument_is_reported_not_dropped() {
    let ids = vec!["IT".to_string(), "Pharma".to_string()];

    let loaded = load_universe(mock(), &ids, "^NSEI").await;

    assert_eq!(loaded.inputs.len(), 2);
    assert_eq!(loaded.failures.len(), 1);
    assert_eq!(loaded.failures[0].instrument, "Pharma");
    assert_eq!(loaded.failures[0].error.kind(), "source");
}

#[tokio::test]
async fn unloadable_benchmark_is_left_out() {
    let ids = vec!["IT".to_string()];

    let loaded = load_universe(mock(), &ids, "^BENCH").await;

    assert!(!loaded.inputs.contains_key("^BENCH"));
    assert_eq!(loaded.failures[0].instrument, "^BENCH");
}

#[tokio::test]
async fn json_dir_source_reads_every_shape() -> anyhow::Result<()> {
    let dir = scratch_dir();

    std::fs::write(dir.join("RAW.json"), "[1.0, 2.0, 3.0]")?;
    std::fs::write(
        dir.join("PTS.json"),
        r#"[{"ts_ms": 10, "price": 1.5}, {"ts_ms": 20, "price": 1.6}]"#,
    )?;
    std::fs::write(
        dir.join("TBL.json"),
        r#"{"columns": ["Open", "Close"], "index": ["2024-01-02", "2024-01-03"],
            "data": [[1.0, 1.1], [1.2, null]]}"#,
    )?;
    std::fs::write(dir.join("notes.txt"), "ignored")?;

    let src = JsonDirSource::new(&dir);

    assert_eq!(src.list().await?, vec!["PTS", "RAW", "TBL"]);

    let raw = extract(src.load("RAW").await?)?;
    assert_eq!(raw.len(), 3);

    let pts = extract(src.load("PTS").await?)?;
    assert_eq!(pts.points()[1].ts_ms, 20);

    let tbl = extract(src.load("TBL").await?)?;
    assert_eq!(tbl.len(), 1);
    assert_eq!(tbl.points()[0].price, 1.1);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn out_of_order_point_file_is_an_invalid_series() -> anyhow::Result<()> {
    let dir = scratch_dir();
    std::fs::write(
        dir.join("UNORD.json"),
        r#"[{"ts_ms": 5, "price": 1.0}, {"ts_ms": 1, "price": 1.1}]"#,
    )?;
    std::fs::write(dir.join("NEG.json"), "[1.0, -2.0]")?;

    let src = JsonDirSource::new(&dir);

    let unordered = extract(src.load("UNORD").await?).unwrap_err();
    assert_eq!(unordered.kind(), "invalid_series");
    assert!(unordered.to_string().contains("strictly increasing"));

    let negative = extract(src.load("NEG").await?).unwrap_err();
    assert_eq!(negative.kind(), "invalid_series");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn malformed_file_is_a_source_error() {
    let dir = scratch_dir();
    std::fs::write(dir.join("BAD.json"), "{ not json").unwrap();

    let src = JsonDirSource::new(&dir);

    assert!(matches!(src.load("BAD").await, Err(RrgError::Source(_))));
    assert!(matches!(src.load("ABSENT").await, Err(RrgError::Source(_))));

    std::fs::remove_dir_all(&dir).unwrap();
}
