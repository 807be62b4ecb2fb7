use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use common::logger::LogFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One object per instrument with its tail, quadrant and heading
    Series,
    /// One row per (instrument, point)
    Rows,
}

/// Compute JdK RS-Ratio / RS-Momentum tails for a set of instruments.
///
/// Every value not given on the command line falls back to its `RRG_*`
/// environment variable, then to the built-in default.
#[derive(Debug, Parser)]
#[command(name = "rrg", version)]
pub struct Cli {
    /// Directory holding one `<instrument>.json` price file per instrument
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Benchmark instrument id (file stem)
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Instruments to compute (comma-separated); defaults to every file in the directory
    #[arg(long, value_delimiter = ',')]
    pub instruments: Vec<String>,

    /// EMA span used to smooth relative strength
    #[arg(long, allow_negative_numbers = true)]
    pub smoothing_period: Option<i64>,

    /// Lag of the RS-Momentum rate of change
    #[arg(long, allow_negative_numbers = true)]
    pub roc_period: Option<i64>,

    /// Number of most recent points per instrument
    #[arg(long, allow_negative_numbers = true)]
    pub tail_length: Option<i64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Series)]
    pub format: OutputFormat,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub fn log_format(&self) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}
