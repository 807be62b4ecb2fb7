use thiserror::Error;

use corelib::error::{RrgError, RrgResult};

pub const DEFAULT_SMOOTHING_PERIOD: i64 = 10;
pub const DEFAULT_ROC_PERIOD: i64 = 12;
pub const DEFAULT_TAIL_LENGTH: i64 = 5;

pub const ENV_SMOOTHING_PERIOD: &str = "RRG_SMOOTHING_PERIOD";
pub const ENV_ROC_PERIOD: &str = "RRG_ROC_PERIOD";
pub const ENV_TAIL_LENGTH: &str = "RRG_TAIL_LENGTH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}={value:?} is not an integer")]
    NotAnInteger { var: &'static str, value: String },

    #[error(transparent)]
    Invalid(#[from] RrgError),
}

/// Engine parameters.
///
/// Only constructible through [`RrgParams::new`], so every value held here is
/// a positive integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RrgParams {
    /// EMA span applied to relative strength. Typically 5..=30.
    smoothing_period: usize,

    /// Lag of the RS-Momentum rate of change. Typically 5..=30.
    roc_period: usize,

    /// Number of most recent points returned per instrument. Typically 2..=20.
    tail_length: usize,
}

impl RrgParams {
    pub fn new(smoothing_period: i64, roc_period: i64, tail_length: i64) -> RrgResult<Self> {
        Ok(Self {
            smoothing_period: positive("smoothing_period", smoothing_period)?,
            roc_period: positive("roc_period", roc_period)?,
            tail_length: positive("tail_length", tail_length)?,
        })
    }

    /// Read parameters from `RRG_*` environment variables.
    ///
    /// Unset variables fall back to defaults. A set but malformed or
    /// non-positive value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str, default: i64| -> Result<i64, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::NotAnInteger { var, value: raw }),
            }
        };

        Ok(Self::new(
            read(ENV_SMOOTHING_PERIOD, DEFAULT_SMOOTHING_PERIOD)?,
            read(ENV_ROC_PERIOD, DEFAULT_ROC_PERIOD)?,
            read(ENV_TAIL_LENGTH, DEFAULT_TAIL_LENGTH)?,
        )?)
    }

    pub fn smoothing_period(&self) -> usize {
        self.smoothing_period
    }

    pub fn roc_period(&self) -> usize {
        self.roc_period
    }

    pub fn tail_length(&self) -> usize {
        self.tail_length
    }
}

impl Default for RrgParams {
    fn default() -> Self {
        Self {
            smoothing_period: DEFAULT_SMOOTHING_PERIOD as usize,
            roc_period: DEFAULT_ROC_PERIOD as usize,
            tail_length: DEFAULT_TAIL_LENGTH as usize,
        }
    }
}

fn positive(name: &'static str, value: i64) -> RrgResult<usize> {
    if value <= 0 {
        return Err(RrgError::InvalidParameter { name, value });
    }

    usize::try_from(value).map_err(|_| RrgError::InvalidParameter { name, value })
}
