//! JdK RS-Ratio / RS-Momentum engine.
//!
//! Everything in this crate is synchronous, pure and free of shared state:
//! the same inputs always produce bit-identical output, and separate calls may
//! run on separate threads without coordination.

pub mod config;
pub mod direction;
pub mod ema;
pub mod metrics;
pub mod universe;

pub use config::RrgParams;
pub use direction::{JITTER_THRESHOLD, direction};
pub use metrics::compute;
pub use universe::{RrgReport, compute_instrument, compute_universe};
