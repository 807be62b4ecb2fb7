//! Data side of the RRG pipeline.
//!
//! Turns heterogeneous price inputs into canonical [`PriceSeries`] values and
//! aligns an asset with its benchmark. Loading from disk lives behind the
//! [`source::PriceSource`] trait.
//!
//! [`PriceSeries`]: corelib::models::PriceSeries

pub mod align;
pub mod extract;
pub mod source;

pub use align::{AlignedPair, align};
pub use extract::{PRICE_COLUMN_PRIORITY, extract};
