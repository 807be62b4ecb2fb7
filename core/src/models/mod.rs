pub mod price;
pub mod rrg;

pub use price::{IndexKey, PriceFrame, PriceInput, PricePoint, PriceSeries};
pub use rrg::{DirectionVector, Quadrant, RrgPoint, RrgRow, RrgSeries};
