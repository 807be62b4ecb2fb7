use serde::{Deserialize, Serialize};

/// Center of both RRG axes.
pub const RRG_CENTER: f64 = 100.0;

/// One point on the rotation graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RrgPoint {
    pub ts_ms: i64,
    pub rs_ratio: f64,
    pub rs_momentum: f64,
}

impl RrgPoint {
    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.rs_ratio, self.rs_momentum)
    }
}

/// RRG region relative to the (100, 100) center.
///
/// Points exactly on an axis belong to the upper / right side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Strong and gaining strength.
    Leading,
    /// Strong but losing momentum.
    Weakening,
    /// Weak and losing momentum.
    Lagging,
    /// Weak but gaining momentum.
    Improving,
}

impl Quadrant {
    pub fn classify(rs_ratio: f64, rs_momentum: f64) -> Self {
        match (rs_ratio >= RRG_CENTER, rs_momentum >= RRG_CENTER) {
            (true, true) => Quadrant::Leading,
            (true, false) => Quadrant::Weakening,
            (false, false) => Quadrant::Lagging,
            (false, true) => Quadrant::Improving,
        }
    }
}

/// Tail of RRG points for one instrument, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RrgSeries {
    pub instrument: String,
    pub points: Vec<RrgPoint>,

    /// Fewer valid points existed than the requested tail length.
    pub truncated: bool,
}

impl RrgSeries {
    pub fn latest(&self) -> Option<&RrgPoint> {
        self.points.last()
    }
}

/// Heading of the most recent movement on the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionVector {
    /// Angle in `[0, 360)`, counter-clockwise from the positive RS-Ratio axis.
    pub angle_degrees: f64,
    pub magnitude: f64,
}

/// Flattened `(instrument, point)` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RrgRow<'a> {
    pub instrument: &'a str,
    pub ts_ms: i64,
    pub rs_ratio: f64,
    pub rs_momentum: f64,
}
