use serde::Serialize;

use corelib::error::InstrumentFailure;
use corelib::models::{DirectionVector, Quadrant, RrgPoint, RrgRow};
use engine::{RrgReport, direction};

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
struct SeriesView<'a> {
    instrument: &'a str,
    truncated: bool,
    quadrant: Option<Quadrant>,
    direction: Option<DirectionVector>,
    points: &'a [RrgPoint],
}

#[derive(Debug, Serialize)]
struct SeriesOutput<'a> {
    benchmark: &'a str,
    series: Vec<SeriesView<'a>>,
    failures: &'a [InstrumentFailure],
}

#[derive(Debug, Serialize)]
struct RowsOutput<'a> {
    benchmark: &'a str,
    rows: Vec<RrgRow<'a>>,
    failures: &'a [InstrumentFailure],
}

/// Render a report as pretty JSON.
///
/// Both formats carry the failure list, so a caller always sees which
/// instruments are absent and why.
pub fn render(report: &RrgReport, benchmark: &str, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Series => {
            let series = report
                .series
                .values()
                .map(|s| SeriesView {
                    instrument: &s.instrument,
                    truncated: s.truncated,
                    quadrant: s.latest().map(RrgPoint::quadrant),
                    direction: direction(&s.points),
                    points: &s.points,
                })
                .collect();

            serde_json::to_string_pretty(&SeriesOutput {
                benchmark,
                series,
                failures: &report.failures,
            })
        }
        OutputFormat::Rows => serde_json::to_string_pretty(&RowsOutput {
            benchmark,
            rows: report.rows().collect(),
            failures: &report.failures,
        }),
    }
}
