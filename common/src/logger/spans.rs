use tracing::{Span, field};

use super::TraceId;

/// Root span for one run of the engine over a universe.
///
/// `benchmark` is recorded once the configuration is resolved.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id.as_str(),
        benchmark = field::Empty
    )
}
