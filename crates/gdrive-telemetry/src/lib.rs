//! OpenTelemetry export for gdrive-mcp.
//!
//! Export activates only when built with the `telemetry` feature and the
//! standard OTel environment variables ask for it:
//!
//! ```bash
//! OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 gdrive-mcp
//! ```
//!
//! Set `OTEL_SDK_DISABLED=true` to disable even when the endpoint is set.
//!
//! Span names follow `mcp.<tool>` for tool handlers and
//! `google.<api>.<call>` for remote calls; [`SpanClass`] buckets them for
//! sampling.

#[cfg(feature = "telemetry")]
mod otel;

#[cfg(feature = "telemetry")]
pub use otel::{OtelGuard, TelemetryError, otel_layer};

/// Check whether OTel export should be enabled.
///
/// True when `OTEL_SDK_DISABLED` is not `"true"` and either
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set or `OTEL_TRACES_EXPORTER` is set to
/// something other than `"none"`.
pub fn otel_enabled() -> bool {
    enabled_from(|key| std::env::var(key).ok())
}

fn enabled_from(get: impl Fn(&str) -> Option<String>) -> bool {
    if get("OTEL_SDK_DISABLED").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
        return false;
    }
    if get("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        return true;
    }
    get("OTEL_TRACES_EXPORTER").is_some_and(|e| !e.eq_ignore_ascii_case("none"))
}

/// Sampling bucket for a span name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanClass {
    /// Writes to a remote resource. Always kept.
    Mutation,
    /// Tool handlers, remote reads and token refreshes.
    Read,
    /// Anything unclassified.
    Other,
}

impl SpanClass {
    pub fn of(name: &str) -> Self {
        const MUTATIONS: &[&str] = &[
            "mcp.replace_document_content",
            "mcp.rewrite_slide",
            "mcp.update_spreadsheet",
            "google.sheets.values_update",
        ];
        if MUTATIONS.contains(&name) || (name.starts_with("google.") && name.ends_with(".batch_update")) {
            Self::Mutation
        } else if name.starts_with("mcp.") || name.starts_with("google.") {
            Self::Read
        } else {
            Self::Other
        }
    }

    /// Fraction of root traces sampled.
    pub fn rate(self) -> f64 {
        match self {
            Self::Mutation => 1.0,
            Self::Read => 0.25,
            Self::Other => 0.1,
        }
    }
}
