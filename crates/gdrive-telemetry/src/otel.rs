//! Tracing layer and sampler.

use opentelemetry::trace::{
    Link, SamplingDecision, SamplingResult, SpanKind, TraceContextExt, TraceId, TraceState,
    TracerProvider as _,
};
use opentelemetry::{Context, KeyValue, global};
use opentelemetry_otlp::SpanExporter;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{Sampler, SdkTracer, SdkTracerProvider, ShouldSample, SpanLimits};
use tracing_opentelemetry::OpenTelemetryLayer;

use crate::SpanClass;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(String),
}

/// Shuts down the tracer provider on drop, flushing pending spans.
pub struct OtelGuard {
    provider: SdkTracerProvider,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Err(e) = self.provider.shutdown() {
            eprintln!("OTel shutdown error: {e}");
        }
    }
}

/// Build an OpenTelemetry tracing layer and its guard.
///
/// Must be called from inside a Tokio runtime; the batch exporter spawns onto
/// it. Hold the guard for the life of the process.
pub fn otel_layer<S>(
    service_name: &str,
) -> Result<(OpenTelemetryLayer<S, SdkTracer>, OtelGuard), TelemetryError>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    let exporter = SpanExporter::builder()
        .with_tonic()
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(MutationSampler)
        .with_resource(resource)
        .with_span_limits(SpanLimits::default())
        .build();

    global::set_tracer_provider(provider.clone());

    let tracer = provider.tracer("gdrive-mcp");
    let layer = tracing_opentelemetry::layer().with_tracer(tracer);

    Ok((layer, OtelGuard { provider }))
}

/// Keeps every write; samples reads by trace id.
///
/// The decision is made when a span starts, before its outcome is known, so
/// failed reads are kept at the read rate.
#[derive(Debug, Clone)]
struct MutationSampler;

impl ShouldSample for MutationSampler {
    fn should_sample(
        &self,
        parent_context: Option<&Context>,
        trace_id: TraceId,
        name: &str,
        span_kind: &SpanKind,
        attributes: &[KeyValue],
        links: &[Link],
    ) -> SamplingResult {
        if let Some(cx) = parent_context {
            let parent_span = cx.span();
            let parent_ctx = parent_span.span_context();
            if parent_ctx.is_sampled() {
                return SamplingResult {
                    decision: SamplingDecision::RecordAndSample,
                    attributes: vec![],
                    trace_state: parent_ctx.trace_state().clone(),
                };
            }
        }

        let class = SpanClass::of(name);
        if class == SpanClass::Mutation {
            return SamplingResult {
                decision: SamplingDecision::RecordAndSample,
                attributes: vec![],
                trace_state: TraceState::default(),
            };
        }

        Sampler::TraceIdRatioBased(class.rate()).should_sample(
            parent_context,
            trace_id,
            name,
            span_kind,
            attributes,
            links,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(name: &str, trace_id: [u8; 16]) -> SamplingDecision {
        MutationSampler
            .should_sample(None, TraceId::from_bytes(trace_id), name, &SpanKind::Internal, &[], &[])
            .decision
    }

    #[test]
    fn test_mutations_always_sampled() {
        assert_eq!(decide("mcp.rewrite_slide", [0xff; 16]), SamplingDecision::RecordAndSample);
        assert_eq!(decide("google.docs.batch_update", [0xff; 16]), SamplingDecision::RecordAndSample);
    }

    #[test]
    fn test_reads_sampled_by_trace_id() {
        assert_eq!(decide("mcp.get_document", [0xff; 16]), SamplingDecision::Drop);
        assert_eq!(decide("mcp.get_document", [0x00; 16]), SamplingDecision::RecordAndSample);
    }
}
