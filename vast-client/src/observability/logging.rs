use crate::error::{Result, VastError};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a JSON `tracing` subscriber for applications embedding the client.
///
/// `RUST_LOG` wins over `log_level`. When `otlp_endpoint` is set, spans are also
/// exported over OTLP so that the `traceparent` headers sent to the cluster
/// line up with the caller's traces.
pub fn init_tracing(service_name: &str, log_level: &str, otlp_endpoint: Option<&str>) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let telemetry = match otlp_endpoint {
        Some(endpoint) => {
            let tracer = otlp_tracer(service_name, endpoint)?;
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init()
        .map_err(|e| VastError::Telemetry(e.to_string()))
}

fn otlp_tracer(service_name: &str, endpoint: &str) -> Result<sdktrace::Tracer> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
        .map_err(|e| {
            VastError::Telemetry(format!(
                "failed to initialize OTLP tracer for '{}' at '{}': {}",
                service_name, endpoint, e
            ))
        })
}
