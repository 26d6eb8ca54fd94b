use std::path::PathBuf;
use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::SpanExporter;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const SERVICE_NAME: &str = "pagetext";

/// Standard OTLP variable; traces are only exported when it is set
const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

fn get_resource() -> Resource {
    static RESOURCE: OnceLock<Resource> = OnceLock::new();
    RESOURCE
        .get_or_init(|| Resource::builder().with_service_name(SERVICE_NAME).build())
        .clone()
}

fn init_traces() -> anyhow::Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder().with_http().build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(get_resource())
        .build())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// Initialize tracing-subscriber and return OtelGuard for opentelemetry-related
// termination processing
pub fn init_tracing_subscriber(log_dir: Option<PathBuf>) -> anyhow::Result<OtelGuard> {
    let tracer_provider = match std::env::var_os(OTLP_ENDPOINT_ENV) {
        Some(_) => Some(init_traces()?),
        None => None,
    };

    // Exporter internals (reqwest, hyper) must not feed spans back into OTLP
    let otel_layer = match &tracer_provider {
        Some(provider) => {
            let filter = EnvFilter::new("info")
                .add_directive("hyper=off".parse()?)
                .add_directive("h2=off".parse()?)
                .add_directive("reqwest=off".parse()?)
                .add_directive("opentelemetry=off".parse()?);
            Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)).with_filter(filter))
        }
        None => None,
    };

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "pagetext.log");
            let layer = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter());
            Some(layer)
        }
        None => None,
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(OtelGuard { tracer_provider })
}

pub struct OtelGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("{err:?}");
            }
        }
    }
}
