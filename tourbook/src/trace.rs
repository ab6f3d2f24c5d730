use std::sync::OnceLock;

use crate::config::{TraceConfig, TraceFormat};
use opentelemetry::trace::TracerProvider;
use opentelemetry::trace::{TraceContextExt, TraceId};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing::Subscriber;
use tracing_appender::{non_blocking::WorkerGuard, rolling::daily};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_TRACER_NAME: &str = "tourbook";

static TRACE_INIT: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

fn new_fmt_layer<S>(
    filter: EnvFilter,
    format: TraceFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match format {
        TraceFormat::Full => {
            fmt::layer().with_writer(writer).with_filter(filter).boxed()
        }
        TraceFormat::Compact => fmt::layer()
            .with_writer(writer)
            .compact()
            .with_filter(filter)
            .boxed(),
        TraceFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .pretty()
            .with_filter(filter)
            .boxed(),
        TraceFormat::Json => {
            fmt::layer().with_writer(writer).json().with_filter(filter).boxed()
        }
    }
}

/// Installs the global subscriber once per process. Later calls are no-ops,
/// which keeps parallel tests from fighting over the global dispatcher.
pub fn init(config: &TraceConfig) -> crate::Result<()> {
    let mut setup_result = Ok(());
    TRACE_INIT.get_or_init(|| {
        let mut guards = Vec::new();
        let mut layers = Vec::new();

        if let Some(console_config) = config.console.as_ref() {
            let (console, console_guard) =
                tracing_appender::non_blocking::NonBlockingBuilder::default()
                    .buffered_lines_limit(console_config.buffer_limit)
                    .lossy(console_config.lossy)
                    .finish(std::io::stdout());
            guards.push(console_guard);

            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&console_config.filter));

            layers.push(new_fmt_layer(filter, console_config.format, console));
        }

        if let Some(file_config) = config.file.as_ref() {
            let (file_writer, file_guard) =
                tracing_appender::non_blocking::NonBlockingBuilder::default()
                    .buffered_lines_limit(file_config.buffer_limit)
                    .lossy(file_config.lossy)
                    .finish(daily(
                        file_config.directory.as_str(),
                        file_config.filename.as_str(),
                    ));
            guards.push(file_guard);

            let filter = EnvFilter::new(&file_config.filter);

            layers.push(new_fmt_layer(filter, file_config.format, file_writer));
        }

        // Spans are never exported; the provider exists so every request
        // span carries a W3C trace id.
        let tracer_name = config
            .otel
            .as_ref()
            .map(|otel| otel.service_name.clone())
            .unwrap_or_else(|| DEFAULT_TRACER_NAME.to_string());
        let otel_provider =
            opentelemetry_sdk::trace::TracerProvider::builder().build();
        opentelemetry::global::set_tracer_provider(otel_provider.clone());
        let telemetry_layer = tracing_opentelemetry::layer()
            .with_tracer(otel_provider.tracer(tracer_name));
        layers.push(telemetry_layer.boxed());

        opentelemetry::global::set_text_map_propagator(
            TraceContextPropagator::new(),
        );

        if let Err(e) = tracing_subscriber::registry().with(layers).try_init() {
            setup_result = Err(anyhow::Error::new(e)
                .context("failed to init tracing")
                .into());
        }
        guards
    });
    setup_result
}

pub fn get_current_trace_id() -> Option<TraceId> {
    let span = tracing::Span::current();
    let context = span.context();
    let span_context = context.span().span_context().clone();

    if span_context.is_valid() {
        Some(span_context.trace_id())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{TraceConsoleConfig, TraceFileConfig};

    use super::*;

    fn default_config() -> TraceConfig {
        TraceConfig {
            console: Some(TraceConsoleConfig {
                filter: "debug".into(),
                format: TraceFormat::Compact,
                buffer_limit: 256_000,
                lossy: true,
            }),
            file: None,
            otel: None,
        }
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        init(&default_config()).expect("first init");
        init(&default_config()).expect("second init is a no-op");

        tracing::debug!(review_id = 7, "debug message");
        tracing::info!(target_kind = "tour", "info message");
    }

    #[tokio::test]
    async fn test_span_has_trace_id() {
        init(&default_config()).expect("init");

        let span = tracing::info_span!("review.create", rating = 5);
        let _enter = span.enter();
        let trace_id = get_current_trace_id().expect("trace id inside span");
        assert_ne!(trace_id, TraceId::INVALID);
        assert_eq!(trace_id.to_string().len(), 32);
    }

    #[tokio::test]
    async fn test_nested_spans_share_trace_id() {
        init(&default_config()).expect("init");

        let root = tracing::info_span!("catalog.remove_target");
        let _root = root.enter();
        let outer = get_current_trace_id();

        let child = tracing::info_span!("images.delete");
        let _child = child.enter();
        assert_eq!(get_current_trace_id(), outer);
    }

    #[tokio::test]
    async fn test_file_layer_config() {
        let config = TraceConfig {
            file: Some(TraceFileConfig {
                filter: "debug".into(),
                directory: "target/test_logs".into(),
                filename: "tourbook.log".into(),
                format: TraceFormat::Json,
                buffer_limit: 256_000,
                lossy: true,
            }),
            ..default_config()
        };

        // only the first init in the process installs layers
        let _ = init(&config);
        tracing::info!("file logging event");
    }
}
