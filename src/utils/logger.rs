use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_FILTER: &str = "demo_relay=info";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        env_filter("demo_relay=debug,info")
    } else {
        env_filter(DEFAULT_FILTER)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

/// One JSON object per event with the event fields at the top level,
/// e.g. `{"level":"INFO","message":"📨 Demo request received","company":"Acme",...}`.
///
/// No timestamp and no span context: CloudWatch stamps every line itself and
/// the handler opens no spans.
pub fn submission_json_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .without_time()
        .with_writer(writer)
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(submission_json_layer(std::io::stdout))
        .init();
}
