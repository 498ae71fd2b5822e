use crate::config::LogSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(service_name: &str, settings: &LogSettings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.level));

    let fmt_layer = if settings.json {
        tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .json()
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!(
            "Failed to install tracing subscriber for service '{}': {}",
            service_name, e
        );
        return;
    }

    tracing::debug!(target: "app::startup", service = %service_name, "Tracing initialized");
}
