//! Tracing subscriber initialisation.

use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::format::FmtSpan,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{
    ServerConfig,
    logging::{LogFormat, LoggingConfig},
};

use super::{ObservabilityError, settings};

/// Initialize structured logging.
pub(crate) fn init(config: &ServerConfig) -> Result<(), ObservabilityError> {
    settings::apply_runtime_config(config);

    let logging = &config.logging;
    let spans = span_events(logging);

    match logging.log_format {
        LogFormat::Compact => init_with_layer(
            logging,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_span_events(spans),
        ),
        LogFormat::Pretty => init_with_layer(
            logging,
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_span_events(spans),
        ),
        LogFormat::Json => init_with_layer(
            logging,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true)
                .with_span_events(spans),
        ),
    }
}

fn span_events(logging: &LoggingConfig) -> FmtSpan {
    if logging.log_span_timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},h2=warn,hyper=warn,sqlx=warn,reqwest=warn",
            logging.log_level
        ))
    })
}

fn init_with_layer<L>(logging: &LoggingConfig, fmt_layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(logging))
        .try_init()?;

    Ok(())
}
