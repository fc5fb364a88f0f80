//! Setup logging subsystem.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use super::config;
use crate::error::ConfigurationError;

/// Crates of this workspace, logged at the configured level.
const WORKSPACE_CRATES: [&str; 5] = [
    "gestpay_cli",
    "connector_integration",
    "external_services",
    "domain_types",
    "gestpay_common_utils",
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Contains guards necessary for logging
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying the logging configuration, service (binary) name, and a
/// list of external crates for which a more verbose logging must be enabled. All crates within the
/// current cargo workspace are automatically considered for verbose logging.
///
/// Logs go to stderr so that command output on stdout stays machine readable.
pub fn setup(
    config: &config::Log,
    service_name: &str,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> Result<TelemetryGuard, ConfigurationError> {
    let mut guards = Vec::new();
    let mut subscriber_layers: Vec<BoxedLayer> = Vec::new();

    if config.console.enabled {
        let level = config.console.level.into_level();
        let console_filter_directive = config
            .console
            .filtering_directive
            .clone()
            .unwrap_or_else(|| {
                get_envfilter_directive(tracing::Level::WARN, level, crates_to_filter.as_ref())
            });
        let console_filter = EnvFilter::builder()
            .with_default_directive(tracing::Level::WARN.into())
            .parse_lossy(console_filter_directive);

        let (console_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        guards.push(guard);

        let console_layer: BoxedLayer = match config.console.log_format {
            config::LogFormat::Default => fmt::layer()
                .with_target(true)
                .with_writer(console_writer)
                .boxed(),
            config::LogFormat::Json => {
                // Disable color or emphasis related ANSI escape codes for JSON formats
                error_stack::Report::set_color_mode(error_stack::fmt::ColorMode::None);

                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(console_writer)
                    .boxed()
            }
        };

        subscriber_layers.push(console_layer.with_filter(console_filter).boxed());
    }

    tracing_subscriber::registry()
        .with(subscriber_layers)
        .try_init()?;

    tracing::info!(
        service_name,
        build_version = crate::version!(),
        "Logging subsystem initialized"
    );

    // Logs are flushed until the guard is dropped
    Ok(TelemetryGuard {
        _log_guards: guards,
    })
}

fn get_envfilter_directive(
    default_log_level: tracing::Level,
    filter_log_level: tracing::Level,
    crates_to_filter: impl AsRef<[&'static str]>,
) -> String {
    let mut explicitly_handled_targets = WORKSPACE_CRATES.to_vec();
    explicitly_handled_targets.extend(crates_to_filter.as_ref());

    // +1 for the default log level added as a directive
    let num_directives = explicitly_handled_targets.len() + 1;

    explicitly_handled_targets
        .into_iter()
        .map(|crate_name| crate_name.replace('-', "_"))
        .zip(std::iter::repeat(filter_log_level))
        .fold(
            {
                let mut directives = Vec::with_capacity(num_directives);
                directives.push(default_log_level.to_string());
                directives
            },
            |mut directives, (target, level)| {
                directives.push(format!("{target}={level}"));
                directives
            },
        )
        .join(",")
}
