#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Failed to initialize the logging subsystem: {0}")]
    LoggerError(#[from] tracing_subscriber::util::TryInitError),
}

/// Failures of a CLI command, with the gateway error attached as the cause.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Failed to construct the Gestpay client")]
    ClientSetupFailed,
    #[error("Gestpay request failed")]
    GatewayRequestFailed,
    #[error("Failed to render the command output")]
    OutputRenderingFailed,
}
