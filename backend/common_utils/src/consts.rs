//! Consolidated constants for the Gestpay client

// =============================================================================
// HTTP Headers
// =============================================================================

/// Content type header
pub const CONTENT_TYPE: &str = "Content-Type";
/// Accept header
pub const ACCEPT: &str = "Accept";
/// Content length header
pub const CONTENT_LENGTH: &str = "Content-Length";
/// Header naming the invoked SOAP operation
pub const SOAP_ACTION: &str = "SOAPAction";
/// Media type of every SOAP envelope we send
pub const TEXT_XML_UTF8: &str = "text/xml; charset=utf-8";
/// Media type we accept back
pub const TEXT_XML: &str = "text/xml";

// =============================================================================
// Transport
// =============================================================================

/// Seconds allowed to establish the connection
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Seconds allowed for the whole exchange
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Error Messages and Codes
// =============================================================================

/// No error message string const
pub const NO_ERROR_MESSAGE: &str = "No error message";
/// No error code string const
pub const NO_ERROR_CODE: &str = "No error code";

/// Constant variable for name
pub const NAME: &str = "GESTPAY";

// =============================================================================
// Environment and Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Development,
    Release,
}

impl Env {
    pub const fn current_env() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Release
        }
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Release => "production.toml",
        }
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Release => write!(f, "release"),
        }
    }
}
