#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,

    #[error("URL encoding of request payload failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,

    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
}

/// Failures surfaced by the Gestpay connector.
///
/// Every variant belongs to exactly one [`ErrorKind`], which is what callers
/// usually branch on.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ConnectorError {
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Failed to execute a processing step")]
    ProcessingStepFailed,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Connector response does not contain the {operation} result node")]
    MissingResultNode { operation: &'static str },
    #[error("{description} (Code: {code})")]
    PaymentFailed {
        description: String,
        code: String,
        /// Best-effort integer reading of `code`, zero when it has none.
        numeric_code: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorKind {
    /// Rejected before anything was sent.
    Validation,
    /// The gateway could not be reached or did not answer in time.
    Transport,
    /// The gateway answered with something that is not the expected XML.
    Parse,
    /// The gateway reported a non-OK transaction result.
    Payment,
}

impl ConnectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRequiredField { .. } | Self::RequestEncodingFailed => {
                ErrorKind::Validation
            }
            Self::ProcessingStepFailed => ErrorKind::Transport,
            Self::ResponseDeserializationFailed | Self::MissingResultNode { .. } => {
                ErrorKind::Parse
            }
            Self::PaymentFailed { .. } => ErrorKind::Payment,
        }
    }
}
