//! Structured log helpers emitting a `tags` field plus a JSON payload.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Call initiated to the gateway.
    InitiatedToConnector,
    /// Response received from the gateway.
    IncomingApi,
    /// Outgoing request completed.
    OutgoingApi,
}

#[inline]
pub fn debug_log(action: &str, message: &Value) {
    tracing::debug!(tags = %action, json_value= %message);
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[inline]
pub fn error_log(action: &str, message: &Value) {
    tracing::error!(tags = %action, json_value= %message);
}

#[inline]
pub fn warn_log(action: &str, message: &Value) {
    tracing::warn!(tags = %action, json_value= %message);
}
