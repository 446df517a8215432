//! Control-plane communication error types

use thiserror::Error;

/// Errors raised while talking to the control-plane org
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("Control plane request failed: {message}")]
    Transport { message: String },

    /// The control plane answered with a non-success status
    #[error("Control plane rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A record create or update was refused
    #[error("Failed to write {object} record: {message}")]
    WriteRejected { object: String, message: String },

    /// The response body did not have the expected shape
    #[error("Unexpected response from {context}: {message}")]
    Decode { context: String, message: String },
}

impl RemoteError {
    /// Create a transport error
    pub fn transport(message: &str) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }

    /// Create a rejected-request error with HTTP status
    pub fn rejected(status: u16, message: &str) -> Self {
        Self::Rejected {
            status,
            message: message.to_string(),
        }
    }

    /// Create a write-rejected error for a record object
    pub fn write_rejected(object: &str, message: impl Into<String>) -> Self {
        Self::WriteRejected {
            object: object.to_string(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(context: &str, message: &str) -> Self {
        Self::Decode {
            context: context.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error() {
        let error = RemoteError::transport("connection reset");
        assert!(error.to_string().contains("connection reset"));
    }

    #[test]
    fn test_rejected_error() {
        let error = RemoteError::rejected(503, "Service unavailable");
        assert!(error.to_string().contains("503"));
        assert!(error.to_string().contains("Service unavailable"));
    }

    #[test]
    fn test_write_rejected_error() {
        let error = RemoteError::write_rejected("PDRI__Connection__c", "FIELD_INTEGRITY_EXCEPTION");
        assert!(error.to_string().contains("PDRI__Connection__c"));
        assert!(error.to_string().contains("FIELD_INTEGRITY_EXCEPTION"));
    }
}
