use std::io;

use thiserror::Error;

/// Failures raised while talking to the gateway.
///
/// `Timeout` and `Unreachable` describe transport-level conditions that say
/// nothing about the return itself; callers map them to
/// `SubmissionStatus::Error`, never to `Rejected`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("cannot reach {endpoint}: {message}")]
    Unreachable { endpoint: String, message: String },

    #[error("{endpoint} answered HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("SOAP fault from gateway: {0}")]
    Fault(String),

    #[error("gateway refused the transmission (status \"{0}\")")]
    TransmitRefused(String),

    #[error("gateway response could not be interpreted: {0}")]
    MalformedResponse(String),

    #[error("client certificate could not be loaded: {0}")]
    Identity(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("HTTP client could not be built: {0}")]
    ClientBuild(String),
}

impl TransportError {
    /// Transient conditions worth another attempt. Faults, refusals, and
    /// 4xx answers are final: the gateway received and understood the
    /// request.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Timeout { .. } | TransportError::Unreachable { .. } => true,
            TransportError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_connect_failures_are_retryable() {
        let timeout = TransportError::Timeout {
            endpoint: "https://example.test/Transmitter".into(),
        };
        let unreachable = TransportError::Unreachable {
            endpoint: "https://example.test/Transmitter".into(),
            message: "connection refused".into(),
        };
        assert!(timeout.is_retryable());
        assert!(unreachable.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        let bad_gateway = TransportError::HttpStatus {
            endpoint: "e".into(),
            status: 502,
        };
        let forbidden = TransportError::HttpStatus {
            endpoint: "e".into(),
            status: 403,
        };
        assert!(bad_gateway.is_retryable());
        assert!(!forbidden.is_retryable());
    }

    #[test]
    fn gateway_answers_are_final() {
        assert!(!TransportError::Fault("server muddle".into()).is_retryable());
        assert!(!TransportError::TransmitRefused("Rejected".into()).is_retryable());
        assert!(!TransportError::MalformedResponse("empty body".into()).is_retryable());
    }
}
