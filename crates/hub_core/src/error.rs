use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} is not configured")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} request failed with status {status}")]
    Status { service: String, status: u16 },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Failures of the completion endpoint itself, as opposed to the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("API call failed with status: {0}")]
    Status(u16),

    #[error("Invalid response structure: {0}")]
    Malformed(String),
}

/// Coarse classification used by the views to pick how an error is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    Network,
    Schema,
    Store,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Http(_) | Error::Status { .. } => ErrorKind::Network,
            Error::Gateway(GatewayError::Status(_)) => ErrorKind::Network,
            Error::Gateway(GatewayError::Malformed(_)) => ErrorKind::Schema,
            Error::Schema(_) | Error::Serialization(_) => ErrorKind::Schema,
            Error::Store(_) => ErrorKind::Store,
            Error::Io(_) | Error::External(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status carried by the error, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Gateway(GatewayError::Status(status)) => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn missing(what: &str) -> Self {
        Error::Configuration(what.to_string())
    }
}
