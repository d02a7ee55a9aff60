use std::error::Error as StdError;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error fetching reports for tenant {tenant}: {cause}")]
    CatalogFetch { tenant: String, cause: String },

    #[error("Error polling report {report}: {cause}")]
    Poll { report: String, cause: String },
}

impl ProbeError {
    pub fn catalog_fetch(tenant: &str, cause: &ProbeError) -> Self {
        Self::CatalogFetch {
            tenant: tenant.to_string(),
            cause: cause.root_cause(),
        }
    }

    pub fn poll(report: &str, cause: &ProbeError) -> Self {
        Self::Poll {
            report: report.to_string(),
            cause: cause.root_cause(),
        }
    }

    /// Message of the underlying failure, without the variant prefix.
    ///
    /// Transport errors carry their whole `source()` chain, so a timeout
    /// reads as such instead of as the request step it interrupted.
    pub fn root_cause(&self) -> String {
        match self {
            Self::Config(msg) => msg.clone(),
            Self::Network(e) => {
                let message = error_chain(e);
                if e.is_timeout() && !message.contains("timed out") {
                    format!("{message}: operation timed out")
                } else {
                    message
                }
            }
            Self::UnexpectedStatus(status) => status.to_string(),
            Self::Json(e) => e.to_string(),
            Self::CatalogFetch { cause, .. } | Self::Poll { cause, .. } => cause.clone(),
        }
    }
}

/// `err` followed by each of its sources, joined with `": "`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_fetch_display_names_tenant_and_cause() {
        let cause = ProbeError::Config("401 Unauthorized".to_string());
        let err = ProbeError::catalog_fetch("TENANT3", &cause);

        assert_eq!(
            err.to_string(),
            "Error fetching reports for tenant TENANT3: 401 Unauthorized"
        );
    }

    #[derive(Error, Debug)]
    #[error("error decoding response body")]
    struct DecodeError(#[source] std::io::Error);

    #[test]
    fn test_error_chain_walks_sources() {
        let err = DecodeError(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "operation timed out",
        ));

        assert_eq!(
            error_chain(&err),
            "error decoding response body: operation timed out"
        );
    }

    #[test]
    fn test_error_chain_without_source() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");

        assert_eq!(error_chain(&err), "connection reset");
    }

    #[test]
    fn test_unexpected_status_cause() {
        let err = ProbeError::poll(
            "REPORT1",
            &ProbeError::UnexpectedStatus(StatusCode::NO_CONTENT),
        );

        assert_eq!(err.root_cause(), "204 No Content");
    }

    #[test]
    fn test_poll_error_keeps_only_root_cause() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = json_err.to_string();
        let err = ProbeError::poll("REPORT1", &ProbeError::Json(json_err));

        assert_eq!(err.root_cause(), expected);
        assert!(err.to_string().starts_with("Error polling report REPORT1: "));
    }
}
