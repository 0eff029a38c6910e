use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;

use common::prelude::{CidError, OptionsError, PathError};

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input detected before any I/O.
    Configuration,
    /// Request construction, send or receive failed.
    Transport,
    /// The remote reported an error, or broke the response shape.
    Protocol,
    /// A streamed record was malformed.
    Decode,
    /// A hash field was not a valid content identifier.
    IdentifierParse,
    /// The caller gave up.
    Cancellation,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid options: {0}")]
    Options(#[from] OptionsError),
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP status {status}: {message}")]
    Remote {
        status: StatusCode,
        message: String,
        code: i64,
    },
    #[error("protocol violation: {0}")]
    Protocol(String),
    #[error("remote reported an unparseable version {raw:?}: {source}")]
    Version {
        raw: String,
        #[source]
        source: semver::Error,
    },
    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Cid(#[from] CidError),
    #[error("operation canceled")]
    Canceled,
}

// Error envelope the remote sends with non-success statuses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteError {
    message: String,
    #[serde(default)]
    code: i64,
}

impl ApiError {
    /// Build an error from a non-success response body, which is either a
    /// JSON error envelope or plain text.
    pub(crate) fn remote(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<RemoteError>(body) {
            Ok(envelope) => ApiError::Remote {
                status,
                message: envelope.message,
                code: envelope.code,
            },
            Err(_) => ApiError::Remote {
                status,
                message: body.trim().to_string(),
                code: 0,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Options(_)
            | ApiError::InvalidPath(_)
            | ApiError::InvalidHeaderName(_)
            | ApiError::InvalidHeader(_) => ErrorKind::Configuration,
            ApiError::Reqwest(_) | ApiError::UrlParse(_) | ApiError::Io(_) => ErrorKind::Transport,
            ApiError::Remote { .. } | ApiError::Protocol(_) | ApiError::Version { .. } => {
                ErrorKind::Protocol
            }
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Cid(_) => ErrorKind::IdentifierParse,
            ApiError::Canceled => ErrorKind::Cancellation,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, ApiError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_json_envelope() {
        let err = ApiError::remote(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"Message":"merkledag: not found","Code":0,"Type":"error"}"#,
        );
        match err {
            ApiError::Remote { status, message, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "merkledag: not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_remote_plain_text() {
        let err = ApiError::remote(StatusCode::NOT_FOUND, "404 page not found\n");
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.to_string(), "HTTP status 404 Not Found: 404 page not found");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ApiError::Canceled.kind(), ErrorKind::Cancellation);
        assert!(ApiError::Canceled.is_canceled());
        assert_eq!(
            ApiError::Protocol("bad".into()).kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            ApiError::from(OptionsError::UnknownHash(1)).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ApiError::from(CidError::Empty).kind(),
            ErrorKind::IdentifierParse
        );
    }
}
