//! Error types for the HTTP helpers.
//!
//! # Design
//! Each variant wraps the error that caused it instead of flattening it into
//! a message, so `source()` chains reach the original `url`, `serde_json`,
//! `ureq` or `std::io` failure. Non-2xx statuses are not errors here: the
//! helpers hand status codes back as data and leave interpretation to the
//! caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by every helper in this crate.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The URL string could not be parsed.
    #[error("malformed url {url:?}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body is not JSON or does not fit the target type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request could not be completed: connection refused, timeout,
    /// an invalid request URI, or a failure while reading the body.
    #[error("transport failed: {0}")]
    Transport(#[source] ureq::Error),

    /// Reading the upload source or writing the multipart body failed.
    #[error("i/o failed: {0}")]
    Io(#[source] io::Error),

    /// The local file named for an upload does not exist.
    #[error("file not found: {}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        ClientError::Transport(err)
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        ClientError::Io(err)
    }
}

impl ClientError {
    /// Classify a failure to open a local file.
    pub(crate) fn open_failed(path: PathBuf, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            ClientError::FileNotFound { path, source: err }
        } else {
            ClientError::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn malformed_url_keeps_parse_error_as_source() {
        let err = ClientError::MalformedUrl {
            url: "nope".to_string(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        assert!(err.to_string().starts_with("malformed url \"nope\""));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), url::ParseError::RelativeUrlWithoutBase.to_string());
    }

    #[test]
    fn open_failed_maps_not_found() {
        let err = ClientError::open_failed(
            PathBuf::from("/missing"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ClientError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "file not found: /missing");
    }

    #[test]
    fn open_failed_maps_other_kinds_to_io() {
        let err = ClientError::open_failed(
            PathBuf::from("/secret"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[test]
    fn deserialization_wraps_serde_error() {
        let cause = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = ClientError::Deserialization(cause);
        assert!(err.to_string().starts_with("deserialization failed:"));
        assert!(err.source().is_some());
    }
}
