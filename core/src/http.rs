//! Response shapes returned by the helpers.
//!
//! # Design
//! `RawResponse` is plain owned data: the body has already been read in full
//! and the connection handed back to the pool. `JsonReply::Full` instead
//! gives the caller the live ureq response so headers and the unread body
//! stay available; dropping it releases the connection.

use serde::de::DeserializeOwned;
use ureq::http::Response;
use ureq::Body;

use crate::error::{ClientError, Result};

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decode the body as JSON, ignoring the status code.
    pub fn json<R: DeserializeOwned>(&self) -> Result<R> {
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::warn!(status = self.status, error = %e, "response body is not the expected json");
            ClientError::Deserialization(e)
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// What `post_json_reply` hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Read the body and return status plus bytes. Sent as
    /// `application/json`.
    Body,
    /// Return the response untouched. Sent as
    /// `application/json; charset=utf-8`.
    Full,
}

impl ReplyMode {
    pub(crate) fn content_type(self) -> &'static str {
        match self {
            ReplyMode::Body => "application/json",
            ReplyMode::Full => "application/json; charset=utf-8",
        }
    }
}

#[derive(Debug)]
pub enum JsonReply {
    Body(RawResponse),
    Full(Response<Body>),
}
