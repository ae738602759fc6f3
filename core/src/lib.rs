//! Blocking HTTP convenience helpers.
//!
//! # Overview
//! JSON POST/GET, multipart file uploads, query-string encoding, token URLs
//! and random strings, as thin layers over `ureq`, `serde_json` and `url`.
//!
//! # Design
//! - `HttpClient` wraps a ureq `Agent` configured by `ClientConfig`; the
//!   free functions build a default client per call.
//! - Payloads are any `Serialize`, targets any `DeserializeOwned`.
//! - Status codes are data (`RawResponse::status`), never errors.
//! - Responses and file handles are owned values, so every exit path
//!   releases them.
//! - Errors wrap their cause; see `ClientError`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod query;
pub mod random;

pub use client::{
    get_json, post_form, post_form_by_file, post_json, post_json_reply, post_json_response,
    post_json_with_body, HttpClient,
};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::{JsonReply, RawResponse, ReplyMode};
pub use multipart::{FormBody, FormWriter};
pub use query::{encode_url, get_query, token_api, QueryParams};
pub use random::{random_string, random_string_with};
