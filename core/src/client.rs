//! Blocking JSON and multipart request helpers on top of ureq.
//!
//! # Design
//! `HttpClient` holds a ureq `Agent` plus its `ClientConfig`. Clones share
//! the agent's connection pool; nothing else is shared between calls. Every
//! response is an owned value: either its body is read to the end before the
//! helper returns, or it is handed to the caller whole. Dropping it puts the
//! connection back, so no exit path can leak one.
//!
//! All JSON POSTs go through `send_json`. `post_json_reply` exposes the
//! choice between a read body and the full response; `post_json_with_body`
//! and `post_json_response` are the two fixed shapes of it.
//!
//! The free functions at the bottom build a default client for the single
//! call and drop it before returning.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{JsonReply, RawResponse, ReplyMode};
use crate::multipart::FormWriter;

/// Synchronous HTTP helper client. See the module docs.
#[derive(Clone)]
pub struct HttpClient {
    agent: Agent,
    config: ClientConfig,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            agent: config.build_agent(),
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `params` as JSON and decode the response body into `R`.
    ///
    /// The status code is not inspected; an error page that is not JSON
    /// surfaces as `ClientError::Deserialization`.
    pub fn post_json<T, R>(&self, url: &str, params: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.post_json_with_body(url, params)?.json()
    }

    /// GET `url` and decode the response body into `R`.
    pub fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        debug!(url, "GET json");
        let response = self.prepare(self.agent.get(url)).call()?;
        self.read_raw(response)?.json()
    }

    /// POST `params` as `application/json`; return status and body.
    pub fn post_json_with_body<T>(&self, url: &str, params: &T) -> Result<RawResponse>
    where
        T: Serialize + ?Sized,
    {
        let response = self.send_json(url, Some(params), ReplyMode::Body)?;
        self.read_raw(response)
    }

    /// POST `params` as `application/json; charset=utf-8` and return the
    /// response with its body unread. `None` sends an empty body.
    pub fn post_json_response<T>(&self, url: &str, params: Option<&T>) -> Result<Response<Body>>
    where
        T: Serialize + ?Sized,
    {
        self.send_json(url, params, ReplyMode::Full)
    }

    /// POST `params` as JSON, returning whichever shape `mode` asks for.
    pub fn post_json_reply<T>(&self, url: &str, params: Option<&T>, mode: ReplyMode) -> Result<JsonReply>
    where
        T: Serialize + ?Sized,
    {
        let response = self.send_json(url, params, mode)?;
        match mode {
            ReplyMode::Body => Ok(JsonReply::Body(self.read_raw(response)?)),
            ReplyMode::Full => Ok(JsonReply::Full(response)),
        }
    }

    /// Upload the whole of `reader` as file field `field` named `filename`,
    /// then decode the JSON response into `R`.
    pub fn post_form<R: DeserializeOwned>(
        &self,
        url: &str,
        field: &str,
        filename: &str,
        mut reader: impl Read,
    ) -> Result<R> {
        let mut form = FormWriter::new();
        let copied = io::copy(&mut reader, &mut form.create_form_file(field, filename))?;
        let body = form.close();

        debug!(url, field, filename, copied, len = body.bytes.len(), "POST multipart");
        let response = self
            .prepare(self.agent.post(url))
            .content_type(body.content_type.as_str())
            .send(&body.bytes[..])?;
        self.read_raw(response)?.json()
    }

    /// Upload the local file at `path` through [`HttpClient::post_form`].
    ///
    /// The part's filename is the last component of `path`, not the path as
    /// given, so local directory names never reach the server. Callers that
    /// need a different name use `post_form` with an open `File`. Nothing is
    /// sent when the file cannot be opened.
    pub fn post_form_by_file<R: DeserializeOwned>(
        &self,
        url: &str,
        field: &str,
        path: impl AsRef<Path>,
    ) -> Result<R> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClientError::open_failed(path.to_path_buf(), e))?;
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => path.to_string_lossy(),
        };
        self.post_form(url, field, &filename, file)
    }

    fn send_json<T>(&self, url: &str, params: Option<&T>, mode: ReplyMode) -> Result<Response<Body>>
    where
        T: Serialize + ?Sized,
    {
        let body = match params {
            Some(params) => serde_json::to_vec(params).map_err(ClientError::Serialization)?,
            None => Vec::new(),
        };

        debug!(url, len = body.len(), ?mode, "POST json");
        let response = self
            .prepare(self.agent.post(url))
            .content_type(mode.content_type())
            .send(&body[..])?;
        Ok(response)
    }

    fn read_raw(&self, mut response: Response<Body>) -> Result<RawResponse> {
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.config.max_body_size)
            .read_to_vec()?;
        debug!(status, len = body.len(), "response");
        Ok(RawResponse { status, body })
    }

    fn prepare<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        match &self.config.user_agent {
            Some(user_agent) => request.header("user-agent", user_agent.as_str()),
            None => request,
        }
    }
}

/// [`HttpClient::post_json`] with a default client.
pub fn post_json<T, R>(url: &str, params: &T) -> Result<R>
where
    T: Serialize + ?Sized,
    R: DeserializeOwned,
{
    HttpClient::default().post_json(url, params)
}

/// [`HttpClient::get_json`] with a default client.
pub fn get_json<R: DeserializeOwned>(url: &str) -> Result<R> {
    HttpClient::default().get_json(url)
}

/// [`HttpClient::post_json_with_body`] with a default client.
pub fn post_json_with_body<T>(url: &str, params: &T) -> Result<RawResponse>
where
    T: Serialize + ?Sized,
{
    HttpClient::default().post_json_with_body(url, params)
}

/// [`HttpClient::post_json_response`] with a default client.
pub fn post_json_response<T>(url: &str, params: Option<&T>) -> Result<Response<Body>>
where
    T: Serialize + ?Sized,
{
    HttpClient::default().post_json_response(url, params)
}

/// [`HttpClient::post_json_reply`] with a default client.
pub fn post_json_reply<T>(url: &str, params: Option<&T>, mode: ReplyMode) -> Result<JsonReply>
where
    T: Serialize + ?Sized,
{
    HttpClient::default().post_json_reply(url, params, mode)
}

/// [`HttpClient::post_form`] with a default client.
pub fn post_form<R: DeserializeOwned>(
    url: &str,
    field: &str,
    filename: &str,
    reader: impl Read,
) -> Result<R> {
    HttpClient::default().post_form(url, field, filename, reader)
}

/// [`HttpClient::post_form_by_file`] with a default client.
pub fn post_form_by_file<R: DeserializeOwned>(
    url: &str,
    field: &str,
    path: impl AsRef<Path>,
) -> Result<R> {
    HttpClient::default().post_form_by_file(url, field, path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    // Nothing listens on port 1 of loopback.
    const CLOSED: &str = "http://127.0.0.1:1/";

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "source went away"))
        }
    }

    fn client() -> HttpClient {
        HttpClient::new(&ClientConfig::default().with_timeout(Duration::from_secs(5)))
    }

    #[test]
    fn unserializable_payload_fails_before_sending() {
        let mut params = HashMap::new();
        params.insert((1, 2), "tuple keys are not json");
        let err = client().post_json_with_body(CLOSED, &params).unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)), "{err:?}");
    }

    #[test]
    fn connection_refused_is_transport() {
        let err = client()
            .post_json_with_body(CLOSED, &serde_json::json!({"a": 1}))
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
    }

    #[test]
    fn bad_uri_is_transport() {
        let err = client().get_json::<serde_json::Value>("not a url").unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
    }

    #[test]
    fn unreadable_source_is_io() {
        let err = client()
            .post_form::<serde_json::Value>(CLOSED, "file", "x.bin", FailingReader)
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)), "{err:?}");
    }

    #[test]
    fn missing_file_is_not_found_and_sends_nothing() {
        // A sent request would fail with Transport against CLOSED.
        let err = post_form_by_file::<serde_json::Value>(CLOSED, "file", "/nonexistent/path").unwrap_err();
        match err {
            ClientError::FileNotFound { path, .. } => assert_eq!(path, Path::new("/nonexistent/path")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn debug_shows_config() {
        let text = format!("{:?}", client());
        assert!(text.starts_with("HttpClient { config: ClientConfig"), "{text}");
    }
}
