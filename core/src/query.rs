//! URL query helpers.
//!
//! # Design
//! `encode_url` has set semantics: a key given in `params` replaces every
//! value that key already had, keys not mentioned are kept, and the result is
//! re-encoded sorted by key (stable, so untouched repeated keys keep their
//! relative order). Spaces encode as `+` per form-urlencoding.
//!
//! Encoding follows the WHATWG `application/x-www-form-urlencoded` serializer:
//! `*`, `-`, `.` and `_` stay literal and everything else outside
//! `[0-9A-Za-z]` is percent-encoded, `~` included (`%7E`). Callers that sign
//! the exact query string must sign this form.
//!
//! Only query parameters get an alias. Request bodies are any `Serialize`
//! value, so there is no map type for them.

use std::collections::HashMap;

use tracing::trace;
use ureq::http::Request;
use url::{form_urlencoded, Url};

use crate::error::{ClientError, Result};

/// Query parameters to add to a URL. `encode_url` accepts any iterator of
/// string pairs; this is the common owned form.
pub type QueryParams = HashMap<String, String>;

/// Parse `api`, set each pair of `params` on its query and return the new URL.
pub fn encode_url<I, K, V>(api: &str, params: I) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(api).map_err(|source| ClientError::MalformedUrl {
        url: api.to_string(),
        source,
    })?;

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, value) in params {
        let key = key.as_ref();
        pairs.retain(|(k, _)| k != key);
        pairs.push((key.to_string(), value.as_ref().to_string()));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&pairs);
    }
    trace!(%url, "encoded url");
    Ok(url.into())
}

/// `api` with `access_token=token` set on its query.
pub fn token_api(api: &str, token: &str) -> Result<String> {
    encode_url(api, [("access_token", token)])
}

/// First value of `key` in the request's query string, or `""`.
pub fn get_query<B>(request: &Request<B>, key: &str) -> String {
    request
        .uri()
        .query()
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_default()
}
