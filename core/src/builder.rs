//! Stateless HTTP request construction.
//!
//! # Design
//! `RequestBuilder` holds only per-call options (timeout and method) and
//! carries no state between calls. Each `build_*` method parses the target
//! URL, encodes the body, and returns a complete `HttpRequest` or a
//! `BuildError`. Headers are copied verbatim; nothing is defaulted or merged.
//! The caller executes the actual HTTP round-trip.

use std::time::Duration;

use log::{debug, warn};
use url::Url;

use crate::encoding::encode_pairs;
use crate::error::BuildError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{fields_to_json, Fields, StringMap};

/// Timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How `build_json_or_form` serializes body fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// A JSON object of all fields.
    #[default]
    Json,
    /// `key=value&...` of the string-valued fields only.
    Form,
}

/// Synchronous, stateless request constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBuilder {
    timeout: Duration,
    method: HttpMethod,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            method: HttpMethod::Post,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Method for body-carrying requests. `build_query` always uses GET.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Build a request whose body is `fields` as JSON, or as a form-encoded
    /// string of the string-valued fields.
    pub fn build_json_or_form(
        &self,
        url: &str,
        headers: &StringMap,
        fields: &Fields,
        encoding: BodyEncoding,
    ) -> Result<HttpRequest, BuildError> {
        let result = parse_url(url).and_then(|url| {
            let body = match encoding {
                BodyEncoding::Json => encode_json(fields)?,
                BodyEncoding::Form => encode_form(fields),
            };
            Ok(self.assemble(url, self.method, headers, Some(body)))
        });
        log_outcome("build_json_or_form", url, result)
    }

    pub fn build_json(
        &self,
        url: &str,
        headers: &StringMap,
        fields: &Fields,
    ) -> Result<HttpRequest, BuildError> {
        self.build_json_or_form(url, headers, fields, BodyEncoding::Json)
    }

    pub fn build_form(
        &self,
        url: &str,
        headers: &StringMap,
        fields: &Fields,
    ) -> Result<HttpRequest, BuildError> {
        self.build_json_or_form(url, headers, fields, BodyEncoding::Form)
    }

    /// Build a request whose body is the UTF-8 bytes of `body`.
    pub fn build_string_body(
        &self,
        url: &str,
        headers: &StringMap,
        body: &str,
    ) -> Result<HttpRequest, BuildError> {
        let result = parse_url(url)
            .map(|url| self.assemble(url, self.method, headers, Some(body.as_bytes().to_vec())));
        log_outcome("build_string_body", url, result)
    }

    /// Like `build_string_body`, for text that arrives as raw bytes. Fails
    /// with `BuildError::Encoding` if the bytes are not valid UTF-8.
    pub fn build_string_body_from_bytes(
        &self,
        url: &str,
        headers: &StringMap,
        body: &[u8],
    ) -> Result<HttpRequest, BuildError> {
        match std::str::from_utf8(body) {
            Ok(text) => self.build_string_body(url, headers, text),
            Err(e) => log_outcome(
                "build_string_body",
                url,
                Err(BuildError::Encoding(format!("body is not valid UTF-8: {e}"))),
            ),
        }
    }

    /// Build a GET request with `parameters` as the URL's query, replacing
    /// any query already present. An empty map clears the query.
    pub fn build_query(
        &self,
        url: &str,
        headers: &StringMap,
        parameters: &StringMap,
    ) -> Result<HttpRequest, BuildError> {
        let result = parse_url(url).and_then(|mut url| {
            if url.cannot_be_a_base() {
                return Err(BuildError::UrlConstruction(format!(
                    "cannot attach a query to `{url}`"
                )));
            }
            if parameters.is_empty() {
                url.set_query(None);
            } else {
                let query = encode_pairs(parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                url.set_query(Some(&query));
            }
            Ok(self.assemble(url, HttpMethod::Get, headers, None))
        });
        log_outcome("build_query", url, result)
    }

    fn assemble(
        &self,
        url: Url,
        method: HttpMethod,
        headers: &StringMap,
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        HttpRequest::new(url, method, headers, body, self.timeout)
    }
}

fn parse_url(url: &str) -> Result<Url, BuildError> {
    Ok(Url::parse(url)?)
}

fn encode_json(fields: &Fields) -> Result<Vec<u8>, BuildError> {
    let value = fields_to_json(fields)?;
    serde_json::to_vec(&value).map_err(|e| BuildError::Encoding(e.to_string()))
}

/// Non-string fields are dropped.
fn encode_form(fields: &Fields) -> Vec<u8> {
    encode_pairs(
        fields
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v))),
    )
    .into_bytes()
}

fn log_outcome(
    op: &str,
    url: &str,
    result: Result<HttpRequest, BuildError>,
) -> Result<HttpRequest, BuildError> {
    match &result {
        Ok(req) => debug!(
            "{op}: {} {} ({} body bytes)",
            req.method(),
            req.url(),
            req.body().map_or(0, <[u8]>::len)
        ),
        Err(e) => warn!("{op}: no request for {url}: {e}"),
    }
    result
}
