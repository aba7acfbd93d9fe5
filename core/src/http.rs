//! HTTP request types for the host-does-IO pattern.
//!
//! # Design
//! `HttpRequest` describes a request as plain data. The core crate builds
//! these values without ever touching the network; the caller (host) hands
//! them to whatever transport it owns. Fields are private so a request is
//! immutable once `RequestBuilder` has produced it.
//!
//! All fields use owned types (`String`, `Vec`, `Url`) so values can cross
//! FFI boundaries without lifetime concerns.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    /// The method token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// Returned when parsing a method token other than `GET`, `POST` or `PUT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

/// How the transport should treat local and intermediary caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never answer from a cache; always go to the origin server.
    IgnoreLocalAndRemote,
}

impl CachePolicy {
    /// Request directives a transport without a native cache switch can send
    /// to get the same effect. `RequestBuilder` never merges these into the
    /// request headers; that is the host's call.
    pub fn directive_headers(&self) -> Vec<(String, String)> {
        match self {
            CachePolicy::IgnoreLocalAndRemote => vec![
                ("Cache-Control".to_string(), "no-cache, no-store".to_string()),
                ("Pragma".to_string(), "no-cache".to_string()),
            ],
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RequestBuilder::build_*` methods. The caller is responsible for
/// executing it against the network.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    url: Url,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Duration,
    cache_policy: CachePolicy,
}

/// Owned pieces of an `HttpRequest`, for hosts that want to move the parts
/// into their own transport types.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequestParts {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
    pub cache_policy: CachePolicy,
}

impl HttpRequest {
    pub(crate) fn new(
        url: Url,
        method: HttpMethod,
        headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
        timeout: Duration,
    ) -> Self {
        Self {
            url,
            method,
            headers,
            body,
            timeout,
            cache_policy: CachePolicy::IgnoreLocalAndRemote,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Headers exactly as the caller supplied them, ordered by name.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Look up a header value by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The body as text. Every body this crate builds is UTF-8, so this is
    /// `None` only when there is no body.
    pub fn body_str(&self) -> Option<&str> {
        self.body.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    pub fn into_parts(self) -> HttpRequestParts {
        HttpRequestParts {
            url: self.url,
            method: self.method,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
            cache_policy: self.cache_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tokens_roundtrip() {
        for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Put] {
            assert_eq!(method.as_str().parse::<HttpMethod>().unwrap(), method);
            assert_eq!(method.to_string(), method.as_str());
        }
    }

    #[test]
    fn method_parse_is_case_sensitive() {
        let err = "post".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err, UnknownMethod("post".to_string()));
        assert!("DELETE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn ignore_cache_policy_has_directives() {
        let headers = CachePolicy::IgnoreLocalAndRemote.directive_headers();
        assert!(headers
            .iter()
            .any(|(k, v)| k == "Cache-Control" && v.contains("no-cache")));
        assert!(headers.iter().any(|(k, v)| k == "Pragma" && v == "no-cache"));
    }

    #[test]
    fn header_lookup_is_exact() {
        let req = HttpRequest::new(
            Url::parse("https://x.test/").unwrap(),
            HttpMethod::Post,
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            None,
            Duration::from_secs(1),
        );
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.header("content-type"), None);
        assert!(req.body_str().is_none());
    }
}
