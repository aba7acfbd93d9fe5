//! Synchronous HTTP request construction.
//!
//! # Overview
//! Builds `HttpRequest` values from a URL, headers, and a body (JSON or form
//! fields, raw text, or query parameters) without touching the network
//! (host-does-IO pattern). The caller executes the request with whatever
//! transport it owns.
//!
//! # Design
//! - `RequestBuilder` is stateless; it holds only timeout and method.
//! - Every constructor returns `Result<HttpRequest, BuildError>`, so a
//!   missing request always comes with the reason.
//! - Body fields are a closed `FieldValue` tree, so the only JSON failure
//!   left is a non-finite float.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod builder;
pub mod encoding;
pub mod error;
pub mod http;
pub mod types;

pub use builder::{BodyEncoding, RequestBuilder, DEFAULT_TIMEOUT};
pub use encoding::encode_pairs;
pub use error::BuildError;
pub use http::{CachePolicy, HttpMethod, HttpRequest, HttpRequestParts, UnknownMethod};
pub use types::{fields_to_json, FieldValue, Fields, StringMap};
