//! C-ABI wrapper around `reqkit-core`.
//!
//! # Overview
//! Exposes the three request constructors through `extern "C"` functions so
//! any language with a C FFI can build requests and execute them with its
//! own HTTP stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Headers and query parameters travel as an opaque `FfiStringMap` handle;
//!   JSON body fields travel as JSON object text.
//! - A single `FfiBuildResult` envelope conveys the request or the error.
//! - The C caller owns all returned pointers and must call the matching
//!   `reqkit_*_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::time::Duration;

use log::warn;
use reqkit_core::{BodyEncoding, Fields, RequestBuilder, StringMap, DEFAULT_TIMEOUT};

use types::*;

// ---------------------------------------------------------------------------
// String maps
// ---------------------------------------------------------------------------

/// Create an empty string map for headers or query parameters.
///
/// The caller must free the returned pointer with `reqkit_map_free`.
#[unsafe(no_mangle)]
pub extern "C" fn reqkit_map_new() -> *mut FfiStringMap {
    catch_unwind(|| Box::into_raw(Box::new(FfiStringMap::default())))
        .unwrap_or(std::ptr::null_mut())
}

/// Insert or replace `key` with `value`.
///
/// Returns false if any pointer is null or either string is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn reqkit_map_insert(
    map: *mut FfiStringMap,
    key: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(|| {
        if map.is_null() || key.is_null() || value.is_null() {
            return false;
        }
        let (Ok(key), Ok(value)) = (
            unsafe { CStr::from_ptr(key) }.to_str(),
            unsafe { CStr::from_ptr(value) }.to_str(),
        ) else {
            return false;
        };
        let map = unsafe { &mut *map };
        map.inner.insert(key.to_string(), value.to_string());
        true
    })
    .unwrap_or(false)
}

/// Free a map created by `reqkit_map_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqkit_map_free(map: *mut FfiStringMap) {
    if !map.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(map) });
        });
    }
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Null means "no entries".
fn map_or_empty(map: *const FfiStringMap) -> StringMap {
    if map.is_null() {
        StringMap::new()
    } else {
        unsafe { &*map }.inner.clone()
    }
}

/// Non-positive, non-finite or overflowing values select the default, as do
/// values too small to survive rounding to whole nanoseconds.
fn timeout_from_secs(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(d) if secs.is_finite() && !d.is_zero() => d,
        _ => DEFAULT_TIMEOUT,
    }
}

/// Shared prologue: read the URL and pick the builder options.
fn read_url<'a>(url: *const c_char) -> Result<&'a str, *mut FfiBuildResult> {
    if url.is_null() {
        return Err(FfiBuildResult::null_arg("url"));
    }
    unsafe { CStr::from_ptr(url) }
        .to_str()
        .map_err(|_| FfiBuildResult::invalid_arg("url", "not valid UTF-8"))
}

fn builder_for(timeout_secs: f64, method: i32) -> Result<RequestBuilder, *mut FfiBuildResult> {
    let method = FfiHttpMethod::from_raw(method)
        .ok_or_else(|| FfiBuildResult::invalid_arg("method", "unknown method"))?;
    Ok(RequestBuilder::new()
        .timeout(timeout_from_secs(timeout_secs))
        .method(method))
}

// ---------------------------------------------------------------------------
// Build functions
// ---------------------------------------------------------------------------

/// Build a request whose body is `fields_json` (a JSON object) re-encoded
/// as JSON, or, when `as_json` is false, as a form string of its
/// string-valued fields.
///
/// `headers` may be null. `timeout_secs <= 0` selects the 60 second default.
/// `method` is an `FfiHttpMethod` discriminant.
#[unsafe(no_mangle)]
pub extern "C" fn reqkit_build_json_or_form(
    url: *const c_char,
    headers: *const FfiStringMap,
    fields_json: *const c_char,
    as_json: bool,
    timeout_secs: f64,
    method: i32,
) -> *mut FfiBuildResult {
    catch_unwind(|| {
        let url = match read_url(url) {
            Ok(u) => u,
            Err(e) => return e,
        };
        if fields_json.is_null() {
            return FfiBuildResult::null_arg("fields_json");
        }
        let builder = match builder_for(timeout_secs, method) {
            Ok(b) => b,
            Err(e) => return e,
        };
        let Ok(text) = unsafe { CStr::from_ptr(fields_json) }.to_str() else {
            return FfiBuildResult::invalid_arg("fields_json", "not valid UTF-8");
        };
        let fields: Fields = match serde_json::from_str(text) {
            Ok(f) => f,
            Err(e) => {
                warn!("reqkit_build_json_or_form: rejected fields_json: {e}");
                return FfiBuildResult::invalid_arg("fields_json", &e.to_string());
            }
        };
        let encoding = if as_json {
            BodyEncoding::Json
        } else {
            BodyEncoding::Form
        };
        FfiBuildResult::from_core(builder.build_json_or_form(
            url,
            &map_or_empty(headers),
            &fields,
            encoding,
        ))
    })
    .unwrap_or_else(|_| FfiBuildResult::panic("panic in reqkit_build_json_or_form"))
}

/// Build a request whose body is the text `body`.
///
/// Text that is not UTF-8 yields an `Encoding` error.
#[unsafe(no_mangle)]
pub extern "C" fn reqkit_build_string_body(
    url: *const c_char,
    headers: *const FfiStringMap,
    body: *const c_char,
    timeout_secs: f64,
    method: i32,
) -> *mut FfiBuildResult {
    catch_unwind(|| {
        let url = match read_url(url) {
            Ok(u) => u,
            Err(e) => return e,
        };
        if body.is_null() {
            return FfiBuildResult::null_arg("body");
        }
        let builder = match builder_for(timeout_secs, method) {
            Ok(b) => b,
            Err(e) => return e,
        };
        let bytes = unsafe { CStr::from_ptr(body) }.to_bytes();
        FfiBuildResult::from_core(builder.build_string_body_from_bytes(
            url,
            &map_or_empty(headers),
            bytes,
        ))
    })
    .unwrap_or_else(|_| FfiBuildResult::panic("panic in reqkit_build_string_body"))
}

/// Build a GET request with `parameters` as the URL's query.
///
/// `headers` and `parameters` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn reqkit_build_query(
    url: *const c_char,
    headers: *const FfiStringMap,
    parameters: *const FfiStringMap,
    timeout_secs: f64,
) -> *mut FfiBuildResult {
    catch_unwind(|| {
        let url = match read_url(url) {
            Ok(u) => u,
            Err(e) => return e,
        };
        let builder = RequestBuilder::new().timeout(timeout_from_secs(timeout_secs));
        FfiBuildResult::from_core(builder.build_query(
            url,
            &map_or_empty(headers),
            &map_or_empty(parameters),
        ))
    })
    .unwrap_or_else(|_| FfiBuildResult::panic("panic in reqkit_build_query"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiBuildResult` returned by any `reqkit_build_*` function,
/// including the request it carries. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqkit_free_result(result: *mut FfiBuildResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { std::ffi::CString::from_raw(result.error_message) });
        }
        if !result.request.is_null() {
            unsafe { FfiHttpRequest::free(result.request) };
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
