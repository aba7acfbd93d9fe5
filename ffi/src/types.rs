//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers plus lengths instead of
//! `Vec`, and enums with explicit discriminants. Conversion functions live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use reqkit_core::{BuildError, CachePolicy, HttpMethod, HttpRequest, StringMap};

/// Opaque handle to a string map. Used for both headers and query
/// parameters. C callers fill it with `reqkit_map_insert`.
#[derive(Default)]
pub struct FfiStringMap {
    pub(crate) inner: StringMap,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
}

impl FfiHttpMethod {
    /// Map a raw discriminant passed in from C. Unknown values yield `None`
    /// rather than an invalid enum.
    pub(crate) fn from_raw(raw: i32) -> Option<HttpMethod> {
        match raw {
            0 => Some(HttpMethod::Get),
            1 => Some(HttpMethod::Post),
            2 => Some(HttpMethod::Put),
            _ => None,
        }
    }
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `body` is null when `has_body` is false or the body is empty.
/// `ignore_cache` tells the host to bypass local and remote caches.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub has_body: bool,
    pub body: *mut u8,
    pub body_len: usize,
    pub timeout_secs: f64,
    pub ignore_cache: bool,
}

/// Strings handed to C cannot carry interior NULs; a value that does is
/// truncated to empty rather than aborting the call.
fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let parts = req.into_parts();

        let headers_len = parts.headers.len();
        let headers = if parts.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = parts
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        let has_body = parts.body.is_some();
        let (body, body_len) = match parts.body {
            Some(bytes) if !bytes.is_empty() => {
                let len = bytes.len();
                (Box::into_raw(bytes.into_boxed_slice()) as *mut u8, len)
            }
            _ => (std::ptr::null_mut(), 0),
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: parts.method.into(),
            url: c_string(parts.url.into()),
            headers,
            headers_len,
            has_body,
            body,
            body_len,
            timeout_secs: parts.timeout.as_secs_f64(),
            ignore_cache: parts.cache_policy == CachePolicy::IgnoreLocalAndRemote,
        }))
    }

    /// Release every allocation owned by a request built by `from_core`.
    ///
    /// # Safety
    /// `req` must come from `from_core` and must not be used afterwards.
    pub(crate) unsafe fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() && req.body_len > 0 {
            drop(unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.body, req.body_len))
            });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiBuildResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Encoding = 1,
    UrlConstruction = 2,
    NullArg = 3,
    InvalidArgument = 4,
    Panic = 5,
}

/// Result envelope for all build operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `request`
/// points to the built request. On failure `request` is null and
/// `error_message` is a human-readable C string.
#[repr(C)]
pub struct FfiBuildResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub request: *mut FfiHttpRequest,
}

impl FfiBuildResult {
    pub(crate) fn ok(req: HttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiBuildResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            request: FfiHttpRequest::from_core(req),
        }))
    }

    fn error(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiBuildResult {
            error_code,
            error_message: c_string(msg),
            request: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: BuildError) -> *mut Self {
        let code = match &err {
            BuildError::Encoding(_) => FfiErrorCode::Encoding,
            BuildError::UrlConstruction(_) => FfiErrorCode::UrlConstruction,
        };
        Self::error(code, err.to_string())
    }

    pub(crate) fn from_core(result: Result<HttpRequest, BuildError>) -> *mut Self {
        match result {
            Ok(req) => Self::ok(req),
            Err(e) => Self::from_error(e),
        }
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn invalid_arg(name: &str, reason: &str) -> *mut Self {
        Self::error(
            FfiErrorCode::InvalidArgument,
            format!("invalid argument {name}: {reason}"),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg.to_string())
    }
}
