//! HTTP response building module
//!
//! Builders for the responses the site produces, decoupled from handlers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED,
    LOCATION, X_CONTENT_TYPE_OPTIONS,
};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use super::range::ByteRange;

pub type HttpResponse = Response<Full<Bytes>>;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Validators attached to every file response
#[derive(Debug, Clone)]
pub struct Validators {
    pub etag: String,
    pub last_modified: Option<String>,
}

impl Validators {
    fn apply(&self, mut builder: Builder) -> Builder {
        builder = builder.header(ETAG, &self.etag);
        if let Some(ref modified) = self.last_modified {
            builder = builder.header(LAST_MODIFIED, modified);
        }
        builder
    }
}

/// Plain-text error response whose body is exactly `message`
pub fn build_error_response(status: StatusCode, message: &str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, PLAIN_TEXT)
        .header(X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Full::new(Bytes::from(message.to_owned())))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_error_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> HttpResponse {
    let Ok(location) = HeaderValue::from_str(location) else {
        crate::logger::log_warning(&format!("Refusing redirect to invalid location: {location:?}"));
        return build_404_response();
    };
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_TYPE, PLAIN_TEXT)
        .body(Full::new(Bytes::from_static(b"Moved Permanently")))
        .unwrap_or_else(|e| fallback(StatusCode::MOVED_PERMANENTLY, &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(validators: &Validators) -> HttpResponse {
    validators
        .apply(Response::builder().status(StatusCode::NOT_MODIFIED))
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, &e))
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total: usize) -> HttpResponse {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, PLAIN_TEXT)
        .header(CONTENT_RANGE, format!("bytes */{total}"))
        .body(Full::new(Bytes::from_static(b"invalid range")))
        .unwrap_or_else(|e| fallback(StatusCode::RANGE_NOT_SATISFIABLE, &e))
}

/// Build 200 response for a whole file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    validators: &Validators,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    validators
        .apply(Response::builder().status(StatusCode::OK))
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 206 Partial Content response for one span of a file
pub fn build_partial_response(
    data: &Bytes,
    range: ByteRange,
    content_type: &str,
    validators: &Validators,
    is_head: bool,
) -> HttpResponse {
    let body = if is_head {
        Bytes::new()
    } else {
        data.slice(range.start..=range.end)
    };

    validators
        .apply(Response::builder().status(StatusCode::PARTIAL_CONTENT))
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.len())
        .header(CONTENT_RANGE, range.content_range(data.len()))
        .header(ACCEPT_RANGES, "bytes")
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::PARTIAL_CONTENT, &e))
}

/// Build 200 HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> HttpResponse {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 200 JSON response; the body is written as given
pub fn build_json_response(json: Vec<u8>) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Log the builder error and return a bare response with the intended status
fn fallback(status: StatusCode, error: &hyper::http::Error) -> HttpResponse {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
