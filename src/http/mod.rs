//! HTTP protocol layer module
//!
//! Protocol helpers shared by the handlers: content types, validators,
//! range parsing and response builders.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use range::{resolve_range, ByteRange, RangeOutcome};
pub use response::{
    build_304_response, build_404_response, build_416_response, build_error_response,
    build_file_response, build_html_response, build_json_response, build_partial_response,
    build_redirect_response, HttpResponse, Validators,
};
