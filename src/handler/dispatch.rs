//! Uniform error-to-response adapter and access logging

use std::time::{Duration, Instant};

use hyper::body::Body;
use hyper::header::{REFERER, USER_AGENT};
use hyper::Version;

use super::router::RequestContext;
use super::Endpoint;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};

/// Run `endpoint`, turning a failure into a plain-text error response.
///
/// The failure's cause goes to the error log; the access line is written
/// afterwards for every request.
pub async fn dispatch(endpoint: &Endpoint, ctx: &RequestContext<'_>, log_format: &str) -> HttpResponse {
    let started = Instant::now();

    let response = match endpoint.call(ctx).await {
        Ok(response) => response,
        Err(err) => {
            logger::log_error(&err.to_string());
            http::build_error_response(err.status(), err.message())
        }
    };

    logger::log_access(&access_entry(ctx, &response, started.elapsed()), log_format);
    response
}

fn access_entry(ctx: &RequestContext<'_>, response: &HttpResponse, elapsed: Duration) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        ctx.peer.to_string(),
        ctx.method.to_string(),
        ctx.uri.to_string(),
    );
    entry.http_version = version_label(ctx.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = ctx.header(REFERER).map(ToString::to_string);
    entry.user_agent = ctx.header(USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
