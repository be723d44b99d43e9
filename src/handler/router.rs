//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: builds the request context,
//! picks the endpoint for the path and hands it to the dispatch wrapper.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::header::HeaderName;
use hyper::{HeaderMap, Method, Request, Uri, Version};

use super::dispatch::dispatch;
use super::entries::EntryLister;
use super::static_files::StaticFiles;
use super::Endpoint;
use crate::config::{AppState, SiteConfig};
use crate::http::HttpResponse;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub peer: SocketAddr,
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub version: Version,
    pub headers: &'a HeaderMap,
}

impl RequestContext<'_> {
    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_head(&self) -> bool {
        *self.method == Method::HEAD
    }
}

/// Exact-path routes with a fallback for everything else
pub struct Router {
    routes: HashMap<String, Endpoint>,
    fallback: Endpoint,
}

impl Router {
    pub fn new(fallback: Endpoint) -> Self {
        Self {
            routes: HashMap::new(),
            fallback,
        }
    }

    #[must_use]
    pub fn route(mut self, path: impl Into<String>, endpoint: Endpoint) -> Self {
        self.routes.insert(path.into(), endpoint);
        self
    }

    /// Static files at the root, the entry lister at its own path
    pub fn from_config(site: &SiteConfig) -> Self {
        Self::new(Endpoint::StaticFiles(StaticFiles::new(
            &site.directory,
            &site.index_file,
        )))
        .route(
            &site.entries_path,
            Endpoint::Entries(EntryLister::new(
                &site.entries_pattern,
                &site.entries_prefix,
            )),
        )
    }

    pub fn resolve(&self, path: &str) -> &Endpoint {
        self.routes.get(path).unwrap_or(&self.fallback)
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let ctx = RequestContext {
        peer,
        method: req.method(),
        uri: req.uri(),
        version: req.version(),
        headers: req.headers(),
    };

    let endpoint = state.router.resolve(ctx.uri.path());
    Ok(dispatch(endpoint, &ctx, &state.config.logging.access_log_format).await)
}
