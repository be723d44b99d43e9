//! Request handler module
//!
//! Routing, the two site endpoints, and the dispatch wrapper that turns
//! endpoint failures into responses.

pub mod dispatch;
pub mod entries;
pub mod error;
pub mod router;
pub mod static_files;

pub use entries::{EntryLister, ListError};
pub use error::HandlerError;
pub use router::{handle_request, RequestContext, Router};
pub use static_files::StaticFiles;

use crate::http::HttpResponse;

/// A routable endpoint. Either may fail with a [`HandlerError`].
#[derive(Debug, Clone)]
pub enum Endpoint {
    StaticFiles(StaticFiles),
    Entries(EntryLister),
}

impl Endpoint {
    pub async fn call(&self, ctx: &RequestContext<'_>) -> Result<HttpResponse, HandlerError> {
        match self {
            Self::StaticFiles(files) => files.serve(ctx).await,
            Self::Entries(lister) => lister.serve().await,
        }
    }
}
