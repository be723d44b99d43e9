//! Static file serving module
//!
//! Maps request paths onto files below the site root, with conditional
//! requests, byte ranges, `index.html` lookup and directory listings.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use hyper::body::Bytes;
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE};
use hyper::StatusCode;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::fs;

use super::error::HandlerError;
use super::router::RequestContext;
use crate::http::{self, cache, mime, HttpResponse, RangeOutcome, Validators};
use crate::logger;

/// Characters escaped in listing hrefs
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Serves the files under one root directory
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_file: String,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    pub async fn serve(&self, ctx: &RequestContext<'_>) -> Result<HttpResponse, HandlerError> {
        let raw_path = ctx.uri.path();
        let decoded = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|e| HandlerError::new(e, "invalid URL path", StatusCode::BAD_REQUEST))?;

        let Some(relative) = clean_path(&decoded) else {
            return Ok(http::build_404_response());
        };
        let target = self.root.join(relative);

        let meta = match fs::metadata(&target).await {
            Ok(m) => m,
            Err(e) if is_not_found(&e) => return Ok(http::build_404_response()),
            Err(e) => return Err(io_failure(e)),
        };

        if !self.within_root(&target).await {
            logger::log_warning(&format!(
                "Path escapes site root: {raw_path} -> {}",
                target.display()
            ));
            return Ok(http::build_404_response());
        }

        if meta.is_dir() {
            if !raw_path.ends_with('/') {
                let location = match ctx.uri.query() {
                    Some(q) => format!("{raw_path}/?{q}"),
                    None => format!("{raw_path}/"),
                };
                return Ok(http::build_redirect_response(&location));
            }

            let index = target.join(&self.index_file);
            if let Ok(index_meta) = fs::metadata(&index).await {
                if index_meta.is_file() {
                    return serve_file(&index, &index_meta, ctx).await;
                }
            }
            return list_directory(&target, ctx.is_head()).await;
        }

        serve_file(&target, &meta, ctx).await
    }

    /// Symlinks may point anywhere; the canonical target must stay under the root
    async fn within_root(&self, target: &Path) -> bool {
        let (Ok(root), Ok(resolved)) = (
            fs::canonicalize(&self.root).await,
            fs::canonicalize(target).await,
        ) else {
            return false;
        };
        resolved.starts_with(root)
    }
}

/// Lexically clean a decoded URL path into a root-relative path.
/// `..` never climbs above the root. `None` for segments no file can have.
fn clean_path(decoded: &str) -> Option<PathBuf> {
    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(&['\0', '\\'][..]) => return None,
            s => segments.push(s),
        }
    }
    Some(segments.into_iter().collect())
}

async fn serve_file(
    path: &Path,
    meta: &Metadata,
    ctx: &RequestContext<'_>,
) -> Result<HttpResponse, HandlerError> {
    let data = Bytes::from(fs::read(path).await.map_err(io_failure)?);
    let modified = meta.modified().ok();
    let validators = Validators {
        etag: cache::generate_etag(&data),
        last_modified: modified.map(cache::http_date),
    };

    let if_none_match = ctx.header(IF_NONE_MATCH);
    let unchanged = match if_none_match {
        Some(_) => cache::check_etag_match(if_none_match, &validators.etag),
        None => modified.is_some_and(|m| cache::not_modified_since(ctx.header(IF_MODIFIED_SINCE), m)),
    };
    if unchanged {
        return Ok(http::build_304_response(&validators));
    }

    let content_type = mime::content_type_for(path);
    let response = match http::resolve_range(ctx.header(RANGE), data.len()) {
        RangeOutcome::Partial(range) => {
            http::build_partial_response(&data, range, content_type, &validators, ctx.is_head())
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(data.len()),
        RangeOutcome::Full => {
            http::build_file_response(data, content_type, &validators, ctx.is_head())
        }
    };
    Ok(response)
}

async fn list_directory(dir: &Path, is_head: bool) -> Result<HttpResponse, HandlerError> {
    let mut reader = fs::read_dir(dir).await.map_err(io_failure)?;
    let mut names = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(io_failure)? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    Ok(http::build_html_response(render_listing(&names), is_head))
}

fn render_listing(names: &[String]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );
    for name in names {
        let href = utf8_percent_encode(name, HREF);
        html.push_str(&format!("<a href=\"{href}\">{}</a>\n", escape_html(name)));
    }
    html.push_str("</pre>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&#34;")
        .replace('\'', "&#39;")
}

fn is_not_found(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn io_failure(e: io::Error) -> HandlerError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        HandlerError::new(e, "403 Forbidden", StatusCode::FORBIDDEN)
    } else {
        HandlerError::internal(e, "500 Internal Server Error")
    }
}
