//! Entry listing endpoint
//!
//! Expands a glob such as `web/blog/*` and answers with the matches as a JSON
//! array of `/`-separated paths relative to the site root.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::HandlerError;
use crate::http::{self, HttpResponse};

/// Characters that make a pattern component a glob rather than a literal
const GLOB_META: &[char] = &['*', '?', '['];

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("syntax error in pattern {0:?}")]
    Pattern(String),
    #[error("cannot read {path}: {source}")]
    Base {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0} is not a directory")]
    NotADirectory(String),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error("listing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Lists the entries matching a fixed pattern
#[derive(Debug, Clone)]
pub struct EntryLister {
    pattern: String,
    strip_prefix: String,
}

impl EntryLister {
    pub fn new(pattern: impl Into<String>, strip_prefix: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            strip_prefix: strip_prefix.into(),
        }
    }

    /// Enumerate and normalize the matching entries. Blocks on filesystem I/O.
    pub fn list(&self) -> Result<Vec<String>, ListError> {
        Ok(expand(&self.pattern)?
            .iter()
            .map(|p| normalize_entry(p, &self.strip_prefix))
            .collect())
    }

    /// Answer a request with the JSON listing. The walk runs on the blocking pool.
    pub async fn serve(&self) -> Result<HttpResponse, HandlerError> {
        let lister = self.clone();
        let listed = match tokio::task::spawn_blocking(move || lister.list()).await {
            Ok(result) => result,
            Err(join) => Err(ListError::from(join)),
        };
        let entries = listed.map_err(|e| HandlerError::internal(e, "Error getting entries"))?;

        let json = serde_json::to_vec(&entries)
            .map_err(|e| HandlerError::internal(e, "Error marshalling JSON"))?;

        Ok(http::build_json_response(json))
    }
}

/// Turn a matched path into a web path: backslashes become slashes, then the
/// leading prefix is dropped.
pub fn normalize_entry(path: &str, prefix: &str) -> String {
    let slashed = path.replace('\\', "/");
    match slashed.strip_prefix(prefix) {
        Some(rest) => rest.to_owned(),
        None => slashed,
    }
}

/// Expand `pattern` into the matching paths, sorted by name.
///
/// The pattern is split on `/` into a literal base directory and the glob
/// components after it. A missing or unreadable base directory is an error.
fn expand(pattern: &str) -> Result<Vec<String>, ListError> {
    let components: Vec<&str> = pattern.split('/').collect();

    let Some(first_glob) = components.iter().position(|c| c.contains(GLOB_META)) else {
        // No glob characters: the pattern names at most itself
        return Ok(if Path::new(pattern).exists() {
            vec![pattern.to_owned()]
        } else {
            Vec::new()
        });
    };

    let globs = &components[first_glob..];
    if !globs.iter().all(|c| classes_terminated(c)) {
        return Err(ListError::Pattern(pattern.to_owned()));
    }

    let base = if first_glob == 0 {
        None
    } else {
        let literal = components[..first_glob].join("/");
        Some(PathBuf::from(if literal.is_empty() { "/".to_owned() } else { literal }))
    };
    let walk_root = base.clone().unwrap_or_else(|| PathBuf::from("."));

    let meta = std::fs::metadata(&walk_root).map_err(|source| ListError::Base {
        path: walk_root.display().to_string(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ListError::NotADirectory(walk_root.display().to_string()));
    }

    let depth = globs.len();
    let glob = globs.join("/");
    let mut matches = Vec::new();

    for entry in WalkDir::new(&walk_root)
        .follow_links(true)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
    {
        let path = match entry {
            Ok(entry) => entry.into_path(),
            // A link to nothing still matches by name at the leaf level
            Err(err) => match dangling_link(&err) {
                Some(path) if err.depth() == depth => path,
                Some(_) => continue,
                None => return Err(err.into()),
            },
        };
        let Ok(relative) = path.strip_prefix(&walk_root) else {
            continue;
        };
        let candidate = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if fast_glob::glob_match(glob.as_str(), candidate.as_str()) {
            let matched = match base {
                Some(ref b) => b.join(relative),
                None => relative.to_path_buf(),
            };
            matches.push(matched.to_string_lossy().into_owned());
        }
    }

    Ok(matches)
}

/// The link path when `err` comes from following a symlink whose target is gone
fn dangling_link(err: &walkdir::Error) -> Option<PathBuf> {
    let path = err.path()?;
    let missing = err
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
    let is_link = std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
    (missing && is_link).then(|| path.to_path_buf())
}

/// Every `[` opens a character class that is closed later in the component
fn classes_terminated(component: &str) -> bool {
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => {
                // a `]` straight after `[` (or `[!`/`[^`) is a literal member
                let mut first = true;
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' && !first {
                        closed = true;
                        break;
                    }
                    first = first && matches!(inner, '!' | '^');
                }
                if !closed {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}
