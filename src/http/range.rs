//! HTTP Range request parsing
//!
//! Single `bytes=` ranges only (RFC 7233). Multi-range and malformed headers
//! fall back to the full representation.

/// Inclusive byte span within a representation of known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn len(self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this span
    pub fn content_range(self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// What a `Range` header asks for
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable range: send everything
    Full,
    /// Send just this span with 206
    Partial(ByteRange),
    /// Range lies outside the representation: 416
    Unsatisfiable,
}

/// Resolve a `Range` header against a representation of `len` bytes
pub fn resolve_range(header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // "-N": the final N bytes
        return match last.parse::<usize>() {
            Ok(0) => RangeOutcome::Unsatisfiable,
            Ok(_) if len == 0 => RangeOutcome::Unsatisfiable,
            Ok(n) => RangeOutcome::Partial(ByteRange {
                start: len.saturating_sub(n),
                end: len - 1,
            }),
            Err(_) => RangeOutcome::Full,
        };
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<usize>() {
            Ok(e) => Some(e),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if end.is_some_and(|e| e < start) {
        return RangeOutcome::Full;
    }
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let last_byte = len - 1;
    RangeOutcome::Partial(ByteRange {
        start,
        end: end.map_or(last_byte, |e| e.min(last_byte)),
    })
}
