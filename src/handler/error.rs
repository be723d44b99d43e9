//! Request-scoped failure carried from an endpoint to the dispatch wrapper

use hyper::StatusCode;
use std::error::Error;
use std::fmt;

type Cause = Box<dyn Error + Send + Sync>;

/// A failed request: the cause is only ever logged, the message is what the
/// client sees.
#[derive(Debug)]
pub struct HandlerError {
    cause: Cause,
    message: &'static str,
    status: StatusCode,
}

impl HandlerError {
    pub fn new(cause: impl Into<Cause>, message: &'static str, status: StatusCode) -> Self {
        Self {
            cause: cause.into(),
            message,
            status,
        }
    }

    /// 500 with a generic message
    pub fn internal(cause: impl Into<Cause>, message: &'static str) -> Self {
        Self::new(cause, message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.cause)
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause.as_ref())
    }
}
