//! Failures raised by handlers.
//!
//! Handlers wrap a `BlogError` in an `IronError`; the `ErrorResponder`
//! middleware later downcasts it back to decide how to answer.

use iron::status::{self, Status};
use iron::IronError;
use thiserror::Error;

use crate::schema::FieldError;

/// Message used when a failure carries no text of its own.
pub const DEFAULT_MESSAGE: &str = "An error occurred. Please check your request and try again.";

/// Message shown on HTML pages for validation failures.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request. Please check your input and try again.";

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Post not found!")]
    PostNotFound,

    #[error("request validation failed ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlogError {
    pub fn status(&self) -> Status {
        match *self {
            BlogError::PostNotFound => status::NotFound,
            BlogError::Validation(_) => status::UnprocessableEntity,
            BlogError::Render(_) | BlogError::Io(_) => status::InternalServerError,
        }
    }

    /// Internal failures get a generic message rather than their details.
    pub fn is_internal(&self) -> bool {
        self.status() == status::InternalServerError
    }
}

impl From<BlogError> for IronError {
    fn from(err: BlogError) -> IronError {
        let status = err.status();
        IronError::new(err, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_per_kind() {
        assert_eq!(BlogError::PostNotFound.status(), status::NotFound);
        assert_eq!(
            BlogError::Validation(vec![]).status(),
            status::UnprocessableEntity
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        assert_eq!(BlogError::from(io).status(), status::InternalServerError);
    }

    #[test]
    fn not_found_message() {
        assert_eq!(BlogError::PostNotFound.to_string(), "Post not found!");
        assert!(!BlogError::PostNotFound.is_internal());
    }
}
