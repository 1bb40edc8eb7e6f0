//! `twoface::Error` wraps a Rust error type with a user-facing description. This stops users from
//! seeing your internal errors, which might contain sensitive implementation details that should be
//! kept private.

mod extensions;
pub mod externalerror;
mod integrations;

pub use extensions::*;
pub use externalerror::{Cause, ExternalError};
pub use integrations::describe_diesel;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Wraps a Rust error type with a user-facing description. This stops users from seeing your internal
/// errors, which might contain sensitive implementation details that should be kept private.
#[derive(Debug)]
pub struct TfError {
    /// The underlying error, from some function. May contain sensitive information, so it should
    /// not be shown to users.
    pub internal: anyhow::Error,
    /// A user-friendly error that doesn't contain any sensitive information.
    pub external: ExternalError,
}

impl TfError {
    /// An error with no underlying Rust error, e.g. a failed authorization check.
    pub fn new(cause: Cause, text: &'static str) -> Self {
        let external = ExternalError::new(cause, text);
        Self {
            internal: anyhow::anyhow!("{}", external),
            external,
        }
    }

    pub fn cause(&self) -> Cause {
        self.external.cause
    }
}

/// Displaying a twoface::Error will only display the external section. The internal error remains
/// private.
impl Display for TfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), fmt::Error> {
        write!(f, "{}", self.external)
    }
}

/// Return type of a function that could fail. If it fails, it includes a twoface error (an error with
/// both internal- and external-facing values).
pub type Fallible<T> = Result<T, TfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_external_part_is_shown() {
        let io_err = std::fs::read("secret-filename-do-not-leak-to-user").unwrap_err();
        let err = io_err.describe(ExternalError {
            cause: Cause::StoreUnavailable,
            text: "Database is unavailable",
        });
        assert_eq!(err.to_string(), "StoreUnavailable: Database is unavailable");
        assert!(err.internal.to_string().contains("No such file"));
    }

    #[test]
    fn test_bare_error_keeps_its_cause() {
        let err = TfError::new(Cause::Forbidden, "Only the owner or an admin may do this");
        assert_eq!(err.cause(), Cause::Forbidden);
        assert_eq!(
            err.to_string(),
            "Forbidden: Only the owner or an admin may do this"
        );
    }
}
