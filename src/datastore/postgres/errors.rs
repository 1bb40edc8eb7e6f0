use crate::twoface::{describe_diesel, Cause, ExternalError, Fallible, TfError};
use actix_web::error::BlockingError;
use anyhow::anyhow;
use diesel::result::Error as DieselError;

/// Convenience extension used to extract errors from `web::block`.
pub trait BlockingResp<T> {
    /// Convert the return from a web::block into a normal `Fallible<T>`.
    fn to_resp(self) -> Fallible<T>;
}

impl<T> BlockingResp<T> for Result<T, BlockingError<DieselError>> {
    fn to_resp(self) -> Fallible<T> {
        match self {
            Ok(t) => Ok(t),
            Err(BlockingError::Error(err)) => Err(describe_diesel(err)),
            Err(BlockingError::Canceled) => Err(TfError {
                internal: anyhow!("DB operation cancelled"),
                external: ExternalError {
                    cause: Cause::StoreUnavailable,
                    text: "Database is unavailable",
                },
            }),
        }
    }
}
