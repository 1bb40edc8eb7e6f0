//! Integrate twoface with other libraries, like Actix-web or Diesel.

use crate::twoface::{Cause, ExternalError, TfError};
use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use tracing::{error, warn};

// Twoface errors can be used as Actix-web errors.
// If a handler returns a Twoface error, the external portion will be shown to the user.
// The internal portion will only be logged.
impl actix_web::ResponseError for TfError {
    fn status_code(&self) -> StatusCode {
        self.external.cause.into()
    }

    fn error_response(&self) -> HttpResponse {
        let status: StatusCode = self.external.cause.into();
        if status.is_server_error() {
            error!("{:#}", self.internal);
        } else {
            warn!(cause = %self.external.cause, "{}", self.internal);
        }
        let resp = serde_json::to_string(&ErrBody {
            error: self.to_string(),
        })
        .unwrap_or_else(|e| {
            error!("Serde error: {}", e.to_string());
            "{\"error\": \"ServerError: internal server error\"}".to_owned()
        });
        HttpResponse::build(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(resp)
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

/// Diesel errors that users can do something about get their own cause. Everything else is a
/// plain server error.
pub fn describe_diesel(err: DieselError) -> TfError {
    let external = match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => ExternalError {
            cause: Cause::UserConflict,
            text: "That record already exists",
        },
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => ExternalError {
            cause: Cause::NotFound,
            text: "A referenced user or tuit does not exist",
        },
        DieselError::NotFound => ExternalError {
            cause: Cause::NotFound,
            text: "Not found",
        },
        _ => ExternalError::default(),
    };
    TfError {
        internal: err.into(),
        external,
    }
}
