//! Storage error classification and problem-details rendering

#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

/// Classify a database failure
///
/// Connection trouble is a 503; constraint violations the caller did not
/// map to something more specific are conflicts.
#[cfg(feature = "sqlx")]
pub fn storage_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        // https://www.postgresql.org/docs/current/errcodes-appendix.html
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23503" | "23505") => ErrorKind::Conflict,
            Some("23502" | "23514") => ErrorKind::BadRequest,
            Some("57P01" | "57P02" | "57P03") => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::InternalServerError,
        },
        _ => ErrorKind::InternalServerError,
    }
}

/// RFC 7807 problem details
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "type": "about:blank",
            "title": self.kind().reason(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "sqlx"))]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_kind() {
        assert_eq!(
            storage_error_kind(&sqlx::Error::PoolTimedOut),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(storage_error_kind(&sqlx::Error::RowNotFound), ErrorKind::NotFound);
        assert_eq!(
            storage_error_kind(&sqlx::Error::Protocol("bad frame".into())),
            ErrorKind::InternalServerError
        );
    }
}
