//! Catalog Error Types
//!
//! Catalog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::storage_error_kind, kind::ErrorKind};
use kernel::id::{CategoryId, ImageId, ItemId};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Form input rejected; `field` is the form field the marker belongs to
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("Category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    #[error("Image {0} not found")]
    ImageNotFound(ImageId),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn validation(field: &'static str, message: &'static str) -> Self {
        CatalogError::Validation { field, message }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation { .. } => ErrorKind::UnprocessableEntity,
            CatalogError::CategoryNotFound(_)
            | CatalogError::ItemNotFound(_)
            | CatalogError::ImageNotFound(_) => ErrorKind::NotFound,
            CatalogError::Database(e) => storage_error_kind(e),
            CatalogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            CatalogError::Database(_) | CatalogError::Internal(_) => AppError::opaque(self.kind()),
            CatalogError::Validation { field, .. } => {
                AppError::new(self.kind(), self.to_string()).with_action(format!("Check {field}"))
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for CatalogError {
    fn from(err: AppError) -> Self {
        CatalogError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CatalogError::CategoryNotFound(CategoryId::from_i64(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::validation("category_name", "Empty Category Name").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            CatalogError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CatalogError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CatalogError::ItemNotFound(ItemId::from_i64(7)).to_string(),
            "Item 7 not found"
        );
        assert_eq!(
            CatalogError::validation("category_name", "Category already exists").to_string(),
            "Category already exists"
        );
        assert!(
            !CatalogError::Internal("secret path".into())
                .to_app_error()
                .message()
                .contains("secret")
        );
    }
}
