use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid::ObjectId;
use mongodb::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Title, short description, full description and price are required")]
    MissingRequiredFields,

    #[error("At least one non-empty field is required to update a product")]
    EmptyPatch,

    #[error("Product with id {0} not found")]
    NotFound(ObjectId),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::MissingRequiredFields | ProductError::EmptyPatch => {
                AppError::Validation(err.to_string())
            }
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::StoreUnavailable(msg) => AppError::ServiceUnavailable(msg),
            ProductError::Database(msg) => AppError::Database(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                ProductError::StoreUnavailable(err.to_string())
            }
            _ => ProductError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::MissingRequiredFields, StatusCode::BAD_REQUEST),
            (ProductError::EmptyPatch, StatusCode::BAD_REQUEST),
            (ProductError::NotFound(ObjectId::new()), StatusCode::NOT_FOUND),
            (
                ProductError::StoreUnavailable("timeout".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ProductError::Database("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ProductError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_missing_fields_message_is_fixed() {
        let app_error = AppError::from(ProductError::MissingRequiredFields);
        assert!(matches!(
            app_error,
            AppError::Validation(ref msg)
                if msg == "Title, short description, full description and price are required"
        ));
    }

    #[test]
    fn test_not_found_mentions_id() {
        let id = ObjectId::new();
        let app_error = AppError::from(ProductError::NotFound(id));
        assert!(app_error.to_string().contains(&id.to_hex()));
    }
}
