use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[cfg(feature = "s3")]
use aws_sdk_s3 as s3;
#[cfg(feature = "s3")]
use s3::error::SdkError;

pub type AppResult<T> = std::result::Result<T, AppError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Never existed, expired, or unreadable. Callers are not told which.
    #[error("snippet expired or not found")]
    NotFound,
    #[error("snippet is empty")]
    EmptySnippet,
    #[error("storage unavailable")]
    StorageUnavailable { source: BoxError },
    #[error("invalid request body")]
    BadRequest {
        #[from]
        source: JsonRejection,
    },
}

impl AppError {
    pub fn storage(source: impl Into<BoxError>) -> Self {
        AppError::StorageUnavailable {
            source: source.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::EmptySnippet => StatusCode::BAD_REQUEST,
            AppError::StorageUnavailable { source } => {
                error!("storage failure: {source}");
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::BadRequest { source } => source.status(),
        };

        (status_code, format!("{self}")).into_response()
    }
}

#[cfg(feature = "s3")]
impl From<SdkError<s3::operation::get_object::GetObjectError>> for AppError {
    fn from(source: SdkError<s3::operation::get_object::GetObjectError>) -> Self {
        match source.into_service_error() {
            s3::operation::get_object::GetObjectError::NoSuchKey(_) => AppError::NotFound,
            error => AppError::storage(error),
        }
    }
}

#[cfg(feature = "s3")]
impl From<SdkError<s3::operation::put_object::PutObjectError>> for AppError {
    fn from(source: SdkError<s3::operation::put_object::PutObjectError>) -> Self {
        AppError::storage(source)
    }
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound,
            _ => AppError::storage(source),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(source: serde_json::Error) -> Self {
        AppError::storage(source)
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(source: tokio::time::error::Elapsed) -> Self {
        AppError::storage(source)
    }
}
