use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use libauth::domain::user::logic::UserLogicError;
use serde::Serialize;
use strum_macros::Display;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, Display)]
pub enum ApiError {
    InvalidRequest(String),
    Unauthorized,
    /// The user store couldn't be reached. The detail is logged, not returned.
    Unavailable(String),
    Other(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Other(err) => ErrorResponse { error: err.clone() },
            ApiError::InvalidRequest(err) => ErrorResponse { error: err.clone() },
            _ => ErrorResponse {
                error: self.to_string(),
            },
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }
}

impl From<UserLogicError> for ApiError {
    fn from(value: UserLogicError) -> Self {
        match value {
            UserLogicError::Unauthorized => ApiError::Unauthorized,
            UserLogicError::UserRepositoryError(err) => {
                tracing::error!(error = %err, "user store unavailable");
                ApiError::Unavailable(err.to_string())
            }
        }
    }
}
