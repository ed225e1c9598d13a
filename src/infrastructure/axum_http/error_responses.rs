use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::checkout::CheckoutError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // End customers get a generic message for upstream and internal
        // failures; provider error bodies stay in the logs.
        let message = match &self {
            CheckoutError::Provider(_) => "could not process payment".to_string(),
            CheckoutError::Persistence(_) => "internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

pub fn forbidden(message: &str) -> Response {
    let body = Json(ErrorResponse {
        code: StatusCode::FORBIDDEN.as_u16(),
        message: message.to_string(),
    });

    (StatusCode::FORBIDDEN, body).into_response()
}
