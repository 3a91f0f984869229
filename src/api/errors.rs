use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::application::HandlerError;

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::NotFound { .. } => StatusCode::NOT_FOUND,
            HandlerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal details stay in the logs
        let message = match self {
            HandlerError::Unexpected(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
