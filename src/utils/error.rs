use actix_web::{
    error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Corpo JSON de todas as respostas de erro: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    Validation(String),
    InvalidRequest(String),
}

impl AppError {
    /// Mensagem exposta ao cliente. Falhas de banco nunca vazam detalhes.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::DatabaseError(_) => "Internal server error",
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::InvalidRequest(msg) => msg.as_str(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message().to_string(),
        })
    }
}

/// Converte falhas de parsing do corpo JSON em `AppError::InvalidRequest`,
/// mantendo o mesmo formato `{"error": ...}` das demais respostas.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️  Invalid JSON body on {} {}: {}", req.method(), req.path(), err);
    AppError::InvalidRequest(err.to_string()).into()
}
