pub mod health;
pub mod swagger;
pub mod users;

use actix_web::web;

/// Extractor JSON compartilhado: erros de parsing viram `{"error": ...}` com 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(crate::utils::error::json_error_handler)
}
