mod api;
mod config;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::{MongoDB, UserRepository};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🚀 Starting Users Service...");
    log::info!("📊 Database: {}", config.database_url);

    // Initialize MongoDB connection
    let db = MongoDB::new(&config.database_url).await.map_err(|e| {
        log::error!("❌ Failed to connect to MongoDB: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;

    let users: web::Data<dyn UserRepository> =
        web::Data::from(Arc::new(db.clone()) as Arc<dyn UserRepository>);

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    let result = serve(&bind_address, users).await;

    // Servidor parou (SIGINT/SIGTERM) ou bind falhou: fecha o pool antes de sair
    db.shutdown().await;
    log::info!("👋 Users Service stopped");

    result
}

/// Sobe o servidor HTTP e só retorna quando ele para (ou quando o bind falha)
async fn serve(bind_address: &str, users: web::Data<dyn UserRepository>) -> std::io::Result<()> {
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(users.clone())
            .app_data(api::json_config())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Users CRUD
            .configure(api::users::configure)
    })
    .bind(bind_address);

    match server {
        Ok(server) => server.run().await,
        Err(e) => {
            log::error!("❌ Failed to bind {}: {}", bind_address, e);
            Err(e)
        }
    }
}
