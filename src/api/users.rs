use actix_web::{web, HttpResponse};
use crate::{
    database::UserRepository,
    models::{CreateUserRequest, MessageResponse, UpdateUserRequest, User},
    services::user_service,
    utils::error::{AppError, ErrorResponse},
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}

fn log_failure(operation: &str, e: &AppError) {
    match e {
        AppError::DatabaseError(_) => log::error!("❌ {} failed: {}", operation, e),
        _ => log::warn!("⚠️  {} rejected: {}", operation, e),
    }
}

/// GET /users - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All stored users", body = [User]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_users(db: web::Data<dyn UserRepository>) -> Result<HttpResponse, AppError> {
    let users = user_service::list_users(db.get_ref())
        .await
        .inspect_err(|e| log_failure("GET /users", e))?;

    log::info!("📋 GET /users - {} users", users.len());
    Ok(HttpResponse::Ok().json(users))
}

/// GET /users/{id} - Busca usuário específico
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    db: web::Data<dyn UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = user_service::get_user(db.get_ref(), &id)
        .await
        .inspect_err(|e| log_failure("GET /users/{id}", e))?;

    Ok(HttpResponse::Ok().json(user))
}

/// POST /users - Cria novo usuário
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Name and email are required", body = ErrorResponse)
    )
)]
pub async fn create_user(
    db: web::Data<dyn UserRepository>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::create_user(db.get_ref(), body.into_inner())
        .await
        .inspect_err(|e| log_failure("POST /users", e))?;

    log::info!("✅ User created: {}", user.id);
    Ok(HttpResponse::Created().json(user))
}

/// PUT /users/{id} - Atualiza nome e/ou email
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    db: web::Data<dyn UserRepository>,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = user_service::update_user(db.get_ref(), &id, body.into_inner())
        .await
        .inspect_err(|e| log_failure("PUT /users/{id}", e))?;

    log::info!("🔧 User updated: {}", user.id);
    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /users/{id} - Remove usuário
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    db: web::Data<dyn UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    user_service::delete_user(db.get_ref(), &id)
        .await
        .inspect_err(|e| log_failure("DELETE /users/{id}", e))?;

    log::info!("🗑️  User deleted: {}", id);
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}
