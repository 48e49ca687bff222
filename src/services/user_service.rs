// ==================== USERS ====================
// Operações CRUD sobre a coleção `users`.
// Os handlers HTTP só traduzem o resultado destas funções para respostas.

use crate::{
    database::UserRepository,
    models::{CreateUserRequest, UpdateUserRequest, User, UserChanges, UserDocument},
    utils::error::AppError,
};
use mongodb::bson::oid::ObjectId;

pub const USER_NOT_FOUND: &str = "User not found";
pub const NAME_AND_EMAIL_REQUIRED: &str = "Name and email are required";

fn not_found() -> AppError {
    AppError::NotFound(USER_NOT_FOUND.to_string())
}

/// Um id fora do formato ObjectId não pode existir no banco: tratado como 404
pub fn parse_user_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| not_found())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub async fn list_users(repo: &dyn UserRepository) -> Result<Vec<User>, AppError> {
    let users = repo.find_all().await?;
    Ok(users.into_iter().map(User::from).collect())
}

pub async fn get_user(repo: &dyn UserRepository, id: &str) -> Result<User, AppError> {
    let object_id = parse_user_id(id)?;

    repo.find_by_id(&object_id)
        .await?
        .map(User::from)
        .ok_or_else(not_found)
}

pub async fn create_user(
    repo: &dyn UserRepository,
    request: CreateUserRequest,
) -> Result<User, AppError> {
    let (name, email) = match (non_empty(request.name), non_empty(request.email)) {
        (Some(name), Some(email)) => (name, email),
        _ => return Err(AppError::Validation(NAME_AND_EMAIL_REQUIRED.to_string())),
    };

    let user = UserDocument { id: None, name, email };
    let inserted_id = repo.insert(&user).await?;

    repo.find_by_id(&inserted_id)
        .await?
        .map(User::from)
        .ok_or_else(|| {
            AppError::DatabaseError(format!("user {} vanished after insert", inserted_id))
        })
}

pub async fn update_user(
    repo: &dyn UserRepository,
    id: &str,
    request: UpdateUserRequest,
) -> Result<User, AppError> {
    let object_id = parse_user_id(id)?;
    let changes = UserChanges::from(request);

    // `$set` vazio é rejeitado pelo MongoDB; sem campos, apenas relê
    if !changes.is_empty() && !repo.update(&object_id, &changes).await? {
        return Err(not_found());
    }

    repo.find_by_id(&object_id)
        .await?
        .map(User::from)
        .ok_or_else(not_found)
}

pub async fn delete_user(repo: &dyn UserRepository, id: &str) -> Result<(), AppError> {
    let object_id = parse_user_id(id)?;

    if repo.delete(&object_id).await? {
        Ok(())
    } else {
        Err(not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryUserRepository;

    fn alice() -> CreateUserRequest {
        CreateUserRequest {
            name: Some("Alice".into()),
            email: Some("alice@example.com".into()),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let repo = InMemoryUserRepository::new();
        let user = create_user(&repo, alice()).await.unwrap();

        assert!(ObjectId::parse_str(&user.id).is_ok());
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_create_requires_both_fields() {
        let repo = InMemoryUserRepository::new();

        let missing_email = CreateUserRequest { name: Some("Alice".into()), email: None };
        let empty_name = CreateUserRequest {
            name: Some(String::new()),
            email: Some("a@b.c".into()),
        };

        for request in [missing_email, empty_name, CreateUserRequest::default()] {
            match create_user(&repo, request).await {
                Err(AppError::Validation(msg)) => assert_eq!(msg, NAME_AND_EMAIL_REQUIRED),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_ids() {
        let repo = InMemoryUserRepository::new();

        let unknown = ObjectId::new().to_hex();
        assert!(matches!(get_user(&repo, &unknown).await, Err(AppError::NotFound(_))));
        assert!(matches!(get_user(&repo, "not-an-id").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_field() {
        let repo = InMemoryUserRepository::new();
        let created = create_user(&repo, alice()).await.unwrap();

        let request = UpdateUserRequest { name: None, email: Some("alice@new.io".into()) };
        let updated = update_user(&repo, &created.id, request).await.unwrap();
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@new.io");

        let fetched = get_user(&repo, &created.id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_empty_update_returns_current_user() {
        let repo = InMemoryUserRepository::new();
        let created = create_user(&repo, alice()).await.unwrap();

        let same = update_user(&repo, &created.id, UpdateUserRequest::default()).await.unwrap();
        assert_eq!(same, created);

        let missing = ObjectId::new().to_hex();
        let result = update_user(&repo, &missing, UpdateUserRequest::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = InMemoryUserRepository::new();
        let created = create_user(&repo, alice()).await.unwrap();

        assert!(delete_user(&repo, &created.id).await.is_ok());
        assert!(matches!(delete_user(&repo, &created.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_database_failure_propagates() {
        let repo = InMemoryUserRepository::unavailable();
        assert!(matches!(list_users(&repo).await, Err(AppError::DatabaseError(_))));
    }
}
