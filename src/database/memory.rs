use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::UserRepository;
use crate::models::{UserChanges, UserDocument};
use crate::utils::error::AppError;

/// Repositório em memória para testes (ordem de inserção preservada)
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<UserDocument>>,
    unavailable: bool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simula banco fora do ar: toda operação falha com `DatabaseError`
    pub fn unavailable() -> Self {
        Self { users: RwLock::default(), unavailable: true }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.unavailable {
            return Err(AppError::DatabaseError("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<UserDocument>, AppError> {
        self.check()?;
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDocument>, AppError> {
        self.check()?;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn insert(&self, user: &UserDocument) -> Result<ObjectId, AppError> {
        self.check()?;
        let id = user.id.unwrap_or_else(ObjectId::new);
        let mut stored = user.clone();
        stored.id = Some(id);
        self.users.write().await.push(stored);
        Ok(id)
    }

    async fn update(&self, id: &ObjectId, changes: &UserChanges) -> Result<bool, AppError> {
        self.check()?;
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            Some(user) => {
                if let Some(name) = &changes.name {
                    user.name = name.clone();
                }
                if let Some(email) = &changes.email {
                    user.email = email.clone();
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        self.check()?;
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id.as_ref() != Some(id));
        Ok(users.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}
