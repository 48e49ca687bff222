use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use super::MongoDB;
use crate::models::{UserChanges, UserDocument};
use crate::utils::error::AppError;

pub const USERS_COLLECTION: &str = "users";

/// Primitivas de acesso à coleção de usuários.
///
/// Os handlers dependem apenas deste trait; `MongoDB` é a implementação de
/// produção e os testes usam um repositório em memória.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Todos os documentos, na ordem de iteração do banco
    async fn find_all(&self) -> Result<Vec<UserDocument>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDocument>, AppError>;

    /// Insere e retorna o `_id` gerado
    async fn insert(&self, user: &UserDocument) -> Result<ObjectId, AppError>;

    /// `$set` dos campos presentes; retorna se algum documento casou com o id
    async fn update(&self, id: &ObjectId, changes: &UserChanges) -> Result<bool, AppError>;

    /// Retorna se algum documento foi removido
    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
impl UserRepository for MongoDB {
    async fn find_all(&self) -> Result<Vec<UserDocument>, AppError> {
        let collection = self.collection::<UserDocument>(USERS_COLLECTION);

        let mut cursor = collection.find(doc! {}).await?;
        let mut users = Vec::new();
        while let Some(result) = cursor.next().await {
            users.push(result?);
        }

        Ok(users)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDocument>, AppError> {
        let collection = self.collection::<UserDocument>(USERS_COLLECTION);
        Ok(collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert(&self, user: &UserDocument) -> Result<ObjectId, AppError> {
        let collection = self.collection::<UserDocument>(USERS_COLLECTION);
        let result = collection.insert_one(user).await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("inserted _id is not an ObjectId".into()))
    }

    async fn update(&self, id: &ObjectId, changes: &UserChanges) -> Result<bool, AppError> {
        let collection = self.collection::<UserDocument>(USERS_COLLECTION);
        let result = collection
            .update_one(doc! { "_id": *id }, changes.to_set_document())
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let collection = self.collection::<UserDocument>(USERS_COLLECTION);
        let result = collection.delete_one(doc! { "_id": *id }).await?;

        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        MongoDB::ping(self).await
    }
}
