use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use crate::database::MongoDB;
use crate::models::User;
use crate::utils::error::ApiResult;

pub const USERS_COLLECTION: &str = "users";

/// Persistence for user documents. Implementations do no validation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new document and returns it with its assigned id
    async fn create(&self, user: User) -> ApiResult<User>;

    async fn list_all(&self) -> ApiResult<Vec<User>>;

    async fn get_by_id(&self, id: ObjectId) -> ApiResult<Option<User>>;

    /// Replaces the whole document, returning it as stored after the write
    async fn replace_by_id(&self, id: ObjectId, user: User) -> ApiResult<Option<User>>;

    /// Succeeds whether or not a document matched
    async fn delete_by_id(&self, id: ObjectId) -> ApiResult<()>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<User>(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create(&self, mut user: User) -> ApiResult<User> {
        user.id = None;
        let result = self.collection.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();

        log::debug!("Inserted user {:?}", user.id);
        Ok(user)
    }

    async fn list_all(&self) -> ApiResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn get_by_id(&self, id: ObjectId) -> ApiResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn replace_by_id(&self, id: ObjectId, mut user: User) -> ApiResult<Option<User>> {
        // the replacement must not carry an _id of its own
        user.id = None;

        let replaced = self
            .collection
            .find_one_and_replace(doc! { "_id": id }, &user)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(replaced)
    }

    async fn delete_by_id(&self, id: ObjectId) -> ApiResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        log::debug!("Deleted {} user(s) for id {}", result.deleted_count, id);
        Ok(())
    }
}

#[cfg(test)]
pub use memory::{FailingUserStore, InMemoryUserStore};
