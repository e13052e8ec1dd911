// User lifecycle: validation in front of the store.
// Ids are parsed here so stores only ever see well-formed ObjectIds.

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::database::UserStore;
use crate::models::{User, UserPayload};
use crate::utils::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: UserPayload) -> ApiResult<User> {
        let user = payload.into_user()?;
        self.store.create(user).await
    }

    pub async fn list_all(&self) -> ApiResult<Vec<User>> {
        self.store.list_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> ApiResult<User> {
        let id = parse_id(id)?;
        self.store.get_by_id(id).await?.ok_or(ApiError::NotFound)
    }

    /// Full replacement. The payload goes through the same validation as create.
    pub async fn replace_by_id(&self, id: &str, payload: UserPayload) -> ApiResult<User> {
        let id = parse_id(id)?;
        let user = payload.into_user()?;
        self.store
            .replace_by_id(id, user)
            .await?
            .ok_or(ApiError::NotFound)
    }

    /// Reports success even when no user had this id.
    pub async fn delete_by_id(&self, id: &str) -> ApiResult<()> {
        let id = parse_id(id)?;
        self.store.delete_by_id(id).await
    }
}

fn parse_id(id: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ApiError::InvalidId(id.to_string()))
}
