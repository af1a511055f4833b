use std::sync::Arc;

use crate::controller::Acknowledged;
use crate::error::ModelResult;
use crate::logic::UserModel;
use crate::model::{Id, NewUser, User};
use crate::store::traits::Store;

pub struct UserController<S: Store> {
    store: Arc<S>,
}

impl<S: Store> UserController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ModelResult<Vec<User>> {
        UserModel::find_all(&*self.store).await
    }

    pub async fn get(&self, id: Id) -> ModelResult<User> {
        UserModel::find_by_id(&*self.store, id).await
    }

    pub async fn create(&self, payload: NewUser) -> ModelResult<Acknowledged<User>> {
        let user = UserModel::create(&*self.store, payload).await?;
        Ok(Acknowledged::created(user))
    }

    pub async fn delete(&self, id: Id) -> ModelResult<()> {
        let user = UserModel::find_by_id(&*self.store, id).await?;
        UserModel::destroy(&*self.store, &user).await
    }
}
