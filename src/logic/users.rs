use log::info;

use crate::error::{ModelError, ModelResult};
use crate::logic::validate::Validate;
use crate::model::{EntityKind, Id, NewUser, User};
use crate::store::traits::UserStore;

pub struct UserModel;

impl UserModel {
    pub async fn create<S: UserStore>(store: &S, draft: NewUser) -> ModelResult<User> {
        draft.validate()?;
        let user = store.insert_user(draft.name).await?;
        info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn find_by_id<S: UserStore>(store: &S, id: Id) -> ModelResult<User> {
        store
            .get_user(id)
            .await?
            .ok_or_else(|| ModelError::not_found(EntityKind::User, id))
    }

    pub async fn find_all<S: UserStore>(store: &S) -> ModelResult<Vec<User>> {
        Ok(store.list_users().await?)
    }

    pub async fn destroy<S: UserStore>(store: &S, user: &User) -> ModelResult<()> {
        if !store.delete_user(user.id).await? {
            return Err(ModelError::not_found(EntityKind::User, user.id));
        }
        info!("Deleted user {}", user.id);
        Ok(())
    }
}
