use log::info;

use crate::error::{ModelError, ModelResult};
use crate::logic::validate::Validate;
use crate::model::{EntityKind, Id, NewTrainer, Trainer};
use crate::store::traits::TrainerStore;

pub struct TrainerModel;

impl TrainerModel {
    /// Name uniqueness is enforced by the store at write time
    pub async fn create<S: TrainerStore>(store: &S, draft: NewTrainer) -> ModelResult<Trainer> {
        draft.validate()?;
        let name = draft.name.unwrap_or_default();
        let trainer = store.insert_trainer(&name).await?;
        info!("Created trainer {} '{}'", trainer.id, trainer.name);
        Ok(trainer)
    }

    pub async fn find_by_id<S: TrainerStore>(store: &S, id: Id) -> ModelResult<Trainer> {
        store
            .get_trainer(id)
            .await?
            .ok_or_else(|| ModelError::not_found(EntityKind::Trainer, id))
    }

    pub async fn find_all<S: TrainerStore>(store: &S) -> ModelResult<Vec<Trainer>> {
        Ok(store.list_trainers().await?)
    }

    pub async fn destroy<S: TrainerStore>(store: &S, trainer: &Trainer) -> ModelResult<()> {
        if !store.delete_trainer(trainer.id).await? {
            return Err(ModelError::not_found(EntityKind::Trainer, trainer.id));
        }
        info!("Deleted trainer {}", trainer.id);
        Ok(())
    }
}
