use std::sync::Arc;

use log::warn;

use crate::controller::articles::keep_found;
use crate::controller::Acknowledged;
use crate::error::{ModelError, ModelResult};
use crate::logic::{Associations, PokemonModel, TrainerModel};
use crate::model::{EntityKind, Id, NewTrainer, Pokemon, Trainer, TrainerWithPokemon};
use crate::store::traits::Store;

pub struct TrainerController<S: Store> {
    store: Arc<S>,
}

impl<S: Store> TrainerController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every trainer with the pokemon it currently holds
    pub async fn list(&self) -> ModelResult<Vec<TrainerWithPokemon>> {
        let trainers = TrainerModel::find_all(&*self.store).await?;
        let mut held = Vec::with_capacity(trainers.len());
        for trainer in &trainers {
            held.push(Associations::pokemon_of(&*self.store, trainer).await?);
        }
        Ok(held)
    }

    pub async fn get(&self, id: Id) -> ModelResult<TrainerWithPokemon> {
        let trainer = TrainerModel::find_by_id(&*self.store, id).await?;
        Associations::pokemon_of(&*self.store, &trainer).await
    }

    pub async fn create(&self, payload: NewTrainer) -> ModelResult<Acknowledged<Trainer>> {
        let trainer = TrainerModel::create(&*self.store, payload).await?;
        Ok(Acknowledged::created(trainer))
    }

    pub async fn delete(&self, id: Id) -> ModelResult<()> {
        let trainer = TrainerModel::find_by_id(&*self.store, id).await?;
        TrainerModel::destroy(&*self.store, &trainer).await
    }

    pub async fn gain_pokemon(
        &self,
        trainer_id: Id,
        pokemon_id: Id,
    ) -> ModelResult<Acknowledged<TrainerWithPokemon>> {
        let (trainer, pokemon) = self.resolve_pair(trainer_id, pokemon_id).await?;
        let held = Associations::add_pokemon(&*self.store, &trainer, &pokemon).await?;
        Ok(Acknowledged::updated(held))
    }

    pub async fn lose_pokemon(
        &self,
        trainer_id: Id,
        pokemon_id: Id,
    ) -> ModelResult<Acknowledged<TrainerWithPokemon>> {
        let (trainer, pokemon) = self.resolve_pair(trainer_id, pokemon_id).await?;
        let held = Associations::remove_pokemon(&*self.store, &trainer, &pokemon).await?;
        Ok(Acknowledged::updated(held))
    }

    /// Both lookups run concurrently; the association fails once both have
    /// settled and either side is missing.
    async fn resolve_pair(&self, trainer_id: Id, pokemon_id: Id) -> ModelResult<(Trainer, Pokemon)> {
        let store = &*self.store;
        let (trainer, pokemon) = tokio::join!(
            TrainerModel::find_by_id(store, trainer_id),
            PokemonModel::find_by_id(store, pokemon_id),
        );

        let mut missing = Vec::new();
        let trainer = keep_found(trainer, EntityKind::Trainer, trainer_id, &mut missing)?;
        let pokemon = keep_found(pokemon, EntityKind::Pokemon, pokemon_id, &mut missing)?;
        match (trainer, pokemon) {
            (Some(trainer), Some(pokemon)) => Ok((trainer, pokemon)),
            _ => {
                warn!("Cannot associate trainer {} with pokemon {}", trainer_id, pokemon_id);
                Err(ModelError::Association { missing })
            }
        }
    }
}
