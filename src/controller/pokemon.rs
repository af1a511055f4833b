use std::sync::Arc;

use crate::controller::Acknowledged;
use crate::error::ModelResult;
use crate::logic::PokemonModel;
use crate::model::{Id, NewPokemon, Pokemon, PokemonFilter};
use crate::store::traits::Store;

pub struct PokemonController<S: Store> {
    store: Arc<S>,
}

impl<S: Store> PokemonController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: PokemonFilter) -> ModelResult<Vec<Pokemon>> {
        PokemonModel::find_all(&*self.store, Some(&filter)).await
    }

    pub async fn get(&self, id: Id) -> ModelResult<Pokemon> {
        PokemonModel::find_by_id(&*self.store, id).await
    }

    pub async fn create(&self, payload: NewPokemon) -> ModelResult<Acknowledged<Pokemon>> {
        let pokemon = PokemonModel::create(&*self.store, payload).await?;
        Ok(Acknowledged::created(pokemon))
    }

    pub async fn delete(&self, id: Id) -> ModelResult<()> {
        let pokemon = PokemonModel::find_by_id(&*self.store, id).await?;
        PokemonModel::destroy(&*self.store, &pokemon).await
    }
}
