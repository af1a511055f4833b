use log::info;

use crate::error::{ModelError, ModelResult};
use crate::logic::validate::Validate;
use crate::model::{EntityKind, Id, NewPokemon, Pokemon, PokemonFilter};
use crate::store::traits::PokemonStore;

pub struct PokemonModel;

impl PokemonModel {
    pub async fn create<S: PokemonStore>(store: &S, draft: NewPokemon) -> ModelResult<Pokemon> {
        draft.validate()?;
        let name = draft.name.unwrap_or_default();
        let kind = draft.kind.unwrap_or_default();
        let pokemon = store.insert_pokemon(&name, &kind).await?;
        info!("Created pokemon {} '{}'", pokemon.id, pokemon.name);
        Ok(pokemon)
    }

    pub async fn find_by_id<S: PokemonStore>(store: &S, id: Id) -> ModelResult<Pokemon> {
        store
            .get_pokemon(id)
            .await?
            .ok_or_else(|| ModelError::not_found(EntityKind::Pokemon, id))
    }

    /// An empty filter behaves like no filter at all
    pub async fn find_all<S: PokemonStore>(
        store: &S,
        filter: Option<&PokemonFilter>,
    ) -> ModelResult<Vec<Pokemon>> {
        let filter = filter.filter(|f| !f.is_empty());
        Ok(store.list_pokemon(filter).await?)
    }

    pub async fn destroy<S: PokemonStore>(store: &S, pokemon: &Pokemon) -> ModelResult<()> {
        if !store.delete_pokemon(pokemon.id).await? {
            return Err(ModelError::not_found(EntityKind::Pokemon, pokemon.id));
        }
        info!("Deleted pokemon {}", pokemon.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_find_all_filters_by_exact_name() {
        let store = MemoryStore::new();
        for (name, kind) in [("Pidgey", "flying"), ("Pikachu", "fire"), ("Pidgey", "water")] {
            PokemonModel::create(&store, NewPokemon::new(name, kind))
                .await
                .unwrap();
        }

        let all = PokemonModel::find_all(&store, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let empty_filter = PokemonFilter::default();
        assert_eq!(
            PokemonModel::find_all(&store, Some(&empty_filter)).await.unwrap().len(),
            3
        );

        let pidgeys = PokemonModel::find_all(&store, Some(&PokemonFilter::by_name("Pidgey")))
            .await
            .unwrap();
        assert_eq!(pidgeys.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);

        let none = PokemonModel::find_all(&store, Some(&PokemonFilter::by_name("Pidg")))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_type() {
        let store = MemoryStore::new();
        let draft = NewPokemon {
            name: Some("Missingno".to_string()),
            kind: None,
        };
        assert!(matches!(
            PokemonModel::create(&store, draft).await,
            Err(ModelError::Validation(_))
        ));
        assert!(PokemonModel::find_all(&store, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_destroy_missing_pokemon_is_not_found() {
        let store = MemoryStore::new();
        let evee = PokemonModel::create(&store, NewPokemon::new("Evee", "fire"))
            .await
            .unwrap();
        PokemonModel::destroy(&store, &evee).await.unwrap();

        assert!(PokemonModel::find_by_id(&store, evee.id).await.unwrap_err().is_not_found());
        assert!(PokemonModel::destroy(&store, &evee).await.unwrap_err().is_not_found());
    }
}
