use anyhow::Result;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::logic::{PokemonModel, TrainerModel};
use crate::model::{NewPokemon, NewTrainer};
use crate::store::traits::Store;

pub const POKEMON_COUNT: usize = 50;
pub const TRAINER_COUNT: usize = 10;

pub const POKEMON_NAMES: &[&str] = &[
    "Pidgey",
    "Charizard",
    "Bulbasaur",
    "Venusaur",
    "Evee",
    "Pikachu",
    "Blastoise",
    "Squirtle",
    "Charmander",
];

pub const POKEMON_TYPES: &[&str] = &["water", "fire", "flying"];

pub const TRAINER_NAMES: &[&str] = &[
    "Ash", "Misty", "Brock", "Gary", "Tracey", "May", "Max", "Dawn", "Iris", "Cilan", "Serena",
    "Clemont", "Bonnie", "Lana", "Kiawe", "Lillie", "Sophocles", "Mallow", "Gloria", "Leon",
];

/// Rows to insert. Names are drawn before touching the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    pub pokemon: Vec<NewPokemon>,
    pub trainers: Vec<NewTrainer>,
}

impl SeedPlan {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let pokemon = (0..POKEMON_COUNT)
            .map(|_| {
                let name = POKEMON_NAMES.choose(rng).copied().unwrap_or("Pikachu");
                let kind = POKEMON_TYPES.choose(rng).copied().unwrap_or("fire");
                NewPokemon::new(name, kind)
            })
            .collect();

        // Trainer names are unique, so sample without replacement
        let trainers = TRAINER_NAMES
            .choose_multiple(rng, TRAINER_COUNT)
            .map(|name| NewTrainer::named(*name))
            .collect();

        Self { pokemon, trainers }
    }
}

/// Empty the pokemon and trainer tables and refill them with random rows.
/// Articles and users survive.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    let plan = SeedPlan::generate(&mut rand::thread_rng());

    store.reset_roster().await?;

    for draft in plan.pokemon {
        PokemonModel::create(store, draft).await?;
    }
    for draft in plan.trainers {
        TrainerModel::create(store, draft).await?;
    }

    info!(
        "Seeded {} pokemon and {} trainers",
        POKEMON_COUNT, TRAINER_COUNT
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ArticleModel;
    use crate::model::NewArticle;
    use crate::store::traits::{PokemonStore, TrainerStore};
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_plan_draws_from_known_values() {
        let plan = SeedPlan::generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(plan.pokemon.len(), POKEMON_COUNT);
        assert!(plan.pokemon.iter().all(|p| {
            POKEMON_NAMES.contains(&p.name.as_deref().unwrap_or_default())
                && POKEMON_TYPES.contains(&p.kind.as_deref().unwrap_or_default())
        }));

        let names: HashSet<_> = plan.trainers.iter().map(|t| t.name.clone()).collect();
        assert_eq!(names.len(), TRAINER_COUNT);
    }

    #[tokio::test]
    async fn test_seed_replaces_roster_only() {
        let store = MemoryStore::new();
        let article = ArticleModel::create(&store, NewArticle::new("Kept", "survives seeding"))
            .await
            .unwrap();
        TrainerModel::create(&store, NewTrainer::named("Old Trainer"))
            .await
            .unwrap();

        load_seed_data(&store).await.unwrap();
        assert_eq!(store.list_pokemon(None).await.unwrap().len(), POKEMON_COUNT);
        let trainers = store.list_trainers().await.unwrap();
        assert_eq!(trainers.len(), TRAINER_COUNT);
        assert!(trainers.iter().all(|t| t.name != "Old Trainer"));
        assert_eq!(ArticleModel::find_all(&store, None).await.unwrap(), vec![article]);

        // Seeding twice never trips the unique trainer name
        load_seed_data(&store).await.unwrap();
        assert_eq!(store.list_trainers().await.unwrap().len(), TRAINER_COUNT);
    }
}
