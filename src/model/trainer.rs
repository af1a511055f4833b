use crate::model::{Id, Pokemon};
use serde::{Deserialize, Serialize};

/// Trainers own the junction rows linking them to pokemon, never the pokemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTrainer {
    pub name: Option<String>,
}

impl NewTrainer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Trainer with its pokemon collection resolved, ordered by pokemon id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerWithPokemon {
    #[serde(flatten)]
    pub trainer: Trainer,
    pub pokemon: Vec<Pokemon>,
}

impl TrainerWithPokemon {
    pub fn holds(&self, pokemon_id: Id) -> bool {
        self.pokemon.iter().any(|p| p.id == pokemon_id)
    }
}
