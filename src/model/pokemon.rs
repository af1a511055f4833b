use crate::model::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPokemon {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl NewPokemon {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(kind.into()),
        }
    }
}

/// Exact-match filter used by `GET /pokemon?name=`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl PokemonFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none()
    }

    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        self.name.as_ref().map_or(true, |n| &pokemon.name == n)
            && self.kind.as_ref().map_or(true, |k| &pokemon.kind == k)
    }
}
