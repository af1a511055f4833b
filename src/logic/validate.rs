use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::{
    is_blank, Article, ArticlePatch, EntityKind, NewArticle, NewPokemon, NewTrainer, NewUser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    /// Field absent or null
    NotNull,
    /// Field present but an empty string
    NotEmpty,
    /// Value already taken by another row
    Unique,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::NotNull => write!(f, "notNull Violation: {} cannot be null", self.field),
            ViolationKind::NotEmpty => {
                write!(f, "notEmpty Violation: {} cannot be empty", self.field)
            }
            ViolationKind::Unique => write!(f, "unique Violation: {} must be unique", self.field),
        }
    }
}

/// Every violation found on one write. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", .violations.iter().join(",\n"))]
pub struct ValidationErrors {
    pub entity: EntityKind,
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn single(entity: EntityKind, violation: FieldViolation) -> Self {
        Self {
            entity,
            violations: vec![violation],
        }
    }

    pub fn has_violation(&self, field: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.kind == kind)
    }
}

/// Explicit per-entity validation, run before any store write.
pub trait Validate {
    const ENTITY: EntityKind;

    fn violations(&self) -> Vec<FieldViolation>;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                entity: Self::ENTITY,
                violations,
            })
        }
    }
}

fn require(field: &'static str, value: Option<&str>, out: &mut Vec<FieldViolation>) {
    match value {
        None => out.push(FieldViolation::new(field, ViolationKind::NotNull)),
        Some(v) if is_blank(Some(v)) => out.push(FieldViolation::new(field, ViolationKind::NotEmpty)),
        Some(_) => {}
    }
}

impl Validate for NewArticle {
    const ENTITY: EntityKind = EntityKind::Article;

    fn violations(&self) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        require("title", self.title.as_deref(), &mut out);
        require("content", self.content.as_deref(), &mut out);
        out
    }
}

impl Validate for Article {
    const ENTITY: EntityKind = EntityKind::Article;

    fn violations(&self) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        require("title", Some(&self.title), &mut out);
        require("content", Some(&self.content), &mut out);
        out
    }
}

/// Only explicit nulls are checked here; present values are validated
/// once applied to the loaded article.
impl Validate for ArticlePatch {
    const ENTITY: EntityKind = EntityKind::Article;

    fn violations(&self) -> Vec<FieldViolation> {
        [("title", &self.title), ("content", &self.content)]
            .into_iter()
            .filter(|(_, value)| matches!(value, Some(None)))
            .map(|(field, _)| FieldViolation::new(field, ViolationKind::NotNull))
            .collect()
    }
}

impl Validate for NewUser {
    const ENTITY: EntityKind = EntityKind::User;

    // name is optional
    fn violations(&self) -> Vec<FieldViolation> {
        Vec::new()
    }
}

impl Validate for NewPokemon {
    const ENTITY: EntityKind = EntityKind::Pokemon;

    fn violations(&self) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        require("name", self.name.as_deref(), &mut out);
        require("type", self.kind.as_deref(), &mut out);
        out
    }
}

impl Validate for NewTrainer {
    const ENTITY: EntityKind = EntityKind::Trainer;

    fn violations(&self) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        require("name", self.name.as_deref(), &mut out);
        out
    }
}
