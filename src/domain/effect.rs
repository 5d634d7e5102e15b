//! Effects produced by a reconciliation run.

use serde::Serialize;
use std::fmt;

/// Entity type touched by an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntityKind {
    Region,
    TopLevelDomain,
    Country,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Region => "Region",
            EntityKind::TopLevelDomain => "TopLevelDomain",
            EntityKind::Country => "Country",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EffectAction {
    Created,
    Updated,
    Deleted,
}

impl EffectAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectAction::Created => "Created",
            EffectAction::Updated => "Updated",
            EffectAction::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for EffectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single create/update/delete applied to the store.
///
/// Renders as `"<EntityType>: <identity> - <Action>"`, e.g.
/// `Region: Asia - Created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub entity: EntityKind,
    pub identity: String,
    pub action: EffectAction,
}

impl Effect {
    pub fn new(entity: EntityKind, identity: impl Into<String>, action: EffectAction) -> Self {
        Self {
            entity,
            identity: identity.into(),
            action,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.entity, self.identity, self.action)
    }
}
