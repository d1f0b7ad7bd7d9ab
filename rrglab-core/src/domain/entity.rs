//! Entities (industries, groups, symbols) and their point histories.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::point::RsPoint;

/// Entity identifier: industry/group custom id or ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which family of entities is being charted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Industry,
    Group,
    Symbol,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Industry, EntityKind::Group, EntityKind::Symbol];

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Industry => "Industries",
            EntityKind::Group => "Groups",
            EntityKind::Symbol => "Symbols",
        }
    }

    pub fn next(self) -> EntityKind {
        match self {
            EntityKind::Industry => EntityKind::Group,
            EntityKind::Group => EntityKind::Symbol,
            EntityKind::Symbol => EntityKind::Industry,
        }
    }
}

/// An industry, capitalization group or individual symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub display_name: String,
    pub kind: EntityKind,
    /// Owning industry id. Only set for symbols.
    pub membership: Option<EntityId>,
}

/// An entity plus its chronological point history for one snapshot.
///
/// Immutable once loaded: the repository hands out shared references only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub entity: Entity,
    pub points: Vec<RsPoint>,
}

impl Series {
    pub fn new(entity: Entity, points: Vec<RsPoint>) -> Self {
        Self { entity, points }
    }

    pub fn id(&self) -> &EntityId {
        &self.entity.id
    }

    pub fn name(&self) -> &str {
        &self.entity.display_name
    }

    /// Latest point, independent of any trail length.
    pub fn latest(&self) -> Option<&RsPoint> {
        self.points.last()
    }

    /// Series without points are listed but never rendered.
    pub fn is_renderable(&self) -> bool {
        !self.points.is_empty()
    }
}
