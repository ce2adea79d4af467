use serde::{Deserialize, Serialize};

// ── Primitives ──────────────────────────────────────────────

/// Ground-plane vector. The vertical axis is constant, so only x and z move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub z: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    pub fn new(x: f64, z: f64) -> Self {
        Vec2 { x, z }
    }
}

pub type Tick = u64;
pub type Seed = u32;
pub type Health = i32;

// ── Entities ────────────────────────────────────────────────

/// Fieldless entity kind, as it appears in the event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Participant,
    Ghost,
    Hostile,
    Resource,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Participant => "participant",
            EntityKind::Ghost => "ghost",
            EntityKind::Hostile => "hostile",
            EntityKind::Resource => "resource",
        }
    }
}

/// What an entity is, with the state only that role carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Participant { health: Health },
    /// An eliminated participant kept in the world. Never collides.
    Ghost { health: Health },
    Hostile,
    Resource,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self.role {
            Role::Participant { .. } => EntityKind::Participant,
            Role::Ghost { .. } => EntityKind::Ghost,
            Role::Hostile => EntityKind::Hostile,
            Role::Resource => EntityKind::Resource,
        }
    }

    /// Health for participants and ghosts, `None` for everything else.
    pub fn health(&self) -> Option<Health> {
        match self.role {
            Role::Participant { health } | Role::Ghost { health } => Some(health),
            Role::Hostile | Role::Resource => None,
        }
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self.role, Role::Ghost { .. })
    }
}

// ── Match inputs ────────────────────────────────────────────

/// The three inputs every client must agree on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInputs {
    pub room: String,
    pub seed_word: String,
    /// Sorted case-insensitively and de-duplicated by the caller
    /// (see [`crate::roster::sanitize`]).
    pub participants: Vec<String>,
}

impl MatchInputs {
    pub fn new(
        room: impl Into<String>,
        seed_word: impl Into<String>,
        participants: Vec<String>,
    ) -> Self {
        MatchInputs {
            room: room.into(),
            seed_word: seed_word.into(),
            participants,
        }
    }
}

/// Result of one fixed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Finished,
}
