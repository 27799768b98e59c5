//! Identity types for networked objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a networked object instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Create a new object ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object:{}", self.0)
    }
}

/// Owning player of an object, as carried by the `playerId` field
///
/// Sixteen bits signed to match the field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i16);

impl PlayerId {
    /// Player id used for objects owned by the server
    pub const SERVER: PlayerId = PlayerId(0);

    pub fn raw(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

impl From<i16> for PlayerId {
    fn from(id: i16) -> Self {
        Self(id)
    }
}

/// Identity component of a networked object
///
/// Lifecycle (spawn/destroy) is owned by the entity layer; this only
/// carries what the sync path copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: ObjectId,
    pub player_id: PlayerId,
}

impl Identity {
    pub fn new(id: ObjectId, player_id: PlayerId) -> Self {
        Self { id, player_id }
    }

    /// Copy the base fields from another identity.
    ///
    /// The object id is never overwritten; only ownership travels.
    pub fn sync_from(&mut self, other: &Identity) {
        self.player_id = other.player_id;
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.player_id)
    }
}
