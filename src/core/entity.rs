//! Game entity system with simple integer IDs
//!
//! Players and pieces live in Game-owned arenas (plain `Vec`s) and are
//! referred to by index. IDs are typed so a piece index can never be handed
//! to a player lookup.

use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed arena index
///
/// IDs are stable for the whole game: entities are never removed from their
/// arena, only moved between zones.
#[derive(Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct EntityId<T> {
    id: u32,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityId<T> {
    pub const fn new(id: u32) -> Self {
        EntityId {
            id,
            _marker: PhantomData,
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.id
    }

    pub fn index(&self) -> usize {
        self.id as usize
    }
}

// Manual impls: derives would put needless bounds on T.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Base trait for all game entities
pub trait GameEntity<T> {
    fn id(&self) -> EntityId<T>;
    fn name(&self) -> &str;
}

/// Look up an entity in an arena by typed ID
pub fn arena_get<'a, T>(arena: &'a [T], id: EntityId<T>, kind: &str) -> Result<&'a T> {
    arena
        .get(id.index())
        .ok_or_else(|| RulesError::EntityNotFound(format!("{kind} {id}")))
}

/// Mutable arena lookup by typed ID
pub fn arena_get_mut<'a, T>(
    arena: &'a mut [T],
    id: EntityId<T>,
    kind: &str,
) -> Result<&'a mut T> {
    arena
        .get_mut(id.index())
        .ok_or_else(|| RulesError::EntityNotFound(format!("{kind} {id}")))
}
