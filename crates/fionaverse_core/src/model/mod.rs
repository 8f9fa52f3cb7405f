//! Portfolio content model.
//!
//! # Responsibility
//! - Define the records stored in slots and their stored JSON shape.
//! - Generate entity identifiers and creation timestamps.
//!
//! # Invariants
//! - Every list entity is identified by an `EntityId` that is never reused
//!   within its list. New ids are random UUID v4 strings; stored ids of any
//!   other string form are kept as they are.
//! - Stored field names and enum values match what earlier site versions
//!   wrote, so existing data keeps decoding.

pub mod entity;
pub mod family;
pub mod settings;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Identifier of a list entity, stored as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Returns a fresh random identifier.
pub fn new_entity_id() -> EntityId {
    EntityId(Uuid::new_v4().to_string())
}

/// Wall-clock time in Unix epoch milliseconds; `0` if the clock is before 1970.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
