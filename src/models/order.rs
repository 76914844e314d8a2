//! Order model
//!
//! A single order owned by a profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One order belonging to a profile.
///
/// `value` is an opaque payload; the cache never inspects it beyond
/// comparing it with a previous version during an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier, unique within its profile
    pub id: String,
    /// Arbitrary payload
    pub value: Value,
    /// Set once when the order is created
    pub created_at: DateTime<Utc>,
    /// Refreshed on every modification
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new order stamped with the current time.
    pub fn new(id: impl Into<String>, value: impl Into<Value>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            value: value.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// True when both orders carry the same id and payload, ignoring timestamps.
    pub fn same_content(&self, other: &Order) -> bool {
        self.id == other.id && self.value == other.value
    }
}
