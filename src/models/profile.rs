//! Profile model
//!
//! A user's cached state: display name plus the orders it owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Order;

/// A user profile, keyed in the cache by its user identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// User identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Orders owned by this profile, in insertion order
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Profile {
    /// Creates a profile with no orders.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            orders: Vec::new(),
        }
    }

    /// Builder-style helper that appends an order.
    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Looks up an order by id.
    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Replaces the order with the same id, or appends it.
    pub fn upsert_order(&mut self, order: Order) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => self.orders.push(order),
        }
    }

    /// Removes an order by id.
    pub fn remove_order(&mut self, id: &str) -> Option<Order> {
        let index = self.orders.iter().position(|o| o.id == id)?;
        Some(self.orders.remove(index))
    }

    // == Stamp Changes ==
    /// Reconciles order timestamps against the version this profile replaces.
    ///
    /// - Orders whose id existed before keep the original `created_at`.
    /// - New orders, and orders whose payload changed, get `updated_at = now`.
    /// - Unchanged orders keep the previous `updated_at`.
    ///
    /// Returns the number of orders stamped.
    pub(crate) fn stamp_changes(&mut self, previous: &Profile, now: DateTime<Utc>) -> usize {
        let mut stamped = 0;
        for order in &mut self.orders {
            match previous.order(&order.id) {
                Some(prev) => {
                    order.created_at = prev.created_at;
                    if order.same_content(prev) {
                        order.updated_at = prev.updated_at;
                    } else {
                        order.touch(now);
                        stamped += 1;
                    }
                }
                None => {
                    order.touch(now);
                    stamped += 1;
                }
            }
        }
        stamped
    }
}
