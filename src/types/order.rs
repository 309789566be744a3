//! Order views derived from leaf nodes.
//!
//! An [`OrderView`] is a flat, owned copy of everything a consumer needs
//! from a resting order, plus the arena slot it came from.

use std::fmt;

use crate::types::{LeafNode, NodeHandle};

// ============================================================================
// Owner
// ============================================================================

/// 32-byte public key of the account that owns an order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Owner([u8; 32]);

impl Owner {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex rendering of the key
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner({})", self.to_hex())
    }
}

// ============================================================================
// OrderView
// ============================================================================

/// A resting order as seen in a decoded snapshot.
///
/// Prices are in quote lots per base lot and quantities in base lots;
/// see [`MarketScale`](crate::config::MarketScale) for human units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderView {
    pub price: i64,
    pub quantity: i64,
    pub owner: Owner,
    /// Full 128-bit tree key (price and sequence)
    pub key: u128,
    pub client_order_id: u64,
    /// Arena slot the order was read from
    pub slot: NodeHandle,
    /// Slot in the owner's open orders
    pub owner_slot: u8,
    pub order_type: u8,
    pub time_in_force: u8,
    pub best_initial: i64,
    pub timestamp: u64,
}

impl OrderView {
    pub fn from_leaf(slot: NodeHandle, leaf: &LeafNode) -> Self {
        Self {
            price: leaf.price(),
            quantity: leaf.quantity,
            owner: leaf.owner,
            key: leaf.key,
            client_order_id: leaf.client_order_id,
            slot,
            owner_slot: leaf.owner_slot,
            order_type: leaf.order_type,
            time_in_force: leaf.time_in_force,
            best_initial: leaf.best_initial,
            timestamp: leaf.timestamp,
        }
    }

    /// Only an order with zero quantity is left out of depth; any other
    /// quantity, negative included, is summed as stored.
    #[inline]
    pub fn has_depth(&self) -> bool {
        self.quantity != 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
