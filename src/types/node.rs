//! Node records of the slab arena.
//!
//! ## Design
//!
//! A node is one fixed-width 88-byte slot. The first four bytes are a
//! tag that selects how the remaining bytes are read. The set of tags is
//! closed: a tag this crate does not know is an error, never a guess.
//!
//! ## Links
//!
//! `children` and `next` are slot indices into the same arena. The
//! decoder copies them out verbatim and never follows them; checking
//! that they point somewhere sensible is the job of the tree walk and
//! the validator.
//!
//! ## Keys
//!
//! The 128-bit key packs the order price into the high 64 bits and a
//! sequence number into the low 64 bits. Bids store the sequence number
//! bit-inverted, so on both sides plain key order is price-time order
//! (ascending for asks, descending for bids).

use crate::error::{BookError, Result};
use crate::layout::node as field;
use crate::types::Owner;

/// Index of a slot in the arena.
pub type NodeHandle = u32;

// ============================================================================
// NodeKind enum
// ============================================================================

/// Node discriminant as stored in the tag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Uninitialized,
    Inner,
    Leaf,
    Free,
    LastFree,
}

impl NodeKind {
    /// Convert to u32 for serialization
    pub fn to_u32(self) -> u32 {
        match self {
            NodeKind::Uninitialized => 0,
            NodeKind::Inner => 1,
            NodeKind::Leaf => 2,
            NodeKind::Free => 3,
            NodeKind::LastFree => 4,
        }
    }

    /// Convert from u32 for deserialization
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(NodeKind::Uninitialized),
            1 => Some(NodeKind::Inner),
            2 => Some(NodeKind::Leaf),
            3 => Some(NodeKind::Free),
            4 => Some(NodeKind::LastFree),
            _ => None,
        }
    }
}

// ============================================================================
// Variant payloads
// ============================================================================

/// Branch of the crit-bit tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerNode {
    /// Number of leading key bits shared by everything below this node
    pub prefix_len: u32,
    pub key: u128,
    /// Left (crit bit clear) and right (crit bit set) subtrees
    pub children: [NodeHandle; 2],
}

/// A resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafNode {
    /// Slot of the order in its owner's open orders
    pub owner_slot: u8,
    pub order_type: u8,
    pub version: u8,
    pub time_in_force: u8,
    pub key: u128,
    pub owner: Owner,
    /// Remaining quantity in base lots
    pub quantity: i64,
    pub client_order_id: u64,
    /// Best price on the opposite side when the order was placed
    pub best_initial: i64,
    /// Unix timestamp (seconds) of placement
    pub timestamp: u64,
}

impl LeafNode {
    /// Price in quote lots per base lot (high 64 bits of the key).
    #[inline]
    pub fn price(&self) -> i64 {
        (self.key >> 64) as i64
    }

    /// Sequence bits of the key (bit-inverted on the bids side).
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.key as u64
    }
}

// ============================================================================
// Node enum
// ============================================================================

/// One decoded arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Uninitialized,
    Inner(InnerNode),
    Leaf(LeafNode),
    Free { next: NodeHandle },
    LastFree { next: NodeHandle },
}

impl Node {
    /// Decode one node record.
    ///
    /// `slot` is only used to label an [`BookError::UnknownNodeTag`].
    pub fn decode(slot: usize, record: &[u8]) -> Result<Self> {
        let tag = field::TAG.u32(record)?;
        let kind = NodeKind::from_u32(tag).ok_or(BookError::UnknownNodeTag { slot, tag })?;

        let node = match kind {
            NodeKind::Uninitialized => Node::Uninitialized,
            NodeKind::Inner => Node::Inner(InnerNode {
                prefix_len: field::INNER_PREFIX_LEN.u32(record)?,
                key: field::INNER_KEY.u128(record)?,
                children: [
                    field::INNER_CHILD_0.u32(record)?,
                    field::INNER_CHILD_1.u32(record)?,
                ],
            }),
            NodeKind::Leaf => Node::Leaf(LeafNode {
                owner_slot: field::LEAF_OWNER_SLOT.u8(record)?,
                order_type: field::LEAF_ORDER_TYPE.u8(record)?,
                version: field::LEAF_VERSION.u8(record)?,
                time_in_force: field::LEAF_TIME_IN_FORCE.u8(record)?,
                key: field::LEAF_KEY.u128(record)?,
                owner: Owner::new(field::LEAF_OWNER.array(record)?),
                quantity: field::LEAF_QUANTITY.i64(record)?,
                client_order_id: field::LEAF_CLIENT_ORDER_ID.u64(record)?,
                best_initial: field::LEAF_BEST_INITIAL.i64(record)?,
                timestamp: field::LEAF_TIMESTAMP.u64(record)?,
            }),
            NodeKind::Free => Node::Free {
                next: field::FREE_NEXT.u32(record)?,
            },
            NodeKind::LastFree => Node::LastFree {
                next: field::FREE_NEXT.u32(record)?,
            },
        };

        Ok(node)
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Uninitialized => NodeKind::Uninitialized,
            Node::Inner(_) => NodeKind::Inner,
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Free { .. } => NodeKind::Free,
            Node::LastFree { .. } => NodeKind::LastFree,
        }
    }

    #[inline]
    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    #[inline]
    pub fn as_inner(&self) -> Option<&InnerNode> {
        match self {
            Node::Inner(inner) => Some(inner),
            _ => None,
        }
    }

    /// Key of a tree node, `None` for slots outside the tree.
    #[inline]
    pub fn key(&self) -> Option<u128> {
        match self {
            Node::Inner(inner) => Some(inner.key),
            Node::Leaf(leaf) => Some(leaf.key),
            _ => None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
