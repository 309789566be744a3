//! Byte layout of a book side account.
//!
//! ## Schema
//!
//! Every field the decoders touch is declared exactly once below as a
//! [`Field`] (name, offset, width). Header offsets are relative to the
//! start of the account; node offsets are relative to the start of a
//! node record.
//!
//! ```text
//! Account (40 + capacity * 88 bytes)
//! ┌──────────┬──────┬──────────┬──────────┬──────┬────────────┬────────────────┐
//! │ metadata │ bump │ free len │ free head│ root │ leaf count │ nodes[capacity]│
//! │  0..8    │ 8..16│  16..24  │  24..28  │28..32│   32..40   │     40..       │
//! └──────────┴──────┴──────────┴──────────┴──────┴────────────┴────────────────┘
//!
//! Node record (88 bytes, tag first)
//!   inner: tag | prefix_len | key(16) | child0 | child1 | padding(56)
//!   leaf:  tag | owner_slot | order_type | version | tif | key(16) |
//!          owner(32) | quantity | client_order_id | best_initial | timestamp
//!   free:  tag | next | padding(80)
//! ```

pub mod reader;

use crate::error::Result;

/// Number of node slots in one book side on-chain.
pub const MAX_BOOK_NODES: usize = 1024;

/// Width of a single node record.
pub const NODE_LEN: usize = 88;

/// Width of the account metadata block.
pub const METADATA_LEN: usize = 8;

/// Offset at which the node array begins.
pub const NODES_OFFSET: usize = 40;

/// Largest arena a `u32` handle can address.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// Total account length for a given node capacity.
///
/// `None` if the capacity exceeds [`MAX_CAPACITY`] or the length does not
/// fit in `usize`.
pub const fn account_len(capacity: usize) -> Option<usize> {
    if capacity > MAX_CAPACITY {
        return None;
    }
    match capacity.checked_mul(NODE_LEN) {
        Some(nodes) => nodes.checked_add(NODES_OFFSET),
        None => None,
    }
}

/// Account length of a full-size book side (90 152 bytes).
pub const BOOK_SIDE_LEN: usize = NODES_OFFSET + MAX_BOOK_NODES * NODE_LEN;

/// A named fixed-width field at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self { name, offset, width }
    }

    /// First byte past this field.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    #[inline]
    pub fn u8(&self, buf: &[u8]) -> Result<u8> {
        debug_assert_eq!(self.width, 1, "{} is not a u8 field", self.name);
        reader::read_u8(buf, self.offset)
    }

    #[inline]
    pub fn u32(&self, buf: &[u8]) -> Result<u32> {
        debug_assert_eq!(self.width, 4, "{} is not a u32 field", self.name);
        reader::read_u32(buf, self.offset)
    }

    #[inline]
    pub fn u64(&self, buf: &[u8]) -> Result<u64> {
        debug_assert_eq!(self.width, 8, "{} is not a u64 field", self.name);
        reader::read_u64(buf, self.offset)
    }

    #[inline]
    pub fn i64(&self, buf: &[u8]) -> Result<i64> {
        debug_assert_eq!(self.width, 8, "{} is not an i64 field", self.name);
        reader::read_i64(buf, self.offset)
    }

    #[inline]
    pub fn u128(&self, buf: &[u8]) -> Result<u128> {
        debug_assert_eq!(self.width, 16, "{} is not a u128 field", self.name);
        reader::read_u128(buf, self.offset)
    }

    #[inline]
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8]> {
        reader::read_bytes(buf, self.offset, self.width)
    }

    #[inline]
    pub fn array<const N: usize>(&self, buf: &[u8]) -> Result<[u8; N]> {
        debug_assert_eq!(self.width, N, "{} is not {} bytes wide", self.name, N);
        reader::read_array(buf, self.offset)
    }
}

/// Account header fields.
pub mod header {
    use super::Field;

    pub const METADATA: Field = Field::new("metadata", 0, super::METADATA_LEN);
    pub const BUMP_INDEX: Field = Field::new("bump_index", 8, 8);
    pub const FREE_LIST_LEN: Field = Field::new("free_list_len", 16, 8);
    pub const FREE_LIST_HEAD: Field = Field::new("free_list_head", 24, 4);
    pub const ROOT_NODE: Field = Field::new("root_node", 28, 4);
    pub const LEAF_COUNT: Field = Field::new("leaf_count", 32, 8);

    pub const ALL: [Field; 6] = [
        METADATA,
        BUMP_INDEX,
        FREE_LIST_LEN,
        FREE_LIST_HEAD,
        ROOT_NODE,
        LEAF_COUNT,
    ];
}

/// Metadata block fields, relative to the start of the block.
pub mod metadata {
    use super::Field;

    pub const DATA_TYPE: Field = Field::new("data_type", 0, 1);
    pub const VERSION: Field = Field::new("version", 1, 1);
    pub const IS_INITIALIZED: Field = Field::new("is_initialized", 2, 1);
    pub const EXTRA_INFO: Field = Field::new("extra_info", 3, 5);
}

/// Node record fields, relative to the start of the record.
pub mod node {
    use super::Field;

    pub const TAG: Field = Field::new("tag", 0, 4);

    pub const INNER_PREFIX_LEN: Field = Field::new("prefix_len", 4, 4);
    pub const INNER_KEY: Field = Field::new("key", 8, 16);
    pub const INNER_CHILD_0: Field = Field::new("child_0", 24, 4);
    pub const INNER_CHILD_1: Field = Field::new("child_1", 28, 4);

    pub const LEAF_OWNER_SLOT: Field = Field::new("owner_slot", 4, 1);
    pub const LEAF_ORDER_TYPE: Field = Field::new("order_type", 5, 1);
    pub const LEAF_VERSION: Field = Field::new("version", 6, 1);
    pub const LEAF_TIME_IN_FORCE: Field = Field::new("time_in_force", 7, 1);
    pub const LEAF_KEY: Field = Field::new("key", 8, 16);
    pub const LEAF_OWNER: Field = Field::new("owner", 24, 32);
    pub const LEAF_QUANTITY: Field = Field::new("quantity", 56, 8);
    pub const LEAF_CLIENT_ORDER_ID: Field = Field::new("client_order_id", 64, 8);
    pub const LEAF_BEST_INITIAL: Field = Field::new("best_initial", 72, 8);
    pub const LEAF_TIMESTAMP: Field = Field::new("timestamp", 80, 8);

    pub const FREE_NEXT: Field = Field::new("next", 4, 4);

    pub const LEAF: [Field; 10] = [
        LEAF_OWNER_SLOT,
        LEAF_ORDER_TYPE,
        LEAF_VERSION,
        LEAF_TIME_IN_FORCE,
        LEAF_KEY,
        LEAF_OWNER,
        LEAF_QUANTITY,
        LEAF_CLIENT_ORDER_ID,
        LEAF_BEST_INITIAL,
        LEAF_TIMESTAMP,
    ];
}

// ============================================================================
// Unit Tests
// ============================================================================
