//! Error taxonomy for slab decoding and tree walks.
//!
//! Every failure is surfaced to the caller immediately. Nothing in this
//! crate retries, and no error is downgraded to a default value.
//!
//! Running out of depth during an impact-price walk is *not* an error; it
//! is reported as [`ImpactPrice::InsufficientDepth`](crate::orderbook::ImpactPrice).

use thiserror::Error;

use crate::types::{DataType, NodeKind};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BookError>;

/// Errors produced while decoding or walking an order book side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Input buffer is not exactly one account long.
    #[error("data length is invalid, expected {expected} but got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Configured arena is larger than a `u32` handle can address.
    #[error("capacity of {capacity} slots cannot be addressed")]
    CapacityTooLarge { capacity: usize },

    /// A primitive read would run past the end of the buffer.
    #[error("read of {width} bytes at offset {offset} exceeds buffer of {len} bytes")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// A node slot carries a discriminant outside the known set.
    #[error("unknown node tag {tag} in slot {slot}")]
    UnknownNodeTag { slot: usize, tag: u32 },

    /// Account metadata carries an unknown data type.
    #[error("unknown account data type {0}")]
    UnknownDataType(u8),

    /// Account metadata names a known account kind that is not a book side.
    #[error("account is a {0:?}, not a book side")]
    NotABookSide(DataType),

    /// A root, child or free-list index points outside the arena.
    #[error("node handle {handle} is outside the arena of {capacity} slots")]
    DanglingHandle { handle: u32, capacity: usize },

    /// A link led to a slot of the wrong kind.
    #[error("node handle {handle} refers to an unexpected {kind:?} node")]
    UnexpectedNode { handle: u32, kind: NodeKind },

    /// The tree walk reached the same slot twice.
    #[error("node handle {handle} reached twice during tree walk")]
    CycleDetected { handle: u32 },

    /// Reachable leaves disagree with the header's leaf count.
    #[error("header declares {expected} leaves but the tree holds {found}")]
    LeafCountMismatch { expected: u64, found: u64 },

    /// The bump index claims more slots than the arena has.
    #[error("bump index {bump_index} exceeds arena capacity {capacity}")]
    BumpIndexOutOfBounds { bump_index: u64, capacity: usize },

    /// The free list does not terminate where its length says it should.
    #[error("free list broken at handle {handle} with {remaining} links remaining")]
    BrokenFreeList { handle: u32, remaining: u64 },

    /// Tree nodes plus free slots do not account for every bumped slot.
    #[error("bump index {bump_index} but {in_use} slots are in the tree or free list")]
    AllocationMismatch { bump_index: u64, in_use: u64 },
}

// ============================================================================
// Unit Tests
// ============================================================================
