//! Decoded book side account.
//!
//! ## Layout
//!
//! A book side is a 40-byte header followed by a fixed arena of node
//! slots. See [`crate::layout`] for the byte offsets.
//!
//! ## Arena
//!
//! The arena owns every slot. The root, child and free-list indices are
//! weak references: they are copied verbatim at decode time and only
//! dereferenced through [`OrderBookSide::checked_node`], which rejects
//! indices outside the arena.
//!
//! ## Example
//!
//! ```
//! use perp_book_slab::{BookError, OrderBookSide};
//!
//! let err = OrderBookSide::decode(&[0u8; 16]).unwrap_err();
//! assert_eq!(
//!     err,
//!     BookError::InvalidLength { expected: 90_152, actual: 16 }
//! );
//! ```

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::SlabConfig;
use crate::error::{BookError, Result};
use crate::layout::{header, reader, NODES_OFFSET, NODE_LEN};
use crate::orderbook::extract::walk_tree;
use crate::types::{BookSide, MetaData, Node, NodeHandle};

/// Fixed header preceding the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabHeader {
    pub metadata: MetaData,
    /// Next never-used slot
    pub bump_index: u64,
    pub free_list_len: u64,
    pub free_list_head: NodeHandle,
    /// Root of the tree; meaningless while `leaf_count` is zero
    pub root_node: NodeHandle,
    pub leaf_count: u64,
}

impl SlabHeader {
    /// Decode the header from the start of an account buffer.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        Ok(Self {
            metadata: MetaData::decode(header::METADATA.bytes(buf)?)?,
            bump_index: header::BUMP_INDEX.u64(buf)?,
            free_list_len: header::FREE_LIST_LEN.u64(buf)?,
            free_list_head: header::FREE_LIST_HEAD.u32(buf)?,
            root_node: header::ROOT_NODE.u32(buf)?,
            leaf_count: header::LEAF_COUNT.u64(buf)?,
        })
    }
}

/// One side of a perp order book, decoded from a single snapshot.
///
/// Immutable once decoded. Equal input bytes always produce equal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookSide {
    header: SlabHeader,
    side: BookSide,
    nodes: Vec<Node>,
    digest: [u8; 32],
    config: SlabConfig,
}

impl OrderBookSide {
    /// Decode a full-size book side account.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        Self::decode_with(buf, &SlabConfig::default())
    }

    /// Decode a book side account whose arena holds `config.capacity` slots.
    ///
    /// # Errors
    ///
    /// - [`BookError::CapacityTooLarge`] if `config.capacity` exceeds
    ///   [`MAX_CAPACITY`](crate::layout::MAX_CAPACITY)
    /// - [`BookError::InvalidLength`] if `buf` is not exactly
    ///   `config.account_len()` bytes
    /// - [`BookError::UnknownDataType`] / [`BookError::NotABookSide`] if the
    ///   metadata does not describe bids or asks
    /// - [`BookError::UnknownNodeTag`] if any slot carries an unknown tag
    pub fn decode_with(buf: &[u8], config: &SlabConfig) -> Result<Self> {
        let expected = config
            .account_len()
            .ok_or(BookError::CapacityTooLarge {
                capacity: config.capacity,
            })?;
        if buf.len() != expected {
            return Err(BookError::InvalidLength {
                expected,
                actual: buf.len(),
            });
        }

        let header = SlabHeader::decode(buf)?;
        let side = header.metadata.side()?;

        let region = reader::read_bytes(buf, NODES_OFFSET, expected - NODES_OFFSET)?;
        let nodes = region
            .chunks_exact(NODE_LEN)
            .enumerate()
            .map(|(slot, record)| Node::decode(slot, record))
            .collect::<Result<Vec<_>>>()?;

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(buf));

        debug!(
            side = ?side,
            bump_index = header.bump_index,
            free_list_len = header.free_list_len,
            leaf_count = header.leaf_count,
            digest = %hex::encode(&digest[..8]),
            "decoded book side"
        );

        Ok(Self {
            header,
            side,
            nodes,
            digest,
            config: *config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn header(&self) -> &SlabHeader {
        &self.header
    }

    #[inline]
    pub fn metadata(&self) -> &MetaData {
        &self.header.metadata
    }

    #[inline]
    pub fn side(&self) -> BookSide {
        self.side
    }

    #[inline]
    pub fn config(&self) -> &SlabConfig {
        &self.config
    }

    /// Number of slots in the arena
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle as usize)
    }

    /// Dereference a link, failing if it points outside the arena.
    pub fn checked_node(&self, handle: NodeHandle) -> Result<&Node> {
        self.node(handle).ok_or(BookError::DanglingHandle {
            handle,
            capacity: self.capacity(),
        })
    }

    /// Root of the tree, or `None` when the side holds no orders.
    #[inline]
    pub fn root(&self) -> Option<NodeHandle> {
        if self.header.leaf_count == 0 {
            None
        } else {
            Some(self.header.root_node)
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.header.leaf_count == 0
    }

    /// SHA-256 of the raw snapshot bytes
    #[inline]
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check the allocator and tree invariants of the snapshot.
    ///
    /// Decoding never assumes these hold. This reports the first
    /// violation found:
    ///
    /// 1. `bump_index <= capacity`
    /// 2. the free list has `free_list_len` links, all `Free` except the
    ///    last which is `LastFree`
    /// 3. the tree from the root is well formed and holds `leaf_count` leaves
    /// 4. tree nodes plus free slots account for every bumped slot
    pub fn validate(&self) -> Result<()> {
        let result = self.check_invariants();
        if let Err(err) = &result {
            warn!(side = ?self.side, error = %err, "book side failed validation");
        }
        result
    }

    fn check_invariants(&self) -> Result<()> {
        let capacity = self.capacity();
        let bump_index = self.header.bump_index;
        if bump_index > capacity as u64 {
            return Err(BookError::BumpIndexOutOfBounds {
                bump_index,
                capacity,
            });
        }

        self.check_free_list()?;

        let walk = walk_tree(self)?;
        let leaves = walk.leaves.len() as u64;
        if leaves != self.header.leaf_count {
            return Err(BookError::LeafCountMismatch {
                expected: self.header.leaf_count,
                found: leaves,
            });
        }

        let in_use = leaves + walk.inner_count + self.header.free_list_len;
        if in_use != bump_index {
            return Err(BookError::AllocationMismatch { bump_index, in_use });
        }

        Ok(())
    }

    fn check_free_list(&self) -> Result<()> {
        let mut remaining = self.header.free_list_len;
        let mut handle = self.header.free_list_head;

        if remaining > self.capacity() as u64 {
            return Err(BookError::BrokenFreeList { handle, remaining });
        }

        while remaining > 0 {
            let next = match (self.checked_node(handle)?, remaining) {
                (Node::LastFree { next }, 1) => *next,
                (Node::Free { next }, r) if r > 1 => *next,
                _ => return Err(BookError::BrokenFreeList { handle, remaining }),
            };
            handle = next;
            remaining -= 1;
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
