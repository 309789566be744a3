//! Order extraction from a decoded arena.
//!
//! ## Policies
//!
//! - [`ExtractionPolicy::Scan`]: every slot tagged as a leaf, in slot
//!   order. Cheap and infallible, but blind to the tree: a leaf slot that
//!   was unlinked without being retagged is still reported.
//! - [`ExtractionPolicy::Tree`]: in-order walk from the root (child 0
//!   before child 1, i.e. ascending key). Every link is bounds- and
//!   tag-checked, each slot may be reached once, and the walk must find
//!   exactly `leaf_count` leaves.
//!
//! Neither policy sorts by price; see [`depth`](crate::orderbook::depth)
//! for price-ordered views.

use tracing::trace;

use crate::config::ExtractionPolicy;
use crate::error::{BookError, Result};
use crate::orderbook::OrderBookSide;
use crate::types::{LeafNode, Node, NodeHandle, OrderView};

/// Extract the orders of `side` under `policy`.
///
/// Only [`ExtractionPolicy::Tree`] can fail.
pub fn list_orders(side: &OrderBookSide, policy: ExtractionPolicy) -> Result<Vec<OrderView>> {
    match policy {
        ExtractionPolicy::Scan => Ok(side.orders()),
        ExtractionPolicy::Tree => side.orders_in_tree(),
    }
}

/// Result of walking the tree from the root.
pub(crate) struct TreeWalk<'a> {
    /// Leaves in ascending key order
    pub leaves: Vec<(NodeHandle, &'a LeafNode)>,
    pub inner_count: u64,
}

/// Walk every node reachable from the root.
///
/// Does not compare the leaf total against the header; callers decide
/// what a mismatch means.
pub(crate) fn walk_tree(side: &OrderBookSide) -> Result<TreeWalk<'_>> {
    let mut walk = TreeWalk {
        leaves: Vec::new(),
        inner_count: 0,
    };
    let Some(root) = side.root() else {
        return Ok(walk);
    };

    let mut seen = vec![false; side.capacity()];
    let mut stack = vec![root];

    while let Some(handle) = stack.pop() {
        let node = side.checked_node(handle)?;
        let index = handle as usize;
        if seen[index] {
            return Err(BookError::CycleDetected { handle });
        }
        seen[index] = true;

        match node {
            Node::Inner(inner) => {
                walk.inner_count += 1;
                // Right pushed first so the left subtree is visited first
                stack.push(inner.children[1]);
                stack.push(inner.children[0]);
            }
            Node::Leaf(leaf) => walk.leaves.push((handle, leaf)),
            other => {
                return Err(BookError::UnexpectedNode {
                    handle,
                    kind: other.kind(),
                })
            }
        }
    }

    trace!(
        leaves = walk.leaves.len(),
        inner = walk.inner_count,
        "walked book side tree"
    );
    Ok(walk)
}

impl OrderBookSide {
    /// Every leaf-tagged slot, in slot order.
    ///
    /// This is the scan policy: it neither follows the tree nor consults
    /// the free list.
    pub fn orders(&self) -> Vec<OrderView> {
        self.nodes()
            .iter()
            .enumerate()
            .filter_map(|(slot, node)| {
                node.as_leaf()
                    .map(|leaf| OrderView::from_leaf(slot as NodeHandle, leaf))
            })
            .collect()
    }

    /// Orders reachable from the root, in ascending key order.
    ///
    /// Fails if a link is dangling or lands on a non-tree slot, if a slot
    /// is reached twice, or if the number of leaves found differs from
    /// the header's leaf count.
    pub fn orders_in_tree(&self) -> Result<Vec<OrderView>> {
        let walk = walk_tree(self)?;
        let found = walk.leaves.len() as u64;
        if found != self.header().leaf_count {
            return Err(BookError::LeafCountMismatch {
                expected: self.header().leaf_count,
                found,
            });
        }

        Ok(walk
            .leaves
            .into_iter()
            .map(|(handle, leaf)| OrderView::from_leaf(handle, leaf))
            .collect())
    }

    /// Orders under the policy this side was decoded with.
    pub fn live_orders(&self) -> Result<Vec<OrderView>> {
        list_orders(self, self.config().extraction)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
