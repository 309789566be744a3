//! Core data types for book side decoding
//!
//! ## Types
//!
//! - [`MetaData`] / [`DataType`] / [`BookSide`]: account metadata block
//! - [`Node`]: one arena slot (inner, leaf, free, ...)
//! - [`OrderView`]: a resting order as exposed to consumers
//! - [`Owner`]: 32-byte owner public key
//!
//! ## Lots
//!
//! All prices and quantities are raw on-chain integers: prices in quote
//! lots per base lot, quantities in base lots.

mod metadata;
mod node;
mod order;

// Re-export all types at module level
pub use metadata::{BookSide, DataType, MetaData};
pub use node::{InnerNode, LeafNode, Node, NodeHandle, NodeKind};
pub use order::{OrderView, Owner};
