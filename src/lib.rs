//! # perp-book-slab
//!
//! Decoder for one side (bids or asks) of an on-chain perpetual order
//! book, and the trading views derived from it.
//!
//! ## Architecture
//!
//! Data flows strictly upward, each stage a pure function of the last:
//!
//! - **Layout**: one table of field offsets and widths, plus bounds-checked
//!   little-endian reads
//! - **Types**: account metadata, node records, order views
//! - **OrderBook**: slab decoding, order extraction, price aggregation
//!
//! ## Design Principles
//!
//! 1. **Decode only**: snapshots are never mutated or re-encoded
//! 2. **No guessing**: unknown tags and wrong lengths are errors, not defaults
//! 3. **Weak links**: arena indices are validated before every dereference
//! 4. **Explicit policies**: scan vs tree extraction, scan vs price-time depth
//!
//! ## Example
//!
//! ```no_run
//! use perp_book_slab::{OrderBookSide, SlabConfig, ExtractionPolicy};
//!
//! # fn fetch_account() -> Vec<u8> { unimplemented!() }
//! let bytes = fetch_account();
//! let config = SlabConfig::default().with_extraction(ExtractionPolicy::Tree);
//! let bids = OrderBookSide::decode_with(&bytes, &config)?;
//!
//! bids.validate()?;
//! for order in bids.live_orders()? {
//!     println!("{} @ {} from {}", order.quantity, order.price, order.owner);
//! }
//! # Ok::<(), perp_book_slab::BookError>(())
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Decoder configuration and market scaling
pub mod config;

/// Error taxonomy
pub mod error;

/// Byte layout schema and primitive reads
pub mod layout;

/// Core data types: MetaData, Node, OrderView
pub mod types;

/// Book side decoding, extraction and price views
pub mod orderbook;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{DepthPolicy, ExtractionPolicy, MarketScale, SlabConfig};
pub use error::{BookError, Result};
pub use orderbook::{ImpactPrice, OrderBookSide, PriceLevel, SlabHeader};
pub use types::{BookSide, DataType, Node, NodeKind, OrderView, Owner};
