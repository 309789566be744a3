//! Book side decoding and derived views.
//!
//! ## Architecture
//!
//! A book side account is a crit-bit tree stored in a fixed arena:
//!
//! - **Arena**: `capacity` fixed-width node slots, addressed by `u32` index
//! - **Allocator**: a bump index plus a free list threaded through retired slots
//! - **Tree**: inner nodes branch on key bits, leaf nodes are resting orders
//!
//! ## Components
//!
//! - [`OrderBookSide`]: decoded header and arena, plus validation
//! - [`extract`]: order lists by slot scan or by tree walk
//! - [`depth`]: best order, impact price, price levels
//!
//! ## Example
//!
//! ```no_run
//! use perp_book_slab::orderbook::{ImpactPrice, OrderBookSide};
//!
//! # fn fetch_account() -> Vec<u8> { unimplemented!() }
//! let bytes = fetch_account();
//! let asks = OrderBookSide::decode(&bytes)?;
//!
//! if let Some(best) = asks.best_order()? {
//!     println!("best ask {} x {}", best.price, best.quantity);
//! }
//! match asks.impact_price(1_000)? {
//!     ImpactPrice::Reached(price) => println!("impact {price}"),
//!     ImpactPrice::InsufficientDepth { available } => println!("only {available} lots"),
//! }
//! # Ok::<(), perp_book_slab::BookError>(())
//! ```

pub mod depth;
pub mod extract;
pub mod side;

#[cfg(test)]
pub(crate) mod testing;

pub use depth::{
    best_order, best_order_of, impact_price, impact_price_of, price_levels_of, priority_cmp,
    sorted_by_priority, total_quantity_of, ImpactPrice, PriceLevel,
};
pub use extract::list_orders;
pub use side::{OrderBookSide, SlabHeader};
