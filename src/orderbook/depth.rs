//! Price views over extracted orders.
//!
//! ## Price Ordering
//!
//! - **Bids**: highest price first
//! - **Asks**: lowest price first
//!
//! Orders at the same price are ordered by key in the same direction.
//! The low key bits are the sequence number (bit-inverted on bids), so
//! this is price-time priority on both sides.
//!
//! ## Depth
//!
//! Orders with zero quantity stay in the raw order list but are skipped
//! by every aggregate here (impact price, levels, totals). Other
//! quantities are summed as stored, negative ones included.
//!
//! ## Example
//!
//! ```
//! use perp_book_slab::config::DepthPolicy;
//! use perp_book_slab::orderbook::{impact_price_of, ImpactPrice};
//! use perp_book_slab::types::{BookSide, OrderView, Owner};
//!
//! let order = |price: i64, quantity: i64, seq: u64| OrderView {
//!     price,
//!     quantity,
//!     owner: Owner::default(),
//!     key: ((price as u128) << 64) | seq as u128,
//!     client_order_id: 0,
//!     slot: seq as u32,
//!     owner_slot: 0,
//!     order_type: 0,
//!     time_in_force: 0,
//!     best_initial: 0,
//!     timestamp: 0,
//! };
//! let asks = [order(100, 1, 0), order(90, 2, 1), order(110, 3, 2)];
//!
//! assert_eq!(
//!     impact_price_of(&asks, BookSide::Asks, 2, DepthPolicy::ScanOrder),
//!     ImpactPrice::Reached(90)
//! );
//! assert_eq!(
//!     impact_price_of(&asks, BookSide::Asks, 2, DepthPolicy::PriceTime),
//!     ImpactPrice::Reached(100)
//! );
//! ```

use std::cmp::Ordering;

use crate::config::DepthPolicy;
use crate::error::Result;
use crate::orderbook::OrderBookSide;
use crate::types::{BookSide, OrderView};

/// Outcome of walking the book for a given quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactPrice {
    /// Price of the order at which the running quantity first exceeded
    /// the requested quantity
    Reached(i64),
    /// The book ran out first; `available` is everything it held
    InsufficientDepth { available: i64 },
}

impl ImpactPrice {
    pub fn price(&self) -> Option<i64> {
        match self {
            ImpactPrice::Reached(price) => Some(*price),
            ImpactPrice::InsufficientDepth { .. } => None,
        }
    }
}

/// Aggregated quantity at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: i64,
    pub quantity: i64,
    pub order_count: usize,
}

/// Price-time priority comparison; `Less` means `a` is better.
pub fn priority_cmp(side: BookSide, a: &OrderView, b: &OrderView) -> Ordering {
    match side {
        BookSide::Asks => a.price.cmp(&b.price).then(a.key.cmp(&b.key)),
        BookSide::Bids => b.price.cmp(&a.price).then(b.key.cmp(&a.key)),
    }
}

/// Orders sorted best first.
pub fn sorted_by_priority(orders: &[OrderView], side: BookSide) -> Vec<OrderView> {
    let mut sorted = orders.to_vec();
    sorted.sort_by(|a, b| priority_cmp(side, a, b));
    sorted
}

/// Best order among `orders`, zero-quantity orders included.
pub fn best_order_of(orders: &[OrderView], side: BookSide) -> Option<OrderView> {
    orders.iter().min_by(|a, b| priority_cmp(side, a, b)).copied()
}

/// Price reached after consuming more than `quantity` from `orders`.
///
/// The running total must strictly exceed `quantity`, so asking for
/// exactly the whole book reports [`ImpactPrice::InsufficientDepth`].
pub fn impact_price_of(
    orders: &[OrderView],
    side: BookSide,
    quantity: i64,
    policy: DepthPolicy,
) -> ImpactPrice {
    let ordered = match policy {
        DepthPolicy::ScanOrder => orders.to_vec(),
        DepthPolicy::PriceTime => sorted_by_priority(orders, side),
    };

    let mut filled: i64 = 0;
    for order in ordered.iter().filter(|o| o.has_depth()) {
        filled = filled.saturating_add(order.quantity);
        if filled > quantity {
            return ImpactPrice::Reached(order.price);
        }
    }

    ImpactPrice::InsufficientDepth { available: filled }
}

/// Per-price aggregates, best price first.
pub fn price_levels_of(orders: &[OrderView], side: BookSide) -> Vec<PriceLevel> {
    let mut levels: Vec<PriceLevel> = Vec::new();

    for order in sorted_by_priority(orders, side)
        .iter()
        .filter(|o| o.has_depth())
    {
        match levels.last_mut() {
            Some(level) if level.price == order.price => {
                level.quantity = level.quantity.saturating_add(order.quantity);
                level.order_count += 1;
            }
            _ => levels.push(PriceLevel {
                price: order.price,
                quantity: order.quantity,
                order_count: 1,
            }),
        }
    }

    levels
}

/// Sum of remaining quantity over orders with depth.
pub fn total_quantity_of(orders: &[OrderView]) -> i64 {
    orders
        .iter()
        .filter(|o| o.has_depth())
        .fold(0i64, |acc, o| acc.saturating_add(o.quantity))
}

// ============================================================================
// Book side shortcuts (orders from `live_orders`; only the tree policy fails)
// ============================================================================

/// Best order on `side`.
pub fn best_order(side: &OrderBookSide) -> Result<Option<OrderView>> {
    Ok(best_order_of(&side.live_orders()?, side.side()))
}

/// Impact price on `side` for `quantity` under `policy`.
pub fn impact_price(
    side: &OrderBookSide,
    quantity: i64,
    policy: DepthPolicy,
) -> Result<ImpactPrice> {
    Ok(impact_price_of(&side.live_orders()?, side.side(), quantity, policy))
}

impl OrderBookSide {
    /// Best order by price-time priority.
    pub fn best_order(&self) -> Result<Option<OrderView>> {
        best_order(self)
    }

    /// Impact price under the configured depth policy.
    pub fn impact_price(&self, quantity: i64) -> Result<ImpactPrice> {
        impact_price(self, quantity, self.config().depth)
    }

    pub fn price_levels(&self) -> Result<Vec<PriceLevel>> {
        Ok(price_levels_of(&self.live_orders()?, self.side()))
    }

    pub fn total_quantity(&self) -> Result<i64> {
        Ok(total_quantity_of(&self.live_orders()?))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
