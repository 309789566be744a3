//! Decoder configuration.
//!
//! ## Capacity
//!
//! The node capacity of a book side is fixed by the on-chain program and
//! is shared by the decoder (how many slots to read, hence the exact
//! account length) and the validator (bounds on the bump index and on
//! every link). [`SlabConfig::default`] matches the deployed program.
//!
//! ## Policies
//!
//! Two derived views have more than one defensible reading of a snapshot,
//! so the choice is explicit:
//!
//! | Policy | Variants | Default |
//! |--------|----------|---------|
//! | [`ExtractionPolicy`] | `Scan`, `Tree` | `Scan` |
//! | [`DepthPolicy`] | `ScanOrder`, `PriceTime` | `PriceTime` |
//!
//! ## Example
//!
//! ```
//! use perp_book_slab::config::{DepthPolicy, ExtractionPolicy, SlabConfig};
//!
//! let config = SlabConfig::default()
//!     .with_extraction(ExtractionPolicy::Tree)
//!     .with_depth(DepthPolicy::ScanOrder);
//!
//! assert_eq!(config.capacity, 1024);
//! assert_eq!(config.account_len(), Some(90_152));
//! ```

use rust_decimal::Decimal;

use crate::layout::{account_len, MAX_BOOK_NODES};

/// How live orders are found in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtractionPolicy {
    /// Every slot tagged as a leaf, in slot order.
    ///
    /// Does not follow the tree or consult the free list, so a leaf slot
    /// that was unlinked but never retagged is reported as live.
    #[default]
    Scan,
    /// In-order walk from the root, visiting exactly `leaf_count` leaves.
    Tree,
}

/// Order in which quantity is accumulated for an impact price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthPolicy {
    /// Extraction order, regardless of price.
    ScanOrder,
    /// Best price first, earlier orders first within a price.
    #[default]
    PriceTime,
}

/// Shape of a book side account and the policies applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabConfig {
    /// Number of node slots in the arena
    pub capacity: usize,
    pub extraction: ExtractionPolicy,
    pub depth: DepthPolicy,
}

impl Default for SlabConfig {
    fn default() -> Self {
        Self::with_capacity(MAX_BOOK_NODES)
    }
}

impl SlabConfig {
    /// Configuration for an arena of `capacity` slots with default policies.
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            extraction: ExtractionPolicy::Scan,
            depth: DepthPolicy::PriceTime,
        }
    }

    pub const fn with_extraction(mut self, extraction: ExtractionPolicy) -> Self {
        self.extraction = extraction;
        self
    }

    pub const fn with_depth(mut self, depth: DepthPolicy) -> Self {
        self.depth = depth;
        self
    }

    /// Exact account length this configuration decodes, `None` if the
    /// capacity is too large to address.
    pub const fn account_len(&self) -> Option<usize> {
        account_len(self.capacity)
    }
}

// ============================================================================
// MarketScale
// ============================================================================

/// Lot sizes and token decimals of a perp market.
///
/// Book prices are quote lots per base lot and quantities are base lots.
/// This converts both to human units using exact decimal arithmetic.
///
/// # Example
///
/// ```
/// use perp_book_slab::config::MarketScale;
/// use rust_decimal::Decimal;
///
/// // base token with 9 decimals, quote token with 6 decimals
/// let scale = MarketScale::new(10_000_000, 100, 9, 6);
///
/// assert_eq!(scale.price(3_500), Some(Decimal::from(35)));
/// assert_eq!(scale.quantity(150), Some(Decimal::new(15, 1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketScale {
    pub base_lot_size: i64,
    pub quote_lot_size: i64,
    pub base_decimals: u8,
    pub quote_decimals: u8,
}

impl MarketScale {
    pub const fn new(
        base_lot_size: i64,
        quote_lot_size: i64,
        base_decimals: u8,
        quote_decimals: u8,
    ) -> Self {
        Self {
            base_lot_size,
            quote_lot_size,
            base_decimals,
            quote_decimals,
        }
    }

    /// Convert a lot price to quote tokens per base token.
    ///
    /// Returns `None` on overflow or a zero base lot size.
    pub fn price(&self, price_lots: i64) -> Option<Decimal> {
        let numerator = Decimal::from(price_lots)
            .checked_mul(Decimal::from(self.quote_lot_size))?
            .checked_mul(pow10(self.base_decimals)?)?;
        let denominator =
            Decimal::from(self.base_lot_size).checked_mul(pow10(self.quote_decimals)?)?;
        if denominator.is_zero() {
            return None;
        }
        numerator.checked_div(denominator).map(|d| d.normalize())
    }

    /// Convert a lot quantity to base tokens.
    pub fn quantity(&self, quantity_lots: i64) -> Option<Decimal> {
        Decimal::from(quantity_lots)
            .checked_mul(Decimal::from(self.base_lot_size))?
            .checked_div(pow10(self.base_decimals)?)
            .map(|d| d.normalize())
    }
}

fn pow10(exp: u8) -> Option<Decimal> {
    10i64.checked_pow(u32::from(exp)).map(Decimal::from)
}

// ============================================================================
// Unit Tests
// ============================================================================
