//! Account metadata block.
//!
//! Every account owned by the exchange program starts with an 8-byte
//! metadata block. Only the data type matters to this crate: it tells a
//! bids account from an asks account, which fixes the sort direction of
//! every price view.

use crate::error::{BookError, Result};
use crate::layout::metadata as field;

// ============================================================================
// DataType enum
// ============================================================================

/// Account kind discriminator.
///
/// Represented as u8 on-chain. Unknown values are rejected rather than
/// mapped onto a nearby kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    MangoGroup,
    MangoAccount,
    RootBank,
    NodeBank,
    PerpMarket,
    Bids,
    Asks,
    MangoCache,
    EventQueue,
    AdvancedOrders,
    ReferrerMemory,
    ReferrerIdRecord,
}

impl DataType {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            DataType::MangoGroup => 0,
            DataType::MangoAccount => 1,
            DataType::RootBank => 2,
            DataType::NodeBank => 3,
            DataType::PerpMarket => 4,
            DataType::Bids => 5,
            DataType::Asks => 6,
            DataType::MangoCache => 7,
            DataType::EventQueue => 8,
            DataType::AdvancedOrders => 9,
            DataType::ReferrerMemory => 10,
            DataType::ReferrerIdRecord => 11,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DataType::MangoGroup),
            1 => Some(DataType::MangoAccount),
            2 => Some(DataType::RootBank),
            3 => Some(DataType::NodeBank),
            4 => Some(DataType::PerpMarket),
            5 => Some(DataType::Bids),
            6 => Some(DataType::Asks),
            7 => Some(DataType::MangoCache),
            8 => Some(DataType::EventQueue),
            9 => Some(DataType::AdvancedOrders),
            10 => Some(DataType::ReferrerMemory),
            11 => Some(DataType::ReferrerIdRecord),
            _ => None,
        }
    }
}

// ============================================================================
// BookSide enum
// ============================================================================

/// Which side of the book an account holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    /// Buy orders - best is the highest price
    Bids,
    /// Sell orders - best is the lowest price
    Asks,
}

impl BookSide {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            BookSide::Bids => BookSide::Asks,
            BookSide::Asks => BookSide::Bids,
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            BookSide::Bids => DataType::Bids,
            BookSide::Asks => DataType::Asks,
        }
    }
}

impl TryFrom<DataType> for BookSide {
    type Error = BookError;

    fn try_from(data_type: DataType) -> Result<Self> {
        match data_type {
            DataType::Bids => Ok(BookSide::Bids),
            DataType::Asks => Ok(BookSide::Asks),
            other => Err(BookError::NotABookSide(other)),
        }
    }
}

// ============================================================================
// MetaData struct
// ============================================================================

/// Decoded account metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaData {
    pub data_type: DataType,
    pub version: u8,
    pub is_initialized: bool,
    pub extra_info: [u8; 5],
}

impl MetaData {
    /// Decode the metadata block from the first bytes of `block`.
    pub fn decode(block: &[u8]) -> Result<Self> {
        let raw_type = field::DATA_TYPE.u8(block)?;
        let data_type = DataType::from_u8(raw_type).ok_or(BookError::UnknownDataType(raw_type))?;

        Ok(Self {
            data_type,
            version: field::VERSION.u8(block)?,
            is_initialized: field::IS_INITIALIZED.u8(block)? != 0,
            extra_info: field::EXTRA_INFO.array(block)?,
        })
    }

    /// The book side this account holds.
    pub fn side(&self) -> Result<BookSide> {
        BookSide::try_from(self.data_type)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
