//! Claim line items
//!
//! A line item's charged amount is derived from its quantity and unit price.
//! It has no setter; every path that changes either input recomputes it,
//! including deserialization, which ignores any charged amount on the wire.
//! A product that does not fit in a `Decimal` is an error, never a panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// Computes `quantity * unit_price`
pub fn charged_amount(quantity: u32, unit_price: Decimal) -> Result<Decimal, ClaimError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(ClaimError::ChargeOverflow { quantity, unit_price })
}

/// A billed service line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineItemRecord", into = "LineItemRecord")]
pub struct LineItem {
    procedure_code: String,
    quantity: u32,
    unit_price: Decimal,
    charged_amount: Decimal,
}

/// Wire shape of a line item
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LineItemRecord {
    procedure_code: String,
    quantity: u32,
    unit_price: Decimal,
    #[serde(default, skip_deserializing)]
    charged_amount: Decimal,
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = ClaimError;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        LineItem::new(record.procedure_code, record.quantity, record.unit_price)
    }
}

impl From<LineItem> for LineItemRecord {
    fn from(item: LineItem) -> Self {
        LineItemRecord {
            procedure_code: item.procedure_code,
            quantity: item.quantity,
            unit_price: item.unit_price,
            charged_amount: item.charged_amount,
        }
    }
}

impl LineItem {
    pub fn new(
        procedure_code: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, ClaimError> {
        Ok(Self {
            procedure_code: procedure_code.into(),
            quantity,
            unit_price,
            charged_amount: charged_amount(quantity, unit_price)?,
        })
    }

    pub fn procedure_code(&self) -> &str {
        &self.procedure_code
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn charged_amount(&self) -> Decimal {
        self.charged_amount
    }

    /// Leaves the item untouched when the new charge would overflow
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), ClaimError> {
        self.charged_amount = charged_amount(quantity, self.unit_price)?;
        self.quantity = quantity;
        Ok(())
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) -> Result<(), ClaimError> {
        self.charged_amount = charged_amount(self.quantity, unit_price)?;
        self.unit_price = unit_price;
        Ok(())
    }
}
