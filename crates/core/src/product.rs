//! Product model and the typed commands that create and modify it.
//!
//! Form submissions arrive as a [`ProductInput`] of optional strings. They are
//! validated into a [`NewProduct`] (create) or a [`ProductPatch`] (update)
//! before any storage is touched.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{ProductId, UserId};

/// Threshold used wherever a fixed "low stock" cut-off is needed instead of
/// a product's own `low_stock_at`.
pub const FIXED_LOW_STOCK_THRESHOLD: i32 = 5;

/// Upper bound for a unit price (matches `NUMERIC(12, 2)`).
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// A product owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub user_id: UserId,
    pub name: String,
    pub sku: Option<String>,
    /// Unit price.
    pub price: Decimal,
    pub quantity: i32,
    /// Per-product alert threshold. `None` disables low-stock tracking.
    pub low_stock_at: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is at or below its own threshold.
    ///
    /// Products without a threshold are never low.
    #[must_use]
    pub const fn is_low(&self) -> bool {
        match self.low_stock_at {
            Some(threshold) => self.quantity <= threshold,
            None => false,
        }
    }

    /// Fill of the stock bar shown in the inventory table, from 0 to 100.
    ///
    /// With a threshold the bar is full once quantity reaches the threshold;
    /// without one it is full at 100 units.
    #[must_use]
    pub fn stock_fill_percent(&self) -> u8 {
        let quantity = i64::from(self.quantity.max(0));
        let percent = self.low_stock_at.map_or(quantity, |threshold| {
            quantity * 100 / i64::from(threshold.max(1))
        });
        u8::try_from(percent.min(100)).unwrap_or(100)
    }

    /// Badge shown next to recently added products.
    ///
    /// A missing or zero threshold falls back to the fixed threshold.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        let threshold = match self.low_stock_at {
            Some(threshold) if threshold > 0 => threshold,
            _ => FIXED_LOW_STOCK_THRESHOLD,
        };
        if self.quantity == 0 {
            StockLevel::OutOfStock
        } else if self.quantity <= threshold {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }

    /// Price multiplied by quantity on hand.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Check that `user_id` owns this product.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Unauthorized`] for any other user.
    pub fn ensure_owned_by(&self, user_id: UserId) -> Result<(), DomainError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(DomainError::Unauthorized)
        }
    }
}

/// Coarse stock state used for dashboard badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of stock",
            Self::Low => "Low",
            Self::InStock => "In stock",
        }
    }
}

/// Raw product form as submitted by the browser.
///
/// Every field is optional text; nothing here has been validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub low_stock_at: Option<String>,
}

impl ProductInput {
    /// The product targeted by an update or delete.
    ///
    /// # Errors
    ///
    /// A missing or blank id is a validation error. An id that is not a
    /// valid UUID cannot reference any product and is reported as not found.
    pub fn product_id(&self) -> Result<ProductId, DomainError> {
        let raw = filled(self.product_id.as_deref())
            .ok_or_else(|| DomainError::validation("product id is required"))?;
        raw.parse().map_err(|_| DomainError::NotFound)
    }
}

/// A validated create command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub sku: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub low_stock_at: Option<i32>,
}

impl TryFrom<&ProductInput> for NewProduct {
    type Error = DomainError;

    /// `name` is required. Blank `price` and `quantity` default to zero and a
    /// blank `sku` or `lowStockAt` is stored as null.
    fn try_from(input: &ProductInput) -> Result<Self, Self::Error> {
        let name = filled(input.name.as_deref())
            .ok_or_else(|| DomainError::validation("name is required"))?
            .to_owned();

        Ok(Self {
            name,
            sku: filled(input.sku.as_deref()).map(str::to_owned),
            price: filled(input.price.as_deref())
                .map(parse_price)
                .transpose()?
                .unwrap_or(Decimal::ZERO),
            quantity: filled(input.quantity.as_deref())
                .map(|v| parse_count("quantity", v))
                .transpose()?
                .unwrap_or(0),
            low_stock_at: filled(input.low_stock_at.as_deref())
                .map(|v| parse_count("low stock threshold", v))
                .transpose()?,
        })
    }
}

/// What an update does to the low-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdChange {
    /// Field absent from the submission.
    Keep,
    /// Field submitted empty.
    Clear,
    Set(i32),
}

/// A validated partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub low_stock_at: ThresholdChange,
}

impl TryFrom<&ProductInput> for ProductPatch {
    type Error = DomainError;

    fn try_from(input: &ProductInput) -> Result<Self, Self::Error> {
        let low_stock_at = match input.low_stock_at.as_deref().map(str::trim) {
            None => ThresholdChange::Keep,
            Some("") => ThresholdChange::Clear,
            Some(v) => ThresholdChange::Set(parse_count("low stock threshold", v)?),
        };

        Ok(Self {
            name: filled(input.name.as_deref()).map(str::to_owned),
            sku: filled(input.sku.as_deref()).map(str::to_owned),
            price: filled(input.price.as_deref()).map(parse_price).transpose()?,
            quantity: filled(input.quantity.as_deref())
                .map(|v| parse_count("quantity", v))
                .transpose()?,
            low_stock_at,
        })
    }
}

impl ProductPatch {
    /// Apply the patch, leaving identity, owner and creation time untouched.
    #[must_use]
    pub fn apply(&self, mut product: Product) -> Product {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(sku) = &self.sku {
            product.sku = Some(sku.clone());
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        match self.low_stock_at {
            ThresholdChange::Keep => {}
            ThresholdChange::Clear => product.low_stock_at = None,
            ThresholdChange::Set(threshold) => product.low_stock_at = Some(threshold),
        }
        product
    }
}

/// Trimmed value, or `None` when absent or blank.
fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(raw: &str) -> Result<Decimal, DomainError> {
    let price = Decimal::from_str(raw)
        .map_err(|_| DomainError::validation(format!("price must be a number, got {raw:?}")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::validation("price cannot be negative"));
    }
    if price >= MAX_PRICE {
        return Err(DomainError::validation("price is too large"));
    }
    Ok(price.round_dp(2))
}

fn parse_count(field: &str, raw: &str) -> Result<i32, DomainError> {
    let value: i32 = raw
        .parse()
        .map_err(|_| DomainError::validation(format!("{field} must be a whole number")))?;
    if value < 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(value)
}
