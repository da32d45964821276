//! Externally-facing DTO shapes.
//!
//! # Invariants
//! - Field sets mirror `Product` / `ProductOption` one-to-one.
//! - Serialized names use PascalCase to match the public API contract.
//! - Prices travel as decimal strings (`"9.99"`) so no digit is lost.
//! - `Id` may be omitted on input; it deserializes to the nil UUID and is
//!   ignored by create calls.

use crate::model::product::{ProductId, ProductOptionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Public representation of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductEntity {
    #[serde(default)]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub delivery_price: Decimal,
}

/// Public representation of a product option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductOptionEntity {
    #[serde(default)]
    pub id: ProductOptionId,
    #[serde(default)]
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
