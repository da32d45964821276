//! Product and product option persistence records.
//!
//! # Responsibility
//! - Define the canonical stored shape of products and options.
//! - Enforce field-level rules through `validate()`.
//!
//! # Invariants
//! - `id` is generated once and never mutated afterwards.
//! - `ProductOption::product_id` must reference a live product.

use crate::model::validation::FieldViolation;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Stable product identifier.
pub type ProductId = Uuid;

/// Stable product option identifier.
pub type ProductOptionId = Uuid;

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Stored product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub delivery_price: Decimal,
}

/// Stored product option record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    pub id: ProductOptionId,
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
}

impl Product {
    /// Creates a product with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        price: Decimal,
        delivery_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            price,
            delivery_price,
        }
    }

    /// Returns every field rule this record currently breaks.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.id.is_nil() {
            violations.push(FieldViolation::new("Id", "The Id field must not be empty."));
        }
        check_name(&self.name, &mut violations);
        check_description(self.description.as_deref(), &mut violations);
        if self.price < Decimal::ZERO {
            violations.push(FieldViolation::new(
                "Price",
                "The Price field must not be negative.",
            ));
        }
        if self.delivery_price < Decimal::ZERO {
            violations.push(FieldViolation::new(
                "DeliveryPrice",
                "The DeliveryPrice field must not be negative.",
            ));
        }
        violations
    }
}

impl ProductOption {
    /// Creates an option under `product_id` with a freshly generated id.
    pub fn new(product_id: ProductId, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            name: name.into(),
            description,
        }
    }

    /// Returns every field rule this record currently breaks.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.id.is_nil() {
            violations.push(FieldViolation::new("Id", "The Id field must not be empty."));
        }
        if self.product_id.is_nil() {
            violations.push(FieldViolation::new(
                "ProductId",
                "The ProductId field must reference a product.",
            ));
        }
        check_name(&self.name, &mut violations);
        check_description(self.description.as_deref(), &mut violations);
        violations
    }
}

fn check_name(name: &str, violations: &mut Vec<FieldViolation>) {
    if name.trim().is_empty() {
        violations.push(FieldViolation::new("Name", "The Name field is required."));
    } else if name.chars().count() > NAME_MAX_CHARS {
        violations.push(FieldViolation::new(
            "Name",
            format!("The Name field must be at most {NAME_MAX_CHARS} characters."),
        ));
    }
}

fn check_description(description: Option<&str>, violations: &mut Vec<FieldViolation>) {
    if let Some(value) = description {
        if value.chars().count() > DESCRIPTION_MAX_CHARS {
            violations.push(FieldViolation::new(
                "Description",
                format!("The Description field must be at most {DESCRIPTION_MAX_CHARS} characters."),
            ));
        }
    }
}
