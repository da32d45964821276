//! Row mappings for the catalog tables.

use crate::model::product::{Product, ProductOption};
use crate::model::validation::FieldViolation;
use crate::repo::{Record, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::Row;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

impl Record for Product {
    const TABLE: &'static str = "products";
    const ENTITY_NAME: &'static str = "Product";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "description", "price", "delivery_price"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.id.to_string()),
            Value::Text(self.name.clone()),
            optional_text(self.description.as_deref()),
            Value::Text(self.price.to_string()),
            Value::Text(self.delivery_price.to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_uuid(row, Self::TABLE, "id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            price: parse_decimal(row, Self::TABLE, "price")?,
            delivery_price: parse_decimal(row, Self::TABLE, "delivery_price")?,
        })
    }

    fn validate(&self) -> Vec<FieldViolation> {
        Product::validate(self)
    }
}

impl Record for ProductOption {
    const TABLE: &'static str = "product_options";
    const ENTITY_NAME: &'static str = "ProductOption";
    const COLUMNS: &'static [&'static str] = &["id", "product_id", "name", "description"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.id.to_string()),
            Value::Text(self.product_id.to_string()),
            Value::Text(self.name.clone()),
            optional_text(self.description.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: parse_uuid(row, Self::TABLE, "id")?,
            product_id: parse_uuid(row, Self::TABLE, "product_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
        })
    }

    fn validate(&self) -> Vec<FieldViolation> {
        ProductOption::validate(self)
    }
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

fn parse_uuid(row: &Row<'_>, table: &str, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in {table}.{column}"))
    })
}

fn parse_decimal(row: &Row<'_>, table: &str, column: &str) -> RepoResult<Decimal> {
    let text: String = row.get(column)?;
    Decimal::from_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid decimal value `{text}` in {table}.{column}"))
    })
}
