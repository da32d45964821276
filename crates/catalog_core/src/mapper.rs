//! Field projections between persistence records and DTOs.
//!
//! All projections are total and stateless: every field is copied as-is, no
//! defaulting and no validation happens here.

use crate::model::dto::{ProductEntity, ProductOptionEntity};
use crate::model::product::{Product, ProductOption};

impl From<&Product> for ProductEntity {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            delivery_price: product.delivery_price,
        }
    }
}

impl From<Product> for ProductEntity {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            delivery_price: product.delivery_price,
        }
    }
}

impl From<&ProductEntity> for Product {
    fn from(entity: &ProductEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            price: entity.price,
            delivery_price: entity.delivery_price,
        }
    }
}

impl From<&ProductOption> for ProductOptionEntity {
    fn from(option: &ProductOption) -> Self {
        Self {
            id: option.id,
            product_id: option.product_id,
            name: option.name.clone(),
            description: option.description.clone(),
        }
    }
}

impl From<ProductOption> for ProductOptionEntity {
    fn from(option: ProductOption) -> Self {
        Self {
            id: option.id,
            product_id: option.product_id,
            name: option.name,
            description: option.description,
        }
    }
}

impl From<&ProductOptionEntity> for ProductOption {
    fn from(entity: &ProductOptionEntity) -> Self {
        Self {
            id: entity.id,
            product_id: entity.product_id,
            name: entity.name.clone(),
            description: entity.description.clone(),
        }
    }
}

/// Maps a batch of records into DTOs, preserving order.
pub fn map_all<R, E>(records: Vec<R>) -> Vec<E>
where
    E: From<R>,
{
    records.into_iter().map(E::from).collect()
}

#[cfg(test)]
mod tests {
    use super::map_all;
    use crate::model::dto::{ProductEntity, ProductOptionEntity};
    use crate::model::product::{Product, ProductOption};
    use rust_decimal::Decimal;

    #[test]
    fn product_round_trips_through_entity() {
        let product = Product::new(
            "Widget",
            Some("blue".to_string()),
            Decimal::new(999, 2),
            Decimal::new(200, 2),
        );
        let entity = ProductEntity::from(&product);
        assert_eq!(Product::from(&entity), product);
        assert_eq!(entity.id, product.id);
        assert_eq!(entity.delivery_price, product.delivery_price);
    }

    #[test]
    fn option_round_trips_through_entity() {
        let product = Product::new("Widget", None, Decimal::ONE, Decimal::ZERO);
        let option = ProductOption::new(product.id, "Red", None);
        let entity = ProductOptionEntity::from(&option);
        assert_eq!(ProductOption::from(&entity), option);
    }

    #[test]
    fn map_all_keeps_order() {
        let first = Product::new("a", None, Decimal::ONE, Decimal::ONE);
        let second = Product::new("b", None, Decimal::ONE, Decimal::ONE);
        let ids = [first.id, second.id];
        let mapped: Vec<ProductEntity> = map_all(vec![first, second]);
        assert_eq!(mapped.iter().map(|e| e.id).collect::<Vec<_>>(), ids);
    }
}
