//! Product use-case service.
//!
//! # Invariants
//! - Update overwrites every mutable field; there is no partial patch.
//! - Deleting a product removes all of its options in the same commit.

use crate::mapper::map_all;
use crate::model::dto::ProductEntity;
use crate::model::product::{Product, ProductId};
use crate::repo::{Record, Repository};
use crate::service::{require_id, run_in_transaction, ServiceError, ServiceResult};
use crate::uow::UnitOfWork;

const UNSET_PRODUCT_ID: &str = "product id is unset";

/// Product service over one borrowed unit of work.
pub struct ProductService<'uow> {
    uow: &'uow UnitOfWork,
}

impl<'uow> ProductService<'uow> {
    pub fn new(uow: &'uow UnitOfWork) -> Self {
        Self { uow }
    }

    /// Lists every product; empty when the catalog is empty.
    pub fn list_products(&self) -> ServiceResult<Vec<ProductEntity>> {
        Ok(map_all(self.uow.products().get_all()?))
    }

    /// Lists products whose name equals `name` exactly.
    pub fn find_products_by_name(&self, name: &str) -> ServiceResult<Vec<ProductEntity>> {
        Ok(map_all(self.uow.products().get_all_by("name", name)?))
    }

    /// Gets one product; `None` when it does not exist.
    pub fn get_product(&self, id: ProductId) -> ServiceResult<Option<ProductEntity>> {
        require_id(id, UNSET_PRODUCT_ID)?;
        Ok(self.uow.products().get_by_id(id)?.map(ProductEntity::from))
    }

    /// Creates a product under a newly generated id and returns that id.
    ///
    /// The DTO `id` is ignored.
    pub fn create_product(&self, entity: &ProductEntity) -> ServiceResult<ProductId> {
        run_in_transaction(self.uow, "create_product", |uow| {
            let product = Product::new(
                entity.name.clone(),
                entity.description.clone(),
                entity.price,
                entity.delivery_price,
            );
            uow.products().insert(&product)?;
            Ok(product.id)
        })
    }

    /// Overwrites every mutable field of product `id` from `entity`.
    pub fn update_product(&self, id: ProductId, entity: &ProductEntity) -> ServiceResult<()> {
        require_id(id, UNSET_PRODUCT_ID)?;
        run_in_transaction(self.uow, "update_product", |uow| {
            let mut product = existing_product(uow, id)?;
            product.name = entity.name.clone();
            product.description = entity.description.clone();
            product.price = entity.price;
            product.delivery_price = entity.delivery_price;
            uow.products().update(&product)?;
            Ok(())
        })
    }

    /// Deletes product `id` together with all of its options.
    pub fn delete_product(&self, id: ProductId) -> ServiceResult<()> {
        require_id(id, UNSET_PRODUCT_ID)?;
        run_in_transaction(self.uow, "delete_product", |uow| {
            let product = existing_product(uow, id)?;
            uow.products().delete(&product)?;
            for option in uow.product_options().get_all_by("product_id", id)? {
                uow.product_options().delete(&option)?;
            }
            Ok(())
        })
    }
}

fn existing_product(uow: &UnitOfWork, id: ProductId) -> ServiceResult<Product> {
    uow.products()
        .get_by_id(id)?
        .ok_or(ServiceError::NotFound {
            entity: Product::ENTITY_NAME,
            id,
        })
}
