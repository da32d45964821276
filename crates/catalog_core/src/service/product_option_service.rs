//! Product option use-case service.
//!
//! Options are always addressed through their parent product: an option id
//! under the wrong product is treated as absent.

use crate::mapper::map_all;
use crate::model::dto::ProductOptionEntity;
use crate::model::product::{Product, ProductId, ProductOption, ProductOptionId};
use crate::repo::{Record, Repository};
use crate::service::{require_id, run_in_transaction, ServiceError, ServiceResult};
use crate::uow::UnitOfWork;

const UNSET_PRODUCT_ID: &str = "product id is unset";
const UNSET_OPTION_ID: &str = "product option id is unset";

/// Product option service over one borrowed unit of work.
pub struct ProductOptionService<'uow> {
    uow: &'uow UnitOfWork,
}

impl<'uow> ProductOptionService<'uow> {
    pub fn new(uow: &'uow UnitOfWork) -> Self {
        Self { uow }
    }

    /// Lists the options of `product_id`; empty when it has none.
    pub fn list_options(&self, product_id: ProductId) -> ServiceResult<Vec<ProductOptionEntity>> {
        require_id(product_id, UNSET_PRODUCT_ID)?;
        let options = self
            .uow
            .product_options()
            .get_all_by("product_id", product_id)?;
        Ok(map_all(options))
    }

    /// Gets option `option_id` of `product_id`.
    pub fn get_option(
        &self,
        product_id: ProductId,
        option_id: ProductOptionId,
    ) -> ServiceResult<Option<ProductOptionEntity>> {
        require_id(product_id, UNSET_PRODUCT_ID)?;
        require_id(option_id, UNSET_OPTION_ID)?;
        Ok(find_option(self.uow, product_id, option_id)?.map(ProductOptionEntity::from))
    }

    /// Adds an option to `product_id` under a newly generated id.
    ///
    /// The DTO `id` and `product_id` are ignored.
    pub fn create_option(
        &self,
        product_id: ProductId,
        entity: &ProductOptionEntity,
    ) -> ServiceResult<ProductOptionId> {
        require_id(product_id, UNSET_PRODUCT_ID)?;
        run_in_transaction(self.uow, "create_option", |uow| {
            if uow.products().get_by_id(product_id)?.is_none() {
                return Err(ServiceError::NotFound {
                    entity: Product::ENTITY_NAME,
                    id: product_id,
                });
            }
            let option =
                ProductOption::new(product_id, entity.name.clone(), entity.description.clone());
            uow.product_options().insert(&option)?;
            Ok(option.id)
        })
    }

    /// Overwrites name and description of option `option_id`.
    pub fn update_option(
        &self,
        product_id: ProductId,
        option_id: ProductOptionId,
        entity: &ProductOptionEntity,
    ) -> ServiceResult<()> {
        require_id(product_id, UNSET_PRODUCT_ID)?;
        require_id(option_id, UNSET_OPTION_ID)?;
        run_in_transaction(self.uow, "update_option", |uow| {
            let mut option = existing_option(uow, product_id, option_id)?;
            option.name = entity.name.clone();
            option.description = entity.description.clone();
            uow.product_options().update(&option)?;
            Ok(())
        })
    }

    /// Deletes option `option_id` of `product_id`.
    pub fn delete_option(
        &self,
        product_id: ProductId,
        option_id: ProductOptionId,
    ) -> ServiceResult<()> {
        require_id(product_id, UNSET_PRODUCT_ID)?;
        require_id(option_id, UNSET_OPTION_ID)?;
        run_in_transaction(self.uow, "delete_option", |uow| {
            let option = existing_option(uow, product_id, option_id)?;
            uow.product_options().delete(&option)?;
            Ok(())
        })
    }
}

fn find_option(
    uow: &UnitOfWork,
    product_id: ProductId,
    option_id: ProductOptionId,
) -> ServiceResult<Option<ProductOption>> {
    Ok(uow
        .product_options()
        .get_by_id(option_id)?
        .filter(|option| option.product_id == product_id))
}

fn existing_option(
    uow: &UnitOfWork,
    product_id: ProductId,
    option_id: ProductOptionId,
) -> ServiceResult<ProductOption> {
    find_option(uow, product_id, option_id)?.ok_or(ServiceError::NotFound {
        entity: ProductOption::ENTITY_NAME,
        id: option_id,
    })
}
