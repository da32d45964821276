use catalog_core::db::open_db_in_memory;
use catalog_core::{
    MemoryDiagnosticSink, ProductEntity, ProductOptionEntity, ProductOptionService,
    ProductService, ServiceError, UnitOfWork,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn widget_with_red_option_lifecycle() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let options = ProductOptionService::new(&uow);

    let product_id = products
        .create_product(&product_dto("Widget", 999, 200))
        .unwrap();
    let created = products.get_product(product_id).unwrap().unwrap();
    assert_eq!(created.id, product_id);
    assert_eq!(created.name, "Widget");
    assert_eq!(created.price, Decimal::new(999, 2));
    assert_eq!(created.delivery_price, Decimal::new(200, 2));

    let option_id = options
        .create_option(product_id, &option_dto("Red"))
        .unwrap();
    let red = options.get_option(product_id, option_id).unwrap().unwrap();
    assert_eq!(red.product_id, product_id);
    assert_eq!(red.name, "Red");

    products.delete_product(product_id).unwrap();

    assert!(products.get_product(product_id).unwrap().is_none());
    assert!(options.get_option(product_id, option_id).unwrap().is_none());
    assert!(options.list_options(product_id).unwrap().is_empty());
}

#[test]
fn created_ids_are_generated_and_unique() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);

    let mut dto = product_dto("Widget", 100, 0);
    dto.id = Uuid::new_v4();

    let mut seen = HashSet::new();
    for _ in 0..5 {
        let id = products.create_product(&dto).unwrap();
        assert!(!id.is_nil());
        assert_ne!(id, dto.id);
        assert!(seen.insert(id), "id {id} was generated twice");
    }
}

#[test]
fn reads_of_missing_data_are_empty_not_errors() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let options = ProductOptionService::new(&uow);

    assert!(products.list_products().unwrap().is_empty());
    assert!(products.find_products_by_name("Widget").unwrap().is_empty());
    assert!(products.get_product(Uuid::new_v4()).unwrap().is_none());
    assert!(options.list_options(Uuid::new_v4()).unwrap().is_empty());
    assert!(options
        .get_option(Uuid::new_v4(), Uuid::new_v4())
        .unwrap()
        .is_none());
}

#[test]
fn find_products_by_name_matches_exactly() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let first = products.create_product(&product_dto("Widget", 100, 0)).unwrap();
    products.create_product(&product_dto("Gadget", 100, 0)).unwrap();
    let second = products.create_product(&product_dto("Widget", 300, 0)).unwrap();

    let found: Vec<Uuid> = products
        .find_products_by_name("Widget")
        .unwrap()
        .into_iter()
        .map(|product| product.id)
        .collect();
    assert_eq!(found, vec![first, second]);
    assert_eq!(products.list_products().unwrap().len(), 3);
}

#[test]
fn update_product_overwrites_all_mutable_fields() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let mut original = product_dto("Widget", 999, 200);
    original.description = Some("blue".to_string());
    let id = products.create_product(&original).unwrap();

    let replacement = ProductEntity {
        id: Uuid::new_v4(),
        name: "Widget Pro".to_string(),
        description: None,
        price: Decimal::new(1999, 2),
        delivery_price: Decimal::ZERO,
    };
    products.update_product(id, &replacement).unwrap();

    let stored = products.get_product(id).unwrap().unwrap();
    assert_eq!(
        stored,
        ProductEntity {
            id,
            ..replacement
        }
    );
}

#[test]
fn update_or_delete_of_missing_product_is_not_found() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let missing = Uuid::new_v4();

    let update = products.update_product(missing, &product_dto("x", 1, 1));
    assert!(matches!(update, Err(ServiceError::NotFound { entity: "Product", id }) if id == missing));
    let delete = products.delete_product(missing);
    assert!(matches!(delete, Err(ServiceError::NotFound { .. })));
}

#[test]
fn invalid_update_keeps_original_and_records_diagnostics() {
    let sink = MemoryDiagnosticSink::new();
    let uow = UnitOfWork::in_memory()
        .unwrap()
        .with_diagnostics(sink.clone());
    let products = ProductService::new(&uow);
    let id = products.create_product(&product_dto("Widget", 999, 200)).unwrap();

    let err = products
        .update_product(id, &product_dto("", -5, 200))
        .unwrap_err();

    match err {
        ServiceError::Validation(failure) => assert_eq!(failure.violation_count(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!sink.lines().is_empty());
    assert_eq!(products.get_product(id).unwrap().unwrap().name, "Widget");
}

#[test]
fn cascade_removes_every_option_of_deleted_product() {
    for option_count in 0..4 {
        let uow = UnitOfWork::in_memory().unwrap();
        let products = ProductService::new(&uow);
        let options = ProductOptionService::new(&uow);

        let doomed = products.create_product(&product_dto("doomed", 100, 0)).unwrap();
        let kept = products.create_product(&product_dto("kept", 100, 0)).unwrap();
        for index in 0..option_count {
            options
                .create_option(doomed, &option_dto(&format!("option {index}")))
                .unwrap();
        }
        let kept_option = options.create_option(kept, &option_dto("stays")).unwrap();

        products.delete_product(doomed).unwrap();

        assert!(options.list_options(doomed).unwrap().is_empty());
        let remaining: Vec<Uuid> = options
            .list_options(kept)
            .unwrap()
            .into_iter()
            .map(|option| option.id)
            .collect();
        assert_eq!(remaining, vec![kept_option]);
    }
}

#[test]
fn failed_option_cascade_leaves_product_in_place() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER block_option_delete
         BEFORE DELETE ON product_options
         BEGIN
             SELECT RAISE(ABORT, 'option delete blocked');
         END;",
    )
    .unwrap();
    let uow = UnitOfWork::new(conn);
    let products = ProductService::new(&uow);
    let options = ProductOptionService::new(&uow);

    let product_id = products.create_product(&product_dto("Widget", 999, 200)).unwrap();
    let option_id = options.create_option(product_id, &option_dto("Red")).unwrap();

    let err = products.delete_product(product_id).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    assert!(products.get_product(product_id).unwrap().is_some());
    assert!(options.get_option(product_id, option_id).unwrap().is_some());
    assert_eq!(uow.pending_writes(), 0);
}

#[test]
fn cascade_only_reads_options_of_deleted_product() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO products (id, name, price, delivery_price)
         VALUES ('00000000-0000-4000-8000-000000000001', 'legacy', '1', '0');
         INSERT INTO product_options (id, product_id, name)
         VALUES ('not-a-uuid', '00000000-0000-4000-8000-000000000001', 'broken');",
    )
    .unwrap();
    let uow = UnitOfWork::new(conn);
    let products = ProductService::new(&uow);
    let options = ProductOptionService::new(&uow);

    let product_id = products.create_product(&product_dto("Widget", 999, 200)).unwrap();
    options.create_option(product_id, &option_dto("Red")).unwrap();

    products.delete_product(product_id).unwrap();

    assert!(products.get_product(product_id).unwrap().is_none());
    assert!(options.list_options(product_id).unwrap().is_empty());
}

#[test]
fn unset_ids_fail_fast_without_store_access() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let options = ProductOptionService::new(&uow);
    let dto = product_dto("Widget", 1, 1);
    let option = option_dto("Red");
    let some_id = Uuid::new_v4();
    let before = uow.store_access_count();

    let results = [
        products.get_product(Uuid::nil()).map(|_| ()),
        products.update_product(Uuid::nil(), &dto),
        products.delete_product(Uuid::nil()),
        options.list_options(Uuid::nil()).map(|_| ()),
        options.get_option(Uuid::nil(), some_id).map(|_| ()),
        options.get_option(some_id, Uuid::nil()).map(|_| ()),
        options.create_option(Uuid::nil(), &option).map(|_| ()),
        options.update_option(some_id, Uuid::nil(), &option),
        options.delete_option(Uuid::nil(), some_id),
    ];

    for result in results {
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }
    assert_eq!(uow.store_access_count(), before);
}

#[test]
fn option_is_only_reachable_through_its_product() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let options = ProductOptionService::new(&uow);
    let owner = products.create_product(&product_dto("owner", 100, 0)).unwrap();
    let stranger = products.create_product(&product_dto("stranger", 100, 0)).unwrap();
    let option_id = options.create_option(owner, &option_dto("Red")).unwrap();

    assert!(options.get_option(stranger, option_id).unwrap().is_none());
    assert!(matches!(
        options.update_option(stranger, option_id, &option_dto("Blue")),
        Err(ServiceError::NotFound { entity: "ProductOption", .. })
    ));
    assert!(matches!(
        options.delete_option(stranger, option_id),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(options.get_option(owner, option_id).unwrap().is_some());
}

#[test]
fn update_and_delete_option() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let options = ProductOptionService::new(&uow);
    let product_id = products.create_product(&product_dto("Widget", 100, 0)).unwrap();
    let option_id = options.create_option(product_id, &option_dto("Red")).unwrap();

    let mut replacement = option_dto("Crimson");
    replacement.description = Some("darker".to_string());
    options
        .update_option(product_id, option_id, &replacement)
        .unwrap();

    let stored = options.get_option(product_id, option_id).unwrap().unwrap();
    assert_eq!(
        stored,
        ProductOptionEntity {
            id: option_id,
            product_id,
            name: "Crimson".to_string(),
            description: Some("darker".to_string()),
        }
    );

    options.delete_option(product_id, option_id).unwrap();
    assert!(options.get_option(product_id, option_id).unwrap().is_none());
    assert!(products.get_product(product_id).unwrap().is_some());
}

#[test]
fn create_option_for_missing_product_is_not_found() {
    let uow = UnitOfWork::in_memory().unwrap();
    let options = ProductOptionService::new(&uow);
    let missing = Uuid::new_v4();

    let err = options.create_option(missing, &option_dto("Red")).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Product", id } if id == missing));
}

#[test]
fn dto_uses_pascal_case_wire_names() {
    let dto = product_dto("Widget", 999, 200);
    let json = serde_json::to_value(&dto).unwrap();
    for key in ["Id", "Name", "Description", "Price", "DeliveryPrice"] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["Name"], "Widget");
    assert_eq!(json["Price"], "9.99");
    assert_eq!(json["DeliveryPrice"], "2.00");

    let parsed: ProductOptionEntity = serde_json::from_str(r#"{"Name":"Red"}"#).unwrap();
    assert!(parsed.id.is_nil());
    assert!(parsed.product_id.is_nil());
    assert_eq!(parsed.description, None);
}

#[test]
fn dto_prices_survive_json_exactly() {
    let mut dto = product_dto("Ledger", 0, 0);
    dto.price = Decimal::from_str("12345678901234567.89").unwrap();
    dto.delivery_price = Decimal::from_str("0.1000").unwrap();

    let wire = serde_json::to_string(&dto).unwrap();
    assert!(wire.contains(r#""Price":"12345678901234567.89""#), "{wire}");

    let back: ProductEntity = serde_json::from_str(&wire).unwrap();
    assert_eq!(back, dto);
    assert_eq!(back.delivery_price.scale(), 4);
}

#[test]
fn high_precision_price_survives_store_and_json() {
    let uow = UnitOfWork::in_memory().unwrap();
    let products = ProductService::new(&uow);
    let mut dto = product_dto("Ledger", 0, 0);
    dto.price = Decimal::from_str("12345678901234567.89").unwrap();

    let id = products.create_product(&dto).unwrap();
    let stored = products.get_product(id).unwrap().unwrap();
    let back: ProductEntity =
        serde_json::from_str(&serde_json::to_string(&stored).unwrap()).unwrap();

    assert_eq!(back.price.to_string(), "12345678901234567.89");
}

fn product_dto(name: &str, price_cents: i64, delivery_cents: i64) -> ProductEntity {
    ProductEntity {
        id: Uuid::nil(),
        name: name.to_string(),
        description: None,
        price: Decimal::new(price_cents, 2),
        delivery_price: Decimal::new(delivery_cents, 2),
    }
}

fn option_dto(name: &str) -> ProductOptionEntity {
    ProductOptionEntity {
        id: Uuid::nil(),
        product_id: Uuid::nil(),
        name: name.to_string(),
        description: None,
    }
}
