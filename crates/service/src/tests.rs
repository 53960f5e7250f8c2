use std::sync::Arc;

use docmigrate_core::{CollectionName, ContextNames, DatabaseName, FieldName, MigrationStep};
use docmigrate_storage::{DocumentStore, MemoryStore, StoreBackend};
use serde_json::json;

use crate::{MigrationService, Missing, Outcome, ServiceError};

fn setup() -> (MigrationService, Arc<StoreBackend>, MigrationStep) {
    let storage = Arc::new(StoreBackend::new_memory());
    let service = MigrationService::new(Arc::clone(&storage));
    let step = MigrationStep::base_provisioning(&ContextNames::default()).unwrap();
    (service, storage, step)
}

fn db(name: &str) -> DatabaseName {
    DatabaseName::new(name).unwrap()
}

fn coll(name: &str) -> CollectionName {
    CollectionName::new(name).unwrap()
}

#[tokio::test]
async fn apply_on_empty_store_creates_everything() {
    let (service, storage, step) = setup();

    let report = service.apply(&step).await.unwrap();
    assert_eq!(report.count(Outcome::Created), 5);
    assert!(!report.is_noop());
    assert_eq!(report.backend, "memory");

    let common = storage.list_collection_names(&db("pp_common_db_stage")).await.unwrap();
    assert_eq!(common, vec!["products", "testing"]);
    let orders = storage.list_collection_names(&db("order_service_dev")).await.unwrap();
    assert_eq!(orders, vec!["orders"]);

    let sku = storage.list_indexes(&db("pp_common_db_stage"), &coll("products")).await.unwrap();
    assert!(sku.iter().any(|i| i.name == "sku_1" && i.is_unique_on("sku")));
    let order_number =
        storage.list_indexes(&db("order_service_dev"), &coll("orders")).await.unwrap();
    assert!(order_number.iter().any(|i| i.is_unique_on("orderNumber")));
}

#[tokio::test]
async fn second_apply_is_idempotent() {
    let (service, storage, step) = setup();

    service.apply(&step).await.unwrap();
    let again = service.apply(&step).await.unwrap();
    assert!(again.is_noop());
    assert_eq!(again.count(Outcome::AlreadyPresent), step.operations.len());

    let common = storage.list_collection_names(&db("pp_common_db_stage")).await.unwrap();
    assert_eq!(common.len(), 2);
    let indexes = storage.list_indexes(&db("pp_common_db_stage"), &coll("products")).await.unwrap();
    assert_eq!(indexes.len(), 2, "expected _id_ and sku_1 only: {indexes:?}");
}

#[tokio::test]
async fn duplicate_sku_rejected_after_apply() {
    let (service, storage, step) = setup();
    service.apply(&step).await.unwrap();

    let ctx = db("pp_common_db_stage");
    storage.insert_document(&ctx, &coll("products"), json!({"sku": "SKU-1"})).await.unwrap();
    let err = storage
        .insert_document(&ctx, &coll("products"), json!({"sku": "SKU-1"}))
        .await
        .unwrap_err();
    assert!(err.is_duplicate_key());
}

#[tokio::test]
async fn duplicate_order_number_rejected_after_apply() {
    let (service, storage, step) = setup();
    service.apply(&step).await.unwrap();

    let ctx = db("order_service_dev");
    let first = json!({"orderNumber": "ORD-100", "total": 12});
    let second = json!({"orderNumber": "ORD-100", "total": 40});
    storage.insert_document(&ctx, &coll("orders"), first).await.unwrap();
    let err = storage.insert_document(&ctx, &coll("orders"), second).await.unwrap_err();
    assert!(err.is_duplicate_key());
}

#[tokio::test]
async fn contexts_do_not_leak() {
    let (service, storage, step) = setup();
    service.apply(&step).await.unwrap();

    let common = storage.list_collection_names(&db("pp_common_db_stage")).await.unwrap();
    assert!(!common.iter().any(|c| c == "orders"));
    let orders = storage.list_collection_names(&db("order_service_dev")).await.unwrap();
    assert!(!orders.iter().any(|c| c == "products" || c == "testing"));

    // Same sku in the other context is unconstrained.
    let other = db("order_service_dev");
    storage.insert_document(&other, &coll("products"), json!({"sku": "S"})).await.unwrap();
    storage.insert_document(&other, &coll("products"), json!({"sku": "S"})).await.unwrap();
}

#[tokio::test]
async fn preexisting_duplicates_stop_the_step() {
    let (service, storage, step) = setup();
    let ctx = db("pp_common_db_stage");
    storage.insert_document(&ctx, &coll("products"), json!({"sku": "dup"})).await.unwrap();
    storage.insert_document(&ctx, &coll("products"), json!({"sku": "dup"})).await.unwrap();

    let err = service.apply(&step).await.unwrap_err();
    assert!(err.is_constraint_violation());
    match &err {
        ServiceError::Operation { operation, .. } => {
            assert_eq!(operation, "create unique index sku_1 on pp_common_db_stage.products");
        },
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("products") && message.contains("sku"), "{message}");

    // Operations after the failure never ran.
    let orders = storage.list_collection_names(&db("order_service_dev")).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn verify_reports_missing_then_satisfied() {
    let (service, _storage, step) = setup();

    let before = service.verify(&step).await.unwrap();
    assert!(!before.is_satisfied());
    assert_eq!(before.missing.len(), 5);
    assert!(before.missing.contains(&Missing::Collection {
        context: db("order_service_dev"),
        collection: coll("orders"),
    }));

    service.apply(&step).await.unwrap();
    let after = service.verify(&step).await.unwrap();
    assert!(after.is_satisfied(), "{:?}", after.missing);
}

#[tokio::test]
async fn verify_detects_missing_index_only() {
    let (service, storage, step) = setup();
    let common = db("pp_common_db_stage");
    storage.create_collection(&common, &coll("testing")).await.unwrap();
    storage.create_collection(&common, &coll("products")).await.unwrap();

    let report = service.verify(&step).await.unwrap();
    assert!(report.missing.iter().any(|m| matches!(
        m,
        Missing::UniqueIndex { field, .. } if field.as_str() == "sku"
    )));
    assert!(!report.missing.iter().any(|m| matches!(
        m,
        Missing::Collection { collection, .. } if collection.as_str() == "products"
    )));
}

#[tokio::test]
async fn report_serializes_outcomes() {
    let (service, _storage, step) = setup();
    let report = service.apply(&step).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["step_id"], "2025.08.01.01");
    assert_eq!(json["operations"][0]["outcome"], "created");
    assert_eq!(json["operations"][2]["operation"]["op"], "create_unique_index");
    assert_eq!(json["operations"][2]["operation"]["index"]["field"], "sku");
}

#[tokio::test]
async fn plain_index_on_unique_field_stops_the_step() {
    let memory = MemoryStore::new();
    let storage = Arc::new(StoreBackend::Memory(memory.clone()));
    let service = MigrationService::new(Arc::clone(&storage));
    let step = MigrationStep::base_provisioning(&ContextNames::default()).unwrap();

    let ctx = db("pp_common_db_stage");
    memory.create_index(&ctx, &coll("products"), &FieldName::new("sku").unwrap()).await.unwrap();

    let err = service.apply(&step).await.unwrap_err();
    assert!(err.is_index_conflict(), "{err}");
    assert!(!err.is_constraint_violation());
    match &err {
        ServiceError::Operation { operation, .. } => {
            assert_eq!(operation, "create unique index sku_1 on pp_common_db_stage.products");
        },
        other => panic!("unexpected error: {other}"),
    }

    // Collections before the failing index were created, nothing after it ran.
    let common = storage.list_collection_names(&ctx).await.unwrap();
    assert_eq!(common, vec!["products", "testing"]);
    let orders = storage.list_collection_names(&db("order_service_dev")).await.unwrap();
    assert!(orders.is_empty());

    let report = service.verify(&step).await.unwrap();
    assert!(report.missing.iter().any(|m| matches!(
        m,
        Missing::UniqueIndex { field, .. } if field.as_str() == "sku"
    )));
}
