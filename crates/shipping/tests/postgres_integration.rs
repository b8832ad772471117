//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container and need a running Docker
//! daemon. Run with:
//!
//! ```bash
//! cargo test -p shipping --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use serial_test::serial;
use shipping::{
    InMemoryShippingPublisher, NewShipment, OrderId, PostgresShippingRepository, ShipmentId,
    ShippingConfig, ShippingError, ShippingRepository, ShippingService, ShippingStatus,
};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh repository with its own pool and an empty table
async fn get_test_repository() -> PostgresShippingRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    let repository = PostgresShippingRepository::new(pool);
    repository.create_table_if_missing().await.unwrap();

    sqlx::query("TRUNCATE TABLE shipments")
        .execute(repository.pool())
        .await
        .unwrap();

    repository
}

fn new_shipment(names: &[&str]) -> NewShipment {
    NewShipment {
        shipping_type: "Нова Пошта".to_string(),
        product_names: names.iter().map(|n| n.to_string()).collect(),
        order_id: OrderId::from("order_1"),
        status: ShippingStatus::Created,
        due_date: Utc::now() + Duration::minutes(5),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn create_and_read_back() {
    let repository = get_test_repository().await;

    let id = repository
        .create_shipping(new_shipment(&["Product X", "Product Y"]))
        .await
        .unwrap();

    let record = repository.get_shipping(&id).await.unwrap().unwrap();
    assert_eq!(record.shipment_id, id);
    assert_eq!(record.shipping_type, "Нова Пошта");
    assert_eq!(record.product_ids(), "Product X,Product Y");
    assert_eq!(record.order_id.as_str(), "order_1");
    assert_eq!(record.status, ShippingStatus::Created);
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn empty_product_list_round_trips() {
    let repository = get_test_repository().await;

    let id = repository.create_shipping(new_shipment(&[])).await.unwrap();

    let record = repository.get_shipping(&id).await.unwrap().unwrap();
    assert!(record.product_names.is_empty());
    assert_eq!(record.product_ids(), "");
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn unknown_id_reads_none_and_update_fails() {
    let repository = get_test_repository().await;
    let missing = ShipmentId::from("missing");

    assert!(repository.get_shipping(&missing).await.unwrap().is_none());

    let result = repository
        .update_shipping_status(&missing, ShippingStatus::Completed)
        .await;
    assert!(matches!(result, Err(ShippingError::NotFound(_))));
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn advance_is_conditional_on_current_status() {
    let repository = get_test_repository().await;
    let id = repository.create_shipping(new_shipment(&["A"])).await.unwrap();

    repository
        .update_shipping_status(&id, ShippingStatus::Completed)
        .await
        .unwrap();
    let advanced = repository
        .advance_shipping_status(&id, ShippingStatus::Created, ShippingStatus::InProgress)
        .await
        .unwrap();

    assert!(!advanced);
    let record = repository.get_shipping(&id).await.unwrap().unwrap();
    assert_eq!(record.status, ShippingStatus::Completed);

    let missing = repository
        .advance_shipping_status(
            &ShipmentId::from("missing"),
            ShippingStatus::Created,
            ShippingStatus::InProgress,
        )
        .await;
    assert!(matches!(missing, Err(ShippingError::NotFound(_))));
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn service_moves_record_to_in_progress() {
    let repository = get_test_repository().await;
    let publisher = InMemoryShippingPublisher::new();
    let service = ShippingService::new(
        ShippingConfig::default(),
        repository.clone(),
        publisher.clone(),
    );

    let id = service
        .create_shipping(
            "Meest Express",
            vec!["Max Product".to_string()],
            &OrderId::new(),
            Utc::now() + Duration::minutes(3),
        )
        .await
        .unwrap();

    assert_eq!(
        service.check_status(&id).await.unwrap(),
        ShippingStatus::InProgress
    );
    assert_eq!(publisher.sent(), vec![id]);
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn create_table_is_idempotent() {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    let repository = PostgresShippingRepository::new(pool);

    repository.create_table_if_missing().await.unwrap();
    repository.create_table_if_missing().await.unwrap();
}
