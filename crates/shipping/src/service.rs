//! Shipping service: catalog, shipment creation and processing.

use chrono::{DateTime, Utc};
use common::{OrderId, ShipmentId};
use futures_util::future::join_all;

use crate::config::ShippingConfig;
use crate::error::{Result, ShippingError};
use crate::publisher::ShippingPublisher;
use crate::record::{NewShipment, ProcessedShipment, ProcessingOutcome, ShipmentRecord};
use crate::repository::ShippingRepository;
use crate::status::ShippingStatus;

/// Creates shipment records and announces them on the shipping queue.
///
/// The service does not check that a shipping type belongs to the catalog;
/// callers validate against [`ShippingService::list_available_shipping_type`]
/// before asking for a shipment.
pub struct ShippingService<R, P>
where
    R: ShippingRepository,
    P: ShippingPublisher,
{
    config: ShippingConfig,
    repository: R,
    publisher: P,
}

impl<R, P> ShippingService<R, P>
where
    R: ShippingRepository,
    P: ShippingPublisher,
{
    /// Creates a new shipping service.
    pub fn new(config: ShippingConfig, repository: R, publisher: P) -> Self {
        Self {
            config,
            repository,
            publisher,
        }
    }

    pub fn config(&self) -> &ShippingConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Returns the supported shipping types, in catalog order.
    pub fn list_available_shipping_type(&self) -> &[String] {
        self.config.shipping_types()
    }

    /// Persists a shipment and publishes its id.
    ///
    /// The record is written as `created`, the id is published, and the record
    /// then moves to `in progress`. A failing write or publish is returned as
    /// is. Once the id is on the queue the shipment exists, so the last step
    /// never fails the call: it only applies while the record is still
    /// `created` (a fast consumer may already have settled it), and a failed
    /// update is logged and leaves the record in `created`.
    #[tracing::instrument(skip(self, product_names), fields(products = product_names.len()))]
    pub async fn create_shipping(
        &self,
        shipping_type: &str,
        product_names: Vec<String>,
        order_id: &OrderId,
        due_date: DateTime<Utc>,
    ) -> Result<ShipmentId> {
        let shipment_id = self
            .repository
            .create_shipping(NewShipment {
                shipping_type: shipping_type.to_string(),
                product_names,
                order_id: order_id.clone(),
                status: ShippingStatus::Created,
                due_date,
            })
            .await?;

        self.publisher.send_new_shipping(&shipment_id).await?;

        match self
            .repository
            .advance_shipping_status(
                &shipment_id,
                ShippingStatus::Created,
                ShippingStatus::InProgress,
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(%shipment_id, "shipment settled before it was marked in progress");
            }
            Err(e) => {
                metrics::counter!("shipment_status_update_failures_total").increment(1);
                tracing::warn!(%shipment_id, error = %e, "published shipment left in created status");
            }
        }

        metrics::counter!("shipments_created_total").increment(1);
        tracing::info!(%shipment_id, %order_id, "shipment created");

        Ok(shipment_id)
    }

    /// Loads a shipment record.
    pub async fn get_shipping(&self, shipment_id: &ShipmentId) -> Result<ShipmentRecord> {
        self.repository
            .get_shipping(shipment_id)
            .await?
            .ok_or_else(|| ShippingError::NotFound(shipment_id.clone()))
    }

    /// Returns the current status of a shipment.
    pub async fn check_status(&self, shipment_id: &ShipmentId) -> Result<ShippingStatus> {
        Ok(self.get_shipping(shipment_id).await?.status)
    }

    /// Settles one shipment: `failed` if its due date is before `now`,
    /// `completed` otherwise.
    ///
    /// Shipments that are already settled keep their status, so a duplicate
    /// queue delivery is harmless.
    #[tracing::instrument(skip(self))]
    pub async fn process_shipping(
        &self,
        shipment_id: &ShipmentId,
        now: DateTime<Utc>,
    ) -> Result<ShippingStatus> {
        let record = self.get_shipping(shipment_id).await?;

        if record.status.is_terminal() {
            tracing::debug!(%shipment_id, status = %record.status, "shipment already processed");
            return Ok(record.status);
        }

        let status = if record.due_date < now {
            ShippingStatus::Failed
        } else {
            ShippingStatus::Completed
        };

        self.repository
            .update_shipping_status(shipment_id, status)
            .await?;

        metrics::counter!("shipments_processed_total", "status" => status.as_str()).increment(1);
        if status == ShippingStatus::Failed {
            tracing::warn!(%shipment_id, due_date = %record.due_date, "shipment missed its due date");
        }

        Ok(status)
    }

    /// Polls up to `batch_size` ids from the queue and processes them.
    ///
    /// A shipment that cannot be processed is reported in its entry and does
    /// not stop the rest of the batch. Only a failing poll is an error.
    #[tracing::instrument(skip(self))]
    pub async fn process_shipping_batch(
        &self,
        batch_size: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<ProcessedShipment>> {
        let shipment_ids = self.publisher.poll_shipping(batch_size).await?;

        let results = join_all(
            shipment_ids
                .iter()
                .map(|shipment_id| self.process_shipping(shipment_id, now)),
        )
        .await;

        Ok(shipment_ids
            .into_iter()
            .zip(results)
            .map(|(shipment_id, result)| ProcessedShipment {
                shipment_id,
                outcome: match result {
                    Ok(status) => ProcessingOutcome::Processed(status),
                    Err(e) => ProcessingOutcome::Error(e.to_string()),
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::publisher::InMemoryShippingPublisher;
    use crate::repository::InMemoryShippingRepository;

    type TestService = ShippingService<InMemoryShippingRepository, InMemoryShippingPublisher>;

    fn setup() -> (
        TestService,
        InMemoryShippingRepository,
        InMemoryShippingPublisher,
    ) {
        let repository = InMemoryShippingRepository::new();
        let publisher = InMemoryShippingPublisher::new();
        let service = ShippingService::new(
            ShippingConfig::default(),
            repository.clone(),
            publisher.clone(),
        );
        (service, repository, publisher)
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_lists_configured_types() {
        let service = ShippingService::new(
            ShippingConfig::from_list("Courier,Pickup"),
            InMemoryShippingRepository::new(),
            InMemoryShippingPublisher::new(),
        );
        assert_eq!(service.list_available_shipping_type(), &["Courier", "Pickup"]);
    }

    #[tokio::test]
    async fn test_create_shipping_persists_publishes_and_advances() {
        let (service, repository, publisher) = setup();
        let order_id = OrderId::from("order_1");
        let due_date = Utc::now() + Duration::minutes(5);

        let id = service
            .create_shipping("Нова Пошта", names(&["Product"]), &order_id, due_date)
            .await
            .unwrap();

        let record = repository.record(&id).unwrap();
        assert_eq!(record.shipping_type, "Нова Пошта");
        assert_eq!(record.product_names, names(&["Product"]));
        assert_eq!(record.order_id, order_id);
        assert_eq!(record.due_date, due_date);
        assert_eq!(record.status, ShippingStatus::InProgress);
        assert_eq!(publisher.sent(), vec![id]);
    }

    #[tokio::test]
    async fn test_create_shipping_does_not_validate_type() {
        let (service, repository, _) = setup();
        let id = service
            .create_shipping("Teleport", vec![], &OrderId::new(), Utc::now())
            .await
            .unwrap();
        assert_eq!(repository.record(&id).unwrap().shipping_type, "Teleport");
    }

    #[tokio::test]
    async fn test_repository_failure_skips_publish() {
        let (service, repository, publisher) = setup();
        repository.set_fail_on_create(true);

        let result = service
            .create_shipping("Нова Пошта", names(&["A"]), &OrderId::new(), Utc::now())
            .await;

        assert!(matches!(result, Err(ShippingError::Repository(_))));
        assert!(publisher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_record_created() {
        let (service, repository, publisher) = setup();
        repository.set_next_id("shipping_1");
        publisher.set_fail_on_send(true);

        let result = service
            .create_shipping("Нова Пошта", names(&["A"]), &OrderId::new(), Utc::now())
            .await;

        assert!(matches!(result, Err(ShippingError::Publisher(_))));
        let record = repository.record(&ShipmentId::from("shipping_1")).unwrap();
        assert_eq!(record.status, ShippingStatus::Created);
    }

    /// Queue whose consumer settles each shipment before the send returns.
    struct SettlingPublisher {
        repository: InMemoryShippingRepository,
        queue: InMemoryShippingPublisher,
    }

    #[async_trait]
    impl ShippingPublisher for SettlingPublisher {
        async fn send_new_shipping(&self, shipment_id: &ShipmentId) -> Result<()> {
            self.queue.send_new_shipping(shipment_id).await?;
            self.repository
                .update_shipping_status(shipment_id, ShippingStatus::Completed)
                .await
        }

        async fn poll_shipping(&self, batch_size: usize) -> Result<Vec<ShipmentId>> {
            self.queue.poll_shipping(batch_size).await
        }
    }

    #[tokio::test]
    async fn test_settled_shipment_is_not_moved_back_to_in_progress() {
        let repository = InMemoryShippingRepository::new();
        let service = ShippingService::new(
            ShippingConfig::default(),
            repository.clone(),
            SettlingPublisher {
                repository: repository.clone(),
                queue: InMemoryShippingPublisher::new(),
            },
        );

        let id = service
            .create_shipping("Нова Пошта", names(&["A"]), &OrderId::new(), Utc::now())
            .await
            .unwrap();

        assert_eq!(repository.record(&id).unwrap().status, ShippingStatus::Completed);
    }

    #[tokio::test]
    async fn test_status_update_failure_after_publish_still_succeeds() {
        let (service, repository, publisher) = setup();
        repository.set_fail_on_update(true);

        let id = service
            .create_shipping("Нова Пошта", names(&["A"]), &OrderId::new(), Utc::now())
            .await
            .unwrap();

        assert_eq!(repository.record(&id).unwrap().status, ShippingStatus::Created);
        assert_eq!(publisher.sent(), vec![id]);
    }

    #[tokio::test]
    async fn test_check_status_unknown_shipment() {
        let (service, _, _) = setup();
        let result = service.check_status(&ShipmentId::from("missing")).await;
        assert!(matches!(result, Err(ShippingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_process_before_due_date_completes() {
        let (service, _, _) = setup();
        let now = Utc::now();
        let id = service
            .create_shipping("Самовивіз", vec![], &OrderId::new(), now + Duration::minutes(1))
            .await
            .unwrap();

        let status = service.process_shipping(&id, now).await.unwrap();

        assert_eq!(status, ShippingStatus::Completed);
        assert_eq!(service.check_status(&id).await.unwrap(), ShippingStatus::Completed);
    }

    #[tokio::test]
    async fn test_process_after_due_date_fails() {
        let (service, _, _) = setup();
        let now = Utc::now();
        let id = service
            .create_shipping("Самовивіз", vec![], &OrderId::new(), now)
            .await
            .unwrap();

        let status = service
            .process_shipping(&id, now + Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(status, ShippingStatus::Failed);
    }

    #[tokio::test]
    async fn test_process_is_idempotent() {
        let (service, _, _) = setup();
        let now = Utc::now();
        let id = service
            .create_shipping("Самовивіз", vec![], &OrderId::new(), now + Duration::minutes(1))
            .await
            .unwrap();

        service.process_shipping(&id, now).await.unwrap();
        let again = service
            .process_shipping(&id, now + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(again, ShippingStatus::Completed);
    }

    #[tokio::test]
    async fn test_batch_drains_queue_and_reports_errors() {
        let (service, _, publisher) = setup();
        let now = Utc::now();
        let ok = service
            .create_shipping("Укр Пошта", vec![], &OrderId::new(), now + Duration::minutes(1))
            .await
            .unwrap();
        publisher
            .send_new_shipping(&ShipmentId::from("ghost"))
            .await
            .unwrap();

        let processed = service.process_shipping_batch(10, now).await.unwrap();

        assert_eq!(processed.len(), 2);
        assert_eq!(processed[0].shipment_id, ok);
        assert_eq!(
            processed[0].outcome,
            ProcessingOutcome::Processed(ShippingStatus::Completed)
        );
        assert_eq!(processed[1].shipment_id, ShipmentId::from("ghost"));
        assert!(matches!(processed[1].outcome, ProcessingOutcome::Error(_)));
        assert_eq!(publisher.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_respects_size() {
        let (service, _, publisher) = setup();
        for _ in 0..3 {
            service
                .create_shipping("Укр Пошта", vec![], &OrderId::new(), Utc::now())
                .await
                .unwrap();
        }

        let processed = service.process_shipping_batch(2, Utc::now()).await.unwrap();

        assert_eq!(processed.len(), 2);
        assert_eq!(publisher.pending_count(), 1);
    }
}
