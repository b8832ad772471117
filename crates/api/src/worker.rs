//! Background processing of the shipping queue.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shipping::ProcessingOutcome;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::state::DynShippingService;

/// Processes one batch from the shipping queue and returns how many ids were
/// taken off it. Poll failures are logged and count as an empty batch.
pub async fn drain_shipping_queue(shipping: &DynShippingService, batch_size: usize) -> usize {
    let processed = match shipping.process_shipping_batch(batch_size, Utc::now()).await {
        Ok(processed) => processed,
        Err(e) => {
            metrics::counter!("shipping_poll_failures_total").increment(1);
            tracing::error!(error = %e, "failed to poll shipping queue");
            return 0;
        }
    };

    for entry in &processed {
        if let ProcessingOutcome::Error(error) = &entry.outcome {
            tracing::warn!(shipment_id = %entry.shipment_id, %error, "shipment not processed");
        }
    }

    if !processed.is_empty() {
        metrics::histogram!("shipping_batch_size").record(processed.len() as f64);
        tracing::info!(count = processed.len(), "processed shipping batch");
    }

    processed.len()
}

/// Spawns a task that drains the shipping queue every `poll_interval`.
///
/// The task runs until it is aborted through the returned handle.
pub fn spawn_shipping_worker(
    shipping: Arc<DynShippingService>,
    batch_size: usize,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(batch_size, ?poll_interval, "shipping worker started");

        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            drain_shipping_queue(&shipping, batch_size).await;
        }
    })
}
