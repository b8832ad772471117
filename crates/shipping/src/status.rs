//! Shipment status.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShippingError;

/// The status of a shipment record.
///
/// State transitions:
/// ```text
/// Created ──► InProgress ──┬──► Completed
///                          └──► Failed
/// ```
///
/// The labels returned by [`ShippingStatus::as_str`] are what the repository
/// stores and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShippingStatus {
    /// Record written, id not yet published.
    #[serde(rename = "created")]
    Created,

    /// Id published; waiting for downstream processing.
    #[serde(rename = "in progress")]
    InProgress,

    /// Delivered before the due date (terminal state).
    #[serde(rename = "completed")]
    Completed,

    /// Due date passed before processing (terminal state).
    #[serde(rename = "failed")]
    Failed,
}

impl ShippingStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShippingStatus::Completed | ShippingStatus::Failed)
    }

    /// Returns the stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingStatus::Created => "created",
            ShippingStatus::InProgress => "in progress",
            ShippingStatus::Completed => "completed",
            ShippingStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShippingStatus {
    type Err = ShippingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ShippingStatus::Created),
            "in progress" => Ok(ShippingStatus::InProgress),
            "completed" => Ok(ShippingStatus::Completed),
            "failed" => Ok(ShippingStatus::Failed),
            other => Err(ShippingError::InvalidRecord(format!(
                "unknown shipping status '{other}'"
            ))),
        }
    }
}
