use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, ShipmentId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::{Result, ShippingError};
use crate::record::{NewShipment, ShipmentRecord};
use crate::repository::ShippingRepository;
use crate::status::ShippingStatus;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS shipments (
    id TEXT PRIMARY KEY,
    shipping_type TEXT NOT NULL,
    product_names TEXT[] NOT NULL,
    order_id TEXT NOT NULL,
    status TEXT NOT NULL,
    due_date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)
"#;

/// PostgreSQL-backed shipment repository.
#[derive(Clone)]
pub struct PostgresShippingRepository {
    pool: PgPool,
}

impl PostgresShippingRepository {
    /// Creates a new PostgreSQL shipment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `shipments` table if it does not exist yet.
    pub async fn create_table_if_missing(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<ShipmentRecord> {
        let status: String = row.try_get("status")?;

        Ok(ShipmentRecord {
            shipment_id: ShipmentId::from_string(row.try_get::<String, _>("id")?),
            shipping_type: row.try_get("shipping_type")?,
            product_names: row.try_get("product_names")?,
            order_id: OrderId::from_string(row.try_get::<String, _>("order_id")?),
            status: status.parse()?,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ShippingRepository for PostgresShippingRepository {
    async fn create_shipping(&self, shipment: NewShipment) -> Result<ShipmentId> {
        let shipment_id = ShipmentId::new();

        sqlx::query(
            r#"
            INSERT INTO shipments (id, shipping_type, product_names, order_id, status, due_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(shipment_id.as_str())
        .bind(&shipment.shipping_type)
        .bind(&shipment.product_names)
        .bind(shipment.order_id.as_str())
        .bind(shipment.status.as_str())
        .bind(shipment.due_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(shipment_id)
    }

    async fn get_shipping(&self, shipment_id: &ShipmentId) -> Result<Option<ShipmentRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, shipping_type, product_names, order_id, status, due_date, created_at
            FROM shipments
            WHERE id = $1
            "#,
        )
        .bind(shipment_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn update_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        status: ShippingStatus,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE shipments SET status = $2 WHERE id = $1")
            .bind(shipment_id.as_str())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ShippingError::NotFound(shipment_id.clone()));
        }
        Ok(())
    }

    async fn advance_shipping_status(
        &self,
        shipment_id: &ShipmentId,
        from: ShippingStatus,
        to: ShippingStatus,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE shipments SET status = $3 WHERE id = $1 AND status = $2")
            .bind(shipment_id.as_str())
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        match self.get_shipping(shipment_id).await? {
            Some(_) => Ok(false),
            None => Err(ShippingError::NotFound(shipment_id.clone())),
        }
    }
}
