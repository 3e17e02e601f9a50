//! `platewire-store` — the persistent order store.
//!
//! The fulfillment core only ever talks to the [`OrderStore`] trait; the
//! SQLite implementation in [`sqlite`] is the default backing store.
//! Completed orders become durable line items plus a tracking row, priced
//! against the seeded menu.

pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use platewire_core::OrderId;

pub use sqlite::{MenuItem, SqliteOrderStore};

/// Operations the fulfillment core consumes from the persistent store.
///
/// Every method is a suspension point with latency outside this backend's
/// control; failures surface to the user as the backend-error reply, never
/// as a transport failure.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Allocate a fresh order identifier.
    async fn create_order(&self) -> Result<OrderId>;

    /// Insert one (item, quantity) line under an order.
    async fn insert_order_item(&self, item: &str, quantity: u32, order_id: OrderId) -> Result<()>;

    /// Record the tracking status for an order.
    async fn insert_order_tracking(&self, order_id: OrderId, status: &str) -> Result<()>;

    /// Total price of an order's lines against the menu.
    async fn total_order_price(&self, order_id: OrderId) -> Result<f64>;

    /// Tracking status for an order, or `None` if the id is unknown.
    async fn order_status(&self, order_id: OrderId) -> Result<Option<String>>;
}
