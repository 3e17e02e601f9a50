//! SQLite-backed durable order store.
//!
//! Uses `rusqlite` to persist order lines, tracking rows, and the priced
//! menu. The connection lives behind a `tokio::sync::Mutex` so the async
//! trait methods serialize their access. Order identifiers are allocated
//! as one past the highest id seen in either order table.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info};

use platewire_core::OrderId;

use crate::OrderStore;

/// One priced menu entry, seeded from config at startup.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
}

pub struct SqliteOrderStore {
    conn: Mutex<Connection>,
}

impl SqliteOrderStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite order database")?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL journal mode")?;
        Self::init_schema(&conn)?;
        info!("SqliteOrderStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS order_items (
                 order_id  INTEGER NOT NULL,
                 item      TEXT NOT NULL,
                 quantity  INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id);
             CREATE TABLE IF NOT EXISTS order_tracking (
                 order_id   INTEGER PRIMARY KEY,
                 status     TEXT NOT NULL,
                 created_at TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS menu_items (
                 name  TEXT PRIMARY KEY,
                 price REAL NOT NULL
             );",
        )
        .context("Failed to initialize order schema")?;
        Ok(())
    }

    /// Upsert the priced menu entries used by the total-price query.
    pub async fn seed_menu(&self, items: &[MenuItem]) -> Result<()> {
        let conn = self.conn.lock().await;
        for item in items {
            conn.execute(
                "INSERT OR REPLACE INTO menu_items (name, price) VALUES (?1, ?2)",
                params![item.name, item.price],
            )?;
        }
        debug!("Seeded {} menu item(s)", items.len());
        Ok(())
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn create_order(&self) -> Result<OrderId> {
        let conn = self.conn.lock().await;
        let next: i64 = conn.query_row(
            "SELECT COALESCE(MAX(order_id), 0) + 1 FROM (
                 SELECT order_id FROM order_items
                 UNION ALL
                 SELECT order_id FROM order_tracking
             )",
            [],
            |row| row.get(0),
        )?;
        debug!(order_id = next, "Allocated order id");
        Ok(next)
    }

    async fn insert_order_item(&self, item: &str, quantity: u32, order_id: OrderId) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO order_items (order_id, item, quantity) VALUES (?1, ?2, ?3)",
            params![order_id, item, quantity],
        )
        .with_context(|| format!("Failed to insert order line \"{item}\""))?;
        Ok(())
    }

    async fn insert_order_tracking(&self, order_id: OrderId, status: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO order_tracking (order_id, status, created_at)
             VALUES (?1, ?2, ?3)",
            params![order_id, status, Utc::now().to_rfc3339()],
        )
        .context("Failed to insert order tracking row")?;
        Ok(())
    }

    async fn total_order_price(&self, order_id: OrderId) -> Result<f64> {
        let conn = self.conn.lock().await;
        // Items missing from the menu contribute nothing to the total.
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(oi.quantity * mi.price), 0.0)
             FROM order_items oi
             LEFT JOIN menu_items mi ON mi.name = oi.item
             WHERE oi.order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    async fn order_status(&self, order_id: OrderId) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let status = conn
            .query_row(
                "SELECT status FROM order_tracking WHERE order_id = ?1",
                params![order_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewire_core::STATUS_IN_PROGRESS;

    fn seeded_store() -> SqliteOrderStore {
        SqliteOrderStore::in_memory().unwrap()
    }

    #[tokio::test]
    async fn first_order_id_is_one_and_ids_advance() {
        let store = seeded_store();
        assert_eq!(store.create_order().await.unwrap(), 1);

        store.insert_order_item("burger", 2, 1).await.unwrap();
        assert_eq!(store.create_order().await.unwrap(), 2);

        store.insert_order_tracking(7, STATUS_IN_PROGRESS).await.unwrap();
        assert_eq!(store.create_order().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn totals_price_lines_against_the_menu() {
        let store = seeded_store();
        store
            .seed_menu(&[
                MenuItem { name: "burger".into(), price: 5.0 },
                MenuItem { name: "fries".into(), price: 2.5 },
            ])
            .await
            .unwrap();

        store.insert_order_item("burger", 2, 1).await.unwrap();
        store.insert_order_item("fries", 1, 1).await.unwrap();

        let total = store.total_order_price(1).await.unwrap();
        assert!((total - 12.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unknown_items_price_at_zero() {
        let store = seeded_store();
        store
            .seed_menu(&[MenuItem { name: "burger".into(), price: 5.0 }])
            .await
            .unwrap();

        store.insert_order_item("burger", 1, 1).await.unwrap();
        store.insert_order_item("mystery-dish", 3, 1).await.unwrap();

        let total = store.total_order_price(1).await.unwrap();
        assert!((total - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_order_totals_zero() {
        let store = seeded_store();
        let total = store.total_order_price(99).await.unwrap();
        assert_eq!(total, 0.0);
    }

    #[tokio::test]
    async fn tracking_status_round_trips() {
        let store = seeded_store();
        store.insert_order_tracking(41, STATUS_IN_PROGRESS).await.unwrap();

        assert_eq!(
            store.order_status(41).await.unwrap().as_deref(),
            Some(STATUS_IN_PROGRESS)
        );
        assert_eq!(store.order_status(42).await.unwrap(), None);
    }
}
