//! In-progress order book.
//!
//! One mutex-guarded table maps each conversation to its cart. Every
//! read-modify-write for a session happens under a single lock hold, so
//! concurrent webhooks for the same session cannot interleave and lose an
//! update. Entries are evicted when the order completes or when the cart
//! sits idle past the configured timeout.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use platewire_core::SessionId;

/// Item name → quantity. Every stored quantity is > 0; an item decremented
/// to zero is removed, never left as a zero entry.
pub type Cart = BTreeMap<String, u32>;

struct CartEntry {
    items: Cart,
    last_active: Instant,
}

/// Outcome of a remove pass over a session's cart.
#[derive(Debug, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Items a unit was taken from (or that were deleted outright).
    pub removed: Vec<String>,
    /// Requested items the cart does not contain.
    pub missing: Vec<String>,
    /// Snapshot of the cart after the pass.
    pub remaining: Cart,
}

/// The process-wide session → cart table.
pub struct OrderBook {
    sessions: Mutex<HashMap<SessionId, CartEntry>>,
    idle_timeout: Duration,
}

impl OrderBook {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Merge (item, quantity) pairs into the session's cart, creating the
    /// cart on first use. An item already present has its quantity
    /// replaced, not summed. Returns a snapshot of the merged cart.
    pub async fn upsert_items(&self, session: &str, pairs: Vec<(String, u32)>) -> Cart {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .entry(session.to_string())
            .or_insert_with(|| CartEntry {
                items: Cart::new(),
                last_active: Instant::now(),
            });
        for (item, quantity) in pairs {
            entry.items.insert(item, quantity);
        }
        entry.last_active = Instant::now();
        entry.items.clone()
    }

    /// Take one unit of each named item out of the session's cart. Any
    /// requested quantity is deliberately not consulted. Returns `None`
    /// when the session has no cart at all.
    pub async fn remove_items(&self, session: &str, items: &[String]) -> Option<RemoveOutcome> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(session)?;

        let mut removed = Vec::new();
        let mut missing = Vec::new();
        for item in items {
            match entry.items.get(item).copied() {
                Some(quantity) if quantity > 1 => {
                    entry.items.insert(item.clone(), quantity - 1);
                    removed.push(item.clone());
                }
                Some(_) => {
                    entry.items.remove(item);
                    removed.push(item.clone());
                }
                None => missing.push(item.clone()),
            }
        }
        entry.last_active = Instant::now();

        Some(RemoveOutcome {
            removed,
            missing,
            remaining: entry.items.clone(),
        })
    }

    /// Take the session's cart out of the book, if any. Completion calls
    /// this before touching the store: the entry is consumed whether or
    /// not persistence succeeds.
    pub async fn take(&self, session: &str) -> Option<Cart> {
        self.sessions.lock().await.remove(session).map(|e| e.items)
    }

    /// Evict carts idle longer than the configured timeout. Returns how
    /// many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_active.elapsed() < self.idle_timeout);
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Render a cart as `"<count> <item>, <count> <item>"` in map order.
pub fn render_cart(cart: &Cart) -> String {
    cart.iter()
        .map(|(item, quantity)| format!("{quantity} {item}"))
        .collect::<Vec<_>>()
        .join(", ")
}
