//! Intent fulfillment.
//!
//! Routes each decoded webhook event to its order operation and renders
//! the reply text. Only completion and tracking touch the persistent
//! store; add and remove work entirely against the in-memory
//! [`OrderBook`]. Every failure path produces a well-formed reply.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{error, warn};

use platewire_core::{coerce_order_id, Intent, OrderId, OrderParams, STATUS_IN_PROGRESS};
use platewire_store::OrderStore;

use crate::book::{render_cart, Cart, OrderBook};

const BACKEND_ERROR: &str =
    "Sorry, I couldn't process your order due to a backend error. Please place a new order again.";
const NO_ACTIVE_ORDER: &str =
    "I'm having trouble finding your order. Sorry! Can you place a new order please?";
const UNIDENTIFIED_SESSION: &str =
    "Sorry, I couldn't identify your session. Can you start over and place a new order?";
const FALLBACK: &str = "Sorry, I couldn't understand your request.";
const MALFORMED_ADD: &str =
    "Sorry, I didn't understand. Can you please specify food items and quantities clearly?";

pub struct Fulfillment {
    book: OrderBook,
    store: Arc<dyn OrderStore>,
    handoff_timeout: Duration,
}

impl Fulfillment {
    pub fn new(book: OrderBook, store: Arc<dyn OrderStore>, handoff_timeout: Duration) -> Self {
        Self {
            book,
            store,
            handoff_timeout,
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Route a decoded event to the matching operation.
    ///
    /// Unknown intents fall through to the fixed fallback reply without
    /// touching any state. Tracking needs no session; the order-mutation
    /// intents answer with a fixed reply when the session could not be
    /// identified.
    pub async fn dispatch(
        &self,
        intent_name: &str,
        params: &OrderParams,
        session: Option<&str>,
    ) -> String {
        let Some(intent) = Intent::from_display_name(intent_name) else {
            warn!(intent = intent_name, "Unrecognized intent, returning fallback");
            return FALLBACK.to_string();
        };

        match (intent, session) {
            (Intent::TrackOrder, _) => self.track_order(params).await,
            (Intent::AddToOrder, Some(session)) => self.add_to_order(params, session).await,
            (Intent::RemoveFromOrder, Some(session)) => {
                self.remove_from_order(params, session).await
            }
            (Intent::CompleteOrder, Some(session)) => self.complete_order(session).await,
            (intent, None) => {
                warn!(%intent, "Order intent without a session id");
                UNIDENTIFIED_SESSION.to_string()
            }
        }
    }

    /// Merge the requested items into the session's cart and list the
    /// whole order back.
    async fn add_to_order(&self, params: &OrderParams, session: &str) -> String {
        let quantities = params.quantities.clone().unwrap_or_default();
        if params.food_items.len() != quantities.len() || quantities.iter().any(|q| *q <= 0) {
            warn!(
                session,
                items = params.food_items.len(),
                quantities = quantities.len(),
                "Malformed add: item and quantity sequences do not line up"
            );
            return MALFORMED_ADD.to_string();
        }

        let pairs = params
            .food_items
            .iter()
            .cloned()
            .zip(quantities.iter().map(|q| *q as u32))
            .collect();
        let cart = self.book.upsert_items(session, pairs).await;

        format!(
            "So far you have: {}. Do you need anything else?",
            render_cart(&cart)
        )
    }

    /// Take one unit of each named item out of the cart and report what
    /// was removed, what was never there, and what is left.
    async fn remove_from_order(&self, params: &OrderParams, session: &str) -> String {
        let Some(outcome) = self.book.remove_items(session, &params.food_items).await else {
            return NO_ACTIVE_ORDER.to_string();
        };

        let mut reply = String::new();
        if !outcome.removed.is_empty() {
            reply.push_str(&format!(
                "Removed {} from your order!",
                outcome.removed.join(", ")
            ));
        }
        if !outcome.missing.is_empty() {
            reply.push_str(&format!(
                " Your current order does not have {}.",
                outcome.missing.join(", ")
            ));
        }
        if outcome.remaining.is_empty() {
            reply.push_str(" Your order is empty!");
        } else {
            reply.push_str(&format!(
                " Here is what is left in your order: {}",
                render_cart(&outcome.remaining)
            ));
        }
        reply.trim_start().to_string()
    }

    /// Commit the session's cart to the persistent store.
    ///
    /// The cart is consumed as soon as it is found, whether or not
    /// persistence succeeds: a failed handoff is not retryable and the
    /// user is asked to order again.
    async fn complete_order(&self, session: &str) -> String {
        let Some(cart) = self.book.take(session).await else {
            return NO_ACTIVE_ORDER.to_string();
        };

        match timeout(self.handoff_timeout, self.persist_cart(&cart)).await {
            Ok(Ok((order_id, total))) => format!(
                "Awesome. We have placed your order. Here is your order id # {order_id}. \
                 Your order total is {total:.2} which you can pay at the time of delivery!"
            ),
            Ok(Err(e)) => {
                error!(session, error = %e, "Order persistence failed");
                BACKEND_ERROR.to_string()
            }
            Err(_) => {
                error!(session, "Order persistence timed out");
                BACKEND_ERROR.to_string()
            }
        }
    }

    /// Write one completed cart to the store: fresh id, one line per item,
    /// the tracking row, then the priced total.
    async fn persist_cart(&self, cart: &Cart) -> anyhow::Result<(OrderId, f64)> {
        let order_id = self.store.create_order().await?;
        for (item, quantity) in cart {
            self.store.insert_order_item(item, *quantity, order_id).await?;
        }
        self.store
            .insert_order_tracking(order_id, STATUS_IN_PROGRESS)
            .await?;
        let total = self.store.total_order_price(order_id).await?;
        Ok((order_id, total))
    }

    /// Resolve an order id parameter to its persisted tracking status.
    async fn track_order(&self, params: &OrderParams) -> String {
        let Some(raw) = &params.order_id else {
            return "Please provide a valid order ID.".to_string();
        };
        let Some(order_id) = coerce_order_id(raw) else {
            warn!(?raw, "Order id not coercible to an integer");
            return "Invalid order ID format. Please enter a numeric order ID.".to_string();
        };

        match self.store.order_status(order_id).await {
            Ok(Some(status)) => format!("The order status for order id: {order_id} is: {status}"),
            Ok(None) => format!("No order found with order id: {order_id}"),
            Err(e) => {
                error!(order_id, error = %e, "Status lookup failed");
                BACKEND_ERROR.to_string()
            }
        }
    }
}
