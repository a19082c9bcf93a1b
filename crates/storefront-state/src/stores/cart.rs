//! # Cart Store
//!
//! The single cart container shared by product pages, the cart drawer and
//! the checkout screens.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Page Action              Store Call              Cart Change           │
//! │  ───────────              ──────────              ───────────           │
//! │                                                                         │
//! │  Add to cart ───────────► add_item() ───────────► merge by SKU          │
//! │  +/- buttons ───────────► set_quantity() ───────► qty ± 1               │
//! │  Remove ────────────────► remove_item() ────────► line dropped          │
//! │  Coupon accepted ───────► apply_discount() ─────► total recomputed      │
//! │  Shipping chosen ───────► set_shipping_fee() ───► total recomputed      │
//! │  Billing form ──────────► set_billing_address() ► address stored        │
//! │  Next / Back ───────────► next_step()/back_step() step counter          │
//! │                                                                         │
//! │  Every accepted change is published to subscribers.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use storefront_core::{
    BillingAddress, Cart, CartTotals, CheckoutStep, CoreResult, LineItem, Money, QuantityDelta,
};

use super::StoreCell;

/// Cart snapshot with its totals block, as handed to the cart views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart: Cart,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            cart: cart.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Shared handle to the cart.
#[derive(Clone)]
pub struct CartStore {
    cell: Arc<StoreCell<Cart>>,
}

impl Default for CartStore {
    fn default() -> Self {
        CartStore::new()
    }
}

impl CartStore {
    pub fn new() -> Self {
        CartStore {
            cell: StoreCell::new(Cart::new()),
        }
    }

    /// Adds a line or merges it into the existing line with the same SKU.
    pub fn add_item(&self, item: LineItem) -> CoreResult<CartResponse> {
        let sku = item.sku.clone();
        let quantity = item.quantity;
        self.mutate("add_item", |cart| cart.add_item(item))
            .map(|response| {
                debug!(%sku, quantity, total = %response.totals.total, "item added to cart");
                response
            })
    }

    /// Drops the line for `sku`. Removing an absent SKU changes nothing.
    pub fn remove_item(&self, sku: &str) -> CartResponse {
        let removed = self
            .cell
            .update(|cart| Ok::<_, ()>(cart.remove_item(sku)))
            .unwrap_or(false);
        debug!(%sku, removed, "remove_item");
        self.response()
    }

    /// Moves the quantity of `sku` by one.
    pub fn set_quantity(&self, sku: &str, delta: QuantityDelta) -> CoreResult<CartResponse> {
        self.mutate("set_quantity", |cart| cart.set_quantity(sku, delta))
            .map(|response| {
                debug!(%sku, ?delta, "quantity changed");
                response
            })
    }

    pub fn apply_discount(&self, amount: Money) -> CoreResult<CartResponse> {
        self.mutate("apply_discount", |cart| cart.apply_discount(amount))
    }

    pub fn set_shipping_fee(&self, amount: Money) -> CoreResult<CartResponse> {
        self.mutate("set_shipping_fee", |cart| cart.set_shipping_fee(amount))
    }

    pub fn set_billing_address(&self, address: BillingAddress) -> CoreResult<CartResponse> {
        self.mutate("set_billing_address", |cart| {
            cart.set_billing_address(address)
        })
    }

    /// Replaces every line with the server's copy of the cart.
    pub fn replace_items(&self, items: Vec<LineItem>) -> CoreResult<CartResponse> {
        self.mutate("replace_items", |cart| cart.replace_items(items))
    }

    /// Takes the lines of a placed order out of the cart. Lines added while
    /// the order was in flight stay.
    pub fn settle_order(&self, ordered: &[LineItem]) -> CoreResult<CartResponse> {
        self.mutate("settle_order", |cart| cart.settle_order(ordered))
            .map(|response| {
                debug!(
                    ordered = ordered.len(),
                    remaining = response.totals.item_count,
                    "order settled"
                );
                response
            })
    }

    /// Empties the cart and returns checkout to its first step.
    pub fn reset(&self) {
        let _ = self.cell.update(|cart| {
            cart.reset();
            Ok::<_, ()>(())
        });
        debug!("cart reset");
    }

    pub fn next_step(&self) -> CoreResult<CheckoutStep> {
        self.mutate_step("next_step", Cart::next_step)
    }

    pub fn back_step(&self) -> CheckoutStep {
        let step = self
            .cell
            .update(|cart| Ok::<_, ()>(cart.back_step()))
            .unwrap_or_default();
        debug!(%step, "back_step");
        step
    }

    pub fn go_to_step(&self, step: CheckoutStep) -> CoreResult<CheckoutStep> {
        self.mutate_step("go_to_step", |cart| cart.go_to_step(step))
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.cell.read(Cart::clone)
    }

    pub fn totals(&self) -> CartTotals {
        self.cell.read(|cart| CartTotals::from(cart))
    }

    pub fn response(&self) -> CartResponse {
        self.cell.read(|cart| CartResponse::from(cart))
    }

    /// Receiver that yields a new cart after every accepted change.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cell.subscribe()
    }

    fn mutate<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Cart) -> CoreResult<R>,
    ) -> CoreResult<CartResponse> {
        self.cell
            .update(|cart| f(cart).map(|_| CartResponse::from(&*cart)))
            .map_err(|e| {
                warn!(op, error = %e, "cart change rejected");
                e
            })
    }

    fn mutate_step(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Cart) -> CoreResult<CheckoutStep>,
    ) -> CoreResult<CheckoutStep> {
        match self.cell.update(f) {
            Ok(step) => {
                debug!(op, %step, "checkout step changed");
                Ok(step)
            }
            Err(e) => {
                warn!(op, error = %e, "checkout step rejected");
                Err(e)
            }
        }
    }
}
