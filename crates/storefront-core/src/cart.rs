//! # Cart
//!
//! The shopping cart container: line items merged by SKU plus the derived
//! subtotal and total.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Event                 Operation              Cart Change            │
//! │  ────────                 ─────────              ───────────            │
//! │                                                                         │
//! │  Add to cart ───────────► add_item() ──────────► merge by sku / push    │
//! │  "+" / "−" ─────────────► set_quantity() ──────► qty ± 1                │
//! │  Remove ────────────────► remove_item() ───────► drop line              │
//! │  Coupon accepted ───────► apply_discount() ────► discount = n           │
//! │  Shipping method ───────► set_shipping_fee() ──► shipping = n           │
//! │  Backend cart loaded ───► replace_items() ─────► items = fetched        │
//! │  Order placed / logout ─► reset() ─────────────► empty                  │
//! │                                                                         │
//! │  After EVERY mutation:                                                  │
//! │    subtotal = Σ effective_price × quantity                              │
//! │    total    = subtotal − discount + shipping_fee                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per SKU; lines keep insertion order
//! - Every line has `1 ≤ quantity ≤ MAX_ITEM_QUANTITY`
//! - `total == subtotal - discount + shipping_fee` after every operation
//! - An empty cart has zero discount, zero shipping, no billing address
//!   and sits on the first checkout step
//! - Amount arithmetic is checked; an overflow rejects the operation
//! - A failed operation leaves the cart untouched

use serde::Serialize;
use ts_rs::TS;

use crate::checkout::CheckoutStep;
use crate::error::{CartError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{BillingAddress, LineItem};
use crate::validation::{validate_amount, validate_cart_size, validate_quantity, validate_sku};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Quantity Delta
// =============================================================================

/// Direction of a single-step quantity change from the "+" / "−" buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityDelta {
    Increment,
    Decrement,
}

impl QuantityDelta {
    #[inline]
    pub const fn as_i64(self) -> i64 {
        match self {
            QuantityDelta::Increment => 1,
            QuantityDelta::Decrement => -1,
        }
    }
}

impl TryFrom<i64> for QuantityDelta {
    type Error = ValidationError;

    fn try_from(delta: i64) -> Result<Self, Self::Error> {
        match delta {
            1 => Ok(QuantityDelta::Increment),
            -1 => Ok(QuantityDelta::Decrement),
            _ => Err(ValidationError::OutOfRange {
                field: "delta".to_string(),
                min: -1,
                max: 1,
            }),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// Fields are only reachable through operations so the totals can never
/// drift from the items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    pub(crate) items: Vec<LineItem>,
    pub(crate) subtotal: Money,
    pub(crate) discount: Money,
    pub(crate) shipping_fee: Money,
    pub(crate) total: Money,
    pub(crate) current_step: CheckoutStep,
    pub(crate) billing_address: Option<BillingAddress>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a line, or merges it into the existing line with the same SKU.
    ///
    /// ## Behavior
    /// - SKU already in cart: quantity increases by `item.quantity`
    /// - SKU not in cart: appended at the end
    /// - Non-positive quantity, out-of-range price or malformed SKU:
    ///   rejected, cart unchanged
    pub fn add_item(&mut self, item: LineItem) -> CoreResult<()> {
        self.stage(|cart| cart.merge_item(item))
    }

    /// Removes the line with this SKU.
    ///
    /// ## Returns
    /// `true` if a line was removed; `false` (and no change) if absent.
    pub fn remove_item(&mut self, sku: &str) -> bool {
        if self.get(sku).is_none() {
            return false;
        }
        self.stage(|cart| {
            cart.items.retain(|i| i.sku != sku);
            Ok(())
        })
        .is_ok()
    }

    /// Moves a line's quantity one step up or down.
    ///
    /// The page clamps increments to available stock before calling. A
    /// decrement below 1 fails with [`CartError::InvalidQuantity`]; the UI
    /// must call [`Cart::remove_item`] instead.
    ///
    /// ## Returns
    /// The line's new quantity.
    pub fn set_quantity(&mut self, sku: &str, delta: QuantityDelta) -> CoreResult<i64> {
        self.stage(|cart| {
            let item = cart
                .items
                .iter_mut()
                .find(|i| i.sku == sku)
                .ok_or_else(|| CartError::ItemNotFound(sku.to_string()))?;

            let new_qty = item.quantity + delta.as_i64();
            check_line_quantity(sku, new_qty)?;
            item.quantity = new_qty;
            Ok(new_qty)
        })
    }

    /// Sets the coupon discount and recomputes the total.
    pub fn apply_discount(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("discount", amount)?;
        self.stage(|cart| {
            cart.discount = amount;
            Ok(())
        })
    }

    /// Sets the shipping fee and recomputes the total.
    pub fn set_shipping_fee(&mut self, amount: Money) -> CoreResult<()> {
        validate_amount("shippingFee", amount)?;
        self.stage(|cart| {
            cart.shipping_fee = amount;
            Ok(())
        })
    }

    /// Stores the billing address collected in checkout.
    ///
    /// Totals are not affected.
    pub fn set_billing_address(&mut self, address: BillingAddress) -> CoreResult<()> {
        address.validate()?;
        self.billing_address = Some(address);
        Ok(())
    }

    /// Replaces the contents with a list fetched from the backend.
    ///
    /// Duplicate SKUs in the list are merged in first-seen order. The list is
    /// validated as a whole: one bad line rejects the replacement and the
    /// current contents stay.
    pub fn replace_items(&mut self, items: Vec<LineItem>) -> CoreResult<()> {
        self.stage(|cart| {
            cart.items.clear();
            items.into_iter().try_for_each(|item| cart.merge_item(item))
        })
    }

    /// Takes the lines of a placed order out of the cart.
    ///
    /// Each ordered line's quantity is subtracted from the matching line, so
    /// anything added while the order was in flight stays. The discount was
    /// spent on the order and is cleared. If nothing remains this is the
    /// same as [`Cart::reset`].
    pub fn settle_order(&mut self, ordered: &[LineItem]) -> CoreResult<()> {
        self.stage(|cart| {
            for line in ordered {
                if let Some(item) = cart.items.iter_mut().find(|i| i.sku == line.sku) {
                    item.quantity = item.quantity.saturating_sub(line.quantity);
                }
            }
            cart.items.retain(|i| i.quantity >= 1);
            cart.discount = Money::zero();
            cart.current_step = CheckoutStep::Cart;
            Ok(())
        })?;

        if self.is_empty() {
            self.reset();
        }
        Ok(())
    }

    /// Empties the cart and returns to the first checkout step.
    ///
    /// Calling it twice is the same as calling it once.
    pub fn reset(&mut self) {
        *self = Cart::default();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, sku: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.sku == sku)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines (the badge on the cart icon).
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn shipping_fee(&self) -> Money {
        self.shipping_fee
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn current_step(&self) -> CheckoutStep {
        self.current_step
    }

    pub fn billing_address(&self) -> Option<&BillingAddress> {
        self.billing_address.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Staging and Recomputation
    // =========================================================================

    /// Applies `f` to a copy, recomputes it, and commits only if both
    /// succeed.
    fn stage<R>(&mut self, f: impl FnOnce(&mut Cart) -> CoreResult<R>) -> CoreResult<R> {
        let mut staged = self.clone();
        let result = f(&mut staged)?;
        staged.recompute()?;
        *self = staged;
        Ok(result)
    }

    /// Validates one incoming line and merges or appends it. No recompute.
    fn merge_item(&mut self, item: LineItem) -> CoreResult<()> {
        validate_sku(&item.sku)?;
        validate_amount("unitPrice", item.unit_price)?;
        if let Some(sale) = item.sale_price {
            validate_amount("salePrice", sale)?;
        }
        if item.quantity < 1 {
            return Err(CartError::InvalidQuantity {
                sku: item.sku,
                quantity: item.quantity,
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.sku == item.sku) {
            let new_qty = existing.quantity + item.quantity;
            check_line_quantity(&item.sku, new_qty)?;
            existing.quantity = new_qty;
        } else {
            check_line_quantity(&item.sku, item.quantity)?;
            validate_cart_size(self.items.len()).map_err(|_| CartError::CartTooLarge {
                max: crate::MAX_CART_ITEMS,
            })?;
            self.items.push(item);
        }
        Ok(())
    }

    fn recompute(&mut self) -> CoreResult<()> {
        if self.items.is_empty() {
            self.discount = Money::zero();
            self.shipping_fee = Money::zero();
            self.billing_address = None;
            self.current_step = CheckoutStep::Cart;
        }

        let subtotal = self
            .items
            .iter()
            .try_fold(Money::zero(), |acc, item| {
                item.checked_line_total().and_then(|line| acc.checked_add(line))
            })
            .ok_or(CartError::AmountOverflow)?;
        let total = subtotal
            .checked_sub(self.discount)
            .and_then(|t| t.checked_add(self.shipping_fee))
            .ok_or(CartError::AmountOverflow)?;

        self.subtotal = subtotal;
        self.total = total;
        Ok(())
    }
}

/// Checks a line quantity against the quantity rule, reporting which bound
/// was crossed.
fn check_line_quantity(sku: &str, quantity: i64) -> CoreResult<()> {
    validate_quantity(quantity).map_err(|_| {
        if quantity < 1 {
            CartError::InvalidQuantity {
                sku: sku.to_string(),
                quantity,
            }
        } else {
            CartError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            }
        }
    })
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Summary block shown beside the cart and on every checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub savings: Money,
    pub discount: Money,
    pub shipping_fee: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            savings: cart.items.iter().map(LineItem::savings).sum(),
            discount: cart.discount(),
            shipping_fee: cart.shipping_fee(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
