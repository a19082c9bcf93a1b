//! # Checkout Flow
//!
//! A step counter layered on the cart.
//!
//! ```text
//! ┌──────────┐  next   ┌──────────┐  next   ┌──────────┐  next   ┌──────────┐
//! │ 0 Cart   │───────► │1 Billing │───────► │2 Payment │───────► │ 3 Review │
//! │          │ ◄───────│          │ ◄───────│          │ ◄───────│          │
//! └──────────┘  back   └──────────┘  back   └──────────┘  back   └──────────┘
//!      │                                 ▲
//!      └── needs ≥ 1 item                └── needs a billing address
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CartError, CoreResult};

/// Position in the checkout flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CheckoutStep {
    #[default]
    Cart,
    Billing,
    Payment,
    Review,
}

impl CheckoutStep {
    pub const LAST: CheckoutStep = CheckoutStep::Review;

    /// Zero-based index used by the step indicator.
    pub const fn index(self) -> u8 {
        match self {
            CheckoutStep::Cart => 0,
            CheckoutStep::Billing => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(CheckoutStep::Cart),
            1 => Some(CheckoutStep::Billing),
            2 => Some(CheckoutStep::Payment),
            3 => Some(CheckoutStep::Review),
            _ => None,
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Billing => "billing",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
        };
        f.write_str(name)
    }
}

impl Cart {
    /// Advances one step. Staying on the last step is a no-op.
    pub fn next_step(&mut self) -> CoreResult<CheckoutStep> {
        match self.current_step.next() {
            Some(step) => self.go_to_step(step),
            None => Ok(self.current_step),
        }
    }

    /// Goes back one step. At the first step this is a no-op.
    pub fn back_step(&mut self) -> CheckoutStep {
        if let Some(step) = self.current_step.previous() {
            self.current_step = step;
        }
        self.current_step
    }

    /// Jumps to a step, e.g. from a clickable step indicator.
    ///
    /// ## Guards
    /// - Any step after `Cart` needs a non-empty cart
    /// - `Payment` and `Review` need a billing address
    pub fn go_to_step(&mut self, step: CheckoutStep) -> CoreResult<CheckoutStep> {
        if step > CheckoutStep::Cart && self.is_empty() {
            return Err(CartError::EmptyCart);
        }
        if step >= CheckoutStep::Payment && self.billing_address.is_none() {
            return Err(CartError::MissingBillingAddress(step));
        }

        self.current_step = step;
        Ok(step)
    }

    /// [`Cart::go_to_step`] by raw index, as sent by the step indicator.
    pub fn go_to_index(&mut self, index: u8) -> CoreResult<CheckoutStep> {
        let step = CheckoutStep::from_index(index).ok_or(CartError::UnknownStep(index))?;
        self.go_to_step(step)
    }
}
