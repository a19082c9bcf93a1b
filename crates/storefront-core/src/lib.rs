//! # storefront-core: Pure Business Logic for the Storefront
//!
//! Every calculation the storefront and back-office views depend on lives
//! here as plain, synchronous code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Pages (product, cart, checkout, admin)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ store operations                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-state (stores, debounce, API)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  money  │ │  cart   │ │ checkout │ │ currency │ │listing │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Line items, billing address, product references
//! - [`cart`] - Cart container with merge-by-SKU and totals
//! - [`checkout`] - Checkout step machine layered on the cart
//! - [`wishlist`] - Saved product references
//! - [`currency`] - Exchange rate conversion and display formatting
//! - [`listing`] - Paged admin lists, filters, URL query string mapping
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, LineItem, Money};
//!
//! let mut cart = Cart::new();
//! cart.add_item(LineItem::new("p-1", "A", "Mug", Money::from_cents(1000), 2)).unwrap();
//! cart.set_shipping_fee(Money::from_cents(500)).unwrap();
//!
//! assert_eq!(cart.subtotal().cents(), 2000);
//! assert_eq!(cart.total().cents(), 2500);
//! ```

pub mod cart;
pub mod checkout;
pub mod currency;
pub mod error;
pub mod listing;
pub mod money;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals, QuantityDelta};
pub use checkout::CheckoutStep;
pub use currency::{CurrencyConverter, CurrencyRate, CurrencySetting, ExchangeRate};
pub use error::{CartError, CoreResult, ValidationError};
pub use listing::{
    FilterDescriptor, FilterOption, ListView, Page, RowRenderer, RowSlot, ViewState,
};
pub use money::Money;
pub use types::*;
pub use wishlist::Wishlist;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// The page layer clamps to the product's stock before calling the cart;
/// this is the hard ceiling the cart enforces on its own.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest single amount (price, discount, fee) the cart accepts, in minor
/// units. With the line and quantity ceilings this keeps every cart sum far
/// inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Number of placeholder rows a list renders while its query is loading.
pub const SKELETON_ROWS: usize = 6;

/// Fallback currency code when nothing else is configured.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";
