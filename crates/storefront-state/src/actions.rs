//! # Actions
//!
//! What pages call in response to user input. Each action drives one or
//! more stores, talks to the API where needed, and either returns the new
//! state or a [`Notice`] for the toast.
//!
//! ## Action Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront Actions                                   │
//! │                                                                         │
//! │  Local only                        Remote + store                       │
//! │  ──────────                        ──────────────                       │
//! │  add_to_cart                       refresh_cart      fetch_cart         │
//! │  update_cart_item                  refresh_wishlist  fetch_wishlist     │
//! │  remove_from_cart                  init_currency     fetch_currencies   │
//! │  clear_cart                        submit_order      place_order        │
//! │  save_billing_address                                                   │
//! │  next_checkout_step / back_checkout_step                                │
//! │  select_currency                                                        │
//! │                                                                         │
//! │  Failure ──► Notice (no retry; the user repeats the action)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use storefront_core::{
    BillingAddress, CheckoutStep, CurrencySetting, LineItem, QuantityDelta, Wishlist,
};

use crate::api::{OrderDraft, OrderReceipt, StorefrontApi};
use crate::config::StorefrontConfig;
use crate::error::Notice;
use crate::stores::{CartResponse, CartStore, SettingsStore, WishlistStore};

pub type ActionResult<T> = Result<T, Notice>;

// =============================================================================
// Cart
// =============================================================================

pub fn add_to_cart(cart: &CartStore, item: LineItem) -> ActionResult<CartResponse> {
    debug!(sku = %item.sku, quantity = item.quantity, "add_to_cart action");
    Ok(cart.add_item(item)?)
}

/// Handles the `+` / `-` buttons; `delta` is the raw `1` or `-1` they send.
pub fn update_cart_item(cart: &CartStore, sku: &str, delta: i64) -> ActionResult<CartResponse> {
    debug!(%sku, delta, "update_cart_item action");
    let delta = QuantityDelta::try_from(delta).map_err(|e| Notice::validation(e.to_string()))?;
    Ok(cart.set_quantity(sku, delta)?)
}

pub fn remove_from_cart(cart: &CartStore, sku: &str) -> CartResponse {
    debug!(%sku, "remove_from_cart action");
    cart.remove_item(sku)
}

pub fn clear_cart(cart: &CartStore) -> CartResponse {
    debug!("clear_cart action");
    cart.reset();
    cart.response()
}

pub fn save_billing_address(
    cart: &CartStore,
    address: BillingAddress,
) -> ActionResult<CartResponse> {
    debug!("save_billing_address action");
    Ok(cart.set_billing_address(address)?)
}

pub fn next_checkout_step(cart: &CartStore) -> ActionResult<CheckoutStep> {
    Ok(cart.next_step()?)
}

pub fn back_checkout_step(cart: &CartStore) -> CheckoutStep {
    cart.back_step()
}

/// Replaces the local cart with the signed-in shopper's server cart.
pub async fn refresh_cart<A: StorefrontApi>(
    api: &A,
    cart: &CartStore,
) -> ActionResult<CartResponse> {
    debug!("refresh_cart action");
    let response = api.fetch_cart().await?;
    let updated = cart.replace_items(response.data)?;
    info!(items = updated.totals.item_count, "cart refreshed from server");
    Ok(updated)
}

// =============================================================================
// Wishlist
// =============================================================================

pub async fn refresh_wishlist<A: StorefrontApi>(
    api: &A,
    wishlist: &WishlistStore,
) -> ActionResult<Wishlist> {
    debug!("refresh_wishlist action");
    let response = api.fetch_wishlist().await?;
    Ok(wishlist.set_wishlist(response.data))
}

// =============================================================================
// Currency
// =============================================================================

/// Fetches the currency list once at start-up and selects the configured
/// `default_currency`, falling back to the base currency if the list lacks it.
pub async fn init_currency<A: StorefrontApi>(
    api: &A,
    settings: &SettingsStore,
    config: &StorefrontConfig,
) -> ActionResult<CurrencySetting> {
    let preferred = config.default_currency.as_str();
    debug!(%preferred, "init_currency action");
    let response = api.fetch_currencies().await?;
    Ok(settings.load_rates(response.data, preferred))
}

pub fn select_currency(settings: &SettingsStore, code: &str) -> ActionResult<CurrencySetting> {
    debug!(%code, "select_currency action");
    Ok(settings.select_currency(code)?)
}

// =============================================================================
// Order
// =============================================================================

/// Places the order for the current cart.
///
/// ## Flow
/// ```text
/// cart snapshot ──► OrderDraft::from_cart ──► place_order ──► cart.settle_order()
///                         │                       │
///                         └── EmptyCart / Missing └── ApiFailure ──► Notice
///                             BillingAddress          (cart kept)
/// ```
///
/// Only the ordered lines leave the cart; anything added while the request
/// was in flight stays for the next order.
///
/// Amounts are sent in the base currency; the active display currency is
/// attached for the receipt.
pub async fn submit_order<A: StorefrontApi>(
    api: &A,
    cart: &CartStore,
    settings: &SettingsStore,
) -> ActionResult<OrderReceipt> {
    debug!("submit_order action");
    let currency = settings.currency().active_code;
    let draft = OrderDraft::from_cart(&cart.snapshot(), &currency)?;

    let response = api.place_order(&draft).await?;
    if let Err(e) = cart.settle_order(&draft.items) {
        warn!(error = %e, order_id = %response.data.order_id, "placed order left cart unchanged");
    }

    info!(
        order_id = %response.data.order_id,
        draft_id = %draft.id,
        total = %draft.total,
        items = draft.items.len(),
        "Order placed"
    );
    Ok(response.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use storefront_core::{CartError, CurrencyRate, Money, ProductRef};

    use crate::api::{ApiFailure, ApiResponse, ApiResult};
    use crate::error::{NoticeCode, Redirect};

    struct MockApi {
        cart: ApiResult<Vec<LineItem>>,
        wishlist: ApiResult<Vec<ProductRef>>,
        currencies: ApiResult<Vec<CurrencyRate>>,
        order: ApiResult<OrderReceipt>,
        placed: Mutex<Vec<OrderDraft>>,
        /// Shopper's cart, touched while an order request is in flight.
        in_flight: Option<(CartStore, LineItem)>,
    }

    impl Default for MockApi {
        fn default() -> Self {
            MockApi {
                cart: Ok(ApiResponse::new(Vec::new())),
                wishlist: Ok(ApiResponse::new(Vec::new())),
                currencies: Ok(ApiResponse::new(Vec::new())),
                order: Ok(ApiResponse::new(OrderReceipt {
                    order_id: "ord-1".to_string(),
                })),
                placed: Mutex::new(Vec::new()),
                in_flight: None,
            }
        }
    }

    impl StorefrontApi for MockApi {
        async fn fetch_cart(&self) -> ApiResult<Vec<LineItem>> {
            self.cart.clone()
        }

        async fn fetch_wishlist(&self) -> ApiResult<Vec<ProductRef>> {
            self.wishlist.clone()
        }

        async fn fetch_currencies(&self) -> ApiResult<Vec<CurrencyRate>> {
            self.currencies.clone()
        }

        async fn place_order(&self, order: &OrderDraft) -> ApiResult<OrderReceipt> {
            self.placed.lock().unwrap().push(order.clone());
            if let Some((cart, item)) = &self.in_flight {
                cart.add_item(item.clone()).unwrap();
            }
            self.order.clone()
        }
    }

    fn item(sku: &str, cents: i64, quantity: i64) -> LineItem {
        LineItem::new("p", sku, sku, Money::from_cents(cents), quantity)
    }

    fn address() -> BillingAddress {
        BillingAddress {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: "5550001111".to_string(),
            address: "1 Compiler Way".to_string(),
            city: "Arlington".to_string(),
            state: Some("VA".to_string()),
            country: "US".to_string(),
            zip_code: "22201".to_string(),
        }
    }

    fn unauthorized<T>() -> ApiResult<T> {
        Err(ApiFailure::new(Some(401), Some("Session expired".to_string())))
    }

    #[test]
    fn test_update_cart_item_rejects_large_delta() {
        let cart = CartStore::new();
        add_to_cart(&cart, item("MUG", 1500, 1)).unwrap();

        let notice = update_cart_item(&cart, "MUG", 5).unwrap_err();
        assert_eq!(notice.code, NoticeCode::ValidationError);

        let response = update_cart_item(&cart, "MUG", 1).unwrap();
        assert_eq!(response.totals.total_quantity, 2);
    }

    #[test]
    fn test_missing_sku_is_not_found() {
        let cart = CartStore::new();
        let notice = update_cart_item(&cart, "NOPE", -1).unwrap_err();
        assert_eq!(notice.code, NoticeCode::NotFound);
    }

    #[tokio::test]
    async fn test_refresh_cart_replaces_items() {
        let api = MockApi {
            cart: Ok(ApiResponse::new(vec![item("HAT", 900, 2), item("MUG", 1500, 1)])),
            ..MockApi::default()
        };
        let cart = CartStore::new();
        add_to_cart(&cart, item("OLD", 100, 1)).unwrap();

        let response = refresh_cart(&api, &cart).await.unwrap();
        assert_eq!(response.totals.item_count, 2);
        assert_eq!(response.totals.subtotal, Money::from_cents(3300));
        assert!(cart.snapshot().get("OLD").is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_fetch_redirects_and_keeps_state() {
        let api = MockApi {
            wishlist: unauthorized(),
            ..MockApi::default()
        };
        let wishlist = WishlistStore::new();

        let notice = refresh_wishlist(&api, &wishlist).await.unwrap_err();
        assert_eq!(notice.code, NoticeCode::Unauthorized);
        assert_eq!(notice.redirect, Some(Redirect::SignIn));
        assert!(wishlist.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_init_currency_then_select() {
        let api = MockApi {
            currencies: Ok(ApiResponse::new(vec![CurrencyRate {
                code: "EUR".to_string(),
                name: Some("Euro".to_string()),
                rate: Some(0.9),
            }])),
            ..MockApi::default()
        };
        let config = StorefrontConfig {
            default_currency: "EUR".to_string(),
            ..StorefrontConfig::default()
        };
        let settings = SettingsStore::new(&config.base_currency);

        let setting = init_currency(&api, &settings, &config).await.unwrap();
        assert_eq!(setting.active_code, "EUR");
        assert_eq!(
            settings.converter().convert(Money::from_cents(1000)),
            Money::from_cents(900)
        );

        let notice = select_currency(&settings, "JPY").unwrap_err();
        assert_eq!(notice.code, NoticeCode::ValidationError);
        assert_eq!(select_currency(&settings, "usd").unwrap().active_code, "USD");
    }

    #[tokio::test]
    async fn test_submit_order_resets_cart() {
        let api = MockApi::default();
        let cart = CartStore::new();
        let settings = SettingsStore::new("USD");

        add_to_cart(&cart, item("MUG", 1500, 2)).unwrap();
        save_billing_address(&cart, address()).unwrap();

        let receipt = submit_order(&api, &cart, &settings).await.unwrap();
        assert_eq!(receipt.order_id, "ord-1");
        assert!(cart.snapshot().is_empty());

        let placed = api.placed.lock().unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].total, Money::from_cents(3000));
        assert_eq!(placed[0].currency, "USD");
    }

    #[tokio::test]
    async fn test_init_currency_unknown_default_falls_back_to_base() {
        let config = StorefrontConfig {
            default_currency: "JPY".to_string(),
            ..StorefrontConfig::default()
        };
        let settings = SettingsStore::new(&config.base_currency);

        let setting = init_currency(&MockApi::default(), &settings, &config)
            .await
            .unwrap();
        assert_eq!(setting.active_code, "USD");
    }

    #[tokio::test]
    async fn test_lines_added_during_order_survive() {
        let cart = CartStore::new();
        let api = MockApi {
            in_flight: Some((cart.clone(), item("HAT", 900, 1))),
            ..MockApi::default()
        };
        let settings = SettingsStore::new("USD");

        add_to_cart(&cart, item("MUG", 1500, 2)).unwrap();
        save_billing_address(&cart, address()).unwrap();

        submit_order(&api, &cart, &settings).await.unwrap();

        let remaining = cart.snapshot();
        assert_eq!(remaining.item_count(), 1);
        assert!(remaining.get("MUG").is_none());
        assert_eq!(remaining.get("HAT").unwrap().quantity, 1);
        assert_eq!(remaining.total(), Money::from_cents(900));
        assert_eq!(api.placed.lock().unwrap()[0].items.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_order_keeps_cart() {
        let api = MockApi {
            order: Err(ApiFailure::new(Some(500), None)),
            ..MockApi::default()
        };
        let cart = CartStore::new();
        let settings = SettingsStore::new("USD");
        add_to_cart(&cart, item("MUG", 1500, 1)).unwrap();
        save_billing_address(&cart, address()).unwrap();

        let notice = submit_order(&api, &cart, &settings).await.unwrap_err();
        assert_eq!(notice.code, NoticeCode::RequestFailed);
        assert_eq!(cart.snapshot().item_count(), 1);
    }

    #[tokio::test]
    async fn test_order_needs_billing_address() {
        let api = MockApi::default();
        let cart = CartStore::new();
        let settings = SettingsStore::new("USD");
        add_to_cart(&cart, item("MUG", 1500, 1)).unwrap();

        let notice = submit_order(&api, &cart, &settings).await.unwrap_err();
        assert_eq!(
            notice,
            Notice::from(CartError::MissingBillingAddress(CheckoutStep::Cart))
        );
        assert!(api.placed.lock().unwrap().is_empty());
    }
}
