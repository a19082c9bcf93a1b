//! # Remote API Seam
//!
//! The REST API is an external collaborator. This module fixes the shape of
//! what the stores need from it and nothing more; the HTTP client, auth
//! header and base URL live in the page layer's implementation.
//!
//! ## Response Contract
//! ```text
//! success  200 { "data": <T>, "message": "Added to wishlist" }
//! failure  4xx { "message": "Coupon expired" }   ──► ApiFailure { status, message }
//! network  --  (no response)                      ──► ApiFailure { status: None, .. }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use storefront_core::{
    BillingAddress, Cart, CartError, CoreResult, CurrencyRate, LineItem, Money, ProductRef,
};

// =============================================================================
// Response / Failure
// =============================================================================

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        ApiResponse {
            data,
            message: None,
        }
    }
}

/// A request that failed, with whatever the server said about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed (status {status:?}): {message:?}")]
pub struct ApiFailure {
    /// HTTP status; `None` when no response arrived.
    pub status: Option<u16>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiFailure {
    pub fn new(status: Option<u16>, message: Option<String>) -> Self {
        ApiFailure { status, message }
    }

    /// Builds a failure from an error response body.
    ///
    /// Bodies that are not JSON, or have no `message`, still produce a
    /// failure; the message is just absent.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message);
        ApiFailure::new(Some(status), message)
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiFailure>;

// =============================================================================
// Orders
// =============================================================================

/// Order payload built from the cart at the moment the shopper confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Client-generated id; lets the backend drop a double submit.
    pub id: Uuid,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub shipping_fee: Money,
    pub total: Money,
    pub currency: String,
    pub billing_address: BillingAddress,
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Freezes the cart into an order payload.
    ///
    /// ## Errors
    /// - `EmptyCart` if there is nothing to order
    /// - `MissingBillingAddress` if checkout skipped the billing step
    pub fn from_cart(cart: &Cart, currency: &str) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CartError::EmptyCart);
        }
        let billing_address = cart
            .billing_address()
            .cloned()
            .ok_or(CartError::MissingBillingAddress(cart.current_step()))?;

        Ok(OrderDraft {
            id: Uuid::new_v4(),
            items: cart.items().to_vec(),
            subtotal: cart.subtotal(),
            discount: cart.discount(),
            shipping_fee: cart.shipping_fee(),
            total: cart.total(),
            currency: currency.to_string(),
            billing_address,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
}

// =============================================================================
// API Trait
// =============================================================================

/// What the stores need from the backend.
///
/// Implemented by the page layer's HTTP client, and by in-memory fakes in
/// tests.
#[allow(async_fn_in_trait)]
pub trait StorefrontApi {
    /// The signed-in shopper's server-side cart.
    async fn fetch_cart(&self) -> ApiResult<Vec<LineItem>>;

    async fn fetch_wishlist(&self) -> ApiResult<Vec<ProductRef>>;

    /// Currency list with rates relative to the base currency.
    async fn fetch_currencies(&self) -> ApiResult<Vec<CurrencyRate>>;

    async fn place_order(&self, order: &OrderDraft) -> ApiResult<OrderReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::CheckoutStep;

    #[test]
    fn test_failure_from_body() {
        let failure = ApiFailure::from_body(422, r#"{"message":"Coupon expired"}"#);
        assert_eq!(failure.status, Some(422));
        assert_eq!(failure.message.as_deref(), Some("Coupon expired"));

        let failure = ApiFailure::from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(failure.message, None);

        let failure = ApiFailure::from_body(500, "{}");
        assert_eq!(failure.message, None);
    }

    #[test]
    fn test_response_message_optional() {
        let response: ApiResponse<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert_eq!(response.data, vec![1, 2]);
        assert_eq!(response.message, None);
    }

    #[test]
    fn test_order_draft_requires_items_and_address() {
        let mut cart = Cart::new();
        assert_eq!(
            OrderDraft::from_cart(&cart, "USD"),
            Err(CartError::EmptyCart)
        );

        cart.add_item(LineItem::new("p1", "CAP", "Cap", Money::from_cents(1200), 1))
            .unwrap();
        assert_eq!(
            OrderDraft::from_cart(&cart, "USD"),
            Err(CartError::MissingBillingAddress(CheckoutStep::Cart))
        );
    }
}
