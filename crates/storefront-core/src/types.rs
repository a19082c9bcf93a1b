//! # Domain Types
//!
//! Value types shared by the cart, checkout and wishlist.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │ BillingAddress  │   │   ProductRef    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  name, email    │   │  id             │       │
//! │  │  sku (cart key) │   │  phone          │   │  name, slug     │       │
//! │  │  unit_price     │   │  address, city  │   │  price          │       │
//! │  │  sale_price?    │   │  country, zip   │   │  image?         │       │
//! │  │  quantity ≥ 1   │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │        Cart               CheckoutFlow            Wishlist              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Line Item
// =============================================================================

/// One purchasable variant in the cart.
///
/// ## Snapshot Semantics
/// Prices are captured when the line is added. A later catalogue change does
/// not move the amount the shopper already saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Product this variant belongs to.
    pub product_id: String,

    /// Variant SKU. Unique within a cart.
    pub sku: String,

    /// Display name at time of adding.
    pub name: String,

    /// Regular price per unit.
    pub unit_price: Money,

    /// Sale price per unit; overrides `unit_price` when present.
    #[serde(default)]
    pub sale_price: Option<Money>,

    /// Units of this variant. Always ≥ 1 once in a cart.
    pub quantity: i64,

    #[ts(as = "String")]
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line item at the regular price.
    pub fn new(
        product_id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        LineItem {
            product_id: product_id.into(),
            sku: sku.into(),
            name: name.into(),
            unit_price,
            sale_price: None,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Sets a sale price that overrides the regular price.
    pub fn with_sale_price(mut self, sale_price: Money) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    /// Sale price if set, otherwise the regular price.
    #[inline]
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.unit_price)
    }

    /// Effective price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.effective_price().multiply_quantity(self.quantity)
    }

    /// [`LineItem::line_total`], or `None` if it does not fit.
    pub fn checked_line_total(&self) -> Option<Money> {
        self.effective_price().checked_multiply_quantity(self.quantity)
    }

    /// Amount saved against the regular price across the whole line.
    pub fn savings(&self) -> Money {
        match self.sale_price {
            Some(sale) if sale < self.unit_price => {
                (self.unit_price - sale).multiply_quantity(self.quantity)
            }
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Billing Address
// =============================================================================

/// Billing details collected during checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillingAddress {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
    pub zip_code: String,
}

impl BillingAddress {
    /// Checks every field against the checkout form rules.
    ///
    /// Returns the first failure, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_required("name", &self.name, 100)?;
        validation::validate_email(&self.email)?;
        validation::validate_phone(&self.phone)?;
        validation::validate_required("address", &self.address, 200)?;
        validation::validate_required("city", &self.city, 100)?;
        validation::validate_required("country", &self.country, 100)?;
        validation::validate_required("zipCode", &self.zip_code, 20)?;
        Ok(())
    }
}

// =============================================================================
// Product Reference
// =============================================================================

/// A product as the wishlist and listing views reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: Money,
    #[serde(default)]
    pub sale_price: Option<Money>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductRef {
    #[inline]
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> BillingAddress {
        BillingAddress {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0958".to_string(),
            address: "12 Analytical Row".to_string(),
            city: "London".to_string(),
            state: None,
            country: "UK".to_string(),
            zip_code: "N1 9GU".to_string(),
        }
    }

    #[test]
    fn test_effective_price_prefers_sale() {
        let item = LineItem::new("p1", "MUG", "Mug", Money::from_cents(1000), 2);
        assert_eq!(item.effective_price().cents(), 1000);
        assert_eq!(item.savings(), Money::zero());

        let item = item.with_sale_price(Money::from_cents(800));
        assert_eq!(item.effective_price().cents(), 800);
        assert_eq!(item.line_total().cents(), 1600);
        assert_eq!(item.savings().cents(), 400);
    }

    #[test]
    fn test_line_item_wire_shape() {
        let json = r#"{
            "productId": "p1",
            "sku": "MUG",
            "name": "Mug",
            "unitPrice": 1000,
            "quantity": 1
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.sku, "MUG");
        assert_eq!(item.sale_price, None);
    }

    #[test]
    fn test_billing_address_validation() {
        assert!(address().validate().is_ok());

        let mut missing_city = address();
        missing_city.city = "  ".to_string();
        assert_eq!(
            missing_city.validate(),
            Err(ValidationError::Required {
                field: "city".to_string()
            })
        );

        let mut bad_email = address();
        bad_email.email = "ada.example.com".to_string();
        assert!(matches!(
            bad_email.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
