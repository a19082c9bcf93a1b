//! # Wishlist
//!
//! Saved product references, shown in the order the backend returned them.
//! There is no per-item merge logic: the backend owns the list and the
//! client replaces it wholesale after each fetch.

use serde::Serialize;
use ts_rs::TS;

use crate::types::ProductRef;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Wishlist {
    items: Vec<ProductRef>,
}

impl Wishlist {
    pub fn new() -> Self {
        Wishlist::default()
    }

    /// Replaces the whole collection.
    ///
    /// A product listed twice keeps its first position.
    pub fn set_wishlist(&mut self, products: Vec<ProductRef>) {
        let mut items: Vec<ProductRef> = Vec::with_capacity(products.len());
        for product in products {
            if !items.iter().any(|p| p.id == product.id) {
                items.push(product);
            }
        }
        self.items = items;
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[ProductRef] {
        &self.items
    }

    /// Whether the heart icon for this product should be filled.
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: &str) -> ProductRef {
        ProductRef {
            id: id.to_string(),
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            price: Money::from_cents(1500),
            sale_price: None,
            image: None,
        }
    }

    #[test]
    fn test_set_replaces_and_keeps_order() {
        let mut wishlist = Wishlist::new();
        wishlist.set_wishlist(vec![product("a"), product("b")]);
        wishlist.set_wishlist(vec![product("c"), product("a"), product("c")]);

        let ids: Vec<&str> = wishlist.items().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert!(wishlist.contains("a"));
        assert!(!wishlist.contains("b"));
    }

    #[test]
    fn test_reset() {
        let mut wishlist = Wishlist::new();
        wishlist.set_wishlist(vec![product("a")]);
        wishlist.reset();
        assert!(wishlist.is_empty());
        assert_eq!(wishlist.len(), 0);
    }
}
