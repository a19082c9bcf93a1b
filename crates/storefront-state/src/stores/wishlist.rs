//! # Wishlist Store

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use storefront_core::{ProductRef, Wishlist};

use super::StoreCell;

/// Shared handle to the shopper's wishlist.
///
/// The server owns the list; the store only mirrors the last fetch.
#[derive(Clone)]
pub struct WishlistStore {
    cell: Arc<StoreCell<Wishlist>>,
}

impl Default for WishlistStore {
    fn default() -> Self {
        WishlistStore::new()
    }
}

impl WishlistStore {
    pub fn new() -> Self {
        WishlistStore {
            cell: StoreCell::new(Wishlist::new()),
        }
    }

    /// Replaces the collection with a freshly fetched list.
    pub fn set_wishlist(&self, products: Vec<ProductRef>) -> Wishlist {
        let wishlist = self
            .cell
            .update(|wishlist| {
                wishlist.set_wishlist(products);
                Ok::<_, ()>(wishlist.clone())
            })
            .unwrap_or_default();
        debug!(count = wishlist.len(), "wishlist replaced");
        wishlist
    }

    pub fn reset(&self) {
        let _ = self.cell.update(|wishlist| {
            wishlist.reset();
            Ok::<_, ()>(())
        });
        debug!("wishlist reset");
    }

    /// Drives the filled/outlined heart on product cards.
    pub fn contains(&self, product_id: &str) -> bool {
        self.cell.read(|wishlist| wishlist.contains(product_id))
    }

    pub fn snapshot(&self) -> Wishlist {
        self.cell.read(Wishlist::clone)
    }

    pub fn subscribe(&self) -> watch::Receiver<Wishlist> {
        self.cell.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Money;

    fn product(id: &str) -> ProductRef {
        ProductRef {
            id: id.to_string(),
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            price: Money::from_cents(1000),
            sale_price: None,
            image: None,
        }
    }

    #[test]
    fn test_set_wishlist_replaces() {
        let store = WishlistStore::new();
        store.set_wishlist(vec![product("a"), product("b")]);
        let wishlist = store.set_wishlist(vec![product("c")]);

        assert_eq!(wishlist.len(), 1);
        assert!(store.contains("c"));
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_same_list_publishes_nothing() {
        let store = WishlistStore::new();
        store.set_wishlist(vec![product("a")]);
        let mut rx = store.subscribe();

        store.set_wishlist(vec![product("a")]);
        assert!(!rx.has_changed().unwrap());

        store.reset();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }
}
