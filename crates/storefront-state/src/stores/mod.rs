//! # Stores
//!
//! Process-wide containers for the cart, wishlist and settings.
//!
//! ## Why Separate Stores?
//! Each page asks only for the store it uses, and a cart mutation never
//! blocks a currency read. The stores are created once and passed down
//! explicitly; nothing here is a global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Architecture                                   │
//! │                                                                         │
//! │  app start ──► Stores::new(&config)                                     │
//! │                    │                                                    │
//! │        ┌───────────┼─────────────────┐                                  │
//! │        ▼           ▼                 ▼                                  │
//! │  ┌───────────┐ ┌─────────────┐ ┌──────────────┐                         │
//! │  │ CartStore │ │WishlistStore│ │SettingsStore │                         │
//! │  │   Cart    │ │  Wishlist   │ │ CurrencySet. │──► converter() (r/o)    │
//! │  └─────┬─────┘ └──────┬──────┘ └──────┬───────┘                         │
//! │        └──── watch::Receiver snapshots ──► views re-render              │
//! │                                                                         │
//! │  logout ──► Stores::logout(): cart + wishlist cleared, currency kept    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! - Every store is `Clone` (shared `Arc`) and guards its value with a
//!   `Mutex`
//! - A mutation and the snapshot it publishes happen under the same lock, so
//!   subscribers never observe updates out of order
//! - Mutations run on a staged copy: a failed one changes and publishes
//!   nothing
//! - A panic inside a mutation poisons the mutex but never the value (the
//!   staged copy is dropped), so later calls recover the lock and carry on

mod cart;
mod settings;
mod wishlist;

pub use cart::{CartResponse, CartStore};
pub use settings::{Settings, SettingsStore};
pub use wishlist::WishlistStore;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::StorefrontConfig;

// =============================================================================
// Store Cell
// =============================================================================

/// A value behind a mutex plus a watch channel carrying its latest snapshot.
pub(crate) struct StoreCell<T> {
    value: Mutex<T>,
    tx: watch::Sender<T>,
}

impl<T: Clone + PartialEq> StoreCell<T> {
    pub(crate) fn new(value: T) -> Arc<Self> {
        let (tx, _rx) = watch::channel(value.clone());
        Arc::new(StoreCell {
            value: Mutex::new(value),
            tx,
        })
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.value.lock().unwrap_or_else(|poisoned| {
            warn!("store mutex was poisoned; recovering last committed value");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Runs `f` with read access.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.lock();
        f(&value)
    }

    /// Runs `f` against a staged copy. On success the copy replaces the
    /// value and, if it differs, is published; on failure nothing changes.
    pub(crate) fn update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let mut value = self.lock();
        let mut staged = value.clone();
        let result = f(&mut staged)?;

        if staged != *value {
            *value = staged.clone();
            self.tx.send_replace(staged);
        }
        Ok(result)
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

// =============================================================================
// Stores Bundle
// =============================================================================

/// All stores, created once at application start and passed to pages.
#[derive(Clone)]
pub struct Stores {
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub settings: SettingsStore,
}

impl Stores {
    pub fn new(config: &StorefrontConfig) -> Self {
        info!(
            base_currency = %config.base_currency,
            "initializing stores"
        );
        Stores {
            cart: CartStore::new(),
            wishlist: WishlistStore::new(),
            settings: SettingsStore::new(&config.base_currency),
        }
    }

    /// Tears down the shopper's containers. The currency selection is an app
    /// preference and survives.
    pub fn logout(&self) {
        info!("logout: clearing cart and wishlist");
        self.cart.reset();
        self.wishlist.reset();
    }
}
