//! # storefront-state: Client State for the Storefront
//!
//! Long-lived containers (cart, wishlist, settings), the debounced search
//! timer, and the actions pages call. All arithmetic is delegated to
//! `storefront-core`.
//!
//! ## Module Organization
//! ```text
//! storefront_state/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── config.rs       ◄─── StorefrontConfig (env > TOML > defaults)
//! ├── stores/
//! │   ├── mod.rs      ◄─── StoreCell, Stores bundle, logout
//! │   ├── cart.rs     ◄─── CartStore (+ checkout step)
//! │   ├── wishlist.rs ◄─── WishlistStore
//! │   └── settings.rs ◄─── SettingsStore (currency)
//! ├── search.rs       ◄─── DebouncedSearch (tokio timer task)
//! ├── api.rs          ◄─── StorefrontApi trait, OrderDraft
//! ├── actions.rs      ◄─── Page-facing actions
//! └── error.rs        ◄─── StateError, Notice
//! ```
//!
//! ## Start-up
//! ```rust,no_run
//! use storefront_state::{init_tracing, Stores, StorefrontConfig};
//!
//! init_tracing();
//! let config = StorefrontConfig::load_or_default(None);
//! let stores = Stores::new(&config);
//! // hand `stores.cart`, `stores.wishlist`, `stores.settings` to the pages
//! ```

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod search;
pub mod stores;

use tracing_subscriber::EnvFilter;

pub use api::{ApiFailure, ApiResponse, ApiResult, OrderDraft, OrderReceipt, StorefrontApi};
pub use config::StorefrontConfig;
pub use error::{Notice, NoticeCode, Redirect, StateError, StateResult};
pub use search::{DebouncedSearch, SearchReceiver};
pub use stores::{CartResponse, CartStore, Settings, SettingsStore, Stores, WishlistStore};

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_state=trace` - Include every search keystroke
/// - Default: `info`, with `debug` for the storefront crates
///
/// Calling this twice is harmless; the second call keeps the first
/// subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront_core=debug,storefront_state=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
