//! # Settings Store
//!
//! Holds the currency list fetched at start-up and the active selection.
//! Price views never touch the store directly; they take the
//! [`CurrencyConverter`] it hands out.
//!
//! ```text
//! fetch_currencies ──► load_rates(rates, preferred) ──► CurrencySetting
//!                                                           │
//! currency picker ───► select_currency(code) ──────────────┤
//!                                                           ▼
//!                                          converter() ──► price views
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use storefront_core::{CurrencyConverter, CurrencyRate, CurrencySetting};

use super::StoreCell;
use crate::error::{StateError, StateResult};

/// Everything the settings store keeps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub currency: CurrencySetting,
    /// Last fetched currency list; empty until the first fetch.
    pub rates: Vec<CurrencyRate>,
}

/// Shared handle to the app settings.
#[derive(Clone)]
pub struct SettingsStore {
    cell: Arc<StoreCell<Settings>>,
}

impl SettingsStore {
    /// Starts in the base currency at identity rate.
    pub fn new(base_code: &str) -> Self {
        SettingsStore {
            cell: StoreCell::new(Settings {
                currency: CurrencySetting::base(base_code),
                rates: Vec::new(),
            }),
        }
    }

    /// Stores a fetched currency list and selects `preferred` from it.
    ///
    /// A preferred code missing from the list leaves the base currency
    /// active.
    pub fn load_rates(&self, rates: Vec<CurrencyRate>, preferred: &str) -> CurrencySetting {
        let setting = self
            .cell
            .update(|settings| {
                let base_code = settings.currency.base_code.clone();
                settings.currency = CurrencySetting::from_rates(&rates, preferred, &base_code);
                settings.rates = rates;
                Ok::<_, ()>(settings.currency.clone())
            })
            .unwrap_or_default();

        if !setting.active_code.eq_ignore_ascii_case(preferred.trim()) {
            warn!(%preferred, active = %setting.active_code, "preferred currency not offered");
        }
        info!(
            active = %setting.active_code,
            rate_millionths = setting.rate.millionths(),
            "currency rates loaded"
        );
        setting
    }

    /// Switches the active currency.
    ///
    /// ## Errors
    /// `UnknownCurrency` if `code` is neither the base currency nor in the
    /// loaded list. The current selection is kept.
    pub fn select_currency(&self, code: &str) -> StateResult<CurrencySetting> {
        let setting = self.cell.update(|settings| {
            let Settings { currency, rates } = settings;
            if currency.select(rates, code) {
                Ok(currency.clone())
            } else {
                Err(StateError::UnknownCurrency(code.to_string()))
            }
        });

        match &setting {
            Ok(s) => debug!(active = %s.active_code, "currency selected"),
            Err(e) => warn!(error = %e, "currency selection rejected"),
        }
        setting
    }

    pub fn currency(&self) -> CurrencySetting {
        self.cell.read(|settings| settings.currency.clone())
    }

    /// Read-only converter for the active currency.
    pub fn converter(&self) -> CurrencyConverter {
        self.cell.read(|settings| settings.currency.converter())
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.cell.subscribe()
    }
}
