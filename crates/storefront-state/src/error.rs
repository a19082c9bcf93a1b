//! # Errors and Notices
//!
//! `StateError` covers failures inside this crate. `Notice` is what the user
//! sees: a transient toast with a machine-readable code, a message, and an
//! optional forced navigation.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartError ──────┐                                                      │
//! │  (core rules)    │                                                      │
//! │                  ├──► Notice { code, message, redirect } ──► toast      │
//! │  ApiFailure ─────┤                                   │                  │
//! │  (REST failure)  │                                   └─► 401: sign-in   │
//! │  StateError ─────┘                                                      │
//! │  (config, runtime)                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is "notify and continue". Nothing is retried; the user
//! repeats the action.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use storefront_core::CartError;

use crate::api::ApiFailure;

/// Shown when the server gave no message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

// =============================================================================
// State Error
// =============================================================================

/// Result type alias for store and config operations.
pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// A tokio runtime is required (debounced search).
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    /// Currency code not in the fetched currency list.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Cart or checkout rule violation.
    #[error(transparent)]
    Cart(#[from] CartError),
}

// =============================================================================
// Notice
// =============================================================================

/// User-facing notification.
///
/// ## Serialization
/// ```json
/// { "code": "UNAUTHORIZED", "message": "Session expired", "redirect": "sign_in" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub code: NoticeCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeCode {
    /// Input rejected before anything changed (400)
    ValidationError,

    /// Cart rule violated (422)
    CartError,

    /// Resource missing (404)
    NotFound,

    /// Session missing or expired (401)
    Unauthorized,

    /// Server rejected or failed the request
    RequestFailed,

    /// Request never got a response
    Network,

    /// Local misconfiguration
    Internal,
}

/// Navigation a notice forces in addition to the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Redirect {
    SignIn,
}

impl Notice {
    pub fn new(code: NoticeCode, message: impl Into<String>) -> Self {
        Notice {
            code,
            message: message.into(),
            redirect: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Notice::new(NoticeCode::ValidationError, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        Notice::new(NoticeCode::CartError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Notice::new(NoticeCode::Internal, message)
    }

    /// Server message if there is a usable one, otherwise the fallback.
    fn message_or_fallback(message: Option<String>) -> String {
        message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for Notice {}

impl From<CartError> for Notice {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Validation(e) => Notice::validation(e.to_string()),
            CartError::ItemNotFound(_) => Notice::new(NoticeCode::NotFound, err.to_string()),
            other => Notice::cart(other.to_string()),
        }
    }
}

impl From<ApiFailure> for Notice {
    fn from(failure: ApiFailure) -> Self {
        let message = Notice::message_or_fallback(failure.message);
        match failure.status {
            Some(401) => {
                tracing::info!("request unauthorized, redirecting to sign-in");
                Notice {
                    code: NoticeCode::Unauthorized,
                    message,
                    redirect: Some(Redirect::SignIn),
                }
            }
            Some(404) => Notice::new(NoticeCode::NotFound, message),
            Some(400) | Some(422) => Notice::validation(message),
            Some(status) => {
                tracing::warn!(status, %message, "request failed");
                Notice::new(NoticeCode::RequestFailed, message)
            }
            None => {
                tracing::warn!(%message, "request got no response");
                Notice::new(NoticeCode::Network, message)
            }
        }
    }
}

impl From<StateError> for Notice {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Cart(e) => e.into(),
            StateError::UnknownCurrency(_) => Notice::validation(err.to_string()),
            other => {
                tracing::error!(error = %other, "internal state error");
                Notice::internal(FALLBACK_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{CheckoutStep, ValidationError};

    #[test]
    fn test_unauthorized_redirects_to_sign_in() {
        let notice = Notice::from(ApiFailure::new(Some(401), Some("Session expired".to_string())));
        assert_eq!(notice.code, NoticeCode::Unauthorized);
        assert_eq!(notice.message, "Session expired");
        assert_eq!(notice.redirect, Some(Redirect::SignIn));
    }

    #[test]
    fn test_missing_message_uses_fallback() {
        let notice = Notice::from(ApiFailure::new(Some(500), None));
        assert_eq!(notice.code, NoticeCode::RequestFailed);
        assert_eq!(notice.message, FALLBACK_MESSAGE);
        assert_eq!(notice.redirect, None);

        let notice = Notice::from(ApiFailure::new(None, Some("   ".to_string())));
        assert_eq!(notice.code, NoticeCode::Network);
        assert_eq!(notice.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn test_cart_errors_map_to_codes() {
        let notice = Notice::from(CartError::MissingBillingAddress(CheckoutStep::Payment));
        assert_eq!(notice.code, NoticeCode::CartError);

        let notice = Notice::from(CartError::Validation(ValidationError::Required {
            field: "email".to_string(),
        }));
        assert_eq!(notice.code, NoticeCode::ValidationError);
        assert_eq!(notice.message, "email is required");

        let notice = Notice::from(CartError::ItemNotFound("MUG".to_string()));
        assert_eq!(notice.code, NoticeCode::NotFound);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let notice = Notice::from(StateError::ConfigLoadFailed("/etc/secret: denied".to_string()));
        assert_eq!(notice.code, NoticeCode::Internal);
        assert_eq!(notice.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn test_notice_serialization() {
        let notice = Notice::from(ApiFailure::new(Some(401), None));
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(json["redirect"], "sign_in");

        let json = serde_json::to_value(Notice::cart("Cart is empty")).unwrap();
        assert!(json.get("redirect").is_none());
    }
}
