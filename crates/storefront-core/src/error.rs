//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CartError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-state errors (separate crate)                              │
//! │  ├── StateError       - Config / store failures                        │
//! │  └── Notice           - What the user sees (toast)                     │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → Notice → Toast                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! A cart operation that returns an error has not touched the cart. Callers
//! that only care about the "silently rejected" behaviour can drop the
//! error; the state is exactly what it was before the call.

use thiserror::Error;

use crate::checkout::CheckoutStep;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart and checkout rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity is not a positive integer, or a decrement would drop below 1.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart line "MUG-RED" qty 1
    ///      │  click "−"
    ///      ▼
    /// set_quantity(MUG-RED, Decrement)
    ///      │
    ///      ▼
    /// InvalidQuantity { sku: "MUG-RED", quantity: 0 }
    ///      │
    ///      ▼
    /// UI offers "Remove item" instead
    /// ```
    #[error("Invalid quantity {quantity} for {sku}")]
    InvalidQuantity { sku: String, quantity: i64 },

    /// Quantity would exceed the per-line ceiling.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cart already holds the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// No line with this SKU is in the cart.
    #[error("Item {0} is not in the cart")]
    ItemNotFound(String),

    /// Checkout cannot leave the cart step while the cart is empty.
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment and review steps need a billing address first.
    #[error("Billing address is required before {0}")]
    MissingBillingAddress(CheckoutStep),

    /// Step index outside the checkout flow.
    #[error("Unknown checkout step {0}")]
    UnknownStep(u8),

    /// A subtotal or total no longer fits the amount type.
    #[error("Cart amount is too large")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. malformed email or SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CoreResult<T> = Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::InvalidQuantity {
            sku: "MUG-RED".to_string(),
            quantity: 0,
        };
        assert_eq!(err.to_string(), "Invalid quantity 0 for MUG-RED");

        let err = CartError::MissingBillingAddress(CheckoutStep::Payment);
        assert_eq!(err.to_string(), "Billing address is required before payment");
    }

    #[test]
    fn test_validation_converts_to_cart_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let err: CartError = validation_err.into();
        assert!(matches!(err, CartError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: sku is required");
    }
}
