//! # Error Types
//!
//! Domain-specific error types for waconnect-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  waconnect-core errors (this file)                                     │
//! │  ├── CoreError        - Cart and settings domain errors                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Collaborator errors (NOT here)                                        │
//! │  ├── geolocation: permission denied / unavailable / timeout            │
//! │  └── HTTP client: "business not found", network failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → storefront error message          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line key, limits, etc.)
//! 3. Errors are enum variants, never String
//! 4. Degenerate-but-valid inputs (empty cart, zero price, zero distance)
//!    are NOT errors - they produce well-defined zero-valued outputs

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or malformed stored data.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart line cannot be found.
    ///
    /// ## When This Occurs
    /// - Quantity update references a (product, size, color) combination
    ///   that is not in the cart
    /// - The storefront UI raced its own state and sent a stale key
    #[error("Cart line not found: {key}")]
    LineNotFound { key: String },

    /// Cart has exceeded maximum allowed distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Stored business settings record could not be parsed.
    ///
    /// ## When This Occurs
    /// - The settings JSON is truncated or not JSON at all
    /// - A field has the wrong shape (string where a number is expected)
    #[error("Invalid business settings: {reason}")]
    InvalidSettings { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when boundary input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
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

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
