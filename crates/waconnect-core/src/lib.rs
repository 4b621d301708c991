//! # waconnect-core: Pure Business Logic for WAConnect Storefronts
//!
//! This crate is the **heart** of WAConnect. It contains the storefront
//! pricing logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       WAConnect Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (per-template UI)                    │   │
//! │  │   Catalog ──► Cart ──► Delivery Check ──► WhatsApp Checkout    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ waconnect-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    geo    │  │ delivery  │  │   cart    │  │ whatsapp  │  │   │
//! │  │   │ Haversine │  │  radius   │  │  totals   │  │ deep link │  │   │
//! │  │   │ distance  │  │  policy   │  │  engine   │  │ messages  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          External collaborators (NOT this crate)                │   │
//! │  │   geolocation provider • business store • order persistence    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TaxRate, TemplateType, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`geo`] - Great-circle distance and distance formatting
//! - [`delivery`] - Delivery radius policy and settings defaulting
//! - [`cart`] - Cart state and the totals engine
//! - [`whatsapp`] - wa.me deep links and order/booking messages
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, geolocation access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Defaults in One Place**: Stored settings become a [`delivery::DeliveryConfig`]
//!    exactly once; no scattered `unwrap_or` at read sites
//!
//! ## Example Usage
//!
//! ```rust
//! use waconnect_core::geo::{distance_km, Coordinate};
//! use waconnect_core::delivery::{evaluate, DeliveryConfig};
//!
//! let shop = Coordinate::new(19.0760, 72.8777);
//! let customer = Coordinate::new(19.0896, 72.8656);
//!
//! let config = DeliveryConfig {
//!     business_location: Some(shop),
//!     ..DeliveryConfig::default()
//! };
//!
//! let decision = evaluate(&config, distance_km(shop, customer));
//! assert!(decision.is_deliverable);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod delivery;
pub mod error;
pub mod geo;
pub mod money;
pub mod types;
pub mod validation;
pub mod whatsapp;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use waconnect_core::Money` instead of
// `use waconnect_core::money::Money`

pub use cart::{compute_totals, Cart, CartLine, CartTotals, LineKey};
pub use delivery::{evaluate, BusinessSettings, DeliveryConfig, DeliveryDecision};
pub use error::{CoreError, CoreResult, ValidationError};
pub use geo::Coordinate;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
/// Can be made configurable per-business in future versions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Configurable per-business in future versions.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Free delivery radius applied when a business has not configured one
///
/// Storefronts advertise "free delivery within N km"; businesses that enable
/// location-based delivery without picking a radius get this one.
pub const DEFAULT_FREE_DELIVERY_RADIUS_KM: f64 = 5.0;
