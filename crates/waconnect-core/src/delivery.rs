//! # Delivery Policy Module
//!
//! Decides whether a business delivers to a customer and at what charge.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Delivery Decision                                   │
//! │                                                                         │
//! │  distance (rounded to 2 decimals)                                      │
//! │       │                                                                 │
//! │       ├── max radius set AND distance > max?                           │
//! │       │        └─► NOT deliverable, charge ₹0                          │
//! │       │            "Sorry, we don't deliver beyond 10 km..."           │
//! │       │                                                                 │
//! │       ├── distance <= free radius?  (inclusive)                        │
//! │       │        └─► deliverable, charge ₹0                              │
//! │       │            "Free delivery! You are 3.2 km away."               │
//! │       │                                                                 │
//! │       └── otherwise                                                     │
//! │                └─► deliverable, charge = charge_beyond_radius          │
//! │                    "Delivery charge: ₹50.00. You are 7.8 km away."     │
//! │                                                                         │
//! │  Businesses WITHOUT a stored location never reach this evaluator -     │
//! │  they use the flat-charge fallback inside cart::compute_totals,        │
//! │  which needs the order subtotal.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary Semantics
//! Distance exactly at the free radius is free (inclusive). Distance exactly
//! at the max radius is deliverable (inclusive; only *exceeding* it is
//! rejected).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::geo::{self, Coordinate};
use crate::money::Money;
use crate::types::TaxRate;
use crate::DEFAULT_FREE_DELIVERY_RADIUS_KM;

// =============================================================================
// Business Settings (stored record)
// =============================================================================

/// The delivery-related slice of a stored business record.
///
/// Every field is optional: businesses configure delivery piecemeal over
/// time and old records predate most of these fields. This type mirrors
/// what the store actually holds; nothing here applies defaults - that
/// happens exactly once, in [`DeliveryConfig::from_settings`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BusinessSettings {
    /// Business latitude in decimal degrees.
    pub business_latitude: Option<f64>,

    /// Business longitude in decimal degrees.
    pub business_longitude: Option<f64>,

    /// Radius within which delivery is free.
    pub free_delivery_radius_km: Option<f64>,

    /// Flat charge once the customer is beyond the free radius.
    pub delivery_charge_beyond_radius_paise: Option<i64>,

    /// Hard delivery cutoff. Absent means the business delivers anywhere.
    pub max_delivery_radius_km: Option<f64>,

    /// Location-independent delivery charge (fallback path).
    pub delivery_charges_paise: Option<i64>,

    /// Order value at which the fallback charge is waived.
    pub min_order_for_free_delivery_paise: Option<i64>,

    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: Option<u32>,
}

impl BusinessSettings {
    /// Parses a stored settings record from JSON.
    ///
    /// Unknown fields are ignored (stored records carry the whole business
    /// profile); malformed JSON is an error.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidSettings {
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// Delivery Config (defaulted form)
// =============================================================================

/// Delivery configuration with all defaults applied.
///
/// Built once per pricing computation via [`DeliveryConfig::from_settings`];
/// immutable for the duration of that computation. Keeping the defaulting
/// here - and only here - means "free radius defaults to 5 km" is enforced
/// in exactly one place instead of at every read site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryConfig {
    /// Where the business ships from. Absent when the business has not
    /// configured location-based delivery; the flat fallback applies then.
    pub business_location: Option<Coordinate>,

    /// Radius within which delivery is free. Defaults to 5 km.
    pub free_delivery_radius_km: f64,

    /// Flat charge applied once distance exceeds the free radius.
    pub charge_beyond_radius: Money,

    /// Hard cutoff. None means unlimited.
    pub max_delivery_radius_km: Option<f64>,

    /// Charge on the location-independent fallback path.
    pub flat_delivery_charge: Money,

    /// Pre-tax order value that waives the fallback charge.
    pub min_order_for_free_delivery: Option<Money>,

    /// Tax rate applied to the cart subtotal.
    pub tax_rate: TaxRate,
}

impl DeliveryConfig {
    /// Builds the defaulted config from a stored settings record.
    ///
    /// A business location exists only when BOTH latitude and longitude are
    /// stored; a half-configured location behaves as no location at all.
    ///
    /// ## Example
    /// ```rust
    /// use waconnect_core::delivery::{BusinessSettings, DeliveryConfig};
    ///
    /// let config = DeliveryConfig::from_settings(&BusinessSettings::default());
    /// assert!(config.business_location.is_none());
    /// assert_eq!(config.free_delivery_radius_km, 5.0);
    /// assert!(config.charge_beyond_radius.is_zero());
    /// ```
    pub fn from_settings(settings: &BusinessSettings) -> Self {
        let business_location = match (settings.business_latitude, settings.business_longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        };

        DeliveryConfig {
            business_location,
            free_delivery_radius_km: settings
                .free_delivery_radius_km
                .unwrap_or(DEFAULT_FREE_DELIVERY_RADIUS_KM),
            charge_beyond_radius: Money::from_paise(
                settings.delivery_charge_beyond_radius_paise.unwrap_or(0),
            ),
            max_delivery_radius_km: settings.max_delivery_radius_km,
            flat_delivery_charge: Money::from_paise(settings.delivery_charges_paise.unwrap_or(0)),
            min_order_for_free_delivery: settings
                .min_order_for_free_delivery_paise
                .map(Money::from_paise),
            tax_rate: TaxRate::from_bps(settings.tax_rate_bps.unwrap_or(0)),
        }
    }

    /// Whether location-based delivery is enabled.
    #[inline]
    pub fn has_location_delivery(&self) -> bool {
        self.business_location.is_some()
    }
}

// =============================================================================
// Delivery Decision
// =============================================================================

/// The outcome of a delivery evaluation.
///
/// Ephemeral - produced fresh per evaluation, displayed, fed to the totals
/// engine, then dropped. The message is customer-facing and embeds the
/// formatted distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryDecision {
    /// Customer distance in km, rounded to 2 decimals.
    pub distance_km: f64,

    /// Whether the business delivers to this customer at all.
    pub is_deliverable: bool,

    /// Delivery charge. Always zero when not deliverable.
    pub charge: Money,

    /// Customer-facing explanation of the decision.
    pub message: String,
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates the location-based delivery policy at a given distance.
///
/// The distance is rounded to 2 decimals before any comparison, so repeated
/// evaluations of the same logical input produce an identical decision.
/// Precedence, first match wins:
///
/// 1. beyond the max radius → not deliverable, charge ₹0
/// 2. within the free radius (inclusive) → deliverable, free
/// 3. otherwise → deliverable at `charge_beyond_radius`
///
/// This function never fails. Calling it for a business without a stored
/// location is a caller contract violation (the fallback path in
/// [`crate::cart::compute_totals`] owns that case); the radius rules are
/// still applied as configured.
///
/// ## Example
/// ```rust
/// use waconnect_core::delivery::{evaluate, DeliveryConfig};
/// use waconnect_core::money::Money;
///
/// let config = DeliveryConfig {
///     free_delivery_radius_km: 5.0,
///     charge_beyond_radius: Money::from_paise(5000),
///     max_delivery_radius_km: Some(10.0),
///     ..DeliveryConfig::default()
/// };
///
/// assert!(evaluate(&config, 4.2).charge.is_zero());
/// assert_eq!(evaluate(&config, 7.0).charge.paise(), 5000);
/// assert!(!evaluate(&config, 12.0).is_deliverable);
/// ```
pub fn evaluate(config: &DeliveryConfig, distance_km: f64) -> DeliveryDecision {
    let distance = geo::round_distance(distance_km);

    if let Some(max) = config.max_delivery_radius_km {
        if distance > max {
            return DeliveryDecision {
                distance_km: distance,
                is_deliverable: false,
                charge: Money::zero(),
                message: format!(
                    "Sorry, we don't deliver beyond {} km. You are {} away.",
                    max,
                    geo::format_distance(distance)
                ),
            };
        }
    }

    if distance <= config.free_delivery_radius_km {
        DeliveryDecision {
            distance_km: distance,
            is_deliverable: true,
            charge: Money::zero(),
            message: format!(
                "Free delivery! You are {} away.",
                geo::format_distance(distance)
            ),
        }
    } else {
        DeliveryDecision {
            distance_km: distance,
            is_deliverable: true,
            charge: config.charge_beyond_radius,
            message: format!(
                "Delivery charge: {}. You are {} away.",
                config.charge_beyond_radius,
                geo::format_distance(distance)
            ),
        }
    }
}

/// Computes the customer's distance and evaluates the policy in one step.
///
/// Returns `None` when the business has no stored location - the caller
/// should fall through to the flat-charge path in
/// [`crate::cart::compute_totals`].
pub fn evaluate_for_customer(
    config: &DeliveryConfig,
    customer: Coordinate,
) -> Option<DeliveryDecision> {
    let origin = config.business_location?;
    Some(evaluate(config, geo::distance_km(origin, customer)))
}

// =============================================================================
// Unit Tests
// =============================================================================
