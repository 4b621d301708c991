//! # Domain Types
//!
//! Core domain types used throughout WAConnect storefronts.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    BulkTier     │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  min_quantity   │   │  bps (u32)      │       │
//! │  │  mrp_paise      │   │  price_per_unit │   │  1800 = 18%     │       │
//! │  │  sale_price     │   └─────────────────┘   └─────────────────┘       │
//! │  │  sizes/colors   │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐                             │
//! │                        │  TemplateType   │  restaurant / retail /      │
//! │                        │  (storefront)   │  clinic / services / ...    │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing Fields
//! A product carries an MRP (maximum retail price, the strike-through price)
//! and a sale price (what the customer actually pays). Very old records have
//! only a flat `price`. [`Product::effective_price`] resolves the chain in
//! one place so cart code never re-implements the fallback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (standard GST rate for many goods)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Bulk Pricing
// =============================================================================

/// A quantity-break price tier.
///
/// Grocery and wholesale-leaning businesses price by quantity:
/// "₹50 each, ₹45 each for 10+". Tiers apply at or above `min_quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkTier {
    /// Minimum quantity for this tier to apply.
    pub min_quantity: i64,

    /// Per-unit price in paise at this tier.
    pub price_per_unit_paise: i64,
}

// =============================================================================
// Product
// =============================================================================

/// A product (or menu item / service) listed on a storefront.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business this product belongs to.
    pub business_id: String,

    /// Display name shown on the storefront and in order messages.
    pub name: String,

    /// Product description.
    pub description: String,

    /// Maximum retail price in paise (shown struck through when discounted).
    pub mrp_paise: i64,

    /// Actual selling price in paise. Absent or zero falls back to MRP.
    pub sale_price_paise: Option<i64>,

    /// Flat price in paise from legacy records predating MRP/sale split.
    pub price_paise: Option<i64>,

    /// Quantity-break price tiers, sorted or not - resolution picks the
    /// largest applicable `min_quantity`.
    #[serde(default)]
    pub bulk_pricing: Vec<BulkTier>,

    /// Product image.
    pub image_url: Option<String>,

    /// Free-form category label ("Starters", "Kurtas", ...).
    pub category: Option<String>,

    /// Coarse product kind: food, clothing, grocery, service, general.
    #[serde(default = "default_product_type")]
    pub product_type: String,

    /// Size variants the customer can pick (descriptive, no price impact).
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Color variants the customer can pick (descriptive, no price impact).
    #[serde(default)]
    pub colors: Vec<String>,

    /// Whether the product is currently orderable.
    #[serde(default = "default_true")]
    pub is_available: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

fn default_product_type() -> String {
    "general".to_string()
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Resolves the price a customer actually pays for one unit.
    ///
    /// ## Resolution Chain
    /// ```text
    /// sale_price (present and > 0)
    ///      │ absent/zero
    ///      ▼
    /// mrp (> 0)
    ///      │ zero
    ///      ▼
    /// legacy price field, else ₹0.00
    /// ```
    pub fn effective_price(&self) -> Money {
        if let Some(sale) = self.sale_price_paise.filter(|p| *p > 0) {
            return Money::from_paise(sale);
        }
        if self.mrp_paise > 0 {
            return Money::from_paise(self.mrp_paise);
        }
        Money::from_paise(self.price_paise.unwrap_or(0))
    }

    /// Discount percentage for display badges ("25% OFF").
    ///
    /// Defined only when `mrp > 0` and the sale price undercuts it;
    /// everything else (no sale price, zero MRP, sale at or above MRP)
    /// is 0. Rounded to the nearest whole percent.
    pub fn discount_percent(&self) -> u32 {
        let sale = match self.sale_price_paise {
            Some(s) if s > 0 => s,
            _ => return 0,
        };
        if self.mrp_paise <= 0 || sale >= self.mrp_paise {
            return 0;
        }
        (((self.mrp_paise - sale) as f64 / self.mrp_paise as f64) * 100.0).round() as u32
    }

    /// Per-unit price at a given quantity, honoring bulk tiers.
    ///
    /// Picks the tier with the largest `min_quantity` that the quantity
    /// meets; with no applicable tier this is just [`Self::effective_price`].
    /// Tiers with a non-positive `min_quantity` are ignored.
    pub fn unit_price_for_quantity(&self, quantity: i64) -> Money {
        self.bulk_pricing
            .iter()
            .filter(|t| t.min_quantity > 0 && t.min_quantity <= quantity)
            .max_by_key(|t| t.min_quantity)
            .map(|t| Money::from_paise(t.price_per_unit_paise))
            .unwrap_or_else(|| self.effective_price())
    }

}

// =============================================================================
// Template Type
// =============================================================================

/// The storefront template a business renders with.
///
/// Stored as a free-form string; decoded here into a tagged variant so the
/// presentation boundary dispatches on an enum instead of comparing strings.
/// Unknown or newly-added tags fall back to the generic service storefront.
///
/// The pricing core is template-agnostic - nothing in this crate branches
/// on the template beyond this decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    /// Restaurants, cafes, food businesses.
    Restaurant,
    /// Salons, spas, beauty services.
    Salon,
    /// Retail shops and boutiques.
    Retail,
    /// Grocery stores and supermarkets.
    Grocery,
    /// Clinics, hospitals, medical centers.
    Clinic,
    /// Generic service businesses (also the fallback).
    #[serde(other)]
    Services,
}

impl TemplateType {
    /// Decodes a stored template tag; unknown tags become [`Self::Services`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "restaurant" => TemplateType::Restaurant,
            "salon" => TemplateType::Salon,
            "retail" => TemplateType::Retail,
            "grocery" => TemplateType::Grocery,
            "clinic" => TemplateType::Clinic,
            _ => TemplateType::Services,
        }
    }

    /// The stored string form of this tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            TemplateType::Restaurant => "restaurant",
            TemplateType::Salon => "salon",
            TemplateType::Retail => "retail",
            TemplateType::Grocery => "grocery",
            TemplateType::Clinic => "clinic",
            TemplateType::Services => "services",
        }
    }

    /// Whether this storefront sells orderable items (vs. bookings only).
    pub fn has_product_orders(&self) -> bool {
        matches!(
            self,
            TemplateType::Restaurant | TemplateType::Retail | TemplateType::Grocery
        )
    }
}

impl Default for TemplateType {
    fn default() -> Self {
        TemplateType::Services
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
