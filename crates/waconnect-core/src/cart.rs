//! # Cart Module
//!
//! Cart state and the totals engine.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                    │
//! │                                                                         │
//! │  Storefront Action         Operation                Result              │
//! │  ─────────────────         ─────────                ──────              │
//! │                                                                         │
//! │  Tap product ─────────────► with_added() ─────────► new Cart, line     │
//! │                                                     merged or appended  │
//! │                                                                         │
//! │  Tap +/- ─────────────────► with_quantity_delta() ► new Cart; a line   │
//! │                                                     at qty 0 is gone    │
//! │                                                                         │
//! │  Tap remove ──────────────► without() ────────────► new Cart           │
//! │                                                                         │
//! │  Checkout ────────────────► totals() ─────────────► CartTotals         │
//! │                                                                         │
//! │  NOTE: Every operation returns a NEW cart. The storefront swaps its    │
//! │        state wholesale; there is no shared mutable cart to corrupt.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Identity
//! A line is identified by `(product_id, selected_size, selected_color)`.
//! The same kurta in size M and size L is two separate lines - they are
//! never merged, and removing one leaves the other alone. Variants are
//! descriptive only; they never change the price.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::delivery::{DeliveryConfig, DeliveryDecision};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Line Key
// =============================================================================

/// Composite identity of a cart line.
///
/// Two lines with the same product but different size/color selections are
/// distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineKey {
    pub product_id: String,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

impl LineKey {
    pub fn new(
        product_id: impl Into<String>,
        selected_size: Option<String>,
        selected_color: Option<String>,
    ) -> Self {
        LineKey {
            product_id: product_id.into(),
            selected_size,
            selected_color,
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.product_id)?;
        if let Some(size) = &self.selected_size {
            write!(f, " (Size: {})", size)?;
        }
        if let Some(color) = &self.selected_color {
            write!(f, " (Color: {})", color)?;
        }
        Ok(())
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the shopping cart.
///
/// ## Price Freezing
/// The effective price is captured when the line is added. If the product
/// price changes afterwards, the cart keeps displaying - and charging -
/// what the customer saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Effective unit price in paise at time of adding (frozen).
    pub unit_price_paise: i64,

    /// Quantity in cart.
    pub quantity: i64,

    /// Chosen size variant, when the product has sizes.
    pub selected_size: Option<String>,

    /// Chosen color variant, when the product has colors.
    pub selected_color: Option<String>,

    /// When this line was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a cart line from a product snapshot.
    pub fn from_product(
        product: &Product,
        quantity: i64,
        selected_size: Option<String>,
        selected_color: Option<String>,
    ) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_paise: product.effective_price().paise(),
            quantity,
            selected_size,
            selected_color,
            added_at: Utc::now(),
        }
    }

    /// This line's composite identity.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            selected_size: self.selected_size.clone(),
            selected_color: self.selected_color.clone(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by [`LineKey`] (adding the same selection merges
///   quantities)
/// - Quantity is > 0 for every held line (an update reaching 0 removes it)
/// - At most [`MAX_CART_LINES`] lines, [`MAX_LINE_QUANTITY`] per line
///
/// Updates are value-producing: the receiver is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    /// Lines in the cart.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Returns a cart with a product added.
    ///
    /// ## Behavior
    /// - Same `(product, size, color)` already present: quantities merge
    /// - Otherwise: a new line is appended with the product's current
    ///   effective price frozen in
    ///
    /// ## Errors
    /// - Quantity not positive or over the per-line maximum
    /// - Cart already at [`MAX_CART_LINES`]
    pub fn with_added(
        &self,
        product: &Product,
        quantity: i64,
        selected_size: Option<String>,
        selected_color: Option<String>,
    ) -> CoreResult<Cart> {
        validate_quantity(quantity)?;

        let key = LineKey::new(
            product.id.clone(),
            selected_size.clone(),
            selected_color.clone(),
        );

        let mut lines = self.lines.clone();
        if let Some(line) = lines.iter_mut().find(|l| l.key() == key) {
            let requested = line.quantity + quantity;
            if requested > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = requested;
            return Ok(Cart { lines });
        }

        if lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        lines.push(CartLine::from_product(
            product,
            quantity,
            selected_size,
            selected_color,
        ));
        Ok(Cart { lines })
    }

    /// Returns a cart with a line's quantity changed by `delta`.
    ///
    /// ## Behavior
    /// - Resulting quantity ≤ 0: the line is removed
    /// - Resulting quantity over the maximum: error
    /// - Key not in the cart: error
    pub fn with_quantity_delta(&self, key: &LineKey, delta: i64) -> CoreResult<Cart> {
        let Some(index) = self.lines.iter().position(|l| l.key() == *key) else {
            return Err(CoreError::LineNotFound {
                key: key.to_string(),
            });
        };

        let mut lines = self.lines.clone();
        let requested = lines[index].quantity + delta;

        if requested <= 0 {
            lines.remove(index);
        } else if requested > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_LINE_QUANTITY,
            });
        } else {
            lines[index].quantity = requested;
        }

        Ok(Cart { lines })
    }

    /// Returns a cart without the given line.
    ///
    /// Removing a key that is not present returns an equal cart - the
    /// operation is idempotent.
    pub fn without(&self, key: &LineKey) -> Cart {
        Cart {
            lines: self
                .lines
                .iter()
                .filter(|l| l.key() != *key)
                .cloned()
                .collect(),
        }
    }

    /// Returns an empty cart.
    pub fn cleared(&self) -> Cart {
        Cart::new()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Computes totals for this cart. See [`compute_totals`].
    pub fn totals(
        &self,
        config: &DeliveryConfig,
        decision: Option<&DeliveryDecision>,
    ) -> CartTotals {
        compute_totals(&self.lines, config, decision)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// The priced-out cart: what the customer pays.
///
/// `total = subtotal + tax + delivery` always holds, and `delivery` is zero
/// whenever the delivery decision said "not deliverable" - checkout is
/// blocked upstream, but the totals stay well-defined rather than smuggling
/// a charge into an impossible order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    /// Sum of line totals, before tax, in paise.
    pub subtotal_paise: i64,

    /// Tax on the subtotal, in paise.
    pub tax_paise: i64,

    /// Delivery charge, in paise.
    pub delivery_paise: i64,

    /// Grand total, in paise.
    pub total_paise: i64,
}

impl CartTotals {
    /// All-zero totals (the empty cart).
    pub const fn zero() -> Self {
        CartTotals {
            subtotal_paise: 0,
            tax_paise: 0,
            delivery_paise: 0,
            total_paise: 0,
        }
    }
}

/// Prices out a cart.
///
/// ```text
/// subtotal = Σ unit_price × quantity       (lines with qty ≤ 0 skipped)
/// tax      = subtotal × tax_rate
/// delivery = ┬ decision says undeliverable      → ₹0
///            ├ decision says deliverable        → decision.charge
///            └ no decision (no stored location) → flat fallback:
///                subtotal ≥ min_order_for_free_delivery → ₹0
///                otherwise                              → flat_delivery_charge
/// total    = subtotal + tax + delivery
/// ```
///
/// The fallback threshold compares against the PRE-TAX subtotal. An empty
/// cart produces all-zero totals, not an error.
///
/// ## Example
/// ```rust
/// use waconnect_core::cart::{compute_totals, CartLine};
/// use waconnect_core::delivery::DeliveryConfig;
/// use waconnect_core::money::Money;
/// use waconnect_core::types::TaxRate;
/// use chrono::Utc;
///
/// let lines = vec![CartLine {
///     product_id: "p1".into(),
///     name: "Paneer Tikka".into(),
///     unit_price_paise: 10000,
///     quantity: 2,
///     selected_size: None,
///     selected_color: None,
///     added_at: Utc::now(),
/// }];
///
/// let config = DeliveryConfig {
///     tax_rate: TaxRate::from_bps(1800),
///     flat_delivery_charge: Money::from_paise(3000),
///     ..DeliveryConfig::default()
/// };
///
/// let totals = compute_totals(&lines, &config, None);
/// assert_eq!(totals.subtotal_paise, 20000); // ₹200.00
/// assert_eq!(totals.tax_paise, 3600);       // 18% GST
/// assert_eq!(totals.delivery_paise, 3000);  // flat fallback
/// assert_eq!(totals.total_paise, 26600);
/// ```
pub fn compute_totals(
    lines: &[CartLine],
    config: &DeliveryConfig,
    decision: Option<&DeliveryDecision>,
) -> CartTotals {
    let subtotal = lines
        .iter()
        .filter(|l| l.quantity > 0)
        .map(|l| l.line_total())
        .fold(Money::zero(), |acc, line| acc + line);

    let tax = subtotal.calculate_tax(config.tax_rate);

    let delivery = match decision {
        Some(d) if !d.is_deliverable => Money::zero(),
        Some(d) => d.charge,
        None => match config.min_order_for_free_delivery {
            Some(min) if subtotal >= min => Money::zero(),
            _ => config.flat_delivery_charge,
        },
    };

    CartTotals {
        subtotal_paise: subtotal.paise(),
        tax_paise: tax.paise(),
        delivery_paise: delivery.paise(),
        total_paise: (subtotal + tax + delivery).paise(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::evaluate;
    use crate::types::TaxRate;
    use proptest::prelude::*;

    fn test_product(id: &str, sale_price_paise: i64) -> Product {
        Product {
            id: id.to_string(),
            business_id: "biz-1".to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            mrp_paise: sale_price_paise * 2,
            sale_price_paise: Some(sale_price_paise),
            price_paise: None,
            bulk_pricing: Vec::new(),
            image_url: None,
            category: None,
            product_type: "general".to_string(),
            sizes: Vec::new(),
            colors: Vec::new(),
            is_available: true,
            created_at: Utc::now(),
        }
    }

    fn mrp_only_product(id: &str, mrp_paise: i64) -> Product {
        let mut product = test_product(id, 0);
        product.sale_price_paise = None;
        product.mrp_paise = mrp_paise;
        product
    }

    #[test]
    fn test_add_line() {
        let cart = Cart::new()
            .with_added(&test_product("1", 9900), 2, None, None)
            .unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.lines[0].line_total().paise(), 19800);
    }

    #[test]
    fn test_add_same_selection_merges_quantity() {
        let product = test_product("1", 9900);
        let cart = Cart::new()
            .with_added(&product, 2, None, None)
            .unwrap()
            .with_added(&product, 3, None, None)
            .unwrap();

        assert_eq!(cart.line_count(), 1); // still one distinct line
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_different_variants_stay_distinct() {
        let mut product = test_product("1", 9900);
        product.sizes = vec!["M".to_string(), "L".to_string()];

        let cart = Cart::new()
            .with_added(&product, 1, Some("M".to_string()), None)
            .unwrap()
            .with_added(&product, 1, Some("L".to_string()), None)
            .unwrap();

        assert_eq!(cart.line_count(), 2);

        // Removing size M leaves size L alone
        let key_m = LineKey::new("1", Some("M".to_string()), None);
        let cart = cart.without(&key_m);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].selected_size.as_deref(), Some("L"));
    }

    #[test]
    fn test_updates_do_not_mutate_the_receiver() {
        let product = test_product("1", 9900);
        let original = Cart::new().with_added(&product, 1, None, None).unwrap();

        let grown = original.with_added(&product, 4, None, None).unwrap();

        assert_eq!(original.total_quantity(), 1);
        assert_eq!(grown.total_quantity(), 5);
    }

    #[test]
    fn test_quantity_delta_and_removal_at_zero() {
        let product = test_product("1", 9900);
        let key = LineKey::new("1", None, None);
        let cart = Cart::new().with_added(&product, 2, None, None).unwrap();

        let cart = cart.with_quantity_delta(&key, -1).unwrap();
        assert_eq!(cart.total_quantity(), 1);

        // Decrementing to 0 removes the line
        let cart = cart.with_quantity_delta(&key, -1).unwrap();
        assert!(cart.is_empty());

        // And the line no longer contributes to the subtotal
        let totals = cart.totals(&DeliveryConfig::default(), None);
        assert_eq!(totals.subtotal_paise, 0);
    }

    #[test]
    fn test_quantity_delta_unknown_key() {
        let key = LineKey::new("ghost", None, None);
        let err = Cart::new().with_quantity_delta(&key, 1).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound { .. }));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let product = test_product("1", 9900);
        let key = LineKey::new("1", None, None);
        let cart = Cart::new().with_added(&product, 2, None, None).unwrap();

        let once = cart.without(&key);
        let twice = once.without(&key);
        assert_eq!(once, twice);
        assert!(twice.is_empty());
    }

    #[test]
    fn test_quantity_limits() {
        let product = test_product("1", 9900);

        let err = Cart::new()
            .with_added(&product, 1000, None, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let cart = Cart::new().with_added(&product, 999, None, None).unwrap();
        let err = cart.with_added(&product, 1, None, None).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_LINES {
            cart = cart
                .with_added(&test_product(&format!("p{}", i), 100), 1, None, None)
                .unwrap();
        }
        let err = cart
            .with_added(&test_product("overflow", 100), 1, None, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let config = DeliveryConfig {
            tax_rate: TaxRate::from_bps(1800),
            flat_delivery_charge: Money::from_paise(5000),
            min_order_for_free_delivery: Some(Money::from_paise(10000)),
            ..DeliveryConfig::default()
        };

        assert_eq!(compute_totals(&[], &config, None), CartTotals::zero());
    }

    /// salePrice ₹100 × 2 + MRP-only ₹50 × 1 at 18% tax with ₹30 delivery:
    /// 250 / 45 / 30 / 325
    #[test]
    fn test_totals_with_delivery_decision() {
        let cart = Cart::new()
            .with_added(&test_product("a", 10000), 2, None, None)
            .unwrap()
            .with_added(&mrp_only_product("b", 5000), 1, None, None)
            .unwrap();

        let config = DeliveryConfig {
            tax_rate: TaxRate::from_bps(1800),
            ..DeliveryConfig::default()
        };
        let decision = DeliveryDecision {
            distance_km: 7.5,
            is_deliverable: true,
            charge: Money::from_paise(3000),
            message: String::new(),
        };

        let totals = cart.totals(&config, Some(&decision));
        assert_eq!(totals.subtotal_paise, 25000);
        assert_eq!(totals.tax_paise, 4500);
        assert_eq!(totals.delivery_paise, 3000);
        assert_eq!(totals.total_paise, 32500);
    }

    #[test]
    fn test_undeliverable_decision_never_charges() {
        let cart = Cart::new()
            .with_added(&test_product("a", 10000), 1, None, None)
            .unwrap();

        let config = DeliveryConfig {
            charge_beyond_radius: Money::from_paise(5000),
            max_delivery_radius_km: Some(10.0),
            ..DeliveryConfig::default()
        };
        let decision = evaluate(&config, 25.0);
        assert!(!decision.is_deliverable);

        let totals = cart.totals(&config, Some(&decision));
        assert_eq!(totals.delivery_paise, 0);
        assert_eq!(totals.total_paise, totals.subtotal_paise + totals.tax_paise);
    }

    #[test]
    fn test_fallback_flat_charge() {
        let cart = Cart::new()
            .with_added(&test_product("a", 10000), 1, None, None)
            .unwrap();

        let config = DeliveryConfig {
            flat_delivery_charge: Money::from_paise(2000),
            ..DeliveryConfig::default()
        };

        let totals = cart.totals(&config, None);
        assert_eq!(totals.delivery_paise, 2000);
    }

    #[test]
    fn test_fallback_free_over_min_order() {
        let config = DeliveryConfig {
            flat_delivery_charge: Money::from_paise(2000),
            min_order_for_free_delivery: Some(Money::from_paise(50000)),
            ..DeliveryConfig::default()
        };

        // ₹400 subtotal: below the ₹500 threshold, charged
        let below = Cart::new()
            .with_added(&test_product("a", 10000), 4, None, None)
            .unwrap();
        assert_eq!(below.totals(&config, None).delivery_paise, 2000);

        // ₹500 subtotal: meets the threshold exactly, free
        let at = Cart::new()
            .with_added(&test_product("a", 10000), 5, None, None)
            .unwrap();
        assert_eq!(at.totals(&config, None).delivery_paise, 0);
    }

    /// The threshold compares the PRE-TAX subtotal: ₹490 + ₹88.20 tax
    /// crosses ₹500 only with tax included, so the charge still applies.
    #[test]
    fn test_fallback_threshold_is_pre_tax() {
        let config = DeliveryConfig {
            tax_rate: TaxRate::from_bps(1800),
            flat_delivery_charge: Money::from_paise(2000),
            min_order_for_free_delivery: Some(Money::from_paise(50000)),
            ..DeliveryConfig::default()
        };

        let cart = Cart::new()
            .with_added(&test_product("a", 49000), 1, None, None)
            .unwrap();

        let totals = cart.totals(&config, None);
        assert!(totals.subtotal_paise + totals.tax_paise > 50000);
        assert_eq!(totals.delivery_paise, 2000);
    }

    #[test]
    fn test_negative_quantity_lines_are_ignored() {
        // Defensive: a corrupted line must not subtract from the subtotal
        let mut line = CartLine::from_product(&test_product("a", 10000), 1, None, None);
        line.quantity = -3;
        let good = CartLine::from_product(&test_product("b", 5000), 1, None, None);

        let totals = compute_totals(&[line, good], &DeliveryConfig::default(), None);
        assert_eq!(totals.subtotal_paise, 5000);
    }

    proptest! {
        /// total == subtotal + tax + delivery, whatever the inputs.
        #[test]
        fn prop_totals_invariant(
            prices in proptest::collection::vec(0i64..100_000, 0..8),
            quantities in proptest::collection::vec(1i64..50, 0..8),
            tax_bps in 0u32..3000,
            flat_charge in 0i64..10_000,
        ) {
            let lines: Vec<CartLine> = prices
                .iter()
                .zip(quantities.iter())
                .enumerate()
                .map(|(i, (price, qty))| {
                    let mut line = CartLine::from_product(
                        &test_product(&format!("p{}", i), 1),
                        *qty,
                        None,
                        None,
                    );
                    line.unit_price_paise = *price;
                    line
                })
                .collect();

            let config = DeliveryConfig {
                tax_rate: TaxRate::from_bps(tax_bps),
                flat_delivery_charge: Money::from_paise(flat_charge),
                ..DeliveryConfig::default()
            };

            let totals = compute_totals(&lines, &config, None);
            prop_assert_eq!(
                totals.total_paise,
                totals.subtotal_paise + totals.tax_paise + totals.delivery_paise
            );
            prop_assert!(totals.subtotal_paise >= 0);
            prop_assert!(totals.tax_paise >= 0);
        }
    }
}
