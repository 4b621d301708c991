//! # Geo Module
//!
//! Great-circle distance between a business and a customer.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Delivery Check Flow                                 │
//! │                                                                         │
//! │  Browser geolocation ──► customer Coordinate ─┐                        │
//! │  (external, async,                            ▼                        │
//! │   ~10s timeout)             distance_km(shop, customer) ← THIS MODULE  │
//! │                                               │                        │
//! │  Business settings ──► shop Coordinate ───────┘                        │
//! │                                               │                        │
//! │                                               ▼                        │
//! │                                   delivery::evaluate(...)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The geolocation provider (permissions, timeouts, accuracy) lives in the
//! storefront; this module only ever sees resolved coordinates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Mean Earth radius in kilometres, as used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Coordinate
// =============================================================================

/// A WGS84 point in decimal degrees.
///
/// Expected ranges: latitude ∈ [-90, 90], longitude ∈ [-180, 180].
/// The ranges are documented, not enforced - callers own input sanity, and
/// [`distance_km`] stays total over any finite input rather than rejecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from decimal degrees.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }
}

// =============================================================================
// Distance
// =============================================================================

/// Great-circle distance in kilometres between two points (Haversine).
///
/// ```text
/// Δlat = radians(b.lat - a.lat); Δlon = radians(b.lon - a.lon)
/// h = sin²(Δlat/2) + cos(lat_a)·cos(lat_b)·sin²(Δlon/2)
/// d = 2·R·atan2(√h, √(1-h))
/// ```
///
/// Guarantees: symmetric in its arguments, zero for identical points,
/// never negative, no side effects, never panics.
///
/// ## Example
/// ```rust
/// use waconnect_core::geo::{distance_km, Coordinate};
///
/// let mumbai = Coordinate::new(19.0760, 72.8777);
/// let delhi = Coordinate::new(28.6139, 77.2090);
///
/// let d = distance_km(mumbai, delhi);
/// assert!(d > 1150.0 && d < 1160.0);
/// ```
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Rounds a distance to 2 decimal places.
///
/// Applied before every policy comparison and display so repeated checks on
/// the same logical input cannot flip across a radius boundary on
/// floating-point noise.
#[inline]
pub fn round_distance(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Formats a distance for customers.
///
/// Distances under 1 km render as whole metres, everything else as
/// kilometres with one decimal.
///
/// ## Example
/// ```rust
/// use waconnect_core::geo::format_distance;
///
/// assert_eq!(format_distance(0.5), "500 m");
/// assert_eq!(format_distance(1.0), "1.0 km");
/// assert_eq!(format_distance(12.34), "12.3 km");
/// ```
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1} km", km)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MUMBAI: Coordinate = Coordinate::new(19.0760, 72.8777);
    const DELHI: Coordinate = Coordinate::new(28.6139, 77.2090);

    #[test]
    fn test_zero_distance_for_same_point() {
        assert_eq!(distance_km(MUMBAI, MUMBAI), 0.0);
        assert_eq!(distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_mumbai_to_delhi() {
        let d = distance_km(MUMBAI, DELHI);
        assert!(d > 1150.0 && d < 1160.0, "got {}", d);
    }

    #[test]
    fn test_symmetry() {
        assert_eq!(distance_km(MUMBAI, DELHI), distance_km(DELHI, MUMBAI));
    }

    #[test]
    fn test_round_distance() {
        assert_eq!(round_distance(5.014999), 5.01);
        assert_eq!(round_distance(5.015001), 5.02);
        assert_eq!(round_distance(0.0), 0.0);
        assert_eq!(round_distance(10.0), 10.0);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.5), "500 m");
        assert_eq!(format_distance(0.999), "999 m");
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(12.34), "12.3 km");
        assert_eq!(format_distance(0.0), "0 m");
    }

    proptest! {
        /// distance_km(a, b) == distance_km(b, a), bit for bit.
        #[test]
        fn prop_distance_symmetric(
            lat1 in -90.0f64..90.0,
            lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0,
            lon2 in -180.0f64..180.0,
        ) {
            let a = Coordinate::new(lat1, lon1);
            let b = Coordinate::new(lat2, lon2);
            prop_assert_eq!(distance_km(a, b), distance_km(b, a));
        }

        /// Distances are never negative within the documented ranges.
        #[test]
        fn prop_distance_non_negative(
            lat1 in -90.0f64..90.0,
            lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0,
            lon2 in -180.0f64..180.0,
        ) {
            let d = distance_km(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2));
            prop_assert!(d >= 0.0);
        }

        /// A point is always at distance zero from itself.
        #[test]
        fn prop_distance_identity(
            lat in -90.0f64..90.0,
            lon in -180.0f64..180.0,
        ) {
            let p = Coordinate::new(lat, lon);
            prop_assert_eq!(distance_km(p, p), 0.0);
        }
    }
}
