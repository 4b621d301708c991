//! # WhatsApp Module
//!
//! wa.me deep links and the human-readable summaries that ride in them.
//!
//! WAConnect storefronts have no checkout gateway: the "submit order"
//! button opens WhatsApp with the order already written out, and the
//! conversation takes it from there. This module builds the link and the
//! message text; actually opening WhatsApp (and persisting the order) is
//! the storefront's job.
//!
//! ```text
//! CartTotals + customer details
//!        │
//!        ▼
//! order_message() ──► "New order from Asha:\n\n2x Paneer Tikka..."
//!        │
//!        ▼
//! whatsapp_link("+91 98765 43210", msg)
//!        │
//!        ▼
//! https://wa.me/919876543210?text=New%20order%20from%20Asha%3A...
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ts_rs::TS;

use crate::cart::{CartLine, CartTotals};
use crate::money::Money;

// =============================================================================
// Deep Links
// =============================================================================

/// Builds a `wa.me` deep link.
///
/// Non-digits are stripped from the phone number ("+91 98765-43210" becomes
/// `919876543210`); the message, when non-empty, is URL-encoded into the
/// `text` query parameter.
///
/// ## Example
/// ```rust
/// use waconnect_core::whatsapp::whatsapp_link;
///
/// assert_eq!(
///     whatsapp_link("+91 98765 43210", ""),
///     "https://wa.me/919876543210"
/// );
/// assert_eq!(
///     whatsapp_link("919876543210", "hello there"),
///     "https://wa.me/919876543210?text=hello%20there"
/// );
/// ```
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if message.is_empty() {
        format!("https://wa.me/{}", digits)
    } else {
        format!(
            "https://wa.me/{}?text={}",
            digits,
            urlencoding::encode(message)
        )
    }
}

// =============================================================================
// Customer / Booking Records
// =============================================================================

/// Who is ordering, and where to deliver.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// A booking or appointment request from a storefront form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_type: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub notes: Option<String>,
}

// =============================================================================
// Message Builders
// =============================================================================

/// Renders the order summary sent to the business on checkout.
///
/// One line per cart entry with its variant selections, then the totals
/// block, then the customer contact. Lines with non-positive quantity are
/// skipped, matching the totals engine.
pub fn order_message(customer: &CustomerDetails, lines: &[CartLine], totals: &CartTotals) -> String {
    let mut message = format!("New order from {}:\n\n", customer.name);

    for line in lines.iter().filter(|l| l.quantity > 0) {
        let _ = write!(message, "{}x {}", line.quantity, line.name);
        if let Some(size) = &line.selected_size {
            let _ = write!(message, " (Size: {})", size);
        }
        if let Some(color) = &line.selected_color {
            let _ = write!(message, " (Color: {})", color);
        }
        let _ = writeln!(message, " - {}", line.unit_price());
    }

    let _ = write!(
        message,
        "\nSubtotal: {}\nTax: {}\nDelivery: {}\nTotal: {}\n\nPhone: {}",
        Money::from_paise(totals.subtotal_paise),
        Money::from_paise(totals.tax_paise),
        Money::from_paise(totals.delivery_paise),
        Money::from_paise(totals.total_paise),
        customer.phone,
    );

    if let Some(address) = &customer.address {
        let _ = write!(message, "\nAddress: {}", address);
    }

    message
}

/// Renders a booking/appointment request summary.
pub fn booking_message(booking: &BookingRequest) -> String {
    let mut message = format!(
        "Booking Request from {}\n\nService: {}\nDate: {}\nTime: {}\nPhone: {}",
        booking.customer_name,
        booking.service_type,
        booking.preferred_date,
        booking.preferred_time,
        booking.customer_phone,
    );

    if let Some(notes) = &booking.notes {
        let _ = write!(message, "\nNotes: {}", notes);
    }

    message
}

/// Renders a generic service enquiry.
pub fn enquiry_message(name: &str, phone: &str, note: &str) -> String {
    format!(
        "Enquiry from {}\n\nPhone: {}\nMessage: {}",
        name, phone, note
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(name: &str, price_paise: i64, qty: i64, size: Option<&str>) -> CartLine {
        CartLine {
            product_id: format!("id-{}", name),
            name: name.to_string(),
            unit_price_paise: price_paise,
            quantity: qty,
            selected_size: size.map(str::to_string),
            selected_color: None,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_link_strips_formatting() {
        assert_eq!(
            whatsapp_link("+91 98765-43210", ""),
            "https://wa.me/919876543210"
        );
    }

    #[test]
    fn test_link_encodes_message() {
        let link = whatsapp_link("919876543210", "New order from Asha:\n2x Vada Pav");
        assert_eq!(
            link,
            "https://wa.me/919876543210?text=New%20order%20from%20Asha%3A%0A2x%20Vada%20Pav"
        );
    }

    #[test]
    fn test_link_without_message_has_no_text_param() {
        assert!(!whatsapp_link("919876543210", "").contains("?text="));
    }

    #[test]
    fn test_order_message_layout() {
        let customer = CustomerDetails {
            name: "Asha".to_string(),
            phone: "919876543210".to_string(),
            address: Some("12 MG Road, Pune".to_string()),
        };
        let lines = vec![
            line("Paneer Tikka", 10000, 2, None),
            line("Kurta", 49900, 1, Some("M")),
        ];
        let totals = CartTotals {
            subtotal_paise: 69900,
            tax_paise: 12582,
            delivery_paise: 3000,
            total_paise: 85482,
        };

        let message = order_message(&customer, &lines, &totals);
        assert_eq!(
            message,
            "New order from Asha:\n\n\
             2x Paneer Tikka - ₹100.00\n\
             1x Kurta (Size: M) - ₹499.00\n\n\
             Subtotal: ₹699.00\n\
             Tax: ₹125.82\n\
             Delivery: ₹30.00\n\
             Total: ₹854.82\n\n\
             Phone: 919876543210\n\
             Address: 12 MG Road, Pune"
        );
    }

    #[test]
    fn test_order_message_skips_dead_lines() {
        let customer = CustomerDetails {
            name: "Asha".to_string(),
            phone: "919876543210".to_string(),
            address: None,
        };
        let lines = vec![line("Ghost", 10000, 0, None)];
        let message = order_message(&customer, &lines, &CartTotals::zero());
        assert!(!message.contains("Ghost"));
        assert!(!message.contains("Address:"));
    }

    #[test]
    fn test_booking_message() {
        let booking = BookingRequest {
            customer_name: "Ravi".to_string(),
            customer_phone: "919812345678".to_string(),
            service_type: "Dental Checkup".to_string(),
            preferred_date: "2025-03-14".to_string(),
            preferred_time: "11:30".to_string(),
            notes: Some("Sensitive tooth, upper left".to_string()),
        };

        let message = booking_message(&booking);
        assert_eq!(
            message,
            "Booking Request from Ravi\n\n\
             Service: Dental Checkup\n\
             Date: 2025-03-14\n\
             Time: 11:30\n\
             Phone: 919812345678\n\
             Notes: Sensitive tooth, upper left"
        );

        let bare = BookingRequest {
            notes: None,
            ..booking
        };
        assert!(!booking_message(&bare).contains("Notes:"));
    }

    #[test]
    fn test_enquiry_message() {
        assert_eq!(
            enquiry_message("Meera", "919800000000", "Do you restore old furniture?"),
            "Enquiry from Meera\n\nPhone: 919800000000\nMessage: Do you restore old furniture?"
        );
    }

    #[test]
    fn test_full_checkout_link_roundtrip() {
        let customer = CustomerDetails {
            name: "Asha".to_string(),
            phone: "+91 98765 43210".to_string(),
            address: None,
        };
        let lines = vec![line("Vada Pav", 2500, 4, None)];
        let totals = CartTotals {
            subtotal_paise: 10000,
            tax_paise: 500,
            delivery_paise: 0,
            total_paise: 10500,
        };

        let link = whatsapp_link(&customer.phone, &order_message(&customer, &lines, &totals));
        assert!(link.starts_with("https://wa.me/919876543210?text=New%20order"));
    }
}
