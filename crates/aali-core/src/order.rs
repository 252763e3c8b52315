//! # Order Composition
//!
//! Builds orders and their flat submission payloads. The caller supplies
//! the clock and the random nonce, so everything here stays deterministic.
//!
//! ## Submission Payload
//! ```text
//! orderId, timestamp, totalAmount, paymentMethod
//! customerName, customerPhone, customerEmail, customerAddress, customerPincode
//! aadhaar_masked
//! goldValue, makingCharges, cgst, sgst, totalGST, cartTotal, totalSavings
//! product_{i}_name, _price, _quantity, _metal, _weight, _savings   (i from 0)
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{CoreError, CoreResult};
use crate::metal::MetalRateTable;
use crate::pricing::breakdown_cart;
use crate::types::{CartLineItem, CustomerInfo, Order, OrderStatus, PaymentDetails};

/// Prefix on every order id.
pub const ORDER_ID_PREFIX: &str = "AALI";

/// Order ids carry a nonce below this bound (four digits).
pub const ORDER_NONCE_BOUND: u32 = 10_000;

/// Composes an order id: `AALI` + last 6 digits of the millisecond
/// timestamp + the nonce zero-padded to 4 digits.
///
/// ```rust
/// use aali_core::order::compose_order_id;
///
/// assert_eq!(compose_order_id(1_718_000_123_456, 42), "AALI1234560042");
/// ```
pub fn compose_order_id(timestamp_ms: i64, nonce: u32) -> String {
    let ts = timestamp_ms.unsigned_abs() % 1_000_000;
    format!(
        "{}{:06}{:04}",
        ORDER_ID_PREFIX,
        ts,
        nonce % ORDER_NONCE_BOUND
    )
}

/// Masks an Aadhaar number down to its last four digits: `XXXX-XXXX-1234`.
pub fn mask_aadhaar(aadhaar: &str) -> String {
    let digits: Vec<char> = aadhaar.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("XXXX-XXXX-{}", tail)
}

/// Builds an order from a priced cart.
///
/// The breakdown is recomputed from the items so the stored figures always
/// match the stored lines. Status starts as `PendingSync` until the
/// submitter accepts it.
pub fn build_order(
    order_id: String,
    timestamp: DateTime<Utc>,
    customer: CustomerInfo,
    payment: PaymentDetails,
    items: &[CartLineItem],
    table: &MetalRateTable,
) -> CoreResult<Order> {
    if items.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    let breakdown = breakdown_cart(items, table).totals;

    Ok(Order {
        order_id,
        timestamp,
        customer,
        items: items.to_vec(),
        breakdown,
        payment,
        status: OrderStatus::PendingSync,
    })
}

/// Flattens an order into the key/value fields sent to the order endpoint.
pub fn submission_fields(order: &Order) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut push = |k: &str, v: String| fields.push((k.to_string(), v));

    let c = &order.customer;
    let b = &order.breakdown;

    push("orderId", order.order_id.clone());
    push(
        "timestamp",
        order.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    push("totalAmount", b.cart_total.rupees().to_string());
    push("paymentMethod", order.payment.method.as_str().to_string());

    push("customerName", c.name.clone());
    push("customerPhone", c.phone.clone());
    push("customerEmail", c.email.clone().unwrap_or_default());
    push("customerAddress", c.address.clone());
    push("customerPincode", c.pincode.clone());
    push(
        "aadhaar_masked",
        c.aadhaar_masked
            .clone()
            .unwrap_or_else(|| "Not provided".to_string()),
    );

    push("goldValue", b.gold_value.rupees().to_string());
    push("makingCharges", b.making_charges.rupees().to_string());
    push("cgst", b.cgst.rupees().to_string());
    push("sgst", b.sgst.rupees().to_string());
    push("totalGST", b.total_gst.rupees().to_string());
    push("cartTotal", b.cart_total.rupees().to_string());
    push("totalSavings", b.total_savings.rupees().to_string());

    for (i, item) in order.items.iter().enumerate() {
        let key = |suffix: &str| format!("product_{}_{}", i, suffix);
        fields.push((key("name"), item.name.clone()));
        fields.push((key("price"), item.price.rupees().to_string()));
        fields.push((key("quantity"), item.quantity.to_string()));
        fields.push((key("metal"), item.metal.as_str().to_string()));
        fields.push((
            key("weight"),
            item.weight_grams.map(|w| w.to_string()).unwrap_or_default(),
        ));
        fields.push((key("savings"), item.savings().rupees().to_string()));
    }

    fields
}

// =============================================================================
// Unit Tests
// =============================================================================
