//! # Domain Types
//!
//! Core domain types used throughout the Aali storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  CartLineItem   │   │  WishlistItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │   │  id             │       │
//! │  │  price          │   │  price, qty     │   │  price          │       │
//! │  │  material       │   │  metal, weight  │   │  weight label   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │  PendingOrder   │   │  UserProfile    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  order_id       │──►│  order_id       │   │  id (UUID)      │       │
//! │  │  customer       │   │  fields         │   │  name, email    │       │
//! │  │  breakdown      │   │  attempts       │   │  provider       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::catalog::parse_weight;
use crate::error::ValidationError;
use crate::metal::MetalType;
use crate::money::Money;
use crate::pricing::PriceBreakdown;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Collection slug: necklaces, rings, earrings, bracelets, bridal.
    pub category: String,
    /// Final, tax-inclusive price.
    pub price: Money,
    /// Pre-discount price, shown struck through.
    pub original_price: Option<Money>,
    /// Average rating out of 5.
    pub rating: f32,
    pub badge: Option<String>,
    pub material: String,
    /// Weight as displayed, e.g. `"12g"`.
    pub weight_label: String,
}

impl Product {
    pub fn metal(&self) -> MetalType {
        MetalType::infer(&self.name, &self.material)
    }

    pub fn weight_grams(&self) -> Option<f64> {
        parse_weight(&self.weight_label)
    }

    /// Per-unit discount, zero when not on sale.
    pub fn savings(&self) -> Money {
        self.original_price
            .map(|o| o.saturating_excess_over(self.price))
            .unwrap_or_default()
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One line in the cart.
///
/// Price and quantity are authoritative; every breakdown figure is derived
/// on demand by [`crate::pricing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLineItem {
    pub id: String,
    pub name: String,
    /// Final unit price (tax-inclusive).
    pub price: Money,
    pub original_price: Option<Money>,
    /// Always ≥ 1 while the line exists.
    pub quantity: i64,
    pub metal: MetalType,
    pub weight_grams: Option<f64>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub category: String,
}

impl CartLineItem {
    /// A single unit of a catalog product.
    pub fn from_product(product: &Product) -> Self {
        CartLineItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            original_price: product.original_price,
            quantity: 1,
            metal: product.metal(),
            weight_grams: product.weight_grams(),
            material: product.material.clone(),
            category: product.category.clone(),
        }
    }

    /// `price × quantity`.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// `(original − price) × quantity` when the original is higher.
    pub fn savings(&self) -> Money {
        self.original_price
            .map(|o| o.saturating_excess_over(self.price).multiply_quantity(self.quantity))
            .unwrap_or_default()
    }
}

// =============================================================================
// Wishlist Item
// =============================================================================

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WishlistItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub material: String,
    pub weight_label: String,
}

impl WishlistItem {
    pub fn from_product(product: &Product) -> Self {
        WishlistItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            material: product.material.clone(),
            weight_label: product.weight_label.clone(),
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    #[serde(rename = "netbanking")]
    NetBanking,
    Card,
    Cod,
}

impl PaymentMethod {
    /// Cash-on-delivery handling charge.
    pub const COD_CHARGE: Money = Money::from_rupees(100);

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::NetBanking => "netbanking",
            PaymentMethod::Card => "card",
            PaymentMethod::Cod => "cod",
        }
    }

    /// Label printed on invoices.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::NetBanking => "Net Banking",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Cod => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upi" => Ok(PaymentMethod::Upi),
            "netbanking" | "net-banking" | "net_banking" => Ok(PaymentMethod::NetBanking),
            "card" => Ok(PaymentMethod::Card),
            "cod" => Ok(PaymentMethod::Cod),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec![
                    "upi".to_string(),
                    "netbanking".to_string(),
                    "card".to_string(),
                    "cod".to_string(),
                ],
            }),
        }
    }
}

/// Method-specific payment details kept with an order.
///
/// Only the last four card digits are ever retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub upi_id: Option<String>,
    pub bank_name: Option<String>,
    pub card_last4: Option<String>,
    pub card_type: Option<String>,
    /// Recorded for COD; not added to the cart total.
    pub cod_charges: Option<Money>,
}

impl PaymentDetails {
    pub fn new(method: PaymentMethod) -> Self {
        PaymentDetails {
            method,
            upi_id: None,
            bank_name: None,
            card_last4: None,
            card_type: None,
            cod_charges: None,
        }
    }
}

// =============================================================================
// Customer & Checkout
// =============================================================================

/// Validated customer details stored with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub pincode: String,
    /// Always masked (`XXXX-XXXX-1234`) once part of an order.
    pub aadhaar_masked: Option<String>,
}

/// Raw checkout form as entered, before validation.
///
/// Also the shape of the saved checkout draft; see [`CheckoutForm::to_draft`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pincode: String,
    pub aadhaar: String,
    pub payment_method: String,
    pub upi_id: String,
    pub bank_name: String,
    pub card_number: String,
    pub card_name: String,
}

impl CheckoutForm {
    /// Copy safe to persist: the card number is dropped.
    pub fn to_draft(&self) -> CheckoutForm {
        CheckoutForm {
            card_number: String::new(),
            ..self.clone()
        }
    }

    /// Fills empty fields of `self` from `draft`.
    pub fn merge_draft(mut self, draft: &CheckoutForm) -> CheckoutForm {
        fn fill(field: &mut String, from: &str) {
            if field.trim().is_empty() {
                *field = from.to_string();
            }
        }
        fill(&mut self.name, &draft.name);
        fill(&mut self.phone, &draft.phone);
        fill(&mut self.email, &draft.email);
        fill(&mut self.address, &draft.address);
        fill(&mut self.pincode, &draft.pincode);
        fill(&mut self.aadhaar, &draft.aadhaar);
        fill(&mut self.payment_method, &draft.payment_method);
        fill(&mut self.upi_id, &draft.upi_id);
        fill(&mut self.bank_name, &draft.bank_name);
        fill(&mut self.card_name, &draft.card_name);
        self
    }
}

// =============================================================================
// Order
// =============================================================================

/// Whether the order reached the submission endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted by the endpoint.
    Submitted,
    /// Saved offline, waiting in the pending-order outbox.
    PendingSync,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Submitted => "submitted",
            OrderStatus::PendingSync => "pending_sync",
        }
    }

    pub fn from_db(s: &str) -> OrderStatus {
        match s {
            "submitted" => OrderStatus::Submitted,
            _ => OrderStatus::PendingSync,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// `AALI` + 6 timestamp digits + 4 random digits.
    pub order_id: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub customer: CustomerInfo,
    pub items: Vec<CartLineItem>,
    pub breakdown: PriceBreakdown,
    pub payment: PaymentDetails,
    pub status: OrderStatus,
}

/// An order whose submission failed, kept for retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PendingOrder {
    pub order_id: String,
    /// Flat submission payload, in field order.
    pub fields: Vec<(String, String)>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub attempts: u32,
    pub last_error: Option<String>,
}

// =============================================================================
// User Profile
// =============================================================================

/// Locally stored session profile. Never holds a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub joined_at: DateTime<Utc>,
    /// `"email"` for the form flow, otherwise the social provider name.
    pub provider: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
