//! # Price Breakdown Calculator
//!
//! Reverse-derives the components of a tax-inclusive jewelry price.
//!
//! ## Decomposition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FINAL PRICE  P  (unit price × quantity, GST included)                  │
//! │                                                                         │
//! │     base   = P / (1 + g)                 g = GST ratio      (3 %)       │
//! │     gst    = P − base                                                   │
//! │     cgst   = sgst = gst / 2                                             │
//! │                                                                         │
//! │     gold : making = 1 : m                m = making ratio   (per metal) │
//! │     making = base · m / (1 + m)                                         │
//! │     gold   = base − making                                              │
//! │                                                                         │
//! │  Every output is rounded ONCE from its exact rational value, half up.   │
//! │                                                                         │
//! │  Weight unusable (absent, 0g, negative) → fixed split:                  │
//! │     gold 70 %   making 20 %   GST 10 %  (CGST 5 % + SGST 5 %)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cart Aggregation
//! Cart totals are sums of the per-line ROUNDED figures, never a
//! recomputation over summed prices. This keeps the invoice lines and the
//! invoice totals consistent to the rupee.
//!
//! ## Example
//! ```rust
//! use aali_core::metal::MetalRateTable;
//! use aali_core::money::Money;
//! use aali_core::pricing::decompose;
//!
//! let table = MetalRateTable::standard();
//! let rate = table.get_by_tag("22K");
//! let parts = decompose(Money::from_rupees(125_000), Some(12.0), rate);
//!
//! assert_eq!(parts.gold_value.rupees(), 110_327);
//! assert_eq!(parts.making_charges.rupees(), 11_033);
//! assert_eq!(parts.cgst, parts.sgst);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::metal::{MetalRate, MetalRateTable, MetalType, BPS_SCALE};
use crate::money::Money;
use crate::types::CartLineItem;

/// Fallback split, in percent of the final price.
const FALLBACK_GOLD_PCT: i128 = 70;
const FALLBACK_MAKING_PCT: i128 = 20;
const FALLBACK_GST_PCT: i128 = 10;
const FALLBACK_HALF_GST_PCT: i128 = 5;

// =============================================================================
// Components
// =============================================================================

/// How a line's components were derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingMethod {
    /// Derived from the metal's making-charge and GST ratios.
    RateTable,
    /// Weight unknown; fixed 70/20/10 split.
    Fallback,
}

/// The rounded components of one final price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceComponents {
    pub gold_value: Money,
    pub making_charges: Money,
    pub total_gst: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub method: PricingMethod,
}

impl PriceComponents {
    /// Sum of the parts that make up the price (GST counted via its halves).
    pub fn reassembled(&self) -> Money {
        self.gold_value + self.making_charges + self.cgst + self.sgst
    }
}

/// Whether a weight is usable for rate-table pricing.
fn has_known_weight(weight_grams: Option<f64>) -> bool {
    matches!(weight_grams, Some(w) if w.is_finite() && w > 0.0)
}

/// Decomposes a final price into gold value, making charge and split GST.
///
/// The weight only selects the method: any positive weight uses the
/// metal's ratios, and a missing, zero or negative weight uses the fixed split.
pub fn decompose(final_price: Money, weight_grams: Option<f64>, rate: &MetalRate) -> PriceComponents {
    if has_known_weight(weight_grams) {
        decompose_by_rate(final_price, rate)
    } else {
        decompose_fallback(final_price)
    }
}

/// Rate-table decomposition as exact integer fractions.
///
/// With `S = 10000` (bps scale), `g` and `m` in bps:
/// - `gst    = P·g / (S+g)`
/// - `making = P·S·m / ((S+g)(S+m))`
/// - `gold   = P·S² / ((S+g)(S+m))`
fn decompose_by_rate(final_price: Money, rate: &MetalRate) -> PriceComponents {
    let p = final_price.rupees() as i128;
    let s = BPS_SCALE as i128;
    let g = rate.gst_bps as i128;
    let m = rate.making_charge_bps as i128;

    let gst_den = s + g;
    let split_den = gst_den * (s + m);

    PriceComponents {
        gold_value: Money::from_ratio(p * s * s, split_den),
        making_charges: Money::from_ratio(p * s * m, split_den),
        total_gst: Money::from_ratio(p * g, gst_den),
        // Each half is rounded from the exact GST, not from the rounded total.
        cgst: Money::from_ratio(p * g, 2 * gst_den),
        sgst: Money::from_ratio(p * g, 2 * gst_den),
        method: PricingMethod::RateTable,
    }
}

fn decompose_fallback(final_price: Money) -> PriceComponents {
    let p = final_price.rupees() as i128;
    PriceComponents {
        gold_value: Money::from_ratio(p * FALLBACK_GOLD_PCT, 100),
        making_charges: Money::from_ratio(p * FALLBACK_MAKING_PCT, 100),
        total_gst: Money::from_ratio(p * FALLBACK_GST_PCT, 100),
        cgst: Money::from_ratio(p * FALLBACK_HALF_GST_PCT, 100),
        sgst: Money::from_ratio(p * FALLBACK_HALF_GST_PCT, 100),
        method: PricingMethod::Fallback,
    }
}

// =============================================================================
// Line Breakdown
// =============================================================================

/// Breakdown of one cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineBreakdown {
    pub item_id: String,
    pub name: String,
    pub metal: MetalType,
    pub quantity: i64,
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub line_total: Money,
    pub gold_value: Money,
    pub making_charges: Money,
    pub total_gst: Money,
    pub cgst: Money,
    pub sgst: Money,
    /// `(original − price) × quantity` when discounted, else zero.
    pub savings: Money,
    pub method: PricingMethod,
}

/// Prices one cart line against the rate table.
pub fn breakdown_line(item: &CartLineItem, table: &MetalRateTable) -> LineBreakdown {
    let line_total = item.line_total();
    let parts = decompose(line_total, item.weight_grams, table.get(item.metal));

    LineBreakdown {
        item_id: item.id.clone(),
        name: item.name.clone(),
        metal: item.metal,
        quantity: item.quantity,
        unit_price: item.price,
        line_total,
        gold_value: parts.gold_value,
        making_charges: parts.making_charges,
        total_gst: parts.total_gst,
        cgst: parts.cgst,
        sgst: parts.sgst,
        savings: item.savings(),
        method: parts.method,
    }
}

// =============================================================================
// Cart Breakdown
// =============================================================================

/// The breakdown object consumed by display, invoice and order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub gold_value: Money,
    pub making_charges: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub total_gst: Money,
    pub cart_total: Money,
    pub total_savings: Money,
}

/// Per-line breakdowns plus the cart totals derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartBreakdown {
    pub lines: Vec<LineBreakdown>,
    pub totals: PriceBreakdown,
}

/// Prices every line and sums the rounded components.
pub fn breakdown_cart(items: &[CartLineItem], table: &MetalRateTable) -> CartBreakdown {
    let lines: Vec<LineBreakdown> = items.iter().map(|i| breakdown_line(i, table)).collect();

    let mut totals = PriceBreakdown::default();
    for line in &lines {
        totals.gold_value += line.gold_value;
        totals.making_charges += line.making_charges;
        totals.cgst += line.cgst;
        totals.sgst += line.sgst;
        totals.total_gst += line.total_gst;
        totals.cart_total += line.line_total;
        totals.total_savings += line.savings;
    }

    CartBreakdown { lines, totals }
}

// =============================================================================
// Unit Tests
// =============================================================================
