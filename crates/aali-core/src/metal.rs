//! # Metal Rate Table
//!
//! Static per-metal rates used by the price breakdown calculator.
//!
//! ## Rate Table
//! ```text
//! ┌──────────┬────────────┬──────────┬─────────┬───────┐
//! │  Metal   │ Rate/g (₹) │ Purity % │ Making  │  GST  │
//! ├──────────┼────────────┼──────────┼─────────┼───────┤
//! │  22K     │   13,355   │   91.6   │   10 %  │  3 %  │ ◄── standard entry
//! │  24K     │   14,569   │   99.9   │   12 %  │  3 %  │
//! │  18K     │   10,927   │   75.0   │    8 %  │  3 %  │
//! │  Silver  │       85   │   92.5   │   15 %  │  3 %  │
//! │  Platinum│    3,200   │   95.0   │   20 %  │  3 %  │
//! └──────────┴────────────┴──────────┴─────────┴───────┘
//! ```
//!
//! All ratios are basis points (1 bps = 0.01 %), so 10 % making is `1000`
//! and 3 % GST is `300`. Nothing here is ever a float.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Basis points in 100 %.
pub const BPS_SCALE: u32 = 10_000;

/// GST applied to jewelry (3 %), split evenly into CGST and SGST.
pub const JEWELRY_GST_BPS: u32 = 300;

// =============================================================================
// Metal Type
// =============================================================================

/// Metal type tag carried by every cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MetalType {
    #[default]
    #[serde(rename = "22K")]
    Gold22K,
    #[serde(rename = "24K")]
    Gold24K,
    #[serde(rename = "18K")]
    Gold18K,
    #[serde(rename = "silver")]
    Silver,
    #[serde(rename = "platinum")]
    Platinum,
}

impl MetalType {
    pub const ALL: [MetalType; 5] = [
        MetalType::Gold22K,
        MetalType::Gold24K,
        MetalType::Gold18K,
        MetalType::Silver,
        MetalType::Platinum,
    ];

    /// The tag stored on line items and in submission payloads.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetalType::Gold22K => "22K",
            MetalType::Gold24K => "24K",
            MetalType::Gold18K => "18K",
            MetalType::Silver => "silver",
            MetalType::Platinum => "platinum",
        }
    }

    /// Maps a free-form tag to a metal type, using 22K for anything unknown.
    ///
    /// Used on untrusted input (legacy imports, payloads), where an
    /// unrecognised tag must still price as the standard entry.
    pub fn from_tag_or_standard(tag: &str) -> MetalType {
        tag.parse().unwrap_or_default()
    }

    /// Infers the metal type from a product's name and material text.
    ///
    /// ```rust
    /// use aali_core::metal::MetalType;
    ///
    /// assert_eq!(MetalType::infer("Diamond Solitaire Ring", "18K White Gold"), MetalType::Gold18K);
    /// assert_eq!(MetalType::infer("Heritage Gold Bangle", "22K Gold"), MetalType::Gold22K);
    /// assert_eq!(MetalType::infer("Anklet", "Sterling Silver"), MetalType::Silver);
    /// ```
    pub fn infer(name: &str, material: &str) -> MetalType {
        let text = format!("{} {}", name, material).to_lowercase();
        if text.contains("24k") {
            MetalType::Gold24K
        } else if text.contains("18k") {
            MetalType::Gold18K
        } else if text.contains("silver") {
            MetalType::Silver
        } else if text.contains("platinum") {
            MetalType::Platinum
        } else {
            MetalType::Gold22K
        }
    }
}

impl fmt::Display for MetalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "22k" | "gold" => Ok(MetalType::Gold22K),
            "24k" => Ok(MetalType::Gold24K),
            "18k" => Ok(MetalType::Gold18K),
            "silver" => Ok(MetalType::Silver),
            "platinum" => Ok(MetalType::Platinum),
            _ => Err(ValidationError::NotAllowed {
                field: "metal".to_string(),
                allowed: MetalType::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Metal Rate
// =============================================================================

/// One row of the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetalRate {
    pub metal: MetalType,

    /// Market rate per gram.
    pub rate_per_gram: Money,

    /// Purity in basis points (9160 = 91.6 %).
    pub purity_bps: u32,

    /// Making charge as a share of the gold value (1000 = 10 %).
    pub making_charge_bps: u32,

    /// GST on the pre-tax value (300 = 3 %).
    pub gst_bps: u32,
}

impl MetalRate {
    const fn new(metal: MetalType, rate: i64, purity_bps: u32, making_charge_bps: u32) -> Self {
        MetalRate {
            metal,
            rate_per_gram: Money::from_rupees(rate),
            purity_bps,
            making_charge_bps,
            gst_bps: JEWELRY_GST_BPS,
        }
    }

    /// Purity as a percentage (display only).
    pub fn purity_percent(&self) -> f64 {
        self.purity_bps as f64 / 100.0
    }
}

// =============================================================================
// Rate Table
// =============================================================================

/// Hardcoded metal rate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalRateTable {
    rates: [MetalRate; 5],
}

impl MetalRateTable {
    /// The storefront's current rates.
    pub const fn standard() -> Self {
        MetalRateTable {
            rates: [
                MetalRate::new(MetalType::Gold22K, 13_355, 9_160, 1_000),
                MetalRate::new(MetalType::Gold24K, 14_569, 9_990, 1_200),
                MetalRate::new(MetalType::Gold18K, 10_927, 7_500, 800),
                MetalRate::new(MetalType::Silver, 85, 9_250, 1_500),
                MetalRate::new(MetalType::Platinum, 3_200, 9_500, 2_000),
            ],
        }
    }

    /// Looks up a metal's rate, falling back to the 22K entry.
    pub fn get(&self, metal: MetalType) -> &MetalRate {
        self.rates
            .iter()
            .find(|r| r.metal == metal)
            .unwrap_or(&self.rates[0])
    }

    /// Looks up a rate by free-form tag; unknown tags resolve to 22K.
    pub fn get_by_tag(&self, tag: &str) -> &MetalRate {
        self.get(MetalType::from_tag_or_standard(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetalRate> {
        self.rates.iter()
    }
}

impl Default for MetalRateTable {
    fn default() -> Self {
        MetalRateTable::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_standard_table_values() {
        let table = MetalRateTable::standard();
        let gold = table.get(MetalType::Gold22K);
        assert_eq!(gold.rate_per_gram.rupees(), 13_355);
        assert_eq!(gold.making_charge_bps, 1_000);
        assert_eq!(gold.gst_bps, 300);
        assert_eq!(gold.purity_percent(), 91.6);

        let platinum = table.get(MetalType::Platinum);
        assert_eq!(platinum.rate_per_gram.rupees(), 3_200);
        assert_eq!(platinum.making_charge_bps, 2_000);
    }

    #[test]
    fn test_every_metal_has_a_row() {
        let table = MetalRateTable::default();
        for metal in MetalType::ALL {
            assert_eq!(table.get(metal).metal, metal);
        }
        assert_eq!(table.iter().count(), 5);
    }

    #[test]
    fn test_unknown_tag_uses_standard_entry() {
        let table = MetalRateTable::standard();
        assert_eq!(table.get_by_tag("rose-gold").metal, MetalType::Gold22K);
        assert_eq!(table.get_by_tag("").metal, MetalType::Gold22K);
        assert_eq!(table.get_by_tag("24K").metal, MetalType::Gold24K);
    }

    #[rstest]
    #[case("22K", MetalType::Gold22K)]
    #[case("24k", MetalType::Gold24K)]
    #[case(" 18K ", MetalType::Gold18K)]
    #[case("Silver", MetalType::Silver)]
    #[case("PLATINUM", MetalType::Platinum)]
    fn test_parse_tag(#[case] tag: &str, #[case] expected: MetalType) {
        assert_eq!(tag.parse::<MetalType>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("copper".parse::<MetalType>().is_err());
    }

    #[rstest]
    #[case("Golden Sunburst Necklace", "22K Gold", MetalType::Gold22K)]
    #[case("Pure Coin", "24K Gold", MetalType::Gold24K)]
    #[case("Pearl & Gold Drop Earrings", "18K Gold, Pearl", MetalType::Gold18K)]
    #[case("Silver Anklet", "", MetalType::Silver)]
    #[case("Band", "Platinum", MetalType::Platinum)]
    #[case("Mystery Item", "", MetalType::Gold22K)]
    fn test_infer(#[case] name: &str, #[case] material: &str, #[case] expected: MetalType) {
        assert_eq!(MetalType::infer(name, material), expected);
    }

    #[test]
    fn test_serde_tags() {
        assert_eq!(serde_json::to_string(&MetalType::Gold22K).unwrap(), "\"22K\"");
        let silver: MetalType = serde_json::from_str("\"silver\"").unwrap();
        assert_eq!(silver, MetalType::Silver);
    }
}
