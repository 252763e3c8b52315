//! # Invoice Document
//!
//! Builds a tax invoice from an order and renders it as plain text.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AALI GOLD JEWELZ                               │
//! │                  address · phone · email                                │
//! │                            TAX INVOICE                                  │
//! │  INVOICE DETAILS                     BILL TO                            │
//! │  Invoice No / dates / GSTIN          name, address, pincode, phone      │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  Description         Details    Qty       Rate        Amount            │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  PRICE BREAKDOWN                                                        │
//! │  Amount in words · payment method · terms · footer                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::pricing::PriceBreakdown;
use crate::types::{CustomerInfo, Order};

/// Rendered invoice width in characters.
pub const INVOICE_WIDTH: usize = 72;

const DESCRIPTION_WIDTH: usize = 28;
const ADDRESS_WIDTH: usize = 40;

const TERMS: [&str; 5] = [
    "1. Goods once sold cannot be returned or exchanged.",
    "2. Making charges are non-refundable.",
    "3. Hallmarking charges included in making charges.",
    "4. Price includes applicable GST.",
    "5. This is a computer-generated invoice. No signature required.",
];

// =============================================================================
// Invoice Model
// =============================================================================

/// The business issuing the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub gstin: String,
}

/// One row of the invoice table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub metal: String,
    pub weight_grams: Option<f64>,
    pub quantity: i64,
    pub rate: Money,
    pub amount: Money,
    pub savings: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub seller: SellerInfo,
    pub invoice_number: String,
    pub issued_at: DateTime<Utc>,
    pub ordered_at: DateTime<Utc>,
    pub customer: CustomerInfo,
    pub lines: Vec<InvoiceLine>,
    pub breakdown: PriceBreakdown,
    pub payment_method: String,
    pub amount_in_words: String,
}

impl Invoice {
    /// Builds the invoice for an order. The order id is the invoice number.
    pub fn from_order(order: &Order, seller: SellerInfo, issued_at: DateTime<Utc>) -> Self {
        let lines = order
            .items
            .iter()
            .map(|item| InvoiceLine {
                description: item.name.clone(),
                metal: item.metal.as_str().to_uppercase(),
                weight_grams: item.weight_grams,
                quantity: item.quantity,
                rate: item.price,
                amount: item.line_total(),
                savings: item.savings(),
            })
            .collect();

        Invoice {
            seller,
            invoice_number: order.order_id.clone(),
            issued_at,
            ordered_at: order.timestamp,
            customer: order.customer.clone(),
            lines,
            breakdown: order.breakdown.clone(),
            payment_method: order.payment.method.label().to_string(),
            amount_in_words: amount_in_words(order.breakdown.cart_total),
        }
    }

    /// Renders the invoice as fixed-width text.
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(INVOICE_WIDTH);
        let thin = "-".repeat(INVOICE_WIDTH);
        let mut out: Vec<String> = Vec::new();

        // Header
        out.push(rule.clone());
        out.push(center(&self.seller.name.to_uppercase()));
        out.extend(wrap_text(&self.seller.address, INVOICE_WIDTH).iter().map(|l| center(l)));
        out.push(center(&format!(
            "Phone: {} | Email: {}",
            self.seller.phone, self.seller.email
        )));
        out.push(rule.clone());
        out.push(center("TAX INVOICE"));
        out.push(String::new());

        // Invoice and customer details side by side
        let left = [
            "INVOICE DETAILS".to_string(),
            format!("Invoice No: {}", self.invoice_number),
            format!("Invoice Date: {}", self.issued_at.format("%d/%m/%Y")),
            format!("Order Date: {}", self.ordered_at.format("%d/%m/%Y")),
            format!("GSTIN: {}", self.seller.gstin),
        ];
        let mut right = vec!["BILL TO:".to_string()];
        right.extend(wrap_text(&self.customer.name, ADDRESS_WIDTH));
        right.extend(wrap_text(&self.customer.address, ADDRESS_WIDTH));
        right.push(format!("Pincode: {}", self.customer.pincode));
        right.push(format!("Phone: {}", self.customer.phone));
        if let Some(aadhaar) = &self.customer.aadhaar_masked {
            right.push(format!("Aadhaar: {}", aadhaar));
        }
        for i in 0..left.len().max(right.len()) {
            let l = left.get(i).map(String::as_str).unwrap_or("");
            let r = right.get(i).map(String::as_str).unwrap_or("");
            out.push(format!("{:<32}{}", l, r));
        }
        out.push(String::new());

        // Line table
        out.push(thin.clone());
        out.push(format!(
            "{:<28} {:<9} {:>3} {:>13} {:>15}",
            "Description", "Details", "Qty", "Rate", "Amount"
        ));
        out.push(thin.clone());
        for line in &self.lines {
            let desc = wrap_text(&line.description, DESCRIPTION_WIDTH);
            let weight = line
                .weight_grams
                .map(|w| format!("{}g", w))
                .unwrap_or_else(|| "-".to_string());
            let details = [line.metal.clone(), weight];

            for i in 0..desc.len().max(details.len()) {
                let d = desc.get(i).map(String::as_str).unwrap_or("");
                let det = details.get(i).map(String::as_str).unwrap_or("");
                if i == 0 {
                    out.push(format!(
                        "{:<28} {:<9} {:>3} {:>13} {:>15}",
                        d,
                        det,
                        line.quantity,
                        line.rate.format_inr(),
                        line.amount.format_inr()
                    ));
                } else {
                    out.push(format!("{:<28} {}", d, det));
                }
            }
            if line.savings.is_positive() {
                out.push(format!("  Save: {}", line.savings.format_inr()));
            }
        }
        out.push(thin.clone());

        // Breakdown
        let b = &self.breakdown;
        out.push("PRICE BREAKDOWN".to_string());
        out.push(amount_row("Gold/Metal Value:", b.gold_value));
        out.push(amount_row("Making Charges:", b.making_charges));
        out.push("GST Breakdown (3%):".to_string());
        out.push(amount_row("  CGST @1.5%:", b.cgst));
        out.push(amount_row("  SGST @1.5%:", b.sgst));
        out.push(amount_row("Total GST:", b.total_gst));
        if b.total_savings.is_positive() {
            out.push(amount_row("Total Savings:", -b.total_savings));
        }
        out.push(thin.clone());
        out.push(amount_row("TOTAL AMOUNT:", b.cart_total));
        out.push(thin);

        // Words, payment, terms
        out.extend(wrap_text(
            &format!("Amount in words: {}", self.amount_in_words),
            INVOICE_WIDTH,
        ));
        out.push(format!("Payment Method: {}", self.payment_method));
        out.push(String::new());
        out.push("Terms & Conditions:".to_string());
        out.extend(TERMS.iter().map(|t| t.to_string()));
        out.push(String::new());
        out.push(center("Thank you for your business!"));
        out.push(rule);

        let mut text = out
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        text
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= INVOICE_WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((INVOICE_WIDTH - len) / 2), text)
}

/// Label on the left, amount right-aligned to the invoice width.
fn amount_row(label: &str, amount: Money) -> String {
    let amount = amount.format_inr();
    let pad = INVOICE_WIDTH.saturating_sub(label.chars().count() + amount.chars().count());
    format!("{}{}{}", label, " ".repeat(pad.max(1)), amount)
}

// =============================================================================
// Text Helpers
// =============================================================================

/// Greedy word wrap at `max_chars` per line.
///
/// A single word longer than the limit sits on its own line unbroken.
///
/// ```rust
/// use aali_core::invoice::wrap_text;
///
/// assert_eq!(
///     wrap_text("Pearl & Gold Drop Earrings", 12),
///     vec!["Pearl & Gold", "Drop", "Earrings"]
/// );
/// ```
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Words for 0..=99.
fn two_digit_words(n: u64) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{} {}", TENS[n / 10], ONES[n % 10])
    }
}

/// Words for 0..=999.
fn three_digit_words(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, r) => two_digit_words(r),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], two_digit_words(r)),
    }
}

/// Number in words using the Indian system (Crore, Lakh, Thousand, Hundred).
fn indian_number_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }

    let crore = n / 10_000_000;
    let lakh = (n / 100_000) % 100;
    let thousand = (n / 1_000) % 100;
    let rest = n % 1_000;

    let mut parts = Vec::new();
    if crore > 0 {
        // Amounts past 99 crore recurse: "One Hundred Crore"
        parts.push(format!("{} Crore", indian_number_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", two_digit_words(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", two_digit_words(thousand)));
    }
    if rest > 0 {
        parts.push(three_digit_words(rest));
    }
    parts.join(" ")
}

/// Amount in words for invoices: `"One Lakh Twenty Five Thousand Rupees Only"`.
///
/// ```rust
/// use aali_core::invoice::amount_in_words;
/// use aali_core::money::Money;
///
/// assert_eq!(
///     amount_in_words(Money::from_rupees(125_000)),
///     "One Lakh Twenty Five Thousand Rupees Only"
/// );
/// ```
pub fn amount_in_words(amount: Money) -> String {
    let words = indian_number_words(amount.rupees().unsigned_abs());
    if amount.is_negative() {
        format!("Minus {} Rupees Only", words)
    } else {
        format!("{} Rupees Only", words)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_product;
    use crate::metal::MetalRateTable;
    use crate::order::{build_order, mask_aadhaar};
    use crate::types::{CartLineItem, PaymentDetails, PaymentMethod};
    use chrono::TimeZone;
    use rstest::rstest;

    fn seller() -> SellerInfo {
        SellerInfo {
            name: "Aali Gold Jewelz".to_string(),
            address: "4th line Syamala Nagar-Guntur, Guntur District, AP 522006".to_string(),
            phone: "+91 8634611770".to_string(),
            email: "info@aaligoldjewelz.com".to_string(),
            gstin: "37AABCA1234M1Z5".to_string(),
        }
    }

    fn sample_invoice() -> Invoice {
        let items = vec![
            CartLineItem::from_product(&find_product("1").unwrap()),
            CartLineItem::from_product(&find_product("2").unwrap()),
        ];
        let order = build_order(
            "AALI1234560042".to_string(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap(),
            CustomerInfo {
                name: "Asha Verma".to_string(),
                phone: "9876543210".to_string(),
                email: None,
                address: "Flat 4B, Lotus Residency, 12 Mahatma Gandhi Road, Jaipur".to_string(),
                pincode: "302001".to_string(),
                aadhaar_masked: Some(mask_aadhaar("234567891234")),
            },
            PaymentDetails::new(PaymentMethod::Card),
            &items,
            &MetalRateTable::standard(),
        )
        .unwrap();
        Invoice::from_order(
            &order,
            seller(),
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
        )
    }

    #[rstest]
    #[case(0, "Zero Rupees Only")]
    #[case(7, "Seven Rupees Only")]
    #[case(15, "Fifteen Rupees Only")]
    #[case(40, "Forty Rupees Only")]
    #[case(105, "One Hundred Five Rupees Only")]
    #[case(1_000, "One Thousand Rupees Only")]
    #[case(85_000, "Eighty Five Thousand Rupees Only")]
    #[case(100_000, "One Lakh Rupees Only")]
    #[case(149_999, "One Lakh Forty Nine Thousand Nine Hundred Ninety Nine Rupees Only")]
    #[case(550_000, "Five Lakh Fifty Thousand Rupees Only")]
    #[case(12_345_678, "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight Rupees Only")]
    #[case(1_000_000_000, "One Hundred Crore Rupees Only")]
    fn test_amount_in_words(#[case] rupees: i64, #[case] expected: &str) {
        assert_eq!(amount_in_words(Money::from_rupees(rupees)), expected);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10), Vec::<String>::new());
        assert_eq!(wrap_text("short", 10), vec!["short"]);
        assert_eq!(
            wrap_text("Royal Wedding Ring Set", 10),
            vec!["Royal", "Wedding", "Ring Set"]
        );
        assert_eq!(
            wrap_text("Supercalifragilistic ok", 5),
            vec!["Supercalifragilistic", "ok"]
        );
    }

    #[test]
    fn test_invoice_from_order() {
        let invoice = sample_invoice();
        assert_eq!(invoice.invoice_number, "AALI1234560042");
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.lines[0].metal, "22K");
        assert_eq!(invoice.lines[0].savings.rupees(), 24_999);
        assert_eq!(invoice.payment_method, "Credit/Debit Card");
        assert_eq!(
            invoice.amount_in_words,
            "Four Lakh Forty Five Thousand Rupees Only"
        );
    }

    #[test]
    fn test_render_text_contents() {
        let text = sample_invoice().render_text();

        assert!(text.contains("AALI GOLD JEWELZ"));
        assert!(text.contains("TAX INVOICE"));
        assert!(text.contains("Invoice No: AALI1234560042"));
        assert!(text.contains("Invoice Date: 02/03/2026"));
        assert!(text.contains("Order Date: 01/03/2026"));
        assert!(text.contains("GSTIN: 37AABCA1234M1Z5"));
        assert!(text.contains("Aadhaar: XXXX-XXXX-1234"));
        assert!(text.contains("Golden Sunburst Necklace"));
        assert!(text.contains("₹1,25,000"));
        assert!(text.contains("Save: ₹24,999"));
        assert!(text.contains("Total Savings:"));
        assert!(text.contains("₹4,45,000"));
        assert!(text.contains("Four Lakh Forty Five Thousand Rupees Only"));
        assert!(text.contains("Payment Method: Credit/Debit Card"));
        assert!(text.lines().all(|l| !l.ends_with(' ')));
    }
}
