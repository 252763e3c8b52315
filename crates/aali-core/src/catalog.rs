//! # Catalog & Search
//!
//! The storefront's hardcoded product catalog and keyword search.
//!
//! ## Search Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  query (trimmed, lowercased)                                            │
//! │     │                                                                   │
//! │     ├─► 1. field match: name, category, material, badge, weight label   │
//! │     ├─► 2. word match: each word longer than 2 characters against       │
//! │     │      name, material, category                                     │
//! │     ├─► 3. price range: "50k", "2 lakh", "1 crore" → [n, n+1) × unit    │
//! │     └─► 4. nothing: up to 3 suggestions from the keyword list           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// How many recent searches are remembered.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// How many suggestions are offered for a query with no results.
pub const MAX_SUGGESTIONS: usize = 3;

const SUGGESTION_KEYWORDS: &[&str] = &[
    "gold sets",
    "diamond rings",
    "necklaces",
    "bridal collection",
    "24k gold",
    "22k gold",
    "18k gold",
    "gold prices",
    "bracelets",
    "bangles",
    "anklets",
    "chains",
    "about us",
    "contact",
    "store location",
];

// =============================================================================
// Catalog
// =============================================================================

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    price: i64,
    original_price: Option<i64>,
    rating: f32,
    badge: Option<&'static str>,
    material: &'static str,
    weight: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "1",
        name: "Golden Sunburst Necklace",
        category: "necklaces",
        price: 125_000,
        original_price: Some(149_999),
        rating: 4.9,
        badge: Some("Bestseller"),
        material: "22K Gold",
        weight: "12g",
    },
    CatalogEntry {
        id: "2",
        name: "Diamond Solitaire Ring",
        category: "rings",
        price: 320_000,
        original_price: None,
        rating: 5.0,
        badge: Some("New"),
        material: "18K Gold with Diamond",
        weight: "8g",
    },
    CatalogEntry {
        id: "3",
        name: "Pearl & Gold Drop Earrings",
        category: "earrings",
        price: 85_000,
        original_price: Some(99_999),
        rating: 4.7,
        badge: Some("Sale"),
        material: "18K Gold with Pearl",
        weight: "6g",
    },
    CatalogEntry {
        id: "4",
        name: "Heritage Gold Bangle",
        category: "bracelets",
        price: 210_000,
        original_price: Some(245_000),
        rating: 4.8,
        badge: Some("Limited"),
        material: "22K Gold",
        weight: "25g",
    },
    CatalogEntry {
        id: "5",
        name: "Emerald & Gold Pendant",
        category: "necklaces",
        price: 175_000,
        original_price: Some(195_000),
        rating: 4.6,
        badge: None,
        material: "18K Gold with Emerald",
        weight: "10g",
    },
    CatalogEntry {
        id: "6",
        name: "Royal Wedding Ring Set",
        category: "bridal",
        price: 550_000,
        original_price: Some(620_000),
        rating: 4.9,
        badge: Some("Bridal"),
        material: "22K Gold with Diamonds",
        weight: "15g",
    },
];

impl CatalogEntry {
    fn to_product(&self) -> Product {
        Product {
            id: self.id.to_string(),
            name: self.name.to_string(),
            category: self.category.to_string(),
            price: Money::from_rupees(self.price),
            original_price: self.original_price.map(Money::from_rupees),
            rating: self.rating,
            badge: self.badge.map(str::to_string),
            material: self.material.to_string(),
            weight_label: self.weight.to_string(),
        }
    }
}

/// Every product, in display order.
pub fn catalog() -> Vec<Product> {
    CATALOG.iter().map(CatalogEntry::to_product).collect()
}

pub fn find_product(id: &str) -> Option<Product> {
    CATALOG
        .iter()
        .find(|e| e.id == id.trim())
        .map(CatalogEntry::to_product)
}

/// Parses the leading number of a weight label: `"12g"` → 12.0.
///
/// Returns `None` for labels without a positive number.
///
/// ```rust
/// use aali_core::catalog::parse_weight;
///
/// assert_eq!(parse_weight("12g"), Some(12.0));
/// assert_eq!(parse_weight("approx 3.5 g"), Some(3.5));
/// assert_eq!(parse_weight(""), None);
/// assert_eq!(parse_weight("0g"), None);
/// ```
pub fn parse_weight(label: &str) -> Option<f64> {
    let start = label.find(|c: char| c.is_ascii_digit())?;
    let rest = &label[start..];

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in rest.char_indices() {
        if c.is_ascii_digit() {
            end = i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
    }

    rest[..end]
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
}

// =============================================================================
// Search
// =============================================================================

/// What a search matched on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Products matched by text.
    Products { products: Vec<Product> },
    /// The query named a price range.
    PriceRange {
        min: Money,
        max: Money,
        products: Vec<Product>,
    },
    /// Nothing matched.
    NoResults { suggestions: Vec<String> },
}

impl SearchOutcome {
    pub fn products(&self) -> &[Product] {
        match self {
            SearchOutcome::Products { products } => products,
            SearchOutcome::PriceRange { products, .. } => products,
            SearchOutcome::NoResults { .. } => &[],
        }
    }
}

/// Runs a storefront search over the catalog.
pub fn search(query: &str) -> SearchOutcome {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return SearchOutcome::NoResults {
            suggestions: Vec::new(),
        };
    }

    let products: Vec<Product> = catalog()
        .into_iter()
        .filter(|p| matches_product(p, &term))
        .collect();
    if !products.is_empty() {
        return SearchOutcome::Products { products };
    }

    if let Some((min, max)) = parse_price_range(&term) {
        let products = catalog()
            .into_iter()
            .filter(|p| p.price >= min && p.price < max)
            .collect();
        return SearchOutcome::PriceRange { min, max, products };
    }

    SearchOutcome::NoResults {
        suggestions: suggestions(&term),
    }
}

fn matches_product(product: &Product, term: &str) -> bool {
    let name = product.name.to_lowercase();
    let category = product.category.to_lowercase();
    let material = product.material.to_lowercase();

    if name.contains(term)
        || category.contains(term)
        || material.contains(term)
        || product.weight_label.to_lowercase().contains(term)
        || product
            .badge
            .as_ref()
            .is_some_and(|b| b.to_lowercase().contains(term))
    {
        return true;
    }

    term.split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .any(|w| name.contains(w) || material.contains(w) || category.contains(w))
}

/// Reads queries like `"50k"`, `"2 lakh"` or `"1 crore"` as a half-open
/// price range `[n × unit, (n + 1) × unit)`.
pub fn parse_price_range(term: &str) -> Option<(Money, Money)> {
    let start = term.find(|c: char| c.is_ascii_digit())?;
    let rest = &term[start..];
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let amount: i64 = rest[..digits_end].parse().ok()?;
    let unit_text = rest[digits_end..].trim_start();

    let unit = ["thousand", "crore", "lakh", "lac", "cr", "k"]
        .iter()
        .find(|u| unit_text.starts_with(**u))?;
    let scale = match *unit {
        "k" | "thousand" => 1_000,
        "lakh" | "lac" => 100_000,
        _ => 10_000_000,
    };

    let min = amount.checked_mul(scale)?;
    let max = (amount.checked_add(1)?).checked_mul(scale)?;
    Some((Money::from_rupees(min), Money::from_rupees(max)))
}

/// Up to three keywords related to a query that found nothing.
///
/// A keyword matches when it contains the query, or when the query
/// contains the keyword's first word.
pub fn suggestions(query: &str) -> Vec<String> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }
    SUGGESTION_KEYWORDS
        .iter()
        .filter(|k| {
            let first = k.split(' ').next().unwrap_or(k);
            k.contains(term.as_str()) || term.contains(first)
        })
        .take(MAX_SUGGESTIONS)
        .map(|k| k.to_string())
        .collect()
}

/// Records a search: most recent first, no duplicates, at most five.
pub fn push_recent_search(recent: &mut Vec<String>, term: &str) {
    let term = term.trim();
    if term.is_empty() {
        return;
    }
    recent.retain(|s| s != term);
    recent.insert(0, term.to_string());
    recent.truncate(MAX_RECENT_SEARCHES);
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metal::MetalType;
    use rstest::rstest;

    #[test]
    fn test_catalog_contents() {
        let products = catalog();
        assert_eq!(products.len(), 6);
        assert_eq!(products[0].name, "Golden Sunburst Necklace");
        assert_eq!(products[1].original_price, None);
        assert_eq!(products[4].badge, None);
        assert_eq!(products[5].price.rupees(), 550_000);
    }

    #[test]
    fn test_catalog_metals_and_weights() {
        let ring = find_product("2").unwrap();
        assert_eq!(ring.metal(), MetalType::Gold18K);
        assert_eq!(ring.weight_grams(), Some(8.0));

        let bangle = find_product("4").unwrap();
        assert_eq!(bangle.metal(), MetalType::Gold22K);
        assert_eq!(bangle.savings().rupees(), 35_000);
        assert!(find_product("99").is_none());
    }

    #[rstest]
    #[case("12g", Some(12.0))]
    #[case("12.5g", Some(12.5))]
    #[case("  8 grams", Some(8.0))]
    #[case("1.2.3", Some(1.2))]
    #[case("g", None)]
    #[case("0.0g", None)]
    fn test_parse_weight(#[case] label: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_weight(label), expected);
    }

    #[rstest]
    #[case("sunburst", &["1"])]
    #[case("NECKLACES", &["1", "5"])]
    #[case("bridal", &["6"])]
    #[case("sale", &["3"])]
    #[case("25g", &["4"])]
    #[case("pearl", &["3"])]
    #[case("emerald pendant", &["5"])]
    fn test_search_matches(#[case] query: &str, #[case] ids: &[&str]) {
        let outcome = search(query);
        let found: Vec<&str> = outcome.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(found, ids);
    }

    #[test]
    fn test_search_word_match_ignores_short_words() {
        // "of" and "a" are too short to match on their own
        let outcome = search("a ring of");
        let ids: Vec<&str> = outcome.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "6"]);
    }

    #[test]
    fn test_search_price_range() {
        match search("2 lakh") {
            SearchOutcome::PriceRange { min, max, products } => {
                assert_eq!(min.rupees(), 200_000);
                assert_eq!(max.rupees(), 300_000);
                assert_eq!(products.len(), 1);
                assert_eq!(products[0].id, "4");
            }
            other => panic!("expected price range, got {:?}", other),
        }
    }

    #[rstest]
    #[case("85k", Some((85_000, 86_000)))]
    #[case("1 crore", Some((10_000_000, 20_000_000)))]
    #[case("3 lac", Some((300_000, 400_000)))]
    #[case("99", None)]
    #[case("lakh", None)]
    fn test_parse_price_range(#[case] term: &str, #[case] expected: Option<(i64, i64)>) {
        let parsed = parse_price_range(term).map(|(a, b)| (a.rupees(), b.rupees()));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_no_results_offers_suggestions() {
        match search("gold anklet xyz") {
            SearchOutcome::Products { products } => {
                // "gold" matches via word matching
                assert!(!products.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }

        match search("chainz") {
            SearchOutcome::NoResults { suggestions } => assert!(suggestions.is_empty()),
            other => panic!("unexpected {:?}", other),
        }

        match search("anklet") {
            SearchOutcome::NoResults { suggestions } => {
                assert_eq!(suggestions, vec!["anklets".to_string()])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_suggestions_capped_at_three() {
        let s = suggestions("gold");
        assert_eq!(s, vec!["gold sets", "24k gold", "22k gold"]);
    }

    #[test]
    fn test_recent_searches() {
        let mut recent = Vec::new();
        for term in ["rings", "gold", "pearl", "rings", "bridal", "24k", "silver"] {
            push_recent_search(&mut recent, term);
        }
        assert_eq!(recent, vec!["silver", "24k", "bridal", "rings", "pearl"]);

        push_recent_search(&mut recent, "   ");
        assert_eq!(recent.len(), MAX_RECENT_SEARCHES);
    }
}
