//! # Cart & Wishlist State
//!
//! Pure in-memory cart and wishlist. The storefront's store object owns one
//! of each and persists after every change; nothing here does I/O.
//!
//! ## Cart Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add(product)        existing line → quantity + 1                       │
//! │                      new line      → quantity 1 (max 100 lines)         │
//! │  change(id, ±n)      quantity ≤ 0  → line removed                       │
//! │  set(id, n)          1..=99, 0 removes                                  │
//! │  remove(id) / clear()                                                   │
//! │                                                                         │
//! │  Quantity never exceeds 99 on any line.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;

use crate::catalog::parse_weight;
use crate::error::{CoreError, CoreResult};
use crate::metal::{MetalRateTable, MetalType};
use crate::money::Money;
use crate::pricing::{breakdown_cart, CartBreakdown};
use crate::types::{CartLineItem, Product, WishlistItem};
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an ordered list of lines keyed by product id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from stored lines.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        Cart { items }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of a product, incrementing an existing line.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<&CartLineItem> {
        self.add_item(CartLineItem::from_product(product))
    }

    /// Adds a line, merging quantities when the id already exists.
    pub fn add_item(&mut self, item: CartLineItem) -> CoreResult<&CartLineItem> {
        if let Some(pos) = self.items.iter().position(|i| i.id == item.id) {
            let new_qty = self.items[pos].quantity + item.quantity.max(1);
            check_quantity_cap(new_qty)?;
            self.items[pos].quantity = new_qty;
            return Ok(&self.items[pos]);
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        check_quantity_cap(item.quantity)?;

        let mut item = item;
        item.quantity = item.quantity.max(1);
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Changes a line's quantity by `delta`; reaching zero or below removes it.
    ///
    /// Returns the remaining line, or `None` if it was removed.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> CoreResult<Option<&CartLineItem>> {
        let pos = self.position(id)?;
        let new_qty = self.items[pos].quantity + delta;
        if new_qty <= 0 {
            self.items.remove(pos);
            return Ok(None);
        }
        check_quantity_cap(new_qty)?;
        self.items[pos].quantity = new_qty;
        Ok(Some(&self.items[pos]))
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<Option<&CartLineItem>> {
        let pos = self.position(id)?;
        if quantity == 0 {
            self.items.remove(pos);
            return Ok(None);
        }
        validate_quantity(quantity)?;
        self.items[pos].quantity = quantity;
        Ok(Some(&self.items[pos]))
    }

    pub fn remove(&mut self, id: &str) -> CoreResult<CartLineItem> {
        let pos = self.position(id)?;
        Ok(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across lines.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of `price × quantity` across lines.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    pub fn breakdown(&self, table: &MetalRateTable) -> CartBreakdown {
        breakdown_cart(&self.items, table)
    }

    fn position(&self, id: &str) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::NotInCart(id.to_string()))
    }
}

fn check_quantity_cap(quantity: i64) -> CoreResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Wishlist
// =============================================================================

/// Saved products, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn new() -> Self {
        Wishlist { items: Vec::new() }
    }

    pub fn from_items(items: Vec<WishlistItem>) -> Self {
        Wishlist { items }
    }

    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Adds the product if absent, removes it if present.
    ///
    /// Returns `true` when the product is now in the wishlist.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if let Some(pos) = self.items.iter().position(|i| i.id == product.id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(WishlistItem::from_product(product));
            true
        }
    }

    pub fn remove(&mut self, id: &str) -> CoreResult<WishlistItem> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::NotInWishlist(id.to_string()))?;
        Ok(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Moves a saved product into the cart.
    ///
    /// The catalog entry supplies metal and weight. The wishlist is left
    /// untouched if the cart rejects the line.
    pub fn move_to_cart(&mut self, product: &Product, cart: &mut Cart) -> CoreResult<()> {
        if !self.contains(&product.id) {
            return Err(CoreError::NotInWishlist(product.id.clone()));
        }
        cart.add_product(product)?;
        self.remove(&product.id)?;
        Ok(())
    }
}

// =============================================================================
// Legacy Cart Import
// =============================================================================

/// Prices above ₹100 crore per piece are treated as corrupt.
const MAX_LEGACY_PRICE_RUPEES: f64 = 1_000_000_000.0;

/// Result of reading a browser-exported cart.
#[derive(Debug, Clone, Default)]
pub struct LegacyImport {
    pub items: Vec<CartLineItem>,
    /// One message per field that had to be coerced.
    pub warnings: Vec<String>,
}

/// Parses a cart exported from the old browser storage (`aaliGlobalCart`).
///
/// The document must be a JSON array; everything inside it is read
/// leniently so one corrupt line never blocks the rest:
/// - non-numeric, null, missing or absurdly large price → 0
/// - missing or invalid quantity → 1 (capped at 99)
/// - `metal` or `metalType`, inferred from name/material when absent
/// - weight as `"12g"`, `"12.5"` or a number
/// - entries without an id are skipped
pub fn parse_legacy_cart(json: &str) -> CoreResult<LegacyImport> {
    let doc: Value =
        serde_json::from_str(json).map_err(|e| CoreError::ImportFailed(e.to_string()))?;
    let entries = doc
        .as_array()
        .ok_or_else(|| CoreError::ImportFailed("expected a JSON array".to_string()))?;

    let mut import = LegacyImport::default();
    for (index, entry) in entries.iter().enumerate() {
        let Some(id) = entry.get("id").and_then(scalar_to_string) else {
            import
                .warnings
                .push(format!("line {}: missing id, skipped", index));
            continue;
        };
        let item = legacy_line(&id, entry, &mut import.warnings);

        let len = import.items.len();
        match import.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                existing.quantity = (existing.quantity + item.quantity).min(MAX_ITEM_QUANTITY)
            }
            None if len < MAX_CART_ITEMS => import.items.push(item),
            None => import
                .warnings
                .push(format!("line {}: cart full, skipped", index)),
        }
    }
    Ok(import)
}

fn legacy_line(id: &str, entry: &Value, warnings: &mut Vec<String>) -> CartLineItem {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unnamed item")
        .to_string();
    let material = entry
        .get("material")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let price = match entry.get("price").and_then(number_like) {
        Some(p) if (0.0..=MAX_LEGACY_PRICE_RUPEES).contains(&p) => {
            Money::from_rupees(p.round() as i64)
        }
        _ => {
            warnings.push(format!("{}: invalid price, using ₹0", id));
            Money::zero()
        }
    };
    let original_price = entry
        .get("originalPrice")
        .and_then(number_like)
        .filter(|p| *p > 0.0 && *p <= MAX_LEGACY_PRICE_RUPEES)
        .map(|p| Money::from_rupees(p.round() as i64));

    let quantity = match entry.get("quantity") {
        None | Some(Value::Null) => 1,
        Some(v) => match number_like(v) {
            Some(q) if q >= 1.0 => (q as i64).min(MAX_ITEM_QUANTITY),
            _ => {
                warnings.push(format!("{}: invalid quantity, using 1", id));
                1
            }
        },
    };

    let metal = entry
        .get("metal")
        .or_else(|| entry.get("metalType"))
        .and_then(Value::as_str)
        .map(MetalType::from_tag_or_standard)
        .unwrap_or_else(|| MetalType::infer(&name, &material));

    let weight_grams = match entry.get("weight") {
        Some(Value::Number(n)) => n.as_f64().filter(|w| *w > 0.0),
        Some(Value::String(s)) => parse_weight(s),
        _ => None,
    };

    CartLineItem {
        id: id.to_string(),
        name,
        price,
        original_price,
        quantity,
        metal,
        weight_grams,
        material,
        category: entry
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or("general")
            .to_string(),
    }
}

/// Reads a JSON number, or a string holding one. NaN and infinities are rejected.
fn number_like(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Legacy ids were numbers on the storefront and strings elsewhere.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{catalog, find_product};

    fn product(id: &str) -> Product {
        find_product(id).unwrap()
    }

    #[test]
    fn test_add_existing_increments() {
        let mut cart = Cart::new();
        cart.add_product(&product("1")).unwrap();
        cart.add_product(&product("1")).unwrap();
        cart.add_product(&product("2")).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.get("1").unwrap().quantity, 2);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price().rupees(), 125_000 * 2 + 320_000);
    }

    #[test]
    fn test_change_quantity_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add_product(&product("3")).unwrap();
        cart.change_quantity("3", 2).unwrap();
        assert_eq!(cart.get("3").unwrap().quantity, 3);

        let remaining = cart.change_quantity("3", -3).unwrap();
        assert!(remaining.is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_unknown_item() {
        let mut cart = Cart::new();
        let err = cart.change_quantity("missing", 1).unwrap_err();
        assert!(matches!(err, CoreError::NotInCart(_)));
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        cart.add_product(&product("1")).unwrap();
        cart.set_quantity("1", MAX_ITEM_QUANTITY).unwrap();

        let err = cart.change_quantity("1", 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert!(cart.set_quantity("1", 100).is_err());
        assert!(cart.add_product(&product("1")).is_err());
        assert_eq!(cart.get("1").unwrap().quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_product(&product("4")).unwrap();
        assert!(cart.set_quantity("4", 0).unwrap().is_none());
        assert!(cart.is_empty());
        assert!(cart.set_quantity("4", 2).is_err());
    }

    #[test]
    fn test_line_limit() {
        let mut cart = Cart::new();
        let base = product("1");
        for i in 0..MAX_CART_ITEMS {
            let mut p = base.clone();
            p.id = format!("p{}", i);
            cart.add_product(&p).unwrap();
        }
        let mut extra = base.clone();
        extra.id = "overflow".to_string();
        assert!(matches!(
            cart.add_product(&extra).unwrap_err(),
            CoreError::CartTooLarge { .. }
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        for p in catalog() {
            cart.add_product(&p).unwrap();
        }
        let removed = cart.remove("2").unwrap();
        assert_eq!(removed.name, "Diamond Solitaire Ring");
        assert_eq!(cart.items().len(), 5);

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_wishlist_toggle() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle(&product("5")));
        assert!(wishlist.contains("5"));
        assert!(!wishlist.toggle(&product("5")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_wishlist_move_to_cart() {
        let mut wishlist = Wishlist::new();
        let mut cart = Cart::new();
        wishlist.toggle(&product("6"));

        wishlist.move_to_cart(&product("6"), &mut cart).unwrap();
        assert!(wishlist.is_empty());
        assert_eq!(cart.get("6").unwrap().quantity, 1);

        let err = wishlist.move_to_cart(&product("6"), &mut cart).unwrap_err();
        assert!(matches!(err, CoreError::NotInWishlist(_)));
    }

    #[test]
    fn test_legacy_import_coerces_bad_fields() {
        let json = r#"[
            {"id": 1, "name": "Golden Sunburst Necklace", "price": 125000, "quantity": 2,
             "material": "22K Gold", "weight": "12g", "originalPrice": 149999},
            {"id": "7", "name": "Broken", "price": "abc", "metalType": "18K", "weight": 4.5},
            {"id": 8, "name": "Nulls", "price": null, "quantity": null, "metal": "copper"},
            {"name": "No id", "price": 10}
        ]"#;

        let import = parse_legacy_cart(json).unwrap();
        assert_eq!(import.items.len(), 3);

        let first = &import.items[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.quantity, 2);
        assert_eq!(first.weight_grams, Some(12.0));
        assert_eq!(first.metal, MetalType::Gold22K);

        let broken = &import.items[1];
        assert!(broken.price.is_zero());
        assert_eq!(broken.quantity, 1);
        assert_eq!(broken.metal, MetalType::Gold18K);
        assert_eq!(broken.weight_grams, Some(4.5));

        let nulls = &import.items[2];
        assert!(nulls.price.is_zero());
        assert_eq!(nulls.quantity, 1);
        assert_eq!(nulls.metal, MetalType::Gold22K);

        assert!(import.warnings.iter().any(|w| w.contains("missing id")));
    }

    #[test]
    fn test_legacy_import_totals_survive_corrupt_line() {
        let json = r#"[
            {"id": 1, "price": 1000, "quantity": 2},
            {"id": 2, "price": "NaN"}
        ]"#;
        let import = parse_legacy_cart(json).unwrap();
        let cart = Cart::from_items(import.items);
        assert_eq!(cart.total_price().rupees(), 2_000);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_legacy_import_rejects_non_array() {
        assert!(matches!(
            parse_legacy_cart("{\"id\": 1}").unwrap_err(),
            CoreError::ImportFailed(_)
        ));
        assert!(parse_legacy_cart("not json").is_err());
    }

    #[test]
    fn test_legacy_import_merges_duplicate_ids() {
        let json = r#"[
            {"id": 3, "price": 85000, "quantity": 60},
            {"id": "3", "price": 85000, "quantity": 60},
            {"id": 4, "price": 210000}
        ]"#;
        let import = parse_legacy_cart(json).unwrap();
        assert_eq!(import.items.len(), 2);
        assert_eq!(import.items[0].id, "3");
        assert_eq!(import.items[0].quantity, MAX_ITEM_QUANTITY);
        assert_eq!(import.items[1].quantity, 1);
    }

    #[test]
    fn test_legacy_import_huge_price_is_zeroed() {
        let json = r#"[
            {"id": 1, "price": 1000},
            {"id": 2, "price": 1e19, "quantity": 2, "originalPrice": 1e300}
        ]"#;
        let import = parse_legacy_cart(json).unwrap();
        let huge = &import.items[1];
        assert!(huge.price.is_zero());
        assert_eq!(huge.original_price, None);
        assert!(import.warnings.iter().any(|w| w.starts_with("2: invalid price")));

        let cart = Cart::from_items(import.items);
        assert_eq!(cart.total_price().rupees(), 1_000);
        let breakdown = cart.breakdown(&MetalRateTable::standard());
        assert_eq!(breakdown.totals.cart_total.rupees(), 1_000);
    }
}
