//! # Catalog Commands
//!
//! Browsing, search with recent-search history, and the rate table.

use aali_core::catalog::{self, push_recent_search, SearchOutcome};
use aali_core::{MetalRateTable, Product};
use aali_db::{Database, PreferenceKey};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::output::{pad_left, pad_right, CommandOutput};

/// One catalog row: id, name, material, weight, price, struck-out price.
pub(crate) fn product_row(p: &Product) -> String {
    let mut row = format!(
        "{}  {}  {}  {}  {}",
        pad_left(&p.id, 2),
        pad_right(&p.name, 28),
        pad_right(&p.material, 22),
        pad_left(&p.weight_label, 4),
        pad_left(&p.price.format_inr(), 10),
    );
    if let Some(original) = p.original_price.filter(|o| *o > p.price) {
        row.push_str(&format!("  (was {})", original.format_inr()));
    }
    if let Some(badge) = &p.badge {
        row.push_str(&format!("  [{}]", badge));
    }
    row
}

/// Lists every product.
pub fn list_catalog() -> Result<CommandOutput, ApiError> {
    let products = catalog::catalog();
    let text = products.iter().map(product_row).collect::<Vec<_>>().join("\n");
    CommandOutput::new(text, &products)
}

/// Searches the catalog and records the query in recent searches.
pub async fn search(db: &Database, query: &str) -> Result<CommandOutput, ApiError> {
    let query = query.trim();
    debug!(query = %query, "search command");
    let outcome = catalog::search(query);

    record_search(db, query).await;

    let text = match &outcome {
        SearchOutcome::Products { products } => format!(
            "{} result(s) for \"{}\"\n{}",
            products.len(),
            query,
            products.iter().map(product_row).collect::<Vec<_>>().join("\n")
        ),
        SearchOutcome::PriceRange { min, max, products } if products.is_empty() => format!(
            "No products between {} and {}",
            min.format_inr(),
            max.format_inr()
        ),
        SearchOutcome::PriceRange { min, max, products } => format!(
            "{} product(s) between {} and {}\n{}",
            products.len(),
            min.format_inr(),
            max.format_inr(),
            products.iter().map(product_row).collect::<Vec<_>>().join("\n")
        ),
        SearchOutcome::NoResults { suggestions } if suggestions.is_empty() => {
            format!("No results for \"{}\"", query)
        }
        SearchOutcome::NoResults { suggestions } => format!(
            "No results for \"{}\". Try: {}",
            query,
            suggestions.join(", ")
        ),
    };
    CommandOutput::new(text, &outcome)
}

/// Persists a search term; a storage failure only logs.
async fn record_search(db: &Database, query: &str) {
    let prefs = db.preferences();
    let mut recent: Vec<String> = match prefs.get(PreferenceKey::RecentSearches).await {
        Ok(saved) => saved.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Could not read recent searches");
            Vec::new()
        }
    };
    push_recent_search(&mut recent, query);
    if let Err(e) = prefs.set(PreferenceKey::RecentSearches, &recent).await {
        warn!(error = %e, "Could not save recent searches");
    }
}

/// Shows recent searches, most recent first.
pub async fn recent_searches(db: &Database) -> Result<CommandOutput, ApiError> {
    let recent: Vec<String> = db
        .preferences()
        .get(PreferenceKey::RecentSearches)
        .await?
        .unwrap_or_default();
    let text = if recent.is_empty() {
        "No recent searches".to_string()
    } else {
        recent.join("\n")
    };
    CommandOutput::new(text, &recent)
}

/// Shows the metal rate table.
pub fn rates(table: &MetalRateTable) -> Result<CommandOutput, ApiError> {
    let mut lines = vec![format!(
        "{}  {}  {}  {}  {}",
        pad_right("Metal", 8),
        pad_left("Rate/g", 9),
        pad_left("Purity", 6),
        pad_left("Making", 6),
        pad_left("GST", 4)
    )];
    for rate in table.iter() {
        lines.push(format!(
            "{}  {}  {}  {}  {}",
            pad_right(rate.metal.as_str(), 8),
            pad_left(&rate.rate_per_gram.format_inr(), 9),
            pad_left(&format!("{:.1}%", rate.purity_percent()), 6),
            pad_left(&bps_percent(rate.making_charge_bps), 6),
            pad_left(&bps_percent(rate.gst_bps), 4),
        ));
    }
    let rows: Vec<_> = table.iter().collect();
    CommandOutput::new(lines.join("\n"), &rows)
}

/// `1000` → `"10%"`, `150` → `"1.5%"`.
fn bps_percent(bps: u32) -> String {
    if bps % 100 == 0 {
        format!("{}%", bps / 100)
    } else {
        format!("{}.{}%", bps / 100, (bps % 100) / 10)
    }
}
