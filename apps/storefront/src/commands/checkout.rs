//! # Checkout Command
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  form (flags) ──merge──► saved draft fills blanks                       │
//! │     │                                                                   │
//! │     ├── --save-draft ──► draft saved, stop                              │
//! │     ├── cart empty   ──► BUSINESS_LOGIC                                 │
//! │     ├── invalid      ──► draft saved, VALIDATION_ERROR (all fields)     │
//! │     ▼                                                                   │
//! │  build order ──► orders table (pending_sync)                            │
//! │     ▼                                                                   │
//! │  submitter.submit(fields)                                               │
//! │     ├── Ok  ──► status = submitted                                      │
//! │     └── Err ──► pending_orders outbox, "saved offline"                  │
//! │     ▼                                                                   │
//! │  cart cleared, draft removed ──► receipt                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A submission failure never fails checkout.

use aali_core::order::{build_order, compose_order_id, submission_fields};
use aali_core::validation::validate_checkout;
use aali_core::{CheckoutForm, CoreError, Order, OrderStatus};
use aali_db::{Database, PreferenceKey};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::AppContext;
use crate::error::ApiError;
use crate::output::CommandOutput;

/// What `aali checkout` reports.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub order: Order,
    /// True when the endpoint was unreachable and the order sits in the outbox.
    pub saved_offline: bool,
}

/// Places an order for the current cart.
///
/// `now` and `nonce` make up the order id; the caller supplies them.
pub async fn checkout(
    ctx: &AppContext,
    form: CheckoutForm,
    save_draft_only: bool,
    now: DateTime<Utc>,
    nonce: u32,
) -> Result<CommandOutput, ApiError> {
    let db = ctx.store.db();
    let form = match load_draft(db).await {
        Some(draft) => form.merge_draft(&draft),
        None => form,
    };

    if save_draft_only {
        save_draft(db, &form).await;
        return Ok(CommandOutput::message("Checkout details saved"));
    }

    let items = ctx.store.with_cart(|cart| cart.items().to_vec());
    if items.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let (customer, payment) = match validate_checkout(&form) {
        Ok(valid) => valid,
        Err(errors) => {
            save_draft(db, &form).await;
            return Err(errors.into());
        }
    };

    let order_id = compose_order_id(now.timestamp_millis(), nonce);
    let mut order = build_order(order_id, now, customer, payment, &items, &ctx.rates)?;
    db.orders().insert(&order).await?;
    info!(
        order_id = %order.order_id,
        total = order.breakdown.cart_total.rupees(),
        lines = order.items.len(),
        "Order placed"
    );

    let fields = submission_fields(&order);
    let saved_offline = match ctx.submitter.submit(&fields).await {
        Ok(()) => {
            db.orders()
                .set_status(&order.order_id, OrderStatus::Submitted)
                .await?;
            order.status = OrderStatus::Submitted;
            info!(order_id = %order.order_id, submitter = ctx.submitter.name(), "Order submitted");
            false
        }
        Err(e) => {
            warn!(order_id = %order.order_id, error = %e, "Order submission failed; saved offline");
            db.pending_orders().enqueue(&order.order_id, &fields).await?;
            true
        }
    };

    ctx.store
        .update_cart(|cart| {
            cart.clear();
            Ok(())
        })
        .await?;
    if let Err(e) = db.preferences().remove(PreferenceKey::CheckoutDraft).await {
        warn!(error = %e, "Could not clear checkout draft");
    }

    let text = render_receipt(&order, saved_offline);
    CommandOutput::new(
        text,
        &Receipt {
            order,
            saved_offline,
        },
    )
}

fn render_receipt(order: &Order, saved_offline: bool) -> String {
    let mut text = format!(
        "Order {} placed: {} via {}",
        order.order_id,
        order.breakdown.cart_total.format_inr(),
        order.payment.method.label()
    );
    if let Some(charge) = order.payment.cod_charges {
        text.push_str(&format!(
            "\nCash on delivery handling charge of {} is payable on delivery",
            charge.format_inr()
        ));
    }
    if saved_offline {
        text.push_str("\nThe order desk could not be reached; your order was saved offline and will be retried with `aali orders sync`");
    }
    text
}

async fn load_draft(db: &Database) -> Option<CheckoutForm> {
    match db.preferences().get(PreferenceKey::CheckoutDraft).await {
        Ok(draft) => draft,
        Err(e) => {
            warn!(error = %e, "Could not read checkout draft");
            None
        }
    }
}

/// Saves the form without the card number.
async fn save_draft(db: &Database, form: &CheckoutForm) {
    if let Err(e) = db
        .preferences()
        .set(PreferenceKey::CheckoutDraft, &form.to_draft())
        .await
    {
        warn!(error = %e, "Could not save checkout draft");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, upi_form};
    use crate::error::ErrorCode;
    use crate::submit::{OfflineSubmitter, SpoolSubmitter};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_718_000_123_456).unwrap()
    }

    async fn with_necklace(ctx: &AppContext) {
        crate::commands::cart::add(&ctx.store, "1", 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_checkout_submits_and_clears_cart() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(Box::new(SpoolSubmitter::new(dir.path()))).await;
        with_necklace(&ctx).await;

        let out = checkout(&ctx, upi_form(), false, now(), 42).await.unwrap();
        assert_eq!(out.json["saved_offline"], false);
        assert_eq!(out.json["order"]["order_id"], "AALI1234560042");
        assert_eq!(out.json["order"]["status"], "submitted");

        let stored = ctx.store.db().orders().get_required("AALI1234560042").await.unwrap();
        assert_eq!(stored.status, OrderStatus::Submitted);
        assert_eq!(stored.breakdown.cart_total.rupees(), 125_000);
        assert_eq!(
            stored.customer.aadhaar_masked.as_deref(),
            Some("XXXX-XXXX-0123")
        );

        assert!(dir.path().join("AALI1234560042.json").exists());
        assert!(ctx.store.with_cart(|c| c.is_empty()));
        assert!(ctx.store.db().cart().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submission_failure_saves_offline() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        with_necklace(&ctx).await;

        let out = checkout(&ctx, upi_form(), false, now(), 7).await.unwrap();
        assert_eq!(out.json["saved_offline"], true);
        assert!(out.text.contains("saved offline"));

        let db = ctx.store.db();
        assert_eq!(db.pending_orders().count_pending().await.unwrap(), 1);
        let stored = db.orders().get_required("AALI1234560007").await.unwrap();
        assert_eq!(stored.status, OrderStatus::PendingSync);
        assert!(ctx.store.with_cart(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        let err = checkout(&ctx, upi_form(), false, now(), 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_invalid_form_keeps_cart_and_saves_draft() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        with_necklace(&ctx).await;

        let mut form = upi_form();
        form.phone = "12345".to_string();
        form.pincode = String::new();
        form.payment_method = "card".to_string();
        form.card_number = "4111111111111111".to_string();
        form.upi_id = String::new();

        let err = checkout(&ctx, form, false, now(), 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("; "));
        assert_eq!(ctx.store.with_cart(|c| c.total_items()), 1);

        let draft: CheckoutForm = ctx
            .store
            .db()
            .preferences()
            .get(PreferenceKey::CheckoutDraft)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.name, "Asha Verma");
        assert!(draft.card_number.is_empty());
    }

    #[tokio::test]
    async fn test_draft_fills_missing_fields() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        with_necklace(&ctx).await;

        checkout(&ctx, upi_form(), true, now(), 1).await.unwrap();

        let partial = CheckoutForm {
            name: "Asha V".to_string(),
            ..Default::default()
        };
        let out = checkout(&ctx, partial, false, now(), 3).await.unwrap();
        assert_eq!(out.json["order"]["customer"]["name"], "Asha V");
        assert_eq!(out.json["order"]["customer"]["pincode"], "560001");

        let draft: Option<CheckoutForm> = ctx
            .store
            .db()
            .preferences()
            .get(PreferenceKey::CheckoutDraft)
            .await
            .unwrap();
        assert!(draft.is_none());
    }

    #[tokio::test]
    async fn test_cod_charge_noted_not_added() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        with_necklace(&ctx).await;

        let mut form = upi_form();
        form.payment_method = "cod".to_string();
        form.upi_id = String::new();

        let out = checkout(&ctx, form, false, now(), 5).await.unwrap();
        assert_eq!(out.json["order"]["breakdown"]["cart_total"], 125_000);
        assert!(out.text.contains("₹100"));
    }
}
