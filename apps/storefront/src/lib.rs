//! # Aali Storefront
//!
//! The `aali` command line storefront for Aali Gold Jewelz.
//!
//! ## Module Organization
//! ```text
//! aali_storefront/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap command tree
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── Cart + wishlist store with persistence
//! │   └── config.rs   ◄─── Configuration (defaults → aali.toml → AALI_*)
//! ├── commands/       ◄─── One module per command group
//! ├── submit.rs       ◄─── Order submission endpoint (trait)
//! ├── output.rs       ◄─── Text / JSON rendering
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod state;
pub mod submit;

use std::process::ExitCode;

use aali_core::account::RegistrationForm;
use aali_core::order::ORDER_NONCE_BOUND;
use aali_core::MetalRateTable;
use aali_db::{Database, DbConfig};
use chrono::Utc;
use clap::Parser;
use rand::Rng;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{AccountAction, CartAction, Cli, Command, OrdersAction, WishlistAction};
use commands::account::Credentials;
use commands::AppContext;
use error::ApiError;
use output::CommandOutput;
use state::{ConfigState, StoreState};

/// Runs the CLI and returns the process exit status.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Storefront Startup                                │
/// │                                                                         │
/// │  1. Initialize Logging (stderr, RUST_LOG)                               │
/// │  2. Parse the command line                                              │
/// │  3. Load configuration: defaults → aali.toml → AALI_* env               │
/// │  4. Connect to SQLite (WAL) and run migrations                          │
/// │  5. Load cart + wishlist into StoreState                                │
/// │  6. Dispatch the command, print text or JSON                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match start(&cli).await {
        Ok(output) => match output.render(cli.json) {
            Ok(rendered) => {
                println!("{}", rendered);
                ExitCode::SUCCESS
            }
            Err(e) => report(&e, cli.json),
        },
        Err(e) => report(&e, cli.json),
    }
}

async fn start(cli: &Cli) -> Result<CommandOutput, ApiError> {
    let config = ConfigState::load(cli.config.as_deref())?;
    let db = Database::new(DbConfig::new(config.database_path())).await?;
    let ctx = AppContext {
        submitter: submit::submitter_for(config.submit_dir.as_deref()),
        store: StoreState::load(db).await?,
        rates: MetalRateTable::standard(),
        config,
    };

    let result = execute(&ctx, &cli.command).await;
    ctx.store.db().close().await;
    result
}

fn report(err: &ApiError, json: bool) -> ExitCode {
    debug!(code = ?err.code, "Command failed");
    if json {
        match serde_json::to_string_pretty(err) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("Error: {}", err.message);
    }
    ExitCode::FAILURE
}

/// Routes a parsed command to its handler.
pub async fn execute(ctx: &AppContext, command: &Command) -> Result<CommandOutput, ApiError> {
    let store = &ctx.store;
    let db = store.db();

    match command {
        Command::Catalog => commands::catalog::list_catalog(),
        Command::Search { recent: true, .. } => commands::catalog::recent_searches(db).await,
        Command::Search { query, .. } => commands::catalog::search(db, &query.join(" ")).await,
        Command::Rates => commands::catalog::rates(&ctx.rates),

        Command::Cart { action } => match action {
            None | Some(CartAction::Show) => commands::cart::show(store),
            Some(CartAction::Add { id, quantity }) => commands::cart::add(store, id, *quantity).await,
            Some(CartAction::Inc { id }) => commands::cart::change(store, id, 1).await,
            Some(CartAction::Dec { id }) => commands::cart::change(store, id, -1).await,
            Some(CartAction::Set { id, quantity }) => commands::cart::set(store, id, *quantity).await,
            Some(CartAction::Remove { id }) => commands::cart::remove(store, id).await,
            Some(CartAction::Clear) => commands::cart::clear(store).await,
            Some(CartAction::Import { file, replace }) => {
                commands::cart::import(store, file, *replace).await
            }
        },
        Command::Breakdown => commands::cart::breakdown(store, &ctx.rates),

        Command::Wishlist { action } => match action {
            None | Some(WishlistAction::Show) => commands::wishlist::show(store),
            Some(WishlistAction::Toggle { id }) => commands::wishlist::toggle(store, id).await,
            Some(WishlistAction::MoveToCart { id }) => {
                commands::wishlist::move_to_cart(store, id).await
            }
            Some(WishlistAction::Clear) => commands::wishlist::clear(store).await,
        },

        Command::Checkout(args) => {
            let nonce = rand::rng().random_range(0..ORDER_NONCE_BOUND);
            commands::checkout::checkout(ctx, args.to_form(), args.save_draft, Utc::now(), nonce)
                .await
        }
        Command::Invoice { order_id } => {
            commands::invoice::invoice(db, ctx.config.seller(), order_id.as_deref(), Utc::now())
                .await
        }

        Command::Orders { action } => match action {
            None => commands::orders::list(ctx, None).await,
            Some(OrdersAction::List { limit }) => commands::orders::list(ctx, *limit).await,
            Some(OrdersAction::Pending) => commands::orders::pending(ctx).await,
            Some(OrdersAction::Sync) => commands::orders::sync(ctx).await,
        },

        Command::Account { action } => match action {
            AccountAction::Register {
                name,
                email,
                phone,
                password,
                confirm_password,
            } => {
                let form = RegistrationForm {
                    name: name.clone(),
                    email: email.clone(),
                    phone: phone.clone(),
                    password: password.clone(),
                    confirm_password: confirm_password.clone(),
                };
                commands::account::register(db, &form, Utc::now()).await
            }
            AccountAction::Login {
                email,
                password,
                provider,
            } => {
                let credentials = match (provider, email) {
                    (Some(provider), _) => Credentials::Social {
                        provider: provider.clone(),
                    },
                    (None, email) => Credentials::Email {
                        email: email.clone().unwrap_or_default(),
                        password: password.clone(),
                    },
                };
                commands::account::login(db, &credentials, Utc::now()).await
            }
            AccountAction::Logout => commands::account::logout(db).await,
            AccountAction::Whoami => commands::account::whoami(db).await,
        },
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so `--json`
/// output on stdout stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=aali_db=trace` - Trace for the storage crate only
/// - Default: `info,aali=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aali=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use crate::submit::OfflineSubmitter;

    async fn run_args(ctx: &AppContext, args: &[&str]) -> Result<CommandOutput, ApiError> {
        let cli = Cli::try_parse_from(args).unwrap();
        execute(ctx, &cli.command).await
    }

    #[tokio::test]
    async fn test_dispatch_cart_flow() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        run_args(&ctx, &["aali", "cart", "add", "4", "-q", "2"]).await.unwrap();
        run_args(&ctx, &["aali", "cart", "dec", "4"]).await.unwrap();

        let out = run_args(&ctx, &["aali", "cart"]).await.unwrap();
        assert_eq!(out.json["total_items"], 1);

        let out = run_args(&ctx, &["aali", "breakdown"]).await.unwrap();
        assert_eq!(out.json["totals"]["cart_total"], 210_000);
    }

    #[tokio::test]
    async fn test_dispatch_checkout_then_invoice() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        run_args(&ctx, &["aali", "cart", "add", "1"]).await.unwrap();
        let out = run_args(
            &ctx,
            &[
                "aali", "checkout", "--name", "Asha Verma", "--phone", "9876543210",
                "--address", "12 MG Road, Bengaluru", "--pincode", "560001",
                "--payment", "netbanking", "--bank", "State Bank of India",
            ],
        )
        .await
        .unwrap();
        let order_id = out.json["order"]["order_id"].as_str().unwrap().to_string();
        assert!(order_id.starts_with("AALI"));
        assert_eq!(order_id.len(), 14);

        let out = run_args(&ctx, &["aali", "invoice"]).await.unwrap();
        assert_eq!(out.json["invoice_number"], order_id.as_str());
    }

    #[tokio::test]
    async fn test_dispatch_search_recent() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        run_args(&ctx, &["aali", "search", "wedding", "ring"]).await.unwrap();
        let out = run_args(&ctx, &["aali", "search", "--recent"]).await.unwrap();
        assert_eq!(out.json, serde_json::json!(["wedding ring"]));
    }

    #[tokio::test]
    async fn test_dispatch_email_login() {
        let ctx = context(Box::new(OfflineSubmitter)).await;
        let out = run_args(
            &ctx,
            &["aali", "account", "login", "--email", "asha@example.in", "--password", "x"],
        )
        .await
        .unwrap();
        assert_eq!(out.json["provider"], "email");
    }
}
