//! # Command Line
//!
//! ```text
//! aali [--json] [--config FILE] <command>
//!
//!   catalog                         list products
//!   search <query..> | --recent     search, or show recent searches
//!   rates                           metal rate table
//!   cart [show|add|inc|dec|set|remove|clear|import]
//!   wishlist [show|toggle|move-to-cart|clear]
//!   breakdown                       price breakdown of the cart
//!   checkout --name .. --payment ..  place an order
//!   invoice [ORDER_ID]              invoice for an order (latest by default)
//!   orders [list|pending|sync]
//!   account [register|login|logout|whoami]
//! ```

use std::path::PathBuf;

use aali_core::CheckoutForm;
use clap::{Args, Parser, Subcommand};

/// Aali Gold Jewelz storefront
#[derive(Parser, Debug)]
#[command(name = "aali", version)]
#[command(about = "Aali Gold Jewelz storefront: catalog, cart, checkout and invoices", long_about = None)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: aali.toml in the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the catalog
    Catalog,
    /// Search the catalog by text or price ("85k", "2 lakh")
    Search {
        #[arg(required_unless_present = "recent", num_args = 1..)]
        query: Vec<String>,
        /// Show recent searches instead
        #[arg(long, conflicts_with = "query")]
        recent: bool,
    },
    /// Show the metal rate table
    Rates,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Show or change the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
    /// Price breakdown of the cart (gold, making, CGST, SGST)
    Breakdown,
    /// Place an order for the cart
    Checkout(CheckoutArgs),
    /// Print the invoice for an order
    Invoice {
        /// Order id; the most recent order when omitted
        order_id: Option<String>,
    },
    /// Order history and the pending-order outbox
    Orders {
        #[command(subcommand)]
        action: Option<OrdersAction>,
    },
    /// Mocked account session
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CartAction {
    Show,
    /// Add a product by catalog id
    Add {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Increase a line's quantity by one
    Inc { id: String },
    /// Decrease a line's quantity by one (removes at zero)
    Dec { id: String },
    /// Set a line's quantity (0 removes)
    Set { id: String, quantity: i64 },
    Remove { id: String },
    Clear,
    /// Import a cart exported from the old web storefront
    Import {
        /// JSON file holding the exported `aaliGlobalCart` array
        file: PathBuf,
        /// Replace the current cart instead of merging into it
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum WishlistAction {
    Show,
    /// Add the product if absent, remove it if present
    Toggle { id: String },
    /// Move a saved product into the cart
    MoveToCart { id: String },
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum OrdersAction {
    /// Recent orders, newest first
    List {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Orders waiting to be submitted
    Pending,
    /// Retry pending orders
    Sync,
}

#[derive(Subcommand, Debug)]
pub enum AccountAction {
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Email login, or social login with --provider
    Login {
        #[arg(long, required_unless_present = "provider")]
        email: Option<String>,
        #[arg(long, default_value = "")]
        password: String,
        /// google or facebook
        #[arg(long, conflicts_with = "email")]
        provider: Option<String>,
    },
    Logout,
    Whoami,
}

/// Checkout form fields. Anything omitted is filled from the saved draft.
#[derive(Args, Debug, Default)]
pub struct CheckoutArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub pincode: String,
    #[arg(long, default_value = "")]
    pub aadhaar: String,
    /// upi, netbanking, card or cod
    #[arg(long = "payment", default_value = "")]
    pub payment_method: String,
    #[arg(long, default_value = "")]
    pub upi_id: String,
    #[arg(long = "bank", default_value = "")]
    pub bank_name: String,
    #[arg(long, default_value = "")]
    pub card_number: String,
    #[arg(long, default_value = "")]
    pub card_name: String,
    /// Only save the entered fields as a draft
    #[arg(long)]
    pub save_draft: bool,
}

impl CheckoutArgs {
    pub fn to_form(&self) -> CheckoutForm {
        CheckoutForm {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            pincode: self.pincode.clone(),
            aadhaar: self.aadhaar.clone(),
            payment_method: self.payment_method.clone(),
            upi_id: self.upi_id.clone(),
            bank_name: self.bank_name.clone(),
            card_number: self.card_number.clone(),
            card_name: self.card_name.clone(),
        }
    }
}
