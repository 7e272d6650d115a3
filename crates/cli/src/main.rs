//! NexusMarket cart CLI - inspect and edit a file-backed cart.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (one unit by default)
//! nm-cart add --id 65a1 --name "USB-C Hub" --price 500 --stock 3
//!
//! # Change or drop a line
//! nm-cart update 65a1 2
//! nm-cart remove 65a1
//!
//! # Show lines, totals and the order payload
//! nm-cart show
//! nm-cart summary
//! nm-cart checkout --name "Rahim" --phone 01700000000 --address "House 12" \
//!     --city Dhaka --postal-code 1207 --clear
//! ```
//!
//! The cart directory and pricing come from `NEXUS_*` environment variables
//! (see `nexus_market_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use nexus_market_cart::{CartConfig, CartStore, FileStore, ProductSnapshot, ShippingDetails, TracingSink};
use nexus_market_core::{Price, ProductId};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "nm-cart")]
#[command(author, version, about = "NexusMarket cart tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add units of a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// Display name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Current catalog stock
        #[arg(long)]
        stock: u32,

        /// Product image URL
        #[arg(long)]
        image: Option<String>,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        id: ProductId,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
    /// List cart lines
    Show,
    /// Show subtotal, shipping, tax and total
    Summary,
    /// Print the order payload for the current cart
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        postal_code: String,

        /// Empty the cart after printing the payload
        #[arg(long)]
        clear: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.json_logs);

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, defaulting to info for the cart crates.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nexus_market_cart=info,nm_cart=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let storage = FileStore::open(config.storage_dir.clone())?;
    let mut cart = CartStore::open_with_key(storage, TracingSink, config.cart_key.clone());

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            stock,
            image,
            quantity,
        } => {
            let product = ProductSnapshot {
                id,
                name,
                price: Price::new(price),
                image_url: image,
                stock,
            };
            commands::cart::add(&mut cart, &product, quantity)?;
        }
        Commands::Remove { id } => commands::cart::remove(&mut cart, &id),
        Commands::Update { id, quantity } => commands::cart::update(&mut cart, &id, quantity)?,
        Commands::Clear => commands::cart::clear(&mut cart),
        Commands::Show => commands::cart::show(&cart, &config.pricing)?,
        Commands::Summary => commands::checkout::summary(&cart, &config.pricing)?,
        Commands::Checkout {
            name,
            phone,
            address,
            city,
            postal_code,
            clear,
        } => {
            let details = ShippingDetails {
                name,
                phone,
                address,
                city,
                postal_code,
            };
            commands::checkout::checkout(&mut cart, &details, &config.pricing, clear)?;
        }
    }
    Ok(())
}
