//! Amberline CLI - verification, settlement, and code-minting tools.
//!
//! # Usage
//!
//! ```bash
//! # Verify an authenticity code (anonymous scan)
//! amberline verify NFC-ABCD-2345
//!
//! # Verify while signed in, crediting the award immediately
//! amberline verify NFC-ABCD-2345 --user u-7
//!
//! # Inspect or mutate the local cart
//! amberline cart show
//! amberline cart add p-12
//! amberline cart clear
//!
//! # Settle a confirmed order
//! amberline settle --user u-7 --product p-12 --points 40
//!
//! # Mint authenticity codes for a production run
//! amberline mint --count 20
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use amberline_core::ProductId;
use amberline_core::pricing::final_price;
use amberline_storefront::cart::Cart;
use amberline_storefront::checkout::{CheckoutComposer, format_currency};
use amberline_storefront::codes;
use amberline_storefront::config::StorefrontConfig;
use amberline_storefront::ledger::LedgerService;
use amberline_storefront::local::{JsonFileStore, LocalStore};
use amberline_storefront::playback::PlaybackTrigger;
use amberline_storefront::store::StoreClient;
use amberline_storefront::verify::Verifier;

#[derive(Parser)]
#[command(name = "amberline")]
#[command(author, version, about = "Amberline storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a product authenticity code
    Verify {
        /// The scanned or typed code
        code: String,

        /// User id to credit the award to (omit for an anonymous scan)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Inspect or mutate the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Settle a confirmed order against the points ledger
    Settle {
        /// User id the order belongs to
        #[arg(short, long)]
        user: String,

        /// Product id that was ordered
        #[arg(short, long)]
        product: String,

        /// Points to redeem against the order
        #[arg(long, default_value_t = 0)]
        points: u64,
    },
    /// Mint fresh authenticity codes
    Mint {
        /// How many codes to mint
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart lines, count, and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product id to add
        product: String,
    },
    /// Remove a line
    Remove {
        /// Product id to remove
        product: String,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amberline_storefront=info,amberline_cli=info".into()),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> amberline_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let client = StoreClient::new(config.store_url.clone());
    let local: Arc<dyn LocalStore> = Arc::new(JsonFileStore::new(&config.data_dir));

    match cli.command {
        Commands::Verify { code, user } => verify(&client, local, &code, user).await,
        Commands::Cart { action } => cart(&config, &client, local, action).await,
        Commands::Settle {
            user,
            product,
            points,
        } => settle(&client, &user, &product, points).await,
        Commands::Mint { count } => {
            for _ in 0..count {
                println!("{}", codes::mint_code());
            }
            Ok(())
        }
    }
}

async fn verify(
    client: &StoreClient,
    local: Arc<dyn LocalStore>,
    code: &str,
    user_id: Option<String>,
) -> amberline_storefront::Result<()> {
    if !codes::is_well_formed(code.trim()) {
        eprintln!("note: '{code}' does not look like a minted code (NFC-XXXX-XXXX)");
    }

    let signed_in = match user_id {
        Some(id) => Some(client.users().get_by_id(&id).await?),
        None => None,
    };

    let verifier = Verifier::new(client, local, Arc::new(PlaybackTrigger::default()));
    let result = verifier.verify(code, signed_in.as_ref()).await?;

    match (result.authentic, result.already_used) {
        (true, false) => {
            let name = result.product.as_ref().map_or("?", |p| p.name.as_str());
            println!("AUTHENTIC: {name}");
            if let Some(user) = result.updated_user {
                println!("points credited, new balance: {}", user.available_points);
            } else {
                println!("award recorded; sign in to claim it");
            }
        }
        (true, true) => {
            let name = result.product.as_ref().map_or("?", |p| p.name.as_str());
            println!("AUTHENTIC but already used: {name}");
        }
        _ => println!("NOT FOUND: this code matches no product"),
    }
    Ok(())
}

async fn cart(
    config: &StorefrontConfig,
    client: &StoreClient,
    local: Arc<dyn LocalStore>,
    action: CartAction,
) -> amberline_storefront::Result<()> {
    let mut cart = Cart::load(local);
    match action {
        CartAction::Show => {
            for line in cart.lines() {
                println!(
                    "{}x {} @ {}",
                    line.quantity,
                    line.name,
                    format_currency(final_price(line.price, line.discount_percent))
                );
            }
            println!("items: {}", cart.count());
            println!("total: {}", format_currency(cart.total()));
            let order = CheckoutComposer::new(config.whatsapp_phone.clone()).cart_order(&cart, 0);
            println!("order link: {}", order.link);
        }
        CartAction::Add { product } => {
            let product = client.products().get_by_id(&product).await?;
            cart.add(&product);
            println!("added {}, cart now has {} item(s)", product.name, cart.count());
        }
        CartAction::Remove { product } => {
            cart.remove(&ProductId::new(product));
            println!("cart now has {} item(s)", cart.count());
        }
        CartAction::Clear => {
            cart.clear();
            println!("cart cleared");
        }
    }
    Ok(())
}

async fn settle(
    client: &StoreClient,
    user_id: &str,
    product_id: &str,
    points: u64,
) -> amberline_storefront::Result<()> {
    let user = client.users().get_by_id(user_id).await?;
    let product = client.products().get_by_id(product_id).await?;
    let payable = final_price(product.price, product.discount_percent);

    let ledger = LedgerService::new(client);
    let updated = ledger
        .settle_purchase(&user, &product, payable, points)
        .await?;

    println!(
        "settled {} for {}: available points {} -> {}",
        product.name, user.name, user.available_points, updated.available_points
    );
    Ok(())
}
