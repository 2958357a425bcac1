//! `J_VAPES` CLI - Run the storefront from a terminal.
//!
//! Each invocation is one storefront session: the catalog is fetched, the
//! saved cart and age confirmation are restored from the storage directory,
//! one action runs, and the resulting view is printed.
//!
//! # Usage
//!
//! ```bash
//! # Confirm age (required once before browsing)
//! jvapes age confirm
//!
//! # Browse with filters, optionally exporting the page as HTML
//! jvapes browse --search mango --price sale
//! jvapes browse --brand "Elf Bar" --html page.html
//!
//! # Manage the cart
//! jvapes cart add <product-id> --flavor "Mango Ice"
//! jvapes cart adjust <product-id> --flavor "Mango Ice" --by -1
//! jvapes cart show
//!
//! # Get the WhatsApp checkout link
//! jvapes checkout
//! ```
//!
//! # Commands
//!
//! - `browse` - Show the product grid
//! - `cart` - Show or change the cart
//! - `checkout` - Print the order message and checkout link
//! - `age` - Confirm, decline, or check age verification

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jvapes_storefront::config::StorefrontConfig;
use jvapes_storefront::filter::PriceBucket;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "jvapes")]
#[command(author, version, about = "J_VAPES storefront from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the product grid
    Browse {
        /// Search name, brand, and flavors
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact brand, or "all"
        #[arg(short, long, default_value = "all")]
        brand: String,

        /// Exact puff count, or "all"
        #[arg(short, long, default_value = "all")]
        puffs: String,

        /// Price band: all, low, mid, high, sale
        #[arg(long, default_value = "all")]
        price: PriceBucket,

        /// Also write the rendered page to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Print the order message and checkout link
    Checkout,
    /// Age verification
    Age {
        #[command(subcommand)]
        action: AgeAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: String,

        /// Flavor (defaults to the product's first flavor)
        #[arg(short, long)]
        flavor: Option<String>,
    },
    /// Remove a line whatever its quantity
    Remove {
        /// Product ID
        product_id: String,

        /// Flavor of the line ("Default" for single-flavor products)
        #[arg(short, long)]
        flavor: Option<String>,
    },
    /// Change a line's quantity
    Adjust {
        /// Product ID
        product_id: String,

        /// Flavor of the line ("Default" for single-flavor products)
        #[arg(short, long)]
        flavor: Option<String>,

        /// Quantity change, e.g. 2 or -1
        #[arg(long, allow_hyphen_values = true)]
        by: i64,
    },
    /// Remove everything
    Clear,
}

#[derive(Subcommand)]
enum AgeAction {
    /// Confirm you are of legal age
    Confirm,
    /// Decline
    Decline,
    /// Show whether age is confirmed
    Status,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// Log to stderr so stdout only carries command output.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jvapes_storefront=info,jvapes_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry before the subscriber so the layer sees the client
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), commands::CommandError> {
    let mut session = commands::open_session(config).await?;

    if session.age_gate_required() && !matches!(cli.command, Commands::Age { .. }) {
        console::print(console::AGE_GATE_NOTICE);
        return Ok(());
    }

    match cli.command {
        Commands::Browse {
            search,
            brand,
            puffs,
            price,
            html,
        } => {
            let filter = commands::browse::filter_spec(search, &brand, &puffs, price);
            commands::browse::run(&mut session, filter, html.as_deref()).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&session),
            CartAction::Add { product_id, flavor } => {
                commands::cart::add(&mut session, &product_id, flavor.as_deref()).await;
            }
            CartAction::Remove { product_id, flavor } => {
                commands::cart::remove(&mut session, &product_id, flavor.as_deref()).await;
            }
            CartAction::Adjust {
                product_id,
                flavor,
                by,
            } => {
                commands::cart::adjust(&mut session, &product_id, flavor.as_deref(), by).await;
            }
            CartAction::Clear => commands::cart::clear(&mut session).await,
        },
        Commands::Checkout => commands::checkout::run(&session),
        Commands::Age { action } => match action {
            AgeAction::Confirm => commands::age::confirm(&mut session).await,
            AgeAction::Decline => commands::age::decline(&mut session),
            AgeAction::Status => commands::age::status(&session),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_adjust_with_negative_delta() {
        let cli = Cli::try_parse_from([
            "jvapes", "cart", "adjust", "abc", "--flavor", "Mint", "--by", "-2",
        ])
        .map_err(|e| e.to_string());
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Adjust { by: -2, .. }
            })
        ));
    }

    #[test]
    fn test_parse_browse_price_bucket() {
        let cli = Cli::try_parse_from(["jvapes", "browse", "--price", "sale"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Browse {
                price: PriceBucket::Sale,
                ..
            })
        ));

        assert!(Cli::try_parse_from(["jvapes", "browse", "--price", "cheap"]).is_err());
    }
}
