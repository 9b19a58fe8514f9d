//! Warehouse Retail Management CLI
//!
//! # Usage
//!
//! ```bash
//! # Check credentials and show the account's capabilities
//! wrm-cli login
//!
//! # FEFO batches of a product in a warehouse
//! wrm-cli fefo --product SP001 --warehouse K01 --quantity 30
//!
//! # Resolve a barcode as the export screen would
//! wrm-cli scan --barcode 8930001 --warehouse K01 --mode export
//!
//! # Export the inventory of a warehouse
//! wrm-cli snapshot --warehouse K01 --csv k01.csv
//!
//! # Batches expiring in the next two weeks
//! wrm-cli expiry --days 14 --csv expiry.csv
//!
//! # Daily sales for June
//! wrm-cli sales --from 2025-06-01 --to 2025-06-30
//! ```
//!
//! Credentials come from the `auth` configuration section, usually set with
//! `WRM__AUTH__USERNAME` and `WRM__AUTH__PASSWORD`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use chrono::NaiveDate;
use shared::{capability_tags, ExpiryFilter, ExpiryQuery, ExpiryStatus, ScanMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warehouse_retail_client::{
    services::{
        reporting, AdjustmentDesk, BatchLookup, BatchResolver, OrderDesk, ReportDesk,
        ScanResolver,
    },
    ApiClient, Config, Credentials, Session,
};

#[derive(Parser)]
#[command(name = "wrm-cli")]
#[command(author, version, about = "Warehouse Retail Management operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and show the account's capabilities
    Login,
    /// List warehouses
    Warehouses,
    /// Show FEFO batches of a product in a warehouse
    Fefo {
        #[arg(short, long)]
        product: String,

        #[arg(short, long)]
        warehouse: String,

        /// Quantity the backend should split across batches
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Resolve a barcode
    Scan {
        #[arg(short, long)]
        barcode: String,

        /// Required for the export and transfer modes
        #[arg(short, long)]
        warehouse: Option<String>,

        /// `sale`, `export` or `transfer`
        #[arg(short, long, default_value = "sale")]
        mode: ScanMode,
    },
    /// Show or export adjustment history
    Adjustments {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show or export the inventory of a warehouse
    Snapshot {
        #[arg(short, long)]
        warehouse: String,

        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show or export batches that are expired or expiring soon
    Expiry {
        /// Look-ahead window in days
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        #[arg(short, long)]
        warehouse: Option<String>,

        /// Only expired batches
        #[arg(long)]
        expired_only: bool,

        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show or export daily sales for a date range
    Sales {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,

        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show the receipts that touched a batch
    BatchHistory {
        #[arg(short, long)]
        product: String,

        #[arg(short, long)]
        batch: String,
    },
    /// List supplier orders
    Orders,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::load().context("loading configuration")?;

    // Initialize tracing
    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::debug!("Environment: {}", config.environment);

    let cli = Cli::parse();
    let api = ApiClient::new(&config.api)?;

    if let Err(e) = run(cli, &config, &api).await {
        tracing::error!("Command failed: {e:#}");
        return Err(e);
    }
    Ok(())
}

async fn login(config: &Config, api: &ApiClient) -> anyhow::Result<Session> {
    let auth = config
        .auth
        .as_ref()
        .context("no credentials configured; set WRM__AUTH__USERNAME and WRM__AUTH__PASSWORD")?;
    let password: SecretString = auth
        .password
        .clone()
        .context("no password configured; set WRM__AUTH__PASSWORD")?;
    let credentials = Credentials {
        username: auth.username.trim().to_string(),
        password,
        account_type: auth.account_type.clone(),
    };
    Ok(api.auth().login(&credentials).await?)
}

async fn run(cli: Cli, config: &Config, api: &ApiClient) -> anyhow::Result<()> {
    let session = login(config, api).await?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Login => {
            let account = session.account();
            println!("{} ({}) - {}", account.name, account.account_id, account.kind);
            println!("capabilities: {}", capability_tags(account.kind).join(", "));
            if let Some(exp) = session.expires_at() {
                println!("token expires: {}", exp);
            }
        }
        Commands::Warehouses => {
            for w in api.warehouse().warehouses(&session).await? {
                println!(
                    "{}\t{}\t{}",
                    w.warehouse_id,
                    w.kind,
                    w.address.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Fefo {
            product,
            warehouse,
            quantity,
        } => {
            let resolver = BatchResolver::new(api.clone());
            let fefo = resolver
                .for_movement(&session, &product, &warehouse, quantity)
                .await?;
            match &fefo.lookup {
                BatchLookup::NoBatches => println!("No batches available"),
                BatchLookup::Available(batches) => {
                    let preferred = fefo.lookup.preferred(today).map(|b| b.batch_id.as_str());
                    for b in batches {
                        let status = match b.expiry_status(today) {
                            ExpiryStatus::Expired => "expired",
                            ExpiryStatus::ExpiringSoon => "expiring soon",
                            ExpiryStatus::Good => "good",
                            ExpiryStatus::Unknown => "no expiry",
                        };
                        println!(
                            "{}{}\t{}\t{}\tstock {}\tsuggested {}",
                            if preferred == Some(b.batch_id.as_str()) { "*" } else { " " },
                            b.batch_id,
                            b.expiry_date.map(|d| d.to_string()).unwrap_or_default(),
                            status,
                            b.available_stock,
                            b.suggested_quantity.unwrap_or(0),
                        );
                    }
                    if !fefo.can_fulfill {
                        println!("short by {}", fefo.shortage);
                    }
                }
            }
        }
        Commands::Scan {
            barcode,
            warehouse,
            mode,
        } => {
            let resolver = ScanResolver::new(api.clone(), &config.scan);
            let outcome = resolver
                .resolve(&session, mode, &barcode, warehouse.as_deref(), None)
                .await?;
            let hit = &outcome.hit;
            println!(
                "{} / {} (stock {}) in {} ms{}",
                hit.product
                    .as_ref()
                    .map(|p| p.name.as_str())
                    .unwrap_or(hit.product_id()),
                hit.batch.batch_id,
                hit.batch.available_stock,
                outcome.elapsed.as_millis(),
                if outcome.over_budget { " (over budget)" } else { "" }
            );
            for warning in &hit.warnings {
                println!("warning: {}", warning);
            }
        }
        Commands::Adjustments { csv } => {
            let desk = AdjustmentDesk::new(api.clone());
            let rows = reporting::adjustment_rows(&desk.history(&session).await?);
            match csv {
                Some(path) => reporting::write_csv(&path, &rows)?,
                None => print!("{}", reporting::export_to_csv(&rows)?),
            }
        }
        Commands::Snapshot { warehouse, csv } => {
            let snapshot = api.warehouse().inventory(&session, &warehouse).await?;
            let rows = reporting::inventory_rows(&snapshot, today);
            match csv {
                Some(path) => reporting::write_csv(&path, &rows)?,
                None => print!("{}", reporting::export_to_csv(&rows)?),
            }
        }
        Commands::Expiry {
            days,
            warehouse,
            expired_only,
            csv,
        } => {
            let query = ExpiryQuery {
                days,
                warehouse_id: warehouse,
                status: if expired_only {
                    ExpiryFilter::Expired
                } else {
                    ExpiryFilter::All
                },
            };
            let report = ReportDesk::new(api.clone()).expiry(&session, &query).await?;
            let rows = reporting::expiry_rows(&report);
            match csv {
                Some(path) => reporting::write_csv(&path, &rows)?,
                None => print!("{}", reporting::export_to_csv(&rows)?),
            }
        }
        Commands::Sales { from, to, csv } => {
            let report = ReportDesk::new(api.clone()).sales(&session, from, to).await?;
            let rows = reporting::sales_rows(&report);
            match csv {
                Some(path) => reporting::write_csv(&path, &rows)?,
                None => {
                    print!("{}", reporting::export_to_csv(&rows)?);
                    println!(
                        "total {} from {} invoices",
                        report.summary.total_revenue, report.summary.total_invoices
                    );
                }
            }
        }
        Commands::BatchHistory { product, batch } => {
            let history = ReportDesk::new(api.clone())
                .batch_history(&session, &product, &batch)
                .await?;
            for movement in history.timeline() {
                println!(
                    "{}\t{:?}\t{}\t{}\t{}",
                    movement.date,
                    movement.kind,
                    movement.document_code,
                    movement.warehouse_id.as_deref().unwrap_or(""),
                    movement.quantity
                );
            }
            println!("on hand: {}", history.batch_info.quantity);
        }
        Commands::Orders => {
            for order in OrderDesk::new(api.clone()).orders(&session).await? {
                println!(
                    "{}\t{}\t{}\t{} units",
                    order.order_code, order.supplier, order.status, order.total_quantity
                );
            }
        }
    }

    api.auth().logout(session).await;
    Ok(())
}
