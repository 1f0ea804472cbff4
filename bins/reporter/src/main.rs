//! Monthly food-cost reports.
//!
//! Reads the embedded store named in configuration and prints the item,
//! category, or revenue-group report of one month as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use foodcost_core::aggregation::{CategoryCostRollup, CostReport, ItemCostRollup, RevenueGroupRollup};
use foodcost_db::{ReportRepository, connect_with};
use foodcost_shared::config::LoggingConfig;
use foodcost_shared::types::{CategoryId, MonthKey};
use foodcost_shared::{AppConfig, AppError};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "foodcost-report", version, about = "Monthly food-cost reports")]
struct Cli {
    /// Overrides `database.url` from configuration.
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Item and category cost rollups.
    ItemReport {
        /// Report month as `YYYY-MM`.
        #[arg(long)]
        month: MonthKey,
        /// Only items of this category.
        #[arg(long)]
        category: Option<CategoryId>,
    },
    /// Revenue-group cost and expense percentages.
    GroupReport {
        /// Report month as `YYYY-MM`.
        #[arg(long)]
        month: MonthKey,
    },
}

#[derive(Serialize)]
struct ItemReport {
    month: MonthKey,
    items: Vec<ItemCostRollup>,
    categories: Vec<CategoryCostRollup>,
}

#[derive(Serialize)]
struct GroupReport {
    month: MonthKey,
    revenue_groups: Vec<RevenueGroupRollup>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    // Reports go to stdout; logs stay on stderr.
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn item_report(report: CostReport, category: Option<CategoryId>) -> ItemReport {
    let keep = |id: CategoryId| category.is_none_or(|wanted| wanted == id);
    ItemReport {
        month: report.month,
        items: report
            .items
            .into_iter()
            .filter(|item| keep(item.category_id))
            .collect(),
        categories: report
            .categories
            .into_iter()
            .filter(|c| keep(c.category_id))
            .collect(),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    let db = connect_with(&config.database)
        .await
        .context("Failed to open the food-cost store")?;
    info!("Connected to database");

    let reports = ReportRepository::new(db);
    let dp = config.report.decimal_places;
    match cli.command {
        Command::ItemReport { month, category } => {
            let report = reports
                .cost_report(month)
                .await
                .map_err(AppError::from)?
                .round_money(dp);
            print_json(&item_report(report, category), cli.pretty)
        }
        Command::GroupReport { month } => {
            let report = reports
                .cost_report(month)
                .await
                .map_err(AppError::from)?
                .round_money(dp);
            print_json(
                &GroupReport {
                    month: report.month,
                    revenue_groups: report.revenue_groups,
                },
                cli.pretty,
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    if let Err(err) = run(cli, config).await {
        error!(error = %err, "Report failed");
        let code = err
            .downcast_ref::<AppError>()
            .map_or(1, AppError::exit_code);
        eprintln!("error: {err:#}");
        std::process::exit(code);
    }
    Ok(())
}
