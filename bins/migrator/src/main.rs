//! Schema migration runner for the food-cost store.
//!
//! Usage:
//!   migrator up      - Apply all pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-apply migrations
//!
//! The target database is read from `DATABASE_URL`, e.g.
//! `sqlite://foodcost.db?mode=rwc`.

use foodcost_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migrator CLI installs its own subscriber.
    cli::run_cli(Migrator).await;
}
