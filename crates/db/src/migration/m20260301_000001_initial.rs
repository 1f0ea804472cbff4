//! Initial schema: catalog, ledger, revenue, and expense tables.
//!
//! Cost, quantity, amount and rate columns hold canonical decimal text so
//! stored values never pass through a double.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CATALOG_SQL).await?;
        db.execute_unprepared(LEDGER_SQL).await?;
        db.execute_unprepared(REVENUE_SQL).await?;
        db.execute_unprepared(EXPENSE_SQL).await?;
        db.execute_unprepared(SEED_OPERATIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const CATALOG_SQL: &str = r"
CREATE TABLE taxes (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    rate_percentage TEXT NOT NULL DEFAULT '0'
        CHECK (CAST(rate_percentage AS NUMERIC) >= 0)
);

CREATE TABLE vendors (
    id BLOB PRIMARY KEY NOT NULL,
    vendor_display_name TEXT NOT NULL
);

CREATE TABLE categories (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE items (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    uom_abbrev TEXT NOT NULL,
    uom_abbrev_per_piece TEXT,
    qty_per_piece TEXT,
    unit_cost TEXT NOT NULL DEFAULT '0',
    tax_id BLOB REFERENCES taxes(id) ON DELETE SET NULL,
    category_id BLOB NOT NULL REFERENCES categories(id),
    preferred_vendor_id BLOB REFERENCES vendors(id) ON DELETE SET NULL,
    low_stock_level TEXT NOT NULL DEFAULT '0',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_items_category ON items(category_id);
";

const LEDGER_SQL: &str = r"
CREATE TABLE inventory_operations (
    id INTEGER PRIMARY KEY NOT NULL,
    operation_type TEXT NOT NULL CHECK (operation_type IN ('add_stock', 'remove_stock')),
    name TEXT NOT NULL,
    display_order INTEGER NOT NULL
);

CREATE TABLE inventory_logs (
    id BLOB PRIMARY KEY NOT NULL,
    item_id BLOB NOT NULL REFERENCES items(id),
    operation_id INTEGER NOT NULL REFERENCES inventory_operations(id),
    adjustment_qty TEXT NOT NULL CHECK (CAST(adjustment_qty AS NUMERIC) > 0),
    adjustment_unit_cost TEXT NOT NULL,
    adjustment_total_cost TEXT NOT NULL,
    ref_tax_id BLOB REFERENCES taxes(id) ON DELETE SET NULL,
    ref_vendor_id BLOB REFERENCES vendors(id) ON DELETE SET NULL,
    adjustment_tax_name TEXT,
    adjustment_tax_rate_percentage TEXT,
    vendor_display_name TEXT,
    adjustment_date TEXT NOT NULL,
    adjustment_year INTEGER NOT NULL,
    adjustment_month INTEGER NOT NULL CHECK (adjustment_month BETWEEN 1 AND 12),
    remarks TEXT,
    official_receipt_number TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX idx_inventory_logs_item_month
    ON inventory_logs(item_id, adjustment_year, adjustment_month);
";

const REVENUE_SQL: &str = r"
CREATE TABLE revenue_groups (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE revenue_categories (
    revenue_group_id BLOB NOT NULL REFERENCES revenue_groups(id) ON DELETE CASCADE,
    category_id BLOB NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (revenue_group_id, category_id)
);

CREATE TABLE revenues (
    id BLOB PRIMARY KEY NOT NULL,
    revenue_group_id BLOB NOT NULL REFERENCES revenue_groups(id) ON DELETE CASCADE,
    revenue_year INTEGER NOT NULL,
    revenue_month INTEGER NOT NULL CHECK (revenue_month BETWEEN 1 AND 12),
    amount TEXT NOT NULL DEFAULT '0',
    UNIQUE (revenue_group_id, revenue_year, revenue_month)
);
";

const EXPENSE_SQL: &str = r"
CREATE TABLE expense_groups (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE expenses (
    id BLOB PRIMARY KEY NOT NULL,
    expense_group_id BLOB NOT NULL REFERENCES expense_groups(id),
    expense_year INTEGER NOT NULL,
    expense_month INTEGER NOT NULL CHECK (expense_month BETWEEN 1 AND 12),
    name TEXT NOT NULL,
    amount TEXT NOT NULL DEFAULT '0'
);

CREATE INDEX idx_expenses_group_month
    ON expenses(expense_group_id, expense_year, expense_month);

CREATE TABLE monthly_expenses (
    id BLOB PRIMARY KEY NOT NULL,
    expense_group_id BLOB NOT NULL REFERENCES expense_groups(id),
    name TEXT NOT NULL
);

CREATE TABLE monthly_expense_entries (
    id BLOB PRIMARY KEY NOT NULL,
    monthly_expense_id BLOB NOT NULL REFERENCES monthly_expenses(id) ON DELETE CASCADE,
    entry_year INTEGER NOT NULL,
    entry_month INTEGER NOT NULL CHECK (entry_month BETWEEN 1 AND 12),
    amount TEXT NOT NULL DEFAULT '0',
    UNIQUE (monthly_expense_id, entry_year, entry_month)
);

CREATE TABLE revenue_deductions (
    id BLOB PRIMARY KEY NOT NULL,
    revenue_group_id BLOB NOT NULL REFERENCES revenue_groups(id),
    expense_id BLOB REFERENCES expenses(id) ON DELETE CASCADE,
    monthly_expense_id BLOB REFERENCES monthly_expenses(id) ON DELETE CASCADE,
    CHECK ((expense_id IS NULL) <> (monthly_expense_id IS NULL))
);

CREATE INDEX idx_revenue_deductions_expense ON revenue_deductions(expense_id);
CREATE INDEX idx_revenue_deductions_monthly ON revenue_deductions(monthly_expense_id);
";

const SEED_OPERATIONS_SQL: &str = r"
INSERT INTO inventory_operations (id, operation_type, name, display_order) VALUES
    (1, 'add_stock', 'Purchase', 1),
    (2, 'add_stock', 'Initial Stock', 2),
    (3, 'add_stock', 'Transfer In', 3),
    (4, 'remove_stock', 'Stock Usage', 4),
    (5, 'remove_stock', 'Spoilage', 5),
    (6, 'remove_stock', 'Transfer Out', 6);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS revenue_deductions;
DROP TABLE IF EXISTS monthly_expense_entries;
DROP TABLE IF EXISTS monthly_expenses;
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS expense_groups;
DROP TABLE IF EXISTS revenues;
DROP TABLE IF EXISTS revenue_categories;
DROP TABLE IF EXISTS revenue_groups;
DROP TABLE IF EXISTS inventory_logs;
DROP TABLE IF EXISTS inventory_operations;
DROP TABLE IF EXISTS items;
DROP TABLE IF EXISTS categories;
DROP TABLE IF EXISTS vendors;
DROP TABLE IF EXISTS taxes;
";
