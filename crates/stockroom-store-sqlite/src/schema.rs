//! SQL schema for the Stockroom SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    phone_number  TEXT NOT NULL,
    password_hash TEXT NOT NULL       -- argon2 PHC string
);

CREATE TABLE IF NOT EXISTS suppliers (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL,
    contact TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT    NOT NULL,
    sku               TEXT    NOT NULL UNIQUE,
    description       TEXT,
    price             REAL    NOT NULL CHECK (price > 0),
    quantity_in_stock INTEGER NOT NULL CHECK (quantity_in_stock >= 0),
    supplier_id       INTEGER REFERENCES suppliers(id) ON DELETE SET NULL
);

-- Sales and receipts are append-only.
-- receipt_id is filled in once the receipt row exists, in the same transaction.
CREATE TABLE IF NOT EXISTS sales (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id    INTEGER REFERENCES products(id) ON DELETE SET NULL,
    product_name  TEXT    NOT NULL,   -- snapshot at time of sale
    quantity_sold INTEGER NOT NULL CHECK (quantity_sold > 0),
    total_price   REAL    NOT NULL,
    sold_at       TEXT    NOT NULL,   -- RFC 3339 UTC
    receipt_id    INTEGER REFERENCES receipts(id)
);

CREATE TABLE IF NOT EXISTS receipts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    sale_id      INTEGER NOT NULL UNIQUE REFERENCES sales(id),
    total_amount REAL    NOT NULL,
    issued_at    TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS stock_summaries (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id         INTEGER NOT NULL UNIQUE
                       REFERENCES products(id) ON DELETE CASCADE,
    total_stock_value  REAL NOT NULL,
    total_sold_value   REAL NOT NULL,
    total_unsold_value REAL NOT NULL,
    updated_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS products_supplier_idx ON products(supplier_id);
CREATE INDEX IF NOT EXISTS sales_product_idx     ON sales(product_id);

PRAGMA user_version = 1;
";
