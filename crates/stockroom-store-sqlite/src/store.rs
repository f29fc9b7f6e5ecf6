//! [`SqliteStore`]: the SQLite implementation of [`InventoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};
use stockroom_core::{
  Error as DomainError,
  product::{NewProduct, Product, ProductPatch},
  sale::{NewSale, Receipt, RecordedSale, Sale, sale_total},
  stock::{StockSummary, StockTotals},
  store::InventoryStore,
  supplier::{NewSupplier, Supplier, SupplierPatch},
  user::{NewUser, User},
  validation::validate_sale_quantity,
};
use tracing::debug;

use crate::{
  Result,
  encode::{
    PRODUCT_COLUMNS, RECEIPT_COLUMNS, RawReceipt, RawSale, RawSummary,
    SALE_COLUMNS, SUMMARY_COLUMNS, SUPPLIER_COLUMNS, USER_COLUMNS, encode_dt,
    product_from_row, supplier_from_row, user_from_row,
  },
  schema::SCHEMA,
};

/// Outcome of a closure run on the connection thread: the outer layer is the
/// database result, the inner layer a domain rejection.
type Checked<T> = std::result::Result<T, DomainError>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An inventory store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every
/// operation runs on the connection's own thread, one at a time.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete one row by id, reporting whether it existed.
  async fn delete_by_id(&self, table: &'static str, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?)
      })
      .await?;
    Ok(deleted > 0)
  }
}

// ─── Connection-thread helpers ───────────────────────────────────────────────

fn row_exists(
  conn: &Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<bool> {
  Ok(conn.query_row(sql, params, |_| Ok(())).optional()?.is_some())
}

fn supplier_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
  row_exists(conn, "SELECT 1 FROM suppliers WHERE id = ?1", [id])
}

fn sku_taken(
  conn: &Connection,
  sku: &str,
  except_id: Option<i64>,
) -> rusqlite::Result<bool> {
  row_exists(
    conn,
    "SELECT 1 FROM products WHERE sku = ?1 AND id IS NOT ?2",
    rusqlite::params![sku, except_id],
  )
}

fn select_product(conn: &Connection, id: i64) -> rusqlite::Result<Option<Product>> {
  conn
    .query_row(
      &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
      [id],
      product_from_row,
    )
    .optional()
}

fn select_supplier(conn: &Connection, id: i64) -> rusqlite::Result<Option<Supplier>> {
  conn
    .query_row(
      &format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1"),
      [id],
      supplier_from_row,
    )
    .optional()
}

fn check_user_unique(
  conn: &Connection,
  name: &str,
  email: &str,
) -> rusqlite::Result<Checked<()>> {
  if row_exists(conn, "SELECT 1 FROM users WHERE name = ?1", [name])? {
    return Ok(Err(DomainError::DuplicateName(name.to_owned())));
  }
  if row_exists(conn, "SELECT 1 FROM users WHERE email = ?1", [email])? {
    return Ok(Err(DomainError::DuplicateEmail(email.to_owned())));
  }
  Ok(Ok(()))
}

/// Check the catalogue constraints a product row must satisfy before it is
/// written.
fn check_product_refs(
  conn: &Connection,
  sku: &str,
  supplier_id: Option<i64>,
  except_id: Option<i64>,
) -> rusqlite::Result<Checked<()>> {
  if sku_taken(conn, sku, except_id)? {
    return Ok(Err(DomainError::DuplicateSku(sku.to_owned())));
  }
  if let Some(sid) = supplier_id
    && !supplier_exists(conn, sid)?
  {
    return Ok(Err(DomainError::SupplierNotFound(sid)));
  }
  Ok(Ok(()))
}

/// The body of [`InventoryStore::record_sale`], run inside a single
/// `IMMEDIATE` transaction. Returning before `commit` rolls everything back.
fn record_sale_tx(
  conn: &mut Connection,
  input: NewSale,
) -> rusqlite::Result<Checked<RecordedSale>> {
  let NewSale { product_id, quantity_sold } = input;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let Some(product) = select_product(&tx, product_id)? else {
    return Ok(Err(DomainError::ProductNotFound(product_id)));
  };
  if quantity_sold > product.quantity_in_stock {
    return Ok(Err(DomainError::InsufficientStock {
      product_id,
      requested: quantity_sold,
      available: product.quantity_in_stock,
    }));
  }

  let now = Utc::now();
  let now_str = encode_dt(now);
  let total_price = sale_total(product.price, quantity_sold);

  tx.execute(
    "INSERT INTO sales (product_id, product_name, quantity_sold, total_price, sold_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![product_id, product.name, quantity_sold, total_price, now_str],
  )?;
  let sale_id = tx.last_insert_rowid();

  // Conditional decrement: never takes stock below zero, whatever was read
  // above.
  let decremented = tx.execute(
    "UPDATE products
        SET quantity_in_stock = quantity_in_stock - ?1
      WHERE id = ?2 AND quantity_in_stock >= ?1",
    rusqlite::params![quantity_sold, product_id],
  )?;
  if decremented == 0 {
    return Ok(Err(DomainError::InsufficientStock {
      product_id,
      requested: quantity_sold,
      available: product.quantity_in_stock,
    }));
  }
  let remaining = product.quantity_in_stock - quantity_sold;

  tx.execute(
    "INSERT INTO receipts (sale_id, total_amount, issued_at) VALUES (?1, ?2, ?3)",
    rusqlite::params![sale_id, total_price, now_str],
  )?;
  let receipt_id = tx.last_insert_rowid();
  tx.execute(
    "UPDATE sales SET receipt_id = ?1 WHERE id = ?2",
    rusqlite::params![receipt_id, sale_id],
  )?;

  let existing: Option<(i64, StockTotals)> = tx
    .query_row(
      "SELECT id, total_stock_value, total_sold_value, total_unsold_value
         FROM stock_summaries WHERE product_id = ?1",
      [product_id],
      |row| {
        Ok((row.get(0)?, StockTotals {
          total_stock_value:  row.get(1)?,
          total_sold_value:   row.get(2)?,
          total_unsold_value: row.get(3)?,
        }))
      },
    )
    .optional()?;

  let totals = StockTotals::after_sale(
    existing.map(|(_, t)| t),
    total_price,
    product.price,
    remaining,
  );

  let summary_id = match existing {
    Some((id, _)) => {
      tx.execute(
        "UPDATE stock_summaries
            SET total_stock_value = ?1, total_sold_value = ?2,
                total_unsold_value = ?3, updated_at = ?4
          WHERE id = ?5",
        rusqlite::params![
          totals.total_stock_value,
          totals.total_sold_value,
          totals.total_unsold_value,
          now_str,
          id,
        ],
      )?;
      id
    }
    None => {
      tx.execute(
        "INSERT INTO stock_summaries (
           product_id, total_stock_value, total_sold_value,
           total_unsold_value, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
          product_id,
          totals.total_stock_value,
          totals.total_sold_value,
          totals.total_unsold_value,
          now_str,
        ],
      )?;
      tx.last_insert_rowid()
    }
  };

  tx.commit()?;

  Ok(Ok(RecordedSale {
    sale:    Sale {
      id: sale_id,
      product_id: Some(product_id),
      product_name: product.name,
      quantity_sold,
      total_price,
      sold_at: now,
      receipt_id: Some(receipt_id),
    },
    receipt: Receipt {
      id:           receipt_id,
      sale_id,
      total_amount: total_price,
      issued_at:    now,
    },
    summary: StockSummary {
      id: summary_id,
      product_id,
      totals,
      updated_at: now,
    },
  }))
}

// ─── InventoryStore impl ─────────────────────────────────────────────────────

impl InventoryStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = self
      .conn
      .call(move |conn| {
        if let Err(e) = check_user_unique(conn, &input.name, &input.email)? {
          return Ok(Err(e));
        }

        conn.execute(
          "INSERT INTO users (name, email, phone_number, password_hash)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            input.name,
            input.email,
            input.phone_number,
            input.password_hash,
          ],
        )?;

        Ok(Ok(User {
          id:            conn.last_insert_rowid(),
          name:          input.name,
          email:         input.email,
          phone_number:  input.phone_number,
          password_hash: input.password_hash,
        }))
      })
      .await??;

    debug!(user_id = user.id, "created user");
    Ok(user)
  }

  async fn ensure_user_unique(&self, name: String, email: String) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(check_user_unique(conn, &name, &email)?))
      .await??;
    Ok(())
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>> {
    let user = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              [email],
              user_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(user)
  }

  // ── Suppliers ─────────────────────────────────────────────────────────────

  async fn create_supplier(&self, input: NewSupplier) -> Result<Supplier> {
    let supplier = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO suppliers (name, contact) VALUES (?1, ?2)",
          rusqlite::params![input.name, input.contact],
        )?;
        Ok(Supplier {
          id:      conn.last_insert_rowid(),
          name:    input.name,
          contact: input.contact,
        })
      })
      .await?;

    debug!(supplier_id = supplier.id, "created supplier");
    Ok(supplier)
  }

  async fn get_supplier(&self, id: i64) -> Result<Option<Supplier>> {
    Ok(self.conn.call(move |conn| Ok(select_supplier(conn, id)?)).await?)
  }

  async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
    let suppliers = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY id"))?;
        let rows = stmt
          .query_map([], supplier_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(suppliers)
  }

  async fn update_supplier(&self, id: i64, patch: SupplierPatch) -> Result<Supplier> {
    patch.validate()?;

    let supplier = self
      .conn
      .call(move |conn| {
        let Some(mut supplier) = select_supplier(conn, id)? else {
          return Ok(Err(DomainError::SupplierNotFound(id)));
        };
        patch.apply_to(&mut supplier);

        conn.execute(
          "UPDATE suppliers SET name = ?1, contact = ?2 WHERE id = ?3",
          rusqlite::params![supplier.name, supplier.contact, id],
        )?;
        Ok(Ok(supplier))
      })
      .await??;

    debug!(supplier_id = id, "updated supplier");
    Ok(supplier)
  }

  async fn delete_supplier(&self, id: i64) -> Result<()> {
    if !self.delete_by_id("suppliers", id).await? {
      return Err(DomainError::SupplierNotFound(id).into());
    }
    debug!(supplier_id = id, "deleted supplier");
    Ok(())
  }

  // ── Products ──────────────────────────────────────────────────────────────

  async fn create_product(&self, input: NewProduct) -> Result<Product> {
    input.validate()?;

    let product = self
      .conn
      .call(move |conn| {
        if let Err(e) = check_product_refs(conn, &input.sku, input.supplier_id, None)? {
          return Ok(Err(e));
        }

        conn.execute(
          "INSERT INTO products (
             name, sku, description, price, quantity_in_stock, supplier_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.name,
            input.sku,
            input.description,
            input.price,
            input.quantity_in_stock,
            input.supplier_id,
          ],
        )?;

        Ok(Ok(Product {
          id:                conn.last_insert_rowid(),
          name:              input.name,
          sku:               input.sku,
          description:       input.description,
          price:             input.price,
          quantity_in_stock: input.quantity_in_stock,
          supplier_id:       input.supplier_id,
        }))
      })
      .await??;

    debug!(product_id = product.id, sku = %product.sku, "created product");
    Ok(product)
  }

  async fn get_product(&self, id: i64) -> Result<Option<Product>> {
    Ok(self.conn.call(move |conn| Ok(select_product(conn, id)?)).await?)
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    let products = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))?;
        let rows = stmt
          .query_map([], product_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(products)
  }

  async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product> {
    patch.validate()?;

    let product = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(mut product) = select_product(&tx, id)? else {
          return Ok(Err(DomainError::ProductNotFound(id)));
        };
        patch.apply_to(&mut product);

        if let Err(e) = check_product_refs(&tx, &product.sku, product.supplier_id, Some(id))? {
          return Ok(Err(e));
        }

        tx.execute(
          "UPDATE products
              SET name = ?1, sku = ?2, description = ?3, price = ?4,
                  quantity_in_stock = ?5, supplier_id = ?6
            WHERE id = ?7",
          rusqlite::params![
            product.name,
            product.sku,
            product.description,
            product.price,
            product.quantity_in_stock,
            product.supplier_id,
            id,
          ],
        )?;
        tx.commit()?;
        Ok(Ok(product))
      })
      .await??;

    debug!(product_id = id, "updated product");
    Ok(product)
  }

  async fn delete_product(&self, id: i64) -> Result<()> {
    if !self.delete_by_id("products", id).await? {
      return Err(DomainError::ProductNotFound(id).into());
    }
    debug!(product_id = id, "deleted product");
    Ok(())
  }

  // ── Sales ─────────────────────────────────────────────────────────────────

  async fn record_sale(&self, input: NewSale) -> Result<RecordedSale> {
    validate_sale_quantity(input.quantity_sold)?;

    let recorded = self
      .conn
      .call(move |conn| Ok(record_sale_tx(conn, input)?))
      .await??;

    debug!(
      sale_id = recorded.sale.id,
      receipt_id = recorded.receipt.id,
      product_id = input.product_id,
      "recorded sale"
    );
    Ok(recorded)
  }

  async fn get_sale(&self, id: i64) -> Result<Option<Sale>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"),
              [id],
              RawSale::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSale::into_sale).transpose()
  }

  async fn list_sales(&self) -> Result<Vec<Sale>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawSale::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSale::into_sale).collect()
  }

  async fn get_receipt(&self, id: i64) -> Result<Option<Receipt>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RECEIPT_COLUMNS} FROM receipts WHERE id = ?1"),
              [id],
              RawReceipt::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReceipt::into_receipt).transpose()
  }

  async fn get_stock_summary(&self, product_id: i64) -> Result<Option<StockSummary>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUMMARY_COLUMNS} FROM stock_summaries WHERE product_id = ?1"
              ),
              [product_id],
              RawSummary::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSummary::into_summary).transpose()
  }

  async fn list_stock_summaries(&self) -> Result<Vec<StockSummary>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUMMARY_COLUMNS} FROM stock_summaries ORDER BY product_id"
        ))?;
        let rows = stmt
          .query_map([], RawSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }
}
