//! SQLite-backed inventory store.
//!
//! ## Tables
//!
//! | table | key | notes |
//! |-------|-----|-------|
//! | `items` | `sku` | prices stored as decimal TEXT |
//! | `sales` | `sequence` | no FK to `items`; records outlive their item |
//! | `users` | `username` | SHA-256 password digest + role name |
//!
//! ## Sync over async
//!
//! The store API is synchronous. Each store owns a small tokio runtime and
//! drives sqlx futures with `block_on`, so callers must not invoke it from an
//! async task (use `spawn_blocking`). Every call is bounded by the configured
//! timeout; expiry is reported as `StoreError::Timeout`.
//!
//! Writes run inside a transaction. Only the statements are bounded by the
//! timeout: once `COMMIT` is sent it is awaited to completion (SQLite's busy
//! timeout still bounds lock waits), so a reported failure always means
//! nothing was written.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use tokio::runtime::Runtime;
use tracing::instrument;

use stockledger_auth::{verify_password, CredentialStore, Role, SeedCredential};
use stockledger_core::Sku;
use stockledger_inventory::{Item, SaleRecord};

use super::r#trait::{InventoryStore, StoreError};
use crate::seed::CredentialSeed;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS items (
        sku        TEXT PRIMARY KEY,
        name       TEXT NOT NULL,
        quantity   INTEGER NOT NULL CHECK (quantity >= 0),
        cost_price TEXT NOT NULL,
        sell_price TEXT NOT NULL,
        category   TEXT NULL,
        location   TEXT NULL,
        min_stock  INTEGER NOT NULL DEFAULT 0 CHECK (min_stock >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sales (
        sequence   INTEGER PRIMARY KEY,
        sku        TEXT NOT NULL,
        name       TEXT NOT NULL,
        category   TEXT NULL,
        quantity   INTEGER NOT NULL CHECK (quantity > 0),
        unit_price TEXT NOT NULL,
        sold_at    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username        TEXT PRIMARY KEY,
        password_sha256 TEXT NOT NULL,
        role            TEXT NOT NULL
    )
    "#,
];

const UPSERT_ITEM: &str = r#"
    INSERT INTO items (sku, name, quantity, cost_price, sell_price, category, location, min_stock)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT (sku) DO UPDATE SET
        name = excluded.name,
        quantity = excluded.quantity,
        cost_price = excluded.cost_price,
        sell_price = excluded.sell_price,
        category = excluded.category,
        location = excluded.location,
        min_stock = excluded.min_stock
"#;

const INSERT_SALE: &str = r#"
    INSERT INTO sales (sequence, sku, name, category, quantity, unit_price, sold_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

/// SQLite inventory store, durable across restarts.
#[derive(Debug)]
pub struct SqliteInventoryStore {
    /// `None` only while dropping.
    runtime: Option<Runtime>,
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteInventoryStore {
    /// Connect to `database_url` (e.g. `sqlite://inventory.db`), creating the
    /// file and schema if needed.
    #[instrument(skip_all, fields(database_url = %database_url))]
    pub fn open(database_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("stockledger-sqlite")
            .enable_all()
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to start store runtime: {e}")))?;

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(timeout);

        // A private in-memory database lives and dies with its connection.
        let in_memory = database_url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new().max_connections(4);
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = runtime.block_on(async {
            let pool = tokio::time::timeout(timeout, pool_options.connect_with(options))
                .await
                .map_err(|_| StoreError::Timeout(timeout))??;
            for ddl in SCHEMA {
                sqlx::query(ddl).execute(&pool).await?;
            }
            Ok::<_, StoreError>(pool)
        })?;

        tracing::info!("sqlite inventory store ready");

        Ok(Self {
            runtime: Some(runtime),
            pool,
            timeout,
        })
    }

    fn runtime(&self) -> Result<&Runtime, StoreError> {
        self.runtime
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("store is shutting down".to_string()))
    }

    fn run<T>(&self, fut: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        let limit = self.timeout;
        self.runtime()?.block_on(async move {
            tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StoreError::Timeout(limit))?
        })
    }

    /// Run `work` under the timeout, then commit the transaction it returns.
    ///
    /// Expiry drops the open transaction, which rolls it back.
    fn write<F>(&self, work: F) -> Result<(), StoreError>
    where
        F: Future<Output = Result<Transaction<'static, Sqlite>, StoreError>>,
    {
        let limit = self.timeout;
        self.runtime()?.block_on(async move {
            let tx = tokio::time::timeout(limit, work)
                .await
                .map_err(|_| StoreError::Timeout(limit))??;
            tx.commit().await?;
            Ok(())
        })
    }
}

impl Drop for SqliteInventoryStore {
    fn drop(&mut self) {
        // May run inside an async context (e.g. when the HTTP server stops).
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

async fn upsert_item_with<'e, E>(executor: E, item: &Item) -> Result<(), StoreError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(UPSERT_ITEM)
        .bind(item.sku.as_str())
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.cost_price.to_string())
        .bind(item.sell_price.to_string())
        .bind(item.category.as_deref())
        .bind(item.location.as_deref())
        .bind(item.min_stock)
        .execute(executor)
        .await?;
    Ok(())
}

async fn insert_sale_with<'e, E>(executor: E, sale: &SaleRecord) -> Result<(), StoreError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sequence = i64::try_from(sale.sequence)
        .map_err(|_| StoreError::Corrupt(format!("sequence {} out of range", sale.sequence)))?;

    let res = sqlx::query(INSERT_SALE)
        .bind(sequence)
        .bind(sale.sku.as_str())
        .bind(&sale.name)
        .bind(sale.category.as_deref())
        .bind(sale.quantity)
        .bind(sale.unit_price.to_string())
        .bind(sale.sold_at)
        .execute(executor)
        .await;

    match res {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(StoreError::DuplicateSequence(sale.sequence))
        }
        Err(e) => Err(e.into()),
    }
}

fn parse_decimal(raw: &str, column: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw).map_err(|e| StoreError::Corrupt(format!("{column} '{raw}': {e}")))
}

fn parse_sku(raw: String) -> Result<Sku, StoreError> {
    Sku::new(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn item_from_row(row: &SqliteRow) -> Result<Item, StoreError> {
    let cost: String = row.try_get("cost_price")?;
    let sell: String = row.try_get("sell_price")?;
    Ok(Item {
        sku: parse_sku(row.try_get("sku")?)?,
        name: row.try_get("name")?,
        quantity: row.try_get("quantity")?,
        cost_price: parse_decimal(&cost, "cost_price")?,
        sell_price: parse_decimal(&sell, "sell_price")?,
        category: row.try_get("category")?,
        location: row.try_get("location")?,
        min_stock: row.try_get("min_stock")?,
    })
}

fn sale_from_row(row: &SqliteRow) -> Result<SaleRecord, StoreError> {
    let sequence: i64 = row.try_get("sequence")?;
    let price: String = row.try_get("unit_price")?;
    let sold_at: DateTime<Utc> = row.try_get("sold_at")?;
    Ok(SaleRecord {
        sequence: u64::try_from(sequence)
            .map_err(|_| StoreError::Corrupt(format!("negative sale sequence {sequence}")))?,
        sku: parse_sku(row.try_get("sku")?)?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        quantity: row.try_get("quantity")?,
        unit_price: parse_decimal(&price, "unit_price")?,
        sold_at,
    })
}

impl InventoryStore for SqliteInventoryStore {
    #[instrument(skip(self))]
    fn load_all_items(&self) -> Result<Vec<Item>, StoreError> {
        self.run(async {
            let rows = sqlx::query(
                "SELECT sku, name, quantity, cost_price, sell_price, category, location, min_stock \
                 FROM items ORDER BY sku",
            )
            .fetch_all(&self.pool)
            .await?;
            rows.iter().map(item_from_row).collect()
        })
    }

    #[instrument(skip(self))]
    fn load_all_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        self.run(async {
            let rows = sqlx::query(
                "SELECT sequence, sku, name, category, quantity, unit_price, sold_at \
                 FROM sales ORDER BY sequence",
            )
            .fetch_all(&self.pool)
            .await?;
            rows.iter().map(sale_from_row).collect()
        })
    }

    #[instrument(skip(self, item), fields(sku = %item.sku))]
    fn upsert_item(&self, item: &Item) -> Result<(), StoreError> {
        self.write(async {
            let mut tx = self.pool.begin().await?;
            upsert_item_with(&mut *tx, item).await?;
            Ok(tx)
        })
    }

    #[instrument(skip(self), fields(sku = %sku))]
    fn delete_item(&self, sku: &Sku) -> Result<(), StoreError> {
        self.write(async {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM items WHERE sku = ?1")
                .bind(sku.as_str())
                .execute(&mut *tx)
                .await?;
            Ok(tx)
        })
    }

    #[instrument(skip(self, sale), fields(sku = %sale.sku, sequence = sale.sequence))]
    fn append_sale(&self, sale: &SaleRecord) -> Result<(), StoreError> {
        self.write(async {
            let mut tx = self.pool.begin().await?;
            insert_sale_with(&mut *tx, sale).await?;
            Ok(tx)
        })
    }

    /// One transaction: the decremented item and the sale commit together.
    #[instrument(skip_all, fields(sku = %sale.sku, sequence = sale.sequence))]
    fn commit_sale(
        &self,
        _previous: &Item,
        updated: &Item,
        sale: &SaleRecord,
    ) -> Result<(), StoreError> {
        self.write(async {
            let mut tx = self.pool.begin().await?;
            upsert_item_with(&mut *tx, updated).await?;
            insert_sale_with(&mut *tx, sale).await?;
            Ok(tx)
        })
    }
}

impl CredentialSeed for SqliteInventoryStore {
    fn seed_credentials(&self, seeds: &[SeedCredential]) -> Result<bool, StoreError> {
        self.run(async {
            let mut tx = self.pool.begin().await?;
            let existing: i64 = sqlx::query("SELECT COUNT(*) AS n FROM users")
                .fetch_one(&mut *tx)
                .await?
                .try_get("n")?;
            if existing > 0 {
                return Ok(false);
            }

            for seed in seeds {
                sqlx::query("INSERT INTO users (username, password_sha256, role) VALUES (?1, ?2, ?3)")
                    .bind(seed.username)
                    .bind(seed.password_digest())
                    .bind(seed.role.as_str())
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;
            Ok(true)
        })
    }
}

impl CredentialStore for SqliteInventoryStore {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        let row = self.run(async {
            let row = sqlx::query("SELECT password_sha256, role FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
            match row {
                Some(row) => Ok(Some((
                    row.try_get::<String, _>("password_sha256")?,
                    row.try_get::<String, _>("role")?,
                ))),
                None => Ok(None),
            }
        });

        let (digest, role) = match row {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "credential lookup failed");
                return None;
            }
        };

        if !verify_password(password, &digest) {
            return None;
        }
        match role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(username, error = %err, "stored role is not recognised");
                None
            }
        }
    }
}
