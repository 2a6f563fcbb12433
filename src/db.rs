use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};

use crate::settings::Settings;

pub async fn connect(settings: &Settings) -> Result<SqlitePool> {
    if let Some(dir) = Path::new(&settings.db_path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&settings.db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS sold_usernames (
             id        INTEGER NOT NULL UNIQUE,
             username  TEXT NOT NULL,
             price     REAL NOT NULL CHECK (price >= 0),
             sale_date TIMESTAMP NOT NULL,
             UNIQUE (username, sale_date)
         )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

// ── Ingestion ──

/// Highest identifier currently in the store; 0 for an empty table.
pub async fn max_sale_id(conn: &mut PoolConnection<Sqlite>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM sold_usernames")
        .fetch_one(&mut **conn)
        .await
}

/// Insert a sale unless its (username, sale_date) natural key already
/// exists. Returns whether a row was actually written.
pub async fn insert_sale(
    conn: &mut PoolConnection<Sqlite>,
    id: i64,
    username: &str,
    price: f64,
    sale_date: NaiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO sold_usernames (id, username, price, sale_date)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (username, sale_date) DO NOTHING",
    )
    .bind(id)
    .bind(username)
    .bind(price)
    .bind(sale_date)
    .execute(&mut **conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

// ── Stats ──

pub struct StoreStats {
    pub total: i64,
    pub max_id: i64,
    pub latest_sale: Option<NaiveDateTime>,
}

pub async fn get_stats(pool: &SqlitePool) -> Result<StoreStats> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sold_usernames")
        .fetch_one(pool)
        .await?;
    let max_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM sold_usernames")
        .fetch_one(pool)
        .await?;
    let latest_sale: Option<NaiveDateTime> =
        sqlx::query_scalar("SELECT MAX(sale_date) FROM sold_usernames")
            .fetch_one(pool)
            .await?;
    Ok(StoreStats {
        total,
        max_id,
        latest_sale,
    })
}
