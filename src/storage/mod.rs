//! SQLite trade store
//!
//! CRUD adapter over a `sqlx` pool. Decimals and dates cross the boundary
//! as canonical text; rows come back as a raw-row struct converted into
//! plain domain records, never driver types.


use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{JournalError, Result};
use crate::types::{Direction, NewTrade, TradeRecord};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS trades (
    id          TEXT PRIMARY KEY,
    ticker      TEXT NOT NULL,
    entry       TEXT NOT NULL,
    exit_price  TEXT,
    direction   TEXT NOT NULL,
    setup       TEXT NOT NULL,
    notes       TEXT,
    tags        TEXT NOT NULL DEFAULT '[]',
    trade_date  TEXT NOT NULL,
    ai_feedback TEXT,
    created_at  TEXT NOT NULL
)
"#;

/// Trade store over SQLite
///
/// Cheap to clone; clones share the underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// Raw row as stored; converted to [`TradeRecord`] before leaving this module
#[derive(sqlx::FromRow)]
struct TradeRow {
    id: String,
    ticker: String,
    entry: String,
    exit_price: Option<String>,
    direction: String,
    setup: String,
    notes: Option<String>,
    tags: String,
    trade_date: String,
    ai_feedback: Option<String>,
    created_at: String,
}

impl TradeRow {
    fn into_record(self) -> Result<TradeRecord> {
        let id = Uuid::parse_str(&self.id).map_err(|e| decode_err("id", &e))?;
        let entry = Decimal::from_str(&self.entry).map_err(|e| decode_err("entry", &e))?;
        let exit = self
            .exit_price
            .map(|s| Decimal::from_str(&s).map_err(|e| decode_err("exit_price", &e)))
            .transpose()?;
        let direction: Direction = self.direction.parse()?;
        let tags: Vec<String> = serde_json::from_str(&self.tags).unwrap_or_default();
        let date =
            NaiveDate::from_str(&self.trade_date).map_err(|e| decode_err("trade_date", &e))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| decode_err("created_at", &e))?
            .with_timezone(&Utc);

        Ok(TradeRecord {
            id,
            ticker: self.ticker,
            entry,
            exit,
            direction,
            setup: self.setup,
            notes: self.notes,
            tags,
            date,
            ai_feedback: self.ai_feedback,
            created_at,
        })
    }
}

fn decode_err(column: &str, err: &dyn std::fmt::Display) -> JournalError {
    JournalError::Database(sqlx::Error::Decode(
        format!("column '{}': {}", column, err).into(),
    ))
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists
    pub async fn connect(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        tracing::info!("Trade store ready at {}", path);

        Ok(Self { pool })
    }

    /// In-memory store, for tests and ephemeral runs
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Insert a validated trade; the store assigns id and creation timestamp
    pub async fn insert_trade(&self, new: &NewTrade) -> Result<TradeRecord> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO trades
                (id, ticker, entry, exit_price, direction, setup, notes, tags, trade_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(id.to_string())
        .bind(&new.ticker)
        .bind(new.entry.to_string())
        .bind(new.exit.map(|d| d.to_string()))
        .bind(new.direction.as_str())
        .bind(&new.setup)
        .bind(&new.notes)
        .bind(serde_json::to_string(&new.tags)?)
        .bind(new.date.to_string())
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(TradeRecord {
            id,
            ticker: new.ticker.clone(),
            entry: new.entry,
            exit: new.exit,
            direction: new.direction,
            setup: new.setup.clone(),
            notes: new.notes.clone(),
            tags: new.tags.clone(),
            date: new.date,
            ai_feedback: None,
            created_at,
        })
    }

    /// Point lookup by id
    pub async fn get_trade(&self, id: Uuid) -> Result<Option<TradeRecord>> {
        let row: Option<TradeRow> = sqlx::query_as("SELECT * FROM trades WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TradeRow::into_record).transpose()
    }

    /// Full scan, newest trade date first
    pub async fn list_trades(&self) -> Result<Vec<TradeRecord>> {
        let rows: Vec<TradeRow> =
            sqlx::query_as("SELECT * FROM trades ORDER BY trade_date DESC, created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TradeRow::into_record).collect()
    }

    /// Write a merged record back; returns `None` when the id is unknown
    ///
    /// Leaves `ai_feedback` untouched; feedback only moves through
    /// [`Database::set_feedback`].
    pub async fn update_trade(&self, record: &TradeRecord) -> Result<Option<TradeRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE trades
            SET ticker = ?2, entry = ?3, exit_price = ?4, direction = ?5,
                setup = ?6, notes = ?7, tags = ?8, trade_date = ?9
            WHERE id = ?1
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.ticker)
        .bind(record.entry.to_string())
        .bind(record.exit.map(|d| d.to_string()))
        .bind(record.direction.as_str())
        .bind(&record.setup)
        .bind(&record.notes)
        .bind(serde_json::to_string(&record.tags)?)
        .bind(record.date.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_trade(record.id).await
    }

    /// Delete by id; false when the id was unknown
    pub async fn delete_trade(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trades WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach coaching feedback to an existing trade
    pub async fn set_feedback(&self, id: Uuid, feedback: &str) -> Result<Option<TradeRecord>> {
        let result = sqlx::query("UPDATE trades SET ai_feedback = ?2 WHERE id = ?1")
            .bind(id.to_string())
            .bind(feedback)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_trade(id).await
    }
}
