//! Core domain types for the trading journal

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{JournalError, Result};

/// Maximum ticker symbol length
pub const MAX_TICKER_LEN: usize = 10;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = JournalError;

    /// Case-insensitive parse, normalized to lowercase
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            other => Err(JournalError::Validation(format!(
                "direction must be 'long' or 'short', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A persisted trade record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Store-assigned id, immutable after insert
    pub id: Uuid,
    pub ticker: String,
    pub entry: Decimal,
    /// Absent while the trade is still open
    pub exit: Option<Decimal>,
    pub direction: Direction,
    pub setup: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Calendar date of the trade, no time component
    pub date: NaiveDate,
    /// Populated by enrichment after the record exists
    pub ai_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User-submitted payload for creating a trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrade {
    pub ticker: String,
    pub entry: Decimal,
    pub exit: Option<Decimal>,
    pub direction: Direction,
    pub setup: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: NaiveDate,
}

impl NewTrade {
    /// Check field invariants before the record crosses the store boundary
    pub fn validate(&self) -> Result<()> {
        validate_ticker(&self.ticker)?;
        validate_price("entry", self.entry)?;
        if let Some(exit) = self.exit {
            validate_price("exit", exit)?;
        }
        if self.setup.trim().is_empty() {
            return Err(JournalError::Validation("setup must not be empty".into()));
        }
        Ok(())
    }
}

/// Partial update for an existing trade: only supplied fields overwrite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradePatch {
    pub ticker: Option<String>,
    pub entry: Option<Decimal>,
    pub exit: Option<Decimal>,
    pub direction: Option<Direction>,
    pub setup: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub date: Option<NaiveDate>,
}

impl TradePatch {
    /// True when no updatable field was supplied
    pub fn is_empty(&self) -> bool {
        self.ticker.is_none()
            && self.entry.is_none()
            && self.exit.is_none()
            && self.direction.is_none()
            && self.setup.is_none()
            && self.notes.is_none()
            && self.tags.is_none()
            && self.date.is_none()
    }

    /// Validate the supplied fields only
    pub fn validate(&self) -> Result<()> {
        if let Some(ticker) = &self.ticker {
            validate_ticker(ticker)?;
        }
        if let Some(entry) = self.entry {
            validate_price("entry", entry)?;
        }
        if let Some(exit) = self.exit {
            validate_price("exit", exit)?;
        }
        if let Some(setup) = &self.setup {
            if setup.trim().is_empty() {
                return Err(JournalError::Validation("setup must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Merge supplied fields onto an existing record
    pub fn apply(&self, record: &mut TradeRecord) {
        if let Some(ticker) = &self.ticker {
            record.ticker = ticker.clone();
        }
        if let Some(entry) = self.entry {
            record.entry = entry;
        }
        if let Some(exit) = self.exit {
            record.exit = Some(exit);
        }
        if let Some(direction) = self.direction {
            record.direction = direction;
        }
        if let Some(setup) = &self.setup {
            record.setup = setup.clone();
        }
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
        if let Some(date) = self.date {
            record.date = date;
        }
    }
}

fn validate_ticker(ticker: &str) -> Result<()> {
    if ticker.trim().is_empty() {
        return Err(JournalError::Validation("ticker must not be empty".into()));
    }
    if ticker.len() > MAX_TICKER_LEN {
        return Err(JournalError::Validation(format!(
            "ticker must be at most {} characters",
            MAX_TICKER_LEN
        )));
    }
    Ok(())
}

fn validate_price(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(JournalError::Validation(format!(
            "{} must be positive",
            field
        )));
    }
    Ok(())
}
