//! Journal orchestration
//!
//! Coordinates the two-phase write workflow: persist the primary record
//! change first, then attach AI coaching feedback as a best-effort second
//! phase. A coach failure never fails the write that preceded it.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::coach::{
    self, CoachModel, TradeSnapshot, ANALYSIS_MAX_TOKENS, CHAT_MAX_TOKENS, INSIGHTS_MAX_TOKENS,
};
use crate::error::{JournalError, Result};
use crate::stats;
use crate::storage::Database;
use crate::types::{NewTrade, TradePatch, TradeRecord};

/// Full-history insights response
#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    /// Count of all stored records, open trades included
    pub total_trades: usize,
    pub insights: String,
}

/// Trade journal service
pub struct Journal {
    db: Database,
    coach: Arc<dyn CoachModel>,
}

impl Journal {
    pub fn new(db: Database, coach: Arc<dyn CoachModel>) -> Self {
        Self { db, coach }
    }

    /// Create a trade, then attach coaching feedback best-effort
    ///
    /// Validation and persistence failures propagate; enrichment failures
    /// are logged and the record is returned with feedback absent.
    pub async fn create_trade(&self, new: NewTrade) -> Result<TradeRecord> {
        new.validate()?;
        let mut trade = self.db.insert_trade(&new).await?;

        match self.enrich(&trade).await {
            Ok(feedback) => trade.ai_feedback = Some(feedback),
            Err(e) => {
                tracing::warn!("AI feedback failed for trade {}: {}", trade.id, e);
            }
        }

        Ok(trade)
    }

    /// Merge a partial update onto an existing trade, then re-enrich
    pub async fn update_trade(&self, id: Uuid, patch: TradePatch) -> Result<TradeRecord> {
        if patch.is_empty() {
            return Err(JournalError::Validation("no fields to update".into()));
        }
        patch.validate()?;

        let mut current = self
            .db
            .get_trade(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        patch.apply(&mut current);

        let mut updated = self
            .db
            .update_trade(&current)
            .await?
            .ok_or_else(|| not_found(id))?;

        match self.enrich(&updated).await {
            Ok(feedback) => updated.ai_feedback = Some(feedback),
            Err(e) => {
                tracing::warn!("AI feedback refresh failed for trade {}: {}", id, e);
            }
        }

        Ok(updated)
    }

    pub async fn get_trade(&self, id: Uuid) -> Result<TradeRecord> {
        self.db.get_trade(id).await?.ok_or_else(|| not_found(id))
    }

    /// All trades, newest date first
    pub async fn list_trades(&self) -> Result<Vec<TradeRecord>> {
        self.db.list_trades().await
    }

    /// Delete by id; deleting an unknown id is NotFound, never a crash
    pub async fn delete_trade(&self, id: Uuid) -> Result<()> {
        if self.db.delete_trade(id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Explicit synchronous re-analysis of a single trade
    ///
    /// Unlike the write paths, the completion is the primary operation
    /// here, so coach failures propagate to the caller.
    pub async fn analyze(&self, id: Uuid) -> Result<String> {
        let trade = self.get_trade(id).await?;
        self.enrich(&trade).await
    }

    /// Aggregate the full history and generate coaching insights
    pub async fn insights(&self) -> Result<Insights> {
        let trades = self.db.list_trades().await?;
        if trades.is_empty() {
            return Ok(Insights {
                total_trades: 0,
                insights: coach::NO_TRADES_INSIGHTS.to_string(),
            });
        }

        let stats = stats::compute(&trades);
        let recent: Vec<TradeSnapshot> = trades
            .iter()
            .take(coach::RECENT_TRADES_PREVIEW)
            .map(TradeSnapshot::from)
            .collect();
        let prompt = coach::insights_prompt(&stats, &recent);
        let text = self
            .coach
            .complete(coach::INSIGHTS_SYSTEM_PROMPT, &prompt, INSIGHTS_MAX_TOKENS)
            .await?;

        Ok(Insights {
            total_trades: trades.len(),
            insights: text,
        })
    }

    /// Answer a free-form question with the trade history as context
    pub async fn chat(&self, message: &str) -> Result<String> {
        let trades = self.db.list_trades().await?;
        let snapshots: Vec<TradeSnapshot> = trades.iter().map(TradeSnapshot::from).collect();
        let prompt = coach::chat_prompt(message, &snapshots);
        self.coach
            .complete(coach::CHAT_SYSTEM_PROMPT, &prompt, CHAT_MAX_TOKENS)
            .await
    }

    /// Phase two of the write workflow: prompt, complete, persist feedback
    ///
    /// The snapshot strips storage metadata so the model never sees ids,
    /// timestamps, or prior feedback.
    async fn enrich(&self, trade: &TradeRecord) -> Result<String> {
        let snapshot = TradeSnapshot::from(trade);
        let prompt = coach::analysis_prompt(&snapshot);
        let feedback = self
            .coach
            .complete(coach::ANALYSIS_SYSTEM_PROMPT, &prompt, ANALYSIS_MAX_TOKENS)
            .await?;

        self.db
            .set_feedback(trade.id, &feedback)
            .await?
            .ok_or_else(|| not_found(trade.id))?;

        Ok(feedback)
    }
}

fn not_found(id: Uuid) -> JournalError {
    JournalError::NotFound(format!("trade {}", id))
}
