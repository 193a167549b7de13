//! Unit tests for the journal orchestrator
//!
//! The coach is mocked so enrichment failure isolation can be exercised
//! without network access; storage runs against in-memory SQLite.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::coach::{MockCoachModel, NO_TRADES_INSIGHTS};
    use crate::error::JournalError;
    use crate::storage::Database;
    use crate::types::{Direction, NewTrade, TradePatch};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use uuid::Uuid;

    async fn journal_with(coach: MockCoachModel) -> Journal {
        let db = Database::connect_in_memory().await.unwrap();
        Journal::new(db, Arc::new(coach))
    }

    fn ok_coach(reply: &'static str) -> MockCoachModel {
        let mut coach = MockCoachModel::new();
        coach
            .expect_complete()
            .returning(move |_, _, _| Ok(reply.to_string()));
        coach
    }

    fn failing_coach() -> MockCoachModel {
        let mut coach = MockCoachModel::new();
        coach
            .expect_complete()
            .returning(|_, _, _| Err(JournalError::Api("simulated outage".into())));
        coach
    }

    fn sample_trade() -> NewTrade {
        NewTrade {
            ticker: "AAPL".to_string(),
            entry: dec!(100),
            exit: Some(dec!(110)),
            direction: Direction::Long,
            setup: "breakout".to_string(),
            notes: None,
            tags: vec![],
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_persists_and_enriches() {
        let journal = journal_with(ok_coach("Solid execution.")).await;

        let created = journal.create_trade(sample_trade()).await.unwrap();
        assert_eq!(created.ai_feedback.as_deref(), Some("Solid execution."));

        // Feedback was written back to the store, not only the response
        let stored = journal.get_trade(created.id).await.unwrap();
        assert_eq!(stored.ai_feedback.as_deref(), Some("Solid execution."));
    }

    #[tokio::test]
    async fn test_create_survives_coach_failure() {
        let journal = journal_with(failing_coach()).await;

        // The primary persist must succeed even though enrichment fails
        let created = journal.create_trade(sample_trade()).await.unwrap();
        assert!(created.ai_feedback.is_none());

        let stored = journal.get_trade(created.id).await.unwrap();
        assert!(stored.ai_feedback.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_trade() {
        let journal = journal_with(MockCoachModel::new()).await;

        let mut invalid = sample_trade();
        invalid.ticker = String::new();
        let err = journal.create_trade(invalid).await.unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));

        // Nothing was persisted
        assert!(journal.list_trades().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let journal = journal_with(MockCoachModel::new()).await;

        let patch = TradePatch {
            notes: Some("revised".to_string()),
            ..Default::default()
        };
        let err = journal.update_trade(Uuid::new_v4(), patch).await.unwrap_err();
        assert!(matches!(err, JournalError::NotFound(_)));

        // No write happened
        assert!(journal.list_trades().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_empty_patch() {
        let journal = journal_with(ok_coach("ok")).await;
        let created = journal.create_trade(sample_trade()).await.unwrap();

        let err = journal
            .update_trade(created.id, TradePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_merges_and_reenriches() {
        let journal = journal_with(ok_coach("Updated take.")).await;
        let created = journal.create_trade(sample_trade()).await.unwrap();

        let patch = TradePatch {
            exit: Some(dec!(120)),
            ..Default::default()
        };
        let updated = journal.update_trade(created.id, patch).await.unwrap();

        assert_eq!(updated.exit, Some(dec!(120)));
        // Untouched fields survive the merge
        assert_eq!(updated.ticker, "AAPL");
        assert_eq!(updated.setup, "breakout");
        assert_eq!(updated.ai_feedback.as_deref(), Some("Updated take."));
    }

    #[tokio::test]
    async fn test_update_survives_coach_failure() {
        let mut coach = MockCoachModel::new();
        // First call (create) succeeds, refresh on update fails
        let mut calls = 0;
        coach.expect_complete().returning(move |_, _, _| {
            calls += 1;
            if calls == 1 {
                Ok("first".to_string())
            } else {
                Err(JournalError::Api("simulated outage".into()))
            }
        });
        let journal = journal_with(coach).await;
        let created = journal.create_trade(sample_trade()).await.unwrap();

        let patch = TradePatch {
            exit: Some(dec!(130)),
            ..Default::default()
        };
        let updated = journal.update_trade(created.id, patch).await.unwrap();

        // Merge persisted; the response carries the prior feedback unrefreshed
        assert_eq!(updated.exit, Some(dec!(130)));
        assert_eq!(updated.ai_feedback.as_deref(), Some("first"));
        let stored = journal.get_trade(created.id).await.unwrap();
        assert_eq!(stored.exit, Some(dec!(130)));
        assert_eq!(stored.ai_feedback.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let journal = journal_with(ok_coach("ok")).await;
        let created = journal.create_trade(sample_trade()).await.unwrap();

        journal.delete_trade(created.id).await.unwrap();
        let err = journal.delete_trade(created.id).await.unwrap_err();
        assert!(matches!(err, JournalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_analyze_unknown_id_is_not_found() {
        let journal = journal_with(MockCoachModel::new()).await;

        let err = journal.analyze(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, JournalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_analyze_propagates_coach_failure() {
        let journal = journal_with(failing_coach()).await;
        // Created without feedback (coach down)
        let created = journal.create_trade(sample_trade()).await.unwrap();

        // Explicit analysis treats the completion as the primary operation
        let err = journal.analyze(created.id).await.unwrap_err();
        assert!(matches!(err, JournalError::Api(_)));
    }

    #[tokio::test]
    async fn test_analyze_persists_fresh_feedback() {
        let journal = journal_with(ok_coach("Fresh analysis.")).await;
        let created = journal.create_trade(sample_trade()).await.unwrap();

        let analysis = journal.analyze(created.id).await.unwrap();
        assert_eq!(analysis, "Fresh analysis.");

        let stored = journal.get_trade(created.id).await.unwrap();
        assert_eq!(stored.ai_feedback.as_deref(), Some("Fresh analysis."));
    }

    #[tokio::test]
    async fn test_insights_on_empty_history_skips_coach() {
        // No expectations set: a completion call would panic the mock
        let journal = journal_with(MockCoachModel::new()).await;

        let insights = journal.insights().await.unwrap();
        assert_eq!(insights.total_trades, 0);
        assert_eq!(insights.insights, NO_TRADES_INSIGHTS);
    }

    #[tokio::test]
    async fn test_insights_counts_open_trades_in_total() {
        let mut coach = MockCoachModel::new();
        coach
            .expect_complete()
            .returning(|_, _, _| Ok("coaching text".to_string()));
        let journal = journal_with(coach).await;

        journal.create_trade(sample_trade()).await.unwrap();
        let mut open = sample_trade();
        open.exit = None;
        journal.create_trade(open).await.unwrap();

        let insights = journal.insights().await.unwrap();
        // Both records counted, even though only one closed trade aggregates
        assert_eq!(insights.total_trades, 2);
        assert_eq!(insights.insights, "coaching text");
    }

    #[tokio::test]
    async fn test_chat_passes_history_context() {
        let mut coach = MockCoachModel::new();
        // Create-time enrichment hits the analysis prompt
        coach
            .expect_complete()
            .withf(|_, prompt, _| prompt.contains("Trade Details:"))
            .returning(|_, _, _| Ok("analysis".to_string()));
        coach
            .expect_complete()
            .withf(|_, prompt, _| {
                prompt.contains("User Question: What is my best setup?")
                    && prompt.contains("\"ticker\": \"AAPL\"")
            })
            .returning(|_, _, _| Ok("Your best setup is breakout.".to_string()));
        let journal = journal_with(coach).await;

        // Seed one trade; the create-time enrichment uses the same mock
        journal.create_trade(sample_trade()).await.unwrap();

        let reply = journal.chat("What is my best setup?").await.unwrap();
        assert_eq!(reply, "Your best setup is breakout.");
    }
}
