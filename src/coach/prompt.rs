//! Coaching prompt construction
//!
//! Deterministic string rendering only: identical inputs produce identical
//! prompts, and absent optional fields fall back to fixed placeholders
//! instead of panicking.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::stats::{pnl, TradeStats};
use crate::types::{Direction, TradeRecord};

/// System prompt for single-trade analysis
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert trading coach with deep knowledge of technical analysis, risk management, and trading psychology. Provide detailed, actionable feedback.";

/// System prompt for full-history insights
pub const INSIGHTS_SYSTEM_PROMPT: &str = "You are an expert trading coach with deep knowledge of technical analysis, risk management, and trading psychology. Provide comprehensive, actionable insights.";

/// System prompt for the chat assistant
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful AI trading coach assistant. Answer questions about trading using the provided trading history as context. Be specific, educational, and actionable.";

/// Canned insights response when the journal is empty
pub const NO_TRADES_INSIGHTS: &str =
    "No trades found. Start adding trades to get personalized insights!";

/// How many recent trades are embedded in the insights prompt
pub const RECENT_TRADES_PREVIEW: usize = 10;

/// Sanitized projection of a trade for prompt building
///
/// Carries only the domain fields relevant to coaching analysis. Storage
/// metadata (id, timestamps, prior feedback) never reaches the model.
#[derive(Debug, Clone, Serialize)]
pub struct TradeSnapshot {
    pub ticker: String,
    pub entry: Decimal,
    pub exit: Option<Decimal>,
    pub direction: Direction,
    pub setup: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub date: NaiveDate,
}

impl From<&TradeRecord> for TradeSnapshot {
    fn from(record: &TradeRecord) -> Self {
        Self {
            ticker: record.ticker.clone(),
            entry: record.entry,
            exit: record.exit,
            direction: record.direction,
            setup: record.setup.clone(),
            notes: record.notes.clone(),
            tags: record.tags.clone(),
            date: record.date,
        }
    }
}

/// Render the single-trade analysis prompt
pub fn analysis_prompt(trade: &TradeSnapshot) -> String {
    let (exit_line, pnl_line) = match trade.exit {
        Some(exit) => {
            let pnl = pnl(trade.direction, trade.entry, exit);
            // Entry is always the percent denominator, regardless of direction
            let pnl_percent = pnl / trade.entry * Decimal::ONE_HUNDRED;
            (
                format!("${:.2}", exit),
                format!("${:.2} ({}%)", pnl, signed(pnl_percent)),
            )
        }
        None => (
            "not yet recorded (position open)".to_string(),
            "unrealized (position open)".to_string(),
        ),
    };

    let notes = trade.notes.as_deref().unwrap_or("None provided");
    let tags = if trade.tags.is_empty() {
        "None".to_string()
    } else {
        trade.tags.join(", ")
    };

    format!(
        r#"You are an expert trading coach analyzing a trade. Provide a detailed, constructive critique.

Trade Details:
- Ticker: {ticker}
- Direction: {direction}
- Entry Price: ${entry:.2}
- Exit Price: {exit_line}
- P&L: {pnl_line}
- Setup: {setup}
- Notes: {notes}
- Tags: {tags}
- Date: {date}

Provide a comprehensive analysis covering:
1. Trade Execution: Was the entry/exit timing good? Why or why not?
2. Setup Quality: Evaluate the setup - was it high probability? What were the strengths/weaknesses?
3. Risk Management: Was position sizing appropriate? Was the risk/reward ratio favorable?
4. Psychology: What psychological factors may have influenced this trade (fear, greed, FOMO, etc.)?
5. What Went Well: Identify positive aspects of this trade
6. What Could Be Improved: Specific, actionable improvements
7. Key Takeaways: 2-3 main lessons from this trade

Be specific, constructive, and educational. Format your response in clear paragraphs."#,
        ticker = trade.ticker,
        direction = trade.direction.as_str().to_uppercase(),
        entry = trade.entry,
        exit_line = exit_line,
        pnl_line = pnl_line,
        setup = trade.setup,
        notes = notes,
        tags = tags,
        date = trade.date,
    )
}

/// Render the full-history insights prompt
///
/// `recent` is a bounded preview of the most recent trades; callers pass at
/// most [`RECENT_TRADES_PREVIEW`] entries.
pub fn insights_prompt(stats: &TradeStats, recent: &[TradeSnapshot]) -> String {
    let setup_lines: Vec<String> = stats
        .setups
        .iter()
        .map(|s| {
            format!(
                "- {}: {}W/{}L ({:.1}% win rate, ${:.2} P&L)",
                s.label,
                s.wins,
                s.losses,
                s.win_rate(),
                s.pnl
            )
        })
        .collect();

    let (best_label, best_pnl) = stats
        .best_setup
        .as_ref()
        .map(|s| (s.label.as_str(), s.pnl))
        .unwrap_or(("N/A", Decimal::ZERO));
    let (worst_label, worst_pnl) = stats
        .worst_setup
        .as_ref()
        .map(|s| (s.label.as_str(), s.pnl))
        .unwrap_or(("N/A", Decimal::ZERO));

    let recent_json =
        serde_json::to_string_pretty(recent).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are an expert trading coach analyzing a trader's complete trading history. Provide comprehensive insights and a personalized improvement plan.

Trading Statistics:
- Total Trades: {total}
- Winners: {winners} ({win_rate:.1}% win rate)
- Losers: {losers}
- Total P&L: ${total_pnl:.2}
- Average Win: ${avg_win:.2}
- Average Loss: ${avg_loss:.2}

Setup Performance:
{setup_lines}

Best Performing Setup: {best_label} (${best_pnl:.2} P&L)
Worst Performing Setup: {worst_label} (${worst_pnl:.2} P&L)

Recent Trades Summary:
{recent_json}

Provide a comprehensive analysis covering:
1. Overall Performance Assessment: Evaluate the trader's performance holistically
2. Strongest Setups: Which setups work best and why
3. Weakest Setups: Which setups are underperforming and what might be wrong
4. Win/Loss Analysis: Patterns in winning vs losing trades
5. Risk Management Mistakes: Common risk management errors observed
6. Behavioral Patterns: Psychological patterns that may be affecting performance (overtrading, revenge trading, etc.)
7. Personalized Improvement Plan: Specific, actionable steps to improve trading performance

Be detailed, specific, and provide actionable advice. Format your response in clear sections with headers."#,
        total = stats.total_trades,
        winners = stats.winners,
        win_rate = stats.win_rate,
        losers = stats.losers,
        total_pnl = stats.total_pnl,
        avg_win = stats.avg_win,
        avg_loss = stats.avg_loss,
        setup_lines = setup_lines.join("\n"),
        best_label = best_label,
        best_pnl = best_pnl,
        worst_label = worst_label,
        worst_pnl = worst_pnl,
        recent_json = recent_json,
    )
}

/// Render the free-form chat prompt with trade-history context
pub fn chat_prompt(message: &str, trades: &[TradeSnapshot]) -> String {
    let trades_context = if trades.is_empty() {
        "No trades recorded yet.".to_string()
    } else {
        serde_json::to_string_pretty(trades).unwrap_or_else(|_| "[]".to_string())
    };

    format!(
        r#"You are an AI trading coach assistant. The user is asking you a question about their trading.

User Question: {message}

Trading History:
{trades_context}

Answer the user's question using the trading history as context. Be helpful, educational, and specific. If the question is about a specific trade, reference it. If it's about general trading advice, provide actionable insights."#,
    )
}

/// Fixed-point rendering with an explicit sign, for percent values
fn signed(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}
