//! Trade statistics aggregation
//!
//! Pure reduction of a trade history into the aggregate bundle used for
//! coaching insights: per-trade P&L, win/loss classification, per-setup
//! rollups, best/worst setup, average win/loss. No I/O.


use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Direction, TradeRecord};

/// Setup label used when a trade carries no usable label
pub const UNKNOWN_SETUP: &str = "Unknown";

/// Signed P&L for a closed trade
///
/// Long: exit - entry. Short: entry - exit.
pub fn pnl(direction: Direction, entry: Decimal, exit: Decimal) -> Decimal {
    match direction {
        Direction::Long => exit - entry,
        Direction::Short => entry - exit,
    }
}

/// P&L of a record, `None` while the trade is still open
pub fn trade_pnl(trade: &TradeRecord) -> Option<Decimal> {
    trade.exit.map(|exit| pnl(trade.direction, trade.entry, exit))
}

/// Win/loss classification: zero P&L counts as a loss
pub fn is_winner(pnl: Decimal) -> bool {
    pnl > Decimal::ZERO
}

/// Per-setup rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupStats {
    pub label: String,
    pub wins: u32,
    pub losses: u32,
    pub pnl: Decimal,
}

impl SetupStats {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            wins: 0,
            losses: 0,
            pnl: Decimal::ZERO,
        }
    }

    pub fn trade_count(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win rate in percent, 0 when the setup has no trades
    pub fn win_rate(&self) -> Decimal {
        let total = self.trade_count();
        if total == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.wins) / Decimal::from(total) * Decimal::ONE_HUNDRED
    }
}

/// Aggregate statistics over a trade history
///
/// Derived fresh from the supplied sequence, never persisted. Only closed
/// trades (exit recorded) enter the counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub total_trades: usize,
    pub winners: usize,
    pub losers: usize,
    pub total_pnl: Decimal,
    /// Percent, 0 when there are no closed trades
    pub win_rate: Decimal,
    /// Mean P&L over winners, 0 when there are none
    pub avg_win: Decimal,
    /// Signed mean P&L over losers (typically <= 0), 0 when there are none
    pub avg_loss: Decimal,
    /// Rollups in first-occurrence order of the input sequence
    pub setups: Vec<SetupStats>,
    /// Setup with the highest cumulative P&L; `None` on an empty history
    pub best_setup: Option<SetupStats>,
    /// Setup with the lowest cumulative P&L; `None` on an empty history
    pub worst_setup: Option<SetupStats>,
}

impl TradeStats {
    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }
}

/// Reduce a trade history into a [`TradeStats`] bundle
///
/// Ties for best/worst setup are broken by first occurrence in the supplied
/// sequence, so results are deterministic for a fixed input order.
pub fn compute(trades: &[TradeRecord]) -> TradeStats {
    let mut winners = 0usize;
    let mut losers = 0usize;
    let mut total_pnl = Decimal::ZERO;
    let mut win_sum = Decimal::ZERO;
    let mut loss_sum = Decimal::ZERO;
    let mut setups: Vec<SetupStats> = Vec::new();

    for trade in trades {
        let Some(pnl) = trade_pnl(trade) else {
            // Open trade, nothing to classify yet
            continue;
        };

        total_pnl += pnl;

        let label = match trade.setup.trim() {
            "" => UNKNOWN_SETUP,
            s => s,
        };
        let idx = match setups.iter().position(|s| s.label == label) {
            Some(i) => i,
            None => {
                setups.push(SetupStats::new(label));
                setups.len() - 1
            }
        };
        let setup = &mut setups[idx];

        if is_winner(pnl) {
            winners += 1;
            win_sum += pnl;
            setup.wins += 1;
        } else {
            losers += 1;
            loss_sum += pnl;
            setup.losses += 1;
        }
        setup.pnl += pnl;
    }

    let total = winners + losers;
    let win_rate = if total > 0 {
        Decimal::from(winners) / Decimal::from(total) * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let avg_win = if winners > 0 {
        win_sum / Decimal::from(winners)
    } else {
        Decimal::ZERO
    };
    let avg_loss = if losers > 0 {
        loss_sum / Decimal::from(losers)
    } else {
        Decimal::ZERO
    };

    // Strict comparisons keep the first occurrence on ties
    let best_setup = setups
        .iter()
        .fold(None::<&SetupStats>, |best, s| match best {
            Some(b) if s.pnl > b.pnl => Some(s),
            Some(b) => Some(b),
            None => Some(s),
        })
        .cloned();
    let worst_setup = setups
        .iter()
        .fold(None::<&SetupStats>, |worst, s| match worst {
            Some(w) if s.pnl < w.pnl => Some(s),
            Some(w) => Some(w),
            None => Some(s),
        })
        .cloned();

    TradeStats {
        total_trades: total,
        winners,
        losers,
        total_pnl,
        win_rate,
        avg_win,
        avg_loss,
        setups,
        best_setup,
        worst_setup,
    }
}
