//! Paper Portfolio
//!
//! Simulated fills of emitted signals at the triggering tick price, with
//! average-cost accounting per symbol. No venue is involved.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::signal::{Signal, SignalAction};

/// Paper holding for one symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Signed quantity, negative when short
    pub quantity: f64,
    /// Average entry price of the open quantity, 0 when flat
    pub avg_price: f64,
    pub realized_pnl: f64,
}

impl Holding {
    /// Mark-to-market PnL of the open quantity
    pub fn unrealized_pnl(&self, mark: f64) -> f64 {
        (mark - self.avg_price) * self.quantity
    }

    /// Fill `size` units at `price` and return the PnL this fill realized.
    ///
    /// Adding to a position blends the entry price. Reducing realizes PnL
    /// on the closed units against the average entry. A fill that crosses
    /// zero closes the old side and opens the remainder at `price`.
    pub fn fill(&mut self, action: SignalAction, size: f64, price: f64) -> f64 {
        let current = self.quantity;
        let delta = action.direction() as f64 * size;
        let next = current + delta;

        if current == 0.0 || current.signum() == delta.signum() {
            let open = current.abs() + size;
            self.avg_price = (current.abs() * self.avg_price + size * price) / open;
            self.quantity = next;
            return 0.0;
        }

        let closed = current.abs().min(size);
        let realized = (price - self.avg_price) * closed * current.signum();
        self.realized_pnl += realized;
        self.quantity = next;

        if next == 0.0 {
            self.avg_price = 0.0;
        } else if next.signum() != current.signum() {
            self.avg_price = price;
        }
        realized
    }
}

/// Result of filling one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    pub action: SignalAction,
    pub size: f64,
    pub price: f64,
    pub timestamp: u64,
    /// PnL realized by this fill alone
    pub realized_pnl: f64,
    /// Holding quantity after the fill
    pub position: f64,
}

#[derive(Debug, Default)]
pub struct PaperPortfolio {
    holdings: HashMap<String, Holding>,
    fills: usize,
}

impl PaperPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a signal in full at its own price
    pub fn execute(&mut self, signal: &Signal) -> Fill {
        let holding = self.holdings.entry(signal.symbol.clone()).or_default();
        let realized_pnl = holding.fill(signal.action, signal.size, signal.price);
        self.fills += 1;

        Fill {
            symbol: signal.symbol.clone(),
            action: signal.action,
            size: signal.size,
            price: signal.price,
            timestamp: signal.timestamp,
            realized_pnl,
            position: holding.quantity,
        }
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    /// All holdings sorted by symbol
    pub fn holdings(&self) -> Vec<(String, Holding)> {
        let mut all: Vec<(String, Holding)> = self
            .holdings
            .iter()
            .map(|(symbol, holding)| (symbol.clone(), *holding))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn fill_count(&self) -> usize {
        self.fills
    }

    pub fn total_realized_pnl(&self) -> f64 {
        self.holdings.values().map(|h| h.realized_pnl).sum()
    }
}
