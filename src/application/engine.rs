//! Band Reversion Engine
//!
//! Explicitly constructed, explicitly owned engine that routes each tick
//! through the symbol's price window, the band calculator and the signal
//! generator, and exposes the stateless risk gate and weight fallback.
//!
//! Per-symbol state lives in an arena of records indexed by symbol. Each
//! record has its own mutex, so ticks for one symbol are serialised while
//! different symbols proceed concurrently. The table lock is only held to
//! look up or insert a record, never while a tick is processed.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::position::{apply_delta, PositionError, PositionState};
use crate::domain::risk::{RiskCheck, RiskGate, RiskVerdict};
use crate::domain::signal::Signal;
use crate::domain::tick::{validate_price, validate_volume, PriceTick, TickError};
use crate::strategy::bands::{self, BandOutcome, BandStatistics};
use crate::strategy::generator::SignalGenerator;
use crate::strategy::params::{ConfigError, EngineConfig};
use crate::strategy::weights::{fallback_weights, WeightError};
use crate::strategy::window::PriceWindow;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid tick: {0}")]
    InvalidTick(#[from] TickError),
    #[error("Invalid returns matrix: {0}")]
    InvalidWeights(#[from] WeightError),
    #[error(transparent)]
    PositionOverflow(#[from] PositionError),
}

impl EngineError {
    /// Bad caller input, as opposed to an engine-side limit being hit
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, EngineError::PositionOverflow(_))
    }
}

/// What a single tick produced. "No signal" and "not enough history" are
/// distinct, observable outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Fewer than `need` prior prices for this symbol
    Insufficient { have: usize, need: usize },
    /// Prior window has zero standard deviation; no z-score, no signal
    DegenerateVariance { mean: f64 },
    /// Bands were valid but no transition fired
    NoSignal { stats: BandStatistics },
    /// A BUY or SELL fired; the position has already been updated
    Signal(Signal),
}

impl TickOutcome {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            TickOutcome::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    pub fn into_signal(self) -> Option<Signal> {
        match self {
            TickOutcome::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, TickOutcome::Insufficient { .. })
    }

    /// Bands of a window that produced no signal
    pub fn stats(&self) -> Option<&BandStatistics> {
        match self {
            TickOutcome::NoSignal { stats } => Some(stats),
            _ => None,
        }
    }

    /// Mean of the evaluated window, when one was available
    pub fn mean(&self) -> Option<f64> {
        match self {
            TickOutcome::Insufficient { .. } => None,
            TickOutcome::DegenerateVariance { mean } => Some(*mean),
            TickOutcome::NoSignal { stats } => Some(stats.mean),
            TickOutcome::Signal(signal) => Some(signal.metadata.mean),
        }
    }
}

/// Window and position for one symbol
#[derive(Debug)]
struct SymbolState {
    window: PriceWindow,
    position: i64,
    last_timestamp: Option<u64>,
}

impl SymbolState {
    fn new(lookback: usize) -> Self {
        Self {
            window: PriceWindow::new(lookback),
            position: 0,
            last_timestamp: None,
        }
    }
}

type SymbolRecord = Arc<Mutex<SymbolState>>;

/// Arena of per-symbol records. Records are never removed, so indices
/// stay valid for the engine's lifetime.
#[derive(Debug, Default)]
struct SymbolTable {
    index: HashMap<String, usize>,
    records: Vec<SymbolRecord>,
}

impl SymbolTable {
    fn get(&self, symbol: &str) -> Option<SymbolRecord> {
        self.index.get(symbol).map(|&idx| Arc::clone(&self.records[idx]))
    }
}

#[derive(Debug)]
pub struct ReversionEngine {
    config: EngineConfig,
    generator: SignalGenerator,
    risk_gate: RiskGate,
    symbols: RwLock<SymbolTable>,
}

impl Default for ReversionEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl ReversionEngine {
    /// Create an engine from validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create an engine with default signal settings
    pub fn with_capital(capital: f64, lookback: usize) -> Result<Self, EngineError> {
        Self::new(EngineConfig::new(capital, lookback))
    }

    fn build(config: EngineConfig) -> Self {
        let generator = SignalGenerator::new(&config.strategy);
        let risk_gate = RiskGate::new(config.capital, config.strategy.var_limit_pct);
        Self {
            config,
            generator,
            risk_gate,
            symbols: RwLock::new(SymbolTable::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn capital(&self) -> f64 {
        self.config.capital
    }

    pub fn lookback(&self) -> usize {
        self.config.strategy.lookback
    }

    /// Process one tick.
    ///
    /// Bands are computed over the `lookback` prices preceding this tick,
    /// the tick price is tested against them, and only then is the price
    /// appended to the window. Invalid input fails the call without
    /// touching any symbol's state.
    pub fn on_market_data(
        &self,
        symbol: &str,
        price: f64,
        volume: f64,
        timestamp: u64,
    ) -> Result<TickOutcome, EngineError> {
        validate_price(price)?;
        validate_volume(volume)?;

        let record = self.record(symbol);
        let mut state = record.lock();

        if let Some(last) = state.last_timestamp {
            if timestamp < last {
                debug!(symbol, timestamp, last, "Tick timestamp went backwards");
            }
        }

        let outcome = match bands::compute(&state.window, self.config.strategy.band_width) {
            BandOutcome::Insufficient { have, need } => TickOutcome::Insufficient { have, need },
            BandOutcome::Degenerate { mean } => {
                debug!(symbol, mean, "Zero variance window, no signal possible");
                TickOutcome::DegenerateVariance { mean }
            }
            BandOutcome::Ready(stats) => {
                match self
                    .generator
                    .evaluate(symbol, price, timestamp, &stats, state.position)
                {
                    Some(decision) => {
                        let next = apply_delta(symbol, state.position, decision.delta)?;
                        info!(
                            symbol,
                            action = %decision.signal.action,
                            price,
                            z_score = decision.signal.metadata.z_score,
                            position = next,
                            "Signal emitted"
                        );
                        state.position = next;
                        TickOutcome::Signal(decision.signal)
                    }
                    None => {
                        debug!(
                            symbol,
                            price,
                            lower = stats.lower_band,
                            upper = stats.upper_band,
                            position = state.position,
                            "No signal"
                        );
                        TickOutcome::NoSignal { stats }
                    }
                }
            }
        };

        state.window.append(price);
        state.last_timestamp = Some(timestamp);
        Ok(outcome)
    }

    pub fn on_tick(&self, tick: &PriceTick) -> Result<TickOutcome, EngineError> {
        self.on_market_data(&tick.symbol, tick.price, tick.volume, tick.timestamp)
    }

    /// Full risk verdict for a reported VaR. `exposure` is accepted for the
    /// host-facing signature and does not affect the result.
    pub fn risk_verdict(&self, var95: f64, exposure: f64) -> RiskVerdict {
        let verdict = self.risk_gate.check(var95, exposure);
        if let Some(violation) = verdict.violation() {
            warn!(var95, limit = self.risk_limit(), "Risk limit breached: {}", violation);
        }
        verdict
    }

    /// Largest VaR the gate still allows
    pub fn risk_limit(&self) -> f64 {
        self.risk_gate.limit()
    }

    /// `false` means the host should halt trading
    pub fn on_risk_update(&self, var95: f64, exposure: f64) -> bool {
        self.risk_verdict(var95, exposure).is_allowed()
    }

    /// Equal-weight fallback; the matrix's outer length is the asset count
    pub fn calculate_portfolio_weights<T>(&self, returns: &[T]) -> Result<Vec<f64>, EngineError> {
        Ok(fallback_weights(returns)?)
    }

    /// Net position for `symbol`, 0 when unseen
    pub fn position(&self, symbol: &str) -> i64 {
        self.symbols
            .read()
            .get(symbol)
            .map(|record| record.lock().position)
            .unwrap_or(0)
    }

    pub fn position_state(&self, symbol: &str) -> PositionState {
        PositionState::of(self.position(symbol))
    }

    /// Overwrite the net position for `symbol`, e.g. after reconciling with
    /// a broker. Creates the symbol if unseen.
    pub fn set_position(&self, symbol: &str, position: i64) {
        let record = self.record(symbol);
        record.lock().position = position;
    }

    /// Oldest-first copy of the symbol's window, empty when unseen
    pub fn window(&self, symbol: &str) -> Vec<f64> {
        self.symbols
            .read()
            .get(symbol)
            .map(|record| record.lock().window.snapshot())
            .unwrap_or_default()
    }

    /// Current bands for `symbol` over its stored window, without a tick
    pub fn band_outcome(&self, symbol: &str) -> BandOutcome {
        match self.symbols.read().get(symbol) {
            Some(record) => bands::compute(&record.lock().window, self.config.strategy.band_width),
            None => BandOutcome::Insufficient {
                have: 0,
                need: self.lookback(),
            },
        }
    }

    /// Known symbols in first-seen order
    pub fn symbols(&self) -> Vec<String> {
        let table = self.symbols.read();
        let mut symbols: Vec<(&String, &usize)> = table.index.iter().collect();
        symbols.sort_by_key(|(_, idx)| **idx);
        symbols.into_iter().map(|(symbol, _)| symbol.clone()).collect()
    }

    /// All positions sorted by symbol
    pub fn positions(&self) -> Vec<(String, i64)> {
        let table = self.symbols.read();
        let mut all: Vec<(String, i64)> = table
            .index
            .iter()
            .map(|(symbol, &idx)| (symbol.clone(), table.records[idx].lock().position))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Fetch or lazily create the record for `symbol`
    fn record(&self, symbol: &str) -> SymbolRecord {
        if let Some(record) = self.symbols.read().get(symbol) {
            return record;
        }

        let mut table = self.symbols.write();
        if let Some(record) = table.get(symbol) {
            return record;
        }
        let record = Arc::new(Mutex::new(SymbolState::new(self.lookback())));
        let idx = table.records.len();
        table.records.push(Arc::clone(&record));
        table.index.insert(symbol.to_string(), idx);
        debug!(symbol, idx, "Tracking new symbol");
        record
    }
}
