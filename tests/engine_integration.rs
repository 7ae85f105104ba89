//! Band Reversion Engine Integration Tests
//!
//! End-to-end checks through the public API:
//! 1. Worked tick sequences (insufficient history, degenerate variance, BUY)
//! 2. Position bookkeeping across BUY/SELL cycles
//! 3. Risk gate boundary and weight fallback
//! 4. Cross-symbol concurrency
//! 5. Property tests over arbitrary price streams
//!
//! All tests are deterministic and use in-memory data.

use loco_hft::adapters::{TickReader, TickSimulator, SimulatorConfig};
use loco_hft::domain::{PaperPortfolio, PositionState};
use loco_hft::{EngineConfig, EngineError, PriceTick, ReversionEngine, SignalAction, TickOutcome};
use proptest::prelude::*;
use std::io::Cursor;

// ============================================================================
// Test Fixtures
// ============================================================================

fn create_engine(lookback: usize) -> ReversionEngine {
    ReversionEngine::with_capital(100_000.0, lookback).unwrap()
}

fn feed(engine: &ReversionEngine, symbol: &str, prices: &[f64]) -> Vec<TickOutcome> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| engine.on_market_data(symbol, price, 10.0, i as u64).unwrap())
        .collect()
}

// ============================================================================
// Worked Sequences
// ============================================================================

#[test]
fn test_constant_prices_then_drop_is_degenerate() {
    let engine = create_engine(5);
    let outcomes = feed(&engine, "X", &[10.0, 10.0, 10.0, 10.0, 10.0, 4.0]);

    for outcome in &outcomes[..5] {
        assert!(outcome.is_insufficient());
    }
    assert_eq!(outcomes[5], TickOutcome::DegenerateVariance { mean: 10.0 });
    assert_eq!(engine.position("X"), 0);
}

#[test]
fn test_drop_below_lower_band_buys() {
    let engine = create_engine(3);
    let outcomes = feed(&engine, "Y", &[100.0, 102.0, 98.0, 80.0]);

    assert!(outcomes[..3].iter().all(TickOutcome::is_insufficient));
    let signal = outcomes[3].signal().expect("BUY on tick 4");
    assert_eq!(signal.action, SignalAction::Buy);
    assert_eq!(signal.size, 100.0);
    assert!((signal.metadata.mean - 100.0).abs() < 1e-9);
    assert!((signal.metadata.std_dev - 1.633).abs() < 1e-3);
    assert!((signal.metadata.lower_band - 96.73).abs() < 1e-2);
    assert_eq!(engine.position("Y"), 100);
}

#[test]
fn test_buy_sell_cycle() {
    let engine = create_engine(4);
    feed(&engine, "Z", &[100.0, 101.0, 99.0, 100.0]);

    let buy = engine.on_market_data("Z", 90.0, 1.0, 4).unwrap();
    assert_eq!(buy.signal().map(|s| s.action), Some(SignalAction::Buy));
    assert_eq!(engine.position_state("Z"), PositionState::Long);

    // Still long: a further drop cannot BUY again
    let again = engine.on_market_data("Z", 70.0, 1.0, 5).unwrap();
    assert!(again.signal().is_none());
    assert_eq!(engine.position("Z"), 100);

    let sell = engine.on_market_data("Z", 200.0, 1.0, 6).unwrap();
    assert_eq!(sell.signal().map(|s| s.action), Some(SignalAction::Sell));
    assert_eq!(engine.position("Z"), 0);

    let sell_again = engine.on_market_data("Z", 400.0, 1.0, 7).unwrap();
    assert_eq!(sell_again.signal().map(|s| s.action), Some(SignalAction::Sell));
    assert_eq!(engine.position_state("Z"), PositionState::Short);
}

#[test]
fn test_paper_fills_follow_signals() {
    let engine = create_engine(4);
    let mut portfolio = PaperPortfolio::new();
    let prices = [100.0, 101.0, 99.0, 100.0, 90.0, 70.0, 200.0, 400.0];

    for signal in feed(&engine, "Z", &prices).into_iter().filter_map(TickOutcome::into_signal) {
        portfolio.execute(&signal);
    }

    // BUY 100 @ 90, SELL 100 @ 200 closes for +11000, SELL 100 @ 400 opens short
    let holding = portfolio.holding("Z").copied().unwrap();
    assert_eq!(portfolio.fill_count(), 3);
    assert!((holding.realized_pnl - 11_000.0).abs() < 1e-9);
    assert_eq!(holding.quantity, engine.position("Z") as f64);
    assert_eq!(holding.avg_price, 400.0);
    assert!((holding.unrealized_pnl(350.0) - 5_000.0).abs() < 1e-9);
}

#[test]
fn test_replay_from_tick_file() {
    let lines = [100.0, 102.0, 98.0, 80.0]
        .iter()
        .enumerate()
        .map(|(i, p)| format!(r#"{{"symbol":"Y","price":{},"volume":1.0,"timestamp":{}}}"#, p, i))
        .collect::<Vec<_>>()
        .join("\n");

    let engine = create_engine(3);
    let signals: Vec<_> = TickReader::new(Cursor::new(lines))
        .map(|tick| engine.on_tick(&tick.unwrap()).unwrap())
        .filter_map(TickOutcome::into_signal)
        .collect();

    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].timestamp, 3);
}

// ============================================================================
// Risk Gate and Weights
// ============================================================================

#[test]
fn test_risk_gate_uses_construction_capital() {
    let engine = ReversionEngine::with_capital(50_000.0, 20).unwrap();
    assert!(engine.on_risk_update(1_000.0, 123_456.0));
    assert!(!engine.on_risk_update(1_000.01, 0.0));
}

#[test]
fn test_weight_fallback() {
    let engine = ReversionEngine::default();
    let four = vec![vec![0.0; 10]; 4];
    assert_eq!(engine.calculate_portfolio_weights(&four).unwrap(), vec![0.25; 4]);

    let none: Vec<Vec<f64>> = vec![];
    assert!(matches!(
        engine.calculate_portfolio_weights(&none),
        Err(EngineError::InvalidWeights(_))
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = EngineConfig::default();
    config.capital = -1.0;
    assert!(matches!(ReversionEngine::new(config), Err(EngineError::Config(_))));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_symbols_processed_concurrently_match_sequential() {
    let symbols: Vec<String> = (0..8).map(|i| format!("S{}", i)).collect();
    let streams: Vec<Vec<PriceTick>> = symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            TickSimulator::new(SimulatorConfig {
                symbols: vec![symbol.clone()],
                start_price: 100.0,
                volatility: 0.02,
                seed: i as u64,
            })
            .take(400)
            .collect()
        })
        .collect();

    let sequential = create_engine(10);
    for stream in &streams {
        for tick in stream {
            sequential.on_tick(tick).unwrap();
        }
    }

    let concurrent = create_engine(10);
    std::thread::scope(|scope| {
        for stream in &streams {
            let engine = &concurrent;
            scope.spawn(move || {
                for tick in stream {
                    engine.on_tick(tick).unwrap();
                }
            });
        }
    });

    assert_eq!(concurrent.positions(), sequential.positions());
    for symbol in &symbols {
        assert_eq!(concurrent.window(symbol), sequential.window(symbol));
    }
}

#[test]
fn test_shared_symbol_keeps_invariants() {
    let engine = create_engine(5);
    std::thread::scope(|scope| {
        for t in 0..4u64 {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..250u64 {
                    let price = 100.0 + ((i * 7 + t * 13) % 23) as f64;
                    engine.on_market_data("SHARED", price, 1.0, i).unwrap();
                }
            });
        }
    });

    assert_eq!(engine.window("SHARED").len(), 5);
    assert!((-100..=100).contains(&engine.position("SHARED")));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_insufficient_exactly_until_lookback(
        lookback in 1usize..12,
        prices in prop::collection::vec(1.0f64..1_000.0, 1..60),
    ) {
        let engine = create_engine(lookback);
        for (i, outcome) in feed(&engine, "P", &prices).iter().enumerate() {
            prop_assert_eq!(outcome.is_insufficient(), i < lookback);
        }
    }

    #[test]
    fn prop_window_holds_last_lookback_prices(
        lookback in 1usize..12,
        prices in prop::collection::vec(1.0f64..1_000.0, 1..60),
    ) {
        let engine = create_engine(lookback);
        feed(&engine, "P", &prices);
        let start = prices.len().saturating_sub(lookback);
        prop_assert_eq!(engine.window("P"), prices[start..].to_vec());
    }

    #[test]
    fn prop_constant_stream_never_signals(
        lookback in 1usize..25,
        price in 0.01f64..10_000.0,
        extra in 1usize..20,
        start_position in -500i64..500,
    ) {
        let engine = create_engine(lookback);
        engine.set_position("C", start_position);
        let prices = vec![price; lookback + extra];
        for outcome in feed(&engine, "C", &prices) {
            prop_assert!(outcome.signal().is_none());
        }
        prop_assert_eq!(engine.position("C"), start_position);
    }

    #[test]
    fn prop_position_moves_by_signal_size(
        lookback in 2usize..8,
        prices in prop::collection::vec(1.0f64..200.0, 2..80),
    ) {
        let engine = create_engine(lookback);
        for (i, &price) in prices.iter().enumerate() {
            let before = engine.position("M");
            let outcome = engine.on_market_data("M", price, 1.0, i as u64).unwrap();
            let after = engine.position("M");
            match outcome.signal().map(|s| s.action) {
                Some(SignalAction::Buy) => {
                    prop_assert!(before <= 0);
                    prop_assert_eq!(after, before + 100);
                }
                Some(SignalAction::Sell) => {
                    prop_assert!(before >= 0);
                    prop_assert_eq!(after, before - 100);
                }
                None => prop_assert_eq!(after, before),
            }
        }
    }

    #[test]
    fn prop_risk_boundary_exclusive(
        capital in 1.0f64..1e9,
        eps in 1e-3f64..1e3,
        exposure in -1e9f64..1e9,
    ) {
        let engine = ReversionEngine::with_capital(capital, 20).unwrap();
        let limit = capital * 0.02;
        prop_assert!(engine.on_risk_update(limit, exposure));
        prop_assert!(!engine.on_risk_update(limit + eps, exposure));
    }
}
