//! Synthetic Tick Source
//!
//! Seeded geometric random walk per symbol, for replaying the engine
//! without a live feed. Symbols are interleaved round-robin and share a
//! single logical clock.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::tick::PriceTick;

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub symbols: Vec<String>,
    pub start_price: f64,
    /// Per-tick standard deviation of log returns
    pub volatility: f64,
    pub seed: u64,
}

pub struct TickSimulator {
    config: SimulatorConfig,
    prices: Vec<f64>,
    rng: StdRng,
    clock: u64,
}

impl TickSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let prices = vec![config.start_price; config.symbols.len()];
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            prices,
            rng,
            clock: 0,
        }
    }

    /// Standard normal draw via Box-Muller
    fn standard_normal(&mut self) -> f64 {
        let u1: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

impl Iterator for TickSimulator {
    type Item = PriceTick;

    fn next(&mut self) -> Option<PriceTick> {
        if self.config.symbols.is_empty() {
            return None;
        }
        let idx = (self.clock % self.config.symbols.len() as u64) as usize;
        let z = self.standard_normal();
        self.prices[idx] *= (self.config.volatility * z).exp();

        let volume = self.rng.gen_range(1.0..1_000.0);
        let tick = PriceTick::new(
            self.config.symbols[idx].clone(),
            self.prices[idx],
            volume,
            self.clock,
        );
        self.clock += 1;
        Some(tick)
    }
}
