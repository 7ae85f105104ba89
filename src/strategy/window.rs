//! Rolling Price Window
//!
//! Bounded FIFO of the most recent prices for one symbol. The window does
//! not validate prices; callers only append values that passed tick
//! validation.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct PriceWindow {
    capacity: usize,
    prices: VecDeque<f64>,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            prices: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append a price, evicting the oldest once over capacity. Returns the
    /// number of prices held afterwards.
    pub fn append(&mut self, price: f64) -> usize {
        self.prices.push_back(price);
        while self.prices.len() > self.capacity {
            self.prices.pop_front();
        }
        self.prices.len()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Full lookback accumulated
    pub fn is_ready(&self) -> bool {
        self.prices.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }

    /// Oldest-first copy of the window contents
    pub fn snapshot(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }
}
