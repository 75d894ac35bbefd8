//! Transient resource pool
//!
//! Resource production and payment are not modelled. The pool exists so that
//! the end-of-step emptying turn-based action has something to empty.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "W"),
            Color::Blue => write!(f, "U"),
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
            Color::Green => write!(f, "G"),
            Color::Colorless => write!(f, "C"),
        }
    }
}

/// Per-color resource counts held by a player until the end of the step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    counts: [u8; 6],
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(color: Color) -> usize {
        match color {
            Color::White => 0,
            Color::Blue => 1,
            Color::Black => 2,
            Color::Red => 3,
            Color::Green => 4,
            Color::Colorless => 5,
        }
    }

    pub fn add(&mut self, color: Color, amount: u8) {
        let slot = &mut self.counts[Self::slot(color)];
        *slot = slot.saturating_add(amount);
    }

    pub fn get(&self, color: Color) -> u8 {
        self.counts[Self::slot(color)]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&mut self) {
        self.counts = [0; 6];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_add_and_clear() {
        let mut pool = ResourcePool::new();
        assert!(pool.is_empty());

        pool.add(Color::Red, 2);
        pool.add(Color::Colorless, 1);
        assert_eq!(pool.get(Color::Red), 2);
        assert_eq!(pool.total(), 3);

        pool.clear();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_saturates() {
        let mut pool = ResourcePool::new();
        pool.add(Color::Green, 250);
        pool.add(Color::Green, 10);
        assert_eq!(pool.get(Color::Green), u8::MAX);
    }
}
