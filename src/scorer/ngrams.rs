use super::measures::{check_order, gram_indices};
use crate::consts::{ALPHABET_SIZE, NGRAM_FLOOR_DIVISOR};
use crate::core_types::{Letter, Message};
use crate::error::{RfResult, RotorForgeError};
use tracing::debug;

/// Natural-log probabilities of n-grams relative to the most frequent one.
#[derive(Debug, Clone)]
pub struct NgramTable {
    order: usize,
    values: Vec<f64>,
    floor: f64,
}

impl NgramTable {
    /// Builds the table from `(gram, frequency)` pairs. Repeated grams add up.
    pub fn from_entries(order: usize, entries: &[(Message, f64)]) -> RfResult<Self> {
        check_order(order)?;
        if entries.is_empty() {
            return Err(RotorForgeError::Config(format!(
                "No entries for the {}-gram table",
                order
            )));
        }

        let mut freqs = vec![0.0f64; ALPHABET_SIZE.pow(order as u32)];
        for (gram, freq) in entries {
            if gram.len() != order {
                return Err(RotorForgeError::Config(format!(
                    "N-gram '{}' has length {}, expected {}",
                    gram,
                    gram.len(),
                    order
                )));
            }
            if !freq.is_finite() || *freq <= 0.0 {
                return Err(RotorForgeError::Config(format!(
                    "N-gram '{}' has invalid frequency {}",
                    gram, freq
                )));
            }
            // A full-length gram yields exactly one index.
            if let Some(idx) = gram_indices(gram, order).next() {
                freqs[idx] += freq;
            }
        }

        let seen = freqs.iter().copied().filter(|&f| f > 0.0);
        let (min, max) = seen.fold((f64::INFINITY, 0.0f64), |(lo, hi), f| (lo.min(f), hi.max(f)));
        let floor = (min / (NGRAM_FLOOR_DIVISOR * max)).ln();
        let values = freqs
            .into_iter()
            .map(|f| if f > 0.0 { (f / max).ln() } else { floor })
            .collect();

        debug!(order, entries = entries.len(), floor, "Built n-gram table");
        Ok(Self {
            order,
            values,
            floor,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Log-probability of one gram given as letters.
    pub fn value(&self, gram: &[Letter]) -> f64 {
        gram_indices(gram, self.order)
            .next()
            .map(|i| self.values[i])
            .unwrap_or(self.floor)
    }

    /// Mean log-probability over every full n-gram of `text`.
    pub fn score(&self, text: &[Letter]) -> f64 {
        if text.len() < self.order {
            return self.floor;
        }
        let sum: f64 = gram_indices(text, self.order).map(|i| self.values[i]).sum();
        sum / (text.len() + 1 - self.order) as f64
    }
}
