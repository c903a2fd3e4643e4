use crate::consts::{ALPHABET_SIZE, MAX_NGRAM_ORDER};
use crate::core_types::Letter;
use crate::error::{RfResult, RotorForgeError};

pub fn check_order(order: usize) -> RfResult<()> {
    if order == 0 || order > MAX_NGRAM_ORDER {
        return Err(RotorForgeError::Config(format!(
            "N-gram order {} outside 1..={}",
            order, MAX_NGRAM_ORDER
        )));
    }
    Ok(())
}

/// Base-26 index of every full n-gram window of `text`, left to right.
#[inline]
pub fn gram_indices(text: &[Letter], order: usize) -> impl Iterator<Item = usize> + '_ {
    let modulus = ALPHABET_SIZE.pow(order as u32);
    let mut idx = 0usize;
    text.iter().enumerate().filter_map(move |(i, &l)| {
        idx = (idx * ALPHABET_SIZE + l as usize) % modulus;
        (i + 1 >= order).then_some(idx)
    })
}

/// Reusable n-gram count table. Left zeroed after every call.
#[derive(Debug, Clone, Default)]
pub struct GramCounts {
    cells: Vec<u32>,
}

impl GramCounts {
    fn ensure(&mut self, order: usize) {
        let size = ALPHABET_SIZE.pow(order as u32);
        if self.cells.len() < size {
            self.cells.resize(size, 0);
        }
    }

    /// `26^n * sum f(f-1) / (N(N-1))`, or 0 for fewer than two n-grams.
    pub fn coincidence(&mut self, text: &[Letter], order: usize) -> f64 {
        let n = (text.len() + 1).saturating_sub(order);
        if n < 2 {
            return 0.0;
        }
        self.ensure(order);
        let mut pairs = 0u64;
        for idx in gram_indices(text, order) {
            let c = &mut self.cells[idx];
            pairs += 2 * *c as u64;
            *c += 1;
        }
        for idx in gram_indices(text, order) {
            self.cells[idx] = 0;
        }
        let size = ALPHABET_SIZE.pow(order as u32) as f64;
        size * pairs as f64 / (n as f64 * (n - 1) as f64)
    }

    /// Shannon entropy of the n-gram distribution, in bits.
    pub fn entropy(&mut self, text: &[Letter], order: usize) -> f64 {
        let n = (text.len() + 1).saturating_sub(order);
        if n == 0 {
            return 0.0;
        }
        self.ensure(order);
        for idx in gram_indices(text, order) {
            self.cells[idx] += 1;
        }
        // Each distinct gram is folded in once, on first sight, and cleared.
        let mut sum_f_log_f = 0.0;
        for idx in gram_indices(text, order) {
            let f = self.cells[idx];
            if f > 0 {
                let f = f as f64;
                sum_f_log_f += f * f.log2();
                self.cells[idx] = 0;
            }
        }
        let n = n as f64;
        n.log2() - sum_f_log_f / n
    }
}

pub fn index_of_coincidence(text: &[Letter], order: usize) -> RfResult<f64> {
    check_order(order)?;
    Ok(GramCounts::default().coincidence(text, order))
}

pub fn entropy(text: &[Letter], order: usize) -> RfResult<f64> {
    check_order(order)?;
    Ok(GramCounts::default().entropy(text, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Message;

    #[test]
    fn test_gram_indices() {
        let m = Message::from_text("abcb");
        let idx: Vec<usize> = gram_indices(&m, 2).collect();
        assert_eq!(idx, vec![1, 28, 2 * 26 + 1]);
    }

    #[test]
    fn test_counts_are_reset() {
        let mut counts = GramCounts::default();
        let m = Message::from_text("aabbcc");
        let first = counts.coincidence(&m, 1);
        assert_eq!(counts.coincidence(&m, 1), first);
        assert!(counts.cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_entropy_uniform() {
        let m = Message::from_text("abcd");
        assert!((entropy(&m, 1).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(entropy(&Message::from_text("zzzz"), 1).unwrap(), 0.0);
    }
}
