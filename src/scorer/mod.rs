pub mod loader;
pub mod measures;
pub mod ngrams;
pub mod trie;

pub use self::measures::{entropy, index_of_coincidence, GramCounts};
pub use self::ngrams::NgramTable;
pub use self::trie::Trie;

use crate::core_types::Letter;
use crate::error::RfResult;
use crate::machine::{Plugboard, Scrambler};
use std::fmt;
use std::sync::Arc;

/// A statistical measure of plaintext quality. Higher is better.
#[derive(Debug, Clone)]
pub enum Measure {
    IndexOfCoincidence { order: usize },
    /// Ranked by negated entropy, so flatter text scores lower.
    Entropy { order: usize },
    Ngram(Arc<NgramTable>),
    Trie(Arc<Trie>),
}

impl Measure {
    pub fn index_of_coincidence(order: usize) -> RfResult<Self> {
        measures::check_order(order)?;
        Ok(Self::IndexOfCoincidence { order })
    }

    pub fn entropy(order: usize) -> RfResult<Self> {
        measures::check_order(order)?;
        Ok(Self::Entropy { order })
    }

    /// Whether scores of `self` and `other` are comparable.
    pub fn same_as(&self, other: &Measure) -> bool {
        match (self, other) {
            (Self::IndexOfCoincidence { order: a }, Self::IndexOfCoincidence { order: b }) => a == b,
            (Self::Entropy { order: a }, Self::Entropy { order: b }) => a == b,
            (Self::Ngram(a), Self::Ngram(b)) => Arc::ptr_eq(a, b),
            (Self::Trie(a), Self::Trie(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    #[inline]
    pub fn score_text(&self, text: &[Letter], counts: &mut GramCounts) -> f64 {
        match self {
            Self::IndexOfCoincidence { order } => counts.coincidence(text, *order),
            Self::Entropy { order } => -counts.entropy(text, *order),
            Self::Ngram(table) => table.score(text),
            Self::Trie(trie) => trie.score(text),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOfCoincidence { order } => write!(f, "ic{}", order),
            Self::Entropy { order } => write!(f, "entropy{}", order),
            Self::Ngram(t) => write!(f, "ngram{}", t.order()),
            Self::Trie(t) => write!(f, "trie({} words)", t.len()),
        }
    }
}

/// Per-worker scoring workspace: plaintext buffer, count scratch and a decrypt counter.
#[derive(Debug, Default)]
pub struct Evaluator {
    plaintext: Vec<Letter>,
    counts: GramCounts,
    decrypts: u64,
}

impl Evaluator {
    pub fn new(len: usize) -> RfResult<Self> {
        let mut plaintext = Vec::new();
        plaintext.try_reserve_exact(len)?;
        Ok(Self {
            plaintext,
            counts: GramCounts::default(),
            decrypts: 0,
        })
    }

    /// Decrypts `ciphertext` under `plugboard` and scores it.
    #[inline]
    pub fn score(
        &mut self,
        measure: &Measure,
        scrambler: &Scrambler,
        plugboard: &Plugboard,
        ciphertext: &[Letter],
    ) -> f64 {
        scrambler.decrypt_into(plugboard, ciphertext, &mut self.plaintext);
        self.decrypts += 1;
        measure.score_text(&self.plaintext, &mut self.counts)
    }

    /// Plaintext of the last scored decryption.
    pub fn plaintext(&self) -> &[Letter] {
        &self.plaintext
    }

    pub fn decrypts(&self) -> u64 {
        self.decrypts
    }

    /// Returns the decrypts counted since the last call and resets the counter.
    pub fn take_decrypts(&mut self) -> u64 {
        std::mem::take(&mut self.decrypts)
    }
}
