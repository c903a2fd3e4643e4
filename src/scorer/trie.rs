use crate::consts::ALPHABET_SIZE;
use crate::core_types::{Letter, Message};
use crate::error::{RfResult, RotorForgeError};
use tracing::debug;

const NO_CHILD: u32 = 0;

#[derive(Debug, Clone)]
struct TrieNode {
    children: [u32; ALPHABET_SIZE],
    value: f64,
}

impl TrieNode {
    fn empty() -> Self {
        Self {
            children: [NO_CHILD; ALPHABET_SIZE],
            value: 0.0,
        }
    }
}

/// Weighted crib words. Node 0 is the root; a child index of 0 means no child.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    words: usize,
}

impl Trie {
    pub fn from_words(words: &[(Message, f64)]) -> RfResult<Self> {
        let mut nodes = vec![TrieNode::empty()];
        for (word, value) in words {
            if word.is_empty() {
                return Err(RotorForgeError::Config("Empty crib word".into()));
            }
            if !value.is_finite() {
                return Err(RotorForgeError::Config(format!(
                    "Crib '{}' has invalid value {}",
                    word, value
                )));
            }
            let mut node = 0usize;
            for &l in word.iter() {
                let next = nodes[node].children[l as usize];
                node = if next == NO_CHILD {
                    let fresh = nodes.len();
                    nodes.push(TrieNode::empty());
                    nodes[node].children[l as usize] = fresh as u32;
                    fresh
                } else {
                    next as usize
                };
            }
            nodes[node].value += value;
        }
        debug!(words = words.len(), nodes = nodes.len(), "Built crib trie");
        Ok(Self {
            nodes,
            words: words.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Sum, over every start position, of the values met along the matching walk.
    pub fn score(&self, text: &[Letter]) -> f64 {
        let mut total = 0.0;
        for start in 0..text.len() {
            let mut node = 0usize;
            for &l in &text[start..] {
                let next = self.nodes[node].children[l as usize];
                if next == NO_CHILD {
                    break;
                }
                node = next as usize;
                total += self.nodes[node].value;
            }
        }
        total
    }
}
