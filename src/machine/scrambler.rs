use super::key::Key;
use super::plugboard::Plugboard;
use super::stepping::{scramble_letter, step};
use super::wiring::Substitution;
use crate::core_types::Letter;
use crate::error::RfResult;

/// Per-position substitutions of the rotor stack for one mechanical key.
/// Plugboard search reads these instead of re-running the wheels.
#[derive(Debug, Clone, Default)]
pub struct Scrambler {
    table: Vec<Substitution>,
}

impl Scrambler {
    pub fn new(len: usize) -> RfResult<Self> {
        let mut table = Vec::new();
        table.try_reserve_exact(len)?;
        table.resize(len, Substitution::identity());
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline(always)]
    pub fn at(&self, i: usize) -> &Substitution {
        &self.table[i]
    }

    /// Refills the table for `key`. The key's positions are the same on return.
    pub fn generate(&mut self, key: &mut Key) {
        let saved = key.positions();
        for entry in self.table.iter_mut() {
            step(key);
            let k = &*key;
            entry.fill_from(|x| scramble_letter(x, k));
        }
        key.set_positions(&saved);
    }

    /// Writes the hypothesis plaintext of `ciphertext` under `plugboard` into `out`.
    #[inline]
    pub fn decrypt_into(&self, plugboard: &Plugboard, ciphertext: &[Letter], out: &mut Vec<Letter>) {
        out.clear();
        out.extend(
            ciphertext
                .iter()
                .zip(&self.table)
                .map(|(&c, sub)| plugboard.get(sub.forward(plugboard.get(c)))),
        );
    }
}
