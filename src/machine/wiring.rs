use crate::consts::ALPHABET_SIZE;
use crate::core_types::{letter_from_char, shift, write_letters, Letter};
use crate::error::{RfResult, RotorForgeError};
use std::fmt;

/// A bijection over the alphabet, kept together with its inverse.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Substitution {
    forward: [Letter; ALPHABET_SIZE],
    inverse: [Letter; ALPHABET_SIZE],
}

impl Default for Substitution {
    fn default() -> Self {
        Self::identity()
    }
}

impl Substitution {
    pub fn identity() -> Self {
        let mut forward = [0; ALPHABET_SIZE];
        for (i, slot) in forward.iter_mut().enumerate() {
            *slot = i as Letter;
        }
        Self {
            forward,
            inverse: forward,
        }
    }

    pub fn from_forward(forward: [Letter; ALPHABET_SIZE]) -> RfResult<Self> {
        let mut inverse = [Letter::MAX; ALPHABET_SIZE];
        for (x, &y) in forward.iter().enumerate() {
            if y as usize >= ALPHABET_SIZE {
                return Err(RotorForgeError::Config(format!(
                    "Substitution maps to letter value {}",
                    y
                )));
            }
            if inverse[y as usize] != Letter::MAX {
                return Err(RotorForgeError::Config(format!(
                    "Substitution is not a bijection: letter '{}' is hit twice",
                    (b'a' + y) as char
                )));
            }
            inverse[y as usize] = x as Letter;
        }
        Ok(Self { forward, inverse })
    }

    /// Parses a 26-letter wiring string such as `"ekmflgdqvzntowyhxuspaibrcj"`.
    pub fn parse(wiring: &str) -> RfResult<Self> {
        let letters: Vec<Letter> = wiring
            .chars()
            .map(|c| {
                letter_from_char(c).ok_or_else(|| {
                    RotorForgeError::Config(format!("Invalid character '{}' in wiring", c))
                })
            })
            .collect::<RfResult<_>>()?;
        let forward: [Letter; ALPHABET_SIZE] = letters.try_into().map_err(|v: Vec<Letter>| {
            RotorForgeError::Config(format!(
                "Wiring '{}' has {} letters, expected {}",
                wiring,
                v.len(),
                ALPHABET_SIZE
            ))
        })?;
        Self::from_forward(forward)
    }

    #[inline(always)]
    pub fn forward(&self, x: Letter) -> Letter {
        self.forward[x as usize]
    }

    #[inline(always)]
    pub fn inverse(&self, x: Letter) -> Letter {
        self.inverse[x as usize]
    }

    pub fn forward_map(&self) -> &[Letter; ALPHABET_SIZE] {
        &self.forward
    }

    /// Overwrites the table from `f`, which must be a bijection.
    pub(crate) fn fill_from(&mut self, mut f: impl FnMut(Letter) -> Letter) {
        for x in 0..ALPHABET_SIZE as Letter {
            let y = f(x);
            self.forward[x as usize] = y;
            self.inverse[y as usize] = x;
        }
    }

    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }

    pub fn has_fixed_point(&self) -> bool {
        self.forward.iter().enumerate().any(|(x, &y)| x == y as usize)
    }

    /// Smallest `s > 0` such that shifting the wiring by `s` letters leaves it
    /// unchanged, i.e. `f(x + s) - s == f(x)` for every `x`. Always divides 26.
    pub fn shift_period(&self) -> u32 {
        (1..ALPHABET_SIZE as u32)
            .filter(|s| ALPHABET_SIZE as u32 % s == 0)
            .find(|&s| {
                (0..ALPHABET_SIZE as Letter).all(|x| {
                    shift(self.forward(shift(x, s as i32)), -(s as i32)) == self.forward(x)
                })
            })
            .unwrap_or(ALPHABET_SIZE as u32)
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_letters(f, &self.forward)
    }
}
