use crate::consts::ALPHABET_SIZE;
use crate::core_types::{letter_from_char, letter_to_char, Letter};
use crate::error::{RfResult, RotorForgeError};
use std::fmt;
use std::str::FromStr;

/// Self-inverse permutation applied on both sides of the rotor stack.
/// Unplugged letters map to themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Plugboard {
    map: [Letter; ALPHABET_SIZE],
}

impl Default for Plugboard {
    fn default() -> Self {
        Self::identity()
    }
}

impl Plugboard {
    pub fn identity() -> Self {
        let mut map = [0; ALPHABET_SIZE];
        for (i, slot) in map.iter_mut().enumerate() {
            *slot = i as Letter;
        }
        Self { map }
    }

    /// Plugboard with the single cable `a`-`b`.
    pub fn with_pair(a: Letter, b: Letter) -> Self {
        let mut pb = Self::identity();
        pb.map[a as usize] = b;
        pb.map[b as usize] = a;
        pb
    }

    /// Parses cable pairs such as `"ab cd ef"`.
    pub fn from_pairs(pairs: &str) -> RfResult<Self> {
        let mut pb = Self::identity();
        for token in pairs.split_whitespace() {
            let letters: Vec<Letter> = token.chars().filter_map(letter_from_char).collect();
            if letters.len() != 2 || token.chars().count() != 2 {
                return Err(RotorForgeError::Config(format!(
                    "Plug '{}' must be exactly two letters",
                    token
                )));
            }
            let (a, b) = (letters[0], letters[1]);
            if a == b {
                return Err(RotorForgeError::Config(format!(
                    "Plug '{}' connects a letter to itself",
                    token
                )));
            }
            if !pb.is_free(a) || !pb.is_free(b) {
                return Err(RotorForgeError::Config(format!(
                    "Plug '{}' reuses an already plugged letter",
                    token
                )));
            }
            pb.map[a as usize] = b;
            pb.map[b as usize] = a;
        }
        Ok(pb)
    }

    #[inline(always)]
    pub fn get(&self, x: Letter) -> Letter {
        self.map[x as usize]
    }

    #[inline(always)]
    pub fn is_free(&self, x: Letter) -> bool {
        self.map[x as usize] == x
    }

    pub fn plug_count(&self) -> usize {
        self.map
            .iter()
            .enumerate()
            .filter(|&(i, &p)| i != p as usize)
            .count()
            / 2
    }

    /// Cables as `(low, high)` pairs in ascending order.
    pub fn pairs(&self) -> Vec<(Letter, Letter)> {
        self.map
            .iter()
            .enumerate()
            .filter(|&(i, &p)| (i as Letter) < p)
            .map(|(i, &p)| (i as Letter, p))
            .collect()
    }

    pub fn is_involution(&self) -> bool {
        (0..ALPHABET_SIZE).all(|x| self.map[self.map[x] as usize] as usize == x)
    }

    /// Exchanges the entries of `x` and `y`. Keeps the involution when both
    /// letters are free (plugs them) or plugged to each other (unplugs them).
    #[inline(always)]
    pub(crate) fn swap_cells(&mut self, x: Letter, y: Letter) {
        self.map.swap(x as usize, y as usize);
    }

    pub(crate) fn unplug(&mut self, x: Letter) {
        let y = self.map[x as usize];
        self.map[x as usize] = x;
        self.map[y as usize] = y;
    }

    pub(crate) fn plug(&mut self, x: Letter, y: Letter) {
        self.map[x as usize] = y;
        self.map[y as usize] = x;
    }
}

impl FromStr for Plugboard {
    type Err = RotorForgeError;

    fn from_str(s: &str) -> RfResult<Self> {
        Self::from_pairs(s)
    }
}

impl fmt::Display for Plugboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return f.write_str("-");
        }
        for (n, (a, b)) in pairs.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", letter_to_char(*a), letter_to_char(*b))?;
        }
        Ok(())
    }
}
