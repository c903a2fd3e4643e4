use crate::consts::{ALPHABET_SIZE, FULL_MASK_BITS};
use crate::error::{RfResult, RotorForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// A letter of the machine alphabet, `0..26`.
pub type Letter = u8;

#[inline(always)]
pub fn letter_from_char(c: char) -> Option<Letter> {
    if c.is_ascii_alphabetic() {
        Some(c.to_ascii_lowercase() as u8 - b'a')
    } else {
        None
    }
}

#[inline(always)]
pub fn letter_to_char(l: Letter) -> char {
    (b'a' + l) as char
}

/// Adds `by` to `l` modulo the alphabet size. `by` may be negative.
#[inline(always)]
pub fn shift(l: Letter, by: i32) -> Letter {
    (l as i32 + by).rem_euclid(ALPHABET_SIZE as i32) as Letter
}

/// Set of letters stored as a 26-bit mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterMask(u32);

impl LetterMask {
    pub const EMPTY: LetterMask = LetterMask(0);
    pub const FULL: LetterMask = LetterMask(FULL_MASK_BITS);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits & FULL_MASK_BITS)
    }

    pub fn single(l: Letter) -> Self {
        Self(1 << l)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn contains(self, l: Letter) -> bool {
        self.0 & (1 << l) != 0
    }

    pub fn insert(&mut self, l: Letter) {
        self.0 |= 1 << l;
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn first(self) -> Option<Letter> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as Letter)
        }
    }

    /// Smallest member strictly greater than `l`.
    pub fn next_after(self, l: Letter) -> Option<Letter> {
        let rest = self.0 & !((2u32 << l) - 1);
        LetterMask(rest).first()
    }

    /// The mask rotated so that every member moves up by `by` letters.
    pub fn rotated(self, by: u32) -> Self {
        let by = by % ALPHABET_SIZE as u32;
        if by == 0 {
            return self;
        }
        let n = ALPHABET_SIZE as u32;
        Self(((self.0 << by) | (self.0 >> (n - by))) & FULL_MASK_BITS)
    }

    pub fn iter(self) -> impl Iterator<Item = Letter> {
        (0..ALPHABET_SIZE as Letter).filter(move |&l| self.contains(l))
    }
}

impl FromStr for LetterMask {
    type Err = RotorForgeError;

    /// Accepts letters (`"aez"`), ranges (`"a-e"`) and `"*"` for the whole alphabet.
    fn from_str(s: &str) -> RfResult<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let mut mask = LetterMask::EMPTY;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '*' {
                return Ok(LetterMask::FULL);
            }
            let from = letter_from_char(c)
                .ok_or_else(|| RotorForgeError::Config(format!("Invalid letter '{}' in '{}'", c, s)))?;
            if i + 2 < chars.len() && chars[i + 1] == '-' {
                let to = letter_from_char(chars[i + 2]).ok_or_else(|| {
                    RotorForgeError::Config(format!("Invalid range end in '{}'", s))
                })?;
                if to < from {
                    return Err(RotorForgeError::Config(format!(
                        "Descending range in '{}'",
                        s
                    )));
                }
                for l in from..=to {
                    mask.insert(l);
                }
                i += 3;
            } else {
                mask.insert(from);
                i += 1;
            }
        }
        Ok(mask)
    }
}

impl fmt::Display for LetterMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for l in self.iter() {
            write!(f, "{}", letter_to_char(l))?;
        }
        Ok(())
    }
}

/// An immutable-length sequence of letters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Message(Vec<Letter>);

impl Message {
    pub fn from_letters(letters: Vec<Letter>) -> RfResult<Self> {
        if let Some(&bad) = letters.iter().find(|&&l| l as usize >= ALPHABET_SIZE) {
            return Err(RotorForgeError::Validation(format!(
                "Letter value {} outside the alphabet",
                bad
            )));
        }
        Ok(Self(letters))
    }

    /// For letters produced by the machine itself, already in range.
    pub(crate) fn from_trusted(letters: Vec<Letter>) -> Self {
        Self(letters)
    }

    /// Keeps the ASCII letters of `text`, case-insensitively, and drops the rest.
    pub fn from_text(text: &str) -> Self {
        Self(text.chars().filter_map(letter_from_char).collect())
    }

    pub fn letters(&self) -> &[Letter] {
        &self.0
    }

    pub fn into_letters(self) -> Vec<Letter> {
        self.0
    }
}

impl Deref for Message {
    type Target = [Letter];

    fn deref(&self) -> &[Letter] {
        &self.0
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::from_text(text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_letters(f, &self.0)
    }
}

pub fn write_letters(f: &mut fmt::Formatter<'_>, letters: &[Letter]) -> fmt::Result {
    for &l in letters {
        write!(f, "{}", letter_to_char(l))?;
    }
    Ok(())
}

pub fn letters_to_string(letters: &[Letter]) -> String {
    letters.iter().map(|&l| letter_to_char(l)).collect()
}
