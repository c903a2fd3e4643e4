use super::wheel::Wheel;
use super::wiring::Substitution;
use crate::core_types::LetterMask;
use crate::error::{RfResult, RotorForgeError};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Service wheels of the three- and four-wheel machines.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum KnownWheel {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    VIII,
    #[strum(serialize = "Beta")]
    Beta,
    #[strum(serialize = "Gamma")]
    Gamma,
    #[strum(serialize = "UKW-A")]
    UkwA,
    #[strum(serialize = "UKW-B")]
    UkwB,
    #[strum(serialize = "UKW-C")]
    UkwC,
    #[strum(serialize = "UKW-B-thin")]
    UkwBThin,
    #[strum(serialize = "UKW-C-thin")]
    UkwCThin,
    #[strum(serialize = "ETW-ABC")]
    EtwAbc,
}

impl KnownWheel {
    /// (wiring, turnover, rotating)
    pub fn get_str(&self) -> (&'static str, &'static str, bool) {
        match self {
            Self::I => ("ekmflgdqvzntowyhxuspaibrcj", "q", true),
            Self::II => ("ajdksiruxblhwtmcqgznpyfvoe", "e", true),
            Self::III => ("bdfhjlcprtxvznyeiwgakmusqo", "v", true),
            Self::IV => ("esovpzjayquirhxlnftgkdcmwb", "j", true),
            Self::V => ("vzbrgityupsdnhlxawmjqofeck", "z", true),
            Self::VI => ("jpgvoumfyqbenhzrdkasxlictw", "zm", true),
            Self::VII => ("nzjhgrcxmyswboufaivlpekqdt", "zm", true),
            Self::VIII => ("fkqhtlxocbjspdzramewniuygv", "zm", true),

            // Fourth-slot wheels of the naval machine never move.
            Self::Beta => ("leyjvcnixwpbqmdrtakzgfuhos", "", false),
            Self::Gamma => ("fsokanuerhmbtiycwlqpzxvgjd", "", false),

            Self::UkwA => ("ejmzalyxvbwfcrquontspikhgd", "", false),
            Self::UkwB => ("yruhqsldpxngokmiebfzcwvjat", "", false),
            Self::UkwC => ("fvpjiaoyedrzxwgctkuqsbnmhl", "", false),
            Self::UkwBThin => ("enkqauywjicopblmdxzvfthrgs", "", false),
            Self::UkwCThin => ("rdobjntkvehmlfcwzaxgyipsuq", "", false),

            Self::EtwAbc => ("abcdefghijklmnopqrstuvwxyz", "", false),
        }
    }

    pub fn build(&self) -> RfResult<Wheel> {
        let (wiring, turnover, rotating) = self.get_str();
        let turnover: LetterMask = turnover.parse()?;
        Wheel::new(self.to_string(), Substitution::parse(wiring)?, turnover, rotating)
    }

    pub fn get_all() -> Vec<Self> {
        Self::iter().collect()
    }
}

/// Wheels addressable by name.
#[derive(Debug, Clone, Default)]
pub struct WheelCatalog {
    wheels: HashMap<String, Arc<Wheel>>,
    order: Vec<String>,
}

impl WheelCatalog {
    pub fn builtin() -> RfResult<Self> {
        let mut catalog = Self::default();
        for known in KnownWheel::iter() {
            catalog.insert(known.build()?)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, wheel: Wheel) -> RfResult<()> {
        if self.wheels.contains_key(&wheel.name) {
            return Err(RotorForgeError::Config(format!(
                "Wheel '{}' is defined twice",
                wheel.name
            )));
        }
        self.order.push(wheel.name.clone());
        self.wheels.insert(wheel.name.clone(), Arc::new(wheel));
        Ok(())
    }

    pub fn get(&self, name: &str) -> RfResult<Arc<Wheel>> {
        self.wheels
            .get(name)
            .cloned()
            .ok_or_else(|| RotorForgeError::Config(format!("Unknown wheel '{}'", name)))
    }

    /// Resolves a whitespace or comma separated list of wheel names.
    pub fn resolve_list(&self, names: &str) -> RfResult<Vec<Arc<Wheel>>> {
        names
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|n| self.get(n))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.wheels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wheels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Wheel>> {
        self.order.iter().filter_map(|n| self.wheels.get(n))
    }
}
