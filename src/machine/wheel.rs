use super::wiring::Substitution;
use crate::consts::ALPHABET_SIZE;
use crate::core_types::{Letter, LetterMask};
use crate::error::{RfResult, RotorForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named wiring with its turnover notches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wheel {
    pub name: String,
    pub wiring: Substitution,
    pub turnover: LetterMask,
    pub rotating: bool,
}

impl Wheel {
    pub fn new(
        name: impl Into<String>,
        wiring: Substitution,
        turnover: LetterMask,
        rotating: bool,
    ) -> RfResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RotorForgeError::Config("Wheel name is empty".into()));
        }
        Ok(Self {
            name,
            wiring,
            turnover,
            rotating,
        })
    }

    /// Builds a wheel from the textual form used by wheel databases.
    pub fn from_spec(spec: &WheelSpec) -> RfResult<Self> {
        let wiring = Substitution::parse(&spec.wiring)
            .map_err(|e| RotorForgeError::Config(format!("Wheel '{}': {}", spec.name, e)))?;
        let turnover: LetterMask = spec.turnover.parse()?;
        Self::new(spec.name.clone(), wiring, turnover, spec.rotating)
    }

    #[inline(always)]
    pub fn is_turnover(&self, position: Letter) -> bool {
        self.turnover.contains(position)
    }

    /// Smallest shift that maps the turnover set onto itself.
    pub fn turnover_period(&self) -> u32 {
        (1..ALPHABET_SIZE as u32)
            .filter(|s| ALPHABET_SIZE as u32 % s == 0)
            .find(|&s| self.turnover.rotated(s) == self.turnover)
            .unwrap_or(ALPHABET_SIZE as u32)
    }

    pub fn wiring_period(&self) -> u32 {
        self.wiring.shift_period()
    }

    /// Reflectors are fixed-point free involutions.
    pub fn is_reflector(&self) -> bool {
        self.wiring.is_involution() && !self.wiring.has_fixed_point()
    }
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Serialized wheel, as stored in a wheel database.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WheelSpec {
    pub name: String,
    pub wiring: String,
    #[serde(default)]
    pub turnover: String,
    #[serde(default = "default_rotating")]
    pub rotating: bool,
}

fn default_rotating() -> bool {
    true
}

impl From<&Wheel> for WheelSpec {
    fn from(w: &Wheel) -> Self {
        Self {
            name: w.name.clone(),
            wiring: w.wiring.to_string(),
            turnover: w.turnover.to_string(),
            rotating: w.rotating,
        }
    }
}
