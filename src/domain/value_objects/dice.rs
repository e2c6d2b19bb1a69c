use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Faces of a six-sided die
pub const DIE_FACES: u8 = 6;

/// Outcome of throwing two six-sided dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dice {
    pub die1: u8,
    pub die2: u8,
}

impl Dice {
    /// Validate both faces are in `[1, 6]`
    pub fn new(die1: u8, die2: u8) -> Result<Self, ValidationError> {
        for value in [die1, die2] {
            if !(1..=DIE_FACES).contains(&value) {
                return Err(ValidationError::DieOutOfRange(value));
            }
        }
        Ok(Self { die1, die2 })
    }

    /// Throw two fair dice
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            die1: rng.gen_range(1..=DIE_FACES),
            die2: rng.gen_range(1..=DIE_FACES),
        }
    }

    pub fn sum(&self) -> u8 {
        self.die1 + self.die2
    }
}
