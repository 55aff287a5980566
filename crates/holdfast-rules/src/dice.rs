//! `NdM` dice expressions.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiceError;
use crate::rng::GameRng;

/// Most dice a single expression may roll.
pub const MAX_DICE: u32 = 100;

/// Most faces a single die may have.
pub const MAX_SIDES: u32 = 1000;

/// A parsed `NdM` expression: roll `count` dice with `sides` faces each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceExpression {
    /// Number of dice.
    pub count: u32,
    /// Faces per die.
    pub sides: u32,
}

impl DiceExpression {
    /// `1d20`, the die of every check.
    pub const D20: Self = Self::of(1, 20);

    /// `2d6`, the market table roll.
    pub const TWO_D6: Self = Self::of(2, 6);

    /// `2d20`, the section event table roll.
    pub const TWO_D20: Self = Self::of(2, 20);

    /// Build an expression from literal parts. Intended for static tables.
    pub const fn of(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// Parse `NdM`. Surrounding whitespace is ignored and `d` may be upper
    /// case.
    pub fn parse(input: &str) -> Result<Self, DiceError> {
        let invalid = || DiceError::InvalidExpression { expression: input.to_owned() };
        let trimmed = input.trim();
        let (count, sides) = trimmed
            .split_once(['d', 'D'])
            .ok_or_else(invalid)?;
        if count.is_empty()
            || sides.is_empty()
            || !count.bytes().all(|b| b.is_ascii_digit())
            || !sides.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let count: u32 = count.parse().map_err(|_e| invalid())?;
        let sides: u32 = sides.parse().map_err(|_e| invalid())?;
        if !(1..=MAX_DICE).contains(&count) || !(1..=MAX_SIDES).contains(&sides) {
            return Err(invalid());
        }
        Ok(Self { count, sides })
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// The result of rolling an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// The expression rolled, in canonical `NdM` form.
    pub expression: String,
    /// Each die, in roll order.
    pub rolls: Vec<i64>,
    /// Sum of all dice.
    pub total: i64,
}

/// Roll a typed expression. Draws exactly `count` values from `rng`.
pub fn roll_expression(expression: DiceExpression, rng: &mut dyn GameRng) -> DiceRoll {
    let sides = i64::from(expression.sides);
    let rolls: Vec<i64> =
        (0..expression.count).map(|_| rng.next_int_inclusive(1, sides)).collect();
    let total = rolls.iter().fold(0_i64, |acc, r| acc.saturating_add(*r));
    DiceRoll { expression: expression.to_string(), rolls, total }
}

/// Parse and roll `NdM`.
pub fn roll_dice(expression: &str, rng: &mut dyn GameRng) -> Result<DiceRoll, DiceError> {
    let parsed = DiceExpression::parse(expression)?;
    Ok(roll_expression(parsed, rng))
}
