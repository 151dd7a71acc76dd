//! Die sizes, dice notation and validated roll records.
//!
//! Parses notation like "2d6+3", "1d20", "4d8-2", "d12".

use core::fmt;
use core::str::FromStr;

use super::DiceError;
use crate::config::CombatConfig;

/// A die size supported by the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum Die {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl Die {
    pub const ALL: [Die; 7] = [
        Die::D4,
        Die::D6,
        Die::D8,
        Die::D10,
        Die::D12,
        Die::D20,
        Die::D100,
    ];

    /// Number of faces on this die.
    pub const fn sides(self) -> u32 {
        match self {
            Die::D4 => 4,
            Die::D6 => 6,
            Die::D8 => 8,
            Die::D10 => 10,
            Die::D12 => 12,
            Die::D20 => 20,
            Die::D100 => 100,
        }
    }
}

impl TryFrom<u32> for Die {
    type Error = DiceError;

    fn try_from(sides: u32) -> Result<Self, Self::Error> {
        Die::ALL
            .into_iter()
            .find(|die| die.sides() == sides)
            .ok_or(DiceError::UnsupportedSides { sides })
    }
}

impl From<Die> for u32 {
    fn from(die: Die) -> u32 {
        die.sides()
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Rejects a modifier whose magnitude exceeds [`CombatConfig::MAX_MODIFIER`].
pub fn check_modifier(modifier: i64) -> Result<i32, DiceError> {
    let max = CombatConfig::MAX_MODIFIER;
    match i32::try_from(modifier) {
        Ok(value) if (-max..=max).contains(&value) => Ok(value),
        _ => Err(DiceError::ModifierOutOfRange { modifier, max }),
    }
}

/// A validated dice expression: `count` dice of one size plus a flat modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceExpression {
    count: u32,
    die: Die,
    modifier: i32,
}

impl DiceExpression {
    /// Creates an expression, rejecting counts outside `1..=MAX_DICE_PER_EXPRESSION`
    /// and modifiers beyond `MAX_MODIFIER`.
    pub fn new(count: u32, die: Die, modifier: i32) -> Result<Self, DiceError> {
        check_modifier(modifier.into())?;
        if count == 0 {
            return Err(DiceError::NonPositiveCount { count: 0 });
        }
        if count > CombatConfig::MAX_DICE_PER_EXPRESSION {
            return Err(DiceError::TooManyDice {
                count,
                max: CombatConfig::MAX_DICE_PER_EXPRESSION,
            });
        }
        Ok(Self {
            count,
            die,
            modifier,
        })
    }

    /// Parses standard dice notation.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let original = notation;
        let notation = notation.trim().to_ascii_lowercase();
        let malformed = |reason| DiceError::MalformedNotation {
            notation: original.to_string(),
            reason,
        };

        let d_pos = notation
            .find('d')
            .ok_or_else(|| malformed("missing 'd' separator"))?;

        // "d6" means "1d6"
        let count_str = &notation[..d_pos];
        let count: i64 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| malformed("dice count is not a number"))?
        };
        if count < 1 {
            return Err(DiceError::NonPositiveCount { count });
        }
        let count = u32::try_from(count).map_err(|_| DiceError::TooManyDice {
            count: u32::MAX,
            max: CombatConfig::MAX_DICE_PER_EXPRESSION,
        })?;

        let rest = &notation[d_pos + 1..];
        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(0) => return Err(malformed("missing die size")),
            Some(pos) => {
                let (sign, digits) = rest[pos..].split_at(1);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed("modifier is not a number"));
                }
                let magnitude: i64 = digits.parse().map_err(|_| DiceError::ModifierOutOfRange {
                    modifier: if sign == "-" { i64::MIN } else { i64::MAX },
                    max: CombatConfig::MAX_MODIFIER,
                })?;
                let modifier = if sign == "-" { -magnitude } else { magnitude };
                (&rest[..pos], check_modifier(modifier)?)
            }
            None => (rest, 0),
        };

        if sides_str.is_empty() {
            return Err(malformed("missing die size"));
        }
        let sides: u32 = sides_str
            .parse()
            .map_err(|_| malformed("die size is not a number"))?;

        Self::new(count, Die::try_from(sides)?, modifier)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn die(&self) -> Die {
        self.die
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Minimum possible result.
    pub fn min(&self) -> i32 {
        self.count as i32 + self.modifier
    }

    /// Maximum possible result.
    pub fn max(&self) -> i32 {
        (self.count * self.die.sides()) as i32 + self.modifier
    }

    /// Expected average, rounded down.
    pub fn average(&self) -> i32 {
        let doubled = self.count as i32 * (self.die.sides() as i32 + 1);
        (doubled + 2 * self.modifier).div_euclid(2)
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
        write!(f, "{}{}", self.count, self.die)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

/// A rolled dice total whose value is consistent with its expression.
///
/// Invariant: `count + modifier <= total <= count * sides + modifier`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DieRoll {
    die: Die,
    count: u32,
    modifier: i32,
    total: i32,
}

impl DieRoll {
    /// Validates and builds a roll record.
    pub fn new(sides: u32, count: u32, modifier: i32, total: i32) -> Result<Self, DiceError> {
        let die = Die::try_from(sides)?;
        let expression = DiceExpression::new(count, die, modifier)?;
        let (min, max) = (expression.min(), expression.max());
        if total < min || total > max {
            return Err(DiceError::TotalOutOfRange {
                count,
                sides,
                modifier,
                total,
                min,
                max,
            });
        }
        Ok(Self {
            die,
            count,
            modifier,
            total,
        })
    }

    /// Records a total the engine just rolled for `expression`.
    pub(super) fn rolled(expression: &DiceExpression, total: i32) -> Self {
        debug_assert!(expression.min() <= total && total <= expression.max());
        Self {
            die: expression.die(),
            count: expression.count(),
            modifier: expression.modifier(),
            total,
        }
    }

    pub fn die(&self) -> Die {
        self.die
    }

    pub fn sides(&self) -> u32 {
        self.die.sides()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn total(&self) -> i32 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let expr = DiceExpression::parse("2d6").unwrap();
        assert_eq!(expr.count(), 2);
        assert_eq!(expr.die(), Die::D6);
        assert_eq!(expr.modifier(), 0);
    }

    #[test]
    fn parse_with_modifiers() {
        let plus = DiceExpression::parse("1d20+5").unwrap();
        assert_eq!((plus.count(), plus.die(), plus.modifier()), (1, Die::D20, 5));

        let minus = DiceExpression::parse("3d8-2").unwrap();
        assert_eq!((minus.count(), minus.die(), minus.modifier()), (3, Die::D8, -2));
    }

    #[test]
    fn parse_implicit_count_whitespace_and_case() {
        let expr = DiceExpression::parse("  D12+1 ").unwrap();
        assert_eq!((expr.count(), expr.die(), expr.modifier()), (1, Die::D12, 1));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(
            DiceExpression::parse("abc"),
            Err(DiceError::MalformedNotation { .. })
        ));
        assert!(matches!(
            DiceExpression::parse("2d"),
            Err(DiceError::MalformedNotation { .. })
        ));
        assert!(matches!(
            DiceExpression::parse("2d+3"),
            Err(DiceError::MalformedNotation { .. })
        ));
        assert_eq!(
            DiceExpression::parse("0d6"),
            Err(DiceError::NonPositiveCount { count: 0 })
        );
        assert_eq!(
            DiceExpression::parse("-2d6"),
            Err(DiceError::NonPositiveCount { count: -2 })
        );
        assert_eq!(
            DiceExpression::parse("2d7"),
            Err(DiceError::UnsupportedSides { sides: 7 })
        );
        assert!(matches!(
            DiceExpression::parse("101d6"),
            Err(DiceError::TooManyDice { .. })
        ));
        assert!(matches!(
            DiceExpression::parse("2d6++3"),
            Err(DiceError::MalformedNotation { .. })
        ));
        assert!(matches!(
            DiceExpression::parse("2d6+-3"),
            Err(DiceError::MalformedNotation { .. })
        ));
        assert!(matches!(
            DiceExpression::parse("2d6-"),
            Err(DiceError::MalformedNotation { .. })
        ));
        assert!(matches!(
            DiceExpression::parse("2d6+3-1"),
            Err(DiceError::MalformedNotation { .. })
        ));
    }

    #[test]
    fn modifiers_past_the_limit_are_rejected() {
        assert_eq!(
            DiceExpression::parse("1d6+2147483647"),
            Err(DiceError::ModifierOutOfRange {
                modifier: 2_147_483_647,
                max: CombatConfig::MAX_MODIFIER,
            })
        );
        assert!(matches!(
            DiceExpression::parse("1d6-99999999999999999999999"),
            Err(DiceError::ModifierOutOfRange { .. })
        ));
        assert!(matches!(
            DiceExpression::new(1, Die::D6, i32::MIN),
            Err(DiceError::ModifierOutOfRange { .. })
        ));
        assert!(matches!(
            DieRoll::new(20, 1, i32::MAX, 0),
            Err(DiceError::ModifierOutOfRange { .. })
        ));

        let edge = DiceExpression::parse("100d100+1000").unwrap();
        assert_eq!(edge.max(), 11_000);
        assert_eq!(DiceExpression::parse("1d4-1000").unwrap().min(), -999);
    }

    #[test]
    fn min_max_average() {
        let expr = DiceExpression::parse("2d6+3").unwrap();
        assert_eq!(expr.min(), 5);
        assert_eq!(expr.max(), 15);
        assert_eq!(expr.average(), 10);
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(DiceExpression::parse("2d6").unwrap().to_string(), "2d6");
        assert_eq!(DiceExpression::parse("d20+5").unwrap().to_string(), "1d20+5");
        assert_eq!(DiceExpression::parse("3D8-2").unwrap().to_string(), "3d8-2");
    }

    #[test]
    fn die_roll_rejects_impossible_totals() {
        // 1d20+5 can never total less than 6
        assert!(matches!(
            DieRoll::new(20, 1, 5, 5),
            Err(DiceError::TotalOutOfRange { min: 6, max: 25, .. })
        ));
        assert!(DieRoll::new(20, 1, 5, 6).is_ok());
        assert!(DieRoll::new(20, 1, 5, 25).is_ok());
        assert!(DieRoll::new(20, 1, 5, 26).is_err());
    }

    #[test]
    fn die_roll_rejects_bad_expression() {
        assert_eq!(
            DieRoll::new(3, 1, 0, 2),
            Err(DiceError::UnsupportedSides { sides: 3 })
        );
        assert_eq!(
            DieRoll::new(6, 0, 0, 0),
            Err(DiceError::NonPositiveCount { count: 0 })
        );
    }
}
