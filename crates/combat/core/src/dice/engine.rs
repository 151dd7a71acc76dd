use super::{D20Roll, DiceError, DiceExpression, Die, DieRoll, Pcg32, RollMode};

/// The per-session dice stream.
///
/// One engine belongs to exactly one session. It is passed by `&mut` into
/// every resolver so the order of calls is the order of draws; sharing an
/// engine between sessions or calling it from two control flows breaks
/// reproducibility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceEngine {
    seed: u64,
    rng: Pcg32,
}

impl DiceEngine {
    /// Creates an engine at the start of the stream for `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::new(seed),
        }
    }

    /// Recreates an engine positioned after `cursor` draws of `seed`.
    ///
    /// Used to continue a session after an interruption.
    pub fn resume(seed: u64, cursor: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::at_cursor(seed, cursor),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of raw draws consumed so far.
    pub fn cursor(&self) -> u64 {
        self.rng.cursor()
    }

    /// Rolls a single die, returning a face in `1..=sides`.
    pub fn roll_die(&mut self, die: Die) -> u32 {
        self.rng.below(die.sides()) + 1
    }

    /// Rolls `count` dice and returns every face in roll order.
    pub fn roll_faces(&mut self, count: u32, die: Die) -> Vec<u32> {
        (0..count).map(|_| self.roll_die(die)).collect()
    }

    /// Rolls `count` dice of `sides` plus `modifier`.
    ///
    /// Unsupported sides and non-positive counts are rejected before any
    /// draw is taken, so a rejected call leaves the stream untouched.
    pub fn roll(&mut self, count: u32, sides: u32, modifier: i32) -> Result<DieRoll, DiceError> {
        let expression = DiceExpression::new(count, Die::try_from(sides)?, modifier)?;
        Ok(self.roll_expression(&expression))
    }

    /// Rolls a validated expression.
    pub fn roll_expression(&mut self, expression: &DiceExpression) -> DieRoll {
        let faces = self.roll_faces(expression.count(), expression.die());
        let sum: u32 = faces.iter().sum();
        let total = sum as i32 + expression.modifier();

        DieRoll::rolled(expression, total)
    }

    /// Rolls a d20 test in the given mode.
    pub fn roll_d20(&mut self, modifier: i32, mode: RollMode) -> D20Roll {
        let faces = (0..mode.dice_count())
            .map(|_| self.roll_die(Die::D20))
            .collect();
        D20Roll::from_rolled(faces, modifier, mode)
    }

    /// Rolls two d20s and keeps the higher.
    pub fn roll_with_advantage(&mut self, modifier: i32) -> D20Roll {
        self.roll_d20(modifier, RollMode::Advantage)
    }

    /// Rolls two d20s and keeps the lower.
    pub fn roll_with_disadvantage(&mut self, modifier: i32) -> D20Roll {
        self.roll_d20(modifier, RollMode::Disadvantage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_produce_identical_sequences() {
        for seed in 0..50u64 {
            let mut a = DiceEngine::new(seed);
            let mut b = DiceEngine::new(seed);
            for _ in 0..20 {
                assert_eq!(a.roll(3, 8, 1), b.roll(3, 8, 1));
                assert_eq!(a.roll_with_advantage(2), b.roll_with_advantage(2));
                assert_eq!(a.roll_die(Die::D100), b.roll_die(Die::D100));
            }
        }
    }

    #[test]
    fn roll_stays_in_range() {
        let mut engine = DiceEngine::new(7);
        for _ in 0..1000 {
            let roll = engine.roll(2, 6, 3).unwrap();
            assert!((5..=15).contains(&roll.total()), "{} out of range", roll.total());
        }
    }

    #[test]
    fn roll_die_covers_every_face() {
        let mut engine = DiceEngine::new(11);
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[(engine.roll_die(Die::D6) - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn rejected_roll_consumes_nothing() {
        let mut engine = DiceEngine::new(3);
        assert_eq!(
            engine.roll(1, 7, 0),
            Err(DiceError::UnsupportedSides { sides: 7 })
        );
        assert_eq!(
            engine.roll(0, 6, 0),
            Err(DiceError::NonPositiveCount { count: 0 })
        );
        assert!(matches!(
            engine.roll(1, 6, i32::MAX),
            Err(DiceError::ModifierOutOfRange { .. })
        ));
        assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn advantage_retains_both_dice() {
        let mut engine = DiceEngine::new(5);
        for _ in 0..200 {
            let adv = engine.roll_with_advantage(0);
            assert_eq!(adv.rolls().len(), 2);
            assert_eq!(adv.natural(), *adv.rolls().iter().max().unwrap());
            assert_eq!(adv.mode(), RollMode::Advantage);

            let dis = engine.roll_with_disadvantage(0);
            assert_eq!(dis.natural(), *dis.rolls().iter().min().unwrap());
            assert_eq!(dis.mode(), RollMode::Disadvantage);
        }
    }

    #[test]
    fn resume_continues_the_same_stream() {
        let mut original = DiceEngine::new(1234);
        for _ in 0..37 {
            original.roll(4, 6, 0).unwrap();
        }
        let mut resumed = DiceEngine::resume(1234, original.cursor());

        for _ in 0..50 {
            assert_eq!(original.roll_d20(1, RollMode::Normal), resumed.roll_d20(1, RollMode::Normal));
        }
    }
}
