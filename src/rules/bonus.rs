//! Bingo-streak gauge and bonus turns
//!
//! Each player fills a 3-step gauge with bingo lines. A full gauge opens a
//! bonus window of [`BONUS_TURN_COUNT`] turns during which every own
//! placement scores `owned stones * BONUS_PLACEMENT_FACTOR` extra points.

/// Gauge capacity
pub const GAUGE_MAX: u32 = 3;
/// Length of a bonus window in turns
pub const BONUS_TURN_COUNT: u32 = 5;
/// Points per owned stone for each bonus placement
pub const BONUS_PLACEMENT_FACTOR: u32 = 2;

/// What the per-turn update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusTransition {
    /// No bingo, no bonus: gauge stays (or returns to) empty
    Idle,
    /// Gauge filled but below the threshold
    Progress,
    /// Gauge reached the threshold this turn
    Activated,
    /// Bonus was already running and used one turn
    Consumed,
    /// Last bonus turn used; gauge and streak cleared
    Expired,
}

/// Per-player gauge state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BonusGauge {
    pub gauge: u32,
    pub streak: u32,
    pub bonus_turns: u32,
}

impl BonusGauge {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.bonus_turns > 0
    }

    /// Add bingo lines. While a bonus runs the gauge is pinned at max.
    pub fn add_progress(&mut self, lines: u32) {
        if lines == 0 {
            return;
        }
        if self.is_active() {
            self.gauge = GAUGE_MAX;
            return;
        }
        self.streak = (self.streak + lines).min(GAUGE_MAX);
        self.gauge = (self.gauge + lines).min(GAUGE_MAX);
        if self.gauge >= GAUGE_MAX {
            self.gauge = GAUGE_MAX;
            self.bonus_turns = BONUS_TURN_COUNT;
            self.streak = 0;
        }
    }

    /// Drop progress after a turn without bingo. No-op while active.
    pub fn reset_progress(&mut self) {
        if self.is_active() {
            return;
        }
        self.gauge = 0;
        self.streak = 0;
    }

    /// Use one bonus turn; clears the gauge when the window closes.
    pub fn consume_turn(&mut self) {
        if self.bonus_turns == 0 {
            return;
        }
        self.bonus_turns -= 1;
        if self.bonus_turns == 0 {
            self.gauge = 0;
            self.streak = 0;
        }
    }

    /// Full per-turn update with the number of lines deleted this turn.
    ///
    /// A bonus that was running before this update consumes a turn; one
    /// that was opened by this update does not.
    pub fn after_turn(&mut self, lines: u32) -> BonusTransition {
        let was_active = self.is_active();
        if lines > 0 {
            self.add_progress(lines);
        } else {
            self.reset_progress();
        }

        if was_active {
            self.consume_turn();
            if self.is_active() {
                BonusTransition::Consumed
            } else {
                BonusTransition::Expired
            }
        } else if self.is_active() {
            BonusTransition::Activated
        } else if self.gauge > 0 {
            BonusTransition::Progress
        } else {
            BonusTransition::Idle
        }
    }
}

/// Extra score for one placement during a bonus window
#[inline]
pub fn placement_bonus(owned_stones: u32) -> u32 {
    owned_stones * BONUS_PLACEMENT_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_single_bingos_activate() {
        let mut g = BonusGauge::default();
        assert_eq!(g.after_turn(1), BonusTransition::Progress);
        assert_eq!(g.after_turn(1), BonusTransition::Progress);
        assert_eq!((g.gauge, g.streak), (2, 2));
        assert_eq!(g.after_turn(1), BonusTransition::Activated);
        assert_eq!(g.bonus_turns, BONUS_TURN_COUNT);
        assert_eq!(g.gauge, GAUGE_MAX);
        assert_eq!(g.streak, 0);
    }

    #[test]
    fn test_triple_bingo_activates_at_once() {
        let mut g = BonusGauge::default();
        g.add_progress(3);
        assert!(g.is_active());
        assert_eq!(g.gauge, 3);
        assert_eq!(g.bonus_turns, BONUS_TURN_COUNT);
    }

    #[test]
    fn test_miss_resets_inactive_gauge() {
        let mut g = BonusGauge::default();
        g.after_turn(2);
        assert_eq!(g.after_turn(0), BonusTransition::Idle);
        assert_eq!((g.gauge, g.streak), (0, 0));
    }

    #[test]
    fn test_reset_is_ignored_while_active() {
        let mut g = BonusGauge::default();
        g.add_progress(3);
        g.reset_progress();
        assert_eq!(g.gauge, 3);
        assert!(g.is_active());
    }

    #[test]
    fn test_five_turns_expire_bonus() {
        let mut g = BonusGauge::default();
        g.after_turn(3);
        for _ in 0..BONUS_TURN_COUNT - 1 {
            assert_eq!(g.after_turn(0), BonusTransition::Consumed);
            assert_eq!(g.gauge, GAUGE_MAX);
        }
        assert_eq!(g.after_turn(0), BonusTransition::Expired);
        assert!(!g.is_active());
        assert_eq!((g.gauge, g.streak), (0, 0));
    }

    #[test]
    fn test_bingo_during_bonus_pins_gauge() {
        let mut g = BonusGauge::default();
        g.after_turn(3);
        g.after_turn(2);
        assert_eq!(g.gauge, GAUGE_MAX);
        assert_eq!(g.bonus_turns, BONUS_TURN_COUNT - 1);
    }

    #[test]
    fn test_consume_turn_direct() {
        let mut g = BonusGauge::default();
        g.add_progress(3);
        for _ in 0..BONUS_TURN_COUNT {
            g.consume_turn();
        }
        assert!(!g.is_active());
        assert_eq!(g.gauge, 0);
        g.consume_turn();
        assert_eq!(g.bonus_turns, 0);
    }

    #[test]
    fn test_placement_bonus() {
        assert_eq!(placement_bonus(6), 12);
        assert_eq!(placement_bonus(0), 0);
    }
}
