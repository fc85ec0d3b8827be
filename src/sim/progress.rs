//! Experience totals and level thresholds
//!
//! Thresholds are cumulative: crossing one recomputes the next as
//! `floor((threshold - previous) * growth) + threshold`, compounding off
//! the increment. Experience is never subtracted, so remainder past a
//! threshold carries into the next level automatically.

/// Player leveling state
#[derive(Debug, Clone)]
pub struct Progress {
    pub level: u32,
    /// Lifetime experience collected
    pub xp: u32,
    /// Experience total required for the next level
    pub threshold: u32,
    prev_threshold: u32,
    growth: f32,
}

impl Progress {
    pub fn new(first_threshold: u32, growth: f32) -> Self {
        Self {
            level: 1,
            xp: 0,
            threshold: first_threshold,
            prev_threshold: 0,
            growth,
        }
    }

    /// Add experience; returns how many level-ups this grant produced.
    /// Thresholds recompute each loop iteration, so one large grant can
    /// cross several levels.
    pub fn grant(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut level_ups = 0;
        while self.xp >= self.threshold {
            self.level += 1;
            level_ups += 1;
            let increment = (self.threshold - self.prev_threshold) as f32;
            let next = (increment * self.growth).floor() as u32 + self.threshold;
            self.prev_threshold = self.threshold;
            self.threshold = next;
        }
        level_ups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_sequence_strictly_increases() {
        let mut p = Progress::new(100, 1.35);
        let mut last = p.threshold;
        for _ in 0..10 {
            p.grant(p.threshold - p.xp);
            assert!(p.threshold > last);
            last = p.threshold;
        }
        assert_eq!(p.level, 11);
    }

    #[test]
    fn test_canonical_growth_values() {
        let mut p = Progress::new(100, 1.35);
        // 100 -> floor(100 * 1.35) + 100 = 235
        assert_eq!(p.grant(100), 1);
        assert_eq!(p.threshold, 235);
        // 235 -> floor(135 * 1.35) + 235 = 417
        assert_eq!(p.grant(135), 1);
        assert_eq!(p.threshold, 417);
    }

    #[test]
    fn test_big_grant_crosses_multiple_thresholds() {
        let mut p = Progress::new(100, 1.35);
        // 250 crosses 100 and 235, then sits below 417
        assert_eq!(p.grant(250), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 250);
        assert_eq!(p.threshold, 417);
    }

    #[test]
    fn test_exact_threshold_triggers_once() {
        let mut p = Progress::new(100, 1.35);
        assert_eq!(p.grant(100), 1);
        // No double trigger on the boundary
        assert_eq!(p.grant(0), 0);
        assert_eq!(p.level, 2);
    }
}
