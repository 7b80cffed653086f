//! Score and line counters.

use clap::ValueEnum;

/// Points awarded per scoring unit.
pub const POINTS: u32 = 10;

/// How a lock that cleared rows is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScorePolicy {
    /// 10 points for every cleared row.
    #[default]
    PerLine,
    /// 10 points per lock that cleared at least one row, however many.
    Flat,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    policy: ScorePolicy,
    score: u32,
    lines: u32,
}

impl ScoreTracker {
    pub fn new(policy: ScorePolicy) -> Self {
        Self {
            policy,
            score: 0,
            lines: 0,
        }
    }

    /// Record one lock's cleared rows. Returns the points added.
    pub fn add(&mut self, lines_cleared: u32) -> u32 {
        if lines_cleared == 0 {
            return 0;
        }
        let points = match self.policy {
            ScorePolicy::PerLine => POINTS.saturating_mul(lines_cleared),
            ScorePolicy::Flat => POINTS,
        };
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines_cleared);
        points
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn lines(&self) -> u32 {
        self.lines
    }

    #[inline]
    pub fn policy(&self) -> ScorePolicy {
        self.policy
    }
}
