use serde::{Deserialize, Serialize};

/// Highest HP percentage a guard can name.
pub const HP_PERCENT_MAX: u32 = 100;
/// Sentinel upper bound for "every remaining battle".
pub const BATTLE_MAX: u32 = 9999;

/// Threshold condition gating a conditional skill part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Guard {
    /// Remaining HP between `lower` and `upper` percent, inclusive.
    Hp { lower: u32, upper: u32 },
    /// Current battle number (floor) between `lower` and `upper`.
    Battle { lower: u32, upper: u32 },
}

/// Where a guard's range sits relative to its theoretical extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardBound {
    AtMost(u32),
    AtLeast(u32),
    Between(u32, u32),
}

impl Guard {
    /// Classify the range. A lower bound of zero wins over an upper bound at
    /// the maximum, so a full range reads as "at most max".
    pub fn bound(&self) -> GuardBound {
        let (lower, upper, max) = match *self {
            Guard::Hp { lower, upper } => (lower, upper, HP_PERCENT_MAX),
            Guard::Battle { lower, upper } => (lower, upper, BATTLE_MAX),
        };
        if lower == 0 {
            GuardBound::AtMost(upper)
        } else if upper == max {
            GuardBound::AtLeast(lower)
        } else {
            GuardBound::Between(lower, upper)
        }
    }
}

/// How an evolving skill behaves after its last stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainMode {
    /// Using the final stage returns the skill to stage one.
    CyclesBack,
    /// Each use advances; the chain ends and starts over.
    Restarts,
}
