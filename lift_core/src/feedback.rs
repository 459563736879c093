//! Subjective difficulty feedback.
//!
//! A completed session carries a 1-5 rating. Every exercise performed that
//! day inherits it, and the progression engine turns it into one of three
//! adjustments.

/// Difficulty rating attached to a completed session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeedbackLevel {
    TooEasy = 1,
    Easy = 2,
    Optimal = 3,
    Hard = 4,
    TooDifficult = 5,
}

/// What the progression engine should do with a rating
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    /// Skip normal progression and apply the large increment
    ForceIncrease,
    /// Apply one standard increment on top of the computed plan
    StandardIncrement,
    /// Pull back volume, or load if volume is already low
    ReduceVolume,
}

impl FeedbackLevel {
    /// Convert a stored rating; anything outside 1..=5 is ignored
    pub fn from_rating(rating: u8) -> Option<Self> {
        match rating {
            1 => Some(FeedbackLevel::TooEasy),
            2 => Some(FeedbackLevel::Easy),
            3 => Some(FeedbackLevel::Optimal),
            4 => Some(FeedbackLevel::Hard),
            5 => Some(FeedbackLevel::TooDifficult),
            other => {
                tracing::warn!("Ignoring out-of-range difficulty rating {}", other);
                None
            }
        }
    }

    pub fn adjustment(self) -> Adjustment {
        match self {
            FeedbackLevel::TooEasy => Adjustment::ForceIncrease,
            FeedbackLevel::Easy | FeedbackLevel::Optimal | FeedbackLevel::Hard => {
                Adjustment::StandardIncrement
            }
            FeedbackLevel::TooDifficult => Adjustment::ReduceVolume,
        }
    }
}
