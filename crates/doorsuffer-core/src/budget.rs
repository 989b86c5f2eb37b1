//! Social-time budget derivation.
//!
//! The budget is never stored as authoritative state; it is recomputed from
//! the goal and penalty collections on every read:
//!
//! ```text
//! budget = max(0, earned - lost)
//! earned = Σ reward minutes over completed socialTime goals
//! lost   = Σ minutes over immediate socialTime penalties
//!        + Σ minutes over settled socialTime commitments
//! ```
//!
//! Pending and fulfilled commitments never subtract; settled ones do, so a
//! missed time commitment costs the budget the same way a missed points
//! commitment costs the ledger.

use crate::goal::{Goal, RewardKind};
use crate::penalty::Penalty;

/// Net leisure-time allowance in minutes.
pub fn social_time_budget(goals: &[Goal], penalties: &[Penalty]) -> u32 {
    let earned: u32 = goals
        .iter()
        .filter(|g| g.completed && g.reward_kind == RewardKind::SocialTime)
        .map(|g| g.reward_amount)
        .sum();

    let lost: u32 = penalties
        .iter()
        .filter(|p| p.reduces_social_time())
        .map(|p| p.amount)
        .sum();

    earned.saturating_sub(lost)
}
