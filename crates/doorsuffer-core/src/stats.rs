//! Retrospective metrics.
//!
//! Pure analytics over the engine's collections, consumed by metrics and
//! retrospective views. Reads only; never mutates or stores anything.

use serde::{Deserialize, Serialize};

use crate::goal::{Goal, RewardKind};
use crate::ledger::PointTransaction;
use crate::penalty::{CommitmentState, Penalty};

/// Aggregated activity metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Goals currently marked completed.
    pub completed_goals: u32,
    /// All goals currently defined.
    pub total_goals: u32,
    /// completed / total, as a percentage (0.0 when no goals exist).
    pub completion_rate: f64,
    /// Minutes earned from completed socialTime goals.
    pub time_earned_min: u32,
    /// Sum of positive ledger transactions.
    pub points_earned: i64,
    /// Sum of negative ledger transactions, as a positive number.
    pub points_lost: i64,
    /// Commitments that settled (deadline passed unmet).
    pub failed_commitments: u32,
    /// Commitments still awaiting fulfillment.
    pub pending_commitments: u32,
}

/// Compute a metrics snapshot from the current collections.
pub fn summarize(
    goals: &[Goal],
    penalties: &[Penalty],
    transactions: &[PointTransaction],
) -> MetricsSnapshot {
    let total_goals = goals.len() as u32;
    let completed_goals = goals.iter().filter(|g| g.completed).count() as u32;
    let completion_rate = if total_goals == 0 {
        0.0
    } else {
        f64::from(completed_goals) / f64::from(total_goals) * 100.0
    };

    let time_earned_min = goals
        .iter()
        .filter(|g| g.completed && g.reward_kind == RewardKind::SocialTime)
        .map(|g| g.reward_amount)
        .sum();

    let points_earned = transactions.iter().filter(|t| t.amount > 0).map(|t| t.amount).sum();
    let points_lost = -transactions
        .iter()
        .filter(|t| t.amount < 0)
        .map(|t| t.amount)
        .sum::<i64>();

    let commitments = penalties.iter().filter(|p| p.is_commitment);
    let (mut failed, mut pending) = (0, 0);
    for commitment in commitments {
        match commitment.state() {
            CommitmentState::Settled => failed += 1,
            CommitmentState::Pending => pending += 1,
            CommitmentState::Fulfilled => {}
        }
    }

    MetricsSnapshot {
        completed_goals,
        total_goals,
        completion_rate,
        time_earned_min,
        points_earned,
        points_lost,
        failed_commitments: failed,
        pending_commitments: pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{GoalRecurrence, NewGoal};
    use crate::ledger::PointLedger;
    use crate::penalty::{DueAt, NewPenalty, PenaltyRecurrence};
    use chrono::NaiveDate;

    fn at() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn summarizes_goals_ledger_and_commitments() {
        let mut done = NewGoal {
            text: "Exercise".to_string(),
            reward_kind: RewardKind::SocialTime,
            reward_amount: 15,
            recurrence: GoalRecurrence::Daily,
            ..NewGoal::default()
        }
        .into_goal(at());
        done.completed = true;
        let open = NewGoal {
            text: "Read".to_string(),
            ..NewGoal::default()
        }
        .into_goal(at());

        let mut ledger = PointLedger::new();
        ledger.credit(20, "Goal completed: report", at());
        ledger.debit(5, "Penalty: late", at());

        let mut settled = NewPenalty {
            reason: "Missed call".to_string(),
            kind: RewardKind::Points,
            amount: 10,
            due: Some(DueAt {
                date: at().date(),
                time: at().time(),
            }),
            recurrence: PenaltyRecurrence::Once,
            linked_challenge: None,
        }
        .into_penalty(at());
        settled.penalty_applied = true;
        let pending = NewPenalty {
            reason: "Tax forms".to_string(),
            kind: RewardKind::Points,
            amount: 10,
            due: Some(DueAt {
                date: at().date(),
                time: at().time(),
            }),
            recurrence: PenaltyRecurrence::Once,
            linked_challenge: None,
        }
        .into_penalty(at());

        let snapshot = summarize(
            &[done, open],
            &[settled, pending],
            ledger.transactions(),
        );

        assert_eq!(snapshot.completed_goals, 1);
        assert_eq!(snapshot.total_goals, 2);
        assert!((snapshot.completion_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.time_earned_min, 15);
        assert_eq!(snapshot.points_earned, 20);
        assert_eq!(snapshot.points_lost, 5);
        assert_eq!(snapshot.failed_commitments, 1);
        assert_eq!(snapshot.pending_commitments, 1);
    }

    #[test]
    fn empty_state_yields_zero_rate() {
        let snapshot = summarize(&[], &[], &[]);
        assert_eq!(snapshot.completion_rate, 0.0);
        assert_eq!(snapshot.total_goals, 0);
    }
}
