//! Penalty and commitment data model.
//!
//! A single record type covers both shapes, discriminated by
//! `is_commitment`:
//!
//! - **Immediate penalty**: a consequence applied at creation (for example
//!   completing a goal past its deadline). No due date.
//! - **Commitment**: a promise with a future due date and time. It settles
//!   automatically if the deadline passes unmet.
//!
//! Commitments move through three states, derived from two flags:
//!
//! ```text
//! Pending ──fulfill──▶ Fulfilled   (terminal, no further effect)
//!    └─────sweep────▶ Settled      (terminal, penalty applied once)
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::{RewardKind, WeekdaySet};

/// Recurrence rule for penalties and commitments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PenaltyRecurrence {
    Once,
    Daily,
    Weekly,
    Monthly,
    Custom { days: WeekdaySet },
}

impl PenaltyRecurrence {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, PenaltyRecurrence::Once)
    }
}

/// Lifecycle state of a commitment, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentState {
    /// Awaiting fulfillment; settles if the deadline passes.
    Pending,
    /// Marked done by the user before settlement. Cancels the penalty.
    Fulfilled,
    /// Deadline passed unmet; the penalty has been applied.
    Settled,
}

/// A penalty record: immediate consequence or scheduled commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Penalty {
    pub id: String,
    pub reason: String,
    pub kind: RewardKind,
    pub amount: u32,
    pub timestamp: NaiveDateTime,
    pub recurrence: PenaltyRecurrence,
    #[serde(default)]
    pub linked_challenge: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_time: Option<NaiveTime>,
    pub is_commitment: bool,
    pub completed: bool,
    /// Set once by the sweep when the deadline passes unmet. Never unset.
    pub penalty_applied: bool,
}

impl Penalty {
    /// Combined deadline, present only when both date and time are set.
    pub fn due_at(&self) -> Option<NaiveDateTime> {
        Some(self.due_date?.and_time(self.due_time?))
    }

    /// Derived lifecycle state. Only meaningful for commitments.
    pub fn state(&self) -> CommitmentState {
        if self.completed {
            CommitmentState::Fulfilled
        } else if self.penalty_applied {
            CommitmentState::Settled
        } else {
            CommitmentState::Pending
        }
    }

    /// Whether the sweep should settle this record at `now`.
    ///
    /// Strictly past-due: a commitment due exactly now is not yet overdue.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.is_commitment
            && !self.completed
            && !self.penalty_applied
            && self.due_at().map(|due| now > due).unwrap_or(false)
    }

    /// Whether a settled socialTime record reduces the social-time budget.
    ///
    /// Immediate socialTime penalties always count; commitment-type ones
    /// count only once settled. See `budget`.
    pub(crate) fn reduces_social_time(&self) -> bool {
        self.kind == RewardKind::SocialTime && (!self.is_commitment || self.penalty_applied)
    }
}

/// Deadline for a scheduled commitment. Date and time travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueAt {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Request payload for registering a penalty or commitment.
///
/// A present `due` makes the record a scheduled commitment; an absent one
/// makes it an immediate penalty. A half-specified deadline cannot be
/// expressed.
#[derive(Debug, Clone)]
pub struct NewPenalty {
    pub reason: String,
    pub kind: RewardKind,
    pub amount: u32,
    pub due: Option<DueAt>,
    pub recurrence: PenaltyRecurrence,
    pub linked_challenge: Option<String>,
}

impl NewPenalty {
    /// Immediate penalty with no deadline and no recurrence.
    pub fn immediate(reason: impl Into<String>, kind: RewardKind, amount: u32) -> Self {
        Self {
            reason: reason.into(),
            kind,
            amount,
            due: None,
            recurrence: PenaltyRecurrence::Once,
            linked_challenge: None,
        }
    }

    pub(crate) fn into_penalty(self, at: NaiveDateTime) -> Penalty {
        let is_commitment = self.due.is_some();
        Penalty {
            id: Uuid::new_v4().to_string(),
            reason: self.reason,
            kind: self.kind,
            amount: self.amount,
            timestamp: at,
            recurrence: self.recurrence,
            linked_challenge: self.linked_challenge,
            due_date: self.due.map(|d| d.date),
            due_time: self.due.map(|d| d.time),
            is_commitment,
            completed: false,
            penalty_applied: false,
        }
    }
}
