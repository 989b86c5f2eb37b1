//! Penalty and commitment operations.
//!
//! Registration decides the record's nature from its deadline: with one it
//! becomes a Pending commitment, without one an immediate penalty whose
//! points effect lands synchronously. The overdue sweep settles Pending
//! commitments at most once each; the `penalty_applied` flag makes repeat
//! sweeps structural no-ops.

use super::Engine;
use crate::error::{Result, ValidationError};
use crate::goal::RewardKind;
use crate::notify::Severity;
use crate::penalty::{CommitmentState, NewPenalty};

impl Engine {
    /// Register a penalty or commitment.
    ///
    /// Rejects an empty reason and a zero amount; on rejection no record
    /// is created.
    pub fn register_penalty(&mut self, new: NewPenalty) -> Result<String> {
        if new.reason.trim().is_empty() {
            return Err(ValidationError::EmptyField("reason").into());
        }
        if new.amount == 0 {
            return Err(ValidationError::InvalidValue {
                field: "amount",
                message: "penalty amount must be greater than zero".to_string(),
            }
            .into());
        }

        let now = self.now();
        let penalty = new.into_penalty(now);
        let id = penalty.id.clone();

        if penalty.is_commitment {
            if let Some(date) = penalty.due_date {
                self.notify(
                    &format!(
                        "Commitment \"{}\" registered for {}.",
                        penalty.reason,
                        date.format("%B %-d, %Y")
                    ),
                    Severity::Success,
                );
            }
        } else {
            if penalty.kind == RewardKind::Points {
                self.state.ledger.debit(
                    penalty.amount,
                    format!("Penalty: {}", penalty.reason),
                    now,
                );
                self.persist_ledger()?;
            }
            let unit = match penalty.kind {
                RewardKind::Points => "points",
                RewardKind::SocialTime => "minutes",
            };
            self.notify(
                &format!(
                    "Penalty applied: -{} {} for \"{}\".",
                    penalty.amount, unit, penalty.reason
                ),
                Severity::Warning,
            );
        }

        self.state.penalties.push(penalty);
        self.persist_penalties()?;
        self.sync_social_time()?;
        Ok(id)
    }

    /// Mark a Pending commitment fulfilled, cancelling its settlement.
    ///
    /// Returns whether a transition happened; unknown ids and terminal
    /// records are silent no-ops.
    pub fn fulfill_commitment(&mut self, id: &str) -> Result<bool> {
        let Some(penalty) = self.state.penalties.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        if !penalty.is_commitment || penalty.state() != CommitmentState::Pending {
            return Ok(false);
        }
        penalty.completed = true;
        self.persist_penalties()?;
        self.notify("Commitment fulfilled!", Severity::Success);
        Ok(true)
    }

    /// Remove a record unconditionally. Applied settlements stay on the
    /// ledger.
    pub fn delete_penalty(&mut self, id: &str) -> Result<bool> {
        let before = self.state.penalties.len();
        self.state.penalties.retain(|p| p.id != id);
        if self.state.penalties.len() == before {
            return Ok(false);
        }
        self.persist_penalties()?;
        self.notify("Commitment deleted.", Severity::Info);
        self.sync_social_time()?;
        Ok(true)
    }

    /// Settle every Pending commitment whose deadline has passed.
    ///
    /// Records are visited in stored order, each transition independent of
    /// the others. Idempotent: a second sweep with no elapsed time finds
    /// nothing to settle. Returns the number of settlements.
    pub fn sweep_overdue(&mut self) -> Result<usize> {
        let now = self.now();
        let mut settled = Vec::new();
        for penalty in &mut self.state.penalties {
            if penalty.is_overdue(now) {
                penalty.penalty_applied = true;
                settled.push((penalty.reason.clone(), penalty.kind, penalty.amount));
            }
        }
        if settled.is_empty() {
            return Ok(0);
        }

        let mut ledger_touched = false;
        for (reason, kind, amount) in &settled {
            match kind {
                RewardKind::Points => {
                    self.state
                        .ledger
                        .debit(*amount, format!("Commitment missed: {reason}"), now);
                    ledger_touched = true;
                    self.notify(
                        &format!("Commitment missed: -{amount} points for \"{reason}\"."),
                        Severity::Warning,
                    );
                }
                RewardKind::SocialTime => {
                    self.notify(
                        &format!(
                            "Commitment missed: -{amount} minutes of social media time for \"{reason}\"."
                        ),
                        Severity::Warning,
                    );
                }
            }
        }

        self.persist_penalties()?;
        if ledger_touched {
            self.persist_ledger()?;
        }
        self.sync_social_time()?;
        Ok(settled.len())
    }
}
