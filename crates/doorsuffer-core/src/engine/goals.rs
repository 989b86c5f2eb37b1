//! Goal operations: add, delete, toggle completion.
//!
//! Toggling to completed settles the reward (and, when late, the
//! configured immediate penalty), bumps the lifetime counter and the day
//! streak, and may unlock the Pomodoro feature. Toggling back reverses the
//! reward only: streaks and already-applied penalties stay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Engine;
use crate::error::{Result, ValidationError};
use crate::goal::{NewGoal, RewardKind};
use crate::notify::Severity;
use crate::penalty::NewPenalty;

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ToggleOutcome {
    Completed { on_time: bool },
    Uncompleted,
}

impl Engine {
    /// Create a goal. Rejects an empty description; everything else is
    /// taken as given.
    pub fn add_goal(&mut self, new: NewGoal) -> Result<String> {
        if new.text.trim().is_empty() {
            return Err(ValidationError::EmptyField("text").into());
        }
        let from_challenge = new.linked_to_challenge;
        let goal = new.into_goal(self.now());
        let id = goal.id.clone();
        let text = goal.text.clone();
        self.state.goals.push(goal);
        self.persist_goals()?;
        if !from_challenge {
            self.notify(&format!("New goal \"{text}\" added."), Severity::Success);
        }
        self.refresh_all_completed_flag()?;
        Ok(id)
    }

    /// Delete a goal. Returns whether a record was removed.
    pub fn delete_goal(&mut self, id: &str) -> Result<bool> {
        let before = self.state.goals.len();
        self.state.goals.retain(|g| g.id != id);
        if self.state.goals.len() == before {
            return Ok(false);
        }
        self.persist_goals()?;
        self.notify("Goal deleted.", Severity::Info);
        self.refresh_all_completed_flag()?;
        self.sync_social_time()?;
        Ok(true)
    }

    /// Flip a goal's completion state and settle the consequences.
    ///
    /// Returns `None` for an unknown id. Rapid re-toggling is not deduped
    /// beyond the paired credit/debit on the ledger.
    pub fn toggle_goal(&mut self, id: &str) -> Result<Option<ToggleOutcome>> {
        let now = self.now();
        let Some(idx) = self.state.goals.iter().position(|g| g.id == id) else {
            return Ok(None);
        };
        let goal = self.state.goals[idx].clone();
        let completing = !goal.completed;
        self.state.goals[idx].completed = completing;

        let outcome = if completing {
            // A goal with no deadline is always on time; at the deadline
            // exactly still counts.
            let on_time = goal.due_time.map(|due| now.time() <= due).unwrap_or(true);

            match goal.reward_kind {
                RewardKind::Points => {
                    self.state.ledger.credit(
                        goal.reward_amount,
                        format!("Goal completed: {}", goal.text),
                        now,
                    );
                    self.persist_ledger()?;
                    self.notify(
                        &format!("Goal completed! +{} points.", goal.reward_amount),
                        Severity::Success,
                    );
                }
                RewardKind::SocialTime => {
                    self.notify(
                        &format!(
                            "Goal completed! +{} minutes of social media time.",
                            goal.reward_amount
                        ),
                        Severity::Success,
                    );
                }
            }

            if !on_time {
                if let Some(late_penalty) = goal.penalty.filter(|p| p.amount > 0) {
                    self.register_penalty(NewPenalty::immediate(
                        format!("Goal \"{}\" completed past its deadline", goal.text),
                        late_penalty.kind,
                        late_penalty.amount,
                    ))?;
                }
            }

            self.state.counters.completed_goals += 1;
            if self.state.counters.completed_goals >= self.config.pomodoro_unlock_threshold
                && !self.state.counters.pomodoro_unlocked
            {
                self.state.counters.pomodoro_unlocked = true;
                self.notify("Pomodoro timer unlocked!", Severity::Success);
            }
            self.update_streak(now.date());
            self.persist_counters()?;

            ToggleOutcome::Completed { on_time }
        } else {
            if goal.reward_kind == RewardKind::Points {
                self.state.ledger.debit(
                    goal.reward_amount,
                    format!("Goal unchecked: {}", goal.text),
                    now,
                );
                self.persist_ledger()?;
            }
            self.state.counters.completed_goals =
                self.state.counters.completed_goals.saturating_sub(1);
            self.persist_counters()?;

            ToggleOutcome::Uncompleted
        };

        self.persist_goals()?;
        self.refresh_all_completed_flag()?;
        self.sync_social_time()?;
        Ok(Some(outcome))
    }

    /// Streak rule: consecutive active days, at most one bump per day.
    fn update_streak(&mut self, today: NaiveDate) {
        if self.state.counters.last_active_day == Some(today) {
            return;
        }
        let was_yesterday = self
            .state
            .counters
            .last_active_day
            .zip(today.pred_opt())
            .map(|(last, yesterday)| last == yesterday)
            .unwrap_or(false);
        self.state.counters.streak = if was_yesterday {
            self.state.counters.streak + 1
        } else {
            1
        };
        self.state.counters.last_active_day = Some(today);
        self.notify(
            &format!("{}-day streak!", self.state.counters.streak),
            Severity::Info,
        );
    }
}
