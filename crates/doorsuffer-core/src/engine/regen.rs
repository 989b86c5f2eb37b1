//! Daily recurrence jobs.
//!
//! Each job runs at most once per local calendar day, guarded by its own
//! last-run marker, so hosts can call [`Engine::run_daily_jobs`] as often
//! as they like:
//!
//! - completed recurring goals are cloned back as fresh incomplete ones,
//!   replacing their stale instances;
//! - terminal recurring commitments respawn as fresh Pending records with
//!   an advanced deadline, replacing their source records.
//!
//! The daily goal reset is separate and explicit: `needs_daily_reset`
//! exposes the guard so a host can ask the user before wiping completions.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Engine;
use crate::error::Result;
use crate::goal::Goal;
use crate::notify::Severity;
use crate::penalty::{Penalty, PenaltyRecurrence};

/// Counts from one daily-jobs pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRunSummary {
    pub regenerated_goals: usize,
    pub respawned_commitments: usize,
}

impl Engine {
    /// Run the once-per-day jobs. Safe to call on every host tick.
    pub fn run_daily_jobs(&mut self) -> Result<DailyRunSummary> {
        Ok(DailyRunSummary {
            regenerated_goals: self.regenerate_recurring_goals()?,
            respawned_commitments: self.review_recurring_commitments()?,
        })
    }

    /// Respawn completed recurring goals whose rule matches today.
    ///
    /// Clones get a fresh id and `completed = false`; stale instances with
    /// the same text and a recurring rule are replaced, so regeneration
    /// never accumulates duplicates. Returns the number of clones.
    pub fn regenerate_recurring_goals(&mut self) -> Result<usize> {
        let now = self.now();
        let today = now.date();
        if self.state.counters.last_regen_day == Some(today) {
            return Ok(0);
        }
        self.state.counters.last_regen_day = Some(today);

        let clones: Vec<Goal> = self
            .state
            .goals
            .iter()
            .filter(|g| g.completed && g.recurrence.matches(today))
            .map(|g| g.regenerated(now))
            .collect();
        if clones.is_empty() {
            self.persist_counters()?;
            return Ok(0);
        }

        self.state
            .goals
            .retain(|g| !(g.recurrence.is_recurring() && clones.iter().any(|c| c.text == g.text)));
        let count = clones.len();
        self.state.goals.extend(clones);

        self.persist_goals()?;
        self.persist_counters()?;
        self.notify(
            &format!("Regenerated {count} recurring goals for today."),
            Severity::Info,
        );
        self.refresh_all_completed_flag()?;
        self.sync_social_time()?;
        Ok(count)
    }

    /// Respawn recurring commitments that ran their course.
    ///
    /// Only terminal records (Fulfilled or Settled) are eligible; a
    /// Pending commitment is still live and is left alone, and immediate
    /// penalties never recur. The fresh record replaces its source, so a
    /// single obligation cannot respawn twice. Returns the respawn count.
    pub fn review_recurring_commitments(&mut self) -> Result<usize> {
        let now = self.now();
        let today = now.date();
        if self.state.counters.last_commitment_review_day == Some(today) {
            return Ok(0);
        }
        self.state.counters.last_commitment_review_day = Some(today);

        let respawned: Vec<(String, Penalty)> = self
            .state
            .penalties
            .iter()
            .filter(|p| {
                p.is_commitment
                    && p.recurrence.is_recurring()
                    && (p.completed || p.penalty_applied)
                    && recurrence_due(p, today)
            })
            .map(|p| (p.id.clone(), respawn(p, now, today)))
            .collect();
        if respawned.is_empty() {
            self.persist_counters()?;
            return Ok(0);
        }

        let replaced: Vec<String> = respawned.iter().map(|(id, _)| id.clone()).collect();
        self.state.penalties.retain(|p| !replaced.contains(&p.id));
        let count = respawned.len();
        for (_, fresh) in respawned {
            self.notify(
                &format!("Recurring commitment \"{}\" is active again.", fresh.reason),
                Severity::Info,
            );
            self.state.penalties.push(fresh);
        }

        self.persist_penalties()?;
        self.persist_counters()?;
        self.sync_social_time()?;
        Ok(count)
    }

    /// Whether the daily reset has not yet run today.
    pub fn needs_daily_reset(&self) -> bool {
        self.state.counters.last_reset_day != Some(self.now().date())
    }

    /// Mark every goal incomplete for the new day and record the run.
    ///
    /// Lifetime counters and the streak are untouched; this only clears
    /// completion state.
    pub fn reset_daily_goals(&mut self) -> Result<()> {
        let today = self.now().date();
        for goal in &mut self.state.goals {
            goal.completed = false;
        }
        self.state.counters.last_reset_day = Some(today);
        self.state.counters.all_goals_completed = false;
        self.persist_goals()?;
        self.persist_counters()?;
        self.notify("Daily goals reset for the new day.", Severity::Info);
        self.sync_social_time()?;
        Ok(())
    }
}

/// Whether a recurring record's period has come around again on `today`.
fn recurrence_due(penalty: &Penalty, today: NaiveDate) -> bool {
    let recorded = penalty.timestamp.date();
    match penalty.recurrence {
        PenaltyRecurrence::Once => false,
        PenaltyRecurrence::Daily => recorded != today,
        PenaltyRecurrence::Weekly => (today - recorded).num_days() >= 7,
        PenaltyRecurrence::Monthly => {
            (today.year(), today.month()) > (recorded.year(), recorded.month())
        }
        PenaltyRecurrence::Custom { days } => {
            days.contains(today.weekday()) && recorded != today
        }
    }
}

/// Fresh Pending record for the next period.
fn respawn(penalty: &Penalty, now: NaiveDateTime, today: NaiveDate) -> Penalty {
    let due_date = match penalty.recurrence {
        PenaltyRecurrence::Weekly => penalty
            .due_date
            .map(|d| advance_to(d, today, |d| d + Duration::days(7))),
        PenaltyRecurrence::Monthly => penalty.due_date.map(|d| {
            advance_to(d, today, |d| {
                d.checked_add_months(Months::new(1))
                    .unwrap_or(d + Duration::days(30))
            })
        }),
        // Daily and custom obligations are due again today; Once cannot
        // reach here.
        _ => Some(today),
    };

    Penalty {
        id: Uuid::new_v4().to_string(),
        timestamp: now,
        due_date,
        completed: false,
        penalty_applied: false,
        ..penalty.clone()
    }
}

/// Step `date` forward until it is on or after `target`.
fn advance_to(mut date: NaiveDate, target: NaiveDate, step: impl Fn(NaiveDate) -> NaiveDate) -> NaiveDate {
    while date < target {
        date = step(date);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{fixture, monday_9am};
    use crate::goal::{GoalRecurrence, NewGoal, RewardKind, WeekdaySet};
    use crate::penalty::{CommitmentState, DueAt, NewPenalty};

    fn recurring_goal(text: &str, recurrence: GoalRecurrence) -> NewGoal {
        NewGoal {
            text: text.to_string(),
            reward_kind: RewardKind::SocialTime,
            reward_amount: 10,
            recurrence,
            ..NewGoal::default()
        }
    }

    #[test]
    fn completed_daily_goal_regenerates_with_fresh_identity() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        let id = engine
            .add_goal(recurring_goal("30 minutes of exercise", GoalRecurrence::Daily))
            .unwrap();
        engine.toggle_goal(&id).unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 1);

        assert_eq!(engine.goals().len(), 1);
        let fresh = &engine.goals()[0];
        assert_ne!(fresh.id, id);
        assert!(!fresh.completed);
        // Regeneration replaced the completed instance, so the earned
        // social time is gone with it.
        assert_eq!(engine.social_time_budget(), 0);
    }

    #[test]
    fn once_goals_and_incomplete_goals_do_not_regenerate() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        let once = engine
            .add_goal(recurring_goal("One-off errand", GoalRecurrence::Once))
            .unwrap();
        engine
            .add_goal(recurring_goal("Still open", GoalRecurrence::Daily))
            .unwrap();
        engine.toggle_goal(&once).unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 0);
        assert_eq!(engine.goals().len(), 2);
    }

    #[test]
    fn weekday_goal_skips_the_weekend() {
        // Completed on Friday 2024-03-08; Saturday brings nothing.
        let friday = NaiveDate::from_ymd_opt(2024, 3, 8)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let (mut engine, clock, _notifier, _store) = fixture(friday);
        let id = engine
            .add_goal(recurring_goal("Finish the pending report", GoalRecurrence::Weekdays))
            .unwrap();
        engine.toggle_goal(&id).unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 0);

        // Monday regenerates it.
        clock.advance(Duration::days(2));
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 1);
    }

    #[test]
    fn custom_goal_regenerates_on_selected_days_only() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        // Mondays and Wednesdays.
        let id = engine
            .add_goal(recurring_goal(
                "Swim practice",
                GoalRecurrence::Custom {
                    days: WeekdaySet([true, false, true, false, false, false, false]),
                },
            ))
            .unwrap();
        engine.toggle_goal(&id).unwrap();

        clock.advance(Duration::days(1)); // Tuesday
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 0);
        clock.advance(Duration::days(1)); // Wednesday
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 1);
    }

    #[test]
    fn regeneration_runs_at_most_once_per_day() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        let id = engine
            .add_goal(recurring_goal("30 minutes of exercise", GoalRecurrence::Daily))
            .unwrap();
        engine.toggle_goal(&id).unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 1);

        // Complete the fresh clone; a second pass the same day must not
        // clone it again.
        let fresh = engine.goals()[0].id.clone();
        engine.toggle_goal(&fresh).unwrap();
        assert_eq!(engine.regenerate_recurring_goals().unwrap(), 0);
    }

    #[test]
    fn settled_daily_commitment_respawns_pending_next_day() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        engine
            .register_penalty(NewPenalty {
                reason: "Practice scales".to_string(),
                kind: RewardKind::Points,
                amount: 5,
                due: Some(DueAt {
                    date: monday_9am().date(),
                    time: monday_9am().time(),
                }),
                recurrence: PenaltyRecurrence::Daily,
                linked_challenge: None,
            })
            .unwrap();

        clock.advance(Duration::hours(1));
        engine.sweep_overdue().unwrap();
        assert_eq!(engine.penalties()[0].state(), CommitmentState::Settled);

        clock.advance(Duration::days(1));
        assert_eq!(engine.review_recurring_commitments().unwrap(), 1);

        assert_eq!(engine.penalties().len(), 1);
        let fresh = &engine.penalties()[0];
        assert_eq!(fresh.state(), CommitmentState::Pending);
        assert_eq!(fresh.due_date, Some(monday_9am().date() + Duration::days(1)));
        assert_eq!(fresh.due_time, Some(monday_9am().time()));
        // The settled debit is still on the books.
        assert_eq!(engine.transactions().len(), 1);
    }

    #[test]
    fn fulfilled_weekly_commitment_respawns_after_seven_days() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        let id = engine
            .register_penalty(NewPenalty {
                reason: "Call home".to_string(),
                kind: RewardKind::SocialTime,
                amount: 15,
                due: Some(DueAt {
                    date: monday_9am().date() + Duration::days(2),
                    time: monday_9am().time(),
                }),
                recurrence: PenaltyRecurrence::Weekly,
                linked_challenge: None,
            })
            .unwrap();
        engine.fulfill_commitment(&id).unwrap();

        // Too soon after the record's timestamp.
        clock.advance(Duration::days(3));
        assert_eq!(engine.review_recurring_commitments().unwrap(), 0);

        clock.advance(Duration::days(4));
        assert_eq!(engine.review_recurring_commitments().unwrap(), 1);
        let fresh = &engine.penalties()[0];
        assert_eq!(fresh.state(), CommitmentState::Pending);
        // Deadline stepped in 7-day increments to on-or-after today.
        assert_eq!(fresh.due_date, Some(monday_9am().date() + Duration::days(9)));
    }

    #[test]
    fn pending_recurring_commitment_is_left_alone() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        let id = engine
            .register_penalty(NewPenalty {
                reason: "Practice scales".to_string(),
                kind: RewardKind::Points,
                amount: 5,
                due: Some(DueAt {
                    date: monday_9am().date() + Duration::days(5),
                    time: monday_9am().time(),
                }),
                recurrence: PenaltyRecurrence::Daily,
                linked_challenge: None,
            })
            .unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(engine.review_recurring_commitments().unwrap(), 0);
        assert_eq!(engine.penalties()[0].id, id);
    }

    #[test]
    fn commitment_review_runs_at_most_once_per_day() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        engine
            .register_penalty(NewPenalty {
                reason: "Practice scales".to_string(),
                kind: RewardKind::Points,
                amount: 5,
                due: Some(DueAt {
                    date: monday_9am().date(),
                    time: monday_9am().time(),
                }),
                recurrence: PenaltyRecurrence::Daily,
                linked_challenge: None,
            })
            .unwrap();
        clock.advance(Duration::hours(1));
        engine.sweep_overdue().unwrap();

        clock.advance(Duration::days(1));
        assert_eq!(engine.review_recurring_commitments().unwrap(), 1);
        // Settle the respawn, then review again the same day: guard holds.
        engine.sweep_overdue().unwrap();
        assert_eq!(engine.review_recurring_commitments().unwrap(), 0);
    }

    #[test]
    fn daily_reset_clears_completions_but_not_lifetime_counters() {
        let (mut engine, clock, _notifier, _store) = fixture(monday_9am());
        // A fresh profile has never reset.
        assert!(engine.needs_daily_reset());
        engine.reset_daily_goals().unwrap();
        assert!(!engine.needs_daily_reset());

        let id = engine
            .add_goal(recurring_goal("30 minutes of exercise", GoalRecurrence::Daily))
            .unwrap();
        engine.toggle_goal(&id).unwrap();

        clock.advance(Duration::days(1));
        assert!(engine.needs_daily_reset());
        engine.reset_daily_goals().unwrap();

        assert!(engine.goals().iter().all(|g| !g.completed));
        assert_eq!(engine.counters().completed_goals, 1);
        assert_eq!(engine.counters().streak, 1);
        assert!(!engine.needs_daily_reset());
    }
}
