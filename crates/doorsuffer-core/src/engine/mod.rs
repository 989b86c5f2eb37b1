//! The settlement engine.
//!
//! [`Engine`] is the single coordinator that owns all mutable state (goals,
//! penalties, ledger, counters) and the collaborator seams (clock, notifier,
//! store). Every operation is synchronous; derived values read the state the
//! operation just left behind. Hosts drive the periodic pieces themselves:
//! call [`Engine::sweep_overdue`] on a timer and [`Engine::run_daily_jobs`]
//! once per day (both are idempotent and cheap to over-call).
//!
//! Operations are grouped by concern:
//!
//! - `goals`: add/delete/toggle, streaks, the Pomodoro unlock
//! - `commitments`: registration, fulfillment, the overdue sweep
//! - `regen`: daily regeneration, recurring-commitment respawn, daily reset

mod commitments;
mod goals;
mod regen;

pub use goals::ToggleOutcome;
pub use regen::DailyRunSummary;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::budget;
use crate::clock::Clock;
use crate::error::Result;
use crate::goal::{Goal, GoalPenalty, GoalRecurrence, NewGoal, RewardKind};
use crate::ledger::{PointLedger, PointTransaction};
use crate::notify::{Notifier, Severity};
use crate::penalty::Penalty;
use crate::stats::{self, MetricsSnapshot};
use crate::storage::{keys, EngineConfig, Store};

/// Persistent counters and day markers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    /// Lifetime completed-goal count (decrements when a goal is unchecked).
    #[serde(default)]
    pub completed_goals: u32,
    /// Consecutive active days.
    #[serde(default)]
    pub streak: u32,
    /// Last local day a goal completion was recorded.
    #[serde(default)]
    pub last_active_day: Option<NaiveDate>,
    #[serde(default)]
    pub last_reset_day: Option<NaiveDate>,
    #[serde(default)]
    pub last_regen_day: Option<NaiveDate>,
    #[serde(default)]
    pub last_commitment_review_day: Option<NaiveDate>,
    /// One-way unlock; survives the completed count dropping back below
    /// the threshold.
    #[serde(default)]
    pub pomodoro_unlocked: bool,
    /// Whether the "all goals done" congratulation has fired for the
    /// current goal set.
    #[serde(default)]
    pub all_goals_completed: bool,
    /// Cache of the derived social-time budget, kept only so changes can
    /// be detected and announced. Reads always recompute.
    #[serde(default)]
    pub social_time_minutes: u32,
}

/// All mutable engine state, owned by the coordinator.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub goals: Vec<Goal>,
    pub penalties: Vec<Penalty>,
    pub ledger: PointLedger,
    pub counters: Counters,
}

/// The settlement engine coordinator.
pub struct Engine {
    state: EngineState,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
    store: Box<dyn Store>,
}

impl Engine {
    /// Build an engine from persisted state.
    ///
    /// Loading is fail-soft: a missing or unreadable snapshot becomes an
    /// empty collection (or the seeded starter goals for the goals key,
    /// when enabled); structurally invalid entries are discarded wholesale.
    pub fn new(
        config: EngineConfig,
        clock: Box<dyn Clock>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn Store>,
    ) -> Self {
        let goals = match store.load(keys::DAILY_GOALS) {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None if config.seed_default_goals => default_goals(clock.now()),
            None => Vec::new(),
        };
        let penalties = load_or_default(store.as_ref(), keys::PENALTIES);
        let transactions: Vec<PointTransaction> =
            load_or_default(store.as_ref(), keys::POINT_TRANSACTIONS);
        let counters = load_or_default(store.as_ref(), keys::COUNTERS);

        Self {
            state: EngineState {
                goals,
                penalties,
                ledger: PointLedger::from_transactions(transactions),
                counters,
            },
            config,
            clock,
            notifier,
            store,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn goals(&self) -> &[Goal] {
        &self.state.goals
    }

    pub fn penalties(&self) -> &[Penalty] {
        &self.state.penalties
    }

    pub fn transactions(&self) -> &[PointTransaction] {
        self.state.ledger.transactions()
    }

    pub fn counters(&self) -> &Counters {
        &self.state.counters
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current point balance, derived from the transaction log.
    pub fn points_balance(&self) -> i64 {
        self.state.ledger.balance()
    }

    /// Current social-time budget in minutes, derived from goals and
    /// penalties.
    pub fn social_time_budget(&self) -> u32 {
        budget::social_time_budget(&self.state.goals, &self.state.penalties)
    }

    /// Aggregated activity metrics for retrospective views.
    pub fn metrics(&self) -> MetricsSnapshot {
        stats::summarize(
            &self.state.goals,
            &self.state.penalties,
            self.state.ledger.transactions(),
        )
    }

    // ── Internal ─────────────────────────────────────────────────────

    pub(crate) fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub(crate) fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity);
    }

    pub(crate) fn persist_goals(&self) -> Result<()> {
        let value = serde_json::to_value(&self.state.goals)?;
        self.store.save(keys::DAILY_GOALS, &value)?;
        Ok(())
    }

    pub(crate) fn persist_penalties(&self) -> Result<()> {
        let value = serde_json::to_value(&self.state.penalties)?;
        self.store.save(keys::PENALTIES, &value)?;
        Ok(())
    }

    pub(crate) fn persist_ledger(&self) -> Result<()> {
        let value = serde_json::to_value(self.state.ledger.transactions())?;
        self.store.save(keys::POINT_TRANSACTIONS, &value)?;
        Ok(())
    }

    pub(crate) fn persist_counters(&self) -> Result<()> {
        let value = serde_json::to_value(&self.state.counters)?;
        self.store.save(keys::COUNTERS, &value)?;
        Ok(())
    }

    /// Recompute the derived budget and announce it when it moved.
    ///
    /// Call after any mutation of goals or penalties.
    pub(crate) fn sync_social_time(&mut self) -> Result<()> {
        let net = budget::social_time_budget(&self.state.goals, &self.state.penalties);
        if net != self.state.counters.social_time_minutes {
            self.state.counters.social_time_minutes = net;
            self.notifier.notify(
                &format!("Social media time updated: {net} minutes available."),
                Severity::Info,
            );
            self.persist_counters()?;
        }
        Ok(())
    }

    /// Fire the all-goals-done congratulation once per completed set and
    /// re-arm it when the set becomes incomplete again.
    pub(crate) fn refresh_all_completed_flag(&mut self) -> Result<()> {
        let all_done =
            !self.state.goals.is_empty() && self.state.goals.iter().all(|g| g.completed);
        if all_done && !self.state.counters.all_goals_completed {
            self.state.counters.all_goals_completed = true;
            self.notifier.notify(
                "Congratulations! You completed all of today's goals.",
                Severity::Success,
            );
            self.persist_counters()?;
        } else if !all_done && self.state.counters.all_goals_completed {
            self.state.counters.all_goals_completed = false;
            self.persist_counters()?;
        }
        Ok(())
    }
}

fn load_or_default<T: DeserializeOwned + Default>(store: &dyn Store, key: &str) -> T {
    store
        .load(key)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

/// Starter goals seeded into a fresh profile.
fn default_goals(at: NaiveDateTime) -> Vec<Goal> {
    [
        NewGoal {
            text: "30 minutes of exercise".to_string(),
            category: "Physical Health".to_string(),
            reward_kind: RewardKind::SocialTime,
            reward_amount: 15,
            recurrence: GoalRecurrence::Daily,
            ..NewGoal::default()
        },
        NewGoal {
            text: "Meditate for 10 minutes".to_string(),
            category: "Mental Health".to_string(),
            reward_kind: RewardKind::SocialTime,
            reward_amount: 10,
            recurrence: GoalRecurrence::Daily,
            ..NewGoal::default()
        },
        NewGoal {
            text: "Finish the pending report".to_string(),
            category: "Work".to_string(),
            reward_kind: RewardKind::Points,
            reward_amount: 20,
            due_time: NaiveTime::from_hms_opt(17, 0, 0),
            penalty: Some(GoalPenalty {
                kind: RewardKind::Points,
                amount: 5,
            }),
            recurrence: GoalRecurrence::Weekdays,
            ..NewGoal::default()
        },
    ]
    .into_iter()
    .map(|new| new.into_goal(at))
    .collect()
}
