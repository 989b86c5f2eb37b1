//! Daily goal data model.
//!
//! A goal is a user-defined daily task with a completion state, a reward,
//! an optional time-of-day deadline with an optional late penalty, and a
//! recurrence rule consumed by the daily regenerator.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a reward or penalty is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardKind {
    /// Ledger points.
    Points,
    /// Minutes of social-media time (derived budget, never hits the ledger).
    SocialTime,
}

/// Monday-first set of weekdays for custom recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySet(pub [bool; 7]);

impl WeekdaySet {
    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|d| *d)
    }
}

/// Recurrence rule for goals.
///
/// The custom variant carries its day set directly, so a custom rule
/// without seven days cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GoalRecurrence {
    Once,
    Daily,
    /// Monday through Friday.
    Weekdays,
    Custom {
        days: WeekdaySet,
    },
}

impl GoalRecurrence {
    /// Whether a completed goal with this rule regenerates on `date`.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            GoalRecurrence::Once => false,
            GoalRecurrence::Daily => true,
            GoalRecurrence::Weekdays => {
                date.weekday().num_days_from_monday() < 5
            }
            GoalRecurrence::Custom { days } => days.contains(date.weekday()),
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, GoalRecurrence::Once)
    }
}

/// Late-completion penalty attached to a goal.
///
/// Kind and amount travel together; a penalty kind can never be present
/// without an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalPenalty {
    pub kind: RewardKind,
    pub amount: u32,
}

/// A user-defined daily goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub text: String,
    pub category: String,
    pub completed: bool,
    pub reward_kind: RewardKind,
    pub reward_amount: u32,
    /// Local time-of-day deadline. Completing after it is "late".
    #[serde(default)]
    pub due_time: Option<NaiveTime>,
    /// Immediate consequence applied when the goal is completed late.
    #[serde(default)]
    pub penalty: Option<GoalPenalty>,
    pub recurrence: GoalRecurrence,
    #[serde(default)]
    pub linked_to_challenge: bool,
    pub created_at: NaiveDateTime,
}

impl Goal {
    /// Regenerate this goal for a new day: fresh id, not completed.
    pub(crate) fn regenerated(&self, at: NaiveDateTime) -> Goal {
        Goal {
            id: Uuid::new_v4().to_string(),
            completed: false,
            created_at: at,
            ..self.clone()
        }
    }
}

/// Request payload for creating a goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub text: String,
    pub category: String,
    pub reward_kind: RewardKind,
    pub reward_amount: u32,
    pub due_time: Option<NaiveTime>,
    pub penalty: Option<GoalPenalty>,
    pub recurrence: GoalRecurrence,
    pub linked_to_challenge: bool,
}

impl Default for NewGoal {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: "General".to_string(),
            reward_kind: RewardKind::SocialTime,
            reward_amount: 0,
            due_time: None,
            penalty: None,
            recurrence: GoalRecurrence::Once,
            linked_to_challenge: false,
        }
    }
}

impl NewGoal {
    pub(crate) fn into_goal(self, at: NaiveDateTime) -> Goal {
        Goal {
            id: Uuid::new_v4().to_string(),
            text: self.text,
            category: self.category,
            completed: false,
            reward_kind: self.reward_kind,
            reward_amount: self.reward_amount,
            due_time: self.due_time,
            penalty: self.penalty,
            recurrence: self.recurrence,
            linked_to_challenge: self.linked_to_challenge,
            created_at: at,
        }
    }
}
