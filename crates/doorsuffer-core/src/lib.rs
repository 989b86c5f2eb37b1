//! # Doorsuffer Core Library
//!
//! This library provides the core business logic for Doorsuffer, a personal
//! habit tracker built around commitments: goals earn points or leisure time,
//! missed promises cost them. The library is headless; a desktop shell or
//! CLI supplies the clock ticks, displays notifications, and renders state.
//!
//! ## Architecture
//!
//! - **Settlement Engine**: A single coordinator owning all mutable state,
//!   driven synchronously by the caller (toggle a goal, register a penalty,
//!   run the overdue sweep on a timer)
//! - **Point Ledger**: Append-only transaction log; the balance is derived,
//!   never stored, and clamps at zero
//! - **Storage**: Key-value JSON snapshots and TOML-based configuration
//! - **Collaborator seams**: Clock, Notifier, and Store traits so hosts and
//!   tests inject their own time, notification, and persistence backends
//!
//! ## Key Components
//!
//! - [`Engine`]: The settlement engine coordinator
//! - [`PointLedger`]: Append-only point transaction log
//! - [`Goal`] / [`Penalty`]: The goal and penalty/commitment records
//! - [`EngineConfig`]: Engine tunables, persisted as TOML

pub mod budget;
pub mod clock;
pub mod engine;
pub mod error;
pub mod goal;
pub mod ledger;
pub mod notify;
pub mod penalty;
pub mod stats;
pub mod storage;

pub use budget::social_time_budget;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Counters, DailyRunSummary, Engine, EngineState, ToggleOutcome};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use goal::{Goal, GoalPenalty, GoalRecurrence, NewGoal, RewardKind, WeekdaySet};
pub use ledger::{PointLedger, PointTransaction, TransactionId};
pub use notify::{BufferedNotifier, Notice, Notifier, NullNotifier, Severity};
pub use penalty::{CommitmentState, DueAt, NewPenalty, Penalty, PenaltyRecurrence};
pub use stats::MetricsSnapshot;
pub use storage::{EngineConfig, JsonFileStore, MemoryStore, Store};
