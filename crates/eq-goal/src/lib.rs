//! # eq-goal
//!
//! Goal tracking, scoring, and persistence for Eternal Quest.
//!
//! A [`Goal`] pays out points each time an event is recorded against it.
//! How much it pays, and when it stops, depends on its variant:
//! Simple goals pay once, Eternal goals pay forever, and Checklist goals pay
//! per event with a bonus on the final one. A [`GoalTracker`] owns an ordered
//! list of goals and the score they have earned.
//!
//! ## Key components
//!
//! - [`Goal`] / [`GoalKind`] - the three reward state machines
//! - [`GoalTracker`] - goal list, running score, text serialization
//! - [`codec`] - the line-oriented persisted format
//! - [`GoalStore`] - file persistence for a tracker
//! - [`QuestEvent`] / [`EventDispatcher`] - change notifications (JSONL log, etc.)
//! - [`QuestConfig`] - `.eq/config.toml`

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod goal;
pub mod store;
pub mod tracker;

pub use config::QuestConfig;
pub use error::GoalError;
pub use events::{EventDispatcher, LogSink, NotificationSink, QuestEvent};
pub use goal::{Goal, GoalKind, GoalSpec, GoalVariant};
pub use store::GoalStore;
pub use tracker::{GoalTracker, GoalView, Progress, RecordOutcome};
