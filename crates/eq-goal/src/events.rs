// events.rs - Event model and notification dispatch.
//
// Every state change made through the CLI emits a QuestEvent. Sinks decide
// what to do with it; the always-on sink appends JSON lines to a log file so
// a player's history can be replayed or inspected with jq.
//
// Dispatch is synchronous. A failing sink is logged and skipped; it never
// fails the operation that produced the event.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::QuestConfig;
use crate::error::GoalError;
use crate::goal::{Goal, GoalVariant};
use crate::tracker::{GoalTracker, RecordOutcome};

/// Events emitted when goals or the score change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum QuestEvent {
    /// A goal was appended to the tracker.
    GoalCreated {
        index: usize,
        name: String,
        variant: GoalVariant,
        point_value: u32,
        timestamp: DateTime<Utc>,
    },

    /// An event was recorded against a goal.
    EventRecorded {
        index: usize,
        name: String,
        reward: u32,
        score: u64,
        completed: bool,
        timestamp: DateTime<Utc>,
    },

    /// The tracker was replaced with persisted state.
    StateLoaded {
        goals: usize,
        score: u64,
        source: String,
        timestamp: DateTime<Utc>,
    },

    /// The tracker was written out.
    StateSaved {
        goals: usize,
        score: u64,
        target: String,
        timestamp: DateTime<Utc>,
    },
}

impl QuestEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            QuestEvent::GoalCreated { .. } => "goal_created",
            QuestEvent::EventRecorded { .. } => "event_recorded",
            QuestEvent::StateLoaded { .. } => "state_loaded",
            QuestEvent::StateSaved { .. } => "state_saved",
        }
    }

    pub fn goal_created(index: usize, goal: &Goal) -> Self {
        QuestEvent::GoalCreated {
            index,
            name: goal.name().to_string(),
            variant: goal.variant(),
            point_value: goal.point_value(),
            timestamp: Utc::now(),
        }
    }

    pub fn event_recorded(index: usize, goal: &Goal, outcome: &RecordOutcome) -> Self {
        QuestEvent::EventRecorded {
            index,
            name: goal.name().to_string(),
            reward: outcome.reward,
            score: outcome.score,
            completed: outcome.completed,
            timestamp: Utc::now(),
        }
    }

    pub fn state_loaded(tracker: &GoalTracker, source: &Path) -> Self {
        QuestEvent::StateLoaded {
            goals: tracker.len(),
            score: tracker.score(),
            source: source.display().to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn state_saved(tracker: &GoalTracker, target: &Path) -> Self {
        QuestEvent::StateSaved {
            goals: tracker.len(),
            score: tracker.score(),
            target: target.display().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Receives quest events.
pub trait NotificationSink: Send {
    /// Short label used when a delivery fails.
    fn name(&self) -> &str;

    /// Handle an event. Errors are logged by the dispatcher, never propagated.
    fn send(&self, event: &QuestEvent) -> Result<(), GoalError>;
}

/// Appends one JSON object per event to the project's event log.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> GoalError {
        GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "event-log"
    }

    fn send(&self, event: &QuestEvent) -> Result<(), GoalError> {
        // Serialize before touching the file so a bad event never leaves a
        // partial record behind.
        let mut record = serde_json::to_vec(event)?;
        record.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.exists()) {
            fs::create_dir_all(parent).map_err(|source| GoalError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(&record))
            .map_err(|source| self.io_error(source))
    }
}

/// Fans events out to every configured sink.
///
/// A failing sink is reported via tracing and skipped; the command that
/// produced the event still succeeds.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    /// A dispatcher with no sinks; events go nowhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sinks a project asked for in `.eq/config.toml`.
    pub fn from_config(config: &QuestConfig) -> Self {
        let mut dispatcher = Self::new();
        if config.events.enabled {
            dispatcher.add_sink(Box::new(LogSink::new(config.events_path())));
        }
        dispatcher
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver `event` to every sink. Returns how many accepted it.
    pub fn dispatch(&self, event: &QuestEvent) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.send(event) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    sink = sink.name(),
                    event = event.event_type(),
                    "event not delivered: {}",
                    e
                ),
            }
        }
        debug!(
            event = event.event_type(),
            delivered,
            sinks = self.sinks.len(),
            "event dispatched"
        );
        delivered
    }
}
