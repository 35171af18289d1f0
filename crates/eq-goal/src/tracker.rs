// tracker.rs - GoalTracker: the ordered goal list plus the running score.
//
// The score is the sum of every reward handed out by `record_event` since the
// tracker was created or last loaded. It only ever goes up.
//
// Loading is all-or-nothing: the incoming text is parsed into a staging
// tracker first and only swapped in once every line has parsed.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::codec;
use crate::error::GoalError;
use crate::goal::{Goal, GoalSpec, GoalVariant};

/// Result of recording one event against a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// Points earned by this event.
    pub reward: u32,
    /// Tracker score after adding the reward.
    pub score: u64,
    /// Whether the goal is complete after this event.
    pub completed: bool,
}

/// Checklist progress shown alongside a goal in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: u32,
    pub required: u32,
}

/// Read-only presentation of one goal, as yielded by [`GoalTracker::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalView<'a> {
    /// 1-based position in the tracker. Presentation only, never persisted.
    pub number: usize,
    pub status_label: &'static str,
    pub name: &'a str,
    pub description: &'a str,
    pub variant: GoalVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
}

impl<'a> GoalView<'a> {
    fn new(number: usize, goal: &'a Goal) -> Self {
        Self {
            number,
            status_label: goal.status_label(),
            name: goal.name(),
            description: goal.description(),
            variant: goal.variant(),
            progress: goal
                .progress()
                .map(|(completed, required)| Progress {
                    completed,
                    required,
                }),
        }
    }
}

impl fmt::Display for GoalView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} {} ({})",
            self.number, self.status_label, self.name, self.description
        )?;
        if let Some(p) = self.progress {
            write!(f, " -- Currently completed: {}/{}", p.completed, p.required)?;
        }
        Ok(())
    }
}

/// Owns the goals and the score accumulated by recording against them.
///
/// `Serialize` produces a JSON snapshot for reports. The persisted form is
/// [`GoalTracker::serialize`], which is the only format read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoalTracker {
    score: u64,
    goals: Vec<Goal>,
}

impl GoalTracker {
    /// An empty tracker with a score of 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `spec`, build the goal, and append it.
    ///
    /// Returns the zero-based index of the new goal. On error nothing is added.
    pub fn create_goal(&mut self, spec: &GoalSpec) -> Result<usize, GoalError> {
        let goal = spec.build()?;
        self.goals.push(goal);
        let index = self.goals.len() - 1;
        debug!(index, name = %spec.name, variant = %spec.variant, "goal created");
        Ok(index)
    }

    /// Lazy view over the goals in insertion order. Call again to restart.
    pub fn list(&self) -> impl ExactSizeIterator<Item = GoalView<'_>> + '_ {
        self.goals
            .iter()
            .enumerate()
            .map(|(i, goal)| GoalView::new(i + 1, goal))
    }

    /// Record one event against the goal at zero-based `index` and add the
    /// reward to the score.
    pub fn record_event(&mut self, index: usize) -> Result<RecordOutcome, GoalError> {
        let len = self.goals.len();
        let goal = self
            .goals
            .get_mut(index)
            .ok_or(GoalError::IndexOutOfRange { index, len })?;

        let reward = goal.record_event();
        self.score = self.score.saturating_add(u64::from(reward));
        let completed = goal.is_complete();

        debug!(
            index,
            name = goal.name(),
            reward,
            score = self.score,
            completed,
            "event recorded"
        );
        Ok(RecordOutcome {
            reward,
            score: self.score,
            completed,
        })
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, index: usize) -> Option<&Goal> {
        self.goals.get(index)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Canonical persisted form: the score line, then one line per goal.
    pub fn serialize(&self) -> String {
        codec::encode_state(self.score, &self.goals)
    }

    /// Parse a persisted blob into a new tracker.
    pub fn deserialize(text: &str) -> Result<Self, GoalError> {
        let (score, goals) = codec::decode_state(text)?;
        Ok(Self { goals, score })
    }

    /// Replace this tracker's goals and score with the persisted state in
    /// `text`. On error the tracker is left exactly as it was.
    pub fn load(&mut self, text: &str) -> Result<(), GoalError> {
        let staged = Self::deserialize(text)?;
        info!(
            goals = staged.goals.len(),
            score = staged.score,
            replaced = self.goals.len(),
            "tracker state loaded"
        );
        *self = staged;
        Ok(())
    }
}

impl FromStr for GoalTracker {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s)
    }
}
