// goal.rs - Goal: a trackable unit of progress with a reward rule.
//
// Every goal carries a name, a description, and a point value that never
// change after construction. What differs between goals is how recording an
// event pays out and when the goal counts as complete:
//
//   Simple     pays once, then is complete forever
//   Eternal    pays every time, never completes
//   Checklist  pays per event, plus a one-time bonus on the Nth event
//
// The variant-specific state lives in `GoalKind`, so a `match` over it is
// checked for exhaustiveness by the compiler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::GoalError;

/// Which reward rule a goal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalVariant {
    Simple,
    Eternal,
    Checklist,
}

impl GoalVariant {
    /// Tag written as the first field of a persisted goal line.
    pub fn tag(&self) -> &'static str {
        match self {
            GoalVariant::Simple => "SimpleGoal",
            GoalVariant::Eternal => "EternalGoal",
            GoalVariant::Checklist => "ChecklistGoal",
        }
    }

    /// Inverse of [`GoalVariant::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SimpleGoal" => Some(GoalVariant::Simple),
            "EternalGoal" => Some(GoalVariant::Eternal),
            "ChecklistGoal" => Some(GoalVariant::Checklist),
            _ => None,
        }
    }
}

impl fmt::Display for GoalVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalVariant::Simple => write!(f, "simple"),
            GoalVariant::Eternal => write!(f, "eternal"),
            GoalVariant::Checklist => write!(f, "checklist"),
        }
    }
}

impl FromStr for GoalVariant {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(GoalVariant::Simple),
            "eternal" => Ok(GoalVariant::Eternal),
            "checklist" => Ok(GoalVariant::Checklist),
            other => Err(GoalError::validation(
                "variant",
                format!("expected simple, eternal or checklist, got {other:?}"),
            )),
        }
    }
}

/// Variant-specific progress state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum GoalKind {
    /// Completed by a single event.
    Simple { completed: bool },

    /// Never completes; every event pays.
    Eternal,

    /// Completed after `times_required` events, which also pays `bonus_points`.
    Checklist {
        times_completed: u32,
        times_required: u32,
        bonus_points: u32,
    },
}

impl GoalKind {
    pub fn variant(&self) -> GoalVariant {
        match self {
            GoalKind::Simple { .. } => GoalVariant::Simple,
            GoalKind::Eternal => GoalVariant::Eternal,
            GoalKind::Checklist { .. } => GoalVariant::Checklist,
        }
    }
}

/// A goal and its progress.
///
/// Fields are private: the only way to change a goal after construction is
/// [`Goal::record_event`], which keeps the per-variant invariants intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    name: String,
    description: String,
    point_value: u32,
    #[serde(flatten)]
    kind: GoalKind,
}

impl Goal {
    /// Create a Simple goal that pays `points` once.
    pub fn simple(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
    ) -> Result<Self, GoalError> {
        Self::build(
            name.into(),
            description.into(),
            points,
            GoalKind::Simple { completed: false },
        )
    }

    /// Create an Eternal goal that pays `points` on every event.
    pub fn eternal(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
    ) -> Result<Self, GoalError> {
        Self::build(name.into(), description.into(), points, GoalKind::Eternal)
    }

    /// Create a Checklist goal that pays `points` per event and
    /// `bonus_points` on top when the `times_required`th event lands.
    pub fn checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
        times_required: i64,
        bonus_points: i64,
    ) -> Result<Self, GoalError> {
        let times_required = to_amount("times_required", times_required)?;
        if times_required == 0 {
            return Err(GoalError::validation(
                "times_required",
                "must be at least 1",
            ));
        }
        let bonus_points = to_amount("bonus_points", bonus_points)?;
        Self::build(
            name.into(),
            description.into(),
            points,
            GoalKind::Checklist {
                times_completed: 0,
                times_required,
                bonus_points,
            },
        )
    }

    fn build(
        name: String,
        description: String,
        points: i64,
        kind: GoalKind,
    ) -> Result<Self, GoalError> {
        let point_value = to_amount("point_value", points)?;
        Self::restore(name, description, point_value, kind)
    }

    /// Rebuild a goal from persisted state, checking every invariant a
    /// freshly constructed goal would satisfy.
    pub(crate) fn restore(
        name: String,
        description: String,
        point_value: u32,
        kind: GoalKind,
    ) -> Result<Self, GoalError> {
        check_text("name", &name)?;
        check_text("description", &description)?;
        if let GoalKind::Checklist {
            times_completed,
            times_required,
            ..
        } = kind
        {
            if times_required == 0 {
                return Err(GoalError::validation(
                    "times_required",
                    "must be at least 1",
                ));
            }
            if times_completed > times_required {
                return Err(GoalError::validation(
                    "times_completed",
                    format!("{times_completed} exceeds times_required {times_required}"),
                ));
            }
        }
        Ok(Self {
            name,
            description,
            point_value,
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Points awarded per qualifying event.
    pub fn point_value(&self) -> u32 {
        self.point_value
    }

    pub fn kind(&self) -> &GoalKind {
        &self.kind
    }

    pub fn variant(&self) -> GoalVariant {
        self.kind.variant()
    }

    /// True when no further event can earn points.
    pub fn is_complete(&self) -> bool {
        match self.kind {
            GoalKind::Simple { completed } => completed,
            GoalKind::Eternal => false,
            GoalKind::Checklist {
                times_completed,
                times_required,
                ..
            } => times_completed >= times_required,
        }
    }

    /// Register one qualifying occurrence and return the points it earned.
    ///
    /// Complete goals return 0 and are left untouched.
    pub fn record_event(&mut self) -> u32 {
        match &mut self.kind {
            GoalKind::Simple { completed } => {
                if *completed {
                    return 0;
                }
                *completed = true;
                self.point_value
            }
            GoalKind::Eternal => self.point_value,
            GoalKind::Checklist {
                times_completed,
                times_required,
                bonus_points,
            } => {
                if *times_completed >= *times_required {
                    return 0;
                }
                *times_completed += 1;
                if *times_completed == *times_required {
                    self.point_value.saturating_add(*bonus_points)
                } else {
                    self.point_value
                }
            }
        }
    }

    /// `[X]` once complete, `[ ]` otherwise.
    pub fn status_label(&self) -> &'static str {
        if self.is_complete() {
            "[X]"
        } else {
            "[ ]"
        }
    }

    /// `(times_completed, times_required)` for Checklist goals.
    pub fn progress(&self) -> Option<(u32, u32)> {
        match self.kind {
            GoalKind::Checklist {
                times_completed,
                times_required,
                ..
            } => Some((times_completed, times_required)),
            _ => None,
        }
    }

    /// Single-line persisted form, see [`codec`].
    pub fn encode(&self) -> String {
        codec::encode_goal(self)
    }
}

/// Creation request for [`crate::GoalTracker::create_goal`].
///
/// Amounts are signed so that a negative value coming from a caller is
/// reported as a validation error rather than silently wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalSpec {
    pub variant: GoalVariant,
    pub name: String,
    pub description: String,
    pub points: i64,
    /// Checklist only.
    pub times_required: Option<i64>,
    /// Checklist only.
    pub bonus_points: Option<i64>,
}

impl GoalSpec {
    pub fn simple(name: impl Into<String>, description: impl Into<String>, points: i64) -> Self {
        Self::new(GoalVariant::Simple, name, description, points)
    }

    pub fn eternal(name: impl Into<String>, description: impl Into<String>, points: i64) -> Self {
        Self::new(GoalVariant::Eternal, name, description, points)
    }

    pub fn checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
        times_required: i64,
        bonus_points: i64,
    ) -> Self {
        Self {
            times_required: Some(times_required),
            bonus_points: Some(bonus_points),
            ..Self::new(GoalVariant::Checklist, name, description, points)
        }
    }

    fn new(
        variant: GoalVariant,
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
    ) -> Self {
        Self {
            variant,
            name: name.into(),
            description: description.into(),
            points,
            times_required: None,
            bonus_points: None,
        }
    }

    /// Validate the request and construct the goal it describes.
    pub fn build(&self) -> Result<Goal, GoalError> {
        if self.variant != GoalVariant::Checklist {
            if self.times_required.is_some() {
                return Err(GoalError::validation(
                    "times_required",
                    format!("not accepted by {} goals", self.variant),
                ));
            }
            if self.bonus_points.is_some() {
                return Err(GoalError::validation(
                    "bonus_points",
                    format!("not accepted by {} goals", self.variant),
                ));
            }
        }

        match self.variant {
            GoalVariant::Simple => Goal::simple(&self.name, &self.description, self.points),
            GoalVariant::Eternal => Goal::eternal(&self.name, &self.description, self.points),
            GoalVariant::Checklist => {
                let times_required = self.times_required.ok_or_else(|| {
                    GoalError::validation("times_required", "required for checklist goals")
                })?;
                let bonus_points = self.bonus_points.ok_or_else(|| {
                    GoalError::validation("bonus_points", "required for checklist goals")
                })?;
                Goal::checklist(
                    &self.name,
                    &self.description,
                    self.points,
                    times_required,
                    bonus_points,
                )
            }
        }
    }
}

fn to_amount(field: &'static str, value: i64) -> Result<u32, GoalError> {
    if value < 0 {
        return Err(GoalError::validation(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| GoalError::validation(field, format!("{value} exceeds {}", u32::MAX)))
}

// Text fields end up on a single delimited line when persisted.
fn check_text(field: &'static str, value: &str) -> Result<(), GoalError> {
    if value.trim().is_empty() {
        return Err(GoalError::validation(field, "must not be empty"));
    }
    if value.contains(codec::FIELD_DELIMITER) {
        return Err(GoalError::validation(
            field,
            format!("must not contain {:?}", codec::FIELD_DELIMITER),
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(GoalError::validation(field, "must not contain line breaks"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist(points: i64, required: i64, bonus: i64) -> Goal {
        Goal::checklist("Read scriptures", "Read a chapter", points, required, bonus).unwrap()
    }

    #[test]
    fn simple_goal_pays_once() {
        let mut goal = Goal::simple("Run a marathon", "Finish 42km", 1000).unwrap();
        assert!(!goal.is_complete());
        assert_eq!(goal.status_label(), "[ ]");

        assert_eq!(goal.record_event(), 1000);
        assert!(goal.is_complete());
        assert_eq!(goal.status_label(), "[X]");

        for _ in 0..3 {
            assert_eq!(goal.record_event(), 0);
            assert!(goal.is_complete());
        }
    }

    #[test]
    fn eternal_goal_pays_every_time_and_never_completes() {
        let mut goal = Goal::eternal("Pray", "Morning prayer", 100).unwrap();
        for _ in 0..10 {
            assert_eq!(goal.record_event(), 100);
            assert!(!goal.is_complete());
        }
        assert_eq!(goal.status_label(), "[ ]");
        assert!(goal.progress().is_none());
    }

    #[test]
    fn checklist_pays_bonus_on_final_event() {
        let mut goal = checklist(50, 3, 500);
        assert_eq!(goal.record_event(), 50);
        assert_eq!(goal.progress(), Some((1, 3)));
        assert_eq!(goal.record_event(), 50);
        assert!(!goal.is_complete());
        assert_eq!(goal.record_event(), 550);
        assert!(goal.is_complete());
        assert_eq!(goal.progress(), Some((3, 3)));
    }

    #[test]
    fn checklist_stops_counting_once_complete() {
        let mut goal = checklist(10, 1, 5);
        assert_eq!(goal.record_event(), 15);
        assert_eq!(goal.record_event(), 0);
        assert_eq!(goal.record_event(), 0);
        assert_eq!(goal.progress(), Some((1, 1)));
    }

    #[test]
    fn zero_point_goals_are_allowed() {
        let mut goal = Goal::simple("Free", "No reward", 0).unwrap();
        assert_eq!(goal.record_event(), 0);
        assert!(goal.is_complete());
    }

    #[test]
    fn negative_points_rejected() {
        let err = Goal::simple("A", "desc", -1).unwrap_err();
        assert!(matches!(
            err,
            GoalError::Validation {
                field: "point_value",
                ..
            }
        ));
    }

    #[test]
    fn checklist_parameters_validated() {
        assert!(matches!(
            Goal::checklist("A", "desc", 10, 0, 5),
            Err(GoalError::Validation {
                field: "times_required",
                ..
            })
        ));
        assert!(matches!(
            Goal::checklist("A", "desc", 10, 2, -5),
            Err(GoalError::Validation {
                field: "bonus_points",
                ..
            })
        ));
    }

    #[test]
    fn text_fields_validated() {
        assert!(Goal::simple("", "desc", 1).is_err());
        assert!(Goal::simple("   ", "desc", 1).is_err());
        assert!(Goal::simple("A", "", 1).is_err());
        assert!(Goal::simple("A|B", "desc", 1).is_err());
        assert!(Goal::eternal("A", "line\nbreak", 1).is_err());
    }

    #[test]
    fn oversized_amount_rejected() {
        let err = Goal::eternal("A", "desc", i64::from(u32::MAX) + 1).unwrap_err();
        assert!(matches!(err, GoalError::Validation { .. }));
    }

    #[test]
    fn restore_rejects_overflowed_checklist() {
        let kind = GoalKind::Checklist {
            times_completed: 4,
            times_required: 3,
            bonus_points: 0,
        };
        let err = Goal::restore("A".into(), "desc".into(), 1, kind).unwrap_err();
        assert!(matches!(
            err,
            GoalError::Validation {
                field: "times_completed",
                ..
            }
        ));
    }

    #[test]
    fn spec_requires_checklist_parameters() {
        let mut spec = GoalSpec::checklist("A", "desc", 10, 3, 100);
        spec.bonus_points = None;
        assert!(matches!(
            spec.build(),
            Err(GoalError::Validation {
                field: "bonus_points",
                ..
            })
        ));

        spec.times_required = None;
        assert!(matches!(
            spec.build(),
            Err(GoalError::Validation {
                field: "times_required",
                ..
            })
        ));
    }

    #[test]
    fn spec_rejects_checklist_parameters_on_other_variants() {
        let mut spec = GoalSpec::simple("A", "desc", 10);
        spec.times_required = Some(2);
        assert!(spec.build().is_err());
    }

    #[test]
    fn spec_builds_matching_variant() {
        assert_eq!(
            GoalSpec::eternal("A", "desc", 5).build().unwrap().variant(),
            GoalVariant::Eternal
        );
        let goal = GoalSpec::checklist("A", "desc", 5, 2, 7).build().unwrap();
        assert_eq!(
            goal.kind(),
            &GoalKind::Checklist {
                times_completed: 0,
                times_required: 2,
                bonus_points: 7,
            }
        );
    }

    #[test]
    fn variant_parses_and_displays() {
        assert_eq!("Checklist".parse::<GoalVariant>().unwrap(), GoalVariant::Checklist);
        assert_eq!(GoalVariant::Simple.to_string(), "simple");
        assert!("weekly".parse::<GoalVariant>().is_err());
        assert_eq!(GoalVariant::from_tag("EternalGoal"), Some(GoalVariant::Eternal));
        assert_eq!(GoalVariant::from_tag("eternal"), None);
    }

    #[test]
    fn goal_serializes_flat_with_variant_tag() {
        let goal = checklist(50, 3, 500);
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["variant"], "checklist");
        assert_eq!(json["times_required"], 3);
        assert_eq!(json["name"], "Read scriptures");
    }
}
