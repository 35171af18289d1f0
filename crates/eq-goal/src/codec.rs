// codec.rs - Line-oriented text format for a tracker's goals and score.
//
// Layout:
//
//   <score>
//   <VariantTag>|<name>|<description>|<pointValue>[|<variant fields>]
//   ...
//
// Variant fields:
//   SimpleGoal     |True or |False
//   EternalGoal    (none)
//   ChecklistGoal  |<timesCompleted>|<timesRequired>|<bonusPoints>
//
// A line must split into exactly the field count its tag expects. Line
// numbers in errors are 1-based and count the score line.

use tracing::debug;

use crate::error::GoalError;
use crate::goal::{Goal, GoalKind, GoalVariant};

/// Separates the fields of one goal line. Rejected in goal names and descriptions.
pub const FIELD_DELIMITER: char = '|';

const TRUE: &str = "True";
const FALSE: &str = "False";

fn field_count(variant: GoalVariant) -> usize {
    match variant {
        GoalVariant::Simple => 5,
        GoalVariant::Eternal => 4,
        GoalVariant::Checklist => 7,
    }
}

/// Encode one goal as a single line (no trailing newline).
pub fn encode_goal(goal: &Goal) -> String {
    let mut fields = vec![
        goal.variant().tag().to_string(),
        goal.name().to_string(),
        goal.description().to_string(),
        goal.point_value().to_string(),
    ];
    match goal.kind() {
        GoalKind::Simple { completed } => {
            fields.push(if *completed { TRUE } else { FALSE }.to_string());
        }
        GoalKind::Eternal => {}
        GoalKind::Checklist {
            times_completed,
            times_required,
            bonus_points,
        } => {
            fields.push(times_completed.to_string());
            fields.push(times_required.to_string());
            fields.push(bonus_points.to_string());
        }
    }
    fields.join(FIELD_DELIMITER.to_string().as_str())
}

/// Decode one goal line. `line_no` is only used for error reporting.
pub fn decode_goal(line: &str, line_no: usize) -> Result<Goal, GoalError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    let tag = fields[0];
    let variant = GoalVariant::from_tag(tag).ok_or_else(|| GoalError::UnknownVariant {
        line: line_no,
        tag: tag.to_string(),
    })?;

    let expected = field_count(variant);
    if fields.len() != expected {
        return Err(GoalError::format(
            line_no,
            format!(
                "{} expects {} fields, found {}",
                tag,
                expected,
                fields.len()
            ),
        ));
    }

    let point_value = parse_amount(fields[3], "point value", line_no)?;
    let kind = match variant {
        GoalVariant::Simple => GoalKind::Simple {
            completed: parse_flag(fields[4], line_no)?,
        },
        GoalVariant::Eternal => GoalKind::Eternal,
        GoalVariant::Checklist => GoalKind::Checklist {
            times_completed: parse_amount(fields[4], "times completed", line_no)?,
            times_required: parse_amount(fields[5], "times required", line_no)?,
            bonus_points: parse_amount(fields[6], "bonus points", line_no)?,
        },
    };

    Goal::restore(
        fields[1].to_string(),
        fields[2].to_string(),
        point_value,
        kind,
    )
    .map_err(|e| match e {
        GoalError::Validation { field, reason } => {
            GoalError::format(line_no, format!("{field} {reason}"))
        }
        other => other,
    })
}

/// Encode a full tracker state. Every line, including the last, ends in `\n`.
pub fn encode_state(score: u64, goals: &[Goal]) -> String {
    let mut out = format!("{score}\n");
    for goal in goals {
        out.push_str(&encode_goal(goal));
        out.push('\n');
    }
    out
}

/// Decode a full tracker state into `(score, goals)`.
///
/// Blank goal lines are skipped and `\r\n` endings are accepted. Nothing is
/// returned unless every line parses.
pub fn decode_state(text: &str) -> Result<(u64, Vec<Goal>), GoalError> {
    let mut lines = text.lines();
    let score_line = lines
        .next()
        .ok_or_else(|| GoalError::format(1, "missing score line"))?;
    let score = parse_digits::<u64>(score_line).ok_or_else(|| {
        GoalError::format(
            1,
            format!("score {score_line:?} is not a non-negative integer"),
        )
    })?;

    let mut goals = Vec::new();
    for (offset, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        goals.push(decode_goal(line, offset + 2)?);
    }

    debug!(score, goals = goals.len(), "decoded goal state");
    Ok((score, goals))
}

// Plain decimal digits only; `str::parse` would also take a leading `+`.
fn parse_digits<T: std::str::FromStr>(value: &str) -> Option<T> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn parse_amount(value: &str, what: &str, line_no: usize) -> Result<u32, GoalError> {
    parse_digits::<u32>(value).ok_or_else(|| {
        GoalError::format(
            line_no,
            format!("{what} {value:?} is not a non-negative integer"),
        )
    })
}

fn parse_flag(value: &str, line_no: usize) -> Result<bool, GoalError> {
    match value {
        TRUE => Ok(true),
        FALSE => Ok(false),
        other => Err(GoalError::format(
            line_no,
            format!("completion flag {other:?} must be {TRUE} or {FALSE}"),
        )),
    }
}
