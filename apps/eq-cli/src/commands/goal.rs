// goal.rs - Goal subcommands: create, list, record.

use anyhow::anyhow;
use clap::Subcommand;
use eq_goal::{GoalSpec, GoalVariant, GoalView, QuestEvent};

use super::Quest;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a new goal.
    Create {
        /// Goal variant: simple, eternal, or checklist.
        variant: GoalVariant,
        /// Goal name (e.g., "Run a marathon").
        name: String,
        /// What the goal is about.
        #[arg(long)]
        description: String,
        /// Points earned per recorded event.
        #[arg(long, allow_negative_numbers = true)]
        points: i64,
        /// Checklist only: events needed to complete the goal.
        #[arg(long, allow_negative_numbers = true)]
        times_required: Option<i64>,
        /// Checklist only: one-time bonus paid on completion.
        #[arg(long, allow_negative_numbers = true)]
        bonus: Option<i64>,
    },
    /// List all goals.
    List {
        /// Print as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Record an event against a goal.
    Record {
        /// Goal number as shown by `eq goal list`.
        number: usize,
    },
}

pub fn execute(cmd: &GoalCommands, quest: &Quest) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Create {
            variant,
            name,
            description,
            points,
            times_required,
            bonus,
        } => {
            let spec = GoalSpec {
                variant: *variant,
                name: name.clone(),
                description: description.clone(),
                points: *points,
                times_required: *times_required,
                bonus_points: *bonus,
            };
            create_goal(quest, &spec)
        }
        GoalCommands::List { json } => list_goals(quest, *json),
        GoalCommands::Record { number } => record_event(quest, *number),
    }
}

fn create_goal(quest: &Quest, spec: &GoalSpec) -> anyhow::Result<()> {
    let mut tracker = quest.load()?;
    let index = tracker.create_goal(spec)?;
    quest.save(&tracker)?;

    let goal = tracker
        .goal(index)
        .ok_or_else(|| anyhow!("goal {} missing after create", index))?;
    quest.notify(&QuestEvent::goal_created(index, goal));

    println!("Goal created: #{} {}", index + 1, goal.name());
    println!("  Variant: {}", goal.variant());
    println!("  Points:  {}", goal.point_value());
    if let Some((_, required)) = goal.progress() {
        println!("  Needed:  {} time(s)", required);
    }
    Ok(())
}

fn list_goals(quest: &Quest, json: bool) -> anyhow::Result<()> {
    let tracker = quest.load()?;

    if json {
        let views: Vec<GoalView<'_>> = tracker.list().collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if tracker.is_empty() {
        println!("No goals yet.");
        return Ok(());
    }

    for view in tracker.list() {
        println!("{}", view);
    }
    println!("\n{} goal(s) total. Score: {}", tracker.len(), tracker.score());
    Ok(())
}

fn record_event(quest: &Quest, number: usize) -> anyhow::Result<()> {
    let index = number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("goal numbers start at 1"))?;

    let mut tracker = quest.load()?;
    let outcome = tracker.record_event(index)?;
    quest.save(&tracker)?;

    let goal = tracker
        .goal(index)
        .ok_or_else(|| anyhow!("goal {} missing after record", number))?;
    quest.notify(&QuestEvent::event_recorded(index, goal, &outcome));

    if outcome.reward == 0 {
        println!("\"{}\" is already complete. No points earned.", goal.name());
    } else {
        println!("Congratulations! You earned {} points.", outcome.reward);
        if outcome.completed {
            println!("\"{}\" is complete.", goal.name());
        }
    }
    println!("You now have {} points.", outcome.score);
    Ok(())
}
