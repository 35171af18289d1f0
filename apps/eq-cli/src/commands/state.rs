// state.rs - Score display and whole-state export/import.

use std::fs;
use std::path::Path;

use anyhow::Context;
use eq_goal::{GoalTracker, QuestEvent};
use tracing::warn;

use super::Quest;

pub fn show_score(quest: &Quest) -> anyhow::Result<()> {
    let tracker = quest.load()?;
    println!("You have {} points.", tracker.score());
    Ok(())
}

pub fn export(quest: &Quest, file: &Path, json: bool) -> anyhow::Result<()> {
    let tracker = quest.load()?;
    let contents = if json {
        serde_json::to_string_pretty(&tracker)?
    } else {
        tracker.serialize()
    };
    fs::write(file, contents).with_context(|| format!("failed to write {}", file.display()))?;
    quest.notify(&QuestEvent::state_saved(&tracker, file));

    println!(
        "Exported {} goal(s) and {} points to {}",
        tracker.len(),
        tracker.score(),
        file.display()
    );
    Ok(())
}

/// Replace the saved state with `file`. Nothing is written unless the whole
/// file parses.
pub fn import(quest: &Quest, file: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let tracker = GoalTracker::deserialize(&text)
        .with_context(|| format!("{} is not a valid goal file", file.display()))?;

    // The saved file is about to be overwritten; a corrupt one must not block
    // the import that repairs it.
    let replaced = match quest.load() {
        Ok(previous) => previous.len(),
        Err(e) => {
            warn!(
                path = %quest.store.path().display(),
                "discarding unreadable goal file: {:#}",
                e
            );
            0
        }
    };
    if replaced > 0 {
        warn!(replaced, source = %file.display(), "import replaced existing goals");
    }
    quest.save(&tracker)?;
    quest.notify(&QuestEvent::state_loaded(&tracker, file));

    println!(
        "Imported {} goal(s) and {} points from {}",
        tracker.len(),
        tracker.score(),
        file.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_goal::{GoalError, GoalSpec, QuestConfig};
    use tempfile::TempDir;

    fn open(project: &TempDir) -> Quest {
        let config = QuestConfig::for_project(project.path()).unwrap();
        Quest::open(&config).unwrap()
    }

    #[test]
    fn export_then_import_into_another_project() {
        let source = TempDir::new().unwrap();
        let quest = open(&source);
        let mut tracker = quest.load().unwrap();
        tracker
            .create_goal(&GoalSpec::checklist("Journal", "Write", 10, 2, 40))
            .unwrap();
        tracker.record_event(0).unwrap();
        quest.save(&tracker).unwrap();

        let file = source.path().join("backup.txt");
        export(&quest, &file, false).unwrap();
        show_score(&quest).unwrap();

        let target = TempDir::new().unwrap();
        let other = open(&target);
        import(&other, &file).unwrap();
        assert_eq!(other.load().unwrap(), tracker);
    }

    #[test]
    fn json_export_is_a_snapshot_not_an_import_source() {
        let project = TempDir::new().unwrap();
        let quest = open(&project);
        let mut tracker = quest.load().unwrap();
        tracker
            .create_goal(&GoalSpec::simple("Hike", "Summit", 300))
            .unwrap();
        tracker.record_event(0).unwrap();
        quest.save(&tracker).unwrap();

        let file = project.path().join("report.json");
        export(&quest, &file, true).unwrap();

        let snapshot: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(snapshot["score"], 300);
        assert_eq!(snapshot["goals"][0]["name"], "Hike");
        assert_eq!(snapshot["goals"][0]["completed"], true);

        let err = import(&quest, &file).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GoalError>(),
            Some(GoalError::Format { line: 1, .. })
        ));
        assert_eq!(quest.load().unwrap(), tracker);
    }

    #[test]
    fn failed_import_leaves_saved_state_alone() {
        let project = TempDir::new().unwrap();
        let quest = open(&project);
        let mut tracker = quest.load().unwrap();
        tracker
            .create_goal(&GoalSpec::eternal("Walk", "Daily", 5))
            .unwrap();
        tracker.record_event(0).unwrap();
        quest.save(&tracker).unwrap();

        let file = project.path().join("bad.txt");
        fs::write(&file, "10\nQuarterlyGoal|X|desc|5\n").unwrap();

        let err = import(&quest, &file).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GoalError>(),
            Some(GoalError::UnknownVariant { line: 2, .. })
        ));
        assert_eq!(quest.load().unwrap(), tracker);
    }

    #[test]
    fn import_overwrites_a_corrupt_goal_file() {
        let project = TempDir::new().unwrap();
        let config = QuestConfig::for_project(project.path()).unwrap();
        let quest = Quest::open(&config).unwrap();
        fs::write(config.goals_path(), "garbage\n").unwrap();
        assert!(quest.load().is_err());

        let file = project.path().join("good.txt");
        fs::write(&file, "5\nEternalGoal|A|desc|5\n").unwrap();
        import(&quest, &file).unwrap();

        let tracker = quest.load().unwrap();
        assert_eq!(tracker.score(), 5);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.goal(0).unwrap().name(), "A");
    }

    #[test]
    fn import_missing_file_is_an_error() {
        let project = TempDir::new().unwrap();
        let quest = open(&project);
        assert!(import(&quest, &project.path().join("nope.txt")).is_err());
    }
}
