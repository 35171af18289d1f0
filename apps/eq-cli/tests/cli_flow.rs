// cli_flow.rs - Drive the `eq` binary end to end against a temp project.
//
// Flow:
//   1. eq goal create (simple + checklist)
//   2. eq goal record, several times
//   3. eq score / eq goal list
//   4. eq export, then eq import into a fresh project

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn eq(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eq"))
        .arg("--project-root")
        .arg(project)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "eq failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn goals_score_and_survive_export_import() {
    let project = TempDir::new().unwrap();
    let root = project.path();

    stdout(&eq(
        root,
        &["goal", "create", "simple", "A", "--description", "desc", "--points", "100"],
    ));
    stdout(&eq(
        root,
        &[
            "goal",
            "create",
            "checklist",
            "B",
            "--description",
            "desc",
            "--points",
            "50",
            "--times-required",
            "3",
            "--bonus",
            "500",
        ],
    ));

    for number in ["2", "2", "2", "1"] {
        stdout(&eq(root, &["goal", "record", number]));
    }

    assert!(stdout(&eq(root, &["score"])).contains("750"));
    let listing = stdout(&eq(root, &["goal", "list"]));
    assert!(listing.contains("1. [X] A (desc)"));
    assert!(listing.contains("2. [X] B (desc) -- Currently completed: 3/3"));

    let saved = fs::read_to_string(root.join(".eq/goals.txt")).unwrap();
    assert_eq!(
        saved,
        "750\nSimpleGoal|A|desc|100|True\nChecklistGoal|B|desc|50|3|3|500\n"
    );

    let backup = root.join("backup.txt");
    stdout(&eq(root, &["export", backup.to_str().unwrap()]));

    let other = TempDir::new().unwrap();
    stdout(&eq(other.path(), &["import", backup.to_str().unwrap()]));
    assert!(stdout(&eq(other.path(), &["score"])).contains("750"));
}

#[test]
fn invalid_requests_fail_without_touching_state() {
    let project = TempDir::new().unwrap();
    let root = project.path();

    let negative = eq(
        root,
        &["goal", "create", "eternal", "A", "--description", "desc", "--points", "-5"],
    );
    assert!(!negative.status.success());
    assert!(!root.join(".eq/goals.txt").exists());

    let missing = eq(root, &["goal", "record", "3"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("out of range"));
}
