//! Headless runner: scripted input against a generated level

use diamond_quest::core::{Session, SessionConfig};
use diamond_quest::headless::run_script;
use diamond_quest::types::ROUND_SECONDS;
use serde_json::Value;

fn run(seed: u32, script: &str) -> Vec<Value> {
    let mut session = Session::new(SessionConfig::default(), seed);
    session.start().unwrap();
    let mut out = Vec::new();
    let n = run_script(&mut session, script.as_bytes(), &mut out).unwrap();
    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), n);
    lines
}

#[test]
fn test_snapshot_shape() {
    let lines = run(9, "wait 0\n");
    let snap = &lines[0];

    let grid = snap["grid"].as_array().unwrap();
    assert_eq!(grid.len(), 15);
    assert!(grid.iter().all(|row| row.as_str().unwrap().chars().count() == 20));
    assert_eq!(grid[0].as_str().unwrap(), "#".repeat(20));

    assert_eq!(snap["time_remaining"], ROUND_SECONDS);
    assert!(snap["exit"].is_null());
    assert_eq!(snap["events"][0]["event"], "session_started");
    assert!(snap["player"]["x"].is_number());
}

#[test]
fn test_same_seed_same_transcript() {
    let script = "right\nwait 250\ndown\nleft\nwait 1000\nup\n";
    assert_eq!(run(77, script), run(77, script));
}

#[test]
fn test_countdown_through_script() {
    let lines = run(5, "wait 60000\nup\n");
    assert_eq!(lines[0]["state"], "lost");
    assert_eq!(lines[0]["player_alive"], false);
    // Input after the end changes nothing.
    assert_eq!(lines[1]["grid"], lines[0]["grid"]);
    assert_eq!(lines[1]["state"], "lost");
}

#[test]
fn test_errors_are_reported_inline() {
    let lines = run(5, "sideways\nwait\nrestart\n");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["line"], 1);
    assert_eq!(lines[1]["line"], 2);
    assert_eq!(lines[2]["episode_id"], 1);
}
