use super::{knowledge_file, TWO_STEP};
use assert_cmd::Command;
use predicates::prelude::*;

fn chaining() -> Command {
    Command::cargo_bin("chaining").unwrap()
}

#[test]
fn test_cli_forward_saturation() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .arg("forward")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("derived"))
        .stdout(predicate::str::contains("Fired R1, R2 (2 rounds)"))
        .stdout(predicate::str::contains("Saturated"));
}

#[test]
fn test_cli_forward_goal_with_depth_firing() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .args(["forward", "--firing", "depth", "--order", "premise-count-desc", "--goal", "a=1"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal a=1 reached"))
        .stdout(predicate::str::contains("Fired R1 (1 round)"));
}

#[test]
fn test_cli_forward_json() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    let output = chaining()
        .args(["forward", "--json"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["facts"], serde_json::json!({ "a": "1", "b": "2" }));
    assert_eq!(json["termination"], "saturated");
    assert_eq!(json["rounds"], 2);
}

#[test]
fn test_cli_forward_trace() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .args(["forward", "--trace"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Round 1: eligible [R1]"))
        .stdout(predicate::str::contains("fire R2 => b=2"));
}

#[test]
fn test_cli_french_strategy_names() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .args(["forward", "--firing", "profondeur", "--order", "premisse_rec"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_cli_unknown_strategy() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .args(["forward", "--order", "alphabetical"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("alphabetical"));
}

#[test]
fn test_cli_backward_proof_tree() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .args(["backward", "--goal", "b=2"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal b=2 is provable"))
        .stdout(predicate::str::contains("✔ b=2 [R2]"))
        .stdout(predicate::str::contains("└─ ✔ a=1 [R1]"));
}

#[test]
fn test_cli_backward_json() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    let output = chaining()
        .args(["backward", "--json", "--goal", "b=3"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["provable"], false);
    assert!(json["proof"].get("children").is_none());
}

#[test]
fn test_cli_backward_requires_goal() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining().arg("backward").arg(&path).assert().failure();
}

#[test]
fn test_cli_malformed_goal() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .args(["backward", "--goal", "b"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("attribute=value"));
}

#[test]
fn test_cli_groups() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .arg("groups")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Group 0: R1 (applied)"))
        .stdout(predicate::str::contains("Group 1: R2 (applied)"));
}

#[test]
fn test_cli_groups_cycle_fails() {
    let (_dir, path) = knowledge_file(
        r#"{
            "rules": [
                { "id": "R1", "conditions": { "b": "1" }, "conclusion": { "a": "1" } },
                { "id": "R2", "conditions": { "a": "1" }, "conclusion": { "b": "1" } }
            ]
        }"#,
    );

    chaining()
        .arg("groups")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cycle or deadlock"))
        .stderr(predicate::str::contains("R1, R2"));
}

#[test]
fn test_cli_forward_conflict_fails() {
    let (_dir, path) = knowledge_file(
        r#"{
            "facts": { "a": "0" },
            "rules": [ { "id": "R1", "conditions": {}, "conclusion": { "a": "1" } } ]
        }"#,
    );

    chaining()
        .arg("forward")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fact conflict on 'a'"));
}

#[test]
fn test_cli_check_gate() {
    let (_dir, path) = knowledge_file(
        r#"{
            "facts": { "a": "1" },
            "rules": [
                { "id": "R1", "conditions": {}, "conclusion": { "a": "1" } },
                { "id": "R2", "conditions": { "a": "1" }, "conclusion": { "a": "2" } }
            ]
        }"#,
    );

    chaining()
        .args(["backward", "--check", "--goal", "a=1"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fact incoherence"));
}

#[test]
fn test_cli_show() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    chaining()
        .arg("show")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("facts (0):"))
        .stdout(predicate::str::contains("rules (2):"))
        .stdout(predicate::str::contains("R2"));
}

#[test]
fn test_cli_missing_file() {
    chaining()
        .args(["forward", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read knowledge base"));
}

#[test]
fn test_cli_syntax_error_report() {
    let (_dir, path) = knowledge_file("{\n  \"facts\": {,\n}");

    chaining()
        .arg("show")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Load error"))
        .stderr(predicate::str::contains("kb.json"));
}
