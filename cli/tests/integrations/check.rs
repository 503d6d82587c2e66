use super::{knowledge_file, TWO_STEP};
use assert_cmd::Command;
use predicates::prelude::*;

const DISJOINT: &str = r#"{
    "facts": {},
    "rules": [
        { "id": "R1", "conditions": { "x": "1" }, "conclusion": { "y": "1" } },
        { "id": "R2", "conditions": { "z": "1" }, "conclusion": { "y": "2" } }
    ]
}"#;

#[test]
fn test_cli_check_coherent() {
    let (_dir, path) = knowledge_file(TWO_STEP);

    Command::cargo_bin("chaining")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules are coherent"))
        .stdout(predicate::str::contains("Facts are consistent with the rules"));
}

#[test]
fn test_cli_check_strictness() {
    let (_dir, path) = knowledge_file(DISJOINT);

    Command::cargo_bin("chaining")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules are coherent"));

    Command::cargo_bin("chaining")
        .unwrap()
        .args(["check", "--strict"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules are incoherent (1 conflict)"));
}

#[test]
fn test_cli_check_fact_incoherence_fails() {
    let (_dir, path) = knowledge_file(
        r#"{
            "facts": { "x": "1" },
            "rules": [
                { "id": "R1", "conditions": { "x": "1" }, "conclusion": { "y": "1" } },
                { "id": "R2", "conditions": { "x": "1" }, "conclusion": { "y": "2" } }
            ]
        }"#,
    );

    Command::cargo_bin("chaining")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Facts are incoherent: rule R2"))
        .stderr(predicate::str::contains("Fact incoherence"));
}

#[test]
fn test_cli_check_json() {
    let (_dir, path) = knowledge_file(DISJOINT);

    let output = Command::cargo_bin("chaining")
        .unwrap()
        .args(["check", "--strict", "--json"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["rules"]["conflicts"][0]["kind"], "compatible");
    assert_eq!(json["rules"]["askable"], serde_json::json!(["x", "z"]));
    assert!(json["facts"].is_null());
}
