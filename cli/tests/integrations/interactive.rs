use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_interactive_mode_help() {
    // prompts need a terminal; only check that the command is wired up
    let mut cmd = Command::cargo_bin("chaining").unwrap();
    cmd.args(["interactive", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Knowledge base file"));
}

#[test]
fn test_top_level_help_lists_commands() {
    let mut cmd = Command::cargo_bin("chaining").unwrap();
    cmd.arg("--help");

    let output = cmd.assert().success();
    output
        .stdout(predicate::str::contains("forward"))
        .stdout(predicate::str::contains("backward"))
        .stdout(predicate::str::contains("groups"))
        .stdout(predicate::str::contains("check"));
}
