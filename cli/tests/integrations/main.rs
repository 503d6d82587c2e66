mod check;
mod interactive;
mod run;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const TWO_STEP: &str = r#"{
    "facts": {},
    "rules": [
        { "id": "R1", "conditions": {}, "conclusion": { "a": "1" } },
        { "id": "R2", "conditions": { "a": "1" }, "conclusion": { "b": "2" } }
    ]
}"#;

/// Write `content` to a file inside a fresh temporary directory
pub fn knowledge_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("kb.json");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}
