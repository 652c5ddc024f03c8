//! Common test utilities

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A toolkit.yml exercising flags, toggles, counts, slots and raw commands
pub const DEMO_CONFIG: &str = r#"
title: Demo Toolkit
commands:
  greet:
    usage: Say hello
    description: Greets one or two people.
    flags:
      - spec: "-m, --message MESSAGE"
        usage: What to say
      - "--[no-]shout"
    positionals:
      count: "1..2"
      slot: names
    run: echo "${message}|${shout}|${names}" > greet.txt
  copy:
    usage: Copy a file
    positionals:
      count: 2
      explain: Give the source and then the target.
    run: cp "${arg1}" "${arg2}"
  pairs:
    usage: Takes arguments two at a time
    positionals:
      count: even
    run: echo "${args}" > pairs.txt
  passthrough:
    raw: true
    run: echo "${args}" > raw.txt
  fail:
    usage: Exit with a status
    run: exit 5
"#;

/// Create a temporary directory with a toolkit.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("toolkit.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config with a subdirectory below it
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// The toolkit binary, run from `dir` without colors
pub fn toolkit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("toolkit").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

/// Read a file the run lines wrote, without its trailing newline
pub fn read_output(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name))
        .unwrap()
        .trim_end()
        .to_string()
}
