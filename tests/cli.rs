//! End-to-end tests for the toolkit binary

mod common;

use common::{create_test_config, create_test_config_in_subdir, read_output, toolkit, DEMO_CONFIG};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_commands_lists_listable_names() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .arg("--commands")
        .assert()
        .success()
        .stdout("copy fail greet help pairs\n");
}

#[test]
fn test_runs_with_flags_and_slot() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["greet", "--message=hello", "--shout", "ann", "bob"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[RUN] echo \"hello|true|ann bob\""));
    assert_eq!(read_output(dir.path(), "greet.txt"), "hello|true|ann bob");
}

#[test]
fn test_quiet_hides_run_lines() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["-q", "greet", "ann"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[RUN]").not());
    assert_eq!(read_output(dir.path(), "greet.txt"), "|false|ann");
}

#[test]
fn test_positional_variables() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    fs::write(dir.path().join("source.txt"), "payload").unwrap();
    toolkit(dir.path())
        .args(["copy", "source.txt", "target.txt"])
        .assert()
        .success();
    assert_eq!(read_output(dir.path(), "target.txt"), "payload");
}

#[test]
fn test_raw_command_takes_everything() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["passthrough", "--not-a-flag", "x"])
        .assert()
        .success();
    assert_eq!(read_output(dir.path(), "raw.txt"), "--not-a-flag x");
}

#[test]
fn test_unknown_command_is_a_usage_error() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .arg("bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "[ERROR] bogus is not a recognized command name.",
        ))
        .stderr(predicate::str::contains("help for a list of available commands."));
}

#[test]
fn test_missing_command_is_a_usage_error() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path()).assert().code(2);
}

#[test]
fn test_wrong_positional_count() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["copy", "only-one"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected 2 arguments, got 1"));

    toolkit(dir.path())
        .args(["pairs", "a", "b", "c"])
        .assert()
        .code(2);
    assert!(!dir.path().join("pairs.txt").exists());

    toolkit(dir.path())
        .args(["pairs", "a", "b"])
        .assert()
        .success();
    assert_eq!(read_output(dir.path(), "pairs.txt"), "a b");
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["greet", "--bork", "ann"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid option"));
}

#[test]
fn test_failed_run_line_passes_status_through() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path()).arg("fail").assert().code(5);
}

#[test]
fn test_help_overview() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("*** Demo Toolkit ***"))
        .stdout(predicate::str::contains("greet   Say hello"))
        .stdout(predicate::str::contains("passthrough").not());
}

#[test]
fn test_help_for_a_command() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    for argv in [&["help", "greet"][..], &["greet", "-h"], &["greet", "ann", "--help"]] {
        toolkit(dir.path())
            .args(argv)
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage: toolkit greet [OPTION ...] ARG ..."))
            .stdout(predicate::str::contains("Greets one or two people."))
            .stdout(predicate::str::contains("-m, --message MESSAGE"))
            .stdout(predicate::str::contains("What to say"))
            .stdout(predicate::str::contains("--[no-]shout"));
    }
    assert!(!dir.path().join("greet.txt").exists());

    toolkit(dir.path())
        .args(["help", "copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: toolkit copy ARG ARG"))
        .stdout(predicate::str::contains("Give the source and then the target."));
}

#[test]
fn test_help_stops_at_double_dash() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["greet", "--", "-h"])
        .assert()
        .success();
    assert_eq!(read_output(dir.path(), "greet.txt"), "|false|-h");
}

#[test]
fn test_flag_completion_offers_flags() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["--flag-completion", "toolkit", "greet", "ann", "--m"])
        .assert()
        .success()
        .stdout("--message\n");

    // Too few positionals so far: leave it to the shell
    toolkit(dir.path())
        .args(["--flag-completion", "toolkit", "greet", "--m"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_flag_completion_suppresses_files_when_full() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["--flag-completion", "toolkit", "greet", "ann", "bob", ""])
        .assert()
        .success()
        .stdout("!NOFSCOMP!\n--message\n--shout\n--no-shout\n");
}

#[test]
fn test_flag_completion_defers() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    // A value is still owed to --message
    toolkit(dir.path())
        .args(["--flag-completion", "toolkit", "greet", "-m", ""])
        .assert()
        .success()
        .stdout("");
    // Raw commands and unknown names produce nothing
    toolkit(dir.path())
        .args(["--flag-completion", "toolkit", "passthrough", ""])
        .assert()
        .success()
        .stdout("");
    toolkit(dir.path())
        .args(["--flag-completion", "toolkit", "bogus", ""])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_flag_completion_dead_end_after_bad_flag() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    toolkit(dir.path())
        .args(["--flag-completion", "toolkit", "greet", "--bork", "x"])
        .assert()
        .success()
        .stdout("!NOFSCOMP!\n");
}

#[test]
fn test_config_found_from_subdirectory() {
    let (_dir, _, sub_dir) = create_test_config_in_subdir(DEMO_CONFIG);
    toolkit(&sub_dir)
        .args(["greet", "ann"])
        .assert()
        .success();
    assert_eq!(read_output(&sub_dir, "greet.txt"), "|false|ann");
}

#[test]
fn test_explicit_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("other.yml"),
        "commands:\n  ping:\n    usage: Answer\n    run: \"true\"\n",
    )
    .unwrap();
    toolkit(dir.path())
        .args(["-f", "other.yml", "--commands"])
        .assert()
        .success()
        .stdout("help ping\n");
}

#[test]
fn test_env_file_variables() {
    let (dir, _) = create_test_config(
        "commands:\n  region:\n    run: echo \"${REGION}\" > region.txt\n",
    );
    fs::write(dir.path().join(".env"), "REGION=eu-west\n").unwrap();
    toolkit(dir.path()).arg("region").assert().success();
    assert_eq!(read_output(dir.path(), "region.txt"), "eu-west");
}

#[test]
fn test_invalid_config_reports_error() {
    let (dir, _) = create_test_config(
        "commands:\n  broken:\n    positionals:\n      count: \"3..1\"\n    run: \"true\"\n",
    );
    toolkit(dir.path())
        .arg("--commands")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("invalid positional count '3..1'"));
}

#[test]
fn test_install_completions() {
    let (dir, _) = create_test_config(DEMO_CONFIG);
    let home = TempDir::new().unwrap();

    toolkit(dir.path())
        .env("HOME", home.path())
        .arg("--install-completions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completions installed in"));

    let script = home.path().join(".bash-complete").join("toolkit-completions");
    let body = fs::read_to_string(&script).unwrap();
    assert!(body.contains("--flag-completion"));
    let profile = fs::read_to_string(home.path().join(".bash_profile")).unwrap();
    assert!(profile.contains(&format!("source {}", script.display())));

    toolkit(dir.path())
        .env("HOME", home.path())
        .arg("--install-completions")
        .assert()
        .success()
        .stdout(predicate::str::contains("already installed"));
}
