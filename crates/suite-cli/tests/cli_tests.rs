//! Integration tests for the `suite` binary

use assert_cmd::Command;
use predicates::prelude::*;
use suite_context::{ResolvedContext, ResolvedPackage};
use suite_test_utils::TestDir;

/// Get a Command for the suite binary with an isolated configuration.
fn suite_cmd(dir: &TestDir) -> Command {
    let mut cmd = Command::cargo_bin("suite").expect("Failed to find suite binary");
    cmd.env("XDG_CONFIG_HOME", dir.path("config"))
        .env_remove("TOOLSUITE_LAUNCHER")
        .env_remove("TOOLSUITE_PROMPT")
        .env("TOOLSUITE_SHELL", "sh")
        .env_remove("RUST_LOG");
    cmd
}

/// Snapshots for maya (tools maya, python) and nuke (tools nuke, python).
fn write_snapshots(dir: &TestDir) {
    dir.write_snapshot(
        "maya.json",
        &ResolvedContext::new().with_package(
            ResolvedPackage::new("maya")
                .version("2024.1")
                .tools(["maya", "python"]),
        ),
    );
    dir.write_snapshot("nuke.json", &TestDir::snapshot("nuke", &["nuke", "python"]));
}

fn add(dir: &TestDir, file: &str, name: &str) {
    suite_cmd(dir)
        .args(["add", "dcc", file, "--name", name])
        .current_dir(dir.root())
        .assert()
        .success();
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let dir = TestDir::new();
    suite_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("dispatch").not());
}

#[test]
fn test_missing_command_fails() {
    let dir = TestDir::new();
    suite_cmd(&dir).assert().failure();
}

// ============================================================================
// Building suites
// ============================================================================

#[test]
fn test_init_creates_empty_suite() {
    let dir = TestDir::new();
    suite_cmd(&dir)
        .args(["init", "dcc"])
        .current_dir(dir.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created empty suite"));

    dir.assert_file_exists("dcc/suite.yaml");
    assert!(dir.stub_names("dcc").is_empty());
}

#[test]
fn test_init_refuses_existing_suite() {
    let dir = TestDir::new();
    suite_cmd(&dir).args(["init", "dcc"]).current_dir(dir.root()).assert().success();
    suite_cmd(&dir)
        .args(["init", "dcc"])
        .current_dir(dir.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already a suite"));
}

#[test]
fn test_add_creates_suite_and_stubs() {
    let dir = TestDir::new();
    write_snapshots(&dir);
    add(&dir, "maya.json", "maya");
    add(&dir, "nuke.json", "nuke");

    dir.assert_file_exists("dcc/contexts/maya.json");
    dir.assert_file_exists("dcc/contexts/nuke.json");
    assert_eq!(dir.stub_names("dcc"), vec!["maya", "nuke", "python"]);
    dir.assert_file_contains("dcc/bin/python", r#""context_name":"nuke""#);
}

#[test]
fn test_add_warns_about_shadowed_tools() {
    let dir = TestDir::new();
    write_snapshots(&dir);
    add(&dir, "maya.json", "maya");

    suite_cmd(&dir)
        .args(["add", "dcc", "nuke.json", "--name", "nuke"])
        .current_dir(dir.root())
        .assert()
        .success()
        .stderr(predicate::str::contains("python"));
}

#[test]
fn test_add_duplicate_name_fails() {
    let dir = TestDir::new();
    write_snapshots(&dir);
    add(&dir, "maya.json", "maya");

    suite_cmd(&dir)
        .args(["add", "dcc", "nuke.json", "--name", "maya"])
        .current_dir(dir.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("maya"));
}

#[test]
fn test_add_unresolved_context_fails() {
    let dir = TestDir::new();
    std::fs::write(dir.path("broken.json"), r#"{"status": "failed"}"#).unwrap();

    suite_cmd(&dir)
        .args(["add", "dcc", "broken.json", "--name", "broken"])
        .current_dir(dir.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not resolved"));
    dir.assert_file_not_exists("dcc");
}

#[test]
fn test_edit_unknown_context_fails() {
    let dir = TestDir::new();
    suite_cmd(&dir).args(["init", "dcc"]).current_dir(dir.root()).assert().success();

    suite_cmd(&dir)
        .args(["bump", "dcc", "houdini"])
        .current_dir(dir.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No such context"));
}

#[test]
fn test_edit_non_suite_fails() {
    let dir = TestDir::new();
    std::fs::create_dir_all(dir.path("plain")).unwrap();

    suite_cmd(&dir)
        .args(["hide", "plain", "maya", "maya"])
        .current_dir(dir.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not a suite"));
}

#[test]
fn test_overrides_regenerate_stubs() {
    let dir = TestDir::new();
    write_snapshots(&dir);
    add(&dir, "maya.json", "maya");
    add(&dir, "nuke.json", "nuke");

    let edit = |args: &[&str]| {
        suite_cmd(&dir)
            .args(args)
            .current_dir(dir.root())
            .assert()
            .success();
    };

    edit(&["prefix", "dcc", "maya", "m_"]);
    assert_eq!(dir.stub_names("dcc"), vec!["m_maya", "m_python", "nuke", "python"]);

    edit(&["hide", "dcc", "maya", "python"]);
    edit(&["alias", "dcc", "nuke", "nuke", "nk"]);
    assert_eq!(dir.stub_names("dcc"), vec!["m_maya", "nk", "python"]);

    edit(&["unalias", "dcc", "nuke", "nuke"]);
    edit(&["unhide", "dcc", "maya", "python"]);
    edit(&["prefix", "dcc", "maya", ""]);
    // maya was bumped by the prefix changes, so it now owns python
    assert_eq!(dir.stub_names("dcc"), vec!["maya", "nuke", "python"]);
    dir.assert_file_contains("dcc/bin/python", r#""context_name":"maya""#);

    edit(&["bump", "dcc", "nuke"]);
    dir.assert_file_contains("dcc/bin/python", r#""context_name":"nuke""#);

    edit(&["remove", "dcc", "nuke"]);
    assert_eq!(dir.stub_names("dcc"), vec!["maya", "python"]);
}

// ============================================================================
// Listings
// ============================================================================

#[test]
fn test_info_lists_contexts_and_tools() {
    let dir = TestDir::new();
    write_snapshots(&dir);
    suite_cmd(&dir)
        .args(["add", "dcc", "maya.json", "-n", "maya", "-d", "Maya 2024"])
        .current_dir(dir.root())
        .assert()
        .success();
    add(&dir, "nuke.json", "nuke");

    suite_cmd(&dir)
        .args(["info", "dcc"])
        .current_dir(dir.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Maya 2024"))
        .stdout(predicate::str::contains("TOOL"))
        .stdout(predicate::str::contains("maya-2024.1"))
        .stdout(predicate::str::contains("not visible").not());

    suite_cmd(&dir)
        .args(["info", "dcc", "--verbose-tools"])
        .current_dir(dir.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("(not visible)"));
}

#[test]
fn test_tools_plain_and_json() {
    let dir = TestDir::new();
    write_snapshots(&dir);
    add(&dir, "maya.json", "maya");
    add(&dir, "nuke.json", "nuke");

    suite_cmd(&dir)
        .args(["tools", "dcc"])
        .current_dir(dir.root())
        .assert()
        .success()
        .stdout("maya\nnuke\npython\n");

    let output = suite_cmd(&dir)
        .args(["tools", "dcc", "--json"])
        .current_dir(dir.root())
        .output()
        .unwrap();
    assert!(output.status.success());
    let tools: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tools = tools.as_array().unwrap();
    assert_eq!(tools.len(), 3);
    assert_eq!(tools[2]["tool_alias"], "python");
    assert_eq!(tools[2]["context_name"], "nuke");
    assert_eq!(tools[0]["variant"]["version"], "2024.1");
}

// ============================================================================
// Running stubs
// ============================================================================

#[cfg(unix)]
mod stubs {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::process::Command as StdCommand;

    /// Suite `dcc` with context `hello` providing `greet`, which prints its
    /// arguments and exits 3.
    fn greet_suite(dir: &TestDir) {
        let tool_dir = dir.path("tools");
        fs::create_dir_all(&tool_dir).unwrap();
        let tool = tool_dir.join("greet");
        fs::write(&tool, "#!/bin/sh\necho \"$GREETING $*\"\nexit 3\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        dir.write_snapshot(
            "hello.json",
            &ResolvedContext::new()
                .with_package(ResolvedPackage::new("greeter").tools(["greet"]))
                .with_env("GREETING", "hello")
                .with_path(&tool_dir),
        );
        add(dir, "hello.json", "hello");
    }

    fn run_stub(dir: &TestDir, stub: &str, args: &[&str]) -> std::process::Output {
        StdCommand::new(dir.path(stub))
            .args(args)
            .env("XDG_CONFIG_HOME", dir.path("config"))
            .env("TOOLSUITE_SHELL", "sh")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run stub")
    }

    #[test]
    fn test_stub_runs_tool_in_context() {
        let dir = TestDir::new();
        greet_suite(&dir);

        let out = run_stub(&dir, "dcc/bin/greet", &["big", "world"]);
        assert_eq!(out.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&out.stdout), "hello big world\n");
    }

    #[test]
    fn test_stub_inline_command() {
        let dir = TestDir::new();
        greet_suite(&dir);

        let out = run_stub(&dir, "dcc/bin/greet", &["++command", "echo", "hi"]);
        assert_eq!(out.status.code(), Some(0));
        assert_eq!(String::from_utf8_lossy(&out.stdout), "hi\n");
    }

    #[test]
    fn test_stub_help() {
        let dir = TestDir::new();
        greet_suite(&dir);

        let out = run_stub(&dir, "dcc/bin/greet", &["+h"]);
        assert_eq!(out.status.code(), Some(0));
        assert!(String::from_utf8_lossy(&out.stdout).contains("++interactive"));
    }

    #[test]
    fn test_stub_parse_error() {
        let dir = TestDir::new();
        greet_suite(&dir);

        let out = run_stub(&dir, "dcc/bin/greet", &["++rcfile"]);
        assert_eq!(out.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&out.stderr).contains("usage:"));
        assert!(out.stdout.is_empty());
    }

    #[test]
    fn test_stub_after_relocation() {
        let dir = TestDir::new();
        greet_suite(&dir);
        fs::rename(dir.path("dcc"), dir.path("moved")).unwrap();

        let out = run_stub(&dir, "moved/bin/greet", &[]);
        assert_eq!(out.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&out.stdout), "hello\n");
    }

    #[test]
    fn test_stub_uses_configured_launcher() {
        let dir = TestDir::new();
        write_snapshots(&dir);
        suite_cmd(&dir)
            .env("TOOLSUITE_LAUNCHER", "/opt/toolsuite/bin/suite")
            .args(["add", "dcc", "maya.json", "--name", "maya"])
            .current_dir(dir.root())
            .assert()
            .success();

        dir.assert_file_contains("dcc/bin/maya", "exec /opt/toolsuite/bin/suite dispatch");
    }

    #[test]
    fn test_stub_reads_script_from_stdin() {
        let dir = TestDir::new();
        greet_suite(&dir);

        Command::new(dir.path("dcc/bin/greet"))
            .args(["+i", "+s"])
            .env("XDG_CONFIG_HOME", dir.path("config"))
            .env("TOOLSUITE_SHELL", "sh")
            .env_remove("RUST_LOG")
            .write_stdin("echo \"piped $GREETING\"\n")
            .assert()
            .success()
            .stdout("piped hello\n")
            .stderr("");
    }
}
