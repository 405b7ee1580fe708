//! Runs real shells; Unix only.
#![cfg(unix)]

use std::fs;
use suite_context::{
    Context, Error, ResolvedContext, ResolvedPackage, ShellCommand, ShellRequest,
};
use tempfile::TempDir;

fn script(text: &str) -> ShellRequest {
    ShellRequest {
        command: Some(ShellCommand::Script(text.to_string())),
        shell: Some("sh".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_exit_code_is_returned() {
    let context = ResolvedContext::new();
    assert_eq!(context.execute_shell(&script("exit 3")).unwrap(), 3);
    assert_eq!(context.execute_shell(&script("true")).unwrap(), 0);
}

#[test]
fn test_environment_is_applied() {
    let context = ResolvedContext::new().with_env("SUITE_TEST_VALUE", "from-context");
    let code = context
        .execute_shell(&script(r#"test "$SUITE_TEST_VALUE" = from-context"#))
        .unwrap();
    assert_eq!(code, 0);
}

#[test]
fn test_path_entries_find_tools() {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    let tool = bin.join("suite-test-tool");
    fs::write(&tool, "#!/bin/sh\nexit 7\n").unwrap();
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
    }

    let context = ResolvedContext::new().with_path(&bin);
    let request = ShellRequest {
        command: Some(ShellCommand::Argv(vec!["suite-test-tool".into()])),
        shell: Some("sh".into()),
        ..Default::default()
    };
    assert_eq!(context.execute_shell(&request).unwrap(), 7);
}

#[test]
fn test_argv_arguments_pass_verbatim() {
    let context = ResolvedContext::new();
    let request = ShellRequest {
        command: Some(ShellCommand::Argv(vec![
            "test".into(),
            "$HOME".into(),
            "=".into(),
            "$HOME".into(),
        ])),
        shell: Some("sh".into()),
        ..Default::default()
    };
    assert_eq!(context.execute_shell(&request).unwrap(), 0);
}

#[test]
fn test_missing_shell_is_an_error() {
    let context = ResolvedContext::new();
    let request = ShellRequest {
        shell: Some("definitely-not-a-shell-xyz".into()),
        ..script("true")
    };
    let err = context.execute_shell(&request).unwrap_err();
    assert!(matches!(err, Error::ShellNotFound { .. }));
}

#[test]
fn test_save_and_load_snapshot() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contexts").join("maya.json");
    let context = ResolvedContext::new()
        .with_package(ResolvedPackage::new("maya").version("2024").tools(["maya"]))
        .with_env("MAYA_LOCATION", "/opt/maya");

    context.save(&path).unwrap();
    let loaded = ResolvedContext::load(&path).unwrap();

    assert_eq!(loaded, context);
}

#[test]
fn test_load_any_extension_as_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("maya.rxt");
    fs::write(&path, r#"{"packages": [{"name": "maya", "tools": ["maya"]}]}"#).unwrap();

    let loaded = ResolvedContext::load(&path).unwrap();
    assert_eq!(loaded.packages[0].name, "maya");
}

#[test]
fn test_load_garbage_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.json");
    fs::write(&path, "not json").unwrap();

    assert!(ResolvedContext::load(&path).is_err());
}
