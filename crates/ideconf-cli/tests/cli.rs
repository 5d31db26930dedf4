use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn ideconf(args: &[&str], project: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ideconf"))
        .args(args)
        .arg("--project")
        .arg(project)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run ideconf")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const CONFIG: &str = r#"
defaults: &defaults
  vmParameters: [-ea]
runConfigurations:
  application:
    <<: *defaults
    name: app
    mainClass: demo.Main
"#;

#[test]
fn test_check_reports_missing_and_valid_files() {
    let dir = TempDir::new().unwrap();
    let output = ideconf(&["check"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("No configuration file"));

    fs::write(dir.path().join("ideconf.yaml"), CONFIG).unwrap();
    let output = ideconf(&["check"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).trim_end().ends_with("ideconf.yaml: ok"));
}

#[test]
fn test_check_fails_on_undefined_alias() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ideconf.yaml"), "plugins: *nowhere\n").unwrap();
    let output = ideconf(&["check"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere"));
}

#[test]
fn test_query_prints_scalars_and_subtrees() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ideconf.yaml"), CONFIG).unwrap();

    let output = ideconf(&["query", "runConfigurations.application.mainClass"], dir.path());
    assert!(output.status.success());
    assert_eq!(stdout(&output), "demo.Main\n");

    let output = ideconf(&["query", "runConfigurations.application"], dir.path());
    let text = stdout(&output);
    assert!(text.contains("name: app"), "{text}");
    assert!(text.contains("- \"-ea\"") || text.contains("- -ea"), "{text}");

    let output = ideconf(&["query", "runConfigurations.missing"], dir.path());
    assert!(!output.status.success());
}
