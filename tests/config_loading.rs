use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use reloader::config::load_and_validate;
use reloader::errors::ReloaderError;
use reloader::watch::RuleTable;
use reloader_test_utils::builders::{ConfigFileBuilder, WatchConfigBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn demo_config_loads_in_order_with_defaults() -> TestResult {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/Reloader.toml"))?;

    assert_eq!(cfg.skip_folders(), [".git", "target", "node_modules"]);

    let patterns: Vec<&str> = cfg.rules().iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["*.rs", "*_test.go", "[Mm]akefile"]);

    let rs = &cfg.rules()[0];
    assert_eq!(rs.delay, 1000);
    assert!(rs.start);
    assert_eq!(rs.log.as_deref(), Some("target/build.log"));
    assert_eq!(rs.log_tag.as_deref(), Some("build"));

    let go = &cfg.rules()[1];
    assert!(!go.start);
    assert!(go.log.is_none());

    // Integer start flag, as older configs used.
    assert!(cfg.rules()[2].start);

    Ok(())
}

#[test]
fn rule_table_carries_delay_and_flags() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_rule(WatchConfigBuilder::new("*.txt", "echo hi").delay_ms(1000).build())
        .with_rule(WatchConfigBuilder::new("*.md", "make docs").start(true).log("docs.log").build())
        .build();

    let table = RuleTable::from_config(&cfg);
    let rules: Vec<_> = table.iter().collect();

    assert_eq!(rules[0].debounce(), Duration::from_millis(1000));
    assert!(!rules[0].run_at_startup());
    assert!(rules[1].run_at_startup());
    assert_eq!(rules[1].log_path(), Some(&PathBuf::from("docs.log")));
    Ok(())
}

#[test]
fn missing_config_is_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Reloader.toml");

    match load_and_validate(&path) {
        Err(ReloaderError::ConfigNotFound { path: p }) => {
            assert_eq!(p, path);
        }
        Err(e) => panic!("Expected ConfigNotFound, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[[watch]\npattern = ");

    match load_and_validate(file.path()) {
        Err(ReloaderError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_command_is_a_parse_error() {
    let file = write_config(
        r#"
[[watch]]
pattern = "*.txt"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(ReloaderError::TomlError(_))
    ));
}

#[test]
fn config_without_rules_still_loads() -> TestResult {
    let file = write_config(
        r#"
[skip]
folders = [".git"]
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert!(cfg.rules().is_empty());
    assert_eq!(cfg.skip_folders(), [".git"]);
    assert!(RuleTable::from_config(&cfg).is_empty());
    Ok(())
}

#[test]
fn empty_command_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_rule(WatchConfigBuilder::new("*.txt", "  ").build())
        .build_raw();

    match reloader::config::ConfigFile::try_from(raw) {
        Err(ReloaderError::ConfigError(msg)) => assert!(msg.contains("*.txt")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn skip_folders_must_be_plain_names() {
    let file = write_config(
        r#"
[skip]
folders = ["src/generated"]

[[watch]]
pattern = "*.txt"
command = "echo hi"
"#,
    );

    match load_and_validate(file.path()) {
        Err(ReloaderError::ConfigError(msg)) => assert!(msg.contains("src/generated")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn broken_glob_is_not_fatal() -> TestResult {
    let file = write_config(
        r#"
[[watch]]
pattern = "[oops"
command = "echo broken"

[[watch]]
pattern = "*.txt"
command = "echo ok"
"#,
    );

    let cfg = load_and_validate(file.path())?;
    let table = RuleTable::from_config(&cfg);

    assert!(table.iter().next().unwrap().pattern_error().is_some());
    let matched: Vec<_> = table.matching("a.txt").into_iter().map(|r| r.command()).collect();
    assert_eq!(matched, vec!["echo ok"]);
    Ok(())
}
