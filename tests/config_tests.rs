// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::io::Write;

use sql_auditor::config::{Config, in_blacklist};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.ignore_rules, vec![String::from("COL.011")]);
    assert_eq!(config.max_varchar_length, 1024);
    assert_eq!(config.max_text_cols_count, 2);
    assert_eq!(config.max_value_count, 100);
    assert_eq!(config.allow_engines, vec![String::from("innodb")]);
    assert_eq!(config.idx_prefix, "idx_");
    assert_eq!(config.uk_prefix, "uk_");
    assert_eq!(config.report_type, "markdown");
    assert!(config.blacklist.is_empty());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "max_varchar_length = 256\nignore_rules = [\"ALI.*\"]\nallow_charsets = [\"utf8mb4\"]"
    )
    .unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.max_varchar_length, 256);
    assert_eq!(config.ignore_rules, vec![String::from("ALI.*")]);
    assert_eq!(config.allow_charsets, vec![String::from("utf8mb4")]);
    // untouched keys keep their defaults
    assert_eq!(config.max_text_cols_count, 2);
}

#[test]
fn test_config_rejects_invalid_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_varchar_length = [not toml").unwrap();
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_blacklist_literal_match() {
    let config = Config {
        blacklist: vec![String::from("select 1 from dual")],
        ..Default::default()
    };
    assert!(in_blacklist("select 1 from dual", &config));
    assert!(!in_blacklist("select 2 from dual", &config));
}

#[test]
fn test_blacklist_regex_is_case_insensitive() {
    let config = Config {
        blacklist: vec![String::from("^select\\s+1\\b")],
        ..Default::default()
    };
    assert!(in_blacklist("SELECT 1 FROM dual", &config));
    assert!(!in_blacklist("SELECT 2 FROM dual", &config));
}

#[test]
fn test_blacklist_invalid_regex_matches_literally_only() {
    let config = Config {
        blacklist: vec![String::from("select [")],
        ..Default::default()
    };
    assert!(in_blacklist("select [", &config));
    assert!(!in_blacklist("select col from tbl", &config));
}

#[test]
fn test_empty_blacklist_matches_nothing() {
    let config = Config::default();
    assert!(!in_blacklist("drop table users", &config));
}
