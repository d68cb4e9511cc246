// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_auditor::config::Config;
use sql_auditor::output::{format_rule_list, format_suggest, score, table_names};
use sql_auditor::query::ParsedQuery;
use sql_auditor::rules::{self, FindingSet};

fn audit(sql: &str, config: &Config) -> FindingSet {
    let parsed = ParsedQuery::new(sql, None, None);
    rules::audit(&parsed, config)
}

#[test]
fn test_score_of_ok_is_full() {
    let config = Config::default();
    let findings = audit("select id from tbl where id > 1 order by id limit 10", &config);
    assert_eq!(score(&findings), 100);
}

#[test]
fn test_score_subtracts_severity() {
    let mut findings = FindingSet::new();
    findings.insert(rules::get("CLA.015").unwrap().finding()); // L4
    assert_eq!(score(&findings), 80);
}

#[test]
fn test_score_zero_on_execution_error() {
    let mut findings = FindingSet::new();
    findings.insert(rules::get("ALI.001").unwrap().finding());
    let mut err = rules::get("ERR.000").unwrap().finding();
    err.content = String::from("syntax error near 'frmo'");
    findings.insert(err);
    assert_eq!(score(&findings), 0);
}

#[test]
fn test_score_clamped_to_zero() {
    let mut findings = FindingSet::new();
    for code in ["ALI.002", "TBL.003", "SUB.005", "COL.018", "CLA.001", "RES.001"] {
        findings.insert(rules::get(code).unwrap().finding());
    }
    let value = score(&findings);
    assert!((0..=100).contains(&value));
    assert_eq!(value, 0);
}

#[test]
fn test_json_schema_fields() {
    let config = Config::default();
    let findings = audit("select * from film", &config);
    let (_, rendered) =
        format_suggest("select * from film", "sakila", "json", &config, vec![findings]);
    for field in ["\"ID\"", "\"Fingerprint\"", "\"Score\"", "\"Sample\"", "\"Explain\"",
                  "\"HeuristicRules\"", "\"IndexRules\"", "\"Tables\""] {
        assert!(rendered.contains(field), "missing {field} in {rendered}");
    }
    assert!(rendered.contains("`sakila`.`film`"), "got {rendered}");
    assert!(rendered.contains("COL.001"), "got {rendered}");
}

#[test]
fn test_lint_format() {
    let config = Config::default();
    let findings = audit("select id from tbl", &config);
    let (_, rendered) = format_suggest("select id from tbl", "", "lint", &config, vec![findings]);
    assert!(rendered.lines().any(|l| l.starts_with("CLA.001 ")), "got {rendered}");
}

#[test]
fn test_lint_suppresses_ok() {
    let config = Config::default();
    let findings = audit("select id from tbl where id > 1 order by id limit 10", &config);
    let (returned, rendered) = format_suggest(
        "select id from tbl where id > 1 order by id limit 10",
        "",
        "lint",
        &config,
        vec![findings]
    );
    assert!(returned.contains("OK"));
    assert_eq!(rendered, "");
}

#[test]
fn test_text_format() {
    let config = Config::default();
    let findings = audit("update tbl set col=1", &config);
    let (_, rendered) =
        format_suggest("update tbl set col=1", "", "text", &config, vec![findings]);
    assert!(rendered.contains("Item:  CLA.015"), "got {rendered}");
    assert!(rendered.contains("Severity:  L4"), "got {rendered}");
}

#[test]
fn test_markdown_report() {
    let config = Config::default();
    let findings = audit("select id from tbl", &config);
    let (_, rendered) =
        format_suggest("select id from tbl", "", "markdown", &config, vec![findings]);
    assert!(rendered.starts_with("# Query: "), "got {rendered}");
    assert!(rendered.contains("/100"), "got {rendered}");
    assert!(rendered.contains("## "), "got {rendered}");
}

#[test]
fn test_markdown_fingerprint_header() {
    let config = Config {
        explain_sql_report_type: String::from("fingerprint"),
        ..Default::default()
    };
    let findings = audit("select id from tbl where id = 42", &config);
    let (_, rendered) = format_suggest(
        "select id from tbl where id = 42",
        "",
        "markdown",
        &config,
        vec![findings]
    );
    assert!(rendered.contains("id = ?"), "got {rendered}");
    assert!(!rendered.contains("id = 42"), "got {rendered}");
}

#[test]
fn test_unknown_format_falls_back_to_pretty() {
    let config = Config::default();
    let findings = audit("select id from tbl", &config);
    let (_, rendered) =
        format_suggest("select id from tbl", "", "nonsense", &config, vec![findings]);
    assert!(rendered.starts_with("Query:  "), "got {rendered}");
}

#[test]
fn test_format_is_deterministic() {
    let config = Config::default();
    let first = format_suggest(
        "select * from film",
        "sakila",
        "json",
        &config,
        vec![audit("select * from film", &config)]
    );
    let second = format_suggest(
        "select * from film",
        "sakila",
        "json",
        &config,
        vec![audit("select * from film", &config)]
    );
    assert_eq!(first.1, second.1);
}

#[test]
fn test_ignore_never_increases_findings() {
    let sql = "select * from film";
    let base_config = Config::default();
    let (base, _) =
        format_suggest(sql, "", "lint", &base_config, vec![audit(sql, &base_config)]);

    let narrowed_config = Config {
        ignore_rules: vec![String::from("COL.*")],
        ..Default::default()
    };
    let (narrowed, _) =
        format_suggest(sql, "", "lint", &narrowed_config, vec![audit(sql, &narrowed_config)]);
    assert!(narrowed.len() <= base.len());
    assert!(!narrowed.contains("COL.001"));
}

#[test]
fn test_ok_survives_ok_ignore_when_alone() {
    let config = Config {
        ignore_rules: vec![String::from("OK")],
        ..Default::default()
    };
    let (returned, _) = format_suggest("select 1", "", "lint", &config, vec![]);
    assert!(returned.contains("OK"));
    assert_eq!(returned.len(), 1);
}

#[test]
fn test_merge_is_last_write_wins() {
    let mut first = FindingSet::new();
    first.insert(rules::get("ALI.001").unwrap().finding());
    let mut second = FindingSet::new();
    let mut shadow = rules::get("ALI.001").unwrap().finding();
    shadow.content = String::from("overridden");
    second.insert(shadow);
    first.merge(second);
    assert_eq!(first.len(), 1);
    assert_eq!(first.get("ALI.001").unwrap().content, "overridden");
}

#[test]
fn test_external_findings_are_rendered() {
    let config = Config::default();
    let mut external = FindingSet::new();
    let mut idx = rules::get("ALI.001").unwrap().finding();
    idx.code = String::from("IDX.001");
    idx.summary = String::from("add a covering index");
    external.insert(idx);
    let (returned, rendered) = format_suggest(
        "select id from tbl",
        "",
        "markdown",
        &config,
        vec![audit("select id from tbl", &config), external]
    );
    assert!(returned.contains("IDX.001"));
    assert!(rendered.contains("add a covering index"), "got {rendered}");
}

#[test]
fn test_empty_err_placeholder_dropped() {
    let config = Config::default();
    let mut sets = FindingSet::new();
    sets.insert(rules::get("ERR.000").unwrap().finding()); // empty content
    let (returned, _) = format_suggest("select 1", "", "lint", &config, vec![sets]);
    assert!(!returned.contains("ERR.000"));
}

#[test]
fn test_table_names_qualification() {
    assert_eq!(
        table_names("select * from film", "sakila"),
        vec![String::from("`sakila`.`film`")]
    );
    assert_eq!(
        table_names("select * from sakila.film", ""),
        vec![String::from("`sakila`.`film`")]
    );
    assert_eq!(table_names("select * from film", ""), vec![String::from("`film`")]);
}

#[test]
fn test_rule_list_dump() {
    let listing = format_rule_list();
    assert!(listing.contains("ALI.001"));
    assert!(listing.contains("TBL.008"));
    assert!(!listing.contains("* **Item**: OK"));
}
