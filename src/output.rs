//! Scoring and report rendering.
//!
//! Every format runs the same pipeline — merge the finding sets, resolve
//! conflicts, apply the OK-sentinel policy and the ignore list, drop `ERR`
//! placeholders — and only the rendering differs. The formatter classifies
//! each finding into one of six partitions once and renders partitions in a
//! fixed order, lexicographically by code within each.

use serde::Serialize;
use tracing::{debug, error};

use crate::{
    config::Config,
    fingerprint,
    query::ParsedQuery,
    rules::{self, Finding, FindingSet}
};

/// Where a finding is rendered in the structured report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partition {
    Error,
    Explain,
    Profiling,
    Trace,
    Index,
    Heuristic
}

fn partition_of(code: &str) -> Partition {
    if code.starts_with("ERR") {
        Partition::Error
    } else if code.starts_with("EXP") {
        Partition::Explain
    } else if code.starts_with("PRO") {
        Partition::Profiling
    } else if code.starts_with("TRA") {
        Partition::Trace
    } else if code.starts_with("IDX") {
        Partition::Index
    } else {
        Partition::Heuristic
    }
}

/// Convert the surviving severities into a score in `[0, 100]`.
///
/// Start at 100 and subtract five times the severity digit per real finding;
/// an `ERR.*` finding with non-empty content means the statement failed to
/// execute and overrides everything with 0.
pub fn score(findings: &FindingSet) -> i32 {
    let mut total = 100;
    for (code, finding) in findings.iter() {
        if code == "OK" {
            continue;
        }
        if code.starts_with("ERR") && !finding.content.is_empty() {
            return 0;
        }
        total -= finding.severity.digit() * 5;
    }
    total.clamp(0, 100)
}

fn stars(score: i32) -> String {
    let filled = (score / 20).clamp(0, 5) as usize;
    let mut out = String::new();
    for _ in 0..filled {
        out.push_str("★ ");
    }
    for _ in filled..5 {
        out.push_str("☆ ");
    }
    out.push_str(&format!("{score}/100"));
    out
}

/// JSON report document. Field names and casing are a public contract.
#[derive(Debug, Serialize)]
struct JsonSuggest {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Fingerprint")]
    fingerprint: String,
    #[serde(rename = "Score")]
    score: i32,
    #[serde(rename = "Sample")]
    sample: String,
    #[serde(rename = "Explain")]
    explain: Vec<Finding>,
    #[serde(rename = "HeuristicRules")]
    heuristic_rules: Vec<Finding>,
    #[serde(rename = "IndexRules")]
    index_rules: Vec<Finding>,
    #[serde(rename = "Tables")]
    tables: Vec<String>
}

/// Render the merged findings for one statement.
///
/// Applies the shared merge / conflict / OK / ignore pipeline, then renders
/// in the requested format. An unrecognized format name falls back to a
/// pretty debug dump. Returns the filtered set together with the rendered
/// string.
pub fn format_suggest(
    sql: &str,
    current_db: &str,
    format: &str,
    config: &Config,
    finding_sets: Vec<FindingSet>
) -> (FindingSet, String) {
    debug!(format, "format_suggest");
    let (fp, id) = if sql.is_empty() {
        (String::new(), String::new())
    } else {
        let fp = fingerprint::fingerprint(sql);
        let id = fingerprint::id(&fp);
        (fp, id)
    };

    let mut merged = FindingSet::new();
    for set in finding_sets {
        merged.merge(set);
    }
    let mut merged = rules::resolve_conflicts(merged);

    // OK policy: the sentinel only ever stands alone. When it is the sole
    // member it survives even an `OK` entry in the ignore list, so the user
    // still sees a positive confirmation.
    if merged.is_empty() {
        merged.insert(
            rules::get("OK")
                .expect("OK sentinel present in catalog")
                .finding()
        );
    }
    if merged.len() > 1 {
        merged.remove("OK");
    }
    merged.retain(|code, _| !rules::is_ignored(code, &config.ignore_rules));
    // ERR placeholders carry no message and must not reach scoring or
    // rendering.
    merged.retain(|code, finding| !(code.starts_with("ERR") && finding.content.is_empty()));

    let rendered = match format {
        "json" => render_json(sql, current_db, &fp, &id, &merged),
        "text" => render_text(sql, &id, &merged),
        "lint" => render_lint(&merged),
        "markdown" | "html" | "explain-digest" | "duplicate-key-checker" => {
            render_report(sql, &fp, &id, format, config, &merged)
        }
        other => {
            debug!(format = other, "unknown report type, using pretty dump");
            render_pretty(sql, &merged)
        }
    };

    (merged, rendered)
}

/// Tables referenced by a statement, backquoted and qualified with the
/// current database when the reference itself carries none.
pub fn table_names(sql: &str, current_db: &str) -> Vec<String> {
    let parsed = ParsedQuery::new(sql, None, None);
    let mut seen = indexmap::IndexSet::new();
    for table in &parsed.meta.tables {
        if table.name.is_empty() {
            continue;
        }
        let db = table.db.as_deref().unwrap_or(current_db);
        if db.is_empty() {
            seen.insert(format!("`{}`", table.name));
        } else {
            seen.insert(format!("`{}`.`{}`", db, table.name));
        }
    }
    seen.into_iter().collect()
}

fn render_json(sql: &str, current_db: &str, fp: &str, id: &str, merged: &FindingSet) -> String {
    let mut doc = JsonSuggest {
        id: id.to_string(),
        fingerprint: fp.to_string(),
        score: score(merged),
        sample: sql.to_string(),
        explain: Vec::new(),
        heuristic_rules: Vec::new(),
        index_rules: Vec::new(),
        tables: table_names(sql, current_db)
    };

    for (code, finding) in merged.iter() {
        match partition_of(code) {
            Partition::Explain => doc.explain.push(finding.clone()),
            Partition::Index => doc.index_rules.push(finding.clone()),
            _ => doc.heuristic_rules.push(finding.clone())
        }
    }

    match serde_json::to_string_pretty(&doc) {
        Ok(rendered) => rendered,
        Err(err) => {
            error!(error = %err, "JSON marshaling failed");
            String::new()
        }
    }
}

fn render_text(sql: &str, id: &str, merged: &FindingSet) -> String {
    let mut buf = Vec::new();
    for (code, finding) in merged.iter() {
        buf.push(format!("Query:  {sql}"));
        buf.push(format!("ID:  {id}"));
        buf.push(format!("Item:  {code}"));
        buf.push(format!("Severity:  {}", finding.severity));
        buf.push(format!("Summary:  {}", finding.summary));
        buf.push(format!("Content:  {}", finding.content));
    }
    buf.join("\n")
}

fn render_lint(merged: &FindingSet) -> String {
    let mut buf = Vec::new();
    for (code, finding) in merged.iter() {
        // lint output ignores OK and EXP
        if code != "OK" && !code.starts_with("EXP") {
            buf.push(format!("{code} {}", finding.summary));
        }
    }
    buf.join("\n")
}

fn render_report(
    sql: &str,
    fp: &str,
    id: &str,
    format: &str,
    config: &Config,
    merged: &FindingSet
) -> String {
    let mut buf: Vec<String> = Vec::new();

    if !sql.is_empty() && !merged.is_empty() {
        let body = match config.explain_sql_report_type.as_str() {
            "fingerprint" => fp,
            // The pretty printer lives outside the audit core; the sample
            // stands in for both "sample" and the default.
            _ => sql
        };
        buf.push(format!("# Query: {id}\n\n```sql\n{body}\n```\n"));
    }

    let in_partition = |p: Partition| {
        merged
            .iter()
            .filter(move |(code, _)| partition_of(code) == p)
    };

    // MySQL execute failed
    let errors: Vec<_> = in_partition(Partition::Error).collect();
    if !errors.is_empty() {
        buf.push(String::from("## MySQL execute failed\n"));
        for (_, finding) in errors {
            buf.push(finding.content.clone());
        }
    }

    // Explain, with the EXP.000 digest block leading
    if let Some(digest) = merged.get("EXP.000") {
        buf.push(format!("##  {}", digest.summary));
        buf.push(digest.content.clone());
        buf.push(format!("{}\n", digest.case));
    }
    for (code, finding) in in_partition(Partition::Explain) {
        if code == "EXP.000" {
            continue;
        }
        buf.push(format!("###  {}", finding.summary));
        buf.push(finding.content.clone());
        buf.push(format!("{}\n", finding.case));
    }

    // Profiling
    let profiling: Vec<_> = in_partition(Partition::Profiling).collect();
    if !profiling.is_empty() {
        buf.push(String::from("## Profiling\n"));
        for (_, finding) in profiling {
            buf.push(finding.content.clone());
        }
    }

    // Trace
    let trace: Vec<_> = in_partition(Partition::Trace).collect();
    if !trace.is_empty() {
        buf.push(String::from("## Trace\n"));
        for (_, finding) in trace {
            buf.push(finding.content.clone());
        }
    }

    // Index advisor
    for (code, finding) in in_partition(Partition::Index) {
        buf.push(format!("##  {}", finding.summary));
        buf.push(format!("* **Item:**  {code}"));
        buf.push(format!("* **Severity:**  {}", finding.severity));
        buf.push(format!("* **Content:**  {}", finding.content));
        if format == "duplicate-key-checker" {
            buf.push(format!("* **Original DDL:**\n```sql\n{}\n```\n", finding.case));
        } else {
            buf.push(format!("* **Case:**  {}\n", finding.case));
        }
    }

    // Heuristic
    for (code, finding) in in_partition(Partition::Heuristic) {
        buf.push(format!("## {}", finding.summary));
        if code == "OK" {
            continue;
        }
        buf.push(format!("* **Item:**  {code}"));
        buf.push(format!("* **Severity:**  {}", finding.severity));
        buf.push(format!("* **Content:**  {}", finding.content));
    }

    match config.report_type.as_str() {
        "markdown" | "html" if buf.len() > 1 => {
            let header = buf.remove(0);
            format!("{header}\n{}\n\n{}", stars(score(merged)), buf.join("\n"))
        }
        _ => buf.join("\n")
    }
}

fn render_pretty(sql: &str, merged: &FindingSet) -> String {
    let mut buf = vec![format!("Query:  {sql}")];
    for (_, finding) in merged.iter() {
        buf.push(format!("{finding:#?}"));
    }
    buf.join("\n")
}

/// Markdown dump of the heuristic catalog, for tooling that lists the
/// supported rules.
pub fn format_rule_list() -> String {
    let mut buf = vec![String::from("# Heuristic rules\n\n[toc]\n")];
    for (code, rule) in rules::catalog() {
        if *code == "OK" || *code == "ERR.000" {
            continue;
        }
        buf.push(format!(
            "## {}\n\n* **Item**: {}\n* **Severity**: {}\n* **Content**: {}\n* **Case**:\n\n```sql\n{}\n```\n",
            rule.summary, rule.code, rule.severity, rule.content, rule.case
        ));
    }
    buf.join("\n")
}
