//! Heuristic rule catalog and audit engine.
//!
//! The catalog maps a stable rule code (`CATEGORY.NNN`) to its metadata and
//! check predicate. It is built lazily on first access and read-only
//! afterwards; iteration order never affects observable output because the
//! formatter imposes its own ordering.
//!
//! Rule codes are a public contract: downstream systems store them as issue
//! identifiers. Codes may be deprecated (their check stops firing) but are
//! never renumbered. A handful of codes are reserved for out-of-scope
//! collaborators (index advisor, EXPLAIN, profiling); their catalog entries
//! never fire here so that external emitters can still resolve metadata.
//!
//! # Rule Categories
//!
//! - **ALI** alias · **ALT** alter · **ARG** argument · **CLA** clause
//! - **COL** column · **DIS** distinct · **FUN** function · **GRP** group
//! - **JOI** join · **KEY** key · **KWR** keyword · **LCK** lock
//! - **LIT** literal · **RES** result · **SEC** security · **STA** standard
//! - **SUB** subquery · **TBL** table
//!
//! Externally-produced categories (`ERR`/`EXP`/`PRO`/`TRA`/`IDX`) never
//! appear in rule bodies but may appear in a merged [`FindingSet`].

mod alias;
mod alter;
mod arg;
mod clause;
mod column;
mod distinct;
mod function;
mod group;
mod join;
mod key;
mod keyword;
mod lock;
mod literal;
mod result;
mod security;
mod standard;
mod subquery;
mod table;
pub mod types;

use std::{
    collections::BTreeMap,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::LazyLock
};

use rayon::prelude::*;
use tracing::debug;

pub use types::{CheckFn, Finding, FindingSet, Rule, Severity};

use crate::{config::Config, query::ParsedQuery};

/// Check body for codes reserved for external collaborators.
pub(crate) fn reserved(_query: &ParsedQuery, _config: &Config) -> bool {
    false
}

static CATALOG: LazyLock<BTreeMap<&'static str, Rule>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    let all = alias::rules()
        .into_iter()
        .chain(alter::rules())
        .chain(arg::rules())
        .chain(clause::rules())
        .chain(column::rules())
        .chain(distinct::rules())
        .chain(function::rules())
        .chain(group::rules())
        .chain(join::rules())
        .chain(key::rules())
        .chain(keyword::rules())
        .chain(lock::rules())
        .chain(literal::rules())
        .chain(result::rules())
        .chain(security::rules())
        .chain(standard::rules())
        .chain(subquery::rules())
        .chain(table::rules());
    for rule in all {
        let previous = map.insert(rule.code, rule);
        assert!(previous.is_none(), "duplicate rule code {}", rule.code);
    }
    map.insert("OK", Rule {
        code:     "OK",
        severity: Severity::L0,
        summary:  "OK",
        content:  "OK",
        case:     "OK",
        check:    reserved
    });
    // Placeholder for the syntax-error finding; the engine clones it with
    // the parser message as content when the secondary parse fails.
    map.insert("ERR.000", Rule {
        code:     "ERR.000",
        severity: Severity::L8,
        summary:  "SQL syntax error",
        content:  "",
        case:     "",
        check:    reserved
    });
    map
});

/// The process-wide, read-only rule catalog.
pub fn catalog() -> &'static BTreeMap<&'static str, Rule> {
    &CATALOG
}

/// Look up one rule by code.
pub fn get(code: &str) -> Option<&'static Rule> {
    CATALOG.get(code)
}

/// Whether a finding code matches the configured ignore list.
///
/// Each pattern is a prefix glob: a trailing `*` is stripped and the rest
/// treated as "starts with". An empty prefix matches nothing, and the
/// literal `OK` matches nothing through this mechanism (the sentinel is
/// controlled by a separate flag in the formatter).
pub fn is_ignored(code: &str, patterns: &[String]) -> bool {
    for pattern in patterns {
        let prefix = pattern.trim_matches('*');
        if prefix.is_empty() || prefix == "OK" {
            continue;
        }
        if code.starts_with(prefix) {
            debug!(code, pattern, "finding suppressed by ignore list");
            return true;
        }
    }
    false
}

/// Pairwise suppression: when the first code of a pair is present, the
/// second encodes the same observation at a lower abstraction level and is
/// dropped. Kept as data, not branches.
const CONFLICT_SUPPRESSIONS: &[(&str, &str)] = &[
    ("KWR.001", "ERR.000"),
    ("SUB.004", "SUB.001"),
    ("KEY.007", "KEY.002"),
    ("RES.004", "RES.003"),
];

/// Resolve overlapping findings; the more specific rule of each configured
/// pair wins.
pub fn resolve_conflicts(mut findings: FindingSet) -> FindingSet {
    for (winner, loser) in CONFLICT_SUPPRESSIONS {
        if findings.contains(winner) {
            findings.remove(loser);
        }
    }
    findings
}

/// Run the enabled rules against one parsed query.
///
/// Rules are independent and run in parallel; a panicking rule is treated as
/// a non-match. The returned set either equals `{OK}` or contains only real
/// findings.
pub fn audit(query: &ParsedQuery, config: &Config) -> FindingSet {
    let mut findings = FindingSet::new();

    if let Some(message) = &query.parse_error
        && let Some(rule) = get("ERR.000")
    {
        let mut finding = rule.finding();
        finding.content = message.clone();
        findings.insert(finding);
    }

    let rules: Vec<&Rule> = CATALOG.values().collect();
    let fired: Vec<&Rule> = rules
        .into_par_iter()
        .filter(|rule| {
            if is_ignored(rule.code, &config.ignore_rules) {
                return false;
            }
            match catch_unwind(AssertUnwindSafe(|| (rule.check)(query, config))) {
                Ok(fired) => fired,
                Err(_) => {
                    debug!(code = rule.code, "rule check panicked; treated as non-match");
                    false
                }
            }
        })
        .collect();

    for rule in fired {
        findings.insert(rule.finding());
    }

    if findings.is_empty() {
        findings.insert(
            get("OK")
                .expect("OK sentinel present in catalog")
                .finding()
        );
    }
    findings
}
