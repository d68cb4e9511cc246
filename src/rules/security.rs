//! SEC — security rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{
    config::Config,
    query::{ParsedQuery, types::StmtKind}
};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "SEC.001",
            severity: Severity::L0,
            summary:  "Use TRUNCATE with caution",
            content:  "TRUNCATE TABLE is the fastest way to empty a table, but it does not \
                       report the number of deleted rows and takes a metadata lock; when \
                       many tables must be emptied, DROP + CREATE holds the lock for less \
                       time.",
            case:     "TRUNCATE TABLE tbl_name",
            check:    truncate_table
        },
        Rule {
            code:     "SEC.002",
            severity: Severity::L0,
            summary:  "Do not store passwords in plaintext",
            content:  "Anyone who can read the column or intercept the statement can read \
                       the password; store a salted one-way hash computed in the \
                       application instead.",
            case:     "create table test(id int,name varchar(20) not null,password \
                       varchar(200) not null)",
            check:    readable_password
        },
        Rule {
            code:     "SEC.003",
            severity: Severity::L0,
            summary:  "Back up before DELETE/DROP/TRUNCATE",
            content:  "Back up the data before any high-risk destructive operation.",
            case:     "delete from table where col = 'condition'",
            check:    destructive_statement
        },
        Rule {
            code:     "SEC.004",
            severity: Severity::L0,
            summary:  "Common SQL injection functions detected",
            content:  "SLEEP(), BENCHMARK(), GET_LOCK() and RELEASE_LOCK() usually appear in \
                       injected SQL and can cripple database performance.",
            case:     "SELECT BENCHMARK(10, RAND())",
            check:    injection_function
        },
    ]
}

static INJECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(sleep|benchmark|get_lock|release_lock)\s*\(").expect("valid regex")
});

fn truncate_table(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .stmt_kinds
        .iter()
        .any(|k| *k == StmtKind::Truncate)
}

fn readable_password(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.creates.iter().any(|table| {
        table.columns.iter().any(|c| {
            let name = c.name.to_lowercase();
            name.contains("password") || name.contains("passwd") || name == "pwd"
        })
    })
}

fn destructive_statement(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.stmt_kinds.iter().any(|k| {
        matches!(k, StmtKind::Delete | StmtKind::Drop | StmtKind::Truncate)
    })
}

fn injection_function(query: &ParsedQuery, _config: &Config) -> bool {
    INJECTION.is_match(&query.text)
}
