//! ALI — alias rules.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "ALI.001",
            severity: Severity::L0,
            summary:  "Declare aliases explicitly with the AS keyword",
            content:  "An explicit alias (\"tbl AS alias\") is easier to read than an implicit \
                       one (\"tbl alias\").",
            case:     "select name from tbl t1 where id < 1000",
            check:    implicit_alias
        },
        Rule {
            code:     "ALI.002",
            severity: Severity::L8,
            summary:  "Do not alias the column wildcard '*'",
            content:  "\"SELECT tbl.* col1, col2\" aliases the wildcard; such SQL usually hides \
                       a logic error, because the alias renames the last column of tbl instead \
                       of selecting an extra one.",
            case:     "select tbl.* as c1,c2,c3 from tbl where id < 1000",
            check:    wildcard_alias
        },
        Rule {
            code:     "ALI.003",
            severity: Severity::L1,
            summary:  "Alias should differ from the table or column name",
            content:  "An alias equal to the real name of the table or column makes the query \
                       harder to tell apart.",
            case:     "select name from tbl as tbl where id < 1000",
            check:    same_alias
        },
    ]
}

fn explicit_as(text: &str, alias: &str) -> bool {
    RegexBuilder::new(&format!(r#"\bas\s+[`'"]?{}\b"#, regex::escape(alias)))
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(text))
        .unwrap_or(true)
}

fn implicit_alias(query: &ParsedQuery, _config: &Config) -> bool {
    let table_aliases = query
        .meta
        .tables
        .iter()
        .filter_map(|t| t.alias.as_deref());
    let column_aliases = query.meta.select_aliases.iter().map(|a| a.alias.as_str());
    table_aliases
        .chain(column_aliases)
        .any(|alias| !explicit_as(&query.text, alias))
}

static STAR_AS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\s+as\s+\w").expect("valid regex"));
static QUALIFIED_STAR_ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.\*\s+(as\s+)?([A-Za-z_]\w*)").expect("valid regex"));

fn wildcard_alias(query: &ParsedQuery, _config: &Config) -> bool {
    if STAR_AS.is_match(&query.text) {
        return true;
    }
    if let Some(captures) = QUALIFIED_STAR_ALIAS.captures(&query.text) {
        if captures.get(1).is_some() {
            return true;
        }
        let word = captures[2].to_lowercase();
        return !matches!(
            word.as_str(),
            "from" | "where" | "limit" | "order" | "group" | "having" | "union" | "into" | "for"
        );
    }
    false
}

fn same_alias(query: &ParsedQuery, _config: &Config) -> bool {
    let tables = query.meta.tables.iter().any(|t| {
        t.alias
            .as_ref()
            .is_some_and(|alias| alias.eq_ignore_ascii_case(&t.name))
    });
    let columns = query
        .meta
        .select_aliases
        .iter()
        .any(|a| a.alias.eq_ignore_ascii_case(&a.expr));
    tables || columns
}
