//! STA — standards and naming rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "STA.001",
            severity: Severity::L0,
            summary:  "'!=' is a non-standard operator",
            content:  "Standard SQL spells the not-equal operator \"<>\".",
            case:     "select col1,col2 from tbl where type!=0",
            check:    nonstandard_inequality
        },
        Rule {
            code:     "STA.002",
            severity: Severity::L1,
            summary:  "No space after the dot in db.table or table.column",
            content:  "db. table and table. column are syntactically valid but needlessly \
                       confusing; write the reference without the space.",
            case:     "select col from sakila. film",
            check:    space_after_dot
        },
        Rule {
            code:     "STA.003",
            severity: Severity::L1,
            summary:  "Index name does not follow the naming convention",
            content:  "Name secondary indexes with the configured index prefix and unique \
                       indexes with the configured unique prefix.",
            case:     "create index part_of_name on customer (name);",
            check:    index_prefix
        },
        Rule {
            code:     "STA.004",
            severity: Severity::L1,
            summary:  "Identifier uses characters other than letters, digits and underscores",
            content:  "Start identifiers with a letter or underscore, use only letters, \
                       digits and underscores, avoid camel case and never put two \
                       consecutive underscores in a name.",
            case:     "CREATE TABLE ` abc` (a int);",
            check:    identifier_charset
        },
    ]
}

static SPACE_AFTER_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_`]\.\s+[A-Za-z_]").expect("valid regex"));
static VALID_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

fn nonstandard_inequality(query: &ParsedQuery, _config: &Config) -> bool {
    query.text.contains("!=")
}

fn space_after_dot(query: &ParsedQuery, _config: &Config) -> bool {
    SPACE_AFTER_DOT.is_match(&query.text)
}

fn index_prefix(query: &ParsedQuery, config: &Config) -> bool {
    let keys = query
        .meta
        .creates
        .iter()
        .flat_map(|c| c.keys.iter())
        .chain(query.meta.indexes.iter());
    keys.filter(|k| !k.primary && !k.name.is_empty()).any(|k| {
        if k.unique {
            !k.name.starts_with(config.uk_prefix.as_str())
        } else {
            !k.name.starts_with(config.idx_prefix.as_str())
        }
    })
}

fn identifier_charset(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.creates.iter().any(|table| {
        std::iter::once(table.name.as_str())
            .chain(table.columns.iter().map(|c| c.name.as_str()))
            .any(|name| name.contains("__") || !VALID_NAME.is_match(name))
    })
}
