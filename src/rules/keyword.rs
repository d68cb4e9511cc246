//! KWR — keyword and naming rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "KWR.001",
            severity: Severity::L2,
            summary:  "SQL_CALC_FOUND_ROWS is inefficient",
            content:  "SQL_CALC_FOUND_ROWS does not scale; replace the total count with a \
                       different strategy such as paged result display.",
            case:     "select SQL_CALC_FOUND_ROWS col from tbl where id>1000",
            check:    sql_calc_found_rows
        },
        Rule {
            code:     "KWR.002",
            severity: Severity::L2,
            summary:  "Do not use MySQL keywords as column or table names",
            content:  "Keyword identifiers force quoting everywhere; one forgotten escape \
                       and the request fails.",
            case:     "CREATE TABLE tbl ( `select` int )",
            check:    keyword_identifier
        },
        Rule {
            code:     "KWR.003",
            severity: Severity::L1,
            summary:  "Do not use plural column or table names",
            content:  "A table name describes the entity inside the table, not how many of \
                       them there are; the matching DO class name is singular too.",
            case:     "CREATE TABLE tbl ( `books` int )",
            check:    plural_identifier
        },
        Rule {
            code:     "KWR.004",
            severity: Severity::L1,
            summary:  "Multi-byte encoded names are not recommended",
            content:  "Name databases, tables, columns and aliases with ASCII letters, digits \
                       and underscores only.",
            case:     "select col as \u{5217} from tb",
            check:    multibyte_identifier
        },
        Rule {
            code:     "KWR.005",
            severity: Severity::L1,
            summary:  "SQL contains invisible unicode characters",
            content:  "Some IDEs insert non-break spaces or zero-width characters into SQL; \
                       `cat -A file.sql` reveals them.",
            case:     "update tb set status = 1 where id = 1;",
            check:    invisible_unicode
        },
    ]
}

static SQL_CALC_FOUND_ROWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsql_calc_found_rows\b").expect("valid regex"));

const KEYWORDS: &[&str] = &[
    "select", "from", "where", "order", "group", "by", "insert", "update", "delete", "join",
    "table", "index", "key", "desc", "asc", "into", "values", "set", "and", "or", "not", "null",
    "primary", "unique", "drop", "alter", "create", "database", "column", "limit", "union",
    "having", "distinct", "like", "between", "exists", "in", "is", "read", "write", "interval",
    "range", "rows", "partition", "check", "trigger", "references",
];

fn ddl_identifiers(query: &ParsedQuery) -> Vec<String> {
    let mut names = Vec::new();
    for create in &query.meta.creates {
        names.push(create.name.to_lowercase().to_string());
        for column in &create.columns {
            names.push(column.name.to_lowercase().to_string());
        }
    }
    names
}

fn sql_calc_found_rows(query: &ParsedQuery, _config: &Config) -> bool {
    SQL_CALC_FOUND_ROWS.is_match(&query.text)
}

fn keyword_identifier(query: &ParsedQuery, _config: &Config) -> bool {
    ddl_identifiers(query)
        .iter()
        .any(|name| KEYWORDS.contains(&name.as_str()))
}

fn plural_identifier(query: &ParsedQuery, _config: &Config) -> bool {
    ddl_identifiers(query).iter().any(|name| {
        name.ends_with('s') && !name.ends_with("ss") && !name.ends_with("us") && !name.ends_with("is")
    })
}

fn multibyte_identifier(query: &ParsedQuery, _config: &Config) -> bool {
    let aliases = query
        .meta
        .select_aliases
        .iter()
        .map(|a| a.alias.to_string())
        .chain(
            query
                .meta
                .tables
                .iter()
                .filter_map(|t| t.alias.as_ref().map(|a| a.to_string()))
        );
    ddl_identifiers(query)
        .into_iter()
        .chain(aliases)
        .any(|name| !name.is_ascii())
}

fn invisible_unicode(query: &ParsedQuery, _config: &Config) -> bool {
    query.text.chars().any(|c| {
        matches!(
            c,
            '\u{00A0}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2028}' | '\u{2029}'
                | '\u{FEFF}'
        )
    })
}
