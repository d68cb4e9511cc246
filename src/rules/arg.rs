//! ARG — argument / predicate rules.

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
            code:     "ARG.001",
            severity: Severity::L4,
            summary:  "Avoid LIKE patterns with a leading wildcard",
            content:  "A pattern such as \"%foo\" cannot use any existing index.",
            case:     "select c1,c2,c3 from tbl where name like '%foo'",
            check:    prefix_like
        },
        Rule {
            code:     "ARG.002",
            severity: Severity::L1,
            summary:  "LIKE query without any wildcard",
            content:  "A LIKE pattern containing no wildcard is logically an equality \
                       comparison and usually a mistake.",
            case:     "select c1,c2,c3 from tbl where name like 'foo'",
            check:    equal_like
        },
        Rule {
            code:     "ARG.003",
            severity: Severity::L4,
            summary:  "Comparison involves an implicit type conversion and cannot use an index",
            content:  "Implicit conversions risk missing the index, which is severe under high \
                       concurrency and large data volumes.",
            case:     "SELECT * FROM sakila.film WHERE length >= '60';",
            check:    super::reserved
        },
        Rule {
            code:     "ARG.004",
            severity: Severity::L4,
            summary:  "IN (NULL) / NOT IN (NULL) is never true",
            content:  "Write col IN ('val1', 'val2', 'val3') OR col IS NULL instead.",
            case:     "SELECT * FROM tb WHERE col IN (NULL);",
            check:    in_null
        },
        Rule {
            code:     "ARG.005",
            severity: Severity::L1,
            summary:  "Use IN with care; too many elements lead to a full table scan",
            content:  "For continuous values prefer BETWEEN over IN, and keep the element \
                       count low: past a point MySQL falls back to scanning the whole table.",
            case:     "select id from t where num in(1,2,3)",
            check:    in_too_long
        },
        Rule {
            code:     "ARG.006",
            severity: Severity::L1,
            summary:  "Avoid NULL checks inside the WHERE clause",
            content:  "IS NULL / IS NOT NULL can make the engine skip the index and scan the \
                       table; a NOT NULL column with a default value usually queries faster.",
            case:     "select id from t where num is null",
            check:    is_null_check
        },
        Rule {
            code:     "ARG.007",
            severity: Severity::L3,
            summary:  "Avoid pattern-matching operators",
            content:  "Regular-expression predicates are slow and may return unexpected \
                       results; prefer a search engine or a FULLTEXT index when fuzzy matching \
                       is really needed.",
            case:     "select c_id,c2,c3 from tbl where c2 regexp 'test'",
            check:    pattern_matching
        },
        Rule {
            code:     "ARG.008",
            severity: Severity::L1,
            summary:  "Prefer an IN predicate over OR chains on an indexed column",
            content:  "An IN list can be sorted to match the index order and retrieved more \
                       efficiently than a chain of OR equality comparisons.",
            case:     "SELECT c1,c2,c3 FROM tbl WHERE c1 = 14 OR c1 = 17",
            check:    or_chain
        },
        Rule {
            code:     "ARG.009",
            severity: Severity::L1,
            summary:  "Quoted string with leading or trailing spaces",
            content:  "Spaces around a VARCHAR value cause logic surprises: in MySQL 5.5 'a' \
                       and 'a ' may compare equal.",
            case:     "SELECT 'abc '",
            check:    edge_spaces
        },
        Rule {
            code:     "ARG.010",
            severity: Severity::L1,
            summary:  "Do not use hints such as sql_no_cache, force index, ignore key, \
                       straight_join",
            content:  "A hint pins an execution plan, and as the data changes the original \
                       prediction stops being correct.",
            case:     "SELECT * FROM t1 USE INDEX (i1) ORDER BY a;",
            check:    hints
        },
        Rule {
            code:     "ARG.011",
            severity: Severity::L3,
            summary:  "Avoid negative queries such as NOT IN / NOT LIKE",
            content:  "Negative predicates cause full table scans and hurt query performance \
                       badly.",
            case:     "select id from t where num not in(1,2,3);",
            check:    negated
        },
        Rule {
            code:     "ARG.012",
            severity: Severity::L2,
            summary:  "Single INSERT/REPLACE carries too many rows",
            content:  "A bulk INSERT/REPLACE with a large VALUES list performs poorly and can \
                       delay replica synchronization; split it into smaller batches.",
            case:     "INSERT INTO tb (a) VALUES (1), (2)",
            check:    insert_values
        },
        Rule {
            code:     "ARG.013",
            severity: Severity::L0,
            summary:  "DDL statement contains full-width quotation marks",
            content:  "Full-width quotes \u{201c}\u{201d} or \u{2018}\u{2019} in DDL are \
                       usually a typing mistake; check that they are intended.",
            case:     "CREATE TABLE tb (a varchar(10) default '\u{201c}\u{201d}')",
            check:    full_width_quote
        },
        Rule {
            code:     "ARG.014",
            severity: Severity::L4,
            summary:  "A column name inside an IN list widens the matched range",
            content:  "delete from t where id in(1, 2, id) can wipe the whole table; double \
                       check the IN condition.",
            case:     "select id from t where id in(1, 2, id)",
            check:    in_column
        },
    ]
}

static LIKE_PREFIX_WILDCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\blike\s+['"][%_]"#).expect("valid regex"));
static LIKE_NO_WILDCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\blike\s+['"][^'"%_]+['"]"#).expect("valid regex"));
static IN_NULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin\s*\([^)]*\bnull\b[^)]*\)").expect("valid regex"));
static REGEXP_MATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(regexp|rlike|similar\s+to)\b").expect("valid regex"));
static HINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(sql_no_cache|sql_cache|sql_buffer_result|sql_big_result|sql_small_result|high_priority|low_priority|straight_join|(use|force|ignore)\s+(index|key))\b"
    )
    .expect("valid regex")
});
static NOT_IN_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnot\s+(in|like)\b").expect("valid regex"));

fn prefix_like(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .like_patterns
        .iter()
        .any(|p| p.starts_with('%') || p.starts_with('_'))
        || LIKE_PREFIX_WILDCARD.is_match(&query.text)
}

fn equal_like(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .like_patterns
        .iter()
        .any(|p| !p.is_empty() && !p.contains('%') && !p.contains('_'))
        || (query.meta.like_patterns.is_empty() && LIKE_NO_WILDCARD.is_match(&query.text))
}

fn in_null(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.in_lists.iter().any(|l| l.has_null)
        || (query.meta.in_lists.is_empty() && IN_NULL.is_match(&query.text))
}

fn in_too_long(query: &ParsedQuery, config: &Config) -> bool {
    query
        .meta
        .in_lists
        .iter()
        .any(|l| l.len > config.max_in_count)
}

fn is_null_check(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.where_is_null
}

fn pattern_matching(query: &ParsedQuery, _config: &Config) -> bool {
    REGEXP_MATCH.is_match(&query.text)
}

fn or_chain(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.or_same_col
}

fn edge_spaces(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .string_literals
        .iter()
        .any(|s| s.starts_with(' ') || s.ends_with(' '))
}

fn hints(query: &ParsedQuery, _config: &Config) -> bool {
    HINTS.is_match(&query.text)
}

fn negated(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.negated_match || NOT_IN_LIKE.is_match(&query.text)
}

fn insert_values(query: &ParsedQuery, config: &Config) -> bool {
    query
        .meta
        .insert
        .as_ref()
        .is_some_and(|i| i.row_count > config.max_value_count)
}

fn is_ddl(query: &ParsedQuery) -> bool {
    query.meta.stmt_kinds.iter().any(|k| {
        matches!(
            k,
            StmtKind::CreateTable | StmtKind::CreateIndex | StmtKind::CreateView
                | StmtKind::AlterTable
        )
    })
}

fn full_width_quote(query: &ParsedQuery, _config: &Config) -> bool {
    is_ddl(query)
        && query
            .text
            .chars()
            .any(|c| matches!(c, '\u{201c}' | '\u{201d}' | '\u{2018}' | '\u{2019}'))
}

fn in_column(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.in_lists.iter().any(|l| l.has_ident)
}
