//! LIT — literal rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "LIT.001",
            severity: Severity::L2,
            summary:  "Storing IP addresses as strings",
            content:  "A literal that looks like an IP address outside INET_ATON() suggests \
                       the column stores text; integers store and compare IPs more \
                       efficiently.",
            case:     "insert into tbl (IP,name) values('10.20.306.122','test')",
            check:    ip_string
        },
        Rule {
            code:     "LIT.002",
            severity: Severity::L4,
            summary:  "Date/time literal is not quoted",
            content:  "\"WHERE col < 2010-02-12\" is valid SQL but means \"WHERE col < \
                       1996\"; quote date/time literals, with no spaces around the quotes.",
            case:     "select col1,col2 from tbl where time < 2018-01-10",
            check:    unquoted_date
        },
        Rule {
            code:     "LIT.003",
            severity: Severity::L3,
            summary:  "A column stores a list of related values",
            content:  "Comma-separated id lists in VARCHAR/TEXT columns need pattern matching \
                       to query and defeat validation; store each value as its own row in a \
                       junction table.",
            case:     "select c1,c2,c3,c4 from tab1 where col_id REGEXP '[[:<:]]12[[:>:]]'",
            check:    multi_value_column
        },
        Rule {
            code:     "LIT.004",
            severity: Severity::L1,
            summary:  "End statements with a semicolon or a set DELIMITER",
            content:  "USE database, SHOW DATABASES and friends also need a semicolon or a \
                       configured DELIMITER to terminate.",
            case:     "USE db",
            check:    super::reserved
        },
    ]
}

static IP_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").expect("valid regex"));
static INET_ATON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\binet_aton\s*\(").expect("valid regex"));
static UNQUOTED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([=<>]|\bbetween\s|\band\s|\bor\s)\s*\d{4}\s*-\s*\d{1,2}\s*-\s*\d{1,2}")
        .expect("valid regex")
});
static WORD_BOUNDARY_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[:[<>]:\]\]").expect("valid regex"));

fn ip_string(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .string_literals
        .iter()
        .any(|s| IP_LITERAL.is_match(s))
        && !INET_ATON.is_match(&query.text)
}

fn unquoted_date(query: &ParsedQuery, _config: &Config) -> bool {
    UNQUOTED_DATE.is_match(&query.text)
}

fn multi_value_column(query: &ParsedQuery, _config: &Config) -> bool {
    WORD_BOUNDARY_REGEXP.is_match(&query.text)
}
