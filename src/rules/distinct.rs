//! DIS — DISTINCT rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "DIS.001",
            severity: Severity::L1,
            summary:  "Eliminate unnecessary DISTINCT conditions",
            content:  "Many DISTINCTs are a symptom of a complex wrap-around query; break it \
                       into simple queries. When the primary key is part of the result set, \
                       DISTINCT has no effect at all.",
            case:     "SELECT DISTINCT c.c_id, count(DISTINCT c.c_name), count(DISTINCT \
                       c.c_e) FROM tbl",
            check:    too_many_distinct
        },
        Rule {
            code:     "DIS.002",
            severity: Severity::L3,
            summary:  "COUNT(DISTINCT col, col2) may not mean what you expect",
            content:  "COUNT(DISTINCT col) counts distinct non-NULL values of one column; \
                       with several columns the NULL handling changes the result.",
            case:     "SELECT COUNT(DISTINCT col, col2) FROM tbl;",
            check:    count_distinct_multi
        },
        Rule {
            code:     "DIS.003",
            severity: Severity::L3,
            summary:  "DISTINCT * is meaningless on a table with a primary key",
            content:  "With a primary key present, DISTINCT over all columns returns the same \
                       rows as no DISTINCT at all.",
            case:     "SELECT DISTINCT * FROM film;",
            check:    distinct_star
        },
    ]
}

static DISTINCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdistinct\b").expect("valid regex"));

fn too_many_distinct(query: &ParsedQuery, config: &Config) -> bool {
    DISTINCT.find_iter(&query.text).count() > config.max_distinct_count
}

fn count_distinct_multi(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.count_distinct_multi
}

fn distinct_star(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.distinct_star
}
