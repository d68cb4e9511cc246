//! RES — result-correctness rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "RES.001",
            severity: Severity::L4,
            summary:  "Non-deterministic GROUP BY",
            content:  "The query returns columns that appear neither in an aggregate function \
                       nor in the GROUP BY expression, so their values are non-deterministic.",
            case:     "select c1,c2,c3 from t1 where c2='foo' group by c2",
            check:    nondeterministic_group_by
        },
        Rule {
            code:     "RES.002",
            severity: Severity::L4,
            summary:  "LIMIT without ORDER BY",
            content:  "LIMIT without ORDER BY returns rows in plan-dependent order; the \
                       result is non-deterministic.",
            case:     "select col1,col2 from tbl where name=xx limit 10",
            check:    limit_without_order
        },
        Rule {
            code:     "RES.003",
            severity: Severity::L4,
            summary:  "UPDATE/DELETE with a LIMIT condition",
            content:  "UPDATE/DELETE with LIMIT is as dangerous as omitting the WHERE clause: \
                       it can desynchronize replicas or break replication.",
            case:     "UPDATE film SET length = 120 WHERE title = 'abc' LIMIT 1;",
            check:    write_with_limit
        },
        Rule {
            code:     "RES.004",
            severity: Severity::L4,
            summary:  "UPDATE/DELETE with an ORDER BY condition",
            content:  "Do not attach ORDER BY to UPDATE or DELETE operations.",
            case:     "UPDATE film SET length = 120 WHERE title = 'abc' ORDER BY title",
            check:    write_with_order
        },
        Rule {
            code:     "RES.005",
            severity: Severity::L4,
            summary:  "The UPDATE may carry a logic error corrupting data",
            content:  "Separate the fields of an UPDATE's SET list with commas, not AND: \
                       \"set col = 1 and col2 = 2\" assigns col the boolean result instead.",
            case:     "update tbl set col = 1 and cl = 2 where col=3;",
            check:    update_set_and
        },
        Rule {
            code:     "RES.006",
            severity: Severity::L4,
            summary:  "The comparison condition is never true",
            content:  "A WHERE condition that is statically false matches no rows.",
            case:     "select * from tbl where 1 != 1;",
            check:    impossible_where
        },
        Rule {
            code:     "RES.007",
            severity: Severity::L4,
            summary:  "The comparison condition is always true",
            content:  "A WHERE condition that is statically true disables filtering and scans \
                       the whole table.",
            case:     "select * from tbl where 1 = 1;",
            check:    meaningless_where
        },
        Rule {
            code:     "RES.008",
            severity: Severity::L2,
            summary:  "LOAD DATA / SELECT ... INTO OUTFILE is not recommended",
            content:  "SELECT INTO OUTFILE needs the FILE privilege and opens security \
                       issues; LOAD DATA speeds imports but can stall replica \
                       synchronization.",
            case:     "LOAD DATA INFILE 'data.txt' INTO TABLE db2.my_table;",
            check:    load_file
        },
        Rule {
            code:     "RES.009",
            severity: Severity::L2,
            summary:  "Chained comparison is not recommended",
            content:  "SELECT * FROM tbl WHERE col = col = 'abc' compares col to the boolean \
                       of the first comparison; the intended condition is almost always col = \
                       'abc'.",
            case:     "SELECT * FROM tbl WHERE col = col = 'abc'",
            check:    chained_comparison
        },
        Rule {
            code:     "RES.010",
            severity: Severity::L2,
            summary:  "Keep business logic out of ON UPDATE CURRENT_TIMESTAMP columns",
            content:  "Such a column changes whenever any other column of the row is updated; \
                       if it carries user-visible meaning, bulk fixes silently corrupt it.",
            case:     "CREATE TABLE category (last_update TIMESTAMP NOT NULL DEFAULT \
                       CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP)",
            check:    on_update_timestamp
        },
        Rule {
            code:     "RES.011",
            severity: Severity::L2,
            summary:  "The updated table carries an ON UPDATE CURRENT_TIMESTAMP column",
            content:  "The column changes with every update of the row; assign \
                       col=col in the SET list to keep its value.",
            case:     "UPDATE category SET name='ActioN', last_update=last_update WHERE \
                       category_id=1",
            check:    super::reserved
        },
    ]
}

static WRITE_WITH_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*(update|delete)\b.*\blimit\s+\d").expect("valid regex")
});
static WRITE_WITH_ORDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*(update|delete)\b.*\border\s+by\b").expect("valid regex")
});
static SET_AND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bset\s+\S+\s*=\s*\S+\s+and\s+\S+\s*=").expect("valid regex")
});
static LOAD_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(load\s+data|into\s+outfile|into\s+dumpfile)\b").expect("valid regex")
});
static ON_UPDATE_TS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bon\s+update\s+current_timestamp").expect("valid regex")
});

fn nondeterministic_group_by(query: &ParsedQuery, _config: &Config) -> bool {
    if !query.meta.has_group_by {
        return false;
    }
    query.meta.select_cols.iter().any(|col| {
        !query.meta.group_keys.iter().any(|key| {
            key.column
                .as_ref()
                .is_some_and(|k| k.eq_ignore_ascii_case(col))
        })
    })
}

fn limit_without_order(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.has_limit && !query.meta.has_order_by
}

fn write_with_limit(query: &ParsedQuery, _config: &Config) -> bool {
    WRITE_WITH_LIMIT.is_match(&query.text)
}

fn write_with_order(query: &ParsedQuery, _config: &Config) -> bool {
    WRITE_WITH_ORDER.is_match(&query.text)
}

fn update_set_and(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.update_set_and || SET_AND.is_match(&query.text)
}

fn impossible_where(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.where_always_false
}

fn meaningless_where(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.where_always_true
}

fn load_file(query: &ParsedQuery, _config: &Config) -> bool {
    LOAD_FILE.is_match(&query.text)
}

fn chained_comparison(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.where_chained_cmp
}

fn on_update_timestamp(query: &ParsedQuery, _config: &Config) -> bool {
    !query.meta.creates.is_empty() && ON_UPDATE_TS.is_match(&query.text)
}
