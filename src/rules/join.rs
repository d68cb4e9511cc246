//! JOI — join rules.

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
            code:     "JOI.001",
            severity: Severity::L2,
            summary:  "JOIN statement mixes commas and ANSI joins",
            content:  "Mixing comma joins with ANSI JOIN syntax is hard to read, and join \
                       precedence differs across MySQL versions, which can introduce errors \
                       on upgrade.",
            case:     "select c1,c2,c3 from t1,t2 join t3 on t1.c1=t2.c1 where id>1000",
            check:    comma_ansi_mix
        },
        Rule {
            code:     "JOI.002",
            severity: Severity::L4,
            summary:  "The same table is joined twice",
            content:  "The table appears at least twice in the FROM clause; the query can \
                       usually be simplified to a single access.",
            case:     "select tb1.col from (tb1, tb2) join tb2 on tb1.id=tb2.id where \
                       tb1.id=1",
            check:    duplicate_table
        },
        Rule {
            code:     "JOI.003",
            severity: Severity::L4,
            summary:  "The OUTER JOIN is ineffective",
            content:  "A WHERE condition on the outer table's columns silently turns the \
                       OUTER JOIN into an INNER JOIN; the query likely misunderstands how \
                       LEFT/RIGHT JOIN works.",
            case:     "select c1,c2,c3 from t1 left outer join t2 using(c1) where t1.c2=2 \
                       and t2.c3=4",
            check:    super::reserved
        },
        Rule {
            code:     "JOI.004",
            severity: Severity::L4,
            summary:  "Exclusive JOIN is not recommended",
            content:  "A LEFT OUTER JOIN with WHERE right_table.col IS NULL often tests the \
                       wrong column; the intended condition is usually the join column \
                       itself.",
            case:     "select c1,c2,c3 from t1 left outer join t2 on t1.c1=t2.c1 where t2.c2 \
                       is null",
            check:    super::reserved
        },
        Rule {
            code:     "JOI.005",
            severity: Severity::L2,
            summary:  "Reduce the number of JOINs",
            content:  "Too many JOINs are a symptom of a complex wrap-around query; break it \
                       into several simple queries.",
            case:     "select bp1.p_id from b1 join bp1 on (b1.b_id = bp1.b_id) join bp21 on \
                       (b1.b_id = bp21.b_id) join bp31 ... where b2.b_id = 0",
            check:    too_many_joins
        },
        Rule {
            code:     "JOI.006",
            severity: Severity::L4,
            summary:  "Rewrite the nested query as a JOIN",
            content:  "A scalar subquery in a comparison generally executes once per outer \
                       row; a flattened JOIN optimizes far better.",
            case:     "SELECT s,p,d FROM tbl WHERE p.p_id = (SELECT s.p_id FROM tbl WHERE \
                       s.c_id = 100996 AND s.q = 1 )",
            check:    scalar_subquery
        },
        Rule {
            code:     "JOI.007",
            severity: Severity::L4,
            summary:  "Joined DELETE or UPDATE is not recommended",
            content:  "Delete or update one table per statement; operating on several tables \
                       at once is hard to review and risky.",
            case:     "UPDATE users u LEFT JOIN hobby h ON u.id = h.uid SET u.name = \
                       'pianoboy' WHERE h.hobby = 'piano';",
            check:    multi_table_write
        },
        Rule {
            code:     "JOI.008",
            severity: Severity::L4,
            summary:  "Do not JOIN across databases",
            content:  "A cross-database join means the statement spans two subsystems and \
                       usually points at over-coupling or a misplaced table.",
            case:     "SELECT a.t1.col, b.t2.col FROM a.t1, b.t2 WHERE a.t1.id = b.t2.id",
            check:    cross_db_join
        },
    ]
}

fn comma_ansi_mix(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.comma_join_tables > 1 && query.meta.ansi_join
}

fn duplicate_table(query: &ParsedQuery, _config: &Config) -> bool {
    if !query
        .meta
        .stmt_kinds
        .iter()
        .all(|k| *k == StmtKind::Select)
    {
        return false;
    }
    let mut names: Vec<String> = query
        .meta
        .tables
        .iter()
        .map(|t| t.name.to_lowercase().to_string())
        .collect();
    let before = names.len();
    names.sort();
    names.dedup();
    before > names.len()
}

fn too_many_joins(query: &ParsedQuery, config: &Config) -> bool {
    query.meta.join_count > config.max_join_table_count
}

fn scalar_subquery(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.scalar_subquery_cmp
}

static WRITE_WITH_JOIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*(update|delete)\b.*\bjoin\b").expect("valid regex")
});

fn multi_table_write(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.multi_table_write || WRITE_WITH_JOIN.is_match(&query.text)
}

fn cross_db_join(query: &ParsedQuery, _config: &Config) -> bool {
    let mut dbs: Vec<String> = query
        .meta
        .tables
        .iter()
        .filter_map(|t| t.db.as_ref())
        .map(|db| db.to_lowercase().to_string())
        .collect();
    dbs.sort();
    dbs.dedup();
    dbs.len() > 1
}
