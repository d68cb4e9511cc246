//! CLA — clause rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{
    config::Config,
    query::{ParsedQuery, types::KeyKind}
};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "CLA.001",
            severity: Severity::L4,
            summary:  "Outermost SELECT without a WHERE condition",
            content:  "A SELECT without WHERE may examine far more rows than expected (full \
                       table scan). For imprecise COUNT(*)-style requests consider SHOW TABLE \
                       STATUS or EXPLAIN instead.",
            case:     "select id from tbl",
            check:    select_no_where
        },
        Rule {
            code:     "CLA.002",
            severity: Severity::L3,
            summary:  "ORDER BY RAND() is not recommended",
            content:  "ORDER BY RAND() sorts the whole result set only to discard most of it; \
                       it is a very inefficient way to pick random rows.",
            case:     "select name from tbl where id < 1000 order by rand(number)",
            check:    order_by_rand
        },
        Rule {
            code:     "CLA.003",
            severity: Severity::L2,
            summary:  "LIMIT with OFFSET is not recommended",
            content:  "Paging with LIMIT/OFFSET is O(n^2) in the offset; bookmark (keyset) \
                       scanning pages more efficiently as the data grows.",
            case:     "select c1,c2 from tbl where name=xx order by number limit 1 offset 20",
            check:    offset_limit
        },
        Rule {
            code:     "CLA.004",
            severity: Severity::L2,
            summary:  "GROUP BY a constant or column position is not recommended",
            content:  "GROUP BY 1 groups by the first output column; when the column order \
                       changes, the query silently changes meaning.",
            case:     "select col1,col2 from tbl group by 1",
            check:    group_by_const
        },
        Rule {
            code:     "CLA.005",
            severity: Severity::L2,
            summary:  "ORDER BY a constant column has no effect",
            content:  "Ordering by a constant (or a column pinned to one value by the WHERE \
                       clause) is at best a useless operation and may hide a logic error.",
            case:     "select id from test where id=1 order by id",
            check:    order_by_const
        },
        Rule {
            code:     "CLA.006",
            severity: Severity::L4,
            summary:  "GROUP BY or ORDER BY over columns from different tables",
            content:  "Mixing tables in the grouping or ordering keys forces a temporary table \
                       and filesort, a significant performance hazard.",
            case:     "select tb1.col, tb2.col from tb1, tb2 where id=1 group by tb1.col, \
                       tb2.col",
            check:    cross_table_keys
        },
        Rule {
            code:     "CLA.008",
            severity: Severity::L2,
            summary:  "Add an explicit ORDER BY to the GROUP BY",
            content:  "MySQL sorts GROUP BY col1, col2 output by default; when no ordering is \
                       needed, add ORDER BY NULL to skip the sort.",
            case:     "select c1,c2,c3 from t1 where c1='foo' group by c2",
            check:    group_without_order
        },
        Rule {
            code:     "CLA.009",
            severity: Severity::L2,
            summary:  "ORDER BY condition is an expression",
            content:  "Ordering by an expression or function uses a temporary table, which \
                       performs poorly without a selective WHERE clause.",
            case:     "select description from film where title ='ACADEMY DINOSAUR' order by \
                       length-language_id;",
            check:    order_by_expr
        },
        Rule {
            code:     "CLA.010",
            severity: Severity::L2,
            summary:  "GROUP BY condition is an expression",
            content:  "Grouping by an expression or function uses a temporary table, which \
                       performs poorly without a selective WHERE clause.",
            case:     "select description from film where title ='ACADEMY DINOSAUR' GROUP BY \
                       length-language_id;",
            check:    group_by_expr
        },
        Rule {
            code:     "CLA.011",
            severity: Severity::L1,
            summary:  "Add a comment to the table",
            content:  "A table comment makes the table's meaning clear and eases later \
                       maintenance.",
            case:     "CREATE TABLE `test1` (`ID` bigint(20) NOT NULL AUTO_INCREMENT) \
                       ENGINE=InnoDB DEFAULT CHARSET=utf8",
            check:    table_comment_missing
        },
        Rule {
            code:     "CLA.012",
            severity: Severity::L2,
            summary:  "Decompose the complex query into several simple ones",
            content:  "Spaghetti queries are hard to write, modify and debug, and often hide a \
                       Cartesian product; break them into simple queries even if the results \
                       must be combined in the application.",
            case:     "This is a very long SQL, case omitted.",
            check:    spaghetti
        },
        Rule {
            code:     "CLA.013",
            severity: Severity::L3,
            summary:  "The HAVING clause is not recommended",
            content:  "Rewriting the HAVING condition as a WHERE condition lets the index be \
                       used during query processing.",
            case:     "SELECT s.c_id,count(s.c_id) FROM s where c = test GROUP BY s.c_id \
                       HAVING s.c_id <> '1660'",
            check:    having_clause
        },
        Rule {
            code:     "CLA.014",
            severity: Severity::L2,
            summary:  "Prefer TRUNCATE when deleting a whole table",
            content:  "Deleting every row with DELETE is far slower than TRUNCATE.",
            case:     "delete from tbl",
            check:    delete_no_where
        },
        Rule {
            code:     "CLA.015",
            severity: Severity::L4,
            summary:  "UPDATE without a WHERE condition",
            content:  "An UPDATE without WHERE is usually fatal; think twice before running \
                       it.",
            case:     "update tbl set col=1",
            check:    update_no_where
        },
        Rule {
            code:     "CLA.016",
            severity: Severity::L2,
            summary:  "Do not UPDATE the primary key",
            content:  "The primary key uniquely identifies rows; updating it frequently \
                       disturbs metadata statistics and ordinary queries with them.",
            case:     "update tbl set col=1",
            check:    super::reserved
        },
    ]
}

static ORDER_BY_RAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\border\s+by\s+rand\s*\(").expect("valid regex"));

fn select_no_where(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.select_no_where
}

fn order_by_rand(query: &ParsedQuery, _config: &Config) -> bool {
    ORDER_BY_RAND.is_match(&query.text)
}

fn offset_limit(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.has_limit && query.meta.has_offset
}

fn group_by_const(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .group_keys
        .iter()
        .any(|k| matches!(k.kind, KeyKind::Literal | KeyKind::Position))
}

fn order_by_const(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.order_keys.iter().any(|k| {
        matches!(k.kind, KeyKind::Literal | KeyKind::Position)
            || k.column.as_ref().is_some_and(|col| {
                query
                    .meta
                    .where_eq_cols
                    .iter()
                    .any(|eq| eq.eq_ignore_ascii_case(col))
            })
    })
}

fn cross_table_keys(query: &ParsedQuery, _config: &Config) -> bool {
    let mut qualifiers: Vec<String> = query
        .meta
        .group_keys
        .iter()
        .chain(query.meta.order_keys.iter())
        .filter_map(|k| k.qualifier.as_ref())
        .map(|q| q.to_lowercase().to_string())
        .collect();
    qualifiers.sort();
    qualifiers.dedup();
    qualifiers.len() > 1
}

fn group_without_order(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.has_group_by && !query.meta.has_order_by
}

fn order_by_expr(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .order_keys
        .iter()
        .any(|k| k.kind == KeyKind::Expression)
}

fn group_by_expr(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .group_keys
        .iter()
        .any(|k| k.kind == KeyKind::Expression)
}

fn table_comment_missing(query: &ParsedQuery, _config: &Config) -> bool {
    if query.meta.creates.is_empty() {
        return false;
    }
    // Table options follow the closing paren of the column list.
    match query.text.rfind(')') {
        Some(pos) => !query.text[pos..].to_lowercase().contains("comment"),
        None => true
    }
}

fn spaghetti(query: &ParsedQuery, config: &Config) -> bool {
    query.text.len() > config.spaghetti_query_length
}

fn having_clause(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.has_having
}

fn delete_no_where(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.delete_no_where
}

fn update_no_where(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.update_no_where
}
