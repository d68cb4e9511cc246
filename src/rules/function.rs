//! FUN — function rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "FUN.001",
            severity: Severity::L2,
            summary:  "Avoid functions and operators in WHERE conditions",
            content:  "A function applied to a column in the WHERE clause defeats the \
                       table's indexes and forces a full scan; keep the bare column on the \
                       left of the comparison and the filter expression on the right.",
            case:     "select id from t where substring(name,1,3)='abc'",
            check:    function_in_where
        },
        Rule {
            code:     "FUN.002",
            severity: Severity::L1,
            summary:  "COUNT(*) performs poorly with a WHERE clause or a non-MyISAM engine",
            content:  "MyISAM optimizes bare COUNT(*) over the whole table; with a WHERE \
                       condition or another engine the count scans many rows. When an \
                       approximation suffices, the row estimate from EXPLAIN is cheap.",
            case:     "SELECT c3, COUNT(*) AS accounts FROM tab where c2 < 10000 GROUP BY c3",
            check:    count_star_where
        },
        Rule {
            code:     "FUN.003",
            severity: Severity::L3,
            summary:  "String concatenation over possibly-NULL columns",
            content:  "Concatenating a NULL column makes the whole expression NULL; wrap the \
                       parts with COALESCE() to keep the result non-NULL.",
            case:     "select c1 || coalesce(' ' || c2 || ' ', ' ') || c3 as c from tbl",
            check:    string_concat
        },
        Rule {
            code:     "FUN.004",
            severity: Severity::L4,
            summary:  "The SYSDATE() function is not recommended",
            content:  "SYSDATE() can diverge between master and replicas; use NOW() instead.",
            case:     "SELECT SYSDATE();",
            check:    sysdate
        },
        Rule {
            code:     "FUN.005",
            severity: Severity::L1,
            summary:  "COUNT(col) or COUNT(constant) is not recommended",
            content:  "COUNT(*) is the SQL92 standard way to count rows, independent of data, \
                       NULL or non-NULL; COUNT(col) silently skips NULLs.",
            case:     "SELECT COUNT(1) FROM tbl;",
            check:    count_col_or_const
        },
        Rule {
            code:     "FUN.006",
            severity: Severity::L1,
            summary:  "Mind the NPE when using SUM(col)",
            content:  "SUM(col) over an all-NULL column returns NULL rather than 0; guard \
                       with SELECT IF(ISNULL(SUM(col)), 0, SUM(col)).",
            case:     "SELECT SUM(COL) FROM tbl;",
            check:    sum_npe
        },
        Rule {
            code:     "FUN.007",
            severity: Severity::L1,
            summary:  "Triggers are not recommended",
            content:  "Triggers execute invisibly, leave no feedback or log, cannot be \
                       disabled temporarily, and complicate migration and recovery.",
            case:     "CREATE TRIGGER t1 AFTER INSERT ON work FOR EACH ROW INSERT INTO time \
                       VALUES(NOW());",
            check:    create_trigger
        },
        Rule {
            code:     "FUN.008",
            severity: Severity::L1,
            summary:  "Stored procedures are not recommended",
            content:  "Stored procedures have no version control and are hard to upgrade and \
                       migrate together with the business logic.",
            case:     "CREATE PROCEDURE simpleproc (OUT param1 INT);",
            check:    create_procedure
        },
        Rule {
            code:     "FUN.009",
            severity: Severity::L1,
            summary:  "Custom functions are not recommended",
            content:  "Custom functions carry the same operational problems as stored \
                       procedures.",
            case:     "CREATE FUNCTION hello (s CHAR(20));",
            check:    create_function
        },
    ]
}

static CONCAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|\|").expect("valid regex"));
static SYSDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsysdate\s*\(").expect("valid regex"));
static GUARDED_SUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(isnull|ifnull|coalesce)\s*\(\s*sum\b").expect("valid regex"));
static CREATE_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcreate\s+(definer\s*=\s*\S+\s+)?trigger\b").expect("valid regex")
});
static CREATE_PROCEDURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcreate\s+(definer\s*=\s*\S+\s+)?procedure\b").expect("valid regex")
});
static CREATE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcreate\s+(definer\s*=\s*\S+\s+)?function\b").expect("valid regex")
});

fn function_in_where(query: &ParsedQuery, _config: &Config) -> bool {
    !query.meta.where_funcs.is_empty()
}

fn count_star_where(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.count_star && query.meta.has_where
}

fn string_concat(query: &ParsedQuery, _config: &Config) -> bool {
    CONCAT.is_match(&query.text)
}

fn sysdate(query: &ParsedQuery, _config: &Config) -> bool {
    SYSDATE.is_match(&query.text)
}

fn count_col_or_const(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.count_col_or_const
}

fn sum_npe(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.sum_col && !GUARDED_SUM.is_match(&query.text)
}

fn create_trigger(query: &ParsedQuery, _config: &Config) -> bool {
    CREATE_TRIGGER.is_match(&query.text)
}

fn create_procedure(query: &ParsedQuery, _config: &Config) -> bool {
    CREATE_PROCEDURE.is_match(&query.text)
}

fn create_function(query: &ParsedQuery, _config: &Config) -> bool {
    CREATE_FUNCTION.is_match(&query.text)
}
