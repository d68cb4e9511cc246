//! TBL — table definition rules.

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
            code:     "TBL.001",
            severity: Severity::L4,
            summary:  "Partitioned tables are not recommended",
            content:  "Partitioned tables complicate maintenance and rarely deliver the \
                       expected gains; prefer explicit sharding.",
            case:     "CREATE TABLE trb3(id INT, purchased DATE) PARTITION BY \
                       RANGE(YEAR(purchased)) (PARTITION p0 VALUES LESS THAN (1990));",
            check:    partitioned
        },
        Rule {
            code:     "TBL.002",
            severity: Severity::L4,
            summary:  "Select a suitable storage engine for the table",
            content:  "Declare one of the recommended storage engines when creating or \
                       altering a table.",
            case:     "create table test(`id` int(11) NOT NULL AUTO_INCREMENT)",
            check:    engine_allowed
        },
        Rule {
            code:     "TBL.003",
            severity: Severity::L8,
            summary:  "A table named DUAL has special meaning",
            content:  "DUAL is a virtual table usable without creation; do not name a real \
                       table after it.",
            case:     "create table dual(id int, primary key (id));",
            check:    dual_table
        },
        Rule {
            code:     "TBL.004",
            severity: Severity::L2,
            summary:  "The table's initial AUTO_INCREMENT value is not 0",
            content:  "A non-zero initial AUTO_INCREMENT leaves a hole in the data.",
            case:     "CREATE TABLE tbl (a int) AUTO_INCREMENT = 10;",
            check:    auto_increment_init
        },
        Rule {
            code:     "TBL.005",
            severity: Severity::L4,
            summary:  "Use a recommended character set",
            content:  "The table character set must be one of the configured allow-list.",
            case:     "CREATE TABLE tbl (a int) DEFAULT CHARSET = latin1;",
            check:    charset_allowed
        },
        Rule {
            code:     "TBL.006",
            severity: Severity::L1,
            summary:  "Views are not recommended",
            content:  "Views hide query cost and complicate schema evolution.",
            case:     "create view v_today (today) AS SELECT CURRENT_DATE;",
            check:    create_view
        },
        Rule {
            code:     "TBL.007",
            severity: Severity::L1,
            summary:  "Temporary tables are not recommended",
            content:  "Temporary tables vanish with the session and complicate debugging and \
                       replication.",
            case:     "CREATE TEMPORARY TABLE `work` (`time` time DEFAULT NULL) \
                       ENGINE=InnoDB;",
            check:    temporary_table
        },
        Rule {
            code:     "TBL.008",
            severity: Severity::L4,
            summary:  "Use a recommended COLLATE",
            content:  "The table collation must be one of the configured allow-list.",
            case:     "CREATE TABLE tbl (a int) DEFAULT COLLATE = latin1_bin;",
            check:    collate_allowed
        },
    ]
}

static PARTITION_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpartition\s+by\b").expect("valid regex"));
static ENGINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bengine\s*=?\s*([A-Za-z0-9_]+)").expect("valid regex"));
static AUTO_INC_INIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bauto_increment\s*=\s*(\d+)").expect("valid regex"));
static CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:charset|character\s+set)\s*=?\s*([A-Za-z0-9_]+)").expect("valid regex")
});
static COLLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcollate\s*=?\s*([A-Za-z0-9_]+)").expect("valid regex"));
static CREATE_VIEW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcreate\s+(or\s+replace\s+)?(algorithm\s*=\s*\S+\s+)?view\b")
        .expect("valid regex")
});
static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*create\s+(temporary\s+)?table\b").expect("valid regex")
});

fn has_create(query: &ParsedQuery) -> bool {
    !query.meta.creates.is_empty() || CREATE_TABLE.is_match(&query.text)
}

fn partitioned(query: &ParsedQuery, _config: &Config) -> bool {
    has_create(query) && PARTITION_BY.is_match(&query.text)
}

fn engine_allowed(query: &ParsedQuery, config: &Config) -> bool {
    if !has_create(query) {
        return false;
    }
    match ENGINE.captures(&query.text) {
        Some(captures) => !config
            .allow_engines
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&captures[1])),
        None => true
    }
}

fn dual_table(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .creates
        .iter()
        .any(|c| c.name.eq_ignore_ascii_case("dual"))
}

fn auto_increment_init(query: &ParsedQuery, _config: &Config) -> bool {
    has_create(query)
        && AUTO_INC_INIT
            .captures(&query.text)
            .and_then(|c| c[1].parse::<u64>().ok())
            .is_some_and(|n| n != 0)
}

fn charset_allowed(query: &ParsedQuery, config: &Config) -> bool {
    has_create(query)
        && CHARSET.captures(&query.text).is_some_and(|captures| {
            !config
                .allow_charsets
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&captures[1]))
        })
}

fn create_view(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .stmt_kinds
        .iter()
        .any(|k| *k == StmtKind::CreateView)
        || CREATE_VIEW.is_match(&query.text)
}

fn temporary_table(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.creates.iter().any(|c| c.temporary)
}

fn collate_allowed(query: &ParsedQuery, config: &Config) -> bool {
    has_create(query)
        && COLLATE.captures(&query.text).is_some_and(|captures| {
            !config
                .allow_collates
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&captures[1]))
        })
}
