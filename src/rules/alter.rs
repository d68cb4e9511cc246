//! ALT — ALTER TABLE rules.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery, query::types::StmtKind};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "ALT.001",
            severity: Severity::L4,
            summary:  "Changing the table default character set does not convert existing \
                       columns",
            content:  "ALTER TABLE tbl [DEFAULT] CHARACTER SET 'utf8' only affects columns \
                       added later. To convert every column use ALTER TABLE tbl CONVERT TO \
                       CHARACTER SET charset_name.",
            case:     "ALTER TABLE tbl_name CONVERT TO CHARACTER SET charset_name;",
            check:    alter_charset
        },
        Rule {
            code:     "ALT.002",
            severity: Severity::L2,
            summary:  "Merge multiple ALTER requests for the same table into one",
            content:  "Every table structure change impacts the online service; merge ALTER \
                       requests to reduce the number of operations.",
            case:     "ALTER TABLE tbl ADD COLUMN col int, ADD INDEX idx_col (`col`);",
            check:    super::reserved
        },
        Rule {
            code:     "ALT.003",
            severity: Severity::L0,
            summary:  "Dropping a column is high risk; check business dependencies first",
            content:  "If business logic still depends on the column, dropping it can break \
                       writes and lose the data requested to be written even after a rollback \
                       from backup.",
            case:     "ALTER TABLE tbl DROP COLUMN col;",
            check:    alter_drop_column
        },
        Rule {
            code:     "ALT.004",
            severity: Severity::L0,
            summary:  "Dropping a primary or foreign key is high risk; confirm with a DBA \
                       first",
            content:  "Primary and foreign keys are core constraints of a relational schema; \
                       dropping an existing one can break business logic.",
            case:     "ALTER TABLE tbl DROP PRIMARY KEY;",
            check:    alter_drop_key
        },
    ]
}

fn is_alter(query: &ParsedQuery) -> bool {
    query
        .meta
        .stmt_kinds
        .iter()
        .any(|k| *k == StmtKind::AlterTable)
        || query
            .text
            .trim_start()
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("alter"))
}

static CHARSET_CHANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(convert\s+to\s+character\s+set|(default\s+)?character\s+set\s*=?\s*\w)")
        .expect("valid regex")
});
static DROP_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdrop\s+(column\s+)?[`]?([A-Za-z_]\w*)").expect("valid regex")
});
static DROP_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdrop\s+(primary\s+key|foreign\s+key)").expect("valid regex"));

fn alter_charset(query: &ParsedQuery, _config: &Config) -> bool {
    is_alter(query) && CHARSET_CHANGE.is_match(&query.text)
}

fn alter_drop_column(query: &ParsedQuery, _config: &Config) -> bool {
    if !is_alter(query) {
        return false;
    }
    if let Some(captures) = DROP_COLUMN.captures(&query.text) {
        if captures.get(1).is_some() {
            return true;
        }
        let word = captures[2].to_lowercase();
        return !matches!(
            word.as_str(),
            "primary" | "foreign" | "index" | "key" | "constraint" | "partition" | "check"
        );
    }
    false
}

fn alter_drop_key(query: &ParsedQuery, _config: &Config) -> bool {
    is_alter(query) && DROP_KEY.is_match(&query.text)
}
