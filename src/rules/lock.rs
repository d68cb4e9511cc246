//! LCK — locking rules.

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "LCK.001",
            severity: Severity::L3,
            summary:  "INSERT INTO ... SELECT locks with a wide granularity",
            content:  "INSERT INTO xx SELECT holds locks on the source table for the whole \
                       copy; run it with care.",
            case:     "INSERT INTO tbl SELECT * FROM tbl2;",
            check:    insert_select
        },
        Rule {
            code:     "LCK.002",
            severity: Severity::L3,
            summary:  "Use INSERT ON DUPLICATE KEY UPDATE with caution",
            content:  "With an auto-increment primary key, ON DUPLICATE KEY UPDATE burns \
                       ids on every conflict; the key can overflow fast and replicas can \
                       diverge.",
            case:     "INSERT INTO t1(a,b,c) VALUES (1,2,3) ON DUPLICATE KEY UPDATE c=c+1;",
            check:    insert_on_dup
        },
    ]
}

fn insert_select(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.insert.as_ref().is_some_and(|i| i.from_select)
}

fn insert_on_dup(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.insert.as_ref().is_some_and(|i| i.on_dup_key)
}
