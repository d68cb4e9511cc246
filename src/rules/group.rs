//! GRP — grouping rules. The single code here is produced by the index
//! advisor; the catalog entry only reserves its metadata.

use super::types::{Rule, Severity};

pub(super) fn rules() -> Vec<Rule> {
    vec![Rule {
        code:     "GRP.001",
        severity: Severity::L2,
        summary:  "GROUP BY over an equality-filtered column is pointless",
        content:  "A column pinned to a single value by the WHERE clause contributes nothing \
                   to the grouping.",
        case:     "select film_id, title from film where release_year='2006' group by \
                   release_year",
        check:    super::reserved
    }]
}
