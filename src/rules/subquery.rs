//! SUB — subquery and set-operation rules.

use super::types::{Rule, Severity};
use crate::{config::Config, query::ParsedQuery};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "SUB.001",
            severity: Severity::L4,
            summary:  "MySQL optimizes subqueries poorly",
            content:  "MySQL runs the subquery as a dependent subquery for every row of the \
                       outer query, a common cause of serious performance problems; rewrite \
                       as JOIN or LEFT OUTER JOIN on 5.5 and earlier.",
            case:     "select col1,col2,col3 from table1 where col2 in(select col from \
                       table2)",
            check:    in_subquery
        },
        Rule {
            code:     "SUB.002",
            severity: Severity::L2,
            summary:  "Prefer UNION ALL when duplicates do not matter",
            content:  "UNION removes duplicates at the cost of a sort; UNION ALL skips it.",
            case:     "select teacher_id as id from t1 union select student_id as id from t2",
            check:    union_without_all
        },
        Rule {
            code:     "SUB.003",
            severity: Severity::L3,
            summary:  "Consider EXISTS instead of a DISTINCT join",
            content:  "DISTINCT deduplicates after sorting the joined tuples; an EXISTS \
                       subquery avoids materializing the whole join.",
            case:     "SELECT DISTINCT c.c_id, c.c_name FROM c,e WHERE e.c_id = c.c_id",
            check:    distinct_join
        },
        Rule {
            code:     "SUB.004",
            severity: Severity::L3,
            summary:  "Subquery nesting is too deep",
            content:  "Deeply nested dependent subqueries execute per outer row and resist \
                       optimization.",
            case:     "SELECT * from tb where id in (select id from (select id from tb))",
            check:    subquery_depth
        },
        Rule {
            code:     "SUB.005",
            severity: Severity::L8,
            summary:  "Subqueries do not support LIMIT",
            content:  "MySQL does not support 'LIMIT & IN/ALL/ANY/SOME' inside a subquery.",
            case:     "SELECT * FROM staff WHERE name IN (SELECT NAME FROM customer ORDER BY \
                       name LIMIT 1)",
            check:    subquery_limit
        },
        Rule {
            code:     "SUB.006",
            severity: Severity::L2,
            summary:  "Avoid functions inside subqueries",
            content:  "A function inside a dependent subquery blocks semi-join optimization; \
                       rewrite as an OUTER JOIN and filter through join conditions.",
            case:     "SELECT * FROM staff WHERE name IN (SELECT max(NAME) FROM customer)",
            check:    subquery_function
        },
        Rule {
            code:     "SUB.007",
            severity: Severity::L2,
            summary:  "UNION branches should repeat the outer LIMIT",
            content:  "MySQL cannot always push an outer LIMIT into UNION branches; adding \
                       the same LIMIT inside each branch shrinks the temporary table.",
            case:     "(SELECT * FROM tb1 ORDER BY name LIMIT 20) UNION ALL (SELECT * FROM \
                       tb2 ORDER BY name LIMIT 20) LIMIT 20;",
            check:    union_limit
        },
    ]
}

fn in_subquery(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.in_subquery
}

fn union_without_all(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.has_union && !query.meta.union_all
}

fn distinct_join(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.has_distinct && query.meta.tables.len() >= 2
}

fn subquery_depth(query: &ParsedQuery, config: &Config) -> bool {
    query.meta.subquery_depth > config.max_subquery_depth
}

fn subquery_limit(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.subquery_has_limit
}

fn subquery_function(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.subquery_has_func
}

fn union_limit(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.union_outer_limit_inner_missing
}
