//! KEY — index and key rules over the digested DDL metadata.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Rule, Severity};
use crate::{
    config::Config,
    query::{
        ParsedQuery,
        types::{CreateTableMeta, KeyMeta}
    }
};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "KEY.001",
            severity: Severity::L2,
            summary:  "Use an auto-increment column as the primary key",
            content:  "Prefer an auto-increment primary key; in a composite primary key put \
                       the auto-increment column first.",
            case:     "create table test(`id` int(11) NOT NULL PRIMARY KEY (`id`))",
            check:    pk_not_auto_inc
        },
        Rule {
            code:     "KEY.002",
            severity: Severity::L4,
            summary:  "No primary or unique key; online schema change is impossible",
            content:  "Online schema-change tooling requires a primary or unique key on the \
                       table.",
            case:     "create table test(col varchar(5000))",
            check:    no_pk_or_uk
        },
        Rule {
            code:     "KEY.003",
            severity: Severity::L4,
            summary:  "Avoid recursive relationships such as self-referencing foreign keys",
            content:  "A foreign key into the same table turns every tree level into another \
                       join; a closure table models the hierarchy without recursive queries.",
            case:     "CREATE TABLE tab2 (p_id BIGINT NOT NULL, a_id BIGINT NOT NULL, \
                       FOREIGN KEY (p_id) REFERENCES tab2(p_id))",
            check:    recursive_fk
        },
        Rule {
            code:     "KEY.004",
            severity: Severity::L0,
            summary:  "Reminder: align the composite index column order with the queries",
            content:  "A composite index only helps when the query's attribute order matches \
                       the index attribute order.",
            case:     "create index idx1 on tbl (last_name,first_name)",
            check:    composite_index
        },
        Rule {
            code:     "KEY.005",
            severity: Severity::L2,
            summary:  "Too many indexes on the table",
            content:  "Each extra index slows every write; the table carries more indexes \
                       than the configured maximum.",
            case:     "CREATE TABLE tbl (a int, b int, KEY idx_a (`a`), KEY idx_b (`b`));",
            check:    too_many_indexes
        },
        Rule {
            code:     "KEY.006",
            severity: Severity::L4,
            summary:  "Too many columns in the primary key",
            content:  "A wide primary key bloats every secondary index that references it.",
            case:     "CREATE TABLE tbl (a int, b int, c int, PRIMARY KEY(`a`,`b`,`c`));",
            check:    too_many_pk_parts
        },
        Rule {
            code:     "KEY.007",
            severity: Severity::L4,
            summary:  "Primary key missing or not int/bigint",
            content:  "Give the table a primary key, preferably int unsigned or bigint \
                       unsigned.",
            case:     "CREATE TABLE tbl (a int);",
            check:    pk_not_int
        },
        Rule {
            code:     "KEY.008",
            severity: Severity::L4,
            summary:  "ORDER BY with mixed sort directions may not use the index",
            content:  "Before MySQL 8.0, an index cannot serve an ORDER BY whose columns sort \
                       in different directions.",
            case:     "SELECT * FROM tbl ORDER BY a DESC, b ASC;",
            check:    mixed_order_direction
        },
        Rule {
            code:     "KEY.009",
            severity: Severity::L0,
            summary:  "Check data uniqueness before adding a unique index",
            content:  "If the column data is not unique, online restructuring tools may drop \
                       duplicate rows while building the index, losing data.",
            case:     "CREATE UNIQUE INDEX part_of_name ON customer (name(10));",
            check:    unique_index_added
        },
        Rule {
            code:     "KEY.010",
            severity: Severity::L0,
            summary:  "A fulltext index is not a silver bullet",
            content:  "Fulltext indexes help fuzzy search but need query frequency control \
                       and tuning of ft_min_word_len, ft_max_word_len and ngram_token_size.",
            case:     "CREATE TABLE `tb` (`ip` varchar(255) NOT NULL, FULLTEXT KEY `ip` \
                       (`ip`)) ENGINE=InnoDB;",
            check:    fulltext_index
        },
    ]
}

fn creates(query: &ParsedQuery) -> impl Iterator<Item = &CreateTableMeta> {
    query.meta.creates.iter()
}

fn table_keys(query: &ParsedQuery) -> impl Iterator<Item = &KeyMeta> {
    creates(query)
        .flat_map(|c| c.keys.iter())
        .chain(query.meta.indexes.iter())
}

fn pk_not_auto_inc(query: &ParsedQuery, _config: &Config) -> bool {
    creates(query).any(|table| {
        if !table.has_pk {
            return false;
        }
        let Some(first) = table.pk_cols.first() else {
            return false;
        };
        table
            .columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(first))
            .is_some_and(|c| !c.def_text.contains("auto_increment"))
    })
}

fn no_pk_or_uk(query: &ParsedQuery, _config: &Config) -> bool {
    creates(query).any(|table| !table.has_pk && !table.has_unique)
}

fn recursive_fk(query: &ParsedQuery, _config: &Config) -> bool {
    creates(query).any(|table| table.fk_self_ref)
}

fn composite_index(query: &ParsedQuery, _config: &Config) -> bool {
    table_keys(query).any(|key| !key.primary && key.col_count >= 2)
}

fn too_many_indexes(query: &ParsedQuery, config: &Config) -> bool {
    creates(query)
        .any(|table| table.keys.iter().filter(|k| !k.primary).count() > config.max_idx_count)
        || query.meta.indexes.len() > config.max_idx_count
}

fn too_many_pk_parts(query: &ParsedQuery, config: &Config) -> bool {
    creates(query).any(|table| table.pk_cols.len() > config.max_primary_key_parts)
}

fn pk_not_int(query: &ParsedQuery, _config: &Config) -> bool {
    creates(query).any(|table| {
        if !table.has_pk {
            return true;
        }
        table.pk_cols.iter().any(|pk| {
            table
                .columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(pk))
                .is_some_and(|c| {
                    !(c.type_text.starts_with("int") || c.type_text.starts_with("bigint"))
                })
        })
    })
}

static ORDER_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\border\s+by\b").expect("valid regex"));
static DESC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bdesc\b").expect("valid regex"));
static ASC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\basc\b").expect("valid regex"));
static ADD_UNIQUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\badd\s+unique\b").expect("valid regex"));
static FULLTEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfulltext\b").expect("valid regex"));

fn mixed_order_direction(query: &ParsedQuery, _config: &Config) -> bool {
    match ORDER_BY.find(&query.text) {
        Some(found) => {
            let tail = &query.text[found.end()..];
            DESC.is_match(tail) && ASC.is_match(tail)
        }
        None => false
    }
}

fn unique_index_added(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.indexes.iter().any(|k| k.unique) || ADD_UNIQUE.is_match(&query.text)
}

fn fulltext_index(query: &ParsedQuery, _config: &Config) -> bool {
    table_keys(query).any(|k| k.fulltext) || FULLTEXT.is_match(&query.text)
}
