//! COL — column rules. Mostly table-definition checks over the digested
//! CREATE TABLE metadata.

use super::types::{Rule, Severity};
use crate::{
    config::Config,
    query::{
        ParsedQuery,
        types::{ColumnMeta, StmtKind}
    }
};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule {
            code:     "COL.001",
            severity: Severity::L1,
            summary:  "SELECT * type queries are not recommended",
            content:  "Selecting every column with the * wildcard changes the query's meaning \
                       and behavior whenever the table structure changes, and can return more \
                       data than needed.",
            case:     "select * from tbl where id=1",
            check:    select_star
        },
        Rule {
            code:     "COL.002",
            severity: Severity::L2,
            summary:  "INSERT/REPLACE without an explicit column list",
            content:  "When the table structure changes, an INSERT or REPLACE without column \
                       names stops doing what was expected; write INSERT INTO tbl(col1, col2) \
                       VALUES ... instead.",
            case:     "insert into tbl values(1,'name')",
            check:    insert_without_columns
        },
        Rule {
            code:     "COL.003",
            severity: Severity::L2,
            summary:  "Make the auto-increment ID unsigned",
            content:  "A signed auto-increment column wastes half of its range.",
            case:     "create table test(`id` int(11) NOT NULL AUTO_INCREMENT)",
            check:    auto_inc_signed
        },
        Rule {
            code:     "COL.004",
            severity: Severity::L1,
            summary:  "Add a default value to the column",
            content:  "Columns without a default value block online table changes once the \
                       table grows; for ALTER operations, restate the original defaults.",
            case:     "CREATE TABLE tbl (col int) ENGINE=InnoDB;",
            check:    missing_default
        },
        Rule {
            code:     "COL.005",
            severity: Severity::L1,
            summary:  "Column without a comment",
            content:  "Commenting every column makes the meaning of the table clear to \
                       future maintainers.",
            case:     "CREATE TABLE tbl (col int) ENGINE=InnoDB;",
            check:    missing_comment
        },
        Rule {
            code:     "COL.006",
            severity: Severity::L3,
            summary:  "Table contains too many columns",
            content:  "A very wide table is a symptom of a design that stores unrelated \
                       attributes together; consider splitting it.",
            case:     "CREATE TABLE tbl ( cols ....);",
            check:    too_many_cols
        },
        Rule {
            code:     "COL.007",
            severity: Severity::L3,
            summary:  "Table contains too many text/blob columns",
            content:  "The table holds more text/blob columns than the configured maximum.",
            case:     "CREATE TABLE tbl ( cols ....);",
            check:    too_many_text_cols
        },
        Rule {
            code:     "COL.008",
            severity: Severity::L1,
            summary:  "Prefer VARCHAR to CHAR, VARBINARY to BINARY",
            content:  "Variable-length columns save storage and search faster within a \
                       smaller field.",
            case:     "create table t1(id int,name char(20),last_time date)",
            check:    char_over_varchar
        },
        Rule {
            code:     "COL.009",
            severity: Severity::L2,
            summary:  "Use exact numeric data types",
            content:  "FLOAT, REAL and DOUBLE PRECISION accumulate rounding errors in \
                       aggregation; use NUMERIC or DECIMAL for fixed-precision storage.",
            case:     "CREATE TABLE tab2 (p_id BIGINT UNSIGNED NOT NULL, hours float not \
                       null)",
            check:    imprecise_type
        },
        Rule {
            code:     "COL.010",
            severity: Severity::L2,
            summary:  "ENUM/BIT/SET data types are not recommended",
            content:  "ENUM stores ordinals, sorts by definition order rather than value, and \
                       cannot be extended without redefining the column; a reference table \
                       with a foreign key constrains values better.",
            case:     "create table tab1(status ENUM('new','in progress','fixed'))",
            check:    enum_bit_set
        },
        Rule {
            code:     "COL.011",
            severity: Severity::L0,
            summary:  "Use NULL for missing values only, NOT NULL everywhere else",
            content:  "NULL is not 0, not the empty string and not FALSE; mixing NULL checks \
                       with comparisons on the same column is a common source of three-valued \
                       logic surprises.",
            case:     "select c1,c2,c3 from tbl where c4 is null or c4 <> 1",
            check:    null_usage
        },
        Rule {
            code:     "COL.012",
            severity: Severity::L5,
            summary:  "TEXT, BLOB and JSON columns should not be NOT NULL",
            content:  "These types cannot carry a non-NULL default, so writes that omit the \
                       column fail under a NOT NULL constraint.",
            case:     "CREATE TABLE `tb`(`c` longblob NOT NULL);",
            check:    blob_not_null
        },
        Rule {
            code:     "COL.013",
            severity: Severity::L4,
            summary:  "TIMESTAMP column default value check failed",
            content:  "Give TIMESTAMP columns an explicit default, and never 0 or \
                       '0000-00-00 00:00:00'.",
            case:     "CREATE TABLE tbl( `id` bigint not null, `create_time` timestamp);",
            check:    timestamp_default
        },
        Rule {
            code:     "COL.014",
            severity: Severity::L5,
            summary:  "Column-level character set specified",
            content:  "Keep column and table character sets identical instead of specifying \
                       per-column charsets.",
            case:     "CREATE TABLE `tb2` ( `col` char(10) CHARACTER SET utf8 DEFAULT NULL)",
            check:    column_charset
        },
        Rule {
            code:     "COL.015",
            severity: Severity::L4,
            summary:  "TEXT, BLOB and JSON columns cannot take a non-NULL default",
            content:  "MySQL rejects non-NULL defaults on TEXT, BLOB and JSON columns.",
            case:     "CREATE TABLE `tbl` (`c` blob DEFAULT NULL);",
            check:    blob_default
        },
        Rule {
            code:     "COL.016",
            severity: Severity::L1,
            summary:  "Use INT(10) or BIGINT(20) for integer definitions",
            content:  "The display width in INT(M) does not change storage; recent MySQL \
                       versions deprecate setting it at all.",
            case:     "CREATE TABLE tab (a INT(1));",
            check:    int_display_width
        },
        Rule {
            code:     "COL.017",
            severity: Severity::L2,
            summary:  "VARCHAR definition is too long",
            content:  "Past the configured maximum, move the value to a TEXT column in a \
                       separate table keyed by the primary key, so the other columns' indexes \
                       stay efficient.",
            case:     "CREATE TABLE tab (a varchar(3500));",
            check:    varchar_too_long
        },
        Rule {
            code:     "COL.018",
            severity: Severity::L9,
            summary:  "Table definition uses a disallowed field type",
            content:  "The column type is on the configured deny list.",
            case:     "CREATE TABLE tab (a BOOLEAN);",
            check:    disallowed_type
        },
        Rule {
            code:     "COL.019",
            severity: Severity::L1,
            summary:  "Sub-second time precision is not recommended",
            content:  "High-precision time types cost storage and need MySQL 5.6.4 or later; \
                       mind version compatibility.",
            case:     "CREATE TABLE t1 (t TIME(3), dt DATETIME(6));",
            check:    time_precision
        },
    ]
}

fn columns(query: &ParsedQuery) -> impl Iterator<Item = &ColumnMeta> {
    query.meta.creates.iter().flat_map(|c| c.columns.iter())
}

fn is_blob_text_json(column: &ColumnMeta) -> bool {
    let t = column.type_text.as_str();
    t.contains("text") || t.contains("blob") || t.starts_with("json")
}

fn select_star(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.has_wildcard
        && query
            .meta
            .stmt_kinds
            .iter()
            .any(|k| matches!(k, StmtKind::Select | StmtKind::Insert))
}

fn insert_without_columns(query: &ParsedQuery, _config: &Config) -> bool {
    query
        .meta
        .insert
        .as_ref()
        .is_some_and(|i| !i.has_columns)
}

fn auto_inc_signed(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        c.def_text.contains("auto_increment") && !c.type_text.contains("unsigned")
    })
}

fn missing_default(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        !c.def_text.contains("default")
            && !c.def_text.contains("auto_increment")
            && !is_blob_text_json(c)
    })
}

fn missing_comment(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| !c.def_text.contains("comment"))
}

fn too_many_cols(query: &ParsedQuery, config: &Config) -> bool {
    query
        .meta
        .creates
        .iter()
        .any(|c| c.columns.len() > config.max_col_count)
}

fn too_many_text_cols(query: &ParsedQuery, config: &Config) -> bool {
    query.meta.creates.iter().any(|c| {
        c.columns.iter().filter(|col| is_blob_text_json(col)).count() > config.max_text_cols_count
    })
}

fn char_over_varchar(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        c.type_text.starts_with("char") || c.type_text.starts_with("binary")
    })
}

fn imprecise_type(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        c.type_text.starts_with("float")
            || c.type_text.starts_with("double")
            || c.type_text.starts_with("real")
    })
}

fn enum_bit_set(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        c.type_text.starts_with("enum")
            || c.type_text.starts_with("set(")
            || c.type_text.starts_with("bit")
    })
}

fn null_usage(query: &ParsedQuery, _config: &Config) -> bool {
    query.meta.where_null_or_cmp
}

fn blob_not_null(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| is_blob_text_json(c) && c.def_text.contains("not null"))
}

fn timestamp_default(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        c.type_text.starts_with("timestamp")
            && (!c.def_text.contains("default")
                || c.def_text.contains("default 0")
                || c.def_text.contains("default '0000-00-00"))
    })
}

fn column_charset(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| c.def_text.contains("character set"))
}

fn blob_default(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        is_blob_text_json(c)
            && c.def_text.contains("default")
            && !c.def_text.contains("default null")
    })
}

fn int_display_width(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        (c.type_text.starts_with("int(") && c.type_len != Some(10))
            || (c.type_text.starts_with("bigint(") && c.type_len != Some(20))
    })
}

fn varchar_too_long(query: &ParsedQuery, config: &Config) -> bool {
    columns(query).any(|c| {
        (c.type_text.starts_with("varchar") || c.type_text.starts_with("varbinary"))
            && c.type_len.is_some_and(|len| len > config.max_varchar_length)
    })
}

fn disallowed_type(query: &ParsedQuery, config: &Config) -> bool {
    columns(query).any(|c| {
        let base = c.type_text.split('(').next().unwrap_or_default().trim();
        config
            .column_not_allow_type
            .iter()
            .any(|t| base.eq_ignore_ascii_case(t))
    })
}

fn time_precision(query: &ParsedQuery, _config: &Config) -> bool {
    columns(query).any(|c| {
        (c.type_text.starts_with("time")
            || c.type_text.starts_with("datetime")
            || c.type_text.starts_with("timestamp"))
            && c.type_len.is_some_and(|len| len > 0)
    })
}
