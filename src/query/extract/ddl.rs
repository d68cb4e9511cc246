//! CREATE TABLE / CREATE INDEX digestion.
//!
//! Column options and table constraints are matched against their `Display`
//! rendering rather than the AST variants: the rendering round-trips what was
//! parsed and is stable across parser releases, while the option enums are
//! not.

use std::sync::LazyLock;

use compact_str::CompactString;
use regex::Regex;
use sqlparser::ast::{CreateIndex, CreateTable};

use super::super::types::{ColumnMeta, CreateTableMeta, KeyMeta, QueryMeta};
use super::expr::strip_quotes;

static TYPE_LEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d+)").expect("valid regex"));
static KEY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:CONSTRAINT|KEY|INDEX)\s+[`"]?([A-Za-z0-9_]+)[`"]?"#).expect("valid regex")
});
static KEY_COLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid regex"));
static REFERENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)REFERENCES\s+[`"]?([A-Za-z0-9_.]+)[`"]?"#).expect("valid regex")
});

pub(super) fn extract_create_table(create: &CreateTable, meta: &mut QueryMeta) {
    let full = create.name.to_string();
    let mut parts: Vec<CompactString> = full
        .split('.')
        .map(|p| CompactString::from(strip_quotes(p)))
        .collect();
    let name = parts.pop().unwrap_or_default();

    let mut table = CreateTableMeta {
        name,
        db: parts.pop(),
        temporary: create.temporary,
        ..Default::default()
    };

    for column in &create.columns {
        let def_text = CompactString::from(column.to_string().to_lowercase());
        let type_text = CompactString::from(column.data_type.to_string().to_lowercase());
        let type_len = TYPE_LEN
            .captures(&type_text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());
        let col = ColumnMeta {
            name: CompactString::from(strip_quotes(&column.name.value)),
            type_text,
            def_text,
            type_len
        };
        if col.def_text.contains("primary key") {
            table.has_pk = true;
            table.pk_cols.push(col.name.clone());
        } else if col.def_text.contains("unique") {
            table.has_unique = true;
        }
        table.columns.push(col);
    }

    for constraint in &create.constraints {
        let text = constraint.to_string();
        let upper = text.to_uppercase();
        let col_count = KEY_COLS
            .captures(&text)
            .map(|c| c[1].split(',').count())
            .unwrap_or(0);
        let name = KEY_NAME
            .captures(&text)
            .map(|c| CompactString::from(c[1].to_lowercase()))
            .unwrap_or_default();

        if upper.contains("FOREIGN KEY") {
            if let Some(captures) = REFERENCES.captures(&text) {
                let referenced = captures[1]
                    .rsplit('.')
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
                if referenced == table.name.to_lowercase() {
                    table.fk_self_ref = true;
                }
            }
            continue;
        }

        let key = KeyMeta {
            name,
            unique: upper.contains("UNIQUE"),
            primary: upper.starts_with("PRIMARY KEY"),
            fulltext: upper.starts_with("FULLTEXT") || upper.starts_with("SPATIAL"),
            col_count
        };
        if key.primary {
            table.has_pk = true;
            if let Some(captures) = KEY_COLS.captures(&text) {
                for col in captures[1].split(',') {
                    table.pk_cols.push(CompactString::from(strip_quotes(col)));
                }
            }
        }
        if key.unique {
            table.has_unique = true;
        }
        table.keys.push(key);
    }

    meta.creates.push(table);
}

pub(super) fn extract_create_index(create_index: &CreateIndex, meta: &mut QueryMeta) {
    meta.indexes.push(KeyMeta {
        name:      create_index
            .name
            .as_ref()
            .map(|n| CompactString::from(strip_quotes(&n.to_string()).to_lowercase()))
            .unwrap_or_default(),
        unique:    create_index.unique,
        primary:   false,
        fulltext:  false,
        col_count: create_index.columns.len()
    });
}
