//! One-pass AST digestion.
//!
//! Rule bodies never walk the parse trees themselves: this module folds every
//! statement into a [`QueryMeta`] once, and rules read the digested facts
//! plus the raw text. Facts the AST does not expose in a stable shape
//! (storage engine clauses, hints, keyword abuse) are left to text-level
//! regexes in the rule bodies.

mod ddl;
mod expr;

use compact_str::CompactString;
use sqlparser::ast::{
    Distinct, GroupByExpr, Join, OrderByKind, Query, Select, SelectItem, SetExpr,
    SetOperator, SetQuantifier, Statement, TableFactor, TableWithJoins
};

use super::types::{InsertMeta, QueryMeta, StmtKind, TableRef};
use expr::{classify_key, collect_projection_expr, strip_quotes, walk_predicate};

pub(super) fn extract(statements: &[Statement]) -> QueryMeta {
    let mut meta = QueryMeta::default();
    for stmt in statements {
        extract_statement(stmt, &mut meta);
    }
    meta
}

fn extract_statement(stmt: &Statement, meta: &mut QueryMeta) {
    match stmt {
        Statement::Query(query) => {
            meta.stmt_kinds.push(StmtKind::Select);
            walk_query(query, meta, 0, true);
        }
        Statement::Insert(insert) => {
            meta.stmt_kinds.push(StmtKind::Insert);
            let mut ins = InsertMeta {
                has_columns: !insert.columns.is_empty(),
                on_dup_key: insert.on.is_some(),
                ..Default::default()
            };
            push_table_name(&insert.table.to_string(), meta);
            if let Some(source) = &insert.source {
                match source.body.as_ref() {
                    SetExpr::Values(values) => {
                        ins.row_count = values.rows.len();
                        for row in &values.rows {
                            for value in row {
                                walk_predicate(value, meta, 0, false);
                            }
                        }
                    }
                    _ => {
                        ins.from_select = true;
                        walk_query(source, meta, 0, false);
                    }
                }
            }
            meta.insert = Some(ins);
        }
        Statement::Update {
            table,
            assignments,
            selection,
            ..
        } => {
            meta.stmt_kinds.push(StmtKind::Update);
            walk_table_with_joins(table, meta, 0);
            if !table.joins.is_empty() {
                meta.multi_table_write = true;
            }
            for assignment in assignments {
                if expr::is_and_chain(&assignment.value) {
                    meta.update_set_and = true;
                }
            }
            match selection {
                Some(expr) => {
                    meta.has_where = true;
                    walk_predicate(expr, meta, 0, true);
                }
                None => meta.update_no_where = true
            }
        }
        Statement::Delete(delete) => {
            meta.stmt_kinds.push(StmtKind::Delete);
            if let sqlparser::ast::FromTable::WithFromKeyword(items)
            | sqlparser::ast::FromTable::WithoutKeyword(items) = &delete.from
            {
                for item in items {
                    walk_table_with_joins(item, meta, 0);
                    if !item.joins.is_empty() {
                        meta.multi_table_write = true;
                    }
                }
            }
            if !delete.tables.is_empty() {
                meta.multi_table_write = true;
            }
            match &delete.selection {
                Some(expr) => {
                    meta.has_where = true;
                    walk_predicate(expr, meta, 0, true);
                }
                None => meta.delete_no_where = true
            }
        }
        Statement::Truncate { table_names, .. } => {
            meta.stmt_kinds.push(StmtKind::Truncate);
            for target in table_names {
                push_table_name(&target.name.to_string(), meta);
            }
        }
        Statement::Drop { names, .. } => {
            meta.stmt_kinds.push(StmtKind::Drop);
            for name in names {
                push_table_name(&name.to_string(), meta);
            }
        }
        Statement::CreateTable(create) => {
            meta.stmt_kinds.push(StmtKind::CreateTable);
            ddl::extract_create_table(create, meta);
            if let Some(query) = &create.query {
                walk_query(query, meta, 0, false);
            }
        }
        Statement::CreateIndex(create_index) => {
            meta.stmt_kinds.push(StmtKind::CreateIndex);
            ddl::extract_create_index(create_index, meta);
        }
        Statement::CreateView { .. } => {
            meta.stmt_kinds.push(StmtKind::CreateView);
        }
        Statement::AlterTable { name, .. } => {
            meta.stmt_kinds.push(StmtKind::AlterTable);
            push_table_name(&name.to_string(), meta);
        }
        _ => meta.stmt_kinds.push(StmtKind::Other)
    }
}

pub(super) fn walk_query(query: &Query, meta: &mut QueryMeta, depth: usize, top: bool) {
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            walk_query(&cte.query, meta, depth, false);
        }
    }

    let (has_limit, has_offset) = limit_shape(query);
    if top {
        meta.has_limit |= has_limit;
        meta.has_offset |= has_offset;
    } else if depth > 0 && has_limit {
        meta.subquery_has_limit = true;
    }

    if let Some(order_by) = &query.order_by
        && let OrderByKind::Expressions(exprs) = &order_by.kind
    {
        if top {
            meta.has_order_by = true;
            for order_expr in exprs {
                let key = classify_key(&order_expr.expr, meta);
                meta.order_keys.push(key);
            }
        }
    }

    walk_set_expr(&query.body, meta, depth, top);

    // A UNION with an outer LIMIT whose branches carry none of their own
    // forces the full branch results into the temporary table.
    if top
        && has_limit
        && let SetExpr::SetOperation {
            op: SetOperator::Union,
            left,
            right,
            ..
        } = query.body.as_ref()
    {
        if branch_lacks_limit(left) || branch_lacks_limit(right) {
            meta.union_outer_limit_inner_missing = true;
        }
    }
}

fn branch_lacks_limit(branch: &SetExpr) -> bool {
    match branch {
        SetExpr::Query(q) => !limit_shape(q).0,
        SetExpr::Select(_) => true,
        SetExpr::SetOperation { left, right, .. } => {
            branch_lacks_limit(left) || branch_lacks_limit(right)
        }
        _ => false
    }
}

fn limit_shape(query: &Query) -> (bool, bool) {
    (query.limit.is_some(), query.offset.is_some())
}

fn walk_set_expr(set_expr: &SetExpr, meta: &mut QueryMeta, depth: usize, top: bool) {
    match set_expr {
        SetExpr::Select(select) => walk_select(select, meta, depth, top),
        SetExpr::Query(query) => walk_query(query, meta, depth, top),
        SetExpr::SetOperation {
            op,
            set_quantifier,
            left,
            right
        } => {
            if *op == SetOperator::Union {
                meta.has_union = true;
                if matches!(
                    set_quantifier,
                    SetQuantifier::All | SetQuantifier::AllByName
                ) {
                    meta.union_all = true;
                }
            }
            walk_set_expr(left, meta, depth, top);
            walk_set_expr(right, meta, depth, top);
        }
        _ => {}
    }
}

fn walk_select(select: &Select, meta: &mut QueryMeta, depth: usize, top: bool) {
    if select.distinct.is_some() {
        meta.has_distinct = true;
    }

    for item in &select.projection {
        match item {
            SelectItem::UnnamedExpr(expr) => {
                collect_projection_expr(expr, meta, depth, None);
            }
            SelectItem::ExprWithAlias { expr, alias } => {
                collect_projection_expr(expr, meta, depth, Some(alias.value.as_str()));
            }
            SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(_, _) => {
                meta.has_wildcard = true;
                if matches!(select.distinct, Some(Distinct::Distinct)) {
                    meta.distinct_star = true;
                }
            }
        }
    }

    for table in &select.from {
        walk_table_with_joins(table, meta, depth);
    }
    if select.from.len() > 1 {
        meta.comma_join_tables = meta.comma_join_tables.max(select.from.len());
    }

    match &select.selection {
        Some(expr) => {
            meta.has_where = true;
            walk_predicate(expr, meta, depth, true);
        }
        None if top && !select.from.is_empty() => meta.select_no_where = true,
        None => {}
    }

    if let GroupByExpr::Expressions(exprs, _) = &select.group_by
        && !exprs.is_empty()
    {
        meta.has_group_by = true;
        for expr in exprs {
            let key = classify_key(expr, meta);
            meta.group_keys.push(key);
        }
    }

    if let Some(having) = &select.having {
        meta.has_having = true;
        walk_predicate(having, meta, depth, false);
    }
}

fn walk_table_with_joins(table: &TableWithJoins, meta: &mut QueryMeta, depth: usize) {
    walk_table_factor(&table.relation, meta, depth);
    for join in &table.joins {
        walk_join(join, meta, depth);
    }
}

fn walk_join(join: &Join, meta: &mut QueryMeta, depth: usize) {
    meta.join_count += 1;
    meta.ansi_join = true;
    walk_table_factor(&join.relation, meta, depth);
}

fn walk_table_factor(factor: &TableFactor, meta: &mut QueryMeta, depth: usize) {
    match factor {
        TableFactor::Table { name, alias, .. } => {
            let full = name.to_string();
            let mut parts: Vec<CompactString> = full
                .split('.')
                .map(|p| CompactString::from(strip_quotes(p)))
                .collect();
            let table = parts.pop().unwrap_or_default();
            meta.tables.push(TableRef {
                db:    parts.pop(),
                name:  table,
                alias: alias
                    .as_ref()
                    .map(|a| CompactString::from(strip_quotes(&a.name.value)))
            });
        }
        TableFactor::Derived { subquery, .. } => {
            meta.subquery_depth = meta.subquery_depth.max(depth + 1);
            walk_query(subquery, meta, depth + 1, false);
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            walk_table_with_joins(table_with_joins, meta, depth);
        }
        _ => {}
    }
}

fn push_table_name(raw: &str, meta: &mut QueryMeta) {
    let mut parts: Vec<CompactString> = raw
        .split('.')
        .map(|p| CompactString::from(strip_quotes(p)))
        .collect();
    let table = parts.pop().unwrap_or_default();
    meta.tables.push(TableRef {
        db:    parts.pop(),
        name:  table,
        alias: None
    });
}
