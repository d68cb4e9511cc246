//! Expression-level walking: predicates, projection items, sort keys.

use compact_str::CompactString;
use sqlparser::ast::{
    BinaryOperator, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, Value, ValueWithSpan
};

use super::super::types::{InListMeta, KeyKind, QueryMeta, SortKey};
use super::walk_query;

const AGGREGATES: &[&str] = &["count", "sum", "min", "max", "avg", "group_concat"];

/// Strip backtick / quote delimiters from an identifier part.
pub(super) fn strip_quotes(part: &str) -> &str {
    part.trim().trim_matches(|c| c == '`' || c == '"' || c == '\'')
}

fn ident_name(expr: &Expr) -> Option<CompactString> {
    match expr {
        Expr::Identifier(ident) => Some(CompactString::from(strip_quotes(&ident.value))),
        Expr::CompoundIdentifier(parts) => parts
            .last()
            .map(|ident| CompactString::from(strip_quotes(&ident.value))),
        _ => None
    }
}

fn literal_value(expr: &Expr) -> Option<&Value> {
    match expr {
        Expr::Value(ValueWithSpan { value, .. }) => Some(value),
        _ => None
    }
}

fn is_null_value(expr: &Expr) -> bool {
    matches!(literal_value(expr), Some(Value::Null))
}

fn is_comparison(op: &BinaryOperator) -> bool {
    matches!(
        op,
        BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
    )
}

/// Whether the top level of an expression is an AND chain; an assignment
/// value of this shape almost always means a comma was meant instead.
pub(super) fn is_and_chain(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::BinaryOp {
            op: BinaryOperator::And,
            ..
        }
    )
}

/// Statically evaluate a comparison of two literals. `None` when either
/// side is not a literal or the values are not comparable.
fn eval_literal_cmp(left: &Expr, op: &BinaryOperator, right: &Expr) -> Option<bool> {
    let l = literal_value(left)?;
    let r = literal_value(right)?;
    let ordering = match (l, r) {
        (Value::Number(a, _), Value::Number(b, _)) => {
            let a: f64 = a.parse().ok()?;
            let b: f64 = b.parse().ok()?;
            a.partial_cmp(&b)?
        }
        (Value::SingleQuotedString(a), Value::SingleQuotedString(b))
        | (Value::DoubleQuotedString(a), Value::DoubleQuotedString(b)) => a.cmp(b),
        _ => return None
    };
    Some(match op {
        BinaryOperator::Eq => ordering.is_eq(),
        BinaryOperator::NotEq => ordering.is_ne(),
        BinaryOperator::Lt => ordering.is_lt(),
        BinaryOperator::LtEq => ordering.is_le(),
        BinaryOperator::Gt => ordering.is_gt(),
        BinaryOperator::GtEq => ordering.is_ge(),
        _ => return None
    })
}

/// Classify one GROUP BY / ORDER BY key.
pub(super) fn classify_key(expr: &Expr, meta: &mut QueryMeta) -> SortKey {
    match expr {
        Expr::Identifier(ident) => SortKey {
            kind:      KeyKind::Column,
            column:    Some(CompactString::from(strip_quotes(&ident.value))),
            qualifier: None
        },
        Expr::CompoundIdentifier(parts) if parts.len() >= 2 => SortKey {
            kind:      KeyKind::Column,
            column:    parts
                .last()
                .map(|i| CompactString::from(strip_quotes(&i.value))),
            qualifier: parts
                .first()
                .map(|i| CompactString::from(strip_quotes(&i.value)))
        },
        Expr::Value(ValueWithSpan {
            value: Value::Number(..),
            ..
        }) => SortKey {
            kind:      KeyKind::Position,
            column:    None,
            qualifier: None
        },
        Expr::Value(_) => SortKey {
            kind:      KeyKind::Literal,
            column:    None,
            qualifier: None
        },
        other => {
            // Sort keys can nest subqueries; keep the subquery facts flowing.
            walk_predicate(other, meta, 0, false);
            SortKey {
                kind:      KeyKind::Expression,
                column:    None,
                qualifier: None
            }
        }
    }
}

/// Digest one projection expression (aliased or not).
pub(super) fn collect_projection_expr(
    expr: &Expr,
    meta: &mut QueryMeta,
    depth: usize,
    alias: Option<&str>
) {
    if let Some(alias) = alias {
        meta.select_aliases.push(super::super::types::AliasPair {
            expr:  CompactString::from(expr.to_string()),
            alias: CompactString::from(strip_quotes(alias))
        });
    }
    match expr {
        Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
            if let Some(name) = ident_name(expr) {
                meta.select_cols.push(name);
            }
        }
        Expr::Function(func) => collect_function(func, meta, depth),
        other => walk_predicate(other, meta, depth, false)
    }
}

fn collect_function(func: &sqlparser::ast::Function, meta: &mut QueryMeta, depth: usize) {
    let name = func.name.to_string().to_lowercase();
    if depth > 0 {
        meta.subquery_has_func = true;
    }
    if AGGREGATES.contains(&name.as_str()) {
        meta.agg_funcs.push(CompactString::from(name.as_str()));
    }
    if let FunctionArguments::List(list) = &func.args {
        let distinct = matches!(
            list.duplicate_treatment,
            Some(sqlparser::ast::DuplicateTreatment::Distinct)
        );
        if name == "count" {
            if distinct && list.args.len() > 1 {
                meta.count_distinct_multi = true;
            }
            for arg in &list.args {
                match arg {
                    FunctionArg::Unnamed(FunctionArgExpr::Wildcard) => meta.count_star = true,
                    FunctionArg::Unnamed(FunctionArgExpr::Expr(inner)) if !distinct => {
                        if ident_name(inner).is_some() || literal_value(inner).is_some() {
                            meta.count_col_or_const = true;
                        }
                    }
                    _ => {}
                }
            }
        }
        if name == "sum" {
            for arg in &list.args {
                if let FunctionArg::Unnamed(FunctionArgExpr::Expr(inner)) = arg
                    && ident_name(inner).is_some()
                {
                    meta.sum_col = true;
                }
            }
        }
        // Subqueries can hide in any argument.
        for arg in &list.args {
            if let FunctionArg::Unnamed(FunctionArgExpr::Expr(inner))
            | FunctionArg::Named {
                arg: FunctionArgExpr::Expr(inner),
                ..
            } = arg
            {
                walk_subexpressions_only(inner, meta, depth);
            }
        }
    }
}

/// Walk only the nested subqueries of an expression.
fn walk_subexpressions_only(expr: &Expr, meta: &mut QueryMeta, depth: usize) {
    match expr {
        Expr::Subquery(query) => {
            meta.subquery_depth = meta.subquery_depth.max(depth + 1);
            walk_query(query, meta, depth + 1, false);
        }
        Expr::Nested(inner) => walk_subexpressions_only(inner, meta, depth),
        Expr::BinaryOp { left, right, .. } => {
            walk_subexpressions_only(left, meta, depth);
            walk_subexpressions_only(right, meta, depth);
        }
        Expr::UnaryOp { expr: inner, .. } => walk_subexpressions_only(inner, meta, depth),
        _ => {}
    }
}

/// Recursive predicate walker used for WHERE and HAVING clauses.
pub(super) fn walk_predicate(expr: &Expr, meta: &mut QueryMeta, depth: usize, in_where: bool) {
    match expr {
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => {
                walk_predicate(left, meta, depth, in_where);
                walk_predicate(right, meta, depth, in_where);
            }
            BinaryOperator::Or => {
                if in_where {
                    if null_or_compare_same_column(left, right) {
                        meta.where_null_or_cmp = true;
                    }
                    if or_chain_repeats_column(expr) {
                        meta.or_same_col = true;
                    }
                }
                walk_predicate(left, meta, depth, in_where);
                walk_predicate(right, meta, depth, in_where);
            }
            op if is_comparison(op) => {
                if in_where {
                    match eval_literal_cmp(left, op, right) {
                        Some(true) => meta.where_always_true = true,
                        Some(false) => meta.where_always_false = true,
                        None => {}
                    }
                    if let Some(col) = ident_name(left) {
                        if *op == BinaryOperator::Eq && literal_value(right).is_some() {
                            meta.where_eq_cols.push(col.clone());
                        }
                        meta.where_cols.push(col);
                    }
                    if let Some(col) = ident_name(right) {
                        meta.where_cols.push(col);
                    }
                    if let Expr::Function(func) = left.as_ref()
                        && function_touches_column(func)
                    {
                        meta.where_funcs
                            .push(CompactString::from(func.name.to_string().to_lowercase()));
                    }
                    if let Expr::Function(func) = right.as_ref()
                        && function_touches_column(func)
                    {
                        meta.where_funcs
                            .push(CompactString::from(func.name.to_string().to_lowercase()));
                    }
                    // col = col = 'abc' parses as (col = col) = 'abc'
                    if matches!(left.as_ref(), Expr::BinaryOp { op: inner, .. } if is_comparison(inner))
                    {
                        meta.where_chained_cmp = true;
                    }
                }
                if matches!(left.as_ref(), Expr::Subquery(_))
                    || matches!(right.as_ref(), Expr::Subquery(_))
                {
                    meta.scalar_subquery_cmp = true;
                }
                walk_predicate(left, meta, depth, false);
                walk_predicate(right, meta, depth, false);
            }
            _ => {
                walk_predicate(left, meta, depth, in_where);
                walk_predicate(right, meta, depth, in_where);
            }
        },
        Expr::UnaryOp { expr: inner, .. } => walk_predicate(inner, meta, depth, in_where),
        Expr::Nested(inner) => walk_predicate(inner, meta, depth, in_where),
        Expr::Like {
            negated, pattern, ..
        }
        | Expr::ILike {
            negated, pattern, ..
        } => {
            if *negated {
                meta.negated_match = true;
            }
            if let Some(Value::SingleQuotedString(p) | Value::DoubleQuotedString(p)) =
                literal_value(pattern)
            {
                meta.like_patterns.push(CompactString::from(p.as_str()));
            }
        }
        Expr::InList {
            expr: lhs,
            list,
            negated
        } => {
            if *negated {
                meta.negated_match = true;
            }
            if let Some(col) = ident_name(lhs) {
                meta.where_cols.push(col);
            }
            meta.in_lists.push(InListMeta {
                len:       list.len(),
                has_null:  list.iter().any(is_null_value),
                has_ident: list.iter().any(|e| ident_name(e).is_some())
            });
        }
        Expr::InSubquery {
            expr: lhs,
            subquery,
            negated
        } => {
            meta.in_subquery = true;
            if *negated {
                meta.negated_match = true;
            }
            if let Some(col) = ident_name(lhs) {
                meta.where_cols.push(col);
            }
            meta.subquery_depth = meta.subquery_depth.max(depth + 1);
            walk_query(subquery, meta, depth + 1, false);
        }
        Expr::Subquery(subquery) => {
            meta.subquery_depth = meta.subquery_depth.max(depth + 1);
            walk_query(subquery, meta, depth + 1, false);
        }
        Expr::Exists { subquery, .. } => {
            meta.subquery_depth = meta.subquery_depth.max(depth + 1);
            walk_query(subquery, meta, depth + 1, false);
        }
        Expr::IsNull(inner) | Expr::IsNotNull(inner) => {
            if in_where {
                meta.where_is_null = true;
            }
            if in_where && let Some(col) = ident_name(inner) {
                meta.where_cols.push(col);
            }
        }
        Expr::Between {
            expr: lhs,
            low,
            high,
            ..
        } => {
            if in_where && let Some(col) = ident_name(lhs) {
                meta.where_cols.push(col);
            }
            walk_predicate(low, meta, depth, false);
            walk_predicate(high, meta, depth, false);
        }
        Expr::Function(func) => collect_function(func, meta, depth),
        Expr::Value(ValueWithSpan {
            value: Value::SingleQuotedString(s) | Value::DoubleQuotedString(s),
            ..
        }) => {
            meta.string_literals.push(CompactString::from(s.as_str()));
        }
        _ => {}
    }
}

fn function_touches_column(func: &sqlparser::ast::Function) -> bool {
    if let FunctionArguments::List(list) = &func.args {
        list.args.iter().any(|arg| {
            matches!(
                arg,
                FunctionArg::Unnamed(FunctionArgExpr::Expr(
                    Expr::Identifier(_) | Expr::CompoundIdentifier(_)
                ))
            ) || matches!(arg, FunctionArg::Unnamed(FunctionArgExpr::Expr(Expr::Function(inner))) if function_touches_column(inner))
        })
    } else {
        false
    }
}

/// Whether an OR chain compares the same column to a literal more than
/// once (`c1 = 14 OR c1 = 17`), which an IN list expresses better.
fn or_chain_repeats_column(expr: &Expr) -> bool {
    fn leaves<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
        match expr {
            Expr::BinaryOp {
                left,
                op: BinaryOperator::Or,
                right
            } => {
                leaves(left, out);
                leaves(right, out);
            }
            Expr::Nested(inner) => leaves(inner, out),
            other => out.push(other)
        }
    }
    fn eq_column(expr: &Expr) -> Option<CompactString> {
        match expr {
            Expr::BinaryOp {
                left,
                op: BinaryOperator::Eq,
                right
            } => {
                if literal_value(right).is_some() {
                    ident_name(left)
                } else if literal_value(left).is_some() {
                    ident_name(right)
                } else {
                    None
                }
            }
            Expr::Nested(inner) => eq_column(inner),
            _ => None
        }
    }
    let mut flat = Vec::new();
    leaves(expr, &mut flat);
    let mut seen: Vec<CompactString> = Vec::new();
    for leaf in flat {
        if let Some(col) = eq_column(leaf) {
            if seen.iter().any(|s| s.eq_ignore_ascii_case(&col)) {
                return true;
            }
            seen.push(col);
        }
    }
    false
}

/// `col IS NULL OR col <op> …` — the NULL check and a comparison on the same
/// column OR-ed together.
fn null_or_compare_same_column(left: &Expr, right: &Expr) -> bool {
    fn null_checked(expr: &Expr) -> Option<CompactString> {
        match expr {
            Expr::IsNull(inner) => ident_name(inner),
            Expr::Nested(inner) => null_checked(inner),
            _ => None
        }
    }
    fn compared(expr: &Expr) -> Option<CompactString> {
        match expr {
            Expr::BinaryOp { left, op, right } if is_comparison(op) => {
                ident_name(left).or_else(|| ident_name(right))
            }
            Expr::Nested(inner) => compared(inner),
            _ => None
        }
    }
    match (null_checked(left), compared(right)) {
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => true,
        _ => match (compared(left), null_checked(right)) {
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => true,
            _ => false
        }
    }
}
