//! Parser facade.
//!
//! Two parses with complementary dialect coverage produce one
//! [`ParsedQuery`]: a best-effort primary parse with the standard-SQL
//! `GenericDialect` (failure is only logged) and an authoritative secondary
//! parse with `MySqlDialect` (failure is recorded and later surfaced as an
//! `ERR.000` finding). Rules inspect whichever tree they prefer and fall
//! back to regexes over the raw text when neither parser yields a useful
//! shape, so a `ParsedQuery` is returned unconditionally.

mod extract;
pub mod types;

use sqlparser::{
    ast::Statement,
    dialect::{GenericDialect, MySqlDialect},
    parser::Parser
};
use tracing::warn;

pub use types::QueryMeta;

/// A statement under audit: the raw text, both parse trees and the digested
/// metadata. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    /// The original SQL string, unmodified.
    pub text: String,
    /// First statement of the primary (standard SQL) parse, if it succeeded.
    pub primary: Option<Statement>,
    /// All statements of the secondary (MySQL) parse.
    pub secondary: Vec<Statement>,
    /// Error from the authoritative secondary parser. Its presence still
    /// permits rule execution against the primary tree and the raw text.
    pub parse_error: Option<String>,
    /// Facts digested from the parse trees in one pass.
    pub meta: QueryMeta
}

impl ParsedQuery {
    /// Parse a statement with both dialects.
    ///
    /// `charset` and `collation` are accepted for interface parity with the
    /// session-aware callers; the parsers do not currently consume them.
    pub fn new(sql: &str, _charset: Option<&str>, _collation: Option<&str>) -> Self {
        let primary = match Parser::parse_sql(&GenericDialect {}, sql) {
            Ok(statements) => statements.into_iter().next(),
            Err(err) => {
                warn!(error = %err, sql, "primary parser rejected statement");
                None
            }
        };

        let (secondary, parse_error) = match Parser::parse_sql(&MySqlDialect {}, sql) {
            Ok(statements) => (statements, None),
            Err(err) => (Vec::new(), Some(err.to_string()))
        };

        let meta = if secondary.is_empty() {
            extract::extract(primary.as_slice())
        } else {
            extract::extract(&secondary)
        };

        Self {
            text: sql.to_string(),
            primary,
            secondary,
            parse_error,
            meta
        }
    }

    /// Whether any parse produced a tree.
    pub fn has_tree(&self) -> bool {
        self.primary.is_some() || !self.secondary.is_empty()
    }
}
