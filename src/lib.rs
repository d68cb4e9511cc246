//! # SQL Auditor
//!
//! Heuristic audit core for the MySQL dialect family.
//!
//! The crate takes a SQL statement, parses it with two complementary
//! dialects, runs a catalog of static-analysis rules against the trees and
//! the raw text, and renders a scored, deduplicated set of findings in
//! several report formats.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌──────────────┐    ┌───────────────┐    ┌───────────┐
//! │ ParsedQuery│───▶│ rules::audit │───▶│ merge/resolve │───▶│ Formatter │
//! └────────────┘    └──────────────┘    │ ignore/score  │    └───────────┘
//!                                       └───────────────┘
//! ```
//!
//! External collaborators (EXPLAIN, index advisor, profiling, trace) inject
//! their own [`rules::FindingSet`]s by rule-code convention; the core merges
//! and renders them but never produces their codes itself.
//!
//! # Quick start
//!
//! ```
//! use sql_auditor::{config::Config, output, query::ParsedQuery, rules};
//!
//! let config = Config::default();
//! let parsed = ParsedQuery::new("select id from tbl", None, None);
//! let findings = rules::audit(&parsed, &config);
//! let (findings, report) =
//!     output::format_suggest("select id from tbl", "", "lint", &config, vec![findings]);
//! assert!(report.contains("CLA.001"));
//! assert!(!findings.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod output;
pub mod query;
pub mod rules;
