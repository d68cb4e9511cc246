//! Audit configuration.
//!
//! Configuration is loaded from TOML files with the following precedence
//! (highest to lowest):
//!
//! 1. `.sql-auditor.toml` in the current directory
//! 2. `~/.config/sql-auditor/config.toml`
//! 3. Default values
//!
//! The loaded [`Config`] is treated as a frozen snapshot for the duration of
//! one audit: rules read thresholds and allow-lists from it but never write.
//!
//! # Configuration File Format
//!
//! ```toml
//! ignore_rules = ["COL.011", "KWR.*"]
//! max_varchar_length = 1024
//! allow_engines = ["innodb"]
//! allow_charsets = ["utf8", "utf8mb4"]
//! idx_prefix = "idx_"
//! uk_prefix = "uk_"
//! report_type = "markdown"
//! blacklist = ["^select 1$"]
//! ```

use std::{env, fs, path::Path, path::PathBuf};

use regex::RegexBuilder;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AuditResult, config_parse_error, config_read_error};

/// Audit configuration snapshot consumed by the rule catalog, the ignore
/// filter and the formatter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix globs suppressing finding codes (`OK` cannot be suppressed
    /// through a glob; the bare token `OK` hides the sentinel instead).
    pub ignore_rules: Vec<String>,
    /// Literal strings or case-insensitive regexes; matching SQL is skipped
    /// entirely.
    pub blacklist: Vec<String>,
    /// VARCHAR length threshold for COL.017.
    pub max_varchar_length: u64,
    /// text/blob column count threshold for COL.007.
    pub max_text_cols_count: usize,
    /// Total column count threshold for COL.006.
    pub max_col_count: usize,
    /// Index count threshold for KEY.005.
    pub max_idx_count: usize,
    /// Primary key part threshold for KEY.006.
    pub max_primary_key_parts: usize,
    /// IN-list length threshold for ARG.005.
    pub max_in_count: usize,
    /// INSERT/REPLACE row count threshold for ARG.012.
    pub max_value_count: usize,
    /// Joined table count threshold for JOI.005.
    pub max_join_table_count: usize,
    /// DISTINCT count threshold for DIS.001.
    pub max_distinct_count: usize,
    /// Subquery nesting threshold for SUB.004.
    pub max_subquery_depth: usize,
    /// Query length threshold for CLA.012.
    pub spaghetti_query_length: usize,
    /// Column types triggering COL.018.
    pub column_not_allow_type: Vec<String>,
    /// Storage engine allow-list for TBL.002.
    pub allow_engines: Vec<String>,
    /// Character set allow-list for TBL.005.
    pub allow_charsets: Vec<String>,
    /// Collation allow-list for TBL.008.
    pub allow_collates: Vec<String>,
    /// Secondary index naming prefix for STA.003.
    pub idx_prefix: String,
    /// Unique index naming prefix for STA.003.
    pub uk_prefix: String,
    /// Output format selector for the formatter.
    pub report_type: String,
    /// How the query is shown in the markdown-family report header:
    /// `"sample"`, `"fingerprint"` or `"pretty"`.
    pub explain_sql_report_type: String
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_rules:           vec![String::from("COL.011")],
            blacklist:              Vec::new(),
            max_varchar_length:     1024,
            max_text_cols_count:    2,
            max_col_count:          40,
            max_idx_count:          10,
            max_primary_key_parts:  5,
            max_in_count:           10,
            max_value_count:        100,
            max_join_table_count:   5,
            max_distinct_count:     5,
            max_subquery_depth:     5,
            spaghetti_query_length: 2048,
            column_not_allow_type:  vec![String::from("boolean")],
            allow_engines:          vec![String::from("innodb")],
            allow_charsets:         vec![String::from("utf8"), String::from("utf8mb4")],
            allow_collates:         vec![
                String::from("utf8_general_ci"),
                String::from("utf8mb4_general_ci"),
            ],
            idx_prefix:             String::from("idx_"),
            uk_prefix:              String::from("uk_"),
            report_type:            String::from("markdown"),
            explain_sql_report_type: String::from("pretty")
        }
    }
}

impl Config {
    /// Load configuration from disk.
    ///
    /// Priority (highest to lowest):
    /// 1. `.sql-auditor.toml` in the current directory
    /// 2. `~/.config/sql-auditor/config.toml`
    /// 3. Default values
    pub fn load() -> AuditResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-auditor")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".sql-auditor.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    pub fn from_file(path: &Path) -> AuditResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| config_read_error(path, e))?;
        toml::from_str(&content).map_err(|e| config_parse_error(path, e))
    }
}

/// Whether a statement is blacklisted and should be skipped without audit.
///
/// Each entry matches either literally or as a case-insensitive regex.
/// Entries that fail to compile as regexes only match literally.
pub fn in_blacklist(sql: &str, config: &Config) -> bool {
    for entry in &config.blacklist {
        if sql == entry {
            debug!(entry, "blacklist literal match");
            return true;
        }
        if let Ok(re) = RegexBuilder::new(entry).case_insensitive(true).build()
            && re.is_match(sql)
        {
            debug!(entry, "blacklist regex match");
            return true;
        }
    }
    false
}
