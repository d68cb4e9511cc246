use std::path::Path;

use thiserror::Error;

/// Errors surfaced by the audit core.
///
/// Parsing failures are deliberately absent: the parser facade records them
/// inside [`crate::query::ParsedQuery`] so the audit can continue against
/// whatever trees survived.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path:   String,
        #[source]
        source: std::io::Error
    },
    #[error("invalid config file '{path}': {source}")]
    ConfigParse {
        path:   String,
        #[source]
        source: Box<toml::de::Error>
    }
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Create a config read error
pub fn config_read_error(path: &Path, source: std::io::Error) -> AuditError {
    AuditError::ConfigRead {
        path: path.display().to_string(),
        source
    }
}

/// Create a config parse error
pub fn config_parse_error(path: &Path, source: toml::de::Error) -> AuditError {
    AuditError::ConfigParse {
        path:   path.display().to_string(),
        source: Box::new(source)
    }
}
