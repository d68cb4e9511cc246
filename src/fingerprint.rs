//! Query fingerprinting.
//!
//! A fingerprint is the canonical, parameter-stripped form of a statement:
//! comments removed, literals replaced by `?`, value lists folded to `?+`,
//! whitespace collapsed and everything lowercased. Two queries differing
//! only in literal values share a fingerprint, which makes it the stable
//! identity of a query across runs and reports.
//!
//! The fingerprint is idempotent: `fingerprint(fingerprint(sql)) ==
//! fingerprint(sql)`.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(--|#)[^\r\n]*").expect("valid regex"));
static BIT_OR_HEX_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[bB]'[01]+'|\b[xX]'[0-9a-fA-F]+'").expect("valid regex"));
static HEX_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0x[0-9a-fA-F]+\b").expect("valid regex"));
static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^'\\]|\\.)*'").expect("valid regex"));
static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).expect("valid regex"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b").expect("valid regex"));
static IN_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s*\(\s*\?(?:\s*,\s*\?)*\s*\)").expect("valid regex"));
static VALUES_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bvalues\s*\(\s*\?(?:\s*,\s*\?)*\s*\)(?:\s*,\s*\(\s*\?(?:\s*,\s*\?)*\s*\))*")
        .expect("valid regex")
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Produce the canonical, parameter-stripped form of a statement.
pub fn fingerprint(sql: &str) -> String {
    let mut fp = BLOCK_COMMENT.replace_all(sql, " ").into_owned();
    fp = LINE_COMMENT.replace_all(&fp, " ").into_owned();
    fp = BIT_OR_HEX_STRING.replace_all(&fp, "?").into_owned();
    fp = HEX_NUMBER.replace_all(&fp, "?").into_owned();
    fp = SINGLE_QUOTED.replace_all(&fp, "?").into_owned();
    fp = DOUBLE_QUOTED.replace_all(&fp, "?").into_owned();
    fp = NUMBER.replace_all(&fp, "?").into_owned();
    fp = fp.to_lowercase();
    fp = IN_LIST.replace_all(&fp, "in(?+)").into_owned();
    fp = VALUES_LIST.replace_all(&fp, "values(?+)").into_owned();
    WHITESPACE.replace_all(&fp, " ").trim().to_string()
}

/// Derive the stable 32-character hex identifier of a fingerprint.
///
/// The digest only depends on the fingerprint text, so all queries sharing a
/// fingerprint share an ID. Collisions are theoretically possible and
/// tolerated; IDs are best-effort identity.
pub fn id(fingerprint: &str) -> String {
    let digest = Sha256::digest(fingerprint.as_bytes());
    digest.iter().take(16).map(|b| format!("{b:02x}")).collect()
}
