//! Core types of the rule system: severity levels, catalog entries,
//! findings and the keyed finding collection.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{config::Config, query::ParsedQuery};

/// Severity of a rule, `L0` (informational) to `L9`. Higher values subtract
/// more from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    L0,
    L1,
    L2,
    L3,
    L4,
    L5,
    L6,
    L7,
    L8,
    L9
}

impl Severity {
    /// The numeric weight used by the scorer.
    pub fn digit(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.digit())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L0" => Ok(Self::L0),
            "L1" => Ok(Self::L1),
            "L2" => Ok(Self::L2),
            "L3" => Ok(Self::L3),
            "L4" => Ok(Self::L4),
            "L5" => Ok(Self::L5),
            "L6" => Ok(Self::L6),
            "L7" => Ok(Self::L7),
            "L8" => Ok(Self::L8),
            "L9" => Ok(Self::L9),
            other => Err(format!("invalid severity: {other}"))
        }
    }
}

/// Predicate deciding whether a rule fires for a query.
pub type CheckFn = fn(&ParsedQuery, &Config) -> bool;

/// A catalog entry. Instantiated once at first catalog access, read-only
/// thereafter.
#[derive(Clone, Copy)]
pub struct Rule {
    /// `CATEGORY.NNN`, or the sentinels `OK` / `ERR.000`.
    pub code: &'static str,
    pub severity: Severity,
    pub summary: &'static str,
    pub content: &'static str,
    /// SQL sample illustrating the rule.
    pub case: &'static str,
    pub check: CheckFn
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("code", &self.code)
            .field("severity", &self.severity)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// The owned, serializable form of this rule once it has fired.
    pub fn finding(&self) -> Finding {
        Finding {
            code:     self.code.to_string(),
            severity: self.severity,
            summary:  self.summary.to_string(),
            content:  self.content.to_string(),
            case:     self.case.to_string(),
            position: 0
        }
    }
}

/// A matched rule. Field casing follows the public JSON report schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "Item")]
    pub code: String,
    #[serde(rename = "Severity")]
    pub severity: Severity,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Case")]
    pub case: String,
    /// 0-based source offset of the flagged region; `0` means the whole
    /// statement.
    #[serde(rename = "Position")]
    pub position: i64
}

/// Findings keyed by rule code, deduplicated by construction.
///
/// Merging is last-write-wins per code; the catalog guarantees canonical
/// metadata so overwriting is benign.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FindingSet {
    findings: BTreeMap<String, Finding>
}

impl FindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, finding: Finding) {
        self.findings.insert(finding.code.clone(), finding);
    }

    pub fn merge(&mut self, other: FindingSet) {
        for (code, finding) in other.findings {
            self.findings.insert(code, finding);
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.findings.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&Finding> {
        self.findings.get(code)
    }

    pub fn remove(&mut self, code: &str) -> Option<Finding> {
        self.findings.remove(code)
    }

    pub fn retain(&mut self, f: impl FnMut(&String, &mut Finding) -> bool) {
        self.findings.retain(f);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Iterate findings in lexicographic code order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Finding)> {
        self.findings.iter()
    }

    /// All codes in lexicographic order.
    pub fn codes(&self) -> Vec<&str> {
        self.findings.keys().map(String::as_str).collect()
    }
}

impl IntoIterator for FindingSet {
    type Item = (String, Finding);
    type IntoIter = std::collections::btree_map::IntoIter<String, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}
