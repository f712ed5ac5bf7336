// 📜 Statutory Reference - RCW and federal code citations

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Revised Code of Washington
    State,
    /// U.S.C. / C.F.R.
    Federal,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::State => "state",
            ReferenceKind::Federal => "federal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryReference {
    /// Citation as it appeared in the text (whitespace collapsed)
    pub citation: String,
    pub kind: ReferenceKind,
    /// Canonical form used for deduplication, e.g. `RCW 43.88.110`
    pub normalized: String,
}

impl StatutoryReference {
    pub fn new(citation: String, kind: ReferenceKind, normalized: String) -> Self {
        StatutoryReference {
            citation,
            kind,
            normalized,
        }
    }

    /// Structured `SectionCite` (title / chapter / section) → `RCW t.c.s`
    pub fn rcw_section(title: &str, chapter: &str, section: &str) -> Self {
        let normalized = format!("RCW {}.{}.{}", title.trim(), chapter.trim(), section.trim());
        StatutoryReference::new(normalized.clone(), ReferenceKind::State, normalized)
    }

    pub fn is_federal(&self) -> bool {
        self.kind == ReferenceKind::Federal
    }
}
