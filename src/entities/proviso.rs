// 📌 Proviso Entity - Stored once, referenced by composite natural key
//
// Key = {section, agency, bill number, proviso number}. Exact equality on all four,
// no fuzzy matching. Appropriations hold ProvisoLinks, never a second copy of the text.

use crate::classifier::SpanCategory;
use crate::text::clean_text;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// COMPOSITE KEY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProvisoKey {
    pub section: String,
    pub agency: String,
    pub bill_number: String,
    pub proviso_number: String,
}

impl ProvisoKey {
    pub fn new(section: &str, agency: &str, bill_number: &str, proviso_number: &str) -> Self {
        ProvisoKey {
            section: section.to_string(),
            agency: agency.to_string(),
            bill_number: bill_number.to_string(),
            proviso_number: proviso_number.to_string(),
        }
    }
}

impl std::fmt::Display for ProvisoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sec. {} [{}] ({})",
            self.bill_number, self.section, self.agency, self.proviso_number
        )
    }
}

// ============================================================================
// PROVISO
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proviso {
    pub key: ProvisoKey,
    pub category: SpanCategory,
    /// Text exactly as collected from the paragraphs
    pub raw_text: String,
    /// Whitespace-collapsed text
    pub normalized_text: String,
}

impl Proviso {
    pub fn new(key: ProvisoKey, category: SpanCategory, raw_text: String) -> Self {
        let normalized_text = clean_text(&raw_text);
        Proviso {
            key,
            category,
            raw_text,
            normalized_text,
        }
    }

    /// SHA-256 of the normalized text; identical wording hashes identically across keys
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.normalized_text.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// LINK (what sections and appropriations actually hold)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProvisoLink {
    /// Walker output: an inline copy, not yet linked
    Inline(Proviso),
    /// Index into the document's canonical proviso list
    Resolved { key: ProvisoKey, index: usize },
    /// No canonical proviso carries this key; kept visible, never fabricated
    Unresolved { key: ProvisoKey },
}

impl ProvisoLink {
    pub fn key(&self) -> &ProvisoKey {
        match self {
            ProvisoLink::Inline(proviso) => &proviso.key,
            ProvisoLink::Resolved { key, .. } => key,
            ProvisoLink::Unresolved { key } => key,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ProvisoLink::Resolved { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            ProvisoLink::Resolved { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// ============================================================================
// CONDITION (unnumbered restriction/directive language)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub category: SpanCategory,
}
