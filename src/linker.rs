// 🔗 Cross-Reference Linker - Inline proviso copies → canonical references
//
// Canonical store: first proviso seen per composite key wins, later copies are dropped.
// Every link is re-resolved by exact key lookup (HashMap, no scans, no fuzzy match).
// A key with no canonical proviso becomes ProvisoLink::Unresolved, never a new record.
//
// Linking is idempotent: a linked document links to itself.

use crate::entities::{Appropriation, BillDocument, Proviso, ProvisoKey, ProvisoLink};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

// ============================================================================
// LINK REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    /// Size of the canonical store after linking
    pub canonical_count: usize,
    /// Raw provisos whose key was already canonical
    pub duplicates_dropped: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

// ============================================================================
// CANONICAL INDEX
// ============================================================================

/// Canonical provisos plus their key → position map
#[derive(Debug, Clone, Default)]
pub struct ProvisoIndex {
    provisos: Vec<Proviso>,
    by_key: HashMap<ProvisoKey, usize>,
    duplicates_dropped: usize,
}

impl ProvisoIndex {
    /// Insert unless the key is already canonical; returns the canonical position
    pub fn insert(&mut self, proviso: Proviso) -> usize {
        if let Some(&index) = self.by_key.get(&proviso.key) {
            self.duplicates_dropped += 1;
            return index;
        }
        let index = self.provisos.len();
        self.by_key.insert(proviso.key.clone(), index);
        self.provisos.push(proviso);
        index
    }

    pub fn get(&self, key: &ProvisoKey) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Rewrite `link` into Resolved or Unresolved; returns true when resolved
    pub fn resolve(&self, link: &mut ProvisoLink) -> bool {
        let key = link.key().clone();
        match self.get(&key) {
            Some(index) => {
                *link = ProvisoLink::Resolved { key, index };
                true
            }
            None => {
                warn!(key = %key, "proviso reference has no canonical proviso");
                *link = ProvisoLink::Unresolved { key };
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.provisos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provisos.is_empty()
    }

    pub fn provisos(&self) -> &[Proviso] {
        &self.provisos
    }

    pub fn into_provisos(self) -> Vec<Proviso> {
        self.provisos
    }
}

// ============================================================================
// LINKER
// ============================================================================

pub struct ProvisoLinker;

impl ProvisoLinker {
    pub fn new() -> Self {
        ProvisoLinker
    }

    /// Build the canonical store from the authoritative proviso list
    pub fn canonicalize<'a>(&self, raw: impl IntoIterator<Item = &'a Proviso>) -> ProvisoIndex {
        let mut index = ProvisoIndex::default();
        for proviso in raw {
            index.insert(proviso.clone());
        }
        index
    }

    /// Link a flat appropriation list against a raw proviso list.
    ///
    /// Returns the canonical provisos the appropriation links now index into.
    pub fn link_appropriations(
        &self,
        raw: &[Proviso],
        appropriations: &mut [Appropriation],
    ) -> (Vec<Proviso>, LinkReport) {
        let index = self.canonicalize(raw);
        let mut report = LinkReport::default();

        for appropriation in appropriations.iter_mut() {
            for link in appropriation.provisos.iter_mut() {
                tally(&mut report, index.resolve(link));
            }
        }

        report.canonical_count = index.len();
        report.duplicates_dropped = index.duplicates_dropped;
        (index.into_provisos(), report)
    }

    /// Link a whole document in place.
    ///
    /// Authoritative provisos are the document's existing canonical store followed by
    /// every section-level inline proviso, in document order.
    pub fn link_document(&self, document: &mut BillDocument) -> LinkReport {
        let section_provisos: Vec<Proviso> = document
            .sections()
            .flat_map(|s| s.provisos.iter())
            .filter_map(|link| match link {
                ProvisoLink::Inline(proviso) => Some(proviso.clone()),
                _ => None,
            })
            .collect();

        let index = self.canonicalize(document.provisos.iter().chain(section_provisos.iter()));
        let mut report = LinkReport::default();

        for section in document.sections_mut() {
            for link in section.provisos.iter_mut() {
                tally(&mut report, index.resolve(link));
            }
            for appropriation in section.appropriations.iter_mut() {
                for link in appropriation.provisos.iter_mut() {
                    tally(&mut report, index.resolve(link));
                }
            }
        }

        report.canonical_count = index.len();
        report.duplicates_dropped = index.duplicates_dropped;
        document.provisos = index.into_provisos();

        debug!(
            canonical = report.canonical_count,
            dropped = report.duplicates_dropped,
            resolved = report.resolved,
            unresolved = report.unresolved,
            "linked provisos for {}",
            document.bill_id
        );

        report
    }
}

impl Default for ProvisoLinker {
    fn default() -> Self {
        Self::new()
    }
}

fn tally(report: &mut LinkReport, resolved: bool) {
    if resolved {
        report.resolved += 1;
    } else {
        report.unresolved += 1;
    }
}

// ============================================================================
// TESTS
// ============================================================================
