// 🏛️ Bill Document - Root of the extracted entity graph
//
// BillDocument → Parts → Sections → {Appropriations, Provisos, Conditions, References}
// Part and section order is document order. Canonical provisos live once on the document.

use crate::amount::Cents;
use crate::entities::action::{ActionEntry, LegislativeAction};
use crate::entities::appropriation::{Agency, Appropriation};
use crate::entities::definition::Definition;
use crate::entities::enrollment::Enrollment;
use crate::entities::program::Program;
use crate::entities::proviso::{Condition, Proviso, ProvisoLink};
use crate::entities::statute::StatutoryReference;
use crate::entities::veto::{Veto, VetoStatus, VetoType};
use crate::fiscal::{FiscalImpact, SectionReconciliation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// SECTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section number as written; may contain letters ("101A")
    pub number: String,
    /// Canonical reference, e.g. "Sec. 101"
    pub reference: String,
    pub section_type: Option<String>,
    pub action: Option<String>,
    /// `SectionCaption` / `Caption` from the header
    pub caption: Option<String>,
    /// Session-law history note
    pub history: Option<String>,
    /// The section's own `SectionCite`: the law it acts on
    pub citation: Option<StatutoryReference>,
    pub agency: Option<Agency>,
    pub raw_text: String,

    pub appropriations: Vec<Appropriation>,
    pub provisos: Vec<ProvisoLink>,
    pub conditions: Vec<Condition>,
    pub statutory_references: Vec<StatutoryReference>,
    /// Only filled for sections captioned DEFINITIONS
    pub definitions: Vec<Definition>,

    pub veto_status: VetoStatus,
    /// `AppropriationTotal` as printed in the bill, if any
    pub declared_total_cents: Option<Cents>,
}

impl Section {
    pub fn new(number: String, reference: String) -> Self {
        Section {
            number,
            reference,
            section_type: None,
            action: None,
            caption: None,
            history: None,
            citation: None,
            agency: None,
            raw_text: String::new(),
            appropriations: Vec::new(),
            provisos: Vec::new(),
            conditions: Vec::new(),
            statutory_references: Vec::new(),
            definitions: Vec::new(),
            veto_status: VetoStatus::None,
            declared_total_cents: None,
        }
    }
}

// ============================================================================
// PART
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// 1-based order of appearance; 0 is the implicit part for leading sections
    pub number: u32,
    /// "PART I"
    pub label: String,
    pub title: String,
    pub sections: Vec<Section>,
}

// ============================================================================
// BILL DOCUMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDocument {
    pub bill_id: String,
    pub short_title: String,
    pub session: String,
    /// Biennium as written ("2025-27")
    pub biennium: String,
    pub fiscal_years: Vec<i32>,
    pub effective_date: String,
    /// Governor's action as certified ("PARTIAL VETO"), empty when absent
    pub veto_action: String,
    pub enrollment: Enrollment,

    pub parts: Vec<Part>,
    /// References from the bill title
    pub statutory_references: Vec<StatutoryReference>,
    pub agencies: Vec<Agency>,
    pub programs: Vec<Program>,
    /// Sections grouped by what they do to existing law
    pub legislative_actions: BTreeMap<LegislativeAction, Vec<ActionEntry>>,
    pub vetoes: Vec<Veto>,
    /// Canonical proviso store; links index into this list
    pub provisos: Vec<Proviso>,

    pub fiscal_impact: FiscalImpact,
    pub reconciliation: Vec<SectionReconciliation>,

    pub extracted_at: DateTime<Utc>,
    pub parser_version: String,
}

impl BillDocument {
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.parts.iter().flat_map(|p| p.sections.iter())
    }

    pub fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.parts.iter_mut().flat_map(|p| p.sections.iter_mut())
    }

    pub fn section(&self, number: &str) -> Option<&Section> {
        self.sections().find(|s| s.number == number)
    }

    pub fn appropriations(&self) -> impl Iterator<Item = &Appropriation> {
        self.sections().flat_map(|s| s.appropriations.iter())
    }

    pub fn appropriations_mut(&mut self) -> impl Iterator<Item = &mut Appropriation> {
        self.sections_mut().flat_map(|s| s.appropriations.iter_mut())
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.sections().flat_map(|s| s.definitions.iter())
    }

    /// Follow a resolved link into the canonical store
    pub fn proviso(&self, link: &ProvisoLink) -> Option<&Proviso> {
        link.index().and_then(|i| self.provisos.get(i))
    }

    /// Sections whose appropriations are excluded from totals (full vetoes)
    pub fn excluded_sections(&self) -> BTreeSet<String> {
        self.vetoes
            .iter()
            .filter(|v| v.veto_type == VetoType::Full)
            .map(|v| v.section_number.clone())
            .collect()
    }

    pub fn section_count(&self) -> usize {
        self.sections().count()
    }

    pub fn appropriation_count(&self) -> usize {
        self.appropriations().count()
    }

    /// Links anywhere in the document that did not resolve
    pub fn unresolved_links(&self) -> Vec<&ProvisoLink> {
        self.sections()
            .flat_map(|s| {
                s.provisos
                    .iter()
                    .chain(s.appropriations.iter().flat_map(|a| a.provisos.iter()))
            })
            .filter(|l| matches!(l, ProvisoLink::Unresolved { .. }))
            .collect()
    }
}
