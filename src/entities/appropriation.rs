// 💰 Appropriation Entity - One funding line of a section
// Amounts are integer cents per fiscal year; lines with no FY tag are biennial.

use crate::amount::Cents;
use crate::entities::proviso::ProvisoLink;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CHANGE TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    NewAppropriation,
    Reappropriation,
}

impl ChangeType {
    /// `Appropriations@appropType` → change type; anything unrecognized is new money
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "reappropriation" => ChangeType::Reappropriation,
            _ => ChangeType::NewAppropriation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::NewAppropriation => "appropriation",
            ChangeType::Reappropriation => "reappropriation",
        }
    }
}

// ============================================================================
// AGENCY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    /// Numeric agency code, e.g. "011"
    pub code: Option<String>,
    pub name: String,
    /// Short index name from the department header
    pub index: Option<String>,
    pub program: Option<String>,
}

impl Agency {
    /// Agency component of the proviso composite key: name, or code when unnamed
    pub fn key_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.code.clone().unwrap_or_default()
    }
}

// ============================================================================
// APPROPRIATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appropriation {
    /// Owning section, by section number (non-owning back-reference)
    pub section_number: String,
    pub bill_number: String,
    pub agency_code: Option<String>,
    pub agency_name: String,
    pub program: Option<String>,

    pub account_name: String,
    pub fund_type: String,
    pub account_type: Option<String>,
    pub change_type: ChangeType,

    /// Amount text exactly as written, for callers that need "unparsed" vs "zero"
    pub amount_text: String,
    pub fiscal_year_amounts: BTreeMap<i32, Cents>,
    /// Amounts not tagged to a single fiscal year
    pub biennial_cents: Cents,

    pub provisos: Vec<ProvisoLink>,
    pub vetoed: bool,
}

impl Appropriation {
    /// Sum of every fiscal-year amount plus the biennial amount
    pub fn total_cents(&self) -> Cents {
        self.fiscal_year_amounts
            .values()
            .fold(self.biennial_cents, |acc, v| acc.saturating_add(*v))
    }

    pub fn add_amount(&mut self, fiscal_year: Option<i32>, cents: Cents) {
        match fiscal_year {
            Some(year) => {
                let entry = self.fiscal_year_amounts.entry(year).or_insert(0);
                *entry = entry.saturating_add(cents);
            }
            None => self.biennial_cents = self.biennial_cents.saturating_add(cents),
        }
    }
}
