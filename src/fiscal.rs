// 🧮 Fiscal Aggregator - Roll appropriations up into fiscal totals
//
// Totals are a pure function of the appropriation set + the excluded-section set.
// Vetoed lines stay in the output (vetoed: true) but never reach a total.
//
// Section reconciliation follows the same shape as a statement balance check:
//   Σ line totals (vetoes ignored) == AppropriationTotal printed in the bill

use crate::amount::{format_cents, Cents};
use crate::entities::{Appropriation, ChangeType, Section};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Bucket for lines with neither an agency name nor a code
const UNASSIGNED_AGENCY: &str = "(unassigned)";

// ============================================================================
// FISCAL IMPACT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalImpact {
    pub by_fiscal_year: BTreeMap<i32, Cents>,
    /// Amounts not tagged to a single fiscal year
    pub biennial_cents: Cents,
    pub total_cents: Cents,

    pub new_appropriation_cents: Cents,
    pub reappropriation_cents: Cents,

    /// Sum of every excluded line, reported for visibility only
    pub vetoed_cents: Cents,
    pub by_agency: BTreeMap<String, Cents>,

    pub appropriation_count: usize,
    pub excluded_count: usize,
}

impl FiscalImpact {
    pub fn summary(&self) -> String {
        format!(
            "{} appropriations, total {} (new {}, reappropriated {}), {} excluded ({})",
            self.appropriation_count,
            format_cents(self.total_cents),
            format_cents(self.new_appropriation_cents),
            format_cents(self.reappropriation_cents),
            self.excluded_count,
            format_cents(self.vetoed_cents)
        )
    }
}

// ============================================================================
// SECTION RECONCILIATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconciliationResult {
    /// Line items add up to the printed total
    Balanced { total: Cents },

    /// Printed total and line items disagree; difference = computed - declared
    Discrepancy {
        declared: Cents,
        computed: Cents,
        difference: Cents,
    },
}

impl ReconciliationResult {
    pub fn is_balanced(&self) -> bool {
        matches!(self, ReconciliationResult::Balanced { .. })
    }

    pub fn difference(&self) -> Cents {
        match self {
            ReconciliationResult::Balanced { .. } => 0,
            ReconciliationResult::Discrepancy { difference, .. } => *difference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReconciliation {
    pub section_number: String,
    pub result: ReconciliationResult,
}

// ============================================================================
// AGGREGATOR
// ============================================================================

pub struct FiscalAggregator;

impl FiscalAggregator {
    pub fn new() -> Self {
        FiscalAggregator
    }

    /// Aggregate every non-excluded line.
    ///
    /// A line is excluded when it carries `vetoed: true` or its section is in
    /// `excluded_sections`. Running this twice on the same input gives the same result.
    pub fn aggregate<'a>(
        &self,
        appropriations: impl IntoIterator<Item = &'a Appropriation>,
        excluded_sections: &BTreeSet<String>,
    ) -> FiscalImpact {
        let mut impact = FiscalImpact::default();

        for appropriation in appropriations {
            let line_total = appropriation.total_cents();

            if appropriation.vetoed || excluded_sections.contains(&appropriation.section_number) {
                impact.excluded_count += 1;
                impact.vetoed_cents = impact.vetoed_cents.saturating_add(line_total);
                continue;
            }

            impact.appropriation_count += 1;

            for (year, cents) in &appropriation.fiscal_year_amounts {
                let entry = impact.by_fiscal_year.entry(*year).or_insert(0);
                *entry = entry.saturating_add(*cents);
            }
            impact.biennial_cents = impact.biennial_cents.saturating_add(appropriation.biennial_cents);
            impact.total_cents = impact.total_cents.saturating_add(line_total);

            match appropriation.change_type {
                ChangeType::NewAppropriation => {
                    impact.new_appropriation_cents =
                        impact.new_appropriation_cents.saturating_add(line_total)
                }
                ChangeType::Reappropriation => {
                    impact.reappropriation_cents =
                        impact.reappropriation_cents.saturating_add(line_total)
                }
            }

            let agency = agency_bucket(appropriation);
            let entry = impact.by_agency.entry(agency).or_insert(0);
            *entry = entry.saturating_add(line_total);
        }

        debug!(
            counted = impact.appropriation_count,
            excluded = impact.excluded_count,
            total = impact.total_cents,
            "aggregated appropriations"
        );

        impact
    }

    /// Compare each section's printed total with the sum of its lines
    pub fn reconcile_sections<'a>(
        &self,
        sections: impl IntoIterator<Item = &'a Section>,
    ) -> Vec<SectionReconciliation> {
        sections
            .into_iter()
            .filter_map(|section| {
                let declared = section.declared_total_cents?;
                let computed = section
                    .appropriations
                    .iter()
                    .fold(0 as Cents, |acc, a| acc.saturating_add(a.total_cents()));

                let result = if computed == declared {
                    ReconciliationResult::Balanced { total: declared }
                } else {
                    ReconciliationResult::Discrepancy {
                        declared,
                        computed,
                        difference: computed.saturating_sub(declared),
                    }
                };

                Some(SectionReconciliation {
                    section_number: section.number.clone(),
                    result,
                })
            })
            .collect()
    }
}

impl Default for FiscalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Flag every line under an excluded section; returns how many flags changed
pub fn mark_vetoed<'a>(
    appropriations: impl IntoIterator<Item = &'a mut Appropriation>,
    excluded_sections: &BTreeSet<String>,
) -> usize {
    let mut marked = 0;
    for appropriation in appropriations {
        if !appropriation.vetoed && excluded_sections.contains(&appropriation.section_number) {
            appropriation.vetoed = true;
            marked += 1;
        }
    }
    marked
}

fn agency_bucket(appropriation: &Appropriation) -> String {
    if !appropriation.agency_name.is_empty() {
        return appropriation.agency_name.clone();
    }
    appropriation
        .agency_code
        .clone()
        .unwrap_or_else(|| UNASSIGNED_AGENCY.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
