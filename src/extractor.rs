// 🏭 Extraction Pipeline - XML text → fully linked, aggregated BillDocument
//
// parse → walk → link provisos → mark vetoed lines → aggregate → reconcile sections
//
// Everything after parsing is a pure transformation of one document; nothing is shared
// between calls except the static keyword and regex tables.

use crate::config::ExtractorConfig;
use crate::document::{parse_xml, DocumentNode};
use crate::entities::BillDocument;
use crate::error::{ExtractionError, Result};
use crate::fiscal::{mark_vetoed, FiscalAggregator};
use crate::linker::ProvisoLinker;
use crate::walker::DocumentWalker;
use std::fs;
use std::path::Path;
use tracing::info;

/// Extract a bill from XML text
pub fn extract_bill(xml: &str, config: &ExtractorConfig) -> Result<BillDocument> {
    let tree = parse_xml(xml)?;
    extract_from_root(&tree.root_element(), config)
}

/// Extract from any already-parsed tree
pub fn extract_from_root<N: DocumentNode>(root: &N, config: &ExtractorConfig) -> Result<BillDocument> {
    let mut document = DocumentWalker::new(config).walk(root)?;

    let link_report = ProvisoLinker::new().link_document(&mut document);

    let excluded = document.excluded_sections();
    mark_vetoed(document.appropriations_mut(), &excluded);

    let aggregator = FiscalAggregator::new();
    document.fiscal_impact = aggregator.aggregate(document.appropriations(), &excluded);
    document.reconciliation = aggregator.reconcile_sections(document.sections());

    let discrepancies = document
        .reconciliation
        .iter()
        .filter(|r| !r.result.is_balanced())
        .count();

    info!(
        bill = %document.bill_id,
        sections = document.section_count(),
        appropriations = document.appropriation_count(),
        provisos = link_report.canonical_count,
        unresolved = link_report.unresolved,
        vetoes = document.vetoes.len(),
        discrepancies,
        total_cents = document.fiscal_impact.total_cents,
        "extracted bill"
    );

    Ok(document)
}

/// Read and extract one file; read failures carry the path
pub fn extract_file<P: AsRef<Path>>(path: P, config: &ExtractorConfig) -> Result<BillDocument> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_bill(&xml, config)
}
