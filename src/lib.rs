// Bill Extraction - Core Library
// Legislative bill XML → normalized, linked, aggregated entity graph

pub mod amount;
pub mod classifier;
pub mod config;
pub mod db;
pub mod document;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod fiscal;
pub mod linker;
pub mod output;
pub mod programs;
pub mod references;
pub mod text;
pub mod walker;

// Re-export commonly used types
pub use amount::{format_cents, parse_amount, Cents};
pub use classifier::{classify, KeywordRule, SpanCategory, SpanClassifier, DEFAULT_RULES};
pub use config::ExtractorConfig;
pub use db::{count_rows, insert_bill, setup_database, stored_total_cents, InsertSummary};
pub use document::{parse_xml, DocumentNode};
pub use entities::{
    ActionEntry, Agency, Appropriation, BillDocument, Certificate, Chamber, ChangeType, Condition,
    Definition, Enrollment, LegislativeAction, Part, Program, ProgramKind, Proviso, ProvisoKey,
    ProvisoLink, ReferenceKind, Section, StatutoryReference, Veto, VetoStatus, VetoType,
    VoteRecord,
};
pub use error::{ExtractionError, Result};
pub use extractor::{extract_bill, extract_file, extract_from_root};
pub use fiscal::{
    mark_vetoed, FiscalAggregator, FiscalImpact, ReconciliationResult, SectionReconciliation,
};
pub use linker::{LinkReport, ProvisoIndex, ProvisoLinker};
pub use output::{from_json_str, read_json, to_json_string, write_json};
pub use programs::{agency_programs, scan_programs};
pub use references::{merge_references, scan_references};
pub use text::{clean_text, extract_agency_code, extract_fiscal_years, normalize_section};
pub use walker::DocumentWalker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
