// 🚶 Document Walker - Bill tree → entity graph
//
// Pre-order traversal: bill → parts → sections → {appropriations, provisos, conditions, references}.
// Sibling order is preserved. Fail-soft per node: a missing element gives an empty field
// and a warning, never an aborted document. Only a non-bill root is fatal.

use crate::amount::parse_amount;
use crate::classifier::SpanClassifier;
use crate::config::ExtractorConfig;
use crate::document::DocumentNode;
use crate::entities::{
    ActionEntry, Agency, Appropriation, BillDocument, Certificate, Chamber, ChangeType, Condition,
    Definition, Enrollment, LegislativeAction, Part, Proviso, ProvisoKey, ProvisoLink, Section,
    StatutoryReference, Veto, VetoType, VoteRecord,
};
use crate::error::{ExtractionError, Result};
use crate::fiscal::FiscalImpact;
use crate::programs::{agency_programs, scan_programs};
use crate::references::{merge_references, scan_references};
use crate::text::{
    clean_account_name, clean_text, extract_account_type, extract_agency_code,
    extract_fiscal_year_tag, extract_fiscal_years, extract_fund_type, find_biennium,
    normalize_section,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

// ============================================================================
// VOCABULARY (case-insensitive tag names)
// ============================================================================

const CERTIFIED_BILL: &[&str] = &["CertifiedBill"];
const BILL: &[&str] = &["Bill"];
const BODY: &[&str] = &["BillBody", "body"];
const PART: &[&str] = &["Part"];
const SECTION: &[&str] = &["BillSection", "section"];
const SECTION_HEADER: &[&str] = &["BillSectionHeader"];
const SECTION_NUMBER: &[&str] = &["BillSectionNumber"];
const CAPTION: &[&str] = &["SectionCaption", "Caption"];
const HISTORY: &[&str] = &["History"];
const DEPARTMENT: &[&str] = &["Department", "agency"];
const DEPT_NAME: &[&str] = &["DeptName"];
const APPROPRIATIONS: &[&str] = &["Appropriations"];
const APPROPRIATION: &[&str] = &["Appropriation"];
const APPROPRIATION_TOTAL: &[&str] = &["AppropriationTotal"];
const ACCOUNT_NAME: &[&str] = &["AccountName"];
const DOLLAR_AMOUNT: &[&str] = &["DollarAmount", "amount"];
const PROVISO: &[&str] = &["Proviso"];
const PROVISO_REF: &[&str] = &["ProvisoRef"];
const PARAGRAPH: &[&str] = &["P", "paragraph"];
const SECTION_CITE: &[&str] = &["SectionCite"];
const VETO_NOTE: &[&str] = &["VetoNote"];
const PASSED_BY: &[&str] = &["PassedBy"];
const CERTIFICATE: &[&str] = &["Certificate"];

/// Subtrees whose paragraphs are not section prose
const NON_PROSE: &[&str] = &[
    "BillSectionHeader",
    "Department",
    "Appropriations",
    "Appropriation",
    "Proviso",
];

const AGENCY_PREFIX: &str = "FOR THE ";

static NUMBERED_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\((\d+)\)").expect("numbered paragraph regex"));

static PROVIDED_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PROVIDED,\s*(?:That\s+)?([^.]+)").expect("provided clause regex")
});

static VETO_EXCEPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)with the exception of sections?\s+(.+?),?\s+which\s+(?:is|are)\s+vetoed")
        .expect("veto exception regex")
});

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\((\d+)\)\s*["“]([^"”]+)["”]\s+(.+)"#).expect("definition regex")
});

static LIST_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:,|\band\b)\s*").expect("list split regex"));

// ============================================================================
// WALKER
// ============================================================================

pub struct DocumentWalker<'c> {
    config: &'c ExtractorConfig,
    classifier: SpanClassifier,
}

/// Per-section context shared by the node extractors
struct SectionScope<'s> {
    number: &'s str,
    agency: Option<&'s Agency>,
    bill_id: &'s str,
}

impl SectionScope<'_> {
    fn key(&self, proviso_number: &str) -> ProvisoKey {
        let agency = self.agency.map(|a| a.key_name()).unwrap_or_default();
        ProvisoKey::new(self.number, &agency, self.bill_id, proviso_number)
    }
}

impl<'c> DocumentWalker<'c> {
    pub fn new(config: &'c ExtractorConfig) -> Self {
        DocumentWalker {
            config,
            classifier: SpanClassifier::new(),
        }
    }

    /// Walk a whole bill. The tree capability is injected; no parser state is global.
    pub fn walk<N: DocumentNode>(&self, root: &N) -> Result<BillDocument> {
        let bill = if root.is_tag(CERTIFIED_BILL) {
            root.find(BILL).unwrap_or_else(|| root.clone())
        } else if root.is_tag(BILL) {
            root.clone()
        } else {
            return Err(ExtractionError::UnexpectedRoot {
                found: root.tag_name().to_string(),
            });
        };

        // Heading and enrolling certificate may sit beside <Bill> inside <CertifiedBill>
        let bill_id = first_non_empty([
            clean_text(&root.text_of(&["ShortBillId"])),
            bill.attr("id").unwrap_or_default(),
            bill.attr("number").unwrap_or_default(),
        ]);
        let brief = clean_text(&root.text_of(&["BriefDescription"]));
        let short_title = first_non_empty([
            clean_text(&root.text_of(&["ShortTitle"])),
            brief.clone(),
            bill.attr("title").unwrap_or_default(),
        ]);
        let session = first_non_empty([
            clean_text(&root.text_of(&["Session"])),
            bill.attr("session").unwrap_or_default(),
        ]);
        let bill_title = clean_text(&root.text_of(&["BillTitle"]));
        let biennium = first_non_empty([
            clean_text(&root.text_of(&["Biennium"])),
            bill.attr("biennium").unwrap_or_default(),
            find_biennium(&brief).unwrap_or_default(),
            find_biennium(&bill_title).unwrap_or_default(),
        ]);
        let effective_date = first_non_empty([
            clean_text(&root.text_of(&["EffectiveDate"])),
            bill.attr("effective").unwrap_or_default(),
        ]);
        let veto_action = clean_text(&root.text_of(&["VetoAction"]));

        if bill_id.is_empty() {
            warn!("bill has no identifier; proviso keys will carry an empty bill number");
        }

        let body = bill.find(BODY).unwrap_or_else(|| bill.clone());
        let mut vetoes = Vec::new();
        let parts = self.walk_parts(&body, &bill_id, &mut vetoes);

        self.collect_document_vetoes(root, &mut vetoes);
        let enrollment = collect_enrollment(root);

        let mut document = BillDocument {
            bill_id,
            short_title,
            session,
            fiscal_years: extract_fiscal_years(&biennium),
            biennium,
            effective_date,
            veto_action,
            enrollment,
            parts,
            statutory_references: scan_references(&bill_title),
            agencies: Vec::new(),
            programs: scan_programs(&root.text_content()),
            legislative_actions: BTreeMap::new(),
            vetoes,
            provisos: Vec::new(),
            fiscal_impact: FiscalImpact::default(),
            reconciliation: Vec::new(),
            extracted_at: Utc::now(),
            parser_version: self.config.parser_version.clone(),
        };

        apply_veto_status(&mut document);
        document.agencies = distinct_agencies(&document);
        let budget_programs = agency_programs(&document.agencies);
        document.programs.extend(budget_programs);
        document.legislative_actions = group_actions(&document);

        debug!(
            parts = document.parts.len(),
            sections = document.section_count(),
            vetoes = document.vetoes.len(),
            "walked bill {}",
            document.bill_id
        );

        Ok(document)
    }

    // ------------------------------------------------------------------------
    // Parts
    // ------------------------------------------------------------------------

    /// Parts either contain their sections or precede them as siblings
    fn walk_parts<N: DocumentNode>(&self, body: &N, bill_id: &str, vetoes: &mut Vec<Veto>) -> Vec<Part> {
        let mut parts: Vec<Part> = Vec::new();
        let mut part_counter = 0u32;

        for child in body.child_elements() {
            if child.is_tag(PART) {
                part_counter += 1;
                let mut part = self.part_header(&child, part_counter);
                for section in child.find_all(SECTION) {
                    part.sections.push(self.walk_section(&section, bill_id, vetoes));
                }
                parts.push(part);
            } else if child.is_tag(SECTION) {
                let section = self.walk_section(&child, bill_id, vetoes);
                current_part(&mut parts).sections.push(section);
            } else {
                // Wrapper elements (divisions, articles) may still hold sections
                for section in child.find_all(SECTION) {
                    let section = self.walk_section(&section, bill_id, vetoes);
                    current_part(&mut parts).sections.push(section);
                }
            }
        }

        parts
    }

    fn part_header<N: DocumentNode>(&self, part: &N, ordinal: u32) -> Part {
        let number = part
            .attr("number")
            .and_then(|n| n.parse().ok())
            .unwrap_or(ordinal);

        let paragraphs: Vec<String> = part
            .children_named(PARAGRAPH)
            .iter()
            .map(|p| clean_text(&p.text_content()))
            .filter(|t| !t.is_empty())
            .collect();

        let (labels, titles): (Vec<String>, Vec<String>) = paragraphs
            .into_iter()
            .partition(|t| t.to_uppercase().starts_with("PART"));

        let label = labels.into_iter().next().unwrap_or_default();
        let title = if titles.is_empty() {
            part.attr("title").unwrap_or_default()
        } else {
            titles.join(" - ")
        };

        Part {
            number,
            label,
            title,
            sections: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------------

    fn walk_section<N: DocumentNode>(&self, node: &N, bill_id: &str, vetoes: &mut Vec<Veto>) -> Section {
        let number = section_number(node);
        if number.is_empty() {
            warn!(bill = bill_id, "section without a number; extracting with empty number");
        }
        let reference = if number.is_empty() {
            String::new()
        } else {
            normalize_section(&format!("Section {}", number))
        };

        let mut section = Section::new(number, reference);
        section.section_type = node.attr("type");
        section.action = node.attr("action");
        section.caption = section_caption(node);
        section.history = node
            .find(HISTORY)
            .map(|h| clean_text(&h.text_content()))
            .filter(|h| !h.is_empty());
        section.raw_text = clean_text(&node.text_content());
        section.agency = self.section_agency(node);

        let cites = structured_cites(node);
        section.citation = cites.first().cloned();
        let mut references = scan_references(&section.raw_text);
        merge_references(&mut references, cites);
        section.statutory_references = references;

        let is_definitions = section
            .caption
            .as_ref()
            .map_or(false, |c| c.to_uppercase().contains("DEFINITIONS"));
        if is_definitions {
            section.definitions = section_definitions(node);
        }

        let scope = SectionScope {
            number: &section.number,
            agency: section.agency.as_ref(),
            bill_id,
        };

        let (provisos, conditions) = self.section_provisos(node, &scope);
        let (appropriations, declared_total) = self.section_appropriations(node, &scope, &provisos);
        let section_vetoes = self.section_vetoes(node, &scope);

        section.provisos = provisos.into_iter().map(ProvisoLink::Inline).collect();
        section.conditions = conditions;
        section.appropriations = appropriations;
        section.declared_total_cents = declared_total;
        for veto in section_vetoes {
            push_veto(vetoes, veto);
        }

        debug!(
            section = %section.number,
            appropriations = section.appropriations.len(),
            provisos = section.provisos.len(),
            conditions = section.conditions.len(),
            "walked section"
        );

        section
    }

    fn section_agency<N: DocumentNode>(&self, node: &N) -> Option<Agency> {
        let department = node.find(DEPARTMENT);
        let group_code = node.find(APPROPRIATIONS).and_then(|g| g.attr("agency"));

        let raw_name = department
            .as_ref()
            .map(|d| {
                let named = d.text_of(DEPT_NAME);
                if named.is_empty() && d.find(&["Index"]).is_none() {
                    d.text_content()
                } else {
                    named
                }
            })
            .map(|t| clean_text(&t))
            .unwrap_or_default();

        let code = group_code
            .or_else(|| node.attr("agency"))
            .or_else(|| department.as_ref().and_then(|d| d.attr("code")))
            .or_else(|| extract_agency_code(&raw_name));

        if raw_name.is_empty() && code.is_none() {
            return None;
        }

        let mut name = raw_name;
        if self.config.strip_agency_prefix {
            let prefixed = name
                .get(..AGENCY_PREFIX.len())
                .map_or(false, |p| p.eq_ignore_ascii_case(AGENCY_PREFIX));
            if prefixed {
                name = name[AGENCY_PREFIX.len()..].trim().to_string();
            }
        }

        let (name, program) = match name.split_once(|c: char| c == '—' || c == '–') {
            Some((agency, program)) => (agency.trim().to_string(), Some(program.trim().to_string())),
            None => (name, None),
        };

        let index = department
            .as_ref()
            .map(|d| clean_text(&d.text_of(&["Index"])))
            .filter(|i| !i.is_empty());

        Some(Agency {
            code,
            name,
            index,
            program,
        })
    }

    // ------------------------------------------------------------------------
    // Provisos + conditions
    // ------------------------------------------------------------------------

    fn section_provisos<N: DocumentNode>(
        &self,
        node: &N,
        scope: &SectionScope,
    ) -> (Vec<Proviso>, Vec<Condition>) {
        let mut provisos: Vec<Proviso> = Vec::new();
        let mut conditions = Vec::new();

        // Explicit <Proviso> elements first, in document order, including those on lines.
        // An unnumbered proviso repeated under several lines is collected once.
        for element in node.find_all(PROVISO) {
            let repeated = explicit_number(&element).is_none()
                && provisos.iter().any(|p| p.raw_text == explicit_text(&element));
            if !repeated {
                let position = provisos.len() + 1;
                provisos.push(self.explicit_proviso(&element, scope, position));
            }
        }

        // Numbered paragraphs after the intro marker
        let mut in_list = false;
        let mut current: Option<(String, Vec<String>)> = None;

        for paragraph in node.find_all_except(PARAGRAPH, NON_PROSE) {
            let text = paragraph.text_content().trim().to_string();
            if text.is_empty() {
                continue;
            }

            if !in_list && self.config.opens_proviso_list(&text) {
                in_list = true;
                continue;
            }

            if in_list {
                if let Some(caps) = NUMBERED_PARAGRAPH.captures(&text) {
                    if let Some((number, lines)) = current.take() {
                        provisos.push(self.build_proviso(scope, &number, lines));
                    }
                    current = Some((caps[1].to_string(), vec![text]));
                    continue;
                }
                if let Some((_, lines)) = current.as_mut() {
                    lines.push(text);
                    continue;
                }
            }

            self.collect_conditions(&text, &mut conditions);
        }

        if let Some((number, lines)) = current.take() {
            provisos.push(self.build_proviso(scope, &number, lines));
        }

        (provisos, conditions)
    }

    fn explicit_proviso<N: DocumentNode>(&self, element: &N, scope: &SectionScope, position: usize) -> Proviso {
        let number = explicit_number(element).unwrap_or_else(|| position.to_string());
        self.build_proviso(scope, &number, vec![explicit_text(element)])
    }

    fn build_proviso(&self, scope: &SectionScope, number: &str, lines: Vec<String>) -> Proviso {
        let raw_text = lines.join(" ");
        let category = self.classifier.classify(&raw_text);
        Proviso::new(scope.key(number), category, raw_text)
    }

    fn collect_conditions(&self, text: &str, conditions: &mut Vec<Condition>) {
        let clauses: Vec<String> = PROVIDED_CLAUSE
            .captures_iter(text)
            .map(|caps| format!("PROVIDED, That {}", clean_text(&caps[1])))
            .collect();

        if !clauses.is_empty() {
            for clause in clauses {
                let category = self.classifier.classify(&clause);
                conditions.push(Condition { text: clause, category });
            }
            return;
        }

        if self.config.is_condition_text(text) {
            let text = clean_text(text);
            let category = self.classifier.classify(&text);
            conditions.push(Condition { text, category });
        }
    }

    // ------------------------------------------------------------------------
    // Appropriations
    // ------------------------------------------------------------------------

    fn section_appropriations<N: DocumentNode>(
        &self,
        node: &N,
        scope: &SectionScope,
        section_provisos: &[Proviso],
    ) -> (Vec<Appropriation>, Option<i64>) {
        let mut appropriations = Vec::new();
        let mut declared_total: Option<i64> = None;

        for group in node.find_all(APPROPRIATIONS) {
            let change_type = ChangeType::from_attribute(group.attribute("appropType"));
            for line in group.find_all(APPROPRIATION) {
                appropriations.push(self.appropriation_line(&line, scope, change_type, section_provisos));
            }
            if let Some(total) = group.find(APPROPRIATION_TOTAL) {
                let cents = parse_amount(&total.text_of(DOLLAR_AMOUNT));
                declared_total = Some(declared_total.unwrap_or(0).saturating_add(cents));
            }
        }

        // Loose lines outside any <Appropriations> group
        for line in node.find_all_except(APPROPRIATION, APPROPRIATIONS) {
            let change_type = ChangeType::from_attribute(
                line.attribute("appropType").or_else(|| line.attribute("type")),
            );
            appropriations.push(self.appropriation_line(&line, scope, change_type, section_provisos));
        }

        (appropriations, declared_total)
    }

    fn appropriation_line<N: DocumentNode>(
        &self,
        line: &N,
        scope: &SectionScope,
        change_type: ChangeType,
        section_provisos: &[Proviso],
    ) -> Appropriation {
        let account_name = clean_account_name(&first_non_empty([
            line.text_of(ACCOUNT_NAME),
            line.attr("account").unwrap_or_default(),
        ]));
        let line_year = line
            .attr("fiscalYear")
            .and_then(|y| y.parse().ok())
            .or_else(|| extract_fiscal_year_tag(&account_name));

        let mut appropriation = Appropriation {
            section_number: scope.number.to_string(),
            bill_number: scope.bill_id.to_string(),
            agency_code: scope.agency.and_then(|a| a.code.clone()),
            agency_name: scope.agency.map(|a| a.name.clone()).unwrap_or_default(),
            program: scope.agency.and_then(|a| a.program.clone()),
            fund_type: extract_fund_type(&account_name),
            account_type: extract_account_type(&account_name),
            account_name,
            change_type,
            amount_text: String::new(),
            fiscal_year_amounts: BTreeMap::new(),
            biennial_cents: 0,
            provisos: Vec::new(),
            vetoed: is_line_vetoed(line),
        };

        let amounts = line.find_all(DOLLAR_AMOUNT);
        if amounts.is_empty() {
            warn!(section = scope.number, "appropriation line without a dollar amount");
        }

        let mut texts = Vec::new();
        for amount in amounts {
            let text = clean_text(&amount.text_content());
            let year = amount
                .attr("fiscalYear")
                .and_then(|y| y.parse().ok())
                .or(line_year);
            appropriation.add_amount(year, parse_amount(&text));
            texts.push(text);
        }
        appropriation.amount_text = texts.join("; ");

        let explicit: Vec<N> = line.find_all(PROVISO);
        let references: Vec<N> = line.find_all(PROVISO_REF);
        appropriation.provisos = if explicit.is_empty() && references.is_empty() {
            section_provisos.iter().cloned().map(ProvisoLink::Inline).collect()
        } else {
            explicit
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    // Same element already collected at section level: reuse its key
                    let text = explicit_text(p);
                    let proviso = section_provisos
                        .iter()
                        .find(|s| s.raw_text == text)
                        .cloned()
                        .unwrap_or_else(|| self.explicit_proviso(p, scope, i + 1));
                    ProvisoLink::Inline(proviso)
                })
                .collect()
        };

        // Key-only references; the linker resolves or flags them
        for reference in references {
            let number = reference
                .attr("number")
                .unwrap_or_else(|| clean_text(&reference.text_content()));
            appropriation.provisos.push(ProvisoLink::Unresolved {
                key: scope.key(proviso_ordinal(&number)),
            });
        }

        appropriation
    }

    // ------------------------------------------------------------------------
    // Vetoes
    // ------------------------------------------------------------------------

    fn section_vetoes<N: DocumentNode>(&self, node: &N, scope: &SectionScope) -> Vec<Veto> {
        let mut vetoes = Vec::new();

        if let Some(veto_type) = node.attribute("veto").and_then(VetoType::parse) {
            vetoes.push(make_veto(scope.number, veto_type, String::new()));
        }

        for element in line_vetoed_elements(node) {
            let text = clean_text(&element.text_content());
            vetoes.push(make_veto(scope.number, VetoType::LineItem, text));
        }

        vetoes
    }

    fn collect_document_vetoes<N: DocumentNode>(&self, root: &N, vetoes: &mut Vec<Veto>) {
        for note in root.find_all(VETO_NOTE) {
            let Some(section) = note.attr("section") else {
                warn!("veto note without a section attribute; skipped");
                continue;
            };
            let veto_type = note
                .attribute("type")
                .and_then(VetoType::parse)
                .unwrap_or(VetoType::Full);
            push_veto(vetoes, make_veto(&section, veto_type, clean_text(&note.text_content())));
        }

        let certified = [
            clean_text(&root.text_of(&["ApprovedDate"])),
            clean_text(&root.text_of(&["VetoAction"])),
        ];
        for caps in certified.iter().filter_map(|text| VETO_EXCEPTION.captures(text)) {
            for item in LIST_SPLIT.split(&caps[1]) {
                let item = item
                    .trim()
                    .trim_start_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
                    .trim();
                if item.is_empty() {
                    continue;
                }
                // "7(2)" names a subsection: the section survives in part
                let (section, veto_type) = match item.split_once('(') {
                    Some((section, _)) => (section.trim(), VetoType::Partial),
                    None => (item, VetoType::Full),
                };
                push_veto(vetoes, make_veto(section, veto_type, String::new()));
            }
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn first_non_empty<const N: usize>(candidates: [String; N]) -> String {
    candidates
        .into_iter()
        .find(|c| !c.trim().is_empty())
        .unwrap_or_default()
}

fn explicit_number<N: DocumentNode>(element: &N) -> Option<String> {
    element.attr("number").or_else(|| element.attr("id"))
}

fn explicit_text<N: DocumentNode>(element: &N) -> String {
    element.text_content().trim().to_string()
}

/// "(1)" / "1" → "1"
fn proviso_ordinal(reference: &str) -> &str {
    reference
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
}

fn current_part(parts: &mut Vec<Part>) -> &mut Part {
    if parts.is_empty() {
        parts.push(Part {
            number: 0,
            label: String::new(),
            title: String::new(),
            sections: Vec::new(),
        });
    }
    let last = parts.len() - 1;
    &mut parts[last]
}

fn section_number<N: DocumentNode>(node: &N) -> String {
    let from_header = node
        .find(SECTION_NUMBER)
        .map(|n| match n.child(&["Value"]) {
            Some(value) => value.text_content(),
            None => n.text_content(),
        })
        .map(|t| clean_text(&t))
        .unwrap_or_default();

    let number = first_non_empty([
        from_header,
        node.attr("number").unwrap_or_default(),
        node.attr("id").unwrap_or_default(),
    ]);

    // "Sec. 101." / "NEW SECTION. Sec. 5." → "101" / "5"
    let trimmed = number.trim_end_matches('.').trim();
    match trimmed.rsplit_once(' ') {
        Some((prefix, n)) if prefix.to_lowercase().contains("sec") => n.to_string(),
        _ => trimmed.to_string(),
    }
}

fn structured_cites<N: DocumentNode>(node: &N) -> Vec<StatutoryReference> {
    node.find_all(SECTION_CITE)
        .into_iter()
        .filter_map(|cite| {
            let title = cite.text_of(&["TitleNumber"]);
            let chapter = cite.text_of(&["ChapterNumber"]);
            let section = cite.text_of(&["SectionNumber"]);
            if title.is_empty() || chapter.is_empty() || section.is_empty() {
                return None;
            }
            Some(StatutoryReference::rcw_section(&title, &chapter, &section))
        })
        .collect()
}

fn section_caption<N: DocumentNode>(node: &N) -> Option<String> {
    node.child(SECTION_HEADER)
        .and_then(|h| h.find(CAPTION))
        .or_else(|| node.find(CAPTION))
        .map(|c| clean_text(&c.text_content()))
        .filter(|c| !c.is_empty())
}

/// `(n) "Term" means ...` paragraphs
fn section_definitions<N: DocumentNode>(node: &N) -> Vec<Definition> {
    node.find_all_except(PARAGRAPH, NON_PROSE)
        .iter()
        .filter_map(|p| {
            let text = clean_text(&p.text_content());
            let caps = DEFINITION.captures(&text)?;
            Some(Definition {
                number: caps[1].to_string(),
                term: caps[2].trim().to_string(),
                definition: caps[3].to_string(),
                full_text: text.clone(),
            })
        })
        .collect()
}

fn collect_enrollment<N: DocumentNode>(root: &N) -> Enrollment {
    let mut votes: Vec<VoteRecord> = Vec::new();
    for passed_by in root.find_all(PASSED_BY) {
        let Some(chamber) = passed_by.attr("chamber").as_deref().and_then(Chamber::parse) else {
            warn!("PassedBy without a recognizable chamber; skipped");
            continue;
        };
        let vote = VoteRecord {
            chamber,
            date: clean_text(&passed_by.text_of(&["PassedDate"])),
            yeas: passed_by.text_of(&["Yeas"]).parse().ok(),
            nays: passed_by.text_of(&["Nays"]).parse().ok(),
            signer: clean_text(&passed_by.text_of(&["Signer"])),
        };
        // A later record for the same chamber replaces the earlier one
        match votes.iter_mut().find(|v| v.chamber == chamber) {
            Some(existing) => *existing = vote,
            None => votes.push(vote),
        }
    }

    let certificate = root.find(CERTIFICATE).map(|c| Certificate {
        certifier: clean_text(&c.text_of(&["Certifier"])),
        certifier_position: clean_text(&c.text_of(&["CertifierPosition"])),
        text: clean_text(&c.text_of(PARAGRAPH)),
    });

    Enrollment {
        votes,
        approved_date: clean_text(&root.text_of(&["ApprovedDate"])),
        filed_date: clean_text(&root.text_of(&["FiledDate"])),
        read_first_time: clean_text(&root.text_of(&["ReadDate"])),
        governor: clean_text(&root.text_of(&["Governor"])),
        certificate,
    }
}

fn group_actions(document: &BillDocument) -> BTreeMap<LegislativeAction, Vec<ActionEntry>> {
    let mut grouped: BTreeMap<LegislativeAction, Vec<ActionEntry>> = BTreeMap::new();
    for section in document.sections() {
        let Some(action) = section.action.as_deref().and_then(LegislativeAction::parse) else {
            continue;
        };
        grouped.entry(action).or_default().push(ActionEntry {
            section_number: section.number.clone(),
            caption: section.caption.clone(),
            citation: section.citation.clone(),
        });
    }
    grouped
}

fn is_line_vetoed<N: DocumentNode>(node: &N) -> bool {
    match node.attribute("lineVeto") {
        Some(value) => !matches!(
            value.trim().to_lowercase().as_str(),
            "" | "false" | "no" | "0"
        ),
        None => false,
    }
}

/// Elements flagged `lineVeto`, outermost only
fn line_vetoed_elements<N: DocumentNode>(node: &N) -> Vec<N> {
    let mut found = Vec::new();
    for child in node.child_elements() {
        if is_line_vetoed(&child) {
            found.push(child);
        } else {
            found.extend(line_vetoed_elements(&child));
        }
    }
    found
}

fn make_veto(section_number: &str, veto_type: VetoType, text: String) -> Veto {
    let section_number = section_number.trim().to_string();
    Veto {
        section_reference: normalize_section(&format!("Section {}", section_number)),
        section_number,
        veto_type,
        text,
    }
}

/// One veto per (section, type); line items are further distinguished by their text
fn push_veto(vetoes: &mut Vec<Veto>, veto: Veto) {
    let existing = vetoes.iter_mut().find(|v| {
        v.section_number == veto.section_number
            && v.veto_type == veto.veto_type
            && (veto.veto_type != VetoType::LineItem || v.text == veto.text)
    });

    match existing {
        Some(v) => {
            if v.text.is_empty() {
                v.text = veto.text;
            }
        }
        None => vetoes.push(veto),
    }
}

fn apply_veto_status(document: &mut BillDocument) {
    let vetoes = document.vetoes.clone();
    for section in document.sections_mut() {
        for veto in vetoes.iter().filter(|v| v.section_number == section.number) {
            section.veto_status = section.veto_status.absorb(veto.veto_type);
        }
    }
}

fn distinct_agencies(document: &BillDocument) -> Vec<Agency> {
    let mut agencies: Vec<Agency> = Vec::new();
    for agency in document.sections().filter_map(|s| s.agency.as_ref()) {
        let known = agencies
            .iter()
            .any(|a| a.name == agency.name && a.code == agency.code);
        if !known {
            agencies.push(agency.clone());
        }
    }
    agencies
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SpanCategory;
    use crate::document::parse_xml;
    use crate::entities::{ProgramKind, VetoStatus};

    fn walk(xml: &str) -> BillDocument {
        let config = ExtractorConfig::default();
        let tree = parse_xml(xml).unwrap();
        DocumentWalker::new(&config).walk(&tree.root_element()).unwrap()
    }

    const WA_BILL: &str = r#"<?xml version="1.0"?>
<CertifiedBill>
  <Bill type="bill">
    <BillHeading>
      <ShortBillId>ESSB 5167</ShortBillId>
      <Session>2025 Regular Session</Session>
      <BriefDescription>Making 2025-2027 fiscal biennium operating appropriations.</BriefDescription>
      <BillTitle>AN ACT Relating to fiscal matters; amending RCW 43.88.110; creating new sections.</BillTitle>
    </BillHeading>
    <BillBody>
      <Part><P>PART I</P><P>GENERAL GOVERNMENT</P></Part>
      <BillSection type="new">
        <BillSectionHeader>
          <BillSectionNumber><Value>101</Value></BillSectionNumber>
          <Department><DeptName><P>FOR THE HOUSE OF REPRESENTATIVES</P></DeptName><Index>HOUSE</Index></Department>
        </BillSectionHeader>
        <Appropriations agency="011" appropType="appropriation">
          <Appropriation><AccountName><BudgetP>General Fund—State Appropriation (FY 2026)</BudgetP></AccountName><DollarAmount>$1,000,000</DollarAmount></Appropriation>
          <Appropriation><AccountName><BudgetP>General Fund—State Appropriation (FY 2027)</BudgetP></AccountName><DollarAmount>$1,200,000</DollarAmount></Appropriation>
          <AppropriationTotal><DollarAmount>$2,200,000</DollarAmount></AppropriationTotal>
        </Appropriations>
        <P>The appropriations in this section are subject to the following conditions and limitations:</P>
        <P>(1) The chief clerk shall report annually on staffing.</P>
        <P>(a) The report must include vacancies.</P>
        <P>(2) $50,000 is provided solely for a study under 42 U.S.C. Sec. 1396.</P>
      </BillSection>
      <BillSection type="new">
        <BillSectionHeader>
          <BillSectionNumber><Value>102</Value></BillSectionNumber>
          <Department><DeptName><P>FOR THE DEPARTMENT OF SOCIAL AND HEALTH SERVICES—MENTAL HEALTH PROGRAM</P></DeptName></Department>
        </BillSectionHeader>
        <Appropriations agency="300" appropType="reappropriation">
          <Appropriation><AccountName><BudgetP>Pension Trust Account—Federal Appropriation</BudgetP></AccountName><DollarAmount>$300</DollarAmount></Appropriation>
        </Appropriations>
        <P>It is the intent of the legislature that services continue. PROVIDED, That the department consults tribes.</P>
      </BillSection>
      <Part><P>PART II</P><P>HUMAN SERVICES</P></Part>
      <BillSection type="amendatory" action="amend">
        <BillSectionHeader><BillSectionNumber><Value>201</Value></BillSectionNumber></BillSectionHeader>
        <P>RCW 70.14.060 and 2019 c 1 s 2 are each amended to read as follows:</P>
        <SectionCite><TitleNumber>70</TitleNumber><ChapterNumber>14</ChapterNumber><SectionNumber>060</SectionNumber></SectionCite>
      </BillSection>
    </BillBody>
  </Bill>
  <EnrollingCertificate>
    <EffectiveDate>July 1, 2025</EffectiveDate>
    <VetoAction>PARTIAL VETO</VetoAction>
    <ApprovedDate>Approved May 20, 2025, with the exception of sections 201 and 102(3), which are vetoed.</ApprovedDate>
  </EnrollingCertificate>
</CertifiedBill>"#;

    #[test]
    fn test_walk_metadata() {
        let doc = walk(WA_BILL);
        assert_eq!(doc.bill_id, "ESSB 5167");
        assert_eq!(doc.session, "2025 Regular Session");
        assert_eq!(doc.biennium, "2025-2027");
        assert_eq!(doc.fiscal_years, vec![2025, 2026, 2027]);
        assert_eq!(doc.effective_date, "July 1, 2025");
        assert_eq!(doc.veto_action, "PARTIAL VETO");
        assert_eq!(doc.short_title, "Making 2025-2027 fiscal biennium operating appropriations.");
        assert_eq!(doc.statutory_references.len(), 1);
        assert_eq!(doc.statutory_references[0].normalized, "RCW 43.88.110");
    }

    #[test]
    fn test_walk_parts_keep_document_order() {
        let doc = walk(WA_BILL);
        assert_eq!(doc.parts.len(), 2);
        assert_eq!(doc.parts[0].number, 1);
        assert_eq!(doc.parts[0].label, "PART I");
        assert_eq!(doc.parts[0].title, "GENERAL GOVERNMENT");
        let numbers: Vec<&str> = doc.parts[0].sections.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "102"]);
        assert_eq!(doc.parts[1].sections[0].number, "201");
        assert_eq!(doc.parts[1].sections[0].reference, "Sec. 201");
    }

    #[test]
    fn test_walk_agency_and_program() {
        let doc = walk(WA_BILL);
        let house = doc.section("101").unwrap().agency.clone().unwrap();
        assert_eq!(house.name, "HOUSE OF REPRESENTATIVES");
        assert_eq!(house.code.as_deref(), Some("011"));
        assert_eq!(house.index.as_deref(), Some("HOUSE"));

        let dshs = doc.section("102").unwrap().agency.clone().unwrap();
        assert_eq!(dshs.name, "DEPARTMENT OF SOCIAL AND HEALTH SERVICES");
        assert_eq!(dshs.program.as_deref(), Some("MENTAL HEALTH PROGRAM"));
        assert_eq!(doc.agencies.len(), 2);
    }

    #[test]
    fn test_walk_appropriation_lines() {
        let doc = walk(WA_BILL);
        let section = doc.section("101").unwrap();
        assert_eq!(section.appropriations.len(), 2);
        assert_eq!(section.declared_total_cents, Some(220_000_000));

        let first = &section.appropriations[0];
        assert_eq!(first.account_name, "General Fund-State Appropriation (FY 2026)");
        assert_eq!(first.fund_type, "General Fund");
        assert_eq!(first.account_type.as_deref(), Some("State"));
        assert_eq!(first.fiscal_year_amounts.get(&2026), Some(&100_000_000));
        assert_eq!(first.biennial_cents, 0);
        assert_eq!(first.amount_text, "$1,000,000");
        assert_eq!(first.change_type, ChangeType::NewAppropriation);

        let reapprop = &doc.section("102").unwrap().appropriations[0];
        assert_eq!(reapprop.change_type, ChangeType::Reappropriation);
        assert_eq!(reapprop.biennial_cents, 30_000);
        assert_eq!(reapprop.fund_type, "Trust Fund");
        assert_eq!(reapprop.account_type.as_deref(), Some("Federal"));
    }

    #[test]
    fn test_walk_numbered_provisos() {
        let doc = walk(WA_BILL);
        let section = doc.section("101").unwrap();
        assert_eq!(section.provisos.len(), 2);

        let ProvisoLink::Inline(first) = &section.provisos[0] else {
            panic!("walker emits inline provisos");
        };
        assert_eq!(first.key.proviso_number, "1");
        assert_eq!(first.key.section, "101");
        assert_eq!(first.key.agency, "HOUSE OF REPRESENTATIVES");
        assert_eq!(first.key.bill_number, "ESSB 5167");
        assert_eq!(first.category, SpanCategory::Reporting);
        assert!(first.normalized_text.ends_with("The report must include vacancies."));

        let ProvisoLink::Inline(second) = &section.provisos[1] else {
            panic!("walker emits inline provisos");
        };
        assert_eq!(second.category, SpanCategory::Restriction);

        // Every line carries inline copies of the section's provisos
        assert_eq!(section.appropriations[0].provisos.len(), 2);
        assert_eq!(section.appropriations[1].provisos.len(), 2);
    }

    #[test]
    fn test_walk_conditions_and_references() {
        let doc = walk(WA_BILL);
        let section = doc.section("102").unwrap();
        assert!(section.provisos.is_empty());
        assert_eq!(section.conditions.len(), 1);
        assert_eq!(section.conditions[0].text, "PROVIDED, That the department consults tribes");

        let amendatory = doc.section("201").unwrap();
        assert_eq!(amendatory.section_type.as_deref(), Some("amendatory"));
        assert_eq!(amendatory.action.as_deref(), Some("amend"));
        let refs: Vec<&str> = amendatory
            .statutory_references
            .iter()
            .map(|r| r.normalized.as_str())
            .collect();
        assert_eq!(refs, vec!["RCW 70.14.060"]);

        let house = doc.section("101").unwrap();
        assert!(house
            .statutory_references
            .iter()
            .any(|r| r.normalized == "42 U.S.C. Sec. 1396"));
    }

    #[test]
    fn test_walk_vetoes_from_approval_text() {
        let doc = walk(WA_BILL);
        assert_eq!(doc.vetoes.len(), 2);
        assert_eq!(doc.vetoes[0].section_number, "201");
        assert_eq!(doc.vetoes[0].veto_type, VetoType::Full);
        assert_eq!(doc.vetoes[0].section_reference, "Sec. 201");
        assert_eq!(doc.vetoes[1].section_number, "102");
        assert_eq!(doc.vetoes[1].veto_type, VetoType::Partial);

        assert_eq!(doc.section("201").unwrap().veto_status, VetoStatus::Full);
        assert_eq!(doc.section("102").unwrap().veto_status, VetoStatus::Partial);
        assert_eq!(doc.section("101").unwrap().veto_status, VetoStatus::None);
    }

    #[test]
    fn test_walk_generic_vocabulary_and_line_veto() {
        let xml = r#"<bill id="HB 1" biennium="2023-25">
          <part number="3" title="Capital">
            <section number="5" veto="partial">
              <agency code="105">Office of Financial Management</agency>
              <appropriation appropType="reappropriation" account="State Building Construction Account—State">
                <amount fiscalYear="2024">$1.5 million</amount>
                <amount fiscalYear="2025">$500,000</amount>
              </appropriation>
              <appropriation lineVeto="true" account="Local Account"><amount>$10</amount></appropriation>
              <Proviso number="1">The office shall report by June 30.</Proviso>
            </section>
          </part>
        </bill>"#;
        let doc = walk(xml);

        assert_eq!(doc.bill_id, "HB 1");
        assert_eq!(doc.fiscal_years, vec![2023, 2024, 2025]);
        assert_eq!(doc.parts[0].number, 3);
        assert_eq!(doc.parts[0].title, "Capital");

        let section = doc.section("5").unwrap();
        let agency = section.agency.as_ref().unwrap();
        assert_eq!(agency.code.as_deref(), Some("105"));
        assert_eq!(agency.name, "Office of Financial Management");

        assert_eq!(section.appropriations.len(), 2);
        let capital = &section.appropriations[0];
        assert_eq!(capital.change_type, ChangeType::Reappropriation);
        assert_eq!(capital.fiscal_year_amounts.get(&2024), Some(&150_000_000));
        assert_eq!(capital.fiscal_year_amounts.get(&2025), Some(&50_000_000));
        assert!(!capital.vetoed);
        assert!(section.appropriations[1].vetoed);

        assert_eq!(section.provisos.len(), 1);
        assert_eq!(section.provisos[0].key().proviso_number, "1");

        assert_eq!(section.veto_status, VetoStatus::Partial);
        let types: Vec<VetoType> = doc.vetoes.iter().map(|v| v.veto_type).collect();
        assert_eq!(types, vec![VetoType::Partial, VetoType::LineItem]);
        assert_eq!(doc.vetoes[1].text, "$10");
    }

    #[test]
    fn test_line_level_provisos_and_references() {
        let xml = r#"<Bill id="SB 2"><BillBody>
          <BillSection number="3">
            <Appropriations>
              <Appropriation><AccountName>General Fund—State Appropriation</AccountName><DollarAmount>$1</DollarAmount>
                <Proviso number="1">The agency shall report.</Proviso>
                <ProvisoRef number="9"/>
              </Appropriation>
            </Appropriations>
          </BillSection>
        </BillBody></Bill>"#;
        let doc = walk(xml);
        let section = doc.section("3").unwrap();
        assert_eq!(section.provisos.len(), 1);

        let links = &section.appropriations[0].provisos;
        assert_eq!(links.len(), 2);
        assert!(matches!(&links[0], ProvisoLink::Inline(p) if p.key.proviso_number == "1"));
        assert!(matches!(&links[1], ProvisoLink::Unresolved { key } if key.proviso_number == "9"));
    }

    #[test]
    fn test_repeated_unnumbered_proviso_collected_once() {
        let xml = r#"<Bill id="SB 1"><BillBody>
          <BillSection number="3">
            <Appropriations agency="011">
              <Appropriation><AccountName>General Fund—State Appropriation (FY 2026)</AccountName><DollarAmount>$1</DollarAmount>
                <Proviso>The agency shall report annually.</Proviso>
              </Appropriation>
              <Appropriation><AccountName>General Fund—State Appropriation (FY 2027)</AccountName><DollarAmount>$2</DollarAmount>
                <Proviso>The agency shall report annually.</Proviso>
              </Appropriation>
            </Appropriations>
          </BillSection>
        </BillBody></Bill>"#;
        let doc = walk(xml);
        let section = doc.section("3").unwrap();

        assert_eq!(section.provisos.len(), 1);
        assert_eq!(section.provisos[0].key().proviso_number, "1");
        for line in &section.appropriations {
            assert_eq!(line.provisos.len(), 1);
            assert_eq!(line.provisos[0].key().proviso_number, "1");
        }
    }

    #[test]
    fn test_distinct_unnumbered_provisos_keep_positions() {
        let xml = r#"<Bill id="SB 1"><BillBody>
          <BillSection number="3">
            <Proviso>The agency shall report annually.</Proviso>
            <Proviso>Funds may not be used for travel.</Proviso>
            <Proviso number="7">The agency shall report annually.</Proviso>
          </BillSection>
        </BillBody></Bill>"#;
        let doc = walk(xml);
        let numbers: Vec<String> = doc
            .section("3")
            .unwrap()
            .provisos
            .iter()
            .map(|p| p.key().proviso_number.clone())
            .collect();
        assert_eq!(numbers, vec!["1", "2", "7"]);
    }

    #[test]
    fn test_proviso_ref_text_is_parenthesized_number() {
        let xml = r#"<Bill id="SB 2"><BillBody>
          <BillSection number="4">
            <Appropriations>
              <Appropriation><AccountName>General Fund—State Appropriation</AccountName><DollarAmount>$1</DollarAmount>
                <ProvisoRef>(1)</ProvisoRef>
              </Appropriation>
            </Appropriations>
          </BillSection>
        </BillBody></Bill>"#;
        let doc = walk(xml);
        let links = &doc.section("4").unwrap().appropriations[0].provisos;
        assert!(matches!(&links[0], ProvisoLink::Unresolved { key } if key.proviso_number == "1"));
        assert_eq!(proviso_ordinal(" (12) "), "12");
        assert_eq!(proviso_ordinal("3"), "3");
    }

    const ENROLLED: &str = r#"<CertifiedBill>
  <Bill id="E2SHB 1163">
    <BillBody>
      <BillSection type="new" action="addsect">
        <BillSectionHeader>
          <BillSectionNumber><Value>1</Value></BillSectionNumber>
          <SectionCaption>DEFINITIONS.</SectionCaption>
        </BillSectionHeader>
        <P>The definitions in this section apply throughout this chapter.</P>
        <P>(1) "Department" means the department of licensing.</P>
        <P>(2) “Permit” means a permit to purchase issued under Initiative Measure No. 1639.</P>
      </BillSection>
      <BillSection type="amendatory" action="amend">
        <BillSectionHeader>
          <BillSectionNumber><Value>2</Value></BillSectionNumber>
          <SectionCite><TitleNumber>9</TitleNumber><ChapterNumber>41</ChapterNumber><SectionNumber>090</SectionNumber></SectionCite>
        </BillSectionHeader>
        <P>A court may issue an extreme risk protection order.</P>
        <History>2019 c 246 s 3</History>
      </BillSection>
      <BillSection action="repeal">
        <BillSectionHeader><BillSectionNumber><Value>3</Value></BillSectionNumber></BillSectionHeader>
        <P>RCW 9.41.094 is repealed.</P>
      </BillSection>
    </BillBody>
  </Bill>
  <EnrollingCertificate>
    <PassedBy chamber="h"><PassedDate>March 8, 2025</PassedDate><Yeas>57</Yeas><Nays>40</Nays><Signer>Laurie Jinkins</Signer></PassedBy>
    <PassedBy chamber="s"><PassedDate>April 14, 2025</PassedDate><Yeas>29</Yeas><Nays>20</Nays></PassedBy>
    <PassedBy chamber="x"><Yeas>1</Yeas></PassedBy>
    <ApprovedDate>Approved May 20, 2025.</ApprovedDate>
    <FiledDate>Filed in Office of Secretary of State May 21, 2025.</FiledDate>
    <Governor>Bob Ferguson</Governor>
    <Certificate>
      <Certifier>Bernard Dean</Certifier>
      <CertifierPosition>Chief Clerk of the House of Representatives</CertifierPosition>
      <P>I certify that the attached is enrolled House Bill No. 1163.</P>
    </Certificate>
  </EnrollingCertificate>
</CertifiedBill>"#;

    #[test]
    fn test_walk_votes_dates_and_certificate() {
        let doc = walk(ENROLLED);
        let enrollment = &doc.enrollment;

        assert_eq!(enrollment.votes.len(), 2);
        let house = enrollment.vote(Chamber::House).unwrap();
        assert_eq!(house.date, "March 8, 2025");
        assert_eq!(house.yeas, Some(57));
        assert_eq!(house.nays, Some(40));
        assert_eq!(house.signer, "Laurie Jinkins");
        let senate = enrollment.vote(Chamber::Senate).unwrap();
        assert_eq!(senate.yeas, Some(29));
        assert_eq!(senate.signer, "");

        assert_eq!(enrollment.approved_date, "Approved May 20, 2025.");
        assert_eq!(enrollment.filed_date, "Filed in Office of Secretary of State May 21, 2025.");
        assert_eq!(enrollment.governor, "Bob Ferguson");
        assert_eq!(enrollment.read_first_time, "");

        let certificate = enrollment.certificate.as_ref().unwrap();
        assert_eq!(certificate.certifier, "Bernard Dean");
        assert_eq!(certificate.certifier_position, "Chief Clerk of the House of Representatives");
        assert!(certificate.text.starts_with("I certify"));
    }

    #[test]
    fn test_walk_definitions_only_in_definitions_section() {
        let doc = walk(ENROLLED);
        let section = doc.section("1").unwrap();
        assert_eq!(section.caption.as_deref(), Some("DEFINITIONS."));
        assert_eq!(section.definitions.len(), 2);
        assert_eq!(section.definitions[0].number, "1");
        assert_eq!(section.definitions[0].term, "Department");
        assert_eq!(section.definitions[0].definition, "means the department of licensing.");
        assert_eq!(section.definitions[1].term, "Permit");

        assert!(doc.section("2").unwrap().definitions.is_empty());
        assert_eq!(doc.definitions().count(), 2);
    }

    #[test]
    fn test_walk_caption_history_and_citation() {
        let doc = walk(ENROLLED);
        let amended = doc.section("2").unwrap();
        assert_eq!(amended.caption, None);
        assert_eq!(amended.history.as_deref(), Some("2019 c 246 s 3"));
        assert_eq!(
            amended.citation.as_ref().map(|c| c.normalized.as_str()),
            Some("RCW 9.41.090")
        );
        assert_eq!(doc.section("1").unwrap().history, None);
    }

    #[test]
    fn test_walk_groups_legislative_actions() {
        let doc = walk(ENROLLED);
        let actions = &doc.legislative_actions;
        assert_eq!(actions.len(), 3);

        let added = &actions[&LegislativeAction::AddSection];
        assert_eq!(added[0].section_number, "1");
        assert_eq!(added[0].caption.as_deref(), Some("DEFINITIONS."));

        let amended = &actions[&LegislativeAction::Amend];
        assert_eq!(amended[0].section_number, "2");
        assert_eq!(
            amended[0].citation.as_ref().map(|c| c.normalized.as_str()),
            Some("RCW 9.41.090")
        );
        assert_eq!(actions[&LegislativeAction::Repeal][0].section_number, "3");
        assert!(!actions.contains_key(&LegislativeAction::Recodify));
    }

    #[test]
    fn test_walk_programs() {
        let doc = walk(ENROLLED);
        let names: Vec<&str> = doc.programs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Initiative Measure No. 1639", "Extreme Risk Protection Order"]);

        let budget = walk(WA_BILL);
        assert_eq!(budget.programs.len(), 1);
        assert_eq!(budget.programs[0].kind, ProgramKind::Agency);
        assert_eq!(budget.programs[0].name, "MENTAL HEALTH PROGRAM");
    }

    #[test]
    fn test_walk_is_fail_soft_for_malformed_sections() {
        let xml = r#"<Bill><BillBody>
            <BillSection><P>No header here.</P></BillSection>
            <BillSection><BillSectionHeader><BillSectionNumber><Value>2</Value></BillSectionNumber></BillSectionHeader>
              <Appropriations><Appropriation><AccountName>Account</AccountName></Appropriation></Appropriations>
            </BillSection>
        </BillBody></Bill>"#;
        let doc = walk(xml);

        assert_eq!(doc.bill_id, "");
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].number, 0);
        assert_eq!(doc.parts[0].sections.len(), 2);
        assert_eq!(doc.parts[0].sections[0].number, "");
        assert_eq!(doc.parts[0].sections[0].reference, "");

        let line = &doc.parts[0].sections[1].appropriations[0];
        assert_eq!(line.total_cents(), 0);
        assert_eq!(line.amount_text, "");
    }

    #[test]
    fn test_walk_rejects_non_bill_root() {
        let config = ExtractorConfig::default();
        let tree = parse_xml("<html><body/></html>").unwrap();
        let result = DocumentWalker::new(&config).walk(&tree.root_element());
        assert!(matches!(result, Err(ExtractionError::UnexpectedRoot { found }) if found == "html"));
    }

    #[test]
    fn test_veto_notes_merge_with_attributes() {
        let xml = r#"<Bill id="SB 9"><BillBody>
            <BillSection number="4" veto="full"><P>Text</P></BillSection>
            <VetoNote section="4">Vetoed as duplicative.</VetoNote>
            <VetoNote>Orphan note</VetoNote>
        </BillBody></Bill>"#;
        let doc = walk(xml);
        assert_eq!(doc.vetoes.len(), 1);
        assert_eq!(doc.vetoes[0].text, "Vetoed as duplicative.");
        assert_eq!(doc.section("4").unwrap().veto_status, VetoStatus::Full);
    }

    #[test]
    fn test_section_number_variants() {
        let tree = parse_xml(r#"<BillSection><BillSectionHeader><BillSectionNumber>Sec. 12A.</BillSectionNumber></BillSectionHeader></BillSection>"#).unwrap();
        assert_eq!(section_number(&tree.root_element()), "12A");

        let tree = parse_xml(r#"<section id="7"/>"#).unwrap();
        assert_eq!(section_number(&tree.root_element()), "7");
    }
}
