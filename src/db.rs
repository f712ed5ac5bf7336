// 🗄️ SQLite Store - BillDocument → relational rows
//
// Schema DDL runs as one transaction (all-or-nothing). Each bill insert is one
// transaction too: re-inserting a bill replaces its previous rows through
// ON DELETE CASCADE. Provisos keep the composite natural key as a UNIQUE constraint
// plus a SHA-256 content hash of their normalized text.

use crate::entities::{BillDocument, ProvisoLink};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Tables `count_rows` will accept
pub const TABLES: &[&str] = &[
    "bills",
    "parts",
    "sections",
    "appropriations",
    "provisos",
    "appropriation_provisos",
    "statutory_references",
    "vetoes",
    "votes",
    "definitions",
    "programs",
    "extraction_log",
];

pub fn setup_database(conn: &mut Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    let tx = conn.transaction()?;

    // ==========================================================================
    // Bills + structure
    // ==========================================================================
    tx.execute(
        "CREATE TABLE IF NOT EXISTS bills (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_id TEXT UNIQUE NOT NULL,
            short_title TEXT NOT NULL,
            session TEXT NOT NULL,
            biennium TEXT NOT NULL,
            fiscal_years TEXT NOT NULL,
            effective_date TEXT NOT NULL,
            approved_date TEXT NOT NULL,
            filed_date TEXT NOT NULL,
            governor TEXT NOT NULL,
            total_cents INTEGER NOT NULL,
            vetoed_cents INTEGER NOT NULL,
            parser_version TEXT NOT NULL,
            extracted_at TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            number INTEGER NOT NULL,
            label TEXT NOT NULL,
            title TEXT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            part_ref INTEGER NOT NULL REFERENCES parts(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            number TEXT NOT NULL,
            reference TEXT NOT NULL,
            section_type TEXT,
            action TEXT,
            caption TEXT,
            history TEXT,
            agency_code TEXT,
            agency_name TEXT,
            program TEXT,
            veto_status TEXT NOT NULL,
            declared_total_cents INTEGER,
            raw_text TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Money + provisos
    // ==========================================================================
    tx.execute(
        "CREATE TABLE IF NOT EXISTS appropriations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            section_ref INTEGER NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            section_number TEXT NOT NULL,
            agency_code TEXT,
            agency_name TEXT NOT NULL,
            program TEXT,
            account_name TEXT NOT NULL,
            fund_type TEXT NOT NULL,
            account_type TEXT,
            change_type TEXT NOT NULL,
            amount_text TEXT NOT NULL,
            fiscal_year_amounts TEXT NOT NULL,
            biennial_cents INTEGER NOT NULL,
            total_cents INTEGER NOT NULL,
            vetoed INTEGER NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS provisos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            bill_number TEXT NOT NULL,
            section_number TEXT NOT NULL,
            agency TEXT NOT NULL,
            proviso_number TEXT NOT NULL,
            category TEXT NOT NULL,
            raw_text TEXT NOT NULL,
            normalized_text TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            UNIQUE (bill_number, section_number, agency, proviso_number)
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS appropriation_provisos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            appropriation_ref INTEGER NOT NULL REFERENCES appropriations(id) ON DELETE CASCADE,
            proviso_ref INTEGER REFERENCES provisos(id) ON DELETE CASCADE,
            proviso_number TEXT NOT NULL,
            resolved INTEGER NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // References, vetoes, run log
    // ==========================================================================
    tx.execute(
        "CREATE TABLE IF NOT EXISTS statutory_references (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            section_ref INTEGER REFERENCES sections(id) ON DELETE CASCADE,
            citation TEXT NOT NULL,
            kind TEXT NOT NULL,
            normalized TEXT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS vetoes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            section_number TEXT NOT NULL,
            section_reference TEXT NOT NULL,
            veto_type TEXT NOT NULL,
            text TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Enrollment, definitions, programs
    // ==========================================================================
    tx.execute(
        "CREATE TABLE IF NOT EXISTS votes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            chamber TEXT NOT NULL,
            passed_date TEXT NOT NULL,
            yeas INTEGER,
            nays INTEGER,
            signer TEXT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS definitions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            section_ref INTEGER NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            number TEXT NOT NULL,
            term TEXT NOT NULL,
            definition TEXT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS programs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_ref INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
            kind TEXT NOT NULL,
            name TEXT NOT NULL,
            number TEXT,
            agency TEXT
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS extraction_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id TEXT UNIQUE NOT NULL,
            bill_id TEXT NOT NULL,
            parser_version TEXT NOT NULL,
            extracted_at TEXT NOT NULL,
            sections INTEGER NOT NULL,
            appropriations INTEGER NOT NULL,
            provisos INTEGER NOT NULL,
            unresolved_links INTEGER NOT NULL,
            total_cents INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_sections_number ON sections(bill_ref, number)",
        [],
    )?;

    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_appropriations_agency ON appropriations(agency_code)",
        [],
    )?;

    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_provisos_hash ON provisos(content_hash)",
        [],
    )?;

    tx.commit().context("Failed to commit schema")?;
    Ok(())
}

// ============================================================================
// INSERT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertSummary {
    pub run_id: String,
    /// True when an earlier copy of the bill was replaced
    pub replaced: bool,
    pub parts: usize,
    pub sections: usize,
    pub appropriations: usize,
    pub provisos: usize,
    pub references: usize,
    pub vetoes: usize,
    pub votes: usize,
    pub definitions: usize,
    pub programs: usize,
}

/// Store one document; everything or nothing
pub fn insert_bill(conn: &mut Connection, document: &BillDocument) -> Result<InsertSummary> {
    let tx = conn.transaction()?;
    let mut summary = InsertSummary {
        run_id: uuid::Uuid::new_v4().to_string(),
        ..InsertSummary::default()
    };

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM bills WHERE bill_id = ?1",
            params![document.bill_id],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        tx.execute("DELETE FROM bills WHERE id = ?1", params![id])?;
        summary.replaced = true;
    }

    tx.execute(
        "INSERT INTO bills (
            bill_id, short_title, session, biennium, fiscal_years, effective_date,
            approved_date, filed_date, governor,
            total_cents, vetoed_cents, parser_version, extracted_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            document.bill_id,
            document.short_title,
            document.session,
            document.biennium,
            serde_json::to_string(&document.fiscal_years)?,
            document.effective_date,
            document.enrollment.approved_date,
            document.enrollment.filed_date,
            document.enrollment.governor,
            document.fiscal_impact.total_cents,
            document.fiscal_impact.vetoed_cents,
            document.parser_version,
            document.extracted_at.to_rfc3339(),
        ],
    )?;
    let bill_ref = tx.last_insert_rowid();

    // Canonical provisos first so links can point at their row ids
    let mut proviso_rows = Vec::with_capacity(document.provisos.len());
    for proviso in &document.provisos {
        tx.execute(
            "INSERT INTO provisos (
                bill_ref, bill_number, section_number, agency, proviso_number,
                category, raw_text, normalized_text, content_hash
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                bill_ref,
                proviso.key.bill_number,
                proviso.key.section,
                proviso.key.agency,
                proviso.key.proviso_number,
                proviso.category.as_str(),
                proviso.raw_text,
                proviso.normalized_text,
                proviso.content_hash(),
            ],
        )
        .with_context(|| format!("Failed to store proviso {}", proviso.key))?;
        proviso_rows.push(tx.last_insert_rowid());
        summary.provisos += 1;
    }

    for reference in &document.statutory_references {
        tx.execute(
            "INSERT INTO statutory_references (bill_ref, section_ref, citation, kind, normalized)
             VALUES (?1, NULL, ?2, ?3, ?4)",
            params![bill_ref, reference.citation, reference.kind.as_str(), reference.normalized],
        )?;
        summary.references += 1;
    }

    for (part_position, part) in document.parts.iter().enumerate() {
        tx.execute(
            "INSERT INTO parts (bill_ref, position, number, label, title) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![bill_ref, part_position as i64, part.number, part.label, part.title],
        )?;
        let part_ref = tx.last_insert_rowid();
        summary.parts += 1;

        for (section_position, section) in part.sections.iter().enumerate() {
            let agency = section.agency.as_ref();
            tx.execute(
                "INSERT INTO sections (
                    bill_ref, part_ref, position, number, reference, section_type, action,
                    caption, history, agency_code, agency_name, program, veto_status,
                    declared_total_cents, raw_text
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    bill_ref,
                    part_ref,
                    section_position as i64,
                    section.number,
                    section.reference,
                    section.section_type,
                    section.action,
                    section.caption,
                    section.history,
                    agency.and_then(|a| a.code.clone()),
                    agency.map(|a| a.name.clone()),
                    agency.and_then(|a| a.program.clone()),
                    section.veto_status.as_str(),
                    section.declared_total_cents,
                    section.raw_text,
                ],
            )?;
            let section_ref = tx.last_insert_rowid();
            summary.sections += 1;

            for definition in &section.definitions {
                tx.execute(
                    "INSERT INTO definitions (bill_ref, section_ref, number, term, definition)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        bill_ref,
                        section_ref,
                        definition.number,
                        definition.term,
                        definition.definition
                    ],
                )?;
                summary.definitions += 1;
            }

            for reference in &section.statutory_references {
                tx.execute(
                    "INSERT INTO statutory_references (bill_ref, section_ref, citation, kind, normalized)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        bill_ref,
                        section_ref,
                        reference.citation,
                        reference.kind.as_str(),
                        reference.normalized
                    ],
                )?;
                summary.references += 1;
            }

            for appropriation in &section.appropriations {
                tx.execute(
                    "INSERT INTO appropriations (
                        bill_ref, section_ref, section_number, agency_code, agency_name, program,
                        account_name, fund_type, account_type, change_type, amount_text,
                        fiscal_year_amounts, biennial_cents, total_cents, vetoed
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    params![
                        bill_ref,
                        section_ref,
                        appropriation.section_number,
                        appropriation.agency_code,
                        appropriation.agency_name,
                        appropriation.program,
                        appropriation.account_name,
                        appropriation.fund_type,
                        appropriation.account_type,
                        appropriation.change_type.as_str(),
                        appropriation.amount_text,
                        serde_json::to_string(&appropriation.fiscal_year_amounts)?,
                        appropriation.biennial_cents,
                        appropriation.total_cents(),
                        appropriation.vetoed,
                    ],
                )?;
                let appropriation_ref = tx.last_insert_rowid();
                summary.appropriations += 1;

                for link in &appropriation.provisos {
                    let proviso_ref = match link {
                        ProvisoLink::Resolved { index, .. } => proviso_rows.get(*index).copied(),
                        _ => None,
                    };
                    tx.execute(
                        "INSERT INTO appropriation_provisos (
                            appropriation_ref, proviso_ref, proviso_number, resolved
                        ) VALUES (?1, ?2, ?3, ?4)",
                        params![
                            appropriation_ref,
                            proviso_ref,
                            link.key().proviso_number,
                            proviso_ref.is_some(),
                        ],
                    )?;
                }
            }
        }
    }

    for veto in &document.vetoes {
        tx.execute(
            "INSERT INTO vetoes (bill_ref, section_number, section_reference, veto_type, text)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                bill_ref,
                veto.section_number,
                veto.section_reference,
                veto.veto_type.as_str(),
                veto.text
            ],
        )?;
        summary.vetoes += 1;
    }

    for vote in &document.enrollment.votes {
        tx.execute(
            "INSERT INTO votes (bill_ref, chamber, passed_date, yeas, nays, signer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![bill_ref, vote.chamber.as_str(), vote.date, vote.yeas, vote.nays, vote.signer],
        )?;
        summary.votes += 1;
    }

    for program in &document.programs {
        tx.execute(
            "INSERT INTO programs (bill_ref, kind, name, number, agency) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![bill_ref, program.kind.as_str(), program.name, program.number, program.agency],
        )?;
        summary.programs += 1;
    }

    tx.execute(
        "INSERT INTO extraction_log (
            run_id, bill_id, parser_version, extracted_at, sections, appropriations,
            provisos, unresolved_links, total_cents
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            summary.run_id,
            document.bill_id,
            document.parser_version,
            document.extracted_at.to_rfc3339(),
            summary.sections as i64,
            summary.appropriations as i64,
            summary.provisos as i64,
            document.unresolved_links().len() as i64,
            document.fiscal_impact.total_cents,
        ],
    )?;

    tx.commit()
        .with_context(|| format!("Failed to commit bill {}", document.bill_id))?;

    Ok(summary)
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    if !TABLES.contains(&table) {
        bail!("Unknown table: {}", table);
    }
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
    Ok(count)
}

/// Sum of non-vetoed appropriation totals for one bill, straight from the rows
pub fn stored_total_cents(conn: &Connection, bill_id: &str) -> Result<i64> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(a.total_cents), 0)
         FROM appropriations a JOIN bills b ON a.bill_ref = b.id
         WHERE b.bill_id = ?1 AND a.vetoed = 0",
        params![bill_id],
        |row| row.get(0),
    )?;
    Ok(total)
}
