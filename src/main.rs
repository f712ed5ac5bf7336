use anyhow::{Context, Result};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use bill_extraction::{
    count_rows, extract_file, format_cents, insert_bill, setup_database, write_json,
    BillDocument, ExtractorConfig, SpanCategory,
};

const USAGE: &str = "Usage: bill-extract <input.xml> <output.json> [--db <path>] [--config <path>]";

struct Args {
    input: PathBuf,
    output: PathBuf,
    db: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1).collect())?;

    println!("📜 Bill Extraction - XML → JSON");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Config
    let config = match &args.config {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::default(),
    };

    // 2. Extract
    println!("\n📂 Extracting {}...", args.input.display());
    let document = extract_file(&args.input, &config)
        .with_context(|| format!("Extraction failed for {}", args.input.display()))?;
    print_summary(&document);

    // 3. JSON
    println!("\n💾 Writing JSON...");
    write_json(&document, &args.output)?;
    println!("✓ Wrote {}", args.output.display());

    // 4. SQLite (optional)
    if let Some(db_path) = &args.db {
        store(&document, db_path)?;
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Done");

    Ok(())
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut db = None;
    let mut config = None;

    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => db = Some(PathBuf::from(iter.next().context("--db needs a path")?)),
            "--config" => {
                config = Some(PathBuf::from(iter.next().context("--config needs a path")?))
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() != 2 {
        anyhow::bail!("{}", USAGE);
    }
    let output = positional.pop().context(USAGE)?;
    let input = positional.pop().context(USAGE)?;

    Ok(Args {
        input,
        output,
        db,
        config,
    })
}

fn print_summary(document: &BillDocument) {
    let impact = &document.fiscal_impact;

    println!("✓ Bill: {} ({})", document.bill_id, document.short_title);
    println!("✓ Biennium: {} {:?}", document.biennium, document.fiscal_years);
    println!(
        "✓ {} parts, {} sections, {} appropriations",
        document.parts.len(),
        document.section_count(),
        document.appropriation_count()
    );
    println!(
        "✓ {} provisos ({} unresolved links)",
        document.provisos.len(),
        document.unresolved_links().len()
    );
    let mut by_category: BTreeMap<SpanCategory, usize> = BTreeMap::new();
    for proviso in &document.provisos {
        *by_category.entry(proviso.category).or_insert(0) += 1;
    }
    for (category, count) in &by_category {
        println!("   {}: {}", category, count);
    }
    println!("✓ {} vetoes, {} agencies", document.vetoes.len(), document.agencies.len());
    println!(
        "✓ {} programs, {} definitions",
        document.programs.len(),
        document.definitions().count()
    );
    for vote in &document.enrollment.votes {
        println!(
            "   {} passed {}: {} yeas, {} nays",
            vote.chamber.as_str(),
            vote.date,
            vote.yeas.map_or("?".to_string(), |y| y.to_string()),
            vote.nays.map_or("?".to_string(), |n| n.to_string())
        );
    }
    for (action, entries) in &document.legislative_actions {
        println!("   {}: {} sections", action.as_str(), entries.len());
    }

    println!("\n💰 Fiscal impact");
    for (year, cents) in &impact.by_fiscal_year {
        println!("   FY {}: {}", year, format_cents(*cents));
    }
    if impact.biennial_cents != 0 {
        println!("   Biennial: {}", format_cents(impact.biennial_cents));
    }
    println!("   Total: {}", format_cents(impact.total_cents));
    println!("   Excluded (vetoed): {}", format_cents(impact.vetoed_cents));

    let discrepancies: Vec<_> = document
        .reconciliation
        .iter()
        .filter(|r| !r.result.is_balanced())
        .collect();
    if !discrepancies.is_empty() {
        println!("\n⚠️  {} section totals do not match their lines", discrepancies.len());
        for r in discrepancies {
            println!("   Sec. {}: off by {}", r.section_number, format_cents(r.result.difference()));
        }
    }
}

fn store(document: &BillDocument, db_path: &Path) -> Result<()> {
    println!("\n🔧 Setting up database...");
    let mut conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    setup_database(&mut conn)?;

    println!("🗄️  Inserting bill...");
    let summary = insert_bill(&mut conn, document)?;
    if summary.replaced {
        println!("✓ Replaced earlier copy of {}", document.bill_id);
    }
    println!(
        "✓ Stored {} sections, {} appropriations, {} provisos (run {})",
        summary.sections, summary.appropriations, summary.provisos, summary.run_id
    );
    println!("✓ Database contains {} bills", count_rows(&conn, "bills")?);

    Ok(())
}
