// 🗂️ Program Scanner - Initiative measures + protection order programs in free text
//
// Initiative:       Initiative Measure No. 1639   (deduplicated by number)
// Protection order: fixed list of statutory order types, reported once each

use crate::entities::{Agency, Program, ProgramKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static INITIATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bInitiative\s+Measure\s+No\.\s*(\d+)").expect("initiative regex")
});

const PROTECTION_ORDERS: &[&str] = &[
    "domestic violence protection order",
    "vulnerable adult protection order",
    "antiharassment protection order",
    "sexual assault protection order",
    "stalking protection order",
    "extreme risk protection order",
];

/// Initiatives in order of first mention, then protection order types in table order
pub fn scan_programs(text: &str) -> Vec<Program> {
    let mut programs = Vec::new();
    let mut seen = HashSet::new();

    for caps in INITIATIVE.captures_iter(text) {
        let number = caps[1].to_string();
        if seen.insert(number.clone()) {
            programs.push(Program {
                kind: ProgramKind::Initiative,
                name: format!("Initiative Measure No. {}", number),
                number: Some(number),
                agency: None,
            });
        }
    }

    let lower = text.to_lowercase();
    for order in PROTECTION_ORDERS {
        if lower.contains(order) {
            programs.push(Program {
                kind: ProgramKind::ProtectionOrder,
                name: title_case(order),
                number: None,
                agency: None,
            });
        }
    }

    programs
}

/// Budget programs split off department headers, one per (agency, program)
pub fn agency_programs<'a>(agencies: impl IntoIterator<Item = &'a Agency>) -> Vec<Program> {
    let mut programs: Vec<Program> = Vec::new();
    for agency in agencies {
        let Some(name) = agency.program.as_ref() else {
            continue;
        };
        let known = programs
            .iter()
            .any(|p| &p.name == name && p.agency.as_deref() == Some(agency.name.as_str()));
        if !known {
            programs.push(Program {
                kind: ProgramKind::Agency,
                name: name.clone(),
                number: None,
                agency: Some(agency.name.clone()),
            });
        }
    }
    programs
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
