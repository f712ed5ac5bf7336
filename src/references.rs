// 🔗 Statutory Reference Scanner - RCW + federal citations in free text
//
// State:   RCW 43.88.110(1)(a) | chapter 43.88 RCW | Title 43 RCW
// Federal: 42 U.S.C. Sec. 1396 | 45 C.F.R. Sec. 75.2
//
// Output is deduplicated by normalized form, first-seen order.

use crate::entities::statute::{ReferenceKind, StatutoryReference};
use crate::text::clean_text;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

struct CitationPattern {
    regex: Regex,
    kind: ReferenceKind,
    normalize: fn(&Captures) -> String,
}

static PATTERNS: Lazy<Vec<CitationPattern>> = Lazy::new(|| {
    vec![
        CitationPattern {
            regex: Regex::new(r"\bRCW\s+(\d+[A-Z]?\.\d+[A-Z]?\.\d+[A-Z]?)((?:\([a-zA-Z0-9]+\))*)")
                .expect("rcw regex"),
            kind: ReferenceKind::State,
            normalize: |c| format!("RCW {}{}", &c[1], &c[2]),
        },
        CitationPattern {
            regex: Regex::new(r"(?i)\bchapter\s+(\d+[A-Z]?\.\d+[A-Z]?)\s+RCW\b")
                .expect("rcw chapter regex"),
            kind: ReferenceKind::State,
            normalize: |c| format!("chapter {} RCW", &c[1]),
        },
        CitationPattern {
            regex: Regex::new(r"(?i)\btitle\s+(\d+[A-Z]?)\s+RCW\b").expect("rcw title regex"),
            kind: ReferenceKind::State,
            normalize: |c| format!("Title {} RCW", &c[1]),
        },
        CitationPattern {
            regex: Regex::new(
                r"(?i)\b(\d+)\s+U\.?\s?S\.?\s?C\.?\s+(?:Sec\.|§+|section)?\s*(\d+[a-z]?(?:[.\-]\d+[a-z]?)*(?:\([a-zA-Z0-9]+\))*)",
            )
            .expect("usc regex"),
            kind: ReferenceKind::Federal,
            normalize: |c| format!("{} U.S.C. Sec. {}", &c[1], &c[2]),
        },
        CitationPattern {
            regex: Regex::new(
                r"(?i)\b(\d+)\s+C\.?\s?F\.?\s?R\.?\s+(?:Sec\.|§+|section|part)?\s*(\d+(?:\.\d+)*)",
            )
            .expect("cfr regex"),
            kind: ReferenceKind::Federal,
            normalize: |c| format!("{} C.F.R. Sec. {}", &c[1], &c[2]),
        },
    ]
});

/// Scan free text for statutory citations
pub fn scan_references(text: &str) -> Vec<StatutoryReference> {
    let mut found: Vec<(usize, StatutoryReference)> = Vec::new();

    for pattern in PATTERNS.iter() {
        for caps in pattern.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let normalized = (pattern.normalize)(&caps);
            found.push((
                whole.start(),
                StatutoryReference::new(clean_text(whole.as_str()), pattern.kind, normalized),
            ));
        }
    }

    found.sort_by_key(|(start, _)| *start);

    let mut references = Vec::new();
    merge_references(&mut references, found.into_iter().map(|(_, r)| r));
    references
}

/// Append `incoming` to `target`, skipping normalized forms already present
pub fn merge_references(
    target: &mut Vec<StatutoryReference>,
    incoming: impl IntoIterator<Item = StatutoryReference>,
) {
    let mut seen: HashSet<String> = target.iter().map(|r| r.normalized.clone()).collect();
    for reference in incoming {
        if seen.insert(reference.normalized.clone()) {
            target.push(reference);
        }
    }
}
