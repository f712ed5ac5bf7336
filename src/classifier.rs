// 🏷️ Span Classifier - Rules as Data
// Ordered keyword rules; first match wins. Order IS the policy:
// Reporting → Restriction → Intent → Directive → General.
// Intent must run before Directive: intent language usually also says "shall".

use serde::{Deserialize, Serialize};

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpanCategory {
    Reporting,
    Restriction,
    Intent,
    Directive,
    General,
}

impl SpanCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanCategory::Reporting => "Reporting",
            SpanCategory::Restriction => "Restriction",
            SpanCategory::Intent => "Intent",
            SpanCategory::Directive => "Directive",
            SpanCategory::General => "General",
        }
    }
}

impl std::fmt::Display for SpanCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULE TABLE
// ============================================================================

/// One classification rule: any keyword (lower-case substring) selects the category
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: SpanCategory,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    pub fn matches(&self, lower_text: &str) -> bool {
        self.keywords.iter().any(|k| lower_text.contains(k))
    }
}

/// Precedence order, highest first. Shared read-only across extractions.
pub static DEFAULT_RULES: [KeywordRule; 4] = [
    KeywordRule {
        category: SpanCategory::Reporting,
        keywords: &["shall report", "must report"],
    },
    KeywordRule {
        category: SpanCategory::Restriction,
        keywords: &["is provided solely", "may be used only"],
    },
    KeywordRule {
        category: SpanCategory::Intent,
        keywords: &["intent of the legislature", "legislative intent"],
    },
    KeywordRule {
        category: SpanCategory::Directive,
        keywords: &["shall", "must", "will"],
    },
];

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct SpanClassifier {
    rules: &'static [KeywordRule],
}

impl SpanClassifier {
    pub fn new() -> Self {
        SpanClassifier {
            rules: &DEFAULT_RULES,
        }
    }

    /// Deterministic: same text, same category
    pub fn classify(&self, text: &str) -> SpanCategory {
        let lower = text.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.category)
            .unwrap_or(SpanCategory::General)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for SpanClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper over the default rule table
pub fn classify(text: &str) -> SpanCategory {
    SpanClassifier::new().classify(text)
}

// ============================================================================
// TESTS
// ============================================================================
