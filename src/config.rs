// ⚙️ Extractor Configuration - Defaults in code, overrides from JSON

use crate::error::{ExtractionError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Stamped on every extracted document for provenance
    pub parser_version: String,

    /// Paragraph text that opens the numbered proviso list of a section
    pub proviso_intro_marker: String,

    /// Unnumbered paragraphs containing any of these become Conditions
    pub condition_keywords: Vec<String>,

    /// "FOR THE DEPARTMENT OF ..." → "DEPARTMENT OF ..."
    pub strip_agency_prefix: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            parser_version: format!("bill-extraction/{}", crate::VERSION),
            proviso_intro_marker: "subject to the following conditions and limitations".to_string(),
            condition_keywords: [
                "provided solely",
                "is provided",
                "shall",
                "must",
                "may be used only",
                "may not",
                "shall report",
                "must report",
                "intent of the legislature",
                "subject to",
                "contingent upon",
                "notwithstanding",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            strip_agency_prefix: true,
        }
    }
}

impl ExtractorConfig {
    /// Load overrides from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: ExtractorConfig = serde_json::from_str(content)
            .map_err(|e| ExtractionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.proviso_intro_marker.trim().is_empty() {
            return Err(ExtractionError::Config(
                "proviso_intro_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// True when the lower-cased text carries a condition keyword
    pub fn is_condition_text(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.condition_keywords
            .iter()
            .any(|k| lower.contains(&k.to_lowercase()))
    }

    pub fn opens_proviso_list(&self, text: &str) -> bool {
        text.to_lowercase()
            .contains(&self.proviso_intro_marker.to_lowercase())
    }
}
