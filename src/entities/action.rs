// 🔧 Legislative Action - What a section does to existing law

use crate::entities::statute::StatutoryReference;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LegislativeAction {
    Amend,
    Repeal,
    AddSection,
    AddChapter,
    Recodify,
    Reenact,
}

impl LegislativeAction {
    /// `BillSection@action` codes: amend, repeal, addsect, addchap, recod, remd
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "amend" => Some(LegislativeAction::Amend),
            "repeal" => Some(LegislativeAction::Repeal),
            "addsect" => Some(LegislativeAction::AddSection),
            "addchap" => Some(LegislativeAction::AddChapter),
            "recod" => Some(LegislativeAction::Recodify),
            "remd" => Some(LegislativeAction::Reenact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LegislativeAction::Amend => "amend",
            LegislativeAction::Repeal => "repeal",
            LegislativeAction::AddSection => "addsect",
            LegislativeAction::AddChapter => "addchap",
            LegislativeAction::Recodify => "recod",
            LegislativeAction::Reenact => "remd",
        }
    }

    pub fn is_addition(&self) -> bool {
        matches!(self, LegislativeAction::AddSection | LegislativeAction::AddChapter)
    }
}

/// One section acting on existing law
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub section_number: String,
    pub caption: Option<String>,
    /// The section's own `SectionCite`, when present
    pub citation: Option<StatutoryReference>,
}
