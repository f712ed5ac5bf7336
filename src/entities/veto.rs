// ✂️ Veto Entity - Executive removal of a section or an item

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VetoType {
    Full,
    Partial,
    LineItem,
}

impl VetoType {
    /// `full`/`section` → Full, `partial` → Partial, `line`/`line-item`/`lineitem` → LineItem
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "full" | "section" => Some(VetoType::Full),
            "partial" => Some(VetoType::Partial),
            "line" | "line-item" | "lineitem" | "line_item" => Some(VetoType::LineItem),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VetoType::Full => "full",
            VetoType::Partial => "partial",
            VetoType::LineItem => "line-item",
        }
    }
}

/// Veto status carried on a Section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VetoStatus {
    #[default]
    None,
    Partial,
    Full,
}

impl VetoStatus {
    /// Strongest status wins: Full > Partial > None
    pub fn absorb(self, veto_type: VetoType) -> Self {
        match (self, veto_type) {
            (VetoStatus::Full, _) | (_, VetoType::Full) => VetoStatus::Full,
            _ => VetoStatus::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VetoStatus::None => "none",
            VetoStatus::Partial => "partial",
            VetoStatus::Full => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Veto {
    pub section_number: String,
    /// Canonical `Sec. N` reference
    pub section_reference: String,
    pub veto_type: VetoType,
    /// Vetoed span (veto note or line-vetoed text); empty when the source names only the section
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veto_type_parse() {
        assert_eq!(VetoType::parse("Full"), Some(VetoType::Full));
        assert_eq!(VetoType::parse("section"), Some(VetoType::Full));
        assert_eq!(VetoType::parse("partial"), Some(VetoType::Partial));
        assert_eq!(VetoType::parse("line"), Some(VetoType::LineItem));
        assert_eq!(VetoType::parse("none"), None);
    }

    #[test]
    fn test_status_absorb() {
        assert_eq!(VetoStatus::None.absorb(VetoType::LineItem), VetoStatus::Partial);
        assert_eq!(VetoStatus::Partial.absorb(VetoType::Full), VetoStatus::Full);
        assert_eq!(VetoStatus::Full.absorb(VetoType::Partial), VetoStatus::Full);
    }
}
