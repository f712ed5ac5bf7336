// 🗂️ Program Entity - Named programs a bill funds or touches

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramKind {
    /// Budget program named in a department header (`AGENCY—PROGRAM`)
    Agency,
    /// `Initiative Measure No. 1639`
    Initiative,
    /// One of the statutory protection order types
    ProtectionOrder,
}

impl ProgramKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramKind::Agency => "agency",
            ProgramKind::Initiative => "initiative",
            ProgramKind::ProtectionOrder => "protection-order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub kind: ProgramKind,
    pub name: String,
    /// Initiative number
    pub number: Option<String>,
    /// Owning agency, for agency programs
    pub agency: Option<String>,
}
