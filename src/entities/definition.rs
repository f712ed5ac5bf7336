// 📖 Definition - A defined term from a DEFINITIONS section

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Paragraph number, `(3)` → "3"
    pub number: String,
    pub term: String,
    /// Text after the quoted term ("means ...")
    pub definition: String,
    pub full_text: String,
}
