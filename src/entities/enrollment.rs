// 🖋️ Enrollment - Floor votes, certification and the dates that make a bill law

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chamber {
    House,
    Senate,
}

impl Chamber {
    /// `PassedBy@chamber`: `h`/`house` or `s`/`senate`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "h" | "house" => Some(Chamber::House),
            "s" | "senate" => Some(Chamber::Senate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chamber::House => "House",
            Chamber::Senate => "Senate",
        }
    }
}

/// Final passage vote in one chamber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub chamber: Chamber,
    pub date: String,
    /// None when the tally is missing or not a number
    pub yeas: Option<u32>,
    pub nays: Option<u32>,
    /// Presiding officer who signed
    pub signer: String,
}

impl VoteRecord {
    pub fn passed(&self) -> bool {
        matches!((self.yeas, self.nays), (Some(y), Some(n)) if y > n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub certifier: String,
    pub certifier_position: String,
    /// First certificate paragraph
    pub text: String,
}

/// Everything the enrolling certificate says besides vetoes and the effective date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub votes: Vec<VoteRecord>,
    pub approved_date: String,
    pub filed_date: String,
    pub read_first_time: String,
    pub governor: String,
    pub certificate: Option<Certificate>,
}

impl Enrollment {
    pub fn vote(&self, chamber: Chamber) -> Option<&VoteRecord> {
        self.votes.iter().find(|v| v.chamber == chamber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chamber_parse() {
        assert_eq!(Chamber::parse("h"), Some(Chamber::House));
        assert_eq!(Chamber::parse(" S "), Some(Chamber::Senate));
        assert_eq!(Chamber::parse("senate"), Some(Chamber::Senate));
        assert_eq!(Chamber::parse("joint"), None);
    }

    #[test]
    fn test_vote_passed() {
        let vote = VoteRecord {
            chamber: Chamber::House,
            date: "March 8, 2025".to_string(),
            yeas: Some(57),
            nays: Some(40),
            signer: String::new(),
        };
        assert!(vote.passed());
        assert!(!VoteRecord { yeas: None, ..vote.clone() }.passed());

        let enrollment = Enrollment {
            votes: vec![vote],
            ..Enrollment::default()
        };
        assert!(enrollment.vote(Chamber::House).is_some());
        assert!(enrollment.vote(Chamber::Senate).is_none());
    }
}
