// 🧹 Text Normalizer - Whitespace, section references, biennium years
// Plus the small account-name derivations budget lines need (fund type, account type, FY tag)

use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:section\s+|§+\s*)").expect("section marker regex"));

static BIENNIUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*[-–]\s*(\d{2,4})\b").expect("biennium regex"));

/// Widest year range accepted as a biennium
const MAX_BIENNIUM_SPAN: i32 = 10;

static AGENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{3})\b").expect("agency code regex"));

static FISCAL_YEAR_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:FY|fiscal\s+year)\s*(\d{4})\b").expect("fiscal year tag regex")
});

/// Collapse every whitespace run (newlines and blank lines included) to one space and trim
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical section reference: `Section 5` / `§ 5` / `§5` → `Sec. 5`
///
/// The section number itself is left untouched (`Sec. 101A` stays `Sec. 101A`).
pub fn normalize_section(section_text: &str) -> String {
    let collapsed = clean_text(section_text);
    SECTION_MARKER.replace(&collapsed, "Sec. ").into_owned()
}

/// Expand a biennium like `2025-27` or `2023-2025` into every fiscal year it spans.
///
/// An end below 100 borrows the start year's century: `2025` + `"27"` → `2027`.
/// No match, an end before the start, or a span wider than ten years yields `[]`.
pub fn extract_fiscal_years(biennium_text: &str) -> Vec<i32> {
    let Some(caps) = BIENNIUM.captures(biennium_text) else {
        return Vec::new();
    };

    let Ok(start) = caps[1].parse::<i32>() else {
        return Vec::new();
    };
    let Ok(tail) = caps[2].parse::<i32>() else {
        return Vec::new();
    };

    let end = if tail < 100 { start - start % 100 + tail } else { tail };
    if end - start > MAX_BIENNIUM_SPAN {
        return Vec::new();
    }

    (start..=end).collect()
}

/// The biennium text as written (`2025-27`), if the input mentions one
pub fn find_biennium(text: &str) -> Option<String> {
    BIENNIUM.find(text).map(|m| m.as_str().to_string())
}

/// First standalone 3-digit token, e.g. `"Agency 027 - Budget"` → `"027"`
pub fn extract_agency_code(text: &str) -> Option<String> {
    AGENCY_CODE.captures(text).map(|caps| caps[1].to_string())
}

/// Fiscal year tagged in an account name: `(FY 2026)` or `fiscal year 2026`
pub fn extract_fiscal_year_tag(text: &str) -> Option<i32> {
    FISCAL_YEAR_TAG
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Account names use em-dashes between fund and source; keep them plain ASCII
pub fn clean_account_name(account_name: &str) -> String {
    clean_text(&account_name.replace(['—', '–'], "-"))
}

/// Funding source derived from the account name
pub fn extract_account_type(account_name: &str) -> Option<String> {
    let lower = account_name.to_lowercase();

    if lower.contains("federal") {
        return Some("Federal".to_string());
    }
    if lower.contains("private") || lower.contains("local") {
        return Some("Private/Local".to_string());
    }
    if lower.contains("state") {
        return Some("State".to_string());
    }

    None
}

/// Fund classification derived from the account name
pub fn extract_fund_type(account_name: &str) -> String {
    let lower = account_name.to_lowercase();

    if lower.contains("general fund") {
        return "General Fund".to_string();
    }
    if lower.contains("trust") {
        return "Trust Fund".to_string();
    }

    "Special Fund".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  The  agency\n\n\n shall\treport  "), "The agency shall report");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n \t "), "");
    }

    #[test]
    fn test_normalize_section_markers() {
        assert_eq!(normalize_section("Section 101"), "Sec. 101");
        assert_eq!(normalize_section("  SECTION   12A "), "Sec. 12A");
        assert_eq!(normalize_section("§ 5"), "Sec. 5");
        assert_eq!(normalize_section("§5"), "Sec. 5");
        assert_eq!(normalize_section("Sec. 7"), "Sec. 7");
        assert_eq!(normalize_section("101"), "101");
    }

    #[test]
    fn test_extract_fiscal_years() {
        assert_eq!(extract_fiscal_years("2025-27"), vec![2025, 2026, 2027]);
        assert_eq!(extract_fiscal_years("2023-2025"), vec![2023, 2024, 2025]);
        assert_eq!(extract_fiscal_years("not a biennium"), Vec::<i32>::new());
    }

    #[test]
    fn test_extract_fiscal_years_embedded_and_century() {
        assert_eq!(
            extract_fiscal_years("Making appropriations for the 2025-2027 fiscal biennium"),
            vec![2025, 2026, 2027]
        );
        assert_eq!(extract_fiscal_years("1999-01"), Vec::<i32>::new());
        assert_eq!(extract_fiscal_years("2025-027"), vec![2025, 2026, 2027]);
    }

    #[test]
    fn test_extract_fiscal_years_edges() {
        assert_eq!(extract_fiscal_years("FY2025-27"), vec![2025, 2026, 2027]);
        assert_eq!(extract_fiscal_years("2025-127"), Vec::<i32>::new());
        assert_eq!(extract_fiscal_years("2025-2127"), Vec::<i32>::new());
        assert_eq!(find_biennium("FY2023-25 budget"), Some("2023-25".to_string()));
    }

    #[test]
    fn test_find_biennium() {
        assert_eq!(find_biennium("the 2025-27 biennium"), Some("2025-27".to_string()));
        assert_eq!(find_biennium("no years here"), None);
    }

    #[test]
    fn test_extract_agency_code() {
        assert_eq!(extract_agency_code("Agency 027 - Budget"), Some("027".to_string()));
        assert_eq!(extract_agency_code("FY 2026 only"), None);
        assert_eq!(extract_agency_code(""), None);
    }

    #[test]
    fn test_extract_fiscal_year_tag() {
        assert_eq!(
            extract_fiscal_year_tag("General Fund—State Appropriation (FY 2026)"),
            Some(2026)
        );
        assert_eq!(extract_fiscal_year_tag("for fiscal year 2027 only"), Some(2027));
        assert_eq!(extract_fiscal_year_tag("Motor Vehicle Account—State"), None);
    }

    #[test]
    fn test_account_derivations() {
        let account = clean_account_name("General Fund—Federal  Appropriation");
        assert_eq!(account, "General Fund-Federal Appropriation");
        assert_eq!(extract_account_type(&account), Some("Federal".to_string()));
        assert_eq!(extract_fund_type(&account), "General Fund");

        assert_eq!(extract_account_type("Local Toxics Account"), Some("Private/Local".to_string()));
        assert_eq!(extract_fund_type("Pension Trust Account—State"), "Trust Fund");
        assert_eq!(extract_fund_type("Motor Vehicle Account"), "Special Fund");
        assert_eq!(extract_account_type("Motor Vehicle Account"), None);
    }
}
