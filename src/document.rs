// 🌳 Document Tree - The only capability the walker needs from a parser
//
// Tag name, attribute lookup, child-element iteration, text content.
// The walker is generic over this trait; `roxmltree` is the stock XML adapter.
// Tag comparisons are case-insensitive so `BillSection` and `bill_section`-style
// lower-case vocabularies both work through `is_tag`.

use crate::error::Result;

pub trait DocumentNode: Sized + Clone {
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Element children only, in document order
    fn child_elements(&self) -> Vec<Self>;

    /// Concatenated text of every descendant text node
    fn text_content(&self) -> String;

    // ------------------------------------------------------------------------
    // Provided lookups
    // ------------------------------------------------------------------------

    fn is_tag(&self, names: &[&str]) -> bool {
        let tag = self.tag_name();
        names.iter().any(|n| n.eq_ignore_ascii_case(tag))
    }

    fn child(&self, names: &[&str]) -> Option<Self> {
        self.child_elements().into_iter().find(|c| c.is_tag(names))
    }

    fn children_named(&self, names: &[&str]) -> Vec<Self> {
        self.child_elements()
            .into_iter()
            .filter(|c| c.is_tag(names))
            .collect()
    }

    /// First matching descendant, pre-order
    fn find(&self, names: &[&str]) -> Option<Self> {
        for child in self.child_elements() {
            if child.is_tag(names) {
                return Some(child);
            }
            if let Some(found) = child.find(names) {
                return Some(found);
            }
        }
        None
    }

    /// Every matching descendant, pre-order; does not descend into matches
    fn find_all(&self, names: &[&str]) -> Vec<Self> {
        let mut found = Vec::new();
        for child in self.child_elements() {
            if child.is_tag(names) {
                found.push(child);
            } else {
                found.extend(child.find_all(names));
            }
        }
        found
    }

    /// Like `find_all`, but never enters subtrees whose tag is in `skip`
    fn find_all_except(&self, names: &[&str], skip: &[&str]) -> Vec<Self> {
        let mut found = Vec::new();
        for child in self.child_elements() {
            if child.is_tag(skip) {
                continue;
            }
            if child.is_tag(names) {
                found.push(child);
            } else {
                found.extend(child.find_all_except(names, skip));
            }
        }
        found
    }

    /// Trimmed text of the first matching descendant, or empty
    fn text_of(&self, names: &[&str]) -> String {
        self.find(names)
            .map(|n| n.text_content().trim().to_string())
            .unwrap_or_default()
    }

    /// Attribute value trimmed, with empty treated as absent
    fn attr(&self, name: &str) -> Option<String> {
        self.attribute(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

// ============================================================================
// ROXMLTREE ADAPTER
// ============================================================================

impl<'a, 'input: 'a> DocumentNode for roxmltree::Node<'a, 'input> {
    fn tag_name(&self) -> &str {
        roxmltree::Node::tag_name(self).name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        roxmltree::Node::attribute(self, name)
    }

    fn child_elements(&self) -> Vec<Self> {
        self.children().filter(|c| c.is_element()).collect()
    }

    fn text_content(&self) -> String {
        self.descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect()
    }
}

/// Parse XML text into a tree; failure here is the one fatal input error
pub fn parse_xml(xml: &str) -> Result<roxmltree::Document<'_>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    Ok(roxmltree::Document::parse_with_options(xml, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<Bill id="SB 1"><BillHeading><ShortBillId> SB 1 </ShortBillId></BillHeading>
        <BillBody><Part><P>PART I</P></Part><section number="2"><P>Text <b>bold</b> tail</P></section></BillBody></Bill>"#;

    #[test]
    fn test_case_insensitive_lookup() {
        let doc = parse_xml(SAMPLE).unwrap();
        let root = doc.root_element();
        assert!(root.is_tag(&["bill"]));
        assert_eq!(root.text_of(&["shortbillid"]), "SB 1");
        assert_eq!(root.attr("id"), Some("SB 1".to_string()));
        assert_eq!(root.attr("missing"), None);
    }

    #[test]
    fn test_text_content_concatenates_runs() {
        let doc = parse_xml(SAMPLE).unwrap();
        let section = doc.root_element().find(&["BillSection", "section"]).unwrap();
        assert_eq!(section.text_content(), "Text bold tail");
        assert_eq!(DocumentNode::attribute(&section, "number"), Some("2"));
    }

    #[test]
    fn test_child_order_and_filters() {
        let doc = parse_xml(SAMPLE).unwrap();
        let body = doc.root_element().child(&["BillBody"]).unwrap();
        let tags: Vec<String> = body
            .child_elements()
            .iter()
            .map(|c| DocumentNode::tag_name(c).to_string())
            .collect();
        assert_eq!(tags, vec!["Part", "section"]);
        assert_eq!(body.find_all(&["P"]).len(), 2);
        assert_eq!(body.find_all_except(&["P"], &["Part"]).len(), 1);
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(parse_xml("<Bill><BillBody></Bill>").is_err());
        assert!(parse_xml("").is_err());
    }
}
