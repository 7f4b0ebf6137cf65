//! Stage 1: strip hostile content from raw document text.
//!
//! Removed:
//!
//! - denylisted elements with their whole subtree (`script`,
//!   `foreignObject`, `iframe`, `embed`, `object`, `handler`, `listener`)
//! - elements and attributes in foreign XML namespaces (dropped while the
//!   owned tree is built, see [`crate::tree`])
//! - event-handler attributes (`on*`, any case)
//! - `href` / `xlink:href` values pointing outside the document
//!   (`scheme:` or protocol-relative `//`)
//!
//! Fragment (`#id`) and relative references survive. The sanitizer never
//! fails: unparsable text is returned unchanged so the structural parser can
//! report it properly.

use crate::tree::{self, Element, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const DENYLIST: &[&str] = &[
    "script",
    "foreignObject",
    "iframe",
    "embed",
    "object",
    "handler",
    "listener",
];

/// Leading whitespace/control characters are ignored by URL parsers, so they
/// are ignored here too.
static RE_EXTERNAL_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\x00-\x20]*(?:[A-Za-z][A-Za-z0-9+.\-]*:|[/\\]{2})").unwrap());

/// What [`sanitize_with_report`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub removed_elements: usize,
    pub removed_attributes: usize,
    /// Elements dropped for nesting deeper than [`tree::MAX_NESTING`].
    pub pruned_elements: usize,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.removed_elements == 0 && self.removed_attributes == 0 && self.pruned_elements == 0
    }
}

/// Sanitize `text`, returning the re-serialised document.
pub fn sanitize(text: &str) -> String {
    sanitize_with_report(text).0
}

/// Like [`sanitize`], also reporting how much was removed.
pub fn sanitize_with_report(text: &str) -> (String, SanitizeReport) {
    let (mut root, pruned_elements) = match tree::parse_document_counting_pruned(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("sanitize: input did not parse ({e}), passing through");
            return (text.to_string(), SanitizeReport::default());
        }
    };

    let mut report = SanitizeReport {
        pruned_elements,
        ..SanitizeReport::default()
    };
    clean_element(&mut root, &mut report);
    if !report.is_clean() {
        debug!(
            "sanitize: removed {} element(s), {} attribute(s)",
            report.removed_elements, report.removed_attributes
        );
    }
    (root.to_xml(), report)
}

fn clean_element(el: &mut Element, report: &mut SanitizeReport) {
    let before = el.attributes.len();
    el.attributes.retain(|(name, value)| !is_hostile_attribute(name, value));
    report.removed_attributes += before - el.attributes.len();

    el.children.retain(|child| match child {
        Node::Element(c) if is_denylisted(&c.name) => {
            report.removed_elements += c.element_count();
            false
        }
        _ => true,
    });

    for child in &mut el.children {
        if let Node::Element(c) = child {
            clean_element(c, report);
        }
    }
}

fn is_denylisted(name: &str) -> bool {
    DENYLIST.iter().any(|d| d.eq_ignore_ascii_case(name))
}

fn is_hostile_attribute(name: &str, value: &str) -> bool {
    let local = name.rsplit(':').next().unwrap_or(name);
    if local.len() > 2 && local.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on")) {
        return true;
    }
    if local.eq_ignore_ascii_case("href") {
        return is_external_uri(value);
    }
    false
}

/// `true` for absolute (`scheme:`) and protocol-relative (`//`) references.
///
/// Tab, LF and CR are deleted anywhere in the value before matching, as URL
/// parsers do, so `java\nscript:` is still a scheme.
pub fn is_external_uri(value: &str) -> bool {
    if value.contains(['\t', '\n', '\r']) {
        let stripped: String = value
            .chars()
            .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
            .collect();
        return RE_EXTERNAL_URI.is_match(&stripped);
    }
    RE_EXTERNAL_URI.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_all_four_hazards() {
        let input = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" onload="alert(1)">
            <script>alert(2)</script>
            <foreignObject><div xmlns="http://www.w3.org/1999/xhtml">hi</div></foreignObject>
            <a xlink:href="https://evil.example/x"><path d="M0 0 L10 0"/></a>
        </svg>"#;
        let (out, report) = sanitize_with_report(input);
        assert!(!out.contains("script"), "{out}");
        assert!(!out.contains("foreignObject"));
        assert!(!out.contains("onload"));
        assert!(!out.contains("evil.example"));
        assert!(out.contains("M0 0 L10 0"));
        assert_eq!(report.removed_elements, 2);
        assert_eq!(report.removed_attributes, 2);
    }

    #[test]
    fn keeps_fragment_and_relative_references() {
        let input = r##"<svg xmlns="http://www.w3.org/2000/svg"><use href="#a"/><use href="img/b.svg"/></svg>"##;
        let out = sanitize(input);
        assert!(out.contains(r##"href="#a""##));
        assert!(out.contains(r#"href="img/b.svg""#));
    }

    #[test]
    fn external_uri_detection() {
        assert!(is_external_uri("http://x"));
        assert!(is_external_uri("  javascript:alert(1)"));
        assert!(is_external_uri("data:image/png;base64,AAAA"));
        assert!(is_external_uri("//cdn.example/x.svg"));
        assert!(is_external_uri("\t\\\\host/share"));
        assert!(!is_external_uri("#id"));
        assert!(!is_external_uri("shapes.svg#id"));
    }

    #[test]
    fn embedded_tab_and_newline_do_not_hide_a_scheme() {
        assert!(is_external_uri("java\nscript:x"));
        assert!(is_external_uri("\n//evil"));
        assert!(is_external_uri("/\t/evil"));
        assert!(is_external_uri("ht\r\ntp://evil"));
        assert!(!is_external_uri("#i\nd"));

        let out = sanitize(
            r#"<svg><a href="java&#10;script:alert(1)"><path d="M0 0 L10 0"/></a></svg>"#,
        );
        assert!(!out.contains("href"), "{out}");
        assert!(!out.contains("alert"), "{out}");
        assert!(out.contains("M0 0 L10 0"));
    }

    #[test]
    fn handler_attributes_any_case() {
        let out = sanitize(r#"<svg><rect ONCLICK="x()" onMouseOver="y()" width="1"/></svg>"#);
        assert!(!out.to_lowercase().contains("onclick"));
        assert!(!out.to_lowercase().contains("onmouseover"));
        assert!(out.contains(r#"width="1""#));
    }

    #[test]
    fn unparsable_input_passes_through() {
        let input = "<svg><g></svg>";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn nested_denylisted_element_removed() {
        let out = sanitize(r#"<svg><g><g><iframe src="x"/></g></g><embed/></svg>"#);
        assert!(!out.contains("iframe"));
        assert!(!out.contains("embed"));
    }
}
