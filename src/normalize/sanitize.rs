use scraper::{ElementRef, Html, Node};

use super::tree::{HtmlElement, HtmlNode};

pub const ALLOWED_TAGS: [&str; 12] = [
    "div", "h1", "h2", "h3", "p", "br", "strong", "em", "ul", "ol", "li", "span",
];

pub const ALLOWED_CLASSES: [&str; 24] = [
    "legal-document",
    "document-header",
    "document-title",
    "document-date",
    "document-content",
    "document-signature",
    "signature-place",
    "signature-line",
    "signature-name",
    "signature-oab",
    "document-footer",
    "footer-date",
    "section-title",
    "document-paragraph",
    "numbered-paragraph",
    "paragraph-number",
    "legal-item",
    "legal-subitem",
    "requests-list",
    "request-item",
    "article-number",
    "law-number",
    "code-reference",
    "court-reference",
];

/// Removed together with everything inside them
const DROPPED_WITH_CONTENT: [&str; 11] = [
    "script", "style", "iframe", "object", "embed", "noscript", "template", "head", "title",
    "textarea", "select",
];

/// Parse markup and keep only allowlisted tags and classes.
///
/// Disallowed tags are unwrapped so their text survives; every attribute
/// other than an allowlisted class is dropped.
pub fn sanitize(markup: &str) -> Vec<HtmlNode> {
    let fragment = Html::parse_fragment(markup);
    let mut nodes = Vec::new();
    sanitize_children(fragment.root_element(), &mut nodes);
    nodes
}

fn sanitize_children(parent: ElementRef<'_>, out: &mut Vec<HtmlNode>) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => push_text(out, text),
            Node::Element(element) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let tag = element.name().to_ascii_lowercase();
                if DROPPED_WITH_CONTENT.contains(&tag.as_str()) {
                    continue;
                }
                if !ALLOWED_TAGS.contains(&tag.as_str()) {
                    sanitize_children(child_ref, out);
                    continue;
                }

                let classes = element
                    .classes()
                    .filter(|class| ALLOWED_CLASSES.contains(class))
                    .map(str::to_string)
                    .collect();
                let mut children = Vec::new();
                sanitize_children(child_ref, &mut children);
                out.push(HtmlNode::Element(HtmlElement {
                    tag,
                    classes,
                    children,
                }));
            }
            // Comments, doctypes and processing instructions
            _ => {}
        }
    }
}

fn push_text(out: &mut Vec<HtmlNode>, text: &str) {
    if let Some(HtmlNode::Text(previous)) = out.last_mut() {
        previous.push_str(text);
    } else {
        out.push(HtmlNode::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tree::serialize;

    #[test]
    fn test_style_attribute_and_script_removed() {
        let html = serialize(&sanitize(
            "<script>alert(1)</script><div style=\"color:red\" class=\"legal-item\">I - x</div>",
        ));
        assert_eq!(html, "<div class=\"legal-item\">I - x</div>");
    }

    #[test]
    fn test_disallowed_tags_unwrapped() {
        let html = serialize(&sanitize(
            "<p class=\"document-paragraph\"><a href=\"http://x\">link</a> e <u>texto</u></p>",
        ));
        assert_eq!(html, "<p class=\"document-paragraph\">link e texto</p>");
    }

    #[test]
    fn test_unknown_classes_and_handlers_dropped() {
        let html = serialize(&sanitize(
            "<span class=\"article-number evil\" onclick=\"steal()\" id=\"a\">Art. 5</span>",
        ));
        assert_eq!(html, "<span class=\"article-number\">Art. 5</span>");
    }

    #[test]
    fn test_entities_survive_reserialization() {
        let html = serialize(&sanitize("<p>A &amp; B &lt;tag&gt;</p>"));
        assert_eq!(html, "<p>A &amp; B &lt;tag&gt;</p>");
    }

    #[test]
    fn test_comments_removed() {
        let html = serialize(&sanitize("<p>texto<!-- nota --></p>"));
        assert_eq!(html, "<p>texto</p>");
    }
}
