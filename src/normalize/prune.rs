use once_cell::sync::Lazy;
use regex::Regex;

use super::lines::{CODE_ABBREVIATIONS, ROMAN_NUMERAL};
use super::tree::{HtmlElement, HtmlNode};

const BLOCK_TAGS: [&str; 8] = ["div", "h1", "h2", "h3", "p", "li", "ul", "ol"];

const HEADING_TAGS: [&str; 3] = ["h1", "h2", "h3"];

/// A heading or plain div must mention one of these to be kept
const LEGAL_KEYWORDS: [&str; 12] = [
    "fato",
    "pedido",
    "fundamenta",
    "qualifica",
    "parte",
    "conclus",
    "requer",
    "direito",
    "dos",
    "da",
    "do",
    "das",
];

// Punctuation only, bare numbering ("IV -", "b)", "3."), or a "[...]" placeholder
static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:[\p{{P}}\p{{S}}\s]*|(?:{ROMAN_NUMERAL}|[a-z]|\d+)\s*[-–—.)º°:]*|\[[^\]]*\])$"
    ))
    .expect("valid regex")
});

/// Drop block elements left empty or carrying only numbering noise.
///
/// Children are pruned before their parent is judged, so a list whose items
/// all vanish goes with them. Inline elements left without text are removed;
/// `<br>` always stays.
pub fn prune(nodes: Vec<HtmlNode>) -> Vec<HtmlNode> {
    let mut kept = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            HtmlNode::Text(text) => kept.push(HtmlNode::Text(text)),
            HtmlNode::Element(element) => prune_element(element, &mut kept),
        }
    }
    kept
}

fn prune_element(mut element: HtmlElement, out: &mut Vec<HtmlNode>) {
    element.children = prune(std::mem::take(&mut element.children));

    if !BLOCK_TAGS.contains(&element.tag.as_str()) {
        if element.tag == "br" || !element.text_content().trim().is_empty() {
            out.push(HtmlNode::Element(element));
        }
        return;
    }

    let text = element.text_content();
    let text = text.trim();
    if is_noise(text) {
        return;
    }

    if mentions_legal_keyword(text) {
        out.push(HtmlNode::Element(element));
    } else if HEADING_TAGS.contains(&element.tag.as_str()) {
        // Headings without a section keyword are dropped
    } else if element.tag == "div" && element.classes.is_empty() {
        // A bare wrapper goes but its content stays
        out.extend(element.children);
    } else {
        out.push(HtmlNode::Element(element));
    }
}

pub fn is_noise(text: &str) -> bool {
    let text = text.trim();
    NOISE.is_match(text) && !CODE_ABBREVIATIONS.contains(&text)
}

fn mentions_legal_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    LEGAL_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
