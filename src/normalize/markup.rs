use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::lines::Block;
use super::tree::escape_text;

static INLINE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<article>(?i:\bart\.\s*\d+[º°]?))",
        r"|(?P<law>(?i:\blei\s+n[º°o]?\.?\s*\d[\d.]*(?:/\d{2,4})?))",
        r"|(?P<paragraph>§+\s*\d+[º°]?)",
        r"|(?P<code>\b(?:CPC|CC|CLT|CF|CDC|CTN)\b)",
        r"|(?P<court>\b(?:STF|STJ|TST|TSE)\b)",
    ))
    .expect("valid regex")
});

/// Render blocks to HTML, one element per line
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading(text) => format!("<h2 class=\"section-title\">{}</h2>", escape_text(text)),
        Block::LegalItem { numeral, body } => format!(
            "<div class=\"legal-item\">{} - {}</div>",
            numeral,
            inline_references(body)
        ),
        Block::LegalSubitem { letter, body } => format!(
            "<div class=\"legal-subitem\">{}) {}</div>",
            letter,
            inline_references(body)
        ),
        Block::NumberedParagraph { number, body } => format!(
            "<p class=\"numbered-paragraph\"><span class=\"paragraph-number\">§ {}.</span> {}</p>",
            number,
            inline_references(body)
        ),
        Block::Paragraph(text) => format!(
            "<p class=\"document-paragraph\">{}</p>",
            inline_references(text)
        ),
        Block::Markup(markup) => markup.clone(),
        Block::RequestList(items) => {
            let mut html = String::from("<ol class=\"requests-list\">");
            for item in items {
                html.push_str("<li class=\"request-item\">");
                html.push_str(&inline_references(item));
                html.push_str("</li>");
            }
            html.push_str("</ol>");
            html
        }
    }
}

/// Escape text and wrap statute, code and court references in spans
pub fn inline_references(text: &str) -> String {
    let escaped = escape_text(text);
    INLINE_REFERENCE
        .replace_all(&escaped, |caps: &Captures| {
            let class = if caps.name("article").is_some() {
                "article-number"
            } else if caps.name("law").is_some() {
                "law-number"
            } else if caps.name("paragraph").is_some() {
                "paragraph-number"
            } else if caps.name("code").is_some() {
                "code-reference"
            } else {
                "court-reference"
            };
            format!("<span class=\"{}\">{}</span>", class, &caps[0])
        })
        .into_owned()
}
