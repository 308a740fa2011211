//! Raw model text to sanitized, allowlist-constrained HTML.
//!
//! Every step is a pure function: `clean` → `lines` (classification and
//! request grouping) → `markup` → `sanitize` → `prune`, and `shell` wraps
//! the result for display or printing.

pub mod clean;
pub mod lines;
pub mod markers;
pub mod markup;
pub mod prune;
pub mod sanitize;
pub mod shell;
pub mod tree;

use chrono::NaiveDate;

use crate::models::{NormalizedDocument, Section, SectionMap, Signature};
use clean::clean_text;
use lines::{
    Block, classify_lines, format_heading, group_blocks, has_request_trigger, split_requests,
};
use markup::render_blocks;

pub use markers::extract_sections;
pub use shell::{format_date_pt, render_page, render_shell};

/// Body sections in document order with their fixed headings
const BODY_SECTIONS: [(Section, &str); 4] = [
    (Section::Parties, "DAS PARTES"),
    (Section::Facts, "DOS FATOS"),
    (Section::LegalGrounds, "DA FUNDAMENTAÇÃO JURÍDICA"),
    (Section::Requests, "DOS PEDIDOS"),
];

const REQUESTS_LEAD: &str = "Diante do exposto, requer a Vossa Excelência:";

/// Normalize free text (or stray markup) into a sanitized HTML fragment
pub fn normalize_fragment(raw: &str) -> String {
    let cleaned = clean_text(raw);
    let blocks = group_blocks(classify_lines(&cleaned));
    sanitize_and_prune(&render_blocks(&blocks))
}

/// Normalize a staged-mode draft; the signature keeps its placeholders
pub fn normalize_free_text(title: &str, raw: &str, generated_on: NaiveDate) -> NormalizedDocument {
    NormalizedDocument {
        title: title.to_string(),
        generated_on,
        content_html: normalize_fragment(raw),
        signature: Signature::default(),
    }
}

/// Assemble a document from single-call sections.
///
/// Empty sections are omitted along with their heading. The requests are
/// always rendered as a list, and the signature comes from the city/date
/// and lawyer sections.
pub fn normalize_sections(
    title: &str,
    sections: &SectionMap,
    generated_on: NaiveDate,
) -> NormalizedDocument {
    let mut blocks = Vec::new();

    for (section, heading) in BODY_SECTIONS {
        let body = clean_text(sections.get(section));
        if body.trim().is_empty() {
            continue;
        }
        blocks.push(Block::Heading(format_heading(heading)));
        if section == Section::Requests {
            blocks.extend(request_blocks(&body));
        } else {
            blocks.extend(group_blocks(classify_lines(&body)));
        }
    }

    let value_cause = single_line(sections.get(Section::ValueCause));
    if !value_cause.is_empty() {
        blocks.push(Block::Paragraph(value_cause_sentence(&value_cause)));
    }

    NormalizedDocument {
        title: title.to_string(),
        generated_on,
        content_html: sanitize_and_prune(&render_blocks(&blocks)),
        signature: Signature {
            city_date: single_line(sections.get(Section::CityDate)),
            lawyer_name: single_line(sections.get(Section::LawyerName)),
            lawyer_oab: single_line(sections.get(Section::LawyerOab)),
        },
    }
}

fn request_blocks(body: &str) -> Vec<Block> {
    if has_request_trigger(body) {
        return group_blocks(classify_lines(body));
    }

    let items = split_requests(body);
    if items.is_empty() {
        return Vec::new();
    }
    vec![
        Block::Paragraph(REQUESTS_LEAD.to_string()),
        Block::RequestList(items),
    ]
}

fn value_cause_sentence(value: &str) -> String {
    if value.to_lowercase().starts_with("dá-se") {
        value.to_string()
    } else {
        format!("Dá-se à causa o valor de {}.", value.trim_end_matches('.'))
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sanitize_and_prune(markup: &str) -> String {
    tree::serialize(&prune::prune(sanitize::sanitize(markup)))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_script_and_style_never_survive() {
        let html = normalize_fragment(
            "<script>alert(1)</script><div style=\"color:red\" class=\"legal-item\">I - x</div>",
        );
        assert_eq!(html, "<div class=\"legal-item\">I - x</div>");
        assert!(!html.contains("script"));
        assert!(!html.contains("style"));
    }

    #[test]
    fn test_free_text_structure() {
        let raw = "```\nDOS FATOS\nO autor celebrou contrato com a ré.\n\n\
                   DO DIREITO\nI - violação do art. 186 do CC\na) dano material\n\
                   § 1. O dano é presumido.\n...\n\
                   Diante do exposto, requer a Vossa Excelência: condenação do réu; pagamento de custas\n```";
        let html = normalize_fragment(raw);

        assert!(html.contains("<h2 class=\"section-title\">DOS Fatos</h2>"));
        assert!(html.contains("<p class=\"document-paragraph\">O autor celebrou contrato com a ré.</p>"));
        assert!(html.contains("<h2 class=\"section-title\">DO Direito</h2>"));
        assert!(html.contains(
            "<div class=\"legal-item\">I - violação do <span class=\"article-number\">art. 186</span> do <span class=\"code-reference\">CC</span></div>"
        ));
        assert!(html.contains("<div class=\"legal-subitem\">a) dano material</div>"));
        assert!(html.contains("<span class=\"paragraph-number\">§ 1.</span> O dano é presumido."));
        assert!(html.contains(
            "<ol class=\"requests-list\"><li class=\"request-item\">condenação do réu</li><li class=\"request-item\">pagamento de custas</li></ol>"
        ));
        assert!(!html.contains("```"));
        assert!(!html.contains(">...<"));
    }

    #[test]
    fn test_sections_assembled_in_order() {
        let mut sections = SectionMap::default();
        sections.insert(Section::Parties, "João Silva contra Empresa X".to_string());
        sections.insert(Section::Facts, "O produto apresentou defeito.".to_string());
        sections.insert(Section::Requests, "a) troca do produto;\nb) danos morais".to_string());
        sections.insert(Section::ValueCause, "R$ 10.000,00".to_string());
        sections.insert(Section::CityDate, "São Paulo,\n5 de março de 2024".to_string());
        sections.insert(Section::LawyerName, "Ana Lima".to_string());

        let document = normalize_sections("Petição Inicial", &sections, date());
        let html = &document.content_html;

        let parties = html.find("DAS Partes").unwrap();
        let facts = html.find("DOS Fatos").unwrap();
        let requests = html.find("DOS Pedidos").unwrap();
        assert!(parties < facts && facts < requests);
        assert!(!html.contains("Fundamentação"));
        assert!(html.contains("<li class=\"request-item\">troca do produto</li><li class=\"request-item\">danos morais</li>"));
        assert!(html.contains("Dá-se à causa o valor de R$ 10.000,00."));

        assert_eq!(document.signature.city_date, "São Paulo, 5 de março de 2024");
        assert_eq!(document.signature.lawyer_name, "Ana Lima");
        assert_eq!(document.signature.lawyer_oab_or_default(), "OAB/XX XXX.XXX");
    }

    #[test]
    fn test_placeholder_sections_pruned() {
        let mut sections = SectionMap::default();
        sections.insert(Section::Parties, "[PARTES]".to_string());
        sections.insert(Section::Facts, "Fatos narrados na inicial.".to_string());

        let document = normalize_sections("Recurso", &sections, date());
        assert!(!document.content_html.contains("[PARTES]"));
        assert!(document.content_html.contains("Fatos narrados na inicial."));
    }
}
