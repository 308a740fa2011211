use chrono::{Datelike, NaiveDate};

use super::tree::escape_text;
use crate::models::NormalizedDocument;

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const PRINT_STYLESHEET: &str = r#"@page { size: A4; margin: 2.5cm 2cm; }
body { font-family: "Times New Roman", Times, serif; font-size: 12pt; line-height: 1.5; color: #000; }
.legal-document { max-width: 17cm; margin: 0 auto; }
.document-header { text-align: center; margin-bottom: 2em; }
.document-title { font-size: 14pt; text-transform: uppercase; margin: 0; }
.document-date { font-size: 10pt; margin: 0.5em 0 0; }
.section-title { font-size: 12pt; font-weight: bold; margin: 1.5em 0 0.75em; }
.document-paragraph, .numbered-paragraph { text-align: justify; text-indent: 2.5cm; margin: 0 0 0.75em; }
.legal-item { margin: 0 0 0.5em 2cm; text-align: justify; }
.legal-subitem { margin: 0 0 0.5em 3cm; text-align: justify; }
.requests-list { margin: 0 0 1em 1.5cm; }
.request-item { text-align: justify; margin-bottom: 0.5em; }
.paragraph-number, .article-number, .law-number { font-weight: bold; }
.document-signature { margin-top: 3em; text-align: center; page-break-inside: avoid; }
.signature-line { width: 8cm; margin: 3em auto 0.25em; border-top: 1px solid #000; }
.signature-name, .signature-oab, .signature-place { margin: 0; }
.document-footer { margin-top: 3em; font-size: 9pt; text-align: center; color: #555; }
"#;

/// "5 de março de 2024"
pub fn format_date_pt(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Wrap sanitized content in the fixed document shell
pub fn render_shell(document: &NormalizedDocument) -> String {
    let date = format_date_pt(document.generated_on);
    let signature = &document.signature;
    let mut html = String::new();

    html.push_str("<div class=\"legal-document\">\n");
    html.push_str(&format!(
        "<div class=\"document-header\"><h1 class=\"document-title\">{}</h1><p class=\"document-date\">{}</p></div>\n",
        escape_text(&document.title),
        date
    ));
    html.push_str("<div class=\"document-content\">\n");
    html.push_str(&document.content_html);
    html.push_str("\n</div>\n");

    html.push_str("<div class=\"document-signature\">\n");
    let city_date = signature.city_date.trim();
    if !city_date.is_empty() {
        html.push_str(&format!(
            "<p class=\"signature-place\">{}</p>\n",
            escape_text(city_date)
        ));
    }
    html.push_str("<div class=\"signature-line\"></div>\n");
    html.push_str(&format!(
        "<p class=\"signature-name\">{}</p>\n<p class=\"signature-oab\">{}</p>\n",
        escape_text(signature.lawyer_name_or_default()),
        escape_text(signature.lawyer_oab_or_default())
    ));
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<div class=\"document-footer\"><p>Documento gerado por LexGenius</p><p class=\"footer-date\">{}</p></div>\n",
        date
    ));
    html.push_str("</div>");

    html
}

/// Full standalone HTML page with the print stylesheet, fed to the PDF renderer
pub fn render_page(document: &NormalizedDocument) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_text(&document.title),
        PRINT_STYLESHEET,
        render_shell(document)
    )
}
