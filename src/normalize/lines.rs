use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical roman numeral up to 3999. Also matches the empty string.
pub(crate) const ROMAN_NUMERAL: &str =
    r"M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})";

/// Statute abbreviations that happen to spell a valid roman numeral
pub(crate) const CODE_ABBREVIATIONS: [&str; 6] = ["CC", "CDC", "CF", "CLT", "CPC", "CTN"];

// "DOS FATOS", "II - DA FUNDAMENTAÇÃO JURÍDICA", "DAS PROVAS:"
static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<prefix>{ROMAN_NUMERAL}\s*[-–—.]\s*)?(?P<body>D(?:A|O|AS|OS)\s+[A-ZÀ-ÖØ-Þ][A-ZÀ-ÖØ-Þ\s,/-]*?)\s*:?$"
    ))
    .expect("valid regex")
});

static LEGAL_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?P<numeral>{ROMAN_NUMERAL})\s*[-–—]\s*(?P<body>.*)$"))
        .expect("valid regex")
});

static LEGAL_SUBITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<letter>[a-z])\)\s*(?P<body>.*)$").expect("valid regex"));

static NUMBERED_PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^§\s*(?P<number>\d+)\s*[º°o]?\s*[.:–—-]?\s*(?P<body>.*)$").expect("valid regex")
});

static REQUEST_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)requer\s+a\s+vossa\s+excel[eê]ncia\s*:").expect("valid regex")
});

static REQUEST_ENUMERATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:[a-z]\)|\d+\s*[.)]|{ROMAN_NUMERAL}\s*[-–—]|[-•*–—])\s*"))
        .expect("valid regex")
});

/// Portuguese connectives kept upper-case inside headings
const CONNECTIVES: [&str; 18] = [
    "da", "de", "do", "das", "dos", "e", "em", "na", "no", "nas", "nos", "a", "o", "ao", "aos",
    "para", "por", "com",
];

/// One source line after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Heading(String),
    LegalItem { numeral: String, body: String },
    LegalSubitem { letter: char, body: String },
    NumberedParagraph { number: String, body: String },
    /// Already carries HTML; left for the sanitizer
    Markup(String),
    Text(String),
}

/// Structural unit rendered to one HTML element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    LegalItem { numeral: String, body: String },
    LegalSubitem { letter: char, body: String },
    NumberedParagraph { number: String, body: String },
    Paragraph(String),
    Markup(String),
    RequestList(Vec<String>),
}

pub fn classify_lines(text: &str) -> Vec<Line> {
    text.lines().map(classify_line).collect()
}

pub fn classify_line(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('<') {
        return Line::Markup(line.to_string());
    }

    if let Some(caps) = HEADING.captures(line) {
        let prefix = caps.name("prefix").map(|m| m.as_str()).unwrap_or("");
        return Line::Heading(format!("{}{}", prefix, format_heading(&caps["body"])));
    }

    if let Some(caps) = NUMBERED_PARAGRAPH.captures(line) {
        return Line::NumberedParagraph {
            number: caps["number"].to_string(),
            body: caps["body"].trim().to_string(),
        };
    }

    if let Some(caps) = LEGAL_ITEM.captures(line) {
        let numeral = &caps["numeral"];
        if !numeral.is_empty() && !CODE_ABBREVIATIONS.contains(&numeral) {
            return Line::LegalItem {
                numeral: numeral.to_string(),
                body: caps["body"].trim().to_string(),
            };
        }
    }

    if let Some(caps) = LEGAL_SUBITEM.captures(line) {
        let letter = caps["letter"].chars().next().unwrap_or('a');
        return Line::LegalSubitem {
            letter,
            body: caps["body"].trim().to_string(),
        };
    }

    Line::Text(line.to_string())
}

/// Title-case a heading body, keeping connectives upper-case
pub fn format_heading(body: &str) -> String {
    body.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            if CONNECTIVES.contains(&lower.as_str()) {
                word.to_uppercase()
            } else {
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn classified lines into blocks, detecting the requests list.
///
/// The first "requer a Vossa Excelência:" closes its paragraph at the
/// trigger; what follows, up to the next blank line, heading, § paragraph
/// or markup, becomes one list item per `;`- or line-separated fragment.
pub fn group_blocks(lines: Vec<Line>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut requests_seen = false;
    let mut iter = lines.into_iter().peekable();

    while let Some(line) = iter.next() {
        match line {
            Line::Blank => {}
            Line::Heading(text) => blocks.push(Block::Heading(text)),
            Line::LegalItem { numeral, body } => blocks.push(Block::LegalItem { numeral, body }),
            Line::LegalSubitem { letter, body } => {
                blocks.push(Block::LegalSubitem { letter, body })
            }
            Line::NumberedParagraph { number, body } => {
                blocks.push(Block::NumberedParagraph { number, body })
            }
            Line::Markup(markup) => blocks.push(Block::Markup(markup)),
            Line::Text(text) => {
                let trigger = if requests_seen {
                    None
                } else {
                    REQUEST_TRIGGER.find(&text).map(|m| m.end())
                };

                let Some(end) = trigger else {
                    blocks.push(Block::Paragraph(text));
                    continue;
                };
                requests_seen = true;

                let lead = text[..end].trim();
                if !lead.is_empty() {
                    blocks.push(Block::Paragraph(lead.to_string()));
                }

                let mut items = split_requests(&text[end..]);
                collect_request_lines(&mut iter, &mut items);
                if !items.is_empty() {
                    blocks.push(Block::RequestList(items));
                }
            }
        }
    }

    blocks
}

fn collect_request_lines<I>(iter: &mut std::iter::Peekable<I>, items: &mut Vec<String>)
where
    I: Iterator<Item = Line>,
{
    loop {
        let take = match iter.peek() {
            Some(Line::Text(_) | Line::LegalItem { .. } | Line::LegalSubitem { .. }) => true,
            // Blank lines end the list unless it has not started yet
            Some(Line::Blank) => {
                if items.is_empty() {
                    iter.next();
                    continue;
                }
                false
            }
            _ => false,
        };
        if !take {
            break;
        }

        match iter.next() {
            Some(Line::Text(text)) => items.extend(split_requests(&text)),
            Some(Line::LegalItem { body, .. }) | Some(Line::LegalSubitem { body, .. }) => {
                items.extend(split_requests(&body))
            }
            _ => break,
        }
    }
}

/// Split request text on semicolons and newlines into trimmed items
pub fn split_requests(text: &str) -> Vec<String> {
    text.split([';', '\n'])
        .map(|fragment| REQUEST_ENUMERATOR.replace(fragment.trim(), "").trim().to_string())
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Whether the text carries the requests trigger phrase
pub fn has_request_trigger(text: &str) -> bool {
    REQUEST_TRIGGER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_detection() {
        assert_eq!(
            classify_line("DOS FATOS"),
            Line::Heading("DOS Fatos".to_string())
        );
        assert_eq!(
            classify_line("DA FUNDAMENTAÇÃO JURÍDICA:"),
            Line::Heading("DA Fundamentação Jurídica".to_string())
        );
        assert_eq!(
            classify_line("II - DOS PEDIDOS"),
            Line::Heading("II - DOS Pedidos".to_string())
        );
        assert_eq!(
            classify_line("DA COMPETÊNCIA DA JUSTIÇA ESTADUAL"),
            Line::Heading("DA Competência DA Justiça Estadual".to_string())
        );
    }

    #[test]
    fn test_lowercase_sentence_is_not_heading() {
        assert!(matches!(
            classify_line("Dos fatos narrados, conclui-se que"),
            Line::Text(_)
        ));
    }

    #[test]
    fn test_clause_detection() {
        assert_eq!(
            classify_line("IV - a inversão do ônus da prova"),
            Line::LegalItem {
                numeral: "IV".to_string(),
                body: "a inversão do ônus da prova".to_string()
            }
        );
        assert_eq!(
            classify_line("b) custas processuais"),
            Line::LegalSubitem {
                letter: 'b',
                body: "custas processuais".to_string()
            }
        );
        assert_eq!(
            classify_line("§ 2º. O prazo é de cinco dias."),
            Line::NumberedParagraph {
                number: "2".to_string(),
                body: "O prazo é de cinco dias.".to_string()
            }
        );
    }

    #[test]
    fn test_statute_glossary_lines_are_text() {
        assert_eq!(
            classify_line("CDC - Código de Defesa do Consumidor"),
            Line::Text("CDC - Código de Defesa do Consumidor".to_string())
        );
        assert_eq!(
            classify_line("CC - Código Civil"),
            Line::Text("CC - Código Civil".to_string())
        );
        assert!(matches!(classify_line("- item solto"), Line::Text(_)));
        assert!(matches!(
            classify_line("XIV - direito de petição"),
            Line::LegalItem { .. }
        ));
    }

    #[test]
    fn test_markup_passthrough() {
        assert!(matches!(
            classify_line("  <div class=\"legal-item\">I - x</div>"),
            Line::Markup(_)
        ));
    }

    #[test]
    fn test_requests_list_from_trigger() {
        let blocks = group_blocks(classify_lines(
            "requer a Vossa Excelência: condenação do réu; pagamento de custas",
        ));
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("requer a Vossa Excelência:".to_string()),
                Block::RequestList(vec![
                    "condenação do réu".to_string(),
                    "pagamento de custas".to_string()
                ]),
            ]
        );
    }

    #[test]
    fn test_requests_list_spans_lines_until_heading() {
        let text = "Diante do exposto, requer a Vossa Excelência:\n\n\
                    a) a citação do réu;\n\
                    b) a procedência do pedido\n\
                    DAS PROVAS\n\
                    Protesta por todos os meios de prova.";
        let blocks = group_blocks(classify_lines(text));

        assert_eq!(
            blocks[0],
            Block::Paragraph("Diante do exposto, requer a Vossa Excelência:".to_string())
        );
        assert_eq!(
            blocks[1],
            Block::RequestList(vec![
                "a citação do réu".to_string(),
                "a procedência do pedido".to_string()
            ])
        );
        assert_eq!(blocks[2], Block::Heading("DAS Provas".to_string()));
        assert_eq!(
            blocks[3],
            Block::Paragraph("Protesta por todos os meios de prova.".to_string())
        );
    }

    #[test]
    fn test_only_first_trigger_builds_list() {
        let text = "requer a Vossa Excelência: citação\n\nE ainda requer a Vossa Excelência: urgência";
        let blocks = group_blocks(classify_lines(text));
        let lists = blocks
            .iter()
            .filter(|b| matches!(b, Block::RequestList(_)))
            .count();
        assert_eq!(lists, 1);
        assert!(matches!(blocks.last(), Some(Block::Paragraph(p)) if p.contains("urgência")));
    }

    #[test]
    fn test_split_requests_drops_enumerators() {
        assert_eq!(
            split_requests("1. citação;\n- custas; ;"),
            vec!["citação".to_string(), "custas".to_string()]
        );
    }
}
