use crate::models::{Section, SectionMap};

/// Split a marker-delimited generation into sections.
///
/// A line that is exactly a known marker (surrounding whitespace ignored)
/// closes the current section and opens the next. Blank lines are skipped.
/// Any other line, bracketed or not, belongs to the open section; lines
/// before the first marker are discarded and counted in `discarded_lines`.
/// Never fails.
pub fn extract_sections(text: &str) -> SectionMap {
    let mut map = SectionMap::default();
    let mut current: Option<Section> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(section) = Section::from_marker(trimmed) {
            flush(&mut map, current, &mut buffer);
            current = Some(section);
            continue;
        }

        match current {
            Some(_) => buffer.push(line),
            None => map.discarded_lines += 1,
        }
    }
    flush(&mut map, current, &mut buffer);

    map
}

fn flush(map: &mut SectionMap, current: Option<Section>, buffer: &mut Vec<&str>) {
    if let Some(section) = current {
        map.insert(section, buffer.join("\n").trim().to_string());
    }
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed() -> String {
        Section::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}\nconteúdo {} linha um\nconteúdo {} linha dois\n", s.marker(), i, i))
            .collect()
    }

    #[test]
    fn test_all_markers_verbatim() {
        let map = extract_sections(&well_formed());
        for (i, section) in Section::ALL.iter().enumerate() {
            assert_eq!(
                map.get(*section),
                format!("conteúdo {} linha um\nconteúdo {} linha dois", i, i)
            );
        }
        assert_eq!(map.discarded_lines, 0);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = well_formed();
        assert_eq!(extract_sections(&text), extract_sections(&text));
    }

    #[test]
    fn test_missing_marker_yields_empty() {
        let text = well_formed().replace("[LAWYER_OAB]", "");
        let map = extract_sections(&text);

        // Without its marker the OAB text is appended to the lawyer name
        assert_eq!(map.get(Section::LawyerOab), "");
        assert_eq!(
            map.get(Section::Parties),
            "conteúdo 0 linha um\nconteúdo 0 linha dois"
        );
        assert_eq!(
            map.get(Section::CityDate),
            "conteúdo 5 linha um\nconteúdo 5 linha dois"
        );
    }

    #[test]
    fn test_dropping_last_section_leaves_others_untouched() {
        let text = well_formed();
        let cut = text.find("[LAWYER_OAB]").unwrap();
        let map = extract_sections(&text[..cut]);

        assert_eq!(map.get(Section::LawyerOab), "");
        for (i, section) in Section::ALL[..7].iter().enumerate() {
            assert_eq!(
                map.get(*section),
                format!("conteúdo {} linha um\nconteúdo {} linha dois", i, i)
            );
        }
    }

    #[test]
    fn test_preamble_discarded() {
        let text = "Aqui está a peça solicitada.\n\n  [FACTS]  \nFato um.\n[REQUESTS]\nPedido um";
        let map = extract_sections(text);

        assert_eq!(map.get(Section::Facts), "Fato um.");
        assert_eq!(map.get(Section::Requests), "Pedido um");
        assert_eq!(map.discarded_lines, 1);
    }

    #[test]
    fn test_unknown_bracketed_line_stays_in_section() {
        let map = extract_sections("[FACTS]\nFato um.\n[OBS]\nmais fato\n[REQUESTS]\nPedido");

        assert_eq!(map.get(Section::Facts), "Fato um.\n[OBS]\nmais fato");
        assert_eq!(map.get(Section::Requests), "Pedido");
        assert_eq!(map.discarded_lines, 0);
    }

    #[test]
    fn test_no_markers_never_fails() {
        let map = extract_sections("Texto livre sem marcadores.");
        assert!(map.is_empty());
        assert_eq!(map.get(Section::Facts), "");
    }
}
