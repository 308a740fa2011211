use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{AnalysisResult, ReviewResult};

/// Named region of a single-call generation, delimited by a bracketed marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Parties,
    Facts,
    LegalGrounds,
    Requests,
    ValueCause,
    CityDate,
    LawyerName,
    LawyerOab,
}

impl Section {
    /// Every section, in the order the model is asked to emit them
    pub const ALL: [Section; 8] = [
        Section::Parties,
        Section::Facts,
        Section::LegalGrounds,
        Section::Requests,
        Section::ValueCause,
        Section::CityDate,
        Section::LawyerName,
        Section::LawyerOab,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Section::Parties => "[PARTIES]",
            Section::Facts => "[FACTS]",
            Section::LegalGrounds => "[LEGAL_GROUNDS]",
            Section::Requests => "[REQUESTS]",
            Section::ValueCause => "[VALUE_CAUSE]",
            Section::CityDate => "[CITY_DATE]",
            Section::LawyerName => "[LAWYER_NAME]",
            Section::LawyerOab => "[LAWYER_OAB]",
        }
    }

    /// Look up the section whose marker is exactly `line`
    pub fn from_marker(line: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.marker() == line)
    }
}

/// Sections recovered from a marker-delimited generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    sections: HashMap<Section, String>,
    /// Non-blank lines that fell outside every recognized marker
    pub discarded_lines: usize,
}

impl SectionMap {
    /// Section text, or `""` when its marker never appeared
    pub fn get(&self, section: Section) -> &str {
        self.sections.get(&section).map(String::as_str).unwrap_or("")
    }

    /// Store a section. A repeated marker appends to what is already there.
    pub fn insert(&mut self, section: Section, text: String) {
        match self.sections.get_mut(&section) {
            Some(existing) if !existing.is_empty() => {
                if !text.is_empty() {
                    existing.push('\n');
                    existing.push_str(&text);
                }
            }
            _ => {
                self.sections.insert(section, text);
            }
        }
    }

    /// Whether any marker at all was recognized
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn found(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL
            .into_iter()
            .filter(|s| self.sections.contains_key(s))
    }
}

/// Artifacts of the four-stage generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedOutput {
    pub analysis: AnalysisResult,
    pub basis: String,
    pub document: String,
    pub review: ReviewResult,
}
