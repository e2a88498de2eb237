use eps_translator::Language;

use crate::error::SearchError;

/// Writing system of a query, used to pick the translation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Bangla,
    Hangul,
}

impl Script {
    /// Bangla wins when both scripts appear
    pub fn detect(text: &str) -> Option<Script> {
        if text.chars().any(is_bangla) {
            Some(Script::Bangla)
        } else if text.chars().any(is_hangul) {
            Some(Script::Hangul)
        } else {
            None
        }
    }

    pub fn language(&self) -> Language {
        match self {
            Script::Bangla => Language::Bangla,
            Script::Hangul => Language::Korean,
        }
    }
}

fn is_bangla(c: char) -> bool {
    ('\u{0980}'..='\u{09FF}').contains(&c)
}

fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7AF}').contains(&c)
        || ('\u{1100}'..='\u{11FF}').contains(&c)
        || ('\u{3130}'..='\u{318F}').contains(&c)
}

/// `(from, to)` for translating `text` into the other catalog language
pub fn translation_direction(text: &str) -> Result<(Language, Language), SearchError> {
    let source = Script::detect(text)
        .ok_or(SearchError::UnsupportedInput)?
        .language();
    Ok((source, source.other()))
}
