use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default query preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC), so full-width and compatibility forms match
        let text: String = text.nfkc().collect();

        text.replace(['\n', '\r'], "").trim().to_lowercase()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Case-fold a stored field the same way queries are folded
pub fn fold(text: &str) -> String {
    DefaultPreprocessor.process(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(fold("  Hello\n"), "hello");
        assert_eq!(fold("   "), "");
    }

    #[test]
    fn normalizes_compatibility_forms() {
        assert_eq!(fold("ＡＢＣ"), "abc");
        // Decomposed jamo recompose into the syllable stored in the catalog
        assert_eq!(fold("\u{1112}\u{1161}\u{11AB}"), "한");
    }
}
