// src/extractors/normalize.rs
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

/// Builds the comparison key for a piece of text: lower-cased, compatibility
/// decomposed (NFKD) and stripped of combining marks.
///
/// `"Fertilità"` and `"FERTILITA"` both become `"fertilita"`. The result is
/// only ever used for comparisons, never stored.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        // NFKD can surface capitals from compatibility forms (e.g. U+210C)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized form of the first `len` characters of `title`'s normalized text.
pub fn title_key(title: &str, len: usize) -> String {
    normalize(title).chars().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_accents() {
        assert_eq!(normalize("Fertilità, gravidanza"), "fertilita, gravidanza");
        assert_eq!(normalize("INCOMPATIBILITÀ"), "incompatibilita");
        assert_eq!(normalize("Effetti sulla capacità"), "effetti sulla capacita");
    }

    #[test]
    fn test_keeps_digits_and_punctuation() {
        assert_eq!(normalize("4.4 - Avvertenze d’impiego"), "4.4 - avvertenze d’impiego");
    }

    #[test]
    fn test_compatibility_forms_are_decomposed() {
        assert_eq!(normalize("ﬁne"), "fine");
        assert_eq!(normalize("ℌ"), "h");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "Indicazioni terapeutiche",
            "Fertilità, gravidanza e allattamento",
            "İstanbul",
            "ℌilbert ﬁeld",
            "Ångström ÉCOLE naïve",
            "Straße ẞ",
            "4.1. Indicazioni…",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_title_key_takes_normalized_prefix() {
        assert_eq!(title_key("Incompatibilità", 10), "incompatib");
        assert_eq!(title_key("Fertilità, gravidanza", 10), "fertilita,");
        assert_eq!(title_key("Breve", 10), "breve");
    }
}
