use whatlang::{Lang, detect};

const MIN_CONFIDENCE: f64 = 0.25;
const MIN_TEXT_LENGTH: usize = 50;

/// Short English words that rarely show up in Russian prose. Matched only
/// when surrounded by spaces.
const FOREIGN_MARKERS: [&str; 12] = [
    "the", "and", "of", "to", "in", "is", "that", "for", "with", "on", "was", "are",
];

/// Marker hits at which text counts as foreign.
const FOREIGN_THRESHOLD: usize = 3;

/// Cheap "needs translation" check.
///
/// Counts space-delimited marker words in the lowercased text. This is a
/// heuristic, not language identification: short English snippets read as
/// local and Russian text quoting English can read as foreign. Adding marker
/// words never turns a foreign verdict into a local one.
pub fn is_foreign(text: &str) -> bool {
    foreign_marker_count(text) >= FOREIGN_THRESHOLD
}

pub fn foreign_marker_count(text: &str) -> usize {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split(' ').collect();
    if tokens.len() < 3 {
        return 0;
    }

    // First and last tokens lack a space on one side.
    tokens[1..tokens.len() - 1]
        .iter()
        .filter(|token| FOREIGN_MARKERS.contains(token))
        .count()
}

/// ISO 639-1 code of the text's language, when whatlang is confident enough.
pub fn detect_language(text: &str) -> Option<String> {
    // Skip detection for very short text
    if text.trim().len() < MIN_TEXT_LENGTH {
        return None;
    }

    if let Some(info) = detect(text)
        && info.confidence() >= MIN_CONFIDENCE
    {
        return Some(lang_to_code(info.lang()));
    }

    None
}

fn lang_to_code(lang: Lang) -> String {
    match lang {
        Lang::Eng => "en".to_string(),
        Lang::Rus => "ru".to_string(),
        Lang::Ukr => "uk".to_string(),
        Lang::Cmn => "zh".to_string(),
        Lang::Spa => "es".to_string(),
        Lang::Fra => "fr".to_string(),
        Lang::Deu => "de".to_string(),
        Lang::Jpn => "ja".to_string(),
        Lang::Kor => "ko".to_string(),
        Lang::Por => "pt".to_string(),
        Lang::Ita => "it".to_string(),
        Lang::Nld => "nl".to_string(),
        Lang::Pol => "pl".to_string(),
        Lang::Tur => "tr".to_string(),
        _ => lang.code().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_prose_is_foreign() {
        let text = "The designer said that the collection is inspired by the sea and the city.";
        assert!(is_foreign(text));
    }

    #[test]
    fn russian_prose_is_local() {
        let text = "Дизайнер рассказал, что коллекция вдохновлена морем и городом.";
        assert!(!is_foreign(text));
    }

    #[test]
    fn markers_must_be_space_delimited() {
        // "the" glued to punctuation or at the edges does not count
        assert_eq!(foreign_marker_count("the the the"), 1);
        assert_eq!(foreign_marker_count("x the, and. of!"), 0);
        assert_eq!(foreign_marker_count("x THE AND OF y"), 3);
    }

    #[test]
    fn threshold_is_three_hits() {
        assert!(!is_foreign("a the b and c"));
        assert!(is_foreign("a the b and c of d"));
    }

    #[test]
    fn adding_markers_never_flips_foreign_to_local() {
        let mut text = String::from("one of the best in town");
        assert!(is_foreign(&text));
        for _ in 0..5 {
            text.push_str(" the ");
            assert!(is_foreign(&text));
        }
    }

    #[test]
    fn test_detect_english() {
        let text = "This is a test of the English language detection system. It should work well.";
        assert_eq!(detect_language(text), Some("en".to_string()));
    }

    #[test]
    fn test_detect_russian() {
        let text = "Это проверка системы определения языка на русском тексте. Она должна работать хорошо.";
        assert_eq!(detect_language(text), Some("ru".to_string()));
    }

    #[test]
    fn test_short_text_returns_none() {
        assert_eq!(detect_language("Short"), None);
    }
}

#[cfg(all(test, feature = "fuzz"))]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn appended_markers_keep_foreign_verdict(
            text in "[a-z ]{0,200}",
            marker in proptest::sample::select(FOREIGN_MARKERS.to_vec()),
            extra in 1usize..5,
        ) {
            let longer = format!("{text}{}", format!(" {marker} ").repeat(extra));
            prop_assert!(foreign_marker_count(&longer) >= foreign_marker_count(&text));
            prop_assert!(!is_foreign(&text) || is_foreign(&longer));
        }
    }
}
