use regex::Regex;
use std::sync::LazyLock;

/// Domain terms we can still render in Russian when the service is down.
const TERMS: [(&str, &str); 12] = [
    ("artificial intelligence", "искусственный интеллект"),
    ("machine learning", "машинное обучение"),
    ("fashion week", "неделя моды"),
    ("smartphone", "смартфон"),
    ("technology", "технология"),
    ("collection", "коллекция"),
    ("designer", "дизайнер"),
    ("startup", "стартап"),
    ("fashion", "мода"),
    ("design", "дизайн"),
    ("brand", "бренд"),
    ("AI", "ИИ"),
];

static GLOSSARY: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    TERMS
        .iter()
        .map(|(term, replacement)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
            (Regex::new(&pattern).unwrap(), *replacement)
        })
        .collect()
});

/// Best-effort translation: swap known terms, leave the rest untouched.
/// Longer phrases are listed first so they win over their parts.
pub fn substitute(text: &str) -> String {
    GLOSSARY
        .iter()
        .fold(text.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).into_owned()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_whole_words_case_insensitively() {
        assert_eq!(
            substitute("New Fashion brand bets on AI"),
            "New мода бренд bets on ИИ"
        );
    }

    #[test]
    fn phrases_beat_single_words() {
        assert_eq!(
            substitute("Artificial Intelligence at Fashion Week"),
            "искусственный интеллект at неделя моды"
        );
    }

    #[test]
    fn leaves_partial_words_alone() {
        assert_eq!(substitute("designers said"), "designers said");
        assert_eq!(substitute("rain"), "rain");
    }
}
