use bytes::Bytes;
use std::fs;
use url::Url;

use crate::extractor::{NO_TITLE, extract, extract_page, is_foreign};
use crate::fetcher::types::{Charset, PageResponse};

#[test]
fn test_extract_article() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let response = create_test_response(html, "https://example.com/article");
    let summary = extract_page(&response);

    assert_eq!(summary.title(), "Sample Article About Runway Season");
    assert_eq!(
        summary.image_url(),
        Some("https://example.com/images/sample.jpg")
    );
    assert!(summary.body_text().starts_with("This is the first paragraph"));
    assert!(summary.body_text().contains("second paragraph"));
    assert!(!summary.body_text().contains("cookies"));
    assert!(!summary.body_text().contains("Copyright"));
    assert!(!summary.body_text().contains("console.log"));
    assert!(is_foreign(summary.body_text()));
}

#[test]
fn test_extract_blog_post() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/blog.html")
        .expect("Failed to read test fixture");

    let response = create_test_response(html, "https://blog.example.com/coat");
    let summary = extract_page(&response);

    assert_eq!(summary.title(), "Как выбрать пальто | Модный блог");
    assert_eq!(summary.image_url(), None);
    assert_eq!(
        summary.body_text(),
        "Пальто должно сидеть свободно в плечах, но не висеть мешком.\n\n\
         Выбирайте плотную шерсть и проверяйте швы на подкладке."
    );
    assert!(!is_foreign(summary.body_text()));
}

#[test]
fn test_extract_keeps_words_split_by_inline_tags() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/inline.html")
        .expect("Failed to read test fixture");

    let response = create_test_response(html, "https://example.com/dior");
    let summary = extract_page(&response);

    assert_eq!(
        summary.body_text(),
        "Коллекция Dior Homme вышла в понедельник.\n\n\
         Цена от 1200 евро, в продаже с марта."
    );
}

#[test]
fn test_empty_page_yields_degraded_fields() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/empty.html")
        .expect("Failed to read test fixture");

    let summary = extract(&html, None);

    assert_eq!(summary.title(), NO_TITLE);
    assert_eq!(summary.image_url(), None);
    assert_eq!(summary.body_text(), "");
}

#[test]
fn test_no_paragraphs_no_metadata() {
    let summary = extract("<html><body><div>just a div</div></body></html>", None);

    assert_eq!(summary.title(), NO_TITLE);
    assert_eq!(summary.image_url(), None);
    assert!(summary.body_text().is_empty());
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";

    let summary = extract(html, None);

    assert_eq!(summary.title(), "Broken");
    assert!(summary.body_text().contains("Unclosed tags"));
}

#[test]
fn test_non_html_input() {
    let summary = extract("\u{0}\u{1}{\"json\": true}", None);

    assert_eq!(summary.title(), NO_TITLE);
    assert_eq!(summary.image_url(), None);
}

fn create_test_response(html: String, url: &str) -> PageResponse {
    PageResponse {
        url_final: Url::parse(url).unwrap(),
        body_raw: Bytes::from(html.clone()),
        body_utf8: html,
        charset: Charset::Utf8,
    }
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let summary = extract(&html, None);
            prop_assert!(!summary.title().is_empty());
        }

        #[test]
        fn test_extract_tag_soup(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("<p>".to_string()),
                    Just("</p>".to_string()),
                    Just("<article>".to_string()),
                    Just("<div class=\"content\">".to_string()),
                    Just("<title>".to_string()),
                    Just("<meta property=\"og:title\" content=\"x\">".to_string()),
                    "[a-z ]{0,12}",
                ],
                0..40,
            ),
            url in "https://[a-z]+\\.com/[a-z]*",
        ) {
            let response = create_test_response(parts.concat(), &url);
            let summary = extract_page(&response);
            prop_assert!(!summary.title().is_empty());
        }
    }
}
