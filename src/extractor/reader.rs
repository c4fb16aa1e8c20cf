use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

use crate::extractor::model::{ArticleSummary, NO_TITLE, collapse_whitespace, normalize_whitespace};

/// Class names that usually mark the element holding the article.
static CONTENT_CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)article|content|post|story").unwrap());

const TITLE_META: &str = "meta[property='og:title'], meta[name='og:title']";
const IMAGE_META: &str = "meta[property='og:image'], meta[name='og:image']";
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("bad selector {selector}: {reason}")]
    Selector {
        selector: &'static str,
        reason: String,
    },
}

fn selector(source: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(source).map_err(|e| ParseError::Selector {
        selector: source,
        reason: e.to_string(),
    })
}

pub fn try_extract(html: &str, base_url: Option<&Url>) -> Result<ArticleSummary, ParseError> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?.unwrap_or_else(|| NO_TITLE.to_string());
    let image_url = extract_image(&document, base_url)?;
    let body_text = extract_body(&document)?;

    Ok(ArticleSummary::new(title, image_url, body_text))
}

fn meta_content(document: &Html, source: &'static str) -> Result<Option<String>, ParseError> {
    let selector = selector(source)?;
    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string))
}

fn extract_title(document: &Html) -> Result<Option<String>, ParseError> {
    if let Some(title) = meta_content(document, TITLE_META)? {
        return Ok(Some(collapse_whitespace(&title)));
    }

    let title_selector = selector("title")?;
    Ok(document
        .select(&title_selector)
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .find(|title| !title.is_empty()))
}

fn extract_image(document: &Html, base_url: Option<&Url>) -> Result<Option<String>, ParseError> {
    let Some(raw) = meta_content(document, IMAGE_META)? else {
        return Ok(None);
    };

    // og:image is supposed to be absolute, but relative paths are common
    let resolved = match base_url {
        Some(base) => base.join(&raw).map(String::from).unwrap_or(raw),
        None => raw,
    };
    Ok(Some(resolved))
}

/// Prioritized search for the article text:
/// 1. the first `<article>` with text,
/// 2. the first element whose class looks content-bearing,
/// 3. every paragraph on the page.
fn extract_body(document: &Html) -> Result<String, ParseError> {
    let paragraphs = selector("p")?;

    let article_selector = selector("article")?;
    for element in document.select(&article_selector) {
        let text = container_text(element, &paragraphs);
        if !text.is_empty() {
            return Ok(text);
        }
    }

    let classed = selector("[class]")?;
    for element in document.select(&classed) {
        let class = element.value().attr("class").unwrap_or_default();
        if !CONTENT_CLASS_REGEX.is_match(class) {
            continue;
        }
        let text = container_text(element, &paragraphs);
        if !text.is_empty() {
            return Ok(text);
        }
    }

    Ok(join_paragraphs(document.select(&paragraphs)))
}

fn container_text(container: ElementRef<'_>, paragraphs: &Selector) -> String {
    let text = join_paragraphs(container.select(paragraphs));
    if !text.is_empty() {
        return text;
    }
    normalize_whitespace(&visible_text(container))
}

fn join_paragraphs<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .map(|p| collapse_whitespace(&visible_text(p)))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Text nodes under `element` concatenated as written, skipping
/// script-like subtrees. Spacing comes from the markup itself, so inline
/// tags never split a word.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| HIDDEN_ELEMENTS.contains(&ancestor.value().name()));
        if !hidden {
            text.push_str(chunk);
        }
    }
    text
}
