use crate::fetcher::types::{Charset, PageResponse};
use bytes::Bytes;
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// How far into the body we look for a `<meta>` charset declaration.
const META_SNIFF_BYTES: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

pub fn process_response(url_final: Url, body_bytes: Bytes, content_type: &str) -> PageResponse {
    let charset = detect_charset(content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, &charset);

    PageResponse {
        url_final,
        body_raw: body_bytes,
        body_utf8,
        charset,
    }
}

fn charset_from_captures(regex: &Regex, haystack: &str) -> Option<Charset> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes()).map(Charset::from_encoding)
}

/// Declared encoding first (header, then `<meta>`), heuristic detection last.
pub fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    if let Some(charset) = charset_from_captures(&CHARSET_REGEX, content_type) {
        return charset;
    }

    let search_bytes = &body_bytes[..body_bytes.len().min(META_SNIFF_BYTES)];
    let search_str = String::from_utf8_lossy(search_bytes);

    if let Some(charset) = charset_from_captures(&META_CHARSET_REGEX, &search_str) {
        return charset;
    }
    if let Some(charset) = charset_from_captures(&META_HTTP_EQUIV_REGEX, &search_str) {
        return charset;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body_bytes, true);
    Charset::from_encoding(detector.guess(None, true))
}

/// Malformed sequences become U+FFFD; a few bad bytes must not cost us the
/// whole article.
pub fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> String {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        debug!(
            "Replaced malformed sequences while decoding body as {}",
            encoding.name()
        );
    }

    decoded.into_owned()
}
