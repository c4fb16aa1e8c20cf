#![no_main]

use libfuzzer_sys::fuzz_target;

use glossy::extractor::{detect_language, extract, is_foreign};
use glossy::fetcher::pipeline::{decode_to_utf8, detect_charset};

fuzz_target!(|data: &[u8]| {
    // Charset sniffing and decoding must accept any bytes
    let charset = detect_charset("", data);
    let html = decode_to_utf8(data, &charset);

    // The extractor should never panic regardless of input
    let summary = extract(&html, None);
    let _ = is_foreign(summary.body_text());
    let _ = detect_language(summary.body_text());
});
