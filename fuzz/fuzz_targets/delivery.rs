#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use glossy::delivery::{DeliveryLimits, plan};
use glossy::dispatch::Attachment;

fuzz_target!(|data: &[u8]| {
    let Some((&limit, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest);
    let limits = DeliveryLimits::new(usize::from(limit).max(1));
    let image = Attachment {
        filename: "image.jpg".to_string(),
        bytes: Bytes::from_static(b"jpg"),
    };

    let plan = plan(&text, Some(image), limits, "#глянец");
    assert_eq!(plan.text(), text);
    assert_eq!(plan.attachment_count(), 1);
    for chunk in plan.chunks() {
        assert!(chunk.text.chars().count() <= limits.max_chunk);
    }
});
