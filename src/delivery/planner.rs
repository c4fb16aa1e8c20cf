use crate::dispatch::Attachment;
use crate::text::char_count;

/// Platform size limits, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryLimits {
    /// Longest text one message may carry.
    pub max_chunk: usize,
    /// Longest text a message with an attachment may carry.
    pub max_caption: usize,
}

impl DeliveryLimits {
    pub fn new(max_chunk: usize) -> Self {
        Self {
            max_chunk,
            max_caption: max_chunk,
        }
    }

    pub fn with_caption(mut self, max_caption: usize) -> Self {
        self.max_caption = max_caption;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl Chunk {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }
}

/// Chunks in the order they must be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryPlan {
    chunks: Vec<Chunk>,
}

impl DeliveryPlan {
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    /// All chunk texts joined back together.
    pub fn text(&self) -> String {
        self.chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }

    pub fn attachment_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| chunk.attachment.is_some())
            .count()
    }
}

/// Split `text` into as few chunks as `limits` allow and decide where the
/// attachment rides.
///
/// Concatenating the chunk texts always gives back `text`. The attachment
/// never rides on the first chunk of a split message: it goes on the tail
/// when the tail fits a caption, otherwise on a final chunk holding just
/// the trailing `hashtag` (or nothing, when the text does not end with it).
pub fn plan(
    text: &str,
    attachment: Option<Attachment>,
    limits: DeliveryLimits,
    hashtag: &str,
) -> DeliveryPlan {
    let max_chunk = limits.max_chunk.max(1);
    let max_caption = limits.max_caption.min(max_chunk);

    let mut chunks: Vec<Chunk> = hard_split(text, max_chunk)
        .into_iter()
        .map(Chunk::text)
        .collect();
    if chunks.is_empty() {
        chunks.push(Chunk::text(""));
    }

    let Some(attachment) = attachment else {
        return DeliveryPlan { chunks };
    };

    let tail = chunks.len() - 1;
    if char_count(&chunks[tail].text) <= max_caption {
        chunks[tail].attachment = Some(attachment);
        return DeliveryPlan { chunks };
    }

    let caption = if !hashtag.is_empty()
        && chunks[tail].text.ends_with(hashtag)
        && char_count(hashtag) <= max_caption
    {
        let cut = chunks[tail].text.len() - hashtag.len();
        chunks[tail].text.truncate(cut);
        hashtag.to_string()
    } else {
        String::new()
    };

    if chunks[tail].text.is_empty() {
        chunks.pop();
    }
    chunks.push(Chunk {
        text: caption,
        attachment: Some(attachment),
    });

    DeliveryPlan { chunks }
}

/// Consecutive pieces of exactly `max_chars` chars; the last may be
/// shorter.
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for ch in text.chars() {
        if current_len == max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push(ch);
        current_len += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}


#[cfg(all(test, feature = "fuzz"))]
mod fuzz {
    use super::*;
    use bytes::Bytes;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn plan_reconstructs_text(
            text in "\\PC{0,600}",
            max_chunk in 1usize..200,
            max_caption in 0usize..200,
            with_image in any::<bool>(),
        ) {
            let attachment = with_image.then(|| Attachment {
                filename: "image.jpg".to_string(),
                bytes: Bytes::from_static(b"img"),
            });
            let limits = DeliveryLimits::new(max_chunk).with_caption(max_caption);
            let plan = plan(&text, attachment, limits, "#tag");

            prop_assert_eq!(plan.text(), text.clone());
            prop_assert!(plan.chunks().iter().all(|c| c.text.chars().count() <= max_chunk));
            prop_assert_eq!(plan.attachment_count(), usize::from(with_image));
            let minimal = text.chars().count().div_ceil(max_chunk).max(1);
            prop_assert!(plan.len() <= minimal + 1);
        }
    }
}
