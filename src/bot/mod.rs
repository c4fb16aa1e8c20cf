//! Turns inbound events into posts.
//!
//! Each event is handled on its own with no memory of earlier ones, so the
//! dispatcher may run any number of `handle` calls at once.

pub mod command;
pub mod messages;

pub use command::Command;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::delivery::{self, DeliveryLimits};
use crate::dispatch::{Attachment, Dispatcher, InboundEvent, MessageHandle, OutboundMessage};
use crate::extractor::{self, ArticleSummary, detect_language, is_foreign};
use crate::fetcher::Fetcher;
use crate::filler::FillerGenerator;
use crate::llm::{OpenAiClient, TextService};
use crate::rewriter::{ARTICLE_WORD_CEILING, StyleRewriter, StyledPost};
use crate::translator::Translator;

/// Language of the channel; other text gets translated into it.
pub const LOCAL_LANGUAGE: &str = "ru";
/// Source tag assumed when whatlang has no confident answer.
const DEFAULT_FOREIGN_LANGUAGE: &str = "en";

pub struct Bot {
    fetcher: Fetcher,
    translator: Translator,
    rewriter: StyleRewriter,
    filler: FillerGenerator,
    limits: DeliveryLimits,
}

impl Bot {
    pub fn new(fetcher: Fetcher, service: Arc<dyn TextService>, config: &Config) -> Self {
        let timeout = config.llm_timeout();
        let rewriter = StyleRewriter::new(service.clone(), timeout, config.canonical_hashtag());
        Self {
            fetcher,
            translator: Translator::new(service.clone(), timeout),
            filler: FillerGenerator::new(service, rewriter.clone(), timeout),
            rewriter,
            limits: DeliveryLimits::new(config.max_chunk_chars()),
        }
    }

    /// Wire up the real fetcher and OpenAI-compatible text service.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = Fetcher::from_config(config)?;
        let service: Arc<dyn TextService> = Arc::new(OpenAiClient::from_config(config)?);
        Ok(Self::new(fetcher, service, config))
    }

    /// Handle one inbound event end to end.
    ///
    /// Pipeline failures degrade into a weaker post; only dispatcher errors
    /// while reporting come back as `Err`.
    #[instrument(skip_all, fields(channel = %event.channel_id, author = %event.author_id))]
    pub async fn handle(&self, event: &InboundEvent, dispatcher: &dyn Dispatcher) -> Result<()> {
        if event.author_id == dispatcher.self_id() {
            debug!("Ignoring own message");
            return Ok(());
        }

        let channel = event.channel_id.as_str();
        match Command::parse(&event.text) {
            Command::Ping => {
                dispatcher.send(channel, OutboundMessage::text(messages::PONG)).await?;
            }
            Command::Help => {
                dispatcher.send(channel, OutboundMessage::text(messages::HELP)).await?;
            }
            Command::Url(url) => {
                info!("Processing link {}", url);
                let progress = dispatcher
                    .send(channel, OutboundMessage::text(messages::PROCESSING_URL))
                    .await?;
                let article = self.article_post(&url).await;
                self.publish(dispatcher, channel, &progress, article).await?;
            }
            Command::Style(text) => {
                info!("Processing raw text ({} chars)", text.chars().count());
                let progress = dispatcher
                    .send(channel, OutboundMessage::text(messages::PROCESSING_TEXT))
                    .await?;
                let post = self.text_post(&text).await;
                self.publish(dispatcher, channel, &progress, ArticlePost::text_only(post))
                    .await?;
            }
            Command::Filler => {
                let progress = dispatcher
                    .send(channel, OutboundMessage::text(messages::PROCESSING_FILLER))
                    .await?;
                match self.filler.generate().await {
                    Ok(post) => {
                        self.publish(dispatcher, channel, &progress, ArticlePost::text_only(post))
                            .await?;
                    }
                    Err(e) => {
                        warn!("Filler generation failed: {}", e);
                        dispatcher
                            .edit(&progress, &format!("{} ({e})", messages::FILLER_FAILED))
                            .await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Fetch → extract → translate → rewrite, with the hero image downloaded
    /// alongside the rewrite. Always produces a post.
    ///
    /// A page with no usable body goes straight to the template post; the
    /// service only ever sees text we actually read.
    pub async fn article_post(&self, url: &str) -> ArticlePost {
        let summary = match self.fetcher.fetch(url).await {
            Ok(page) => extractor::extract_page(&page),
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                ArticleSummary::unavailable()
            }
        };
        let title = summary.has_title().then(|| summary.title());

        let rewrite = async {
            if summary.body_text().trim().is_empty() {
                info!("No article text, using template post");
                return self
                    .rewriter
                    .fallback_post("", title, ARTICLE_WORD_CEILING);
            }
            let body = self.localize(summary.body_text()).await;
            self.rewriter.rewrite(&body, title, ARTICLE_WORD_CEILING).await
        };

        let (post, image) = tokio::join!(rewrite, self.download_image(summary.image_url()));
        ArticlePost {
            post,
            image_missing: summary.image_url().is_some() && image.is_none(),
            image,
        }
    }

    /// Translate if needed, then rewrite.
    pub async fn text_post(&self, text: &str) -> StyledPost {
        let text = self.localize(text).await;
        self.rewriter.rewrite(&text, None, ARTICLE_WORD_CEILING).await
    }

    async fn localize(&self, text: &str) -> String {
        if !is_foreign(text) {
            return text.to_string();
        }

        let source = detect_language(text)
            .filter(|lang| lang != LOCAL_LANGUAGE)
            .unwrap_or_else(|| DEFAULT_FOREIGN_LANGUAGE.to_string());
        self.translator.translate(text, &source, LOCAL_LANGUAGE).await
    }

    async fn download_image(&self, url: Option<&str>) -> Option<Attachment> {
        let url = url?;
        match self.fetcher.fetch_image(url).await {
            Ok(image) => Some(Attachment {
                filename: image.filename(),
                bytes: image.bytes,
            }),
            Err(e) => {
                warn!("Hero image {} unavailable, posting text only: {}", url, e);
                None
            }
        }
    }

    /// Deliver the post and clear the progress message, or turn the progress
    /// message into an error notice when delivery fails.
    async fn publish(
        &self,
        dispatcher: &dyn Dispatcher,
        channel: &str,
        progress: &MessageHandle,
        article: ArticlePost,
    ) -> Result<()> {
        let ArticlePost {
            post,
            image,
            image_missing,
        } = article;

        let text = if image_missing {
            format!("{}\n{}", post.text(), messages::IMAGE_MISSING)
        } else {
            post.text().to_string()
        };
        let plan = delivery::plan(&text, image, self.limits, self.rewriter.hashtag());
        let chunks = plan.len();

        match delivery::deliver(dispatcher, channel, plan).await {
            Ok(report) => {
                info!("Posted {} chunk(s)", chunks);
                if report.attachment_dropped
                    && let Err(e) = dispatcher
                        .send(channel, OutboundMessage::text(messages::IMAGE_MISSING))
                        .await
                {
                    warn!("Could not report dropped image: {}", e);
                }
                if let Err(e) = dispatcher.delete(progress).await {
                    warn!("Could not delete progress message: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Delivery failed: {}", e);
                dispatcher
                    .edit(progress, &format!("{} ({e})", messages::DELIVERY_FAILED))
                    .await?;
                Ok(())
            }
        }
    }
}

/// A finished post plus what happened to its hero image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePost {
    pub post: StyledPost,
    pub image: Option<Attachment>,
    /// The page advertised an image we could not download.
    pub image_missing: bool,
}

impl ArticlePost {
    pub fn text_only(post: StyledPost) -> Self {
        Self {
            post,
            image: None,
            image_missing: false,
        }
    }
}
