pub mod bot;
pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod extractor;
pub mod fetcher;
pub mod filler;
pub mod llm;
pub mod rewriter;
pub mod runner;
pub mod text;
pub mod translator;
