pub mod cache;
pub mod client;
pub mod interface;
pub mod pair;

pub use cache::PipelineCache;
pub use client::ModelTranslatorFactory;
pub use interface::*;

/// Pivot language of the chat pipeline
pub const ENGLISH: &str = "en";
