pub mod pipeline;
pub mod types;

pub use pipeline::MessagePipeline;
pub use types::*;
