pub mod completion_llm;
pub mod completion_llm_factory;

pub use completion_llm::*;
pub use completion_llm_factory::*;
