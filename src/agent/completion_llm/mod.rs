pub mod completion_llm_interface;
pub mod openai_completion_llm;

pub use completion_llm_interface::*;
pub use openai_completion_llm::*;
