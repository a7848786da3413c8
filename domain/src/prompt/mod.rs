//! Payload assembly for orchestration stages.

pub mod template;

pub use template::PromptTemplate;
