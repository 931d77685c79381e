pub mod openai;

pub use openai::{ChatOptions, OpenAi};
