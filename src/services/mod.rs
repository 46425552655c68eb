pub mod llm;
pub mod outcome;
pub mod prompt;
pub mod request;
pub mod script;
pub mod speech;
pub mod tts;
pub mod workflow;
