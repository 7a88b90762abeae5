pub mod common;
pub mod completion;
pub mod config;
pub mod copy;
pub mod prompts;
pub mod vision;
