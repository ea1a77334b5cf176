#![warn(clippy::uninlined_format_args)]

pub mod parser;
pub mod store;

pub use parser::SplitzyScriptParser;
pub use store::{KeyValueBackend, KeyValueSessionStore, MemoryBackend};
