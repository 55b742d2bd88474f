pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::MinuteConfig;
pub use error::{MinuteError, Result};
pub use events::{AgentEvent, ToolCategory};
pub use types::*;
