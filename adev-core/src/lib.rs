pub mod command_stream;
pub mod error;
pub mod file_system;
pub mod output_macros;

pub use command_stream::{is_tool_installed, CommandRunner, SystemRunner};
pub use error::{AdevError, Result};
