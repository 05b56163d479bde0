//! adev-messages
//!
//! Centralized messaging system for the ansible-dev CLI.
//! Provides standardized templates and a message builder for user-facing output.

pub mod builder;
pub mod macros;
pub mod messages;

pub use messages::MESSAGES;
