//! Error taxonomy shared by every crate in the workspace.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdevError {
    /// Bad or missing inventory, manifest, ansible.cfg or app configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A liveness probe could not even be attempted (raw socket refused, etc).
    #[error("Probe error: {0}")]
    Probe(String),

    /// A delegated program exited unsuccessfully.
    #[error("Command failed ({}): {command}", describe_status(.status))]
    Execution {
        command: String,
        status: Option<i32>,
    },

    #[error("Host '{host}' was not found at {address} after {attempts} attempts")]
    Unreachable {
        host: String,
        address: String,
        attempts: u32,
    },

    #[error("Role application failed for: {}", .0.join(", "))]
    RolesFailed(Vec<String>),

    #[error("Dependency not found: {0}")]
    Dependency(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl AdevError {
    /// The exit code of a failed delegated program, if this is an execution failure.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            AdevError::Execution { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_yaml_ng::Error> for AdevError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        AdevError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdevError>;
