//! Common/shared messages across commands

pub struct CommonMessages {
    pub config_using: &'static str,
    pub error_generic: &'static str,
    pub shell_missing_command: &'static str,
}

pub const COMMON_MESSAGES: CommonMessages = CommonMessages {
    config_using: "Using config file: {path}",
    error_generic: "❌ Error: {error}",
    shell_missing_command: "No shell command given. Usage: ansible-dev shell -- <command>",
};
