// Ad-hoc ansible commands: shell, ping

use adev_core::command_stream::CommandRunner;
use adev_core::error::AdevError;
use adev_messages::MESSAGES;
use adev_provider::ansible::{adhoc_args, ANSIBLE};
use anyhow::Result;

use super::Workspace;

pub fn handle_shell(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    group: Option<&str>,
    command: &[String],
) -> Result<()> {
    let command = command.join(" ");
    if command.trim().is_empty() {
        return Err(AdevError::Validation(MESSAGES.common.shell_missing_command.to_string()).into());
    }
    workspace.require_vagrantfile()?;

    let args = adhoc_args(
        &workspace.group(group),
        &workspace.config.inventory,
        "shell",
        Some(&command),
    );
    runner.run(ANSIBLE, &args)?;
    Ok(())
}

pub fn handle_ping(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    group: Option<&str>,
) -> Result<()> {
    workspace.require_vagrantfile()?;

    let args = adhoc_args(&workspace.group(group), &workspace.config.inventory, "ping", None);
    runner.run(ANSIBLE, &args)?;
    Ok(())
}
