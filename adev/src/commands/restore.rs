// Install everything listed in requirements.yml

use adev_core::command_stream::CommandRunner;
use adev_core::error::AdevError;
use adev_provider::ansible::{galaxy_install_args, GalaxyScope, ANSIBLE_GALAXY};
use anyhow::Result;

use super::Workspace;

pub fn handle_restore(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    verbose: bool,
    force: bool,
) -> Result<()> {
    restore(workspace, runner, GalaxyScope::All, verbose, force)
}

pub(crate) fn restore(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    scope: GalaxyScope,
    verbose: bool,
    force: bool,
) -> Result<()> {
    if !workspace.requirements_path().is_file() {
        return Err(AdevError::Config(format!(
            "Requirements file is not present: {}",
            workspace.requirements_path().display()
        ))
        .into());
    }

    let args = galaxy_install_args(scope, &workspace.config.requirements, verbose, force);
    runner.run(ANSIBLE_GALAXY, &args)?;
    Ok(())
}
