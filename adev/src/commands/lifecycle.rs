// Environment lifecycle: start/up, reset, stop, destroy

use adev_core::command_stream::CommandRunner;
use adev_core::error::AdevError;
use adev_core::file_system::{remove_dir_if_exists, remove_file_if_exists};
use adev_core::{adev_error, adev_info, adev_println, adev_success};
use adev_messages::{msg, MESSAGES};
use adev_provider::ansible::TMP_DIR;
use adev_provider::probe::build_prober;
use adev_provider::{
    BaseRole, Inventory, InventoryEntry, ProbePolicy, Prober, ProvisionRequest, Provisioner,
    Vagrant,
};
use anyhow::Result;
use tracing::debug;

use super::Workspace;
use crate::cli::StartArgs;

const ANSIBLE_LOG: &str = "ansible.log";
const VAGRANT_STATE_DIR: &str = ".vagrant";

pub fn handle_start(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    start: &StartArgs,
) -> Result<()> {
    let prober = build_prober(&workspace.config.probe);
    start_with_prober(workspace, runner, prober.as_ref(), start)
}

pub(crate) fn start_with_prober(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    prober: &dyn Prober,
    start: &StartArgs,
) -> Result<()> {
    workspace.require_vagrantfile()?;

    let group = workspace.group(start.group.as_deref());
    let entries = Inventory::load(&workspace.inventory_path())?.group(&group)?;
    let request = ProvisionRequest::builder(group)
        .roles(start.roles.iter().cloned())
        .tags(start.tags.iter().cloned())
        .base(start.base)
        .flush_cache(start.flush_cache)
        .verbose(start.verbose)
        .build();

    provision(workspace, runner, prober, &entries, &request)
}

pub(crate) fn provision(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    prober: &dyn Prober,
    entries: &[InventoryEntry],
    request: &ProvisionRequest,
) -> Result<()> {
    debug!(
        group = request.target_group(),
        hosts = entries.len(),
        roles = ?request.roles(),
        "provisioning"
    );

    let base = BaseRole {
        name: workspace.config.base_role.clone(),
        tag: workspace.config.base_tag.clone(),
    };
    let policy = ProbePolicy::from(&workspace.config.probe);

    Provisioner::new(runner, prober, policy, base, &workspace.root)
        .run(entries, request)?
        .into_result()?;

    adev_success!("{}", MESSAGES.provision.complete);
    Ok(())
}

pub fn handle_reset(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    no_recreate: bool,
    start: &StartArgs,
) -> Result<()> {
    workspace.require_vagrantfile()?;

    if no_recreate {
        adev_info!("{}", MESSAGES.vm.reset_keep);
    } else {
        handle_destroy(workspace, runner)?;
    }

    handle_start(workspace, runner, start)
}

pub fn handle_stop(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    group: Option<&str>,
) -> Result<()> {
    workspace.require_vagrantfile()?;

    let group = workspace.group(group);
    let entries = Inventory::load(&workspace.inventory_path())?.group(&group)?;
    let vagrant = Vagrant::new(runner);

    let mut failed = Vec::new();
    let mut status = None;
    for entry in &entries {
        adev_println!("{}", msg!(MESSAGES.vm.stop_progress, name = &entry.name));
        match vagrant.halt(&entry.name) {
            Ok(()) => {}
            Err(e @ AdevError::Execution { .. }) => {
                adev_error!(
                    "{}",
                    msg!(MESSAGES.vm.stop_failed, name = &entry.name, error = e.to_string())
                );
                status = status.or(e.exit_status());
                failed.push(entry.name.clone());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(AdevError::Execution {
            command: format!("vagrant halt ({})", failed.join(", ")),
            status,
        }
        .into())
    }
}

pub fn handle_destroy(workspace: &Workspace, runner: &dyn CommandRunner) -> Result<()> {
    workspace.require_vagrantfile()?;

    adev_println!("{}", MESSAGES.vm.destroy_progress);
    Vagrant::new(runner).destroy_all()?;

    let root = &workspace.root;
    let mut removed = Vec::new();
    if remove_file_if_exists(&root.join(ANSIBLE_LOG))? {
        removed.push(ANSIBLE_LOG);
    }
    for dir in [VAGRANT_STATE_DIR, TMP_DIR] {
        if remove_dir_if_exists(&root.join(dir))? {
            removed.push(dir);
        }
    }
    for path in removed {
        adev_println!("{}", msg!(MESSAGES.vm.destroy_removed, path = path));
    }

    adev_success!("{}", MESSAGES.vm.destroy_success);
    Ok(())
}
