// Workspace scaffolding

use std::fs;
use std::path::Path;

use adev_config::ansible_cfg::ANSIBLE_CFG;
use adev_config::requirements::Requirements;
use adev_config::templates::{
    default_machines, render_inventory, render_vagrantfile, ANSIBLE_CFG_CONTENT,
    ANSIBLE_LINT_CONTENT,
};
use adev_core::error::AdevError;
use adev_core::file_system::ensure_dir;
use adev_core::{adev_println, adev_success};
use adev_messages::{msg, MESSAGES};
use adev_provider::vagrant::VAGRANTFILE;
use anyhow::{Context, Result};

use super::Workspace;

const ANSIBLE_LINT: &str = ".ansible-lint";
const WORKSPACE_DIRS: [&str; 2] = ["roles", "playbooks"];

pub fn handle_init(workspace: &Workspace, force: bool) -> Result<()> {
    let root = &workspace.root;
    adev_println!("{}", MESSAGES.vm.init_header);

    if !root.is_dir() {
        adev_println!(
            "{}",
            msg!(MESSAGES.vm.init_creating_folder, path = root.display().to_string())
        );
        ensure_dir(root)?;
    }

    if root.join(ANSIBLE_CFG).exists() && !force {
        return Err(AdevError::Validation(msg!(
            MESSAGES.vm.init_exists,
            path = root.display().to_string()
        ))
        .into());
    }

    for dir in WORKSPACE_DIRS {
        adev_println!("{}", msg!(MESSAGES.vm.init_item, item = format!("{dir}/")));
        ensure_dir(&root.join(dir))?;
    }

    let machines = default_machines();
    write_item(root, ANSIBLE_CFG, ANSIBLE_CFG_CONTENT)?;
    write_item(root, ANSIBLE_LINT, ANSIBLE_LINT_CONTENT)?;
    write_item(
        root,
        &workspace.config.inventory.display().to_string(),
        &render_inventory(&machines)?,
    )?;
    write_item(root, VAGRANTFILE, &render_vagrantfile(&machines)?)?;

    let requirements = workspace.requirements_path();
    if !requirements.exists() {
        adev_println!(
            "{}",
            msg!(MESSAGES.vm.init_item, item = workspace.config.requirements.display().to_string())
        );
        Requirements::default().save(&requirements)?;
    }

    adev_success!("{}", msg!(MESSAGES.vm.init_success, path = root.display().to_string()));
    Ok(())
}

fn write_item(root: &Path, name: &str, content: &str) -> Result<()> {
    adev_println!("{}", msg!(MESSAGES.vm.init_item, item = name));
    let path = root.join(name);
    fs::write(&path, content).with_context(|| format!("Unable to write {}", path.display()))
}
