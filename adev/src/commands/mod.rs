// Command handlers for ansible-dev

use std::path::{Path, PathBuf};

use adev_config::{AnsibleCfg, AppConfig};
use adev_core::error::AdevError;
use adev_core::{adev_info, SystemRunner};
use adev_messages::{msg, MESSAGES};
use adev_provider::vagrant::VAGRANTFILE;
use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::{Args, Command};

pub mod adhoc;
pub mod collection;
pub mod init;
pub mod lifecycle;
pub mod playbook;
pub mod restore;
pub mod role;

/// The development folder a command operates on, with its configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: AppConfig,
}

impl Workspace {
    pub fn load(path: &Path, config_file: Option<&Path>) -> Result<Self> {
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Unable to determine the current directory")?
                .join(path)
        };

        let config = AppConfig::load(config_file, &root)?;
        if let Some(source) = &config.source {
            adev_info!("{}", msg!(MESSAGES.common.config_using, path = source.display().to_string()));
        }
        Ok(Self { root, config })
    }

    pub fn runner(&self) -> SystemRunner {
        SystemRunner::new(&self.root)
    }

    /// The inventory group to use: an explicit flag, else the configured default.
    pub fn group(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|g| !g.trim().is_empty())
            .unwrap_or(self.config.group.as_str())
            .to_string()
    }

    pub fn require_vagrantfile(&self) -> Result<()> {
        if self.root.join(VAGRANTFILE).is_file() {
            Ok(())
        } else {
            Err(AdevError::Config(msg!(
                MESSAGES.vm.vagrantfile_missing,
                path = self.root.display().to_string()
            ))
            .into())
        }
    }

    pub fn ansible_cfg(&self) -> Result<AnsibleCfg> {
        Ok(AnsibleCfg::load(&self.root)?)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.config.inventory_path(&self.root)
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.config.requirements_path(&self.root)
    }
}

/// Main command dispatcher
pub fn execute_command(args: Args) -> Result<()> {
    let workspace = Workspace::load(&args.path, args.config.as_deref())?;
    let runner = workspace.runner();

    match args.command {
        Command::Init { force } => {
            debug!("Handling init command with force={}", force);
            init::handle_init(&workspace, force)
        }
        Command::Start(start) => {
            debug!("Handling start command");
            lifecycle::handle_start(&workspace, &runner, &start)
        }
        Command::Reset { no_recreate, start } => {
            debug!("Handling reset command with no_recreate={}", no_recreate);
            lifecycle::handle_reset(&workspace, &runner, no_recreate, &start)
        }
        Command::Stop { group } => {
            debug!("Handling stop command");
            lifecycle::handle_stop(&workspace, &runner, group.as_deref())
        }
        Command::Destroy => {
            debug!("Handling destroy command");
            lifecycle::handle_destroy(&workspace, &runner)
        }
        Command::Play {
            role,
            group,
            tags,
            play,
        } => {
            debug!("Handling play command for role '{}'", role);
            playbook::handle_play(&workspace, &runner, &role, group.as_deref(), tags, &play)
        }
        Command::Runbook { name, play } => {
            debug!("Handling runbook command for '{}'", name);
            playbook::handle_runbook(&workspace, &runner, &name, &play)
        }
        Command::Tags { role } => {
            debug!("Handling tags command for role '{}'", role);
            playbook::handle_tags(&workspace, &runner, &role)
        }
        Command::Tasks { role, tags } => {
            debug!("Handling tasks command for role '{}'", role);
            playbook::handle_tasks(&workspace, &runner, &role, &tags)
        }
        Command::Shell { group, command } => {
            debug!("Handling shell command");
            adhoc::handle_shell(&workspace, &runner, group.as_deref(), &command)
        }
        Command::Ping { group } => {
            debug!("Handling ping command");
            adhoc::handle_ping(&workspace, &runner, group.as_deref())
        }
        Command::Restore { verbose, force } => {
            debug!("Handling restore command");
            restore::handle_restore(&workspace, &runner, verbose, force)
        }
        Command::Role { command } => {
            debug!("Handling role command");
            role::handle_role_command(&workspace, &runner, command)
        }
        Command::Collection { command } => {
            debug!("Handling collection command");
            collection::handle_collection_command(&workspace, &runner, command)
        }
    }
}

/// Left-aligned columns separated by two spaces, header first.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_row(headers, &widths)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(&cells, &widths));
    }
    lines.join("\n")
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn workspace(root: &Path) -> Workspace {
        Workspace {
            root: root.to_path_buf(),
            config: AppConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::workspace;
    use super::*;

    #[test]
    fn explicit_group_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        assert_eq!(ws.group(None), "vagrant");
        assert_eq!(ws.group(Some("ansibledev")), "ansibledev");
        assert_eq!(ws.group(Some(" ")), "vagrant");
    }

    #[test]
    fn vagrantfile_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());
        let err = ws.require_vagrantfile().unwrap_err();
        assert!(err.to_string().contains("Can't find the Vagrantfile"));

        std::fs::write(dir.path().join(VAGRANTFILE), "").unwrap();
        assert!(ws.require_vagrantfile().is_ok());
    }

    #[test]
    fn table_pads_columns() {
        let table = render_table(
            &["Name", "Version"],
            &[vec!["dcjulian29.base".into(), "1.0".into()], vec!["a".into(), String::new()]],
        );
        assert_eq!(
            table,
            "Name             Version\ndcjulian29.base  1.0\na"
        );
    }
}
