//! Argument assembly for `ansible`, `ansible-playbook` and `ansible-galaxy`,
//! plus the generated single-role play.

use std::fs;
use std::path::{Path, PathBuf};

use adev_config::templates::render_play;
use adev_core::error::{AdevError, Result};
use adev_core::file_system::ensure_dir;
use tracing::debug;

pub const ANSIBLE: &str = "ansible";
pub const ANSIBLE_PLAYBOOK: &str = "ansible-playbook";
pub const ANSIBLE_GALAXY: &str = "ansible-galaxy";

/// Scratch folder for generated plays, relative to the workspace.
pub const TMP_DIR: &str = ".tmp";
/// Generated play, relative to the workspace.
pub const PLAY_FILE: &str = ".tmp/play.yml";

/// Flags passed to `ansible-playbook`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybookOptions {
    pub limit: Option<String>,
    pub tags: Vec<String>,
    pub flush_cache: bool,
    pub ask_vault_password: bool,
    pub ask_become_password: bool,
    pub step: bool,
    pub verbose: bool,
}

impl PlaybookOptions {
    /// Arguments for running `playbook` (path relative to the workspace).
    pub fn args(&self, playbook: &str) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(limit) = self.limit.as_deref().filter(|l| !l.is_empty()) {
            args.push("--limit".to_string());
            args.push(limit.to_string());
        }
        if !self.tags.is_empty() {
            args.push("--tags".to_string());
            args.push(self.tags.join(","));
        }
        if self.flush_cache {
            args.push("--flush-cache".to_string());
        }
        if self.ask_vault_password {
            args.push("--ask-vault-password".to_string());
        }
        if self.ask_become_password {
            args.push("--ask-become-pass".to_string());
        }
        if self.verbose {
            args.push("-v".to_string());
        }
        if self.step {
            args.push("--step".to_string());
        }

        args.push(playbook.to_string());
        args
    }
}

/// Write `.tmp/play.yml` applying `role` to all hosts, replacing any previous play.
pub fn write_play(workspace: &Path, role: &str) -> Result<PathBuf> {
    let content = render_play(role)?;
    ensure_dir(&workspace.join(TMP_DIR))?;

    let path = workspace.join(PLAY_FILE);
    fs::write(&path, content).map_err(|e| {
        AdevError::Io(std::io::Error::new(
            e.kind(),
            format!("unable to write '{}': {}", path.display(), e),
        ))
    })?;
    debug!("Generated play for role '{}' at {}", role, path.display());
    Ok(path)
}

pub fn list_tags_args() -> Vec<String> {
    vec!["--list-tags".to_string(), PLAY_FILE.to_string()]
}

pub fn list_tasks_args(tags: &[String]) -> Vec<String> {
    let mut args = Vec::new();
    if !tags.is_empty() {
        args.push("--tags".to_string());
        args.push(tags.join(","));
    }
    args.push("--list-tasks".to_string());
    args.push(PLAY_FILE.to_string());
    args
}

/// `ansible <group> -i <inventory> -m <module> [-a <module_args>]`
pub fn adhoc_args(
    group: &str,
    inventory: &Path,
    module: &str,
    module_args: Option<&str>,
) -> Vec<String> {
    let mut args = vec![
        group.to_string(),
        "-i".to_string(),
        inventory.display().to_string(),
        "-m".to_string(),
        module.to_string(),
    ];
    if let Some(module_args) = module_args {
        args.push("-a".to_string());
        args.push(module_args.to_string());
    }
    args
}

/// What `ansible-galaxy install` restores from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalaxyScope {
    All,
    Roles,
    Collections,
}

/// `ansible-galaxy [role|collection] install [-v] [--force] -r <requirements>`
pub fn galaxy_install_args(
    scope: GalaxyScope,
    requirements: &Path,
    verbose: bool,
    force: bool,
) -> Vec<String> {
    let mut args = Vec::new();
    match scope {
        GalaxyScope::All => {}
        GalaxyScope::Roles => args.push("role".to_string()),
        GalaxyScope::Collections => args.push("collection".to_string()),
    }
    args.push("install".to_string());
    if verbose {
        args.push("-v".to_string());
    }
    if force {
        args.push("--force".to_string());
    }
    args.push("-r".to_string());
    args.push(requirements.display().to_string());
    args
}

/// `ansible-galaxy <kind> list [-v]`
pub fn galaxy_list_args(kind: &str, verbose: bool) -> Vec<String> {
    let mut args = vec![kind.to_string(), "list".to_string()];
    if verbose {
        args.push("-v".to_string());
    }
    args
}

/// `ansible-galaxy role init <name> --init-path <path> [--verbose]`
pub fn role_init_args(name: &str, init_path: &Path, verbose: bool) -> Vec<String> {
    let mut args = vec![
        "role".to_string(),
        "init".to_string(),
        name.to_string(),
        "--init-path".to_string(),
        init_path.display().to_string(),
    ];
    if verbose {
        args.push("--verbose".to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playbook_args_follow_ansible_order() {
        let options = PlaybookOptions {
            limit: Some("vagrant".into()),
            tags: vec!["install".into(), "config".into()],
            flush_cache: true,
            ask_vault_password: true,
            ask_become_password: true,
            step: true,
            verbose: true,
        };

        assert_eq!(
            options.args(PLAY_FILE),
            vec![
                "--limit",
                "vagrant",
                "--tags",
                "install,config",
                "--flush-cache",
                "--ask-vault-password",
                "--ask-become-pass",
                "-v",
                "--step",
                ".tmp/play.yml"
            ]
        );
    }

    #[test]
    fn empty_options_only_name_the_playbook() {
        assert_eq!(
            PlaybookOptions::default().args("playbooks/runbook.yml"),
            vec!["playbooks/runbook.yml"]
        );
    }

    #[test]
    fn adhoc_shell_keeps_command_as_one_argument() {
        let args = adhoc_args("vagrant", Path::new("hosts.ini"), "shell", Some("uname -a"));
        assert_eq!(
            args,
            vec!["vagrant", "-i", "hosts.ini", "-m", "shell", "-a", "uname -a"]
        );
    }

    #[test]
    fn galaxy_role_restore() {
        let args = galaxy_install_args(
            GalaxyScope::Roles,
            Path::new("requirements.yml"),
            true,
            true,
        );
        assert_eq!(
            args,
            vec!["role", "install", "-v", "--force", "-r", "requirements.yml"]
        );
    }

    #[test]
    fn write_play_replaces_previous_play() {
        let dir = tempfile::tempdir().unwrap();
        write_play(dir.path(), "first").unwrap();
        let path = write_play(dir.path(), "second").unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("- second"));
        assert!(!content.contains("first"));
    }
}
