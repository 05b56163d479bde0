// Role management: requirements entries, installed files, new roles, comparison

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use adev_config::requirements::{Requirements, Role, Upsert};
use adev_core::command_stream::CommandRunner;
use adev_core::error::AdevError;
use adev_core::file_system::{ensure_dir, file_hash, remove_dir_if_exists, scan_files};
use adev_core::{adev_error, adev_info, adev_println, adev_success, adev_warning};
use adev_messages::{msg, MESSAGES};
use adev_provider::ansible::{galaxy_list_args, role_init_args, GalaxyScope, ANSIBLE_GALAXY};
use anyhow::Result;
use tracing::debug;

use super::restore::restore;
use super::{render_table, Workspace};
use crate::cli::RoleSubcommand;

/// Files that differ between checkouts without the role content differing.
const COMPARE_IGNORED: [&str; 3] = [".git", ".github", ".galaxy_install_info"];

pub fn handle_role_command(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    command: RoleSubcommand,
) -> Result<()> {
    match command {
        RoleSubcommand::Add {
            name,
            source,
            version,
        } => add(workspace, &name, source, version),
        RoleSubcommand::Remove { name, purge } => remove(workspace, &name, purge),
        RoleSubcommand::List {
            requirements,
            verbose,
        } => list(workspace, runner, requirements, verbose),
        RoleSubcommand::New {
            name,
            force,
            verbose,
        } => new_role(workspace, runner, &name, force, verbose),
        RoleSubcommand::Delete { name } => delete(workspace, &name),
        RoleSubcommand::Restore { verbose, force } => {
            restore(workspace, runner, GalaxyScope::Roles, verbose, force)
        }
        RoleSubcommand::Compare { checksum, no_diff } => {
            compare(workspace, runner, checksum, no_diff)
        }
    }
}

fn add(
    workspace: &Workspace,
    name: &str,
    source: Option<String>,
    version: Option<String>,
) -> Result<()> {
    let path = workspace.requirements_path();
    let mut manifest = Requirements::load_or_default(&path)?;

    let outcome = manifest.upsert_role(Role::new(name, source, version));
    manifest.save(&path)?;

    match outcome {
        Upsert::Added => adev_success!("{}", msg!(MESSAGES.requirements.role_added, name = name)),
        Upsert::Updated => {
            adev_success!("{}", msg!(MESSAGES.requirements.role_updated, name = name))
        }
    }
    Ok(())
}

fn remove(workspace: &Workspace, name: &str, purge: bool) -> Result<()> {
    let path = workspace.requirements_path();
    let mut manifest = Requirements::load(&path)?;

    if manifest.remove_role(name) == 0 {
        adev_warning!("{}", msg!(MESSAGES.requirements.role_not_present, name = name));
    } else {
        manifest.save(&path)?;
        adev_success!("{}", msg!(MESSAGES.requirements.role_removed, name = name));
    }

    if purge {
        delete(workspace, name)?;
    }
    Ok(())
}

fn list(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    requirements: bool,
    verbose: bool,
) -> Result<()> {
    if !requirements {
        runner.run(ANSIBLE_GALAXY, &galaxy_list_args("role", verbose))?;
        return Ok(());
    }

    let manifest = Requirements::load(&workspace.requirements_path())?;
    let rows: Vec<Vec<String>> = manifest
        .roles
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.source.clone().unwrap_or_default(),
                r.version.clone().unwrap_or_default(),
            ]
        })
        .collect();
    adev_println!("{}", render_table(&["Name", "Source", "Version"], &rows));
    Ok(())
}

fn role_folder(workspace: &Workspace, name: &str) -> Result<PathBuf> {
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        return Err(AdevError::Validation(format!("Invalid role name '{name}'")).into());
    }
    Ok(workspace.ansible_cfg()?.roles_path()?.join(name))
}

fn new_role(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    name: &str,
    force: bool,
    verbose: bool,
) -> Result<()> {
    let folder = role_folder(workspace, name)?;
    if folder.exists() {
        if !force {
            return Err(
                AdevError::Validation(msg!(MESSAGES.requirements.role_exists, name = name)).into(),
            );
        }
        remove_dir_if_exists(&folder)?;
    }

    let roles_path = workspace.ansible_cfg()?.roles_path()?;
    ensure_dir(&roles_path)?;
    runner.run(ANSIBLE_GALAXY, &role_init_args(name, &roles_path, verbose))?;
    Ok(())
}

fn delete(workspace: &Workspace, name: &str) -> Result<()> {
    if remove_dir_if_exists(&role_folder(workspace, name)?)? {
        adev_success!("{}", msg!(MESSAGES.requirements.role_files_deleted, name = name));
    } else {
        adev_info!("{}", msg!(MESSAGES.requirements.role_files_missing, name = name));
    }
    Ok(())
}

/// Hashes of one relative path in the workspace role and the repository role.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileComparison {
    path: PathBuf,
    local: Option<String>,
    repo: Option<String>,
}

impl FileComparison {
    fn matches(&self) -> bool {
        self.local.is_some() && self.local == self.repo
    }
}

fn compare_role_dirs(local: &Path, repo: &Path) -> Result<Vec<FileComparison>> {
    let local_files = scan_files(local, &COMPARE_IGNORED)?;
    let repo_files = scan_files(repo, &COMPARE_IGNORED)?;
    let all: BTreeSet<PathBuf> = local_files.iter().chain(&repo_files).cloned().collect();

    let hash_if_present = |root: &Path, rel: &Path| -> Result<Option<String>> {
        let path = root.join(rel);
        Ok(if path.is_file() {
            Some(file_hash(&path)?)
        } else {
            None
        })
    };

    all.into_iter()
        .map(|path| {
            Ok(FileComparison {
                local: hash_if_present(local, &path)?,
                repo: hash_if_present(repo, &path)?,
                path,
            })
        })
        .collect()
}

/// The repository checkout of a role, trying `<name>` then `<name>` without its namespace.
fn find_repo_role(repository: &Path, name: &str) -> Option<PathBuf> {
    let direct = repository.join(name);
    if direct.is_dir() {
        return Some(direct);
    }
    let (_, short) = name.split_once('.')?;
    let stripped = repository.join(short);
    stripped.is_dir().then_some(stripped)
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(&home).ok().map(Path::to_path_buf)) {
        Some(rel) => format!("~/{}", rel.display()),
        None => path.display().to_string(),
    }
}

fn diff_tool_args(repo: &Path, local: &Path) -> Vec<String> {
    let repo = repo.display().to_string();
    let local = local.display().to_string();
    if cfg!(windows) {
        ["/r", "/m", "Full", "/u", "/f", "AnsibleRoles"]
            .iter()
            .map(|a| a.to_string())
            .chain([repo, local])
            .collect()
    } else {
        vec![repo, local]
    }
}

fn compare(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    checksum: bool,
    no_diff: bool,
) -> Result<()> {
    let repository = workspace.config.roles_repository().ok_or_else(|| {
        AdevError::Config(
            "The Ansible development role directory is not defined; set ANSIBLE_ROLES or roles_repository"
                .to_string(),
        )
    })?;
    let roles_path = workspace.ansible_cfg()?.roles_path()?;

    let mut roles = Vec::new();
    if roles_path.is_dir() {
        for entry in fs::read_dir(&roles_path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                roles.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
    }
    roles.sort();

    if roles.is_empty() {
        adev_warning!(
            "{}",
            msg!(MESSAGES.requirements.compare_no_roles, path = roles_path.display().to_string())
        );
        return Ok(());
    }

    let mut failed = Vec::new();
    let mut status = None;
    for name in roles {
        let local = roles_path.join(&name);
        let Some(repo) = find_repo_role(&repository, &name) else {
            debug!("No checkout of '{}' in {}", name, repository.display());
            continue;
        };

        adev_println!(
            "{}",
            msg!(
                MESSAGES.requirements.compare_header,
                source = display_path(&local),
                dest = display_path(&repo)
            )
        );

        let files = compare_role_dirs(&local, &repo)?;
        if checksum {
            for file in &files {
                adev_println!("{}", describe(file));
            }
        }

        if files.iter().any(|f| !f.matches()) && !no_diff {
            match runner.run(&workspace.config.diff_tool, &diff_tool_args(&repo, &local)) {
                Ok(()) => {}
                Err(e @ AdevError::Execution { .. }) => {
                    adev_error!(
                        "{}",
                        msg!(
                            MESSAGES.requirements.compare_diff_failed,
                            name = &name,
                            error = e.to_string()
                        )
                    );
                    status = status.or(e.exit_status());
                    failed.push(name);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(AdevError::Execution {
            command: format!("{} ({})", workspace.config.diff_tool, failed.join(", ")),
            status,
        }
        .into())
    }
}

fn describe(file: &FileComparison) -> String {
    let name = file.path.display().to_string();
    match (&file.local, &file.repo) {
        (Some(left), Some(right)) if left == right => msg!(
            MESSAGES.requirements.compare_same,
            file = name,
            left = left,
            right = right
        ),
        (Some(left), Some(right)) => msg!(
            MESSAGES.requirements.compare_diff,
            file = name,
            left = left,
            right = right
        ),
        (Some(_), None) => msg!(MESSAGES.requirements.compare_missing_repo, file = name),
        (None, _) => msg!(MESSAGES.requirements.compare_missing_local, file = name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::workspace;
    use adev_provider::mock::RecordingRunner;

    fn ansible_workspace(root: &Path) -> Workspace {
        fs::write(root.join("ansible.cfg"), "[defaults]\nroles_path = ./roles\n").unwrap();
        workspace(root)
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn add_then_update_keeps_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(dir.path());

        add(&ws, "geerlingguy.docker", None, None).unwrap();
        add(&ws, "geerlingguy.docker", None, Some("7.0.2".into())).unwrap();

        let manifest = Requirements::load(&ws.requirements_path()).unwrap();
        assert_eq!(manifest.roles.len(), 1);
        assert_eq!(manifest.roles[0].source.as_deref(), Some("geerlingguy.docker"));
        assert_eq!(manifest.roles[0].version.as_deref(), Some("7.0.2"));
    }

    #[test]
    fn remove_with_purge_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        let ws = ansible_workspace(dir.path());
        add(&ws, "myrole", None, None).unwrap();
        write(&dir.path().join("roles/myrole/tasks/main.yml"), "---\n");

        remove(&ws, "myrole", true).unwrap();

        assert!(Requirements::load(&ws.requirements_path()).unwrap().roles.is_empty());
        assert!(!dir.path().join("roles/myrole").exists());
    }

    #[test]
    fn new_refuses_existing_role_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let ws = ansible_workspace(dir.path());
        fs::create_dir_all(dir.path().join("roles/myrole")).unwrap();
        let runner = RecordingRunner::new();

        assert!(new_role(&ws, &runner, "myrole", false, false).is_err());
        assert!(runner.commands().is_empty());

        new_role(&ws, &runner, "myrole", true, true).unwrap();
        let (program, args) = runner.calls().remove(0);
        assert_eq!(program, "ansible-galaxy");
        assert_eq!(&args[..4], ["role", "init", "myrole", "--init-path"]);
        assert_eq!(args.last().map(String::as_str), Some("--verbose"));
        assert!(!dir.path().join("roles/myrole").exists());
    }

    #[test]
    fn comparison_reports_changed_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local");
        let repo = dir.path().join("repo");
        write(&local.join("tasks/main.yml"), "a");
        write(&repo.join("tasks/main.yml"), "a");
        write(&local.join("defaults/main.yml"), "x");
        write(&repo.join("defaults/main.yml"), "y");
        write(&repo.join("README.md"), "docs");
        write(&local.join(".galaxy_install_info"), "installed");
        write(&repo.join(".git/HEAD"), "ref");

        let files = compare_role_dirs(&local, &repo).unwrap();
        let by_path = |p: &str| files.iter().find(|f| f.path == Path::new(p)).unwrap();

        assert_eq!(files.len(), 3);
        assert!(by_path("tasks/main.yml").matches());
        assert!(!by_path("defaults/main.yml").matches());
        assert!(by_path("README.md").local.is_none());
        assert!(describe(by_path("README.md")).contains("only in the repository"));
    }

    #[test]
    fn repo_role_found_without_namespace() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("base")).unwrap();

        assert_eq!(
            find_repo_role(dir.path(), "dcjulian29.base"),
            Some(dir.path().join("base"))
        );
        assert_eq!(find_repo_role(dir.path(), "other.role"), None);
    }

    #[test]
    fn compare_opens_diff_tool_only_for_differences() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = ansible_workspace(dir.path());
        let repo = dir.path().join("repo");
        ws.config.roles_repository = Some(repo.clone());
        ws.config.diff_tool = "meld".into();
        write(&dir.path().join("roles/same/tasks/main.yml"), "a");
        write(&repo.join("same/tasks/main.yml"), "a");
        write(&dir.path().join("roles/dcjulian29.changed/tasks/main.yml"), "a");
        write(&repo.join("changed/tasks/main.yml"), "b");
        let runner = RecordingRunner::new();

        compare(&ws, &runner, true, false).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "meld");
        assert!(calls[0].1[0].ends_with("changed"));
    }

    #[test]
    fn failing_diff_tool_does_not_skip_later_roles() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = ansible_workspace(dir.path());
        let repo = dir.path().join("repo");
        ws.config.roles_repository = Some(repo.clone());
        ws.config.diff_tool = "meld".into();
        for role in ["alpha", "beta"] {
            write(&dir.path().join(format!("roles/{role}/tasks/main.yml")), "a");
            write(&repo.join(format!("{role}/tasks/main.yml")), "b");
        }
        let alpha = repo.join("alpha").display().to_string();
        let runner = RecordingRunner::new().fail_when(&format!("meld {alpha}"), 1);

        let err = compare(&ws, &runner, false, false).unwrap_err();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].1[0].ends_with("beta"));
        assert!(err.to_string().contains("alpha"));
    }
}
