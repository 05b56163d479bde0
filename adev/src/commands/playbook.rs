// Playbook commands: play, runbook, tags, tasks

use adev_core::command_stream::CommandRunner;
use adev_core::error::AdevError;
use adev_provider::ansible::{
    list_tags_args, list_tasks_args, write_play, PlaybookOptions, ANSIBLE_PLAYBOOK, PLAY_FILE,
};
use anyhow::Result;

use super::Workspace;
use crate::cli::PlayArgs;

const PLAYBOOKS_DIR: &str = "playbooks";

fn playbook_options(play: &PlayArgs, limit: Option<String>, tags: Vec<String>) -> PlaybookOptions {
    PlaybookOptions {
        limit,
        tags,
        flush_cache: play.flush_cache,
        ask_vault_password: play.ask_vault_password,
        ask_become_password: play.ask_become_password,
        step: play.step,
        verbose: play.verbose,
    }
}

pub fn handle_play(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    role: &str,
    group: Option<&str>,
    tags: Vec<String>,
    play: &PlayArgs,
) -> Result<()> {
    workspace.require_vagrantfile()?;

    write_play(&workspace.root, role)?;
    let options = playbook_options(play, Some(workspace.group(group)), tags);
    runner.run(ANSIBLE_PLAYBOOK, &options.args(PLAY_FILE))?;
    Ok(())
}

pub fn handle_runbook(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    name: &str,
    play: &PlayArgs,
) -> Result<()> {
    workspace.require_vagrantfile()?;

    let playbook = format!("{PLAYBOOKS_DIR}/{name}.yml");
    if !workspace.root.join(&playbook).is_file() {
        return Err(AdevError::Config(format!(
            "Playbook not found: {}",
            workspace.root.join(&playbook).display()
        ))
        .into());
    }

    let options = playbook_options(play, None, Vec::new());
    runner.run(ANSIBLE_PLAYBOOK, &options.args(&playbook))?;
    Ok(())
}

pub fn handle_tags(workspace: &Workspace, runner: &dyn CommandRunner, role: &str) -> Result<()> {
    workspace.ansible_cfg()?;

    write_play(&workspace.root, role)?;
    runner.run(ANSIBLE_PLAYBOOK, &list_tags_args())?;
    Ok(())
}

pub fn handle_tasks(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    role: &str,
    tags: &[String],
) -> Result<()> {
    workspace.ansible_cfg()?;

    write_play(&workspace.root, role)?;
    runner.run(ANSIBLE_PLAYBOOK, &list_tasks_args(tags))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::workspace;
    use adev_provider::mock::RecordingRunner;
    use std::fs;

    #[test]
    fn play_limits_to_group_and_passes_become_prompt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Vagrantfile"), "").unwrap();
        let runner = RecordingRunner::new();
        let play = PlayArgs {
            ask_become_password: true,
            ..PlayArgs::default()
        };

        handle_play(
            &workspace(dir.path()),
            &runner,
            "myrole",
            Some("ansibledev"),
            vec!["install".to_string()],
            &play,
        )
        .unwrap();

        assert_eq!(
            runner.commands(),
            vec!["ansible-playbook --limit ansibledev --tags install --ask-become-pass .tmp/play.yml"]
        );
        let generated = fs::read_to_string(dir.path().join(PLAY_FILE)).unwrap();
        assert!(generated.contains("- myrole"));
    }

    #[test]
    fn runbook_uses_the_named_playbook() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Vagrantfile"), "").unwrap();
        fs::create_dir_all(dir.path().join(PLAYBOOKS_DIR)).unwrap();
        fs::write(dir.path().join("playbooks/site.yml"), "---\n").unwrap();
        let runner = RecordingRunner::new();
        let play = PlayArgs {
            verbose: true,
            ..PlayArgs::default()
        };

        handle_runbook(&workspace(dir.path()), &runner, "site", &play).unwrap();
        assert_eq!(runner.commands(), vec!["ansible-playbook -v playbooks/site.yml"]);
    }

    #[test]
    fn missing_runbook_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Vagrantfile"), "").unwrap();
        let runner = RecordingRunner::new();

        let err = handle_runbook(&workspace(dir.path()), &runner, "runbook", &PlayArgs::default())
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<AdevError>(), Some(AdevError::Config(_))));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn tasks_lists_with_tags() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ansible.cfg"), "[defaults]\nroles_path = ./roles\n").unwrap();
        let runner = RecordingRunner::new();

        handle_tasks(&workspace(dir.path()), &runner, "myrole", &["config".to_string()]).unwrap();
        assert_eq!(
            runner.commands(),
            vec!["ansible-playbook --tags config --list-tasks .tmp/play.yml"]
        );
    }
}
