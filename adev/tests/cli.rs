use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn ansible_dev(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ansible-dev").unwrap();
    cmd.env("ADEV_TEST_MODE", "1")
        .env_remove("ANSIBLE_ROLES")
        .arg("--path")
        .arg(workspace);
    cmd
}

#[test]
fn version_flag_prints_version() {
    Command::cargo_bin("ansible-dev")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_scaffolds_workspace() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("dev");

    ansible_dev(&root)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("ansible.cfg"))
        .stdout(predicate::str::contains("Vagrantfile"));

    assert!(root.join("hosts.ini").is_file());
    assert!(root.join("requirements.yml").is_file());
    assert!(root.join("roles").is_dir());
}

#[test]
fn second_init_needs_force() {
    let dir = TempDir::new().unwrap();

    ansible_dev(dir.path()).arg("init").assert().success();
    ansible_dev(dir.path())
        .arg("init")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--force"));
    ansible_dev(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn start_without_vagrantfile_fails() {
    let dir = TempDir::new().unwrap();

    ansible_dev(dir.path())
        .args(["up", "--role", "myrole"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Can't find the Vagrantfile"));
}

#[test]
fn start_with_unknown_group_fails_before_starting_vms() {
    let dir = TempDir::new().unwrap();
    ansible_dev(dir.path()).arg("init").assert().success();

    ansible_dev(dir.path())
        .args(["start", "--group", "provisiontest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Group 'provisiontest' not found"));
}

#[test]
fn role_add_list_remove() {
    let dir = TempDir::new().unwrap();

    ansible_dev(dir.path())
        .args(["role", "add", "geerlingguy.docker", "--version", "7.0.2"])
        .assert()
        .success();
    ansible_dev(dir.path())
        .args(["role", "add", "dcjulian29.base"])
        .assert()
        .success();

    ansible_dev(dir.path())
        .args(["role", "list", "--requirements"])
        .assert()
        .success()
        .stdout(predicate::str::contains("geerlingguy.docker"))
        .stdout(predicate::str::contains("7.0.2"));

    ansible_dev(dir.path())
        .args(["role", "remove", "geerlingguy.docker"])
        .assert()
        .success();

    let manifest = fs::read_to_string(dir.path().join("requirements.yml")).unwrap();
    assert!(!manifest.contains("geerlingguy.docker"));
    assert!(manifest.contains("dcjulian29.base"));
}

#[test]
fn remove_from_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();

    ansible_dev(dir.path())
        .args(["collection", "remove", "community.general"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Requirements file is not present"));
}

#[test]
fn collection_add_and_list() {
    let dir = TempDir::new().unwrap();

    ansible_dev(dir.path())
        .args(["collection", "add", "community.general"])
        .assert()
        .success();

    ansible_dev(dir.path())
        .args(["collection", "list", "--requirements"])
        .assert()
        .success()
        .stdout(predicate::str::contains("community.general"))
        .stdout(predicate::str::contains("galaxy"));
}

#[test]
fn shell_without_command_fails() {
    let dir = TempDir::new().unwrap();

    ansible_dev(dir.path())
        .args(["shell", "--"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No shell command given"));
}

#[test]
fn missing_runbook_fails() {
    let dir = TempDir::new().unwrap();
    ansible_dev(dir.path()).arg("init").assert().success();

    ansible_dev(dir.path())
        .args(["runbook", "site"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("playbooks/site.yml"));
}

#[test]
fn bad_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".ansible-dev.yml"), "probe:\n  attempts: 0\n").unwrap();

    ansible_dev(dir.path())
        .args(["role", "add", "x.y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("probe.attempts"));
}
