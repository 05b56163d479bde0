// Collection management: requirements entries and installed files

use std::path::PathBuf;

use adev_config::requirements::{Collection, Requirements, Upsert};
use adev_core::command_stream::CommandRunner;
use adev_core::error::AdevError;
use adev_core::file_system::remove_dir_if_exists;
use adev_core::{adev_info, adev_println, adev_success, adev_warning};
use adev_messages::{msg, MESSAGES};
use adev_provider::ansible::{galaxy_list_args, ANSIBLE_GALAXY};
use anyhow::Result;

use super::{render_table, Workspace};
use crate::cli::CollectionSubcommand;

const COLLECTIONS_ROOT: &str = "ansible_collections";

pub fn handle_collection_command(
    workspace: &Workspace,
    runner: &dyn CommandRunner,
    command: CollectionSubcommand,
) -> Result<()> {
    match command {
        CollectionSubcommand::Add {
            name,
            source,
            version,
        } => add(workspace, &name, source, version),
        CollectionSubcommand::Remove { name, purge } => remove(workspace, &name, purge),
        CollectionSubcommand::List {
            requirements,
            verbose,
        } => list(workspace, runner, requirements, verbose),
        CollectionSubcommand::Delete { name } => delete(workspace, &name),
        CollectionSubcommand::Purge => purge(workspace),
    }
}

fn add(
    workspace: &Workspace,
    name: &str,
    source: Option<String>,
    version: Option<String>,
) -> Result<()> {
    split_name(name)?;
    let path = workspace.requirements_path();
    let mut manifest = Requirements::load_or_default(&path)?;

    let outcome = manifest.upsert_collection(Collection::galaxy(name, source, version));
    manifest.save(&path)?;

    let template = match outcome {
        Upsert::Added => MESSAGES.requirements.collection_added,
        Upsert::Updated => MESSAGES.requirements.collection_updated,
    };
    adev_success!("{}", msg!(template, name = name));
    Ok(())
}

fn remove(workspace: &Workspace, name: &str, purge: bool) -> Result<()> {
    let path = workspace.requirements_path();
    let mut manifest = Requirements::load(&path)?;

    if manifest.remove_collection(name) == 0 {
        adev_warning!(
            "{}",
            msg!(MESSAGES.requirements.collection_not_present, name = name)
        );
    } else {
        manifest.save(&path)?;
        adev_success!("{}", msg!(MESSAGES.requirements.collection_removed, name = name));
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
        runner.run(ANSIBLE_GALAXY, &galaxy_list_args("collection", verbose))?;
        return Ok(());
    }

    let manifest = Requirements::load(&workspace.requirements_path())?;
    let rows: Vec<Vec<String>> = manifest
        .collections
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.source.clone().unwrap_or_default(),
                c.kind.clone().unwrap_or_default(),
                c.version.clone().unwrap_or_default(),
            ]
        })
        .collect();
    adev_println!(
        "{}",
        render_table(&["Name", "Source", "Type", "Version"], &rows)
    );
    Ok(())
}

/// `<namespace>.<name>`
fn split_name(name: &str) -> Result<(&str, &str)> {
    match name.split_once('.') {
        Some((namespace, collection))
            if !namespace.is_empty()
                && !collection.is_empty()
                && !name.contains(['/', '\\']) =>
        {
            Ok((namespace, collection))
        }
        _ => Err(AdevError::Validation(format!(
            "Invalid collection name '{name}'; expected <namespace>.<name>"
        ))
        .into()),
    }
}

fn collections_root(workspace: &Workspace) -> Result<PathBuf> {
    Ok(workspace
        .ansible_cfg()?
        .collections_path()?
        .join(COLLECTIONS_ROOT))
}

fn delete(workspace: &Workspace, name: &str) -> Result<()> {
    let (namespace, collection) = split_name(name)?;
    let folder = collections_root(workspace)?.join(namespace).join(collection);

    if remove_dir_if_exists(&folder)? {
        adev_success!(
            "{}",
            msg!(MESSAGES.requirements.collection_files_deleted, name = name)
        );
    } else {
        adev_info!(
            "{}",
            msg!(MESSAGES.requirements.collection_files_missing, name = name)
        );
    }
    Ok(())
}

fn purge(workspace: &Workspace) -> Result<()> {
    remove_dir_if_exists(&collections_root(workspace)?)?;
    adev_success!("{}", MESSAGES.requirements.collections_purged);
    Ok(())
}
