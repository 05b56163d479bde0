// CLI argument parsing and definitions

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ansible-dev")]
#[command(about = "Develop Ansible playbooks, roles and collections against local Vagrant VMs")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Development environment folder
    #[arg(long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Path to a custom ansible-dev configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

/// Flags shared by `start` and `reset`.
#[derive(Debug, Clone, ClapArgs)]
pub struct StartArgs {
    /// Provision the VMs with these roles (repeatable or comma-separated)
    #[arg(long = "role", value_delimiter = ',')]
    pub roles: Vec<String>,

    /// Apply the roles with these tags (repeatable or comma-separated)
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Provision the VMs with the base role limited to its base tag
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub base: bool,

    /// Clear the fact cache for every host in the inventory
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub flush_cache: bool,

    /// Tell Ansible to print more debug messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Inventory group to start and provision
    #[arg(long)]
    pub group: Option<String>,
}

/// Flags passed through to `ansible-playbook`.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct PlayArgs {
    /// Tell Ansible to print more debug messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Ask for the vault password
    #[arg(long)]
    pub ask_vault_password: bool,

    /// Ask for the privilege escalation password
    #[arg(long)]
    pub ask_become_password: bool,

    /// Clear the fact cache for every host in the inventory
    #[arg(long)]
    pub flush_cache: bool,

    /// One step at a time: confirm each task before running
    #[arg(long)]
    pub step: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RoleSubcommand {
    /// Add or update a role in requirements.yml
    Add {
        name: String,
        /// Where to fetch the role from (defaults to the name)
        #[arg(long)]
        source: Option<String>,
        /// Role version
        #[arg(long)]
        version: Option<String>,
    },
    /// Remove a role from requirements.yml
    Remove {
        name: String,
        /// Also delete the installed role files
        #[arg(long)]
        purge: bool,
    },
    /// Show installed roles, or the roles in requirements.yml
    List {
        /// Show only roles from requirements.yml
        #[arg(short, long)]
        requirements: bool,
        /// Tell Ansible to print more debug messages
        #[arg(short, long)]
        verbose: bool,
    },
    /// Create a new role skeleton in the roles path
    New {
        name: String,
        /// Replace an existing role
        #[arg(short, long)]
        force: bool,
        /// Tell Ansible to print more debug messages
        #[arg(short, long)]
        verbose: bool,
    },
    /// Delete installed role files
    Delete { name: String },
    /// Install the roles listed in requirements.yml
    Restore {
        #[arg(short, long)]
        verbose: bool,
        /// Reinstall roles that are already present
        #[arg(short, long)]
        force: bool,
    },
    /// Compare installed roles with their development checkouts
    Compare {
        /// Print per-file checksums
        #[arg(long)]
        checksum: bool,
        /// Do not open the diff tool
        #[arg(long)]
        no_diff: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CollectionSubcommand {
    /// Add or update a Galaxy collection in requirements.yml
    Add {
        name: String,
        /// Where to fetch the collection from (defaults to the name)
        #[arg(long)]
        source: Option<String>,
        /// Collection version
        #[arg(long)]
        version: Option<String>,
    },
    /// Remove a collection from requirements.yml
    Remove {
        name: String,
        /// Also delete the installed collection files
        #[arg(long)]
        purge: bool,
    },
    /// Show installed collections, or the collections in requirements.yml
    List {
        /// Show only collections from requirements.yml
        #[arg(short, long)]
        requirements: bool,
        #[arg(short, long)]
        verbose: bool,
    },
    /// Delete installed collection files
    Delete { name: String },
    /// Delete every installed collection
    Purge,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Initialize a development environment for Ansible
    Init {
        /// Overwrite an existing development environment
        #[arg(short, long)]
        force: bool,
    },

    /// Start and provision the Vagrant environment
    #[command(visible_alias = "up")]
    Start(StartArgs),

    /// Destroy and recreate the Vagrant environment
    Reset {
        /// Keep the existing VMs
        #[arg(long)]
        no_recreate: bool,

        #[command(flatten)]
        start: StartArgs,
    },

    /// Halt the VMs of a group
    Stop {
        #[arg(long)]
        group: Option<String>,
    },

    /// Destroy the Vagrant environment and its scratch files
    Destroy,

    /// Apply a role to the VMs
    Play {
        role: String,

        /// Inventory group to limit the play to
        #[arg(long)]
        group: Option<String>,

        /// Only run plays and tasks tagged with these values
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        #[command(flatten)]
        play: PlayArgs,
    },

    /// Run a playbook from the playbooks folder
    Runbook {
        /// Playbook name without extension
        #[arg(default_value = "runbook")]
        name: String,

        #[command(flatten)]
        play: PlayArgs,
    },

    /// List the tags of a role
    Tags { role: String },

    /// List the tasks of a role
    Tasks {
        role: String,

        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Run a shell command on every VM of a group
    Shell {
        #[arg(long)]
        group: Option<String>,

        /// Command to run, after `--`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Check connectivity with the Ansible ping module
    Ping {
        #[arg(long)]
        group: Option<String>,
    },

    /// Install the roles and collections listed in requirements.yml
    Restore {
        #[arg(short, long)]
        verbose: bool,
        /// Reinstall content that is already present
        #[arg(short, long)]
        force: bool,
    },

    /// Manage roles
    Role {
        #[command(subcommand)]
        command: RoleSubcommand,
    },

    /// Manage collections
    Collection {
        #[command(subcommand)]
        command: CollectionSubcommand,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn start_accepts_repeated_and_comma_separated_roles() {
        let args = Args::parse_from([
            "ansible-dev", "up", "--role", "a,b", "--role", "c", "--tag", "x", "--base=false",
        ]);
        match args.command {
            Command::Start(start) => {
                assert_eq!(start.roles, vec!["a", "b", "c"]);
                assert_eq!(start.tags, vec!["x"]);
                assert!(!start.base);
                assert!(start.flush_cache);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_base_and_flush_cache_mean_true() {
        let args = Args::try_parse_from([
            "ansible-dev", "start", "--base", "--flush-cache", "--role", "myrole",
        ])
        .unwrap();
        match args.command {
            Command::Start(start) => {
                assert!(start.base);
                assert!(start.flush_cache);
                assert_eq!(start.roles, vec!["myrole"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn reset_accepts_flush_cache_false() {
        let args = Args::parse_from(["ansible-dev", "reset", "--flush-cache=false"]);
        match args.command {
            Command::Reset { start, .. } => assert!(!start.flush_cache),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_collects_command_after_separator() {
        let args = Args::parse_from(["ansible-dev", "shell", "--", "uname", "-a"]);
        match args.command {
            Command::Shell { command, group } => {
                assert_eq!(command, vec!["uname", "-a"]);
                assert!(group.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_path_after_subcommand() {
        let args = Args::parse_from(["ansible-dev", "destroy", "--path", "/tmp/dev"]);
        assert_eq!(args.path, PathBuf::from("/tmp/dev"));
    }
}
