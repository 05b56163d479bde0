//! Thin driver over the `vagrant` CLI.

use adev_core::command_stream::CommandRunner;
use adev_core::error::Result;

pub const VAGRANT: &str = "vagrant";
pub const VAGRANTFILE: &str = "Vagrantfile";

/// Issues `vagrant` commands for single machines through a [`CommandRunner`].
pub struct Vagrant<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Vagrant<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    pub fn up(&self, machine: &str) -> Result<()> {
        self.run(&["up", machine])
    }

    pub fn halt(&self, machine: &str) -> Result<()> {
        self.run(&["halt", machine])
    }

    /// Destroy every machine of the Vagrantfile without prompting.
    pub fn destroy_all(&self) -> Result<()> {
        self.run(&["destroy", "--force"])
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.run(VAGRANT, &args)
    }
}
