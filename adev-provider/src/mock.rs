//! Test doubles for the command runner and the prober.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use adev_core::command_stream::{format_command, CommandRunner};
use adev_core::error::{AdevError, Result};

use crate::probe::Prober;

/// One recorded interaction, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(String),
    Probe(String),
}

/// Shared, ordered log of commands and probes.
pub type Journal = Rc<RefCell<Vec<Event>>>;

/// Records every command instead of running it.
///
/// Commands whose rendered form starts with a registered prefix fail with
/// the configured exit status.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    journal: Journal,
    calls: RefCell<Vec<(String, Vec<String>)>>,
    failures: Vec<(String, i32)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_when(mut self, command_prefix: &str, status: i32) -> Self {
        self.failures.push((command_prefix.to_string(), status));
        self
    }

    pub fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }

    /// Rendered commands, e.g. `vagrant up debian`.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(program, args)| format_command(program, args))
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let command = format_command(program, args);
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));
        self.journal
            .borrow_mut()
            .push(Event::Command(command.clone()));

        match self
            .failures
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
        {
            Some((_, status)) => Err(AdevError::Execution {
                command,
                status: Some(*status),
            }),
            None => Ok(()),
        }
    }
}

/// Replays scripted probe outcomes per address.
///
/// Once an address's script runs out, its last outcome repeats; unscripted
/// addresses are unreachable.
#[derive(Debug, Default)]
pub struct ScriptedProber {
    journal: Journal,
    scripts: RefCell<HashMap<String, VecDeque<bool>>>,
    last: RefCell<HashMap<String, bool>>,
    broken: HashSet<String>,
    calls: RefCell<HashMap<String, u32>>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record probes into an existing journal (usually the runner's).
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn script(self, address: &str, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.scripts
            .borrow_mut()
            .insert(address.to_string(), outcomes.into_iter().collect());
        self
    }

    /// Reachable after `failures` unanswered probes.
    pub fn reachable_after(self, address: &str, failures: usize) -> Self {
        let outcomes = std::iter::repeat(false)
            .take(failures)
            .chain(std::iter::once(true));
        self.script(address, outcomes)
    }

    /// Probing this address fails as if no socket could be opened.
    pub fn broken(mut self, address: &str) -> Self {
        self.broken.insert(address.to_string());
        self
    }

    pub fn probe_count(&self, address: &str) -> u32 {
        self.calls.borrow().get(address).copied().unwrap_or(0)
    }
}

impl Prober for ScriptedProber {
    fn probe(&self, address: &str) -> Result<bool> {
        *self
            .calls
            .borrow_mut()
            .entry(address.to_string())
            .or_insert(0) += 1;
        self.journal
            .borrow_mut()
            .push(Event::Probe(address.to_string()));

        if self.broken.contains(address) {
            return Err(AdevError::Probe(format!(
                "Unable to open an ICMP socket for {address}"
            )));
        }

        let next = self
            .scripts
            .borrow_mut()
            .get_mut(address)
            .and_then(VecDeque::pop_front);
        let outcome = match next {
            Some(outcome) => {
                self.last
                    .borrow_mut()
                    .insert(address.to_string(), outcome);
                outcome
            }
            None => self.last.borrow().get(address).copied().unwrap_or(false),
        };
        Ok(outcome)
    }
}
