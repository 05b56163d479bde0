//! Sequential bring-up of inventory hosts followed by role application.
//!
//! Each host is started with `vagrant up`, then probed until it answers or the
//! attempt budget runs out. Only when every host is reachable are roles applied,
//! base role first, one `ansible-playbook` run per role.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use adev_config::ProbeSettings;
use adev_core::command_stream::CommandRunner;
use adev_core::error::{AdevError, Result};
use adev_core::{adev_error, adev_print, adev_println};
use adev_messages::{msg, MESSAGES};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::ansible::{write_play, PlaybookOptions, ANSIBLE_PLAYBOOK, PLAY_FILE};
use crate::inventory::InventoryEntry;
use crate::probe::Prober;
use crate::vagrant::Vagrant;

/// What one `start`/`reset` invocation asked for. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    target_group: String,
    roles: Vec<String>,
    tags: IndexSet<String>,
    base: bool,
    flush_cache: bool,
    verbose: bool,
}

impl ProvisionRequest {
    pub fn builder(target_group: impl Into<String>) -> ProvisionRequestBuilder {
        ProvisionRequestBuilder {
            request: ProvisionRequest {
                target_group: target_group.into(),
                roles: Vec::new(),
                tags: IndexSet::new(),
                base: true,
                flush_cache: true,
                verbose: false,
            },
        }
    }

    pub fn target_group(&self) -> &str {
        &self.target_group
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }

    pub fn base(&self) -> bool {
        self.base
    }

    pub fn flush_cache(&self) -> bool {
        self.flush_cache
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

pub struct ProvisionRequestBuilder {
    request: ProvisionRequest,
}

impl ProvisionRequestBuilder {
    /// Roles in application order; blanks are dropped.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.roles.extend(
            roles
                .into_iter()
                .map(Into::into)
                .filter(|r: &String| !r.trim().is_empty()),
        );
        self
    }

    /// Tags for the requested roles; duplicates collapse, first occurrence keeps its place.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.tags.extend(
            tags.into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.trim().is_empty()),
        );
        self
    }

    pub fn base(mut self, base: bool) -> Self {
        self.request.base = base;
        self
    }

    pub fn flush_cache(mut self, flush_cache: bool) -> Self {
        self.request.flush_cache = flush_cache;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.request.verbose = verbose;
        self
    }

    pub fn build(self) -> ProvisionRequest {
        self.request
    }
}

/// Retry budget for waiting on a started host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

impl From<&ProbeSettings> for ProbePolicy {
    fn from(settings: &ProbeSettings) -> Self {
        Self {
            max_attempts: settings.attempts,
            interval: settings.interval(),
        }
    }
}

/// The role applied before all others, with the tag it is limited to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRole {
    pub name: String,
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    NotStarted,
    Starting,
    Polling { attempt: u32 },
    Reachable { attempts: u32 },
    Unreachable { attempts: u32 },
    StartFailed { status: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub name: String,
    pub address: String,
    pub state: HostState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOutcome {
    pub role: String,
    /// `None` on success, otherwise the failure description.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub hosts: Vec<HostReport>,
    pub roles: Vec<RoleOutcome>,
}

impl ProvisionReport {
    pub fn failed_roles(&self) -> Vec<String> {
        self.roles
            .iter()
            .filter(|r| r.error.is_some())
            .map(|r| r.role.clone())
            .collect()
    }

    /// Turn recorded role failures into the run's error.
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed_roles();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(AdevError::RolesFailed(failed))
        }
    }
}

pub struct Provisioner<'a> {
    runner: &'a dyn CommandRunner,
    prober: &'a dyn Prober,
    policy: ProbePolicy,
    base_role: BaseRole,
    workspace: PathBuf,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        prober: &'a dyn Prober,
        policy: ProbePolicy,
        base_role: BaseRole,
        workspace: &Path,
    ) -> Self {
        Self {
            runner,
            prober,
            policy,
            base_role,
            workspace: workspace.to_path_buf(),
        }
    }

    /// Start and wait for every host in order, then apply the requested roles.
    ///
    /// Returns `Unreachable` as soon as one host never answers; later hosts are
    /// not started. Hosts whose start failed are skipped but block role
    /// application. Role failures are recorded in the report, not returned.
    pub fn run(
        &self,
        entries: &[InventoryEntry],
        request: &ProvisionRequest,
    ) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();
        let vagrant = Vagrant::new(self.runner);

        for entry in entries {
            let mut host = HostReport {
                name: entry.name.clone(),
                address: entry.address.clone(),
                state: HostState::NotStarted,
            };

            self.transition(&mut host, HostState::Starting);
            adev_println!("{}", msg!(MESSAGES.vm.bringing_online, name = &entry.name));

            match vagrant.up(&entry.name) {
                Ok(()) => {}
                Err(e @ AdevError::Execution { .. }) => {
                    adev_error!(
                        "{}",
                        msg!(MESSAGES.vm.start_failed, name = &entry.name, error = e.to_string())
                    );
                    let status = e.exit_status();
                    self.transition(&mut host, HostState::StartFailed { status });
                    report.hosts.push(host);
                    continue;
                }
                Err(e) => return Err(e),
            }

            adev_print!(
                "{}",
                msg!(MESSAGES.vm.searching, name = &entry.name, address = &entry.address)
            );
            match self.wait_until_reachable(&mut host)? {
                Some(_) => report.hosts.push(host),
                None => {
                    return Err(AdevError::Unreachable {
                        host: entry.name.clone(),
                        address: entry.address.clone(),
                        attempts: self.policy.max_attempts,
                    })
                }
            }
        }

        let start_failures: Vec<&str> = report
            .hosts
            .iter()
            .filter(|h| matches!(h.state, HostState::StartFailed { .. }))
            .map(|h| h.name.as_str())
            .collect();
        if !start_failures.is_empty() {
            warn!("Skipping role application; hosts failed to start: {:?}", start_failures);
            let status = report.hosts.iter().find_map(|h| match h.state {
                HostState::StartFailed { status } => status,
                _ => None,
            });
            return Err(AdevError::Execution {
                command: format!("vagrant up ({})", start_failures.join(", ")),
                status,
            });
        }

        report.roles = self.apply_roles(request)?;
        Ok(report)
    }

    /// Probe until the first success. `Some(attempts)` when reachable.
    fn wait_until_reachable(&self, host: &mut HostReport) -> Result<Option<u32>> {
        let max = self.policy.max_attempts;

        for attempt in 1..=max {
            self.transition(host, HostState::Polling { attempt });

            if self.prober.probe(&host.address)? {
                adev_println!("{}", MESSAGES.vm.found);
                self.transition(host, HostState::Reachable { attempts: attempt });
                return Ok(Some(attempt));
            }

            adev_print!("{}", MESSAGES.vm.probe_dot);
            if attempt < max && !self.policy.interval.is_zero() {
                thread::sleep(self.policy.interval);
            }
        }

        adev_println!("{}", MESSAGES.vm.not_found);
        self.transition(host, HostState::Unreachable { attempts: max });
        Ok(None)
    }

    fn apply_roles(&self, request: &ProvisionRequest) -> Result<Vec<RoleOutcome>> {
        let mut plan: Vec<(String, Vec<String>)> = Vec::new();
        if request.base {
            plan.push((self.base_role.name.clone(), vec![self.base_role.tag.clone()]));
        }
        let tags: Vec<String> = request.tags.iter().cloned().collect();
        plan.extend(request.roles.iter().map(|role| (role.clone(), tags.clone())));

        let mut outcomes = Vec::with_capacity(plan.len());
        for (index, (role, tags)) in plan.into_iter().enumerate() {
            if index == 0 && request.base {
                adev_println!(
                    "{}",
                    msg!(MESSAGES.provision.applying_base, role = &role, tag = &self.base_role.tag)
                );
            } else {
                adev_println!("{}", msg!(MESSAGES.provision.applying_role, role = &role));
            }

            write_play(&self.workspace, &role)?;
            let options = PlaybookOptions {
                limit: Some(request.target_group.clone()),
                tags,
                flush_cache: request.flush_cache,
                verbose: request.verbose,
                ..PlaybookOptions::default()
            };

            let error = match self.runner.run(ANSIBLE_PLAYBOOK, &options.args(PLAY_FILE)) {
                Ok(()) => {
                    info!("Role '{}' applied", role);
                    None
                }
                Err(e @ AdevError::Execution { .. }) => {
                    adev_error!(
                        "{}",
                        msg!(MESSAGES.provision.role_failed, role = &role, error = e.to_string())
                    );
                    Some(e.to_string())
                }
                Err(e) => return Err(e),
            };
            outcomes.push(RoleOutcome { role, error });
        }

        Ok(outcomes)
    }

    fn transition(&self, host: &mut HostReport, next: HostState) {
        debug!(host = %host.name, from = ?host.state, to = ?next, "host state");
        host.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_start_command() {
        let request = ProvisionRequest::builder("vagrant").build();
        assert!(request.base());
        assert!(request.flush_cache());
        assert!(!request.verbose());
        assert!(request.roles().is_empty());
    }

    #[test]
    fn builder_drops_blank_and_duplicate_tags() {
        let request = ProvisionRequest::builder("vagrant")
            .roles(["myrole", " ", "other"])
            .tags(["install", "", "config", "install"])
            .build();

        assert_eq!(request.roles(), ["myrole", "other"]);
        let tags: Vec<_> = request.tags().iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["install", "config"]);
    }

    #[test]
    fn report_collects_failed_roles() {
        let report = ProvisionReport {
            hosts: Vec::new(),
            roles: vec![
                RoleOutcome { role: "a".into(), error: None },
                RoleOutcome { role: "b".into(), error: Some("boom".into()) },
            ],
        };
        assert_eq!(report.failed_roles(), vec!["b"]);
        assert!(matches!(report.into_result(), Err(AdevError::RolesFailed(r)) if r == vec!["b"]));
    }

    #[test]
    fn policy_follows_probe_settings() {
        let policy = ProbePolicy::from(&ProbeSettings::default());
        assert_eq!(policy, ProbePolicy::default());
    }
}
