//! Host lists from the Ansible inventory (`hosts.ini`).

use std::collections::HashSet;
use std::path::Path;

use adev_config::ini::{IniDocument, UNGROUPED};
use adev_core::error::{AdevError, Result};
use tracing::{debug, warn};

const CHILDREN_SUFFIX: &str = ":children";
const VARS_SUFFIX: &str = ":vars";
const ANSIBLE_HOST: &str = "ansible_host";

/// A host to start and probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct Inventory {
    doc: IniDocument,
}

impl Inventory {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AdevError::Config(format!(
                "Inventory file not found: {}",
                path.display()
            )));
        }
        debug!("Reading inventory from {}", path.display());
        Ok(Self {
            doc: IniDocument::load(path)?,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            doc: IniDocument::parse(text)?,
        })
    }

    /// Hosts of `name` in file order, followed by the hosts of its child groups.
    pub fn group(&self, name: &str) -> Result<Vec<InventoryEntry>> {
        if !self.has_group(name) {
            return Err(AdevError::Config(format!(
                "Group '{}' not found in inventory (available: {})",
                name,
                self.group_names().join(", ")
            )));
        }

        let mut entries = Vec::new();
        let mut seen_hosts = HashSet::new();
        let mut visited = HashSet::new();
        self.collect(name, &mut entries, &mut seen_hosts, &mut visited)?;
        Ok(entries)
    }

    /// Names of every host group, in the order they first appear.
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for section in self.doc.sections() {
            let name = section.name();
            if name.ends_with(VARS_SUFFIX) {
                continue;
            }
            let name = name.strip_suffix(CHILDREN_SUFFIX).unwrap_or(name);
            if name == UNGROUPED && section.entries().is_empty() {
                continue;
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    fn has_group(&self, name: &str) -> bool {
        self.doc.section(name).is_some()
            || self
                .doc
                .section(&format!("{name}{CHILDREN_SUFFIX}"))
                .is_some()
    }

    fn collect(
        &self,
        name: &str,
        entries: &mut Vec<InventoryEntry>,
        seen_hosts: &mut HashSet<String>,
        visited: &mut HashSet<String>,
    ) -> Result<()> {
        if !visited.insert(name.to_string()) {
            return Ok(());
        }

        if let Some(section) = self.doc.section(name) {
            for line in section.entries() {
                let entry = parse_host_line(line, name)?;
                if seen_hosts.insert(entry.name.clone()) {
                    entries.push(entry);
                } else {
                    debug!("Skipping duplicate host '{}' in group '{}'", entry.name, name);
                }
            }
        }

        if let Some(children) = self.doc.section(&format!("{name}{CHILDREN_SUFFIX}")) {
            for child in children.entries() {
                let child = child.split_whitespace().next().unwrap_or_default();
                if !self.has_group(child) {
                    warn!("Child group '{}' of '{}' has no hosts", child, name);
                    continue;
                }
                self.collect(child, entries, seen_hosts, visited)?;
            }
        }

        Ok(())
    }
}

/// `<name> [key=value ...]`, or the legacy `<name> = <address>` form.
fn parse_host_line(line: &str, group: &str) -> Result<InventoryEntry> {
    let line = strip_inline_comment(line);
    let (name, mut address, vars): (&str, Option<String>, Vec<&str>) = match line.split_once('=') {
        Some((left, right)) if !left.trim().contains(char::is_whitespace) => {
            let mut rest = right.split_whitespace();
            let value = rest.next().map(|v| unquote(v).to_string());
            (left.trim(), value, rest.collect())
        }
        _ => {
            let mut tokens = line.split_whitespace();
            let first = tokens.next().unwrap_or_default();
            (first, None, tokens.collect())
        }
    };
    if name.is_empty() {
        return Err(AdevError::Config(format!(
            "Invalid host line '{line}' in group '{group}'"
        )));
    }

    for token in vars {
        let (key, value) = token.split_once('=').ok_or_else(|| {
            AdevError::Config(format!(
                "Invalid variable '{token}' for host '{name}' in group '{group}': expected key=value"
            ))
        })?;
        if key == ANSIBLE_HOST {
            address = Some(unquote(value).to_string());
        }
    }

    let address = address
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| name.to_string());

    Ok(InventoryEntry {
        name: name.to_string(),
        address,
    })
}

/// Drop a trailing `# ...` or `; ...` that starts a new token.
fn strip_inline_comment(line: &str) -> &str {
    let mut previous_is_space = false;
    for (index, c) in line.char_indices() {
        if previous_is_space && (c == '#' || c == ';') {
            return line[..index].trim_end();
        }
        previous_is_space = c.is_whitespace();
    }
    line
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, address: &str) -> InventoryEntry {
        InventoryEntry {
            name: name.into(),
            address: address.into(),
        }
    }

    #[test]
    fn reads_ansible_host_entries_in_file_order() {
        let inventory = Inventory::parse(
            "[vagrant]\ndebian ansible_host=192.168.57.5\nalma ansible_host=192.168.57.6\n",
        )
        .unwrap();

        assert_eq!(
            inventory.group("vagrant").unwrap(),
            vec![entry("debian", "192.168.57.5"), entry("alma", "192.168.57.6")]
        );
    }

    #[test]
    fn bare_name_is_its_own_address() {
        let inventory = Inventory::parse("[vagrant]\ndebian.test\n").unwrap();
        assert_eq!(
            inventory.group("vagrant").unwrap(),
            vec![entry("debian.test", "debian.test")]
        );
    }

    #[test]
    fn legacy_key_value_form_gives_the_address() {
        let inventory =
            Inventory::parse("[vagrant]\ndebian=192.168.57.5\nrocky = 192.168.57.6\n").unwrap();

        assert_eq!(
            inventory.group("vagrant").unwrap(),
            vec![entry("debian", "192.168.57.5"), entry("rocky", "192.168.57.6")]
        );
    }

    #[test]
    fn ansible_host_wins_over_legacy_value() {
        let inventory =
            Inventory::parse("[vagrant]\ndebian=10.0.0.1 ansible_host=\"192.168.57.5\"\n").unwrap();
        assert_eq!(
            inventory.group("vagrant").unwrap(),
            vec![entry("debian", "192.168.57.5")]
        );
    }

    #[test]
    fn trailing_comment_after_variables_is_ignored() {
        let inventory = Inventory::parse(
            "[vagrant]\ndebian ansible_host=192.168.57.5 # dev box\nalma ; spare\nrocky#1 ansible_host=192.168.57.6\n",
        )
        .unwrap();

        assert_eq!(
            inventory.group("vagrant").unwrap(),
            vec![
                entry("debian", "192.168.57.5"),
                entry("alma", "alma"),
                entry("rocky#1", "192.168.57.6"),
            ]
        );
    }

    #[test]
    fn variable_without_value_is_an_error() {
        let inventory = Inventory::parse("[vagrant]\ndebian ansible_host\n").unwrap();
        assert!(matches!(
            inventory.group("vagrant"),
            Err(AdevError::Config(_))
        ));
    }

    #[test]
    fn children_are_expanded_after_own_hosts() {
        let inventory = Inventory::parse(
            "[dev]\ndebian\n\n[test]\nalma\ndebian\n\n[lab]\nubuntu\n\n[lab:children]\ndev\ntest\n\n[lab:vars]\nansible_user=vagrant\n",
        )
        .unwrap();

        let names: Vec<_> = inventory
            .group("lab")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["ubuntu", "debian", "alma"]);
    }

    #[test]
    fn missing_group_lists_available_groups() {
        let inventory = Inventory::parse("[ansibledev]\ndebian\n[vagrant]\ndebian\n").unwrap();
        let err = inventory.group("provisiontest").unwrap_err();

        assert!(matches!(err, AdevError::Config(_)));
        assert!(err.to_string().contains("ansibledev, vagrant"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Inventory::load(&dir.path().join("hosts.ini")),
            Err(AdevError::Config(_))
        ));
    }
}
