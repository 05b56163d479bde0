//! Minimal reader for the INI-like files Ansible uses (`hosts.ini`, `ansible.cfg`).
//!
//! Sections keep their raw entry lines in file order; interpretation of a line
//! (inventory host vs. `key = value` setting) is left to the caller.

use std::fs;
use std::path::Path;

use adev_core::error::{AdevError, Result};

/// Section name used for entries that appear before the first header.
pub const UNGROUPED: &str = "ungrouped";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<String>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw, trimmed entry lines in file order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Look up a `key = value` setting; the first match wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim())
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = IniDocument::default();
        let mut current: Option<usize> = None;

        for (index, raw) in text.trim_start_matches('\u{feff}').lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        AdevError::Config(format!(
                            "line {}: malformed section header '{}'",
                            index + 1,
                            line
                        ))
                    })?;
                current = Some(doc.section_index_or_insert(name));
                continue;
            }

            let slot = match current {
                Some(slot) => slot,
                None => {
                    let slot = doc.section_index_or_insert(UNGROUPED);
                    current = Some(slot);
                    slot
                }
            };
            doc.sections[slot].entries.push(line.to_string());
        }

        Ok(doc)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            AdevError::Config(format!("unable to read '{}': {}", path.display(), e))
        })?;
        Self::parse(&text).map_err(|e| match e {
            AdevError::Config(msg) => AdevError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Shorthand for `section(section)?.get(key)`.
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    // Repeated headers extend the existing section, as Ansible does.
    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_in_file_order() {
        let doc = IniDocument::parse(
            "# inventory\n[ansibledev]\ndebian\nrocky\n\n[vagrant]\ndebian ansible_host=192.168.57.5\n",
        )
        .unwrap();

        let names: Vec<_> = doc.sections().map(Section::name).collect();
        assert_eq!(names, vec!["ansibledev", "vagrant"]);
        assert_eq!(doc.section("ansibledev").unwrap().entries(), ["debian", "rocky"]);
        assert_eq!(
            doc.section("vagrant").unwrap().entries(),
            ["debian ansible_host=192.168.57.5"]
        );
    }

    #[test]
    fn entries_before_first_header_are_ungrouped() {
        let doc = IniDocument::parse("localhost\n[web]\nweb1\n").unwrap();
        assert_eq!(doc.section(UNGROUPED).unwrap().entries(), ["localhost"]);
    }

    #[test]
    fn repeated_headers_extend_the_section() {
        let doc = IniDocument::parse("[web]\nweb1\n[db]\ndb1\n[web]\nweb2\n").unwrap();
        assert_eq!(doc.section("web").unwrap().entries(), ["web1", "web2"]);
        assert_eq!(doc.sections().count(), 2);
    }

    #[test]
    fn reads_key_value_settings() {
        let doc = IniDocument::parse(
            "[defaults]\nroles_path              = ./roles\ncollections_path = ./collections\n; note\n",
        )
        .unwrap();
        assert_eq!(doc.value("defaults", "roles_path"), Some("./roles"));
        assert_eq!(doc.value("defaults", "collections_path"), Some("./collections"));
        assert_eq!(doc.value("defaults", "inventory"), None);
        assert_eq!(doc.value("diff", "always"), None);
    }

    #[test]
    fn malformed_header_reports_line_number() {
        let err = IniDocument::parse("[vagrant]\ndebian\n[broken\n").unwrap_err();
        match err {
            AdevError::Config(msg) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_header_is_rejected() {
        assert!(IniDocument::parse("[ ]\nhost\n").is_err());
    }
}
