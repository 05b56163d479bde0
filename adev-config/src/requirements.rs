//! The `requirements.yml` manifest consumed by `ansible-galaxy install -r`.

use std::path::Path;

use adev_core::error::{AdevError, Result};
use serde::{Deserialize, Serialize};

use crate::yaml::{null_as_empty, optional_scalar, parse_yaml_str, write_yaml_file};

pub const REQUIREMENTS_FILE: &str = "requirements.yml";

/// Collection type written for collections added from Ansible Galaxy.
pub const GALAXY_TYPE: &str = "galaxy";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub collections: Vec<Collection>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(
        rename = "src",
        default,
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(
        rename = "src",
        default,
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

/// Outcome of adding an entry to the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Updated,
}

impl Role {
    /// A role whose source defaults to its name (an Ansible Galaxy role).
    pub fn new(name: impl Into<String>, source: Option<String>, version: Option<String>) -> Self {
        let name = name.into();
        Self {
            source: Some(non_empty(source).unwrap_or_else(|| name.clone())),
            version: non_empty(version),
            name,
        }
    }
}

impl Collection {
    /// A Galaxy collection whose source defaults to its name.
    pub fn galaxy(name: impl Into<String>, source: Option<String>, version: Option<String>) -> Self {
        let name = name.into();
        Self {
            source: Some(non_empty(source).unwrap_or_else(|| name.clone())),
            kind: Some(GALAXY_TYPE.to_string()),
            version: non_empty(version),
            name,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Requirements {
    /// Load the manifest; a missing file is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AdevError::Config(format!(
                "Requirements file is not present: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        parse_yaml_str(&content).map_err(|e| {
            AdevError::Config(format!("unable to parse '{}': {}", path.display(), e))
        })
    }

    /// Load the manifest, or start an empty one when the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_yaml_file(path, self)
    }

    /// Replace the role with the same name in place, or append it.
    pub fn upsert_role(&mut self, role: Role) -> Upsert {
        match self.roles.iter_mut().find(|r| r.name == role.name) {
            Some(existing) => {
                *existing = role;
                Upsert::Updated
            }
            None => {
                self.roles.push(role);
                Upsert::Added
            }
        }
    }

    /// Remove every role with this name; returns how many were removed.
    pub fn remove_role(&mut self, name: &str) -> usize {
        let before = self.roles.len();
        self.roles.retain(|r| r.name != name);
        before - self.roles.len()
    }

    /// Replace the collection with the same name in place, or append it.
    pub fn upsert_collection(&mut self, collection: Collection) -> Upsert {
        match self
            .collections
            .iter_mut()
            .find(|c| c.name == collection.name)
        {
            Some(existing) => {
                *existing = collection;
                Upsert::Updated
            }
            None => {
                self.collections.push(collection);
                Upsert::Added
            }
        }
    }

    /// Remove every collection with this name; returns how many were removed.
    pub fn remove_collection(&mut self, name: &str) -> usize {
        let before = self.collections.len();
        self.collections.retain(|c| c.name != name);
        before - self.collections.len()
    }
}
