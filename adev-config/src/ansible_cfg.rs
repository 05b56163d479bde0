//! Read-only view of the workspace `ansible.cfg`.

use std::path::{Path, PathBuf};

use adev_core::error::{AdevError, Result};

use crate::ini::IniDocument;

pub const ANSIBLE_CFG: &str = "ansible.cfg";

#[derive(Debug, Clone)]
pub struct AnsibleCfg {
    workspace: PathBuf,
    doc: IniDocument,
}

impl AnsibleCfg {
    pub fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join(ANSIBLE_CFG);
        if !path.is_file() {
            return Err(AdevError::Config(format!(
                "'{}' not found; run 'ansible-dev init' first",
                path.display()
            )));
        }
        Ok(Self {
            workspace: workspace.to_path_buf(),
            doc: IniDocument::load(&path)?,
        })
    }

    /// First entry of `[defaults] roles_path`, resolved against the workspace.
    pub fn roles_path(&self) -> Result<PathBuf> {
        self.defaults_path("roles_path")
    }

    /// First entry of `[defaults] collections_path`, resolved against the workspace.
    pub fn collections_path(&self) -> Result<PathBuf> {
        self.defaults_path("collections_path")
    }

    fn defaults_path(&self, key: &str) -> Result<PathBuf> {
        let value = self
            .doc
            .value("defaults", key)
            .and_then(|v| v.split(':').map(str::trim).find(|p| !p.is_empty()))
            .ok_or_else(|| {
                AdevError::Config(format!("'{key}' is not set in [defaults] of {ANSIBLE_CFG}"))
            })?;

        let path = Path::new(value);
        Ok(if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        })
    }
}
