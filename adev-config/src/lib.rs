//! Workspace configuration for ansible-dev: the app config file, `ansible.cfg`,
//! the requirements manifest and the generated workspace files.

pub mod ansible_cfg;
pub mod app_config;
pub mod ini;
pub mod requirements;
pub mod templates;
pub mod yaml;

pub use ansible_cfg::AnsibleCfg;
pub use app_config::{AppConfig, ProbeMethod, ProbeSettings};
pub use requirements::{Collection, Requirements, Role, Upsert};
