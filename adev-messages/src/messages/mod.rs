//! Central registry for all user-facing message templates.
//!
//! Organized by domain:
//! - `vm` - environment lifecycle (init, start, stop, destroy, reset)
//! - `provision` - role application after the hosts are reachable
//! - `requirements` - roles and collections in `requirements.yml`
//! - `common` - shared messages

mod common;
mod provision;
mod requirements;
mod vm;

pub use common::{CommonMessages, COMMON_MESSAGES};
pub use provision::{ProvisionMessages, PROVISION_MESSAGES};
pub use requirements::{RequirementsMessages, REQUIREMENTS_MESSAGES};
pub use vm::{VmMessages, VM_MESSAGES};

/// Unified messages struct containing all domain-specific message modules
pub struct Messages {
    pub vm: VmMessages,
    pub provision: ProvisionMessages,
    pub requirements: RequirementsMessages,
    pub common: CommonMessages,
}

/// Global messages constant - main entry point for all message templates
pub const MESSAGES: Messages = Messages {
    vm: VM_MESSAGES,
    provision: PROVISION_MESSAGES,
    requirements: REQUIREMENTS_MESSAGES,
    common: COMMON_MESSAGES,
};
