//! Environment provider for ansible-dev: inventory, liveness probes, the
//! Vagrant and Ansible drivers and the provisioning loop.

pub mod ansible;
pub mod inventory;
pub mod probe;
pub mod provision;
pub mod vagrant;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use inventory::{Inventory, InventoryEntry};
pub use probe::{build_prober, Prober};
pub use provision::{
    BaseRole, HostState, ProbePolicy, ProvisionReport, ProvisionRequest, Provisioner,
};
pub use vagrant::Vagrant;
