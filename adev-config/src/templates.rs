//! Files generated into a development workspace.

use std::sync::OnceLock;

use adev_core::error::{AdevError, Result};
use serde::Serialize;
use tera::{Context, Tera};

pub const ANSIBLE_CFG_CONTENT: &str = include_str!("templates/ansible.cfg");
pub const ANSIBLE_LINT_CONTENT: &str = include_str!("templates/ansible-lint");

/// Group every generated machine belongs to; the default provisioning target.
pub const ALL_MACHINES_GROUP: &str = "vagrant";

/// A Vagrant machine, shared by the Vagrantfile and the inventory so both agree.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Machine {
    pub name: String,
    pub box_name: String,
    pub ip: String,
    pub ssh_port: u16,
    /// Also listed in the `ansibledev` group.
    #[serde(skip)]
    pub development: bool,
}

impl Machine {
    fn new(name: &str, box_name: &str, last_octet: u8, development: bool) -> Self {
        Self {
            name: name.to_string(),
            box_name: box_name.to_string(),
            ip: format!("192.168.57.{last_octet}"),
            ssh_port: 8000 + u16::from(last_octet),
            development,
        }
    }
}

/// Machines written by `ansible-dev init`.
pub fn default_machines() -> Vec<Machine> {
    vec![
        Machine::new("debian", "debian/bookworm64", 5, true),
        Machine::new("rocky", "rockylinux/9", 6, true),
        Machine::new("alma", "generic/alma9", 7, false),
        Machine::new("fedora", "generic/fedora38", 8, false),
        Machine::new("ubuntu", "generic/ubuntu2204", 9, false),
    ]
}

#[derive(Serialize)]
struct InventoryGroup<'a> {
    name: &'a str,
    hosts: Vec<&'a Machine>,
}

static WORKSPACE_TERA: OnceLock<Tera> = OnceLock::new();

fn workspace_tera() -> &'static Tera {
    WORKSPACE_TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("hosts.ini", include_str!("templates/hosts.ini.j2")),
            ("Vagrantfile", include_str!("templates/Vagrantfile.j2")),
            ("play.yml", include_str!("templates/play.yml.j2")),
        ])
        .expect("Failed to add workspace templates");
        tera
    })
}

fn render(name: &str, context: &Context) -> Result<String> {
    workspace_tera()
        .render(name, context)
        .map_err(|e| AdevError::Template(format!("{name}: {e}")))
}

/// Inventory with an `ansibledev` group for development machines and a
/// `vagrant` group holding every machine.
pub fn render_inventory(machines: &[Machine]) -> Result<String> {
    let groups = vec![
        InventoryGroup {
            name: "ansibledev",
            hosts: machines.iter().filter(|m| m.development).collect(),
        },
        InventoryGroup {
            name: ALL_MACHINES_GROUP,
            hosts: machines.iter().collect(),
        },
    ];

    let mut context = Context::new();
    context.insert("groups", &groups);
    render("hosts.ini", &context)
}

pub fn render_vagrantfile(machines: &[Machine]) -> Result<String> {
    let mut context = Context::new();
    context.insert("machines", machines);
    context.insert("memory", &2048);
    context.insert("cpus", &2);
    render("Vagrantfile", &context)
}

/// Single-role play applied to every host of the inventory limit.
pub fn render_play(role: &str) -> Result<String> {
    if role.trim().is_empty() {
        return Err(AdevError::Validation("role name must not be empty".to_string()));
    }
    let mut context = Context::new();
    context.insert("role", role);
    render("play.yml", &context)
}
