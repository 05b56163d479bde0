//! Environment lifecycle messages (init, start, stop, destroy, reset)

pub struct VmMessages {
    // ============================================================================
    // Init
    // ============================================================================
    pub init_creating_folder: &'static str,
    pub init_exists: &'static str,
    pub init_header: &'static str,
    pub init_item: &'static str,
    pub init_success: &'static str,

    // ============================================================================
    // Start / polling
    // ============================================================================
    pub bringing_online: &'static str,
    pub found: &'static str,
    pub not_found: &'static str,
    pub probe_dot: &'static str,
    pub searching: &'static str,
    pub start_failed: &'static str,
    pub vagrantfile_missing: &'static str,

    // ============================================================================
    // Stop / destroy / reset
    // ============================================================================
    pub destroy_progress: &'static str,
    pub destroy_removed: &'static str,
    pub destroy_success: &'static str,
    pub reset_keep: &'static str,
    pub stop_failed: &'static str,
    pub stop_progress: &'static str,
}

pub const VM_MESSAGES: VmMessages = VmMessages {
    init_creating_folder: "📁 Creating development environment folder '{path}'...",
    init_exists: "The folder '{path}' already contains an Ansible context and --force was not provided",
    init_header: "🚀 Initializing development environment...",
    init_item: "    ...   {item}",
    init_success: "Development environment ready in '{path}'",

    bringing_online: "\n🚀 Bringing '{name}' online...\n",
    found: " [Found]",
    not_found: " [NotFound]",
    probe_dot: ".",
    searching: "\n🔍 Searching for '{name}' at {address}...",
    start_failed: "Failed to start '{name}': {error}",
    vagrantfile_missing: "Can't find the Vagrantfile in '{path}'. Run 'ansible-dev init' first",

    destroy_progress: "🗑️  Destroying the development environment...",
    destroy_removed: "  Removed {path}",
    destroy_success: "Development environment destroyed",
    reset_keep: "Keeping the existing VMs (--no-recreate)",
    stop_failed: "Failed to stop '{name}': {error}",
    stop_progress: "\n🛑 Stopping '{name}'...\n",
};
