//! Role application messages

pub struct ProvisionMessages {
    pub applying_base: &'static str,
    pub applying_role: &'static str,
    pub complete: &'static str,
    pub role_failed: &'static str,
}

pub const PROVISION_MESSAGES: ProvisionMessages = ProvisionMessages {
    applying_base: "\n🔧 Applying the base role '{role}' with the '{tag}' tag...\n",
    applying_role: "\n🔧 Applying the '{role}' role...\n",
    complete: "Provisioning complete",
    role_failed: "Role '{role}' failed: {error}",
};
