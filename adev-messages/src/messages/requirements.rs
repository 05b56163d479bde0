//! Role and collection management messages

pub struct RequirementsMessages {
    // ============================================================================
    // Roles
    // ============================================================================
    pub role_added: &'static str,
    pub role_exists: &'static str,
    pub role_files_deleted: &'static str,
    pub role_files_missing: &'static str,
    pub role_not_present: &'static str,
    pub role_removed: &'static str,
    pub role_updated: &'static str,

    // ============================================================================
    // Collections
    // ============================================================================
    pub collection_added: &'static str,
    pub collection_files_deleted: &'static str,
    pub collection_files_missing: &'static str,
    pub collection_not_present: &'static str,
    pub collection_removed: &'static str,
    pub collection_updated: &'static str,
    pub collections_purged: &'static str,

    // ============================================================================
    // Compare
    // ============================================================================
    pub compare_diff: &'static str,
    pub compare_diff_failed: &'static str,
    pub compare_header: &'static str,
    pub compare_missing_local: &'static str,
    pub compare_missing_repo: &'static str,
    pub compare_no_roles: &'static str,
    pub compare_same: &'static str,
}

pub const REQUIREMENTS_MESSAGES: RequirementsMessages = RequirementsMessages {
    role_added: "Role '{name}' added to requirements.yml but must be restored before use",
    role_exists: "Role '{name}' exists! Use --force to replace it",
    role_files_deleted: "Role '{name}' files were deleted",
    role_files_missing: "Role '{name}' files not present",
    role_not_present: "Role '{name}' not present in requirements.yml",
    role_removed: "Role '{name}' removed",
    role_updated: "Role '{name}' updated in requirements.yml but must be restored before use",

    collection_added: "Collection '{name}' added to requirements.yml but must be restored before use",
    collection_files_deleted: "Collection '{name}' files were deleted",
    collection_files_missing: "Collection '{name}' files not present",
    collection_not_present: "Collection '{name}' not present in requirements.yml",
    collection_removed: "Collection '{name}' removed",
    collection_updated: "Collection '{name}' updated in requirements.yml but must be restored before use",
    collections_purged: "Collection files were purged",

    compare_diff: "{file}: {left} != {right}",
    compare_diff_failed: "Unable to open the diff tool for '{name}': {error}",
    compare_header: "'{source}' --> '{dest}'",
    compare_missing_local: "{file}: <== only in the repository",
    compare_missing_repo: "{file}: ==> only in the workspace",
    compare_no_roles: "No roles found in '{path}'",
    compare_same: "{file}: {left} == {right}",
};
