/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full access, including account management
pub const ROLE_ADMIN: &str = "admin";

/// Editor role - can manage categories, posts and wiki content
pub const ROLE_EDITOR: &str = "editor";
