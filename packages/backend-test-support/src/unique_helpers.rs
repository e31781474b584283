//! Test helpers for generating unique test data
//!
//! Player identities are opaque strings; ULID suffixes keep concurrently
//! running tests from colliding on the same identity.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique opaque user id, as an upstream identity provider would.
pub fn unique_user_id(name: &str) -> String {
    unique_str(&format!("uid-{name}"))
}
