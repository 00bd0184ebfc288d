//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&PgPool` as the first argument.

pub mod audit_repo;
pub mod content_item_repo;
pub mod revision_repo;

pub use audit_repo::AuditLogRepo;
pub use content_item_repo::ContentItemRepo;
pub use revision_repo::RevisionRepo;

/// Escape LIKE/ILIKE wildcard characters so a caller-supplied fragment
/// matches literally inside a `%...%` pattern.
pub(crate) fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50% done"), "50\\% done");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
