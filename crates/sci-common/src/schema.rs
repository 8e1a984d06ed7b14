//! Schema versioning and compatibility.

/// Current schema version for all JSON outputs and config files.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (field removals, type changes)
/// - MINOR: Additive changes (new optional fields)
/// - PATCH: Bug fixes, documentation
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Check if a schema version is compatible with current.
///
/// Versions are compatible when their major components match.
pub fn is_compatible(version: &str) -> bool {
    match (major(SCHEMA_VERSION), major(version)) {
        (Some(current), Some(other)) => current == other,
        _ => false,
    }
}

fn major(version: &str) -> Option<u32> {
    version.split('.').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_major_compatible() {
        assert!(is_compatible("1.0.0"));
        assert!(is_compatible("1.4.2"));
    }

    #[test]
    fn test_different_major_incompatible() {
        assert!(!is_compatible("0.9.0"));
        assert!(!is_compatible("2.0.0"));
    }

    #[test]
    fn test_garbage_is_incompatible() {
        assert!(!is_compatible(""));
        assert!(!is_compatible("one.two"));
    }
}
