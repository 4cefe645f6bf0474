//! Role matching
//!
//! The auth service records roles as `ROLE_ADMIN` while screens ask for
//! `ADMIN`; either spelling matches the other.

/// Marker prefix used by the auth service
pub const ROLE_PREFIX: &str = "ROLE_";

/// Strip the optional role prefix
pub fn normalize_role(role: &str) -> &str {
    let role = role.trim();
    role.strip_prefix(ROLE_PREFIX).unwrap_or(role)
}

/// Whether two role names denote the same role
pub fn role_matches(granted: &str, wanted: &str) -> bool {
    let wanted = normalize_role(wanted);
    !wanted.is_empty() && normalize_role(granted) == wanted
}

/// Whether `granted` contains `wanted` in either spelling
pub fn has_role<I, S>(granted: I, wanted: &str) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    granted
        .into_iter()
        .any(|role| role_matches(role.as_ref(), wanted))
}

/// Whether `granted` contains at least one of `wanted`
pub fn has_any_role<I, S, W>(granted: I, wanted: &[W]) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    W: AsRef<str>,
{
    let granted: Vec<String> = granted
        .into_iter()
        .map(|role| role.as_ref().to_string())
        .collect();
    wanted.iter().any(|want| has_role(&granted, want.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_matches_prefixed() {
        assert!(has_role(["ROLE_ADMIN"], "ADMIN"));
        assert!(has_role(["ADMIN"], "ADMIN"));
    }

    #[test]
    fn test_prefixed_matches_plain() {
        assert!(has_role(["ADMIN"], "ROLE_ADMIN"));
        assert!(has_role(["ROLE_ADMIN"], "ROLE_ADMIN"));
    }

    #[test]
    fn test_absent_role() {
        assert!(!has_role(["ROLE_VIEWER", "OPERATOR"], "ADMIN"));
        assert!(!has_role(Vec::<String>::new(), "ADMIN"));
        assert!(!has_role(["ROLE_ADMINISTRATOR"], "ADMIN"));
    }

    #[test]
    fn test_empty_role_never_matches() {
        assert!(!has_role(["ROLE_"], ""));
        assert!(!has_role(["ADMIN"], "ROLE_"));
    }

    #[test]
    fn test_any_role() {
        let granted = vec!["ROLE_OPERATOR".to_string()];
        assert!(has_any_role(&granted, &["ADMIN", "OPERATOR"]));
        assert!(!has_any_role(&granted, &["ADMIN", "MANAGER"]));
        assert!(!has_any_role(&granted, &[] as &[&str]));
    }
}
