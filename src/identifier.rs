//! Secret identifier construction and sanitization.
//!
//! Secret identifiers are built from free-form naming components (cluster
//! name, resource kind, resource name) joined by a fixed separator, then
//! sanitized to satisfy the backend's naming grammar. The grammar is modeled
//! as the [`IdentifierSanitizer`] strategy so additional backends with
//! different legal-character sets or length limits can plug in without
//! touching the CRUD orchestration.
//!
//! The reference implementation targets Kubernetes Secret names: lowercase
//! alphanumerics and `-`, at most 253 characters, no separator at either edge
//! and no doubled separators.

use std::sync::Arc;

use crate::errors::{Result, SecretsError};

/// Separator joining identifier components.
pub const SEPARATOR: char = '-';

/// Maximum length of a Kubernetes Secret name (DNS subdomain limit).
pub const KUBERNETES_MAX_NAME_LEN: usize = 253;

/// Backend-specific identifier grammar.
///
/// Implementations must be pure: same input, same output, no I/O.
pub trait IdentifierSanitizer: Send + Sync {
    /// The separator character components are joined with.
    fn separator(&self) -> char {
        SEPARATOR
    }

    /// Maximum legal identifier length for the backend.
    fn max_length(&self) -> usize;

    /// Rewrite `raw` into a backend-legal identifier.
    ///
    /// # Errors
    ///
    /// [`SecretsError::InvalidIdentifier`] when the input has no legal
    /// representation (empty or all-separator after rewriting).
    fn sanitize(&self, raw: &str) -> Result<String>;
}

/// Sanitizer for the Kubernetes Secret naming grammar.
///
/// Rewrites in this order, so the no-edge/no-run invariants still hold after
/// truncation:
///
/// 1. case-fold and replace every character outside `[a-z0-9-]` with `-`
/// 2. collapse runs of consecutive separators
/// 3. strip the leading, then the trailing separator
/// 4. truncate to the length bound, stripping any separator the cut exposes
/// 5. reject an empty result as [`SecretsError::InvalidIdentifier`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KubernetesNameSanitizer;

impl IdentifierSanitizer for KubernetesNameSanitizer {
    fn max_length(&self) -> usize {
        KUBERNETES_MAX_NAME_LEN
    }

    fn sanitize(&self, raw: &str) -> Result<String> {
        let sep = self.separator();
        let mut out = String::with_capacity(raw.len().min(self.max_length()));
        for ch in raw.chars() {
            let ch = ch.to_ascii_lowercase();
            let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == sep {
                ch
            } else {
                sep
            };
            // Collapses runs and drops the leading separator in one pass.
            if ch == sep && (out.is_empty() || out.ends_with(sep)) {
                continue;
            }
            out.push(ch);
        }
        while out.ends_with(sep) {
            out.pop();
        }
        if out.len() > self.max_length() {
            // All remaining chars are ASCII, so the cut lands on a boundary.
            out.truncate(self.max_length());
            while out.ends_with(sep) {
                out.pop();
            }
        }
        if out.is_empty() {
            return Err(SecretsError::invalid_identifier(
                raw,
                "sanitization produced an empty identifier",
            ));
        }
        Ok(out)
    }
}

/// Builds backend-legal secret identifiers from naming components.
#[derive(Clone)]
pub struct SecretIdBuilder {
    sanitizer: Arc<dyn IdentifierSanitizer>,
}

impl SecretIdBuilder {
    /// Create a builder over a specific backend grammar.
    pub fn new(sanitizer: Arc<dyn IdentifierSanitizer>) -> Self {
        Self { sanitizer }
    }

    /// Builder for the Kubernetes naming grammar.
    pub fn kubernetes() -> Self {
        Self::new(Arc::new(KubernetesNameSanitizer))
    }

    /// Join `components` with the separator and sanitize the result.
    ///
    /// Components may contain arbitrary characters; the sanitizer guarantees
    /// the output is backend-legal or fails with an invalid-identifier error.
    pub fn build(&self, components: &[&str]) -> Result<String> {
        let joined = components.join(&self.sanitizer.separator().to_string());
        self.sanitizer.sanitize(&joined)
    }

    /// Append `field_name` to an already-built identifier and re-sanitize.
    ///
    /// Re-sanitizing is required: the suffix can reintroduce a trailing
    /// separator or push the identifier past the length bound.
    pub fn build_field(&self, base_id: &str, field_name: &str) -> Result<String> {
        let sep = self.sanitizer.separator();
        self.sanitizer.sanitize(&format!("{base_id}{sep}{field_name}"))
    }

    /// Sanitize a raw identifier directly.
    pub fn sanitize(&self, raw: &str) -> Result<String> {
        self.sanitizer.sanitize(raw)
    }
}

impl std::fmt::Debug for SecretIdBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretIdBuilder")
            .field("max_length", &self.sanitizer.max_length())
            .field("separator", &self.sanitizer.separator())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sanitize(raw: &str) -> Result<String> {
        KubernetesNameSanitizer.sanitize(raw)
    }

    #[test]
    fn test_sanitize_collapses_consecutive_separators() {
        assert_eq!(sanitize("a--b").unwrap(), "a-b");
        assert_eq!(sanitize("a---b---c").unwrap(), "a-b-c");
    }

    #[test]
    fn test_sanitize_strips_edge_separators() {
        assert_eq!(sanitize("-abc").unwrap(), "abc");
        assert_eq!(sanitize("abc-").unwrap(), "abc");
        assert_eq!(sanitize("--abc--").unwrap(), "abc");
    }

    #[test]
    fn test_sanitize_case_folds_and_replaces_illegal_chars() {
        assert_eq!(sanitize("MyService").unwrap(), "myservice");
        assert_eq!(sanitize("my_service").unwrap(), "my-service");
        assert_eq!(sanitize("my service!").unwrap(), "my-service");
        assert_eq!(sanitize("héllo wörld").unwrap(), "h-llo-w-rld");
    }

    #[test]
    fn test_sanitize_rejects_inputs_with_no_legal_form() {
        assert!(matches!(sanitize(""), Err(SecretsError::InvalidIdentifier { .. })));
        assert!(matches!(sanitize("-"), Err(SecretsError::InvalidIdentifier { .. })));
        assert!(matches!(sanitize("---"), Err(SecretsError::InvalidIdentifier { .. })));
        assert!(matches!(sanitize("__!!__"), Err(SecretsError::InvalidIdentifier { .. })));
    }

    #[test]
    fn test_sanitize_truncates_long_names() {
        let result = sanitize(&"a".repeat(300)).unwrap();
        assert_eq!(result, "a".repeat(253));
    }

    #[test]
    fn test_sanitize_truncation_strips_exposed_separator() {
        let raw = "a".repeat(252) + "-b";
        let result = sanitize(&raw).unwrap();
        assert!(result.len() <= 253);
        assert!(!result.ends_with('-'));
        assert_eq!(result, "a".repeat(252));
    }

    #[test]
    fn test_build_joins_and_sanitizes() {
        let builder = SecretIdBuilder::kubernetes();
        assert_eq!(
            builder.build(&["openmetadata", "database", "myservice"]).unwrap(),
            "openmetadata-database-myservice"
        );
        // Malformed components still produce a legal joined id.
        assert_eq!(builder.build(&["openmetadata", "bot", "_mybot"]).unwrap(), "openmetadata-bot-mybot");
        assert_eq!(builder.build(&["openmetadata", "service", "mydb_"]).unwrap(), "openmetadata-service-mydb");
        assert_eq!(
            builder.build(&["openmetadata", "service", "my__db"]).unwrap(),
            "openmetadata-service-my-db"
        );
    }

    #[test]
    fn test_build_field_appends_and_resanitizes() {
        let builder = SecretIdBuilder::kubernetes();
        assert_eq!(
            builder.build_field("openmetadata-database-myservice", "password").unwrap(),
            "openmetadata-database-myservice-password"
        );
        // Trailing separator on the base id collapses against the suffix.
        assert_eq!(
            builder.build_field("openmetadata-database-myservice-", "password").unwrap(),
            "openmetadata-database-myservice-password"
        );
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(raw in ".*") {
            if let Ok(once) = sanitize(&raw) {
                prop_assert_eq!(sanitize(&once).unwrap(), once);
            }
        }

        #[test]
        fn prop_sanitize_output_has_no_separator_edges_or_runs(raw in ".*") {
            if let Ok(out) = sanitize(&raw) {
                prop_assert!(!out.starts_with('-'));
                prop_assert!(!out.ends_with('-'));
                prop_assert!(!out.contains("--"));
            }
        }

        #[test]
        fn prop_sanitize_respects_length_bound(raw in proptest::collection::vec(any::<char>(), 0..600)) {
            let raw: String = raw.into_iter().collect();
            if let Ok(out) = sanitize(&raw) {
                prop_assert!(out.len() <= KUBERNETES_MAX_NAME_LEN);
                prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            }
        }
    }
}
