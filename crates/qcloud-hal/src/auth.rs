//! Credential lookup.
//!
//! Every token-based client reads its secret from an explicit argument first
//! and falls back to a named variable. Variables are read from a
//! [`CredentialSource`]: the process environment, or a map injected by the
//! caller (a credentials file, a test fixture).

use rustc_hash::FxHashMap;

use crate::error::{HalError, HalResult};

/// Variable holding the qibo cloud token.
pub const QIBO_TOKEN_VAR: &str = "QIBO_CLIENT_TOKEN";
/// Variable holding the IonQ API key.
pub const IONQ_TOKEN_VAR: &str = "IONQ_TOKEN";
/// Variable holding the IBM Quantum API token.
pub const IBM_TOKEN_VAR: &str = "IBM_QUANTUM_TOKEN";

/// Where credential variables are looked up.
#[derive(Debug, Clone, Default)]
pub enum CredentialSource {
    /// The process environment.
    #[default]
    Environment,
    /// An injected map; the environment is not consulted.
    Injected(FxHashMap<String, String>),
}

impl CredentialSource {
    /// Build an injected source from key/value pairs.
    pub fn injected<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Injected(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a variable. Empty values count as unset.
    pub fn get(&self, var: &str) -> Option<String> {
        let value = match self {
            CredentialSource::Environment => std::env::var(var).ok(),
            CredentialSource::Injected(map) => map.get(var).cloned(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Something that can hand out an API token.
pub trait TokenProvider: Send + Sync {
    /// Return the token or the error describing why none is available.
    fn token(&self) -> HalResult<String>;

    /// Returns `true` if [`TokenProvider::token`] would succeed.
    fn has_valid_token(&self) -> bool {
        self.token().is_ok()
    }
}

/// Reads a token from one named variable of a [`CredentialSource`].
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    env_var: String,
    source: CredentialSource,
}

impl EnvTokenProvider {
    /// Read `env_var` from the process environment.
    pub fn new(env_var: impl Into<String>) -> Self {
        Self::with_source(env_var, CredentialSource::Environment)
    }

    /// Read `env_var` from the given source.
    pub fn with_source(env_var: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            env_var: env_var.into(),
            source,
        }
    }

    /// Name of the consulted variable.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }
}

impl TokenProvider for EnvTokenProvider {
    fn token(&self) -> HalResult<String> {
        self.source
            .get(&self.env_var)
            .ok_or_else(|| HalError::MissingCredential {
                var: self.env_var.clone(),
            })
    }
}

/// Explicit token if given and non-empty, otherwise the provider's token.
pub fn resolve_token(explicit: Option<&str>, provider: &dyn TokenProvider) -> HalResult<String> {
    match explicit.filter(|t| !t.is_empty()) {
        Some(token) => Ok(token.to_string()),
        None => provider.token(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_token_provider() {
        // SAFETY: Test-only env var manipulation, single-threaded test context.
        unsafe {
            std::env::set_var("QCLOUD_TEST_TOKEN_VAR_12345", "test-token");
        }

        let provider = EnvTokenProvider::new("QCLOUD_TEST_TOKEN_VAR_12345");
        assert!(provider.has_valid_token());
        assert_eq!(provider.token().unwrap(), "test-token");

        let missing = EnvTokenProvider::new("QCLOUD_NONEXISTENT_VAR_12345");
        assert!(matches!(
            missing.token(),
            Err(HalError::MissingCredential { var }) if var == "QCLOUD_NONEXISTENT_VAR_12345"
        ));

        // SAFETY: Cleaning up test variable
        unsafe {
            std::env::remove_var("QCLOUD_TEST_TOKEN_VAR_12345");
        }
    }

    #[test]
    fn test_injected_source_ignores_environment() {
        // SAFETY: Test-only env var manipulation, single-threaded test context.
        unsafe {
            std::env::set_var("QCLOUD_TEST_SHADOWED_VAR", "from-env");
        }

        let empty = CredentialSource::injected(Vec::<(String, String)>::new());
        assert!(empty.get("QCLOUD_TEST_SHADOWED_VAR").is_none());

        let source = CredentialSource::injected([("QCLOUD_TEST_SHADOWED_VAR", "from-map")]);
        assert_eq!(
            source.get("QCLOUD_TEST_SHADOWED_VAR").as_deref(),
            Some("from-map")
        );

        // SAFETY: Cleaning up test variable
        unsafe {
            std::env::remove_var("QCLOUD_TEST_SHADOWED_VAR");
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let source = CredentialSource::injected([(IONQ_TOKEN_VAR, "")]);
        let provider = EnvTokenProvider::with_source(IONQ_TOKEN_VAR, source);
        assert!(!provider.has_valid_token());
    }

    #[test]
    fn test_explicit_token_wins() {
        let provider =
            EnvTokenProvider::with_source(QIBO_TOKEN_VAR, CredentialSource::injected([(QIBO_TOKEN_VAR, "env")]));
        assert_eq!(resolve_token(Some("explicit"), &provider).unwrap(), "explicit");
        assert_eq!(resolve_token(None, &provider).unwrap(), "env");
        assert_eq!(resolve_token(Some(""), &provider).unwrap(), "env");
    }
}
