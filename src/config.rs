//! Runtime options for resolvers and providers.
//!
//! Options can be built in code, read from environment variables, or (with
//! the `config` feature) deserialized from JSON.

use std::env;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment prefix used by [`ResolverOptions::from_env`] and
/// [`ProviderOptions::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "FERROUS_SCOPE";

/// Options for a [`ScopedResolver`](crate::ScopedResolver).
///
/// # Examples
///
/// ```
/// use ferrous_scope::{ResolverOptions, ScopedResolver, ServiceCollection};
///
/// let options = ResolverOptions { release_on_drop: false };
/// let resolver = ScopedResolver::with_options(ServiceCollection::new().build(), options);
/// assert!(!resolver.options().release_on_drop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResolverOptions {
    /// Release handles that are dropped without an explicit `release()`.
    pub release_on_drop: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { release_on_drop: true }
    }
}

impl ResolverOptions {
    /// Reads `FERROUS_SCOPE_RELEASE_ON_DROP`.
    pub fn from_env() -> Self {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Reads `<PREFIX>_RELEASE_ON_DROP`, falling back to defaults.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let defaults = Self::default();
        Self {
            release_on_drop: env_value(prefix, "release_on_drop", defaults.release_on_drop),
        }
    }

    /// Parses options from JSON; missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Options for a [`ServiceProvider`](crate::ServiceProvider).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ProviderOptions {
    /// Reject scoped services resolved from the root provider.
    ///
    /// When off, the root provider acts as its own scope for scoped
    /// registrations, so singletons may depend on scoped services.
    pub validate_scopes: bool,
    /// Maximum nesting of factory calls before resolution gives up.
    pub max_depth: usize,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            validate_scopes: false,
            max_depth: 256,
        }
    }
}

impl ProviderOptions {
    /// Reads `FERROUS_SCOPE_VALIDATE_SCOPES` and `FERROUS_SCOPE_MAX_DEPTH`.
    pub fn from_env() -> Self {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Reads `<PREFIX>_VALIDATE_SCOPES` and `<PREFIX>_MAX_DEPTH`, falling back to defaults.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let defaults = Self::default();
        Self {
            validate_scopes: env_value(prefix, "validate_scopes", defaults.validate_scopes),
            max_depth: env_value(prefix, "max_depth", defaults.max_depth),
        }
    }

    /// Parses options from JSON; missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn env_key(prefix: &str, key: &str) -> String {
    format!("{}_{}", prefix.to_uppercase(), key.to_uppercase())
}

fn env_value<T>(prefix: &str, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let name = env_key(prefix, key);
    match env::var(&name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(variable = %name, value = %raw, default = ?default, "ignoring unparsable option");
                default
            }
        },
        Err(_) => default,
    }
}
