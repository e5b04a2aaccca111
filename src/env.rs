//! Process-environment fallbacks for client configuration.
//!
//! Every variable the SDK understands carries the `MODELZ_` prefix. The
//! environment is read once, by [`EnvConfig::from_env`], and the result is
//! handed to [`Config::apply_env`]; nothing else in the crate touches the
//! process environment.
//!
//! [`Config::apply_env`]: crate::Config::apply_env

/// Prefix shared by every environment variable the SDK reads.
pub const ENV_PREFIX: &str = "MODELZ_";

/// Configuration values sourced from the process environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// `MODELZ_API_KEY`
    pub api_key: Option<String>,
    /// `MODELZ_HOST`
    pub host: Option<String>,
}

impl EnvConfig {
    /// Reads `MODELZ_API_KEY` and `MODELZ_HOST` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Injected lookup source for testability. `from_env` uses `std::env::var`.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            api_key: read("API_KEY"),
            host: read("HOST"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_prefixed_variables() {
        let vars = lookup_from(&[
            ("MODELZ_API_KEY", "mzi-abc123"),
            ("MODELZ_HOST", "http://localhost:8080"),
        ]);
        let cfg = EnvConfig::from_lookup(|name| vars.get(name).cloned());
        assert_eq!(cfg.api_key.as_deref(), Some("mzi-abc123"));
        assert_eq!(cfg.host.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn ignores_unprefixed_and_blank_values() {
        let vars = lookup_from(&[("API_KEY", "unprefixed"), ("MODELZ_API_KEY", "   ")]);
        let cfg = EnvConfig::from_lookup(|name| vars.get(name).cloned());
        assert_eq!(cfg, EnvConfig::default());
    }

    #[test]
    fn trims_whitespace() {
        let vars = lookup_from(&[("MODELZ_API_KEY", "  mzi-abc123\n")]);
        let cfg = EnvConfig::from_lookup(|name| vars.get(name).cloned());
        assert_eq!(cfg.api_key.as_deref(), Some("mzi-abc123"));
    }
}
