// ABOUTME: Config values that are either literal or read from the environment.
// ABOUTME: Target coordinates and the access token are usually kept out of the config file.

use crate::error::{Error, Result};
use serde::Deserialize;

/// A config value written inline or referenced as `{ env: VAR, default: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn literal(value: impl Into<String>) -> Self {
        EnvValue::Literal(value.into())
    }

    pub fn from_env(var: impl Into<String>) -> Self {
        EnvValue::FromEnv {
            var: var.into(),
            default: None,
        }
    }

    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }

    /// Resolve, treating an unset variable with no default as empty.
    ///
    /// Resource name and type are legitimately unknown before provisioning.
    pub fn resolve_or_empty(&self) -> String {
        self.resolve().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_resolves_to_itself() {
        assert_eq!(EnvValue::literal("rg-1").resolve().unwrap(), "rg-1");
    }

    #[test]
    fn env_reference_reads_variable() {
        temp_env::with_var("SPRINGSHIP_TEST_RG", Some("rg-from-env"), || {
            let value = EnvValue::from_env("SPRINGSHIP_TEST_RG");
            assert_eq!(value.resolve().unwrap(), "rg-from-env");
        });
    }

    #[test]
    fn unset_variable_without_default_is_an_error() {
        temp_env::with_var_unset("SPRINGSHIP_TEST_UNSET", || {
            let err = EnvValue::from_env("SPRINGSHIP_TEST_UNSET")
                .resolve()
                .unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(var) if var == "SPRINGSHIP_TEST_UNSET"));
            assert_eq!(
                EnvValue::from_env("SPRINGSHIP_TEST_UNSET").resolve_or_empty(),
                ""
            );
        });
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        temp_env::with_var_unset("SPRINGSHIP_TEST_UNSET", || {
            let value: EnvValue =
                serde_yaml::from_str("{ env: SPRINGSHIP_TEST_UNSET, default: fallback }").unwrap();
            assert_eq!(value.resolve().unwrap(), "fallback");
        });
    }
}
