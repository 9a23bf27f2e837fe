//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Bare `$VAR` is left alone. An unset variable without a default is an
/// error naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| -> Result<Option<String>, UnsetVar> {
        std::env::var(name)
            .map(Some)
            .map_err(|_| UnsetVar(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that had no value.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_unchanged() {
        assert_eq!(expand_env("unidoc", "compiler.program").unwrap(), "unidoc");
        assert_eq!(expand_env("$HOME", "compiler.program").unwrap(), "$HOME");
    }

    #[test]
    fn test_expand_set_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("GROW_TEST_EXPAND_HOST", "0.0.0.0");
        }
        let result = expand_env("${GROW_TEST_EXPAND_HOST}", "server.host").unwrap();
        assert_eq!(result, "0.0.0.0");
        unsafe {
            std::env::remove_var("GROW_TEST_EXPAND_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("GROW_TEST_EXPAND_UNSET");
        }
        let result = expand_env("${GROW_TEST_EXPAND_UNSET:-pandoc}", "compiler.program").unwrap();
        assert_eq!(result, "pandoc");
    }

    #[test]
    fn test_expand_unset_is_error() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("GROW_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${GROW_TEST_EXPAND_MISSING}", "server.host").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("server.host"));
        assert!(message.contains("GROW_TEST_EXPAND_MISSING"));
    }
}
