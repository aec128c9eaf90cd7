//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config field for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_literal() {
        assert_eq!(expand_env("plain", "f").unwrap(), "plain");
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LTI_EXPAND_DEFAULT_TEST");
        }

        let value = expand_env("${LTI_EXPAND_DEFAULT_TEST:-fallback}", "f").unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_expand_missing_reports_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LTI_EXPAND_MISSING_TEST");
        }

        let err = expand_env("${LTI_EXPAND_MISSING_TEST}", "consumers[0].secret").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("consumers[0].secret"));
        assert!(msg.contains("LTI_EXPAND_MISSING_TEST"));
    }
}
