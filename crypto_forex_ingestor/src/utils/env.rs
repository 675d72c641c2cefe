//! Environment lookups for credentials.

use thiserror::Error;

/// A required environment variable is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads a required environment variable, with a structured error when it
/// is missing.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an optional environment variable, treating empty values as unset.
pub fn env_var_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn missing_variable_is_a_structured_error() {
        unsafe { std::env::remove_var("CFI_TEST_ABSENT") };
        let err = get_env_var("CFI_TEST_ABSENT").unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variable: CFI_TEST_ABSENT");
    }

    #[test]
    #[serial]
    fn empty_optional_variable_counts_as_unset() {
        unsafe { std::env::set_var("CFI_TEST_EMPTY", "") };
        assert_eq!(env_var_opt("CFI_TEST_EMPTY"), None);
        unsafe { std::env::set_var("CFI_TEST_EMPTY", "value") };
        assert_eq!(env_var_opt("CFI_TEST_EMPTY"), Some("value".to_string()));
        unsafe { std::env::remove_var("CFI_TEST_EMPTY") };
    }
}
