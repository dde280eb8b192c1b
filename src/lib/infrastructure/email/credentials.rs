//! Credential resolution for direct invocation
//!
//! The service path has no fallback chain; it reads its single secret from
//! the environment and rejects every request when it is absent.

use std::io;

use thiserror::Error;

/// An error that can occur while resolving the transport secret
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Every source was consulted and none yielded a value
    #[error("no credential provided")]
    Missing,

    /// The interactive prompt could not be read
    #[error("failed to read credential from the terminal")]
    Prompt(#[from] io::Error),
}

/// Resolve the transport secret.
///
/// Sources are consulted in strict order: the environment value, the
/// explicitly supplied value, then the interactive prompt. The first
/// non-empty source wins and later sources are not consulted.
///
/// # Errors
/// [`CredentialError::Missing`] when the prompt is the last resort and
/// yields an empty value.
pub fn resolve_secret<F>(
    env_value: Option<String>,
    explicit: Option<String>,
    prompt: F,
) -> Result<String, CredentialError>
where
    F: FnOnce() -> io::Result<String>,
{
    if let Some(value) = env_value.filter(|value| !value.is_empty()) {
        return Ok(value);
    }

    if let Some(value) = explicit.filter(|value| !value.is_empty()) {
        return Ok(value);
    }

    let value = prompt()?;

    if value.is_empty() {
        return Err(CredentialError::Missing);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn no_prompt() -> io::Result<String> {
        panic!("prompt must not be consulted");
    }

    #[test]
    fn test_environment_value_wins() -> TestResult {
        let secret = resolve_secret(
            Some("from-env".to_string()),
            Some("from-flag".to_string()),
            no_prompt,
        )?;

        assert_eq!(secret, "from-env");

        Ok(())
    }

    #[test]
    fn test_explicit_value_wins_over_prompt() -> TestResult {
        let secret = resolve_secret(None, Some("from-flag".to_string()), no_prompt)?;

        assert_eq!(secret, "from-flag");

        Ok(())
    }

    #[test]
    fn test_empty_sources_fall_through_to_prompt() -> TestResult {
        let secret = resolve_secret(Some(String::new()), Some(String::new()), || {
            Ok("from-prompt".to_string())
        })?;

        assert_eq!(secret, "from-prompt");

        Ok(())
    }

    #[test]
    fn test_empty_prompt_is_missing() {
        let result = resolve_secret(None, None, || Ok(String::new()));

        assert!(matches!(result, Err(CredentialError::Missing)));
    }

    #[test]
    fn test_unavailable_prompt_is_an_error() {
        let result = resolve_secret(None, None, || {
            Err(io::Error::new(io::ErrorKind::Unsupported, "no tty"))
        });

        assert!(matches!(result, Err(CredentialError::Prompt(_))));
    }
}
