//! `${VAR}` expansion in configuration values.
//!
//! `${VAR:-default}` falls back to `default` when `VAR` is unset. Bare `$VAR`
//! is left alone so that URLs and keys containing `$` survive untouched.

use std::borrow::Cow;
use std::env::VarError;

use crate::ConfigError;

/// Expand `${...}` references in the value of `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: match e.cause {
                VarError::NotPresent => format!("${{{}}} not set", e.var_name),
                VarError::NotUnicode(_) => format!("${{{}}} is not valid unicode", e.var_name),
            },
        })
}
