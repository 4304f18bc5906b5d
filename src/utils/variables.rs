use std::env;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ENV_VAR_RE: Regex =
        Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z0-9_]+)").expect("env var pattern is a valid regex");
}

pub struct VariablesUtils {}

impl VariablesUtils {
    /// Expands ${VAR} or $VAR patterns using the current environment.
    pub fn expand_env_vars(input: &str) -> String {
        Self::expand_with(input, |key| env::var(key).ok())
    }

    pub fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
        ENV_VAR_RE
            .replace_all(input, |caps: &regex::Captures| {
                // Capture either ${VAR} or $VAR
                caps.get(1)
                    .or(caps.get(2))
                    .and_then(|key| lookup(key.as_str()))
                    .unwrap_or_default()
            })
            .to_string()
    }
}
