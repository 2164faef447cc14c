//! Sizing for the stress tests, overridable from the environment.

use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading a [`StressConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid number: {source}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// How hard the stress tests push a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressConfig {
    /// Worker threads per scenario.
    pub threads: usize,
    /// Operations each worker performs in count-bounded scenarios.
    pub ops_per_thread: usize,
    /// Run time of time-bounded scenarios.
    pub duration: Duration,
}

impl StressConfig {
    pub const THREADS_VAR: &'static str = "HANDOVER_STRESS_THREADS";
    pub const OPS_VAR: &'static str = "HANDOVER_STRESS_OPS";
    pub const MILLIS_VAR: &'static str = "HANDOVER_STRESS_MILLIS";

    /// Defaults overridden by any `HANDOVER_STRESS_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StressConfig::default();

        if let Some(threads) = parse_var(&lookup, Self::THREADS_VAR)? {
            config.threads = threads as usize;
        }
        if let Some(ops) = parse_var(&lookup, Self::OPS_VAR)? {
            config.ops_per_thread = ops as usize;
        }
        if let Some(millis) = parse_var(&lookup, Self::MILLIS_VAR)? {
            config.duration = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::Zero { field: "threads" });
        }
        if self.ops_per_thread == 0 {
            return Err(ConfigError::Zero {
                field: "ops_per_thread",
            });
        }
        if self.duration.is_zero() {
            return Err(ConfigError::Zero { field: "duration" });
        }
        Ok(())
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        StressConfig {
            threads: 8,
            ops_per_thread: 2_000,
            duration: Duration::from_millis(500),
        }
    }
}

fn parse_var<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(source) => Err(ConfigError::InvalidNumber { var, value, source }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = StressConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StressConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let config = StressConfig::from_lookup(lookup_from(&[
            (StressConfig::THREADS_VAR, "2"),
            (StressConfig::OPS_VAR, " 50 "),
            (StressConfig::MILLIS_VAR, "20"),
        ]))
        .unwrap();

        assert_eq!(config.threads, 2);
        assert_eq!(config.ops_per_thread, 50);
        assert_eq!(config.duration, Duration::from_millis(20));
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err =
            StressConfig::from_lookup(lookup_from(&[(StressConfig::OPS_VAR, "lots")])).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                var: StressConfig::OPS_VAR,
                ..
            }
        ));
        assert!(err.to_string().contains("HANDOVER_STRESS_OPS"));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = StressConfig::from_lookup(lookup_from(&[(StressConfig::THREADS_VAR, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Zero { field: "threads" }));
    }
}
