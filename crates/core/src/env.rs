//! Snapshot of environment variables used for provider resolution.

use std::collections::BTreeMap;

/// An immutable copy of the environment.
///
/// Provider resolution reads from a snapshot rather than the live process
/// environment so that it can be driven from tests without mutating globals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Value of `name`, treating an empty value as unset
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Whether `name` is set to exactly `"true"`
    pub fn is_true(&self, name: &str) -> bool {
        self.get(name) == Some("true")
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_unset() {
        let env: EnvSnapshot = [("CIRCLE_SHA1", "")].into_iter().collect();
        assert_eq!(env.get("CIRCLE_SHA1"), None);
    }

    #[test]
    fn test_is_true_is_exact() {
        let env: EnvSnapshot = [("CI", "true"), ("TRAVIS", "1")].into_iter().collect();
        assert!(env.is_true("CI"));
        assert!(!env.is_true("TRAVIS"));
        assert!(!env.is_true("CIRCLECI"));
    }

    #[test]
    fn test_capture_reads_process_env() {
        temp_env::with_var("CISTAT_TEST_MARKER", Some("present"), || {
            let env = EnvSnapshot::capture();
            assert_eq!(env.get("CISTAT_TEST_MARKER"), Some("present"));
        });
    }

    #[test]
    fn test_capture_without_var() {
        temp_env::with_var_unset("CISTAT_TEST_MARKER", || {
            let env = EnvSnapshot::capture();
            assert_eq!(env.get("CISTAT_TEST_MARKER"), None);
        });
    }
}
