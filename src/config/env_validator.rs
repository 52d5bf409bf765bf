//! Environment variable validation with helpful warnings
//!
//! Invalid enum-valued variables fall back to the configured value and print a
//! warning with a "did you mean" suggestion instead of aborting the run.

use std::io::Write;

/// Validator for environment variable values
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse a value, returning `fallback` (with a warning on stderr) if invalid
    pub fn parse<T, F>(&self, value: &str, parser: F, fallback: T) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        self.parse_with_writer(value, parser, fallback, &mut std::io::stderr())
    }

    /// Parse with a custom writer (for testing)
    pub fn parse_with_writer<T, F, W>(&self, value: &str, parser: F, fallback: T, writer: &mut W) -> T
    where
        F: Fn(&str) -> Option<T>,
        W: Write,
    {
        if let Some(parsed) = parser(value) {
            return parsed;
        }

        tracing::warn!(var = self.var_name, value, "ignoring invalid environment value");
        let _ = writeln!(
            writer,
            "Warning: Invalid {} value '{}'{}",
            self.var_name,
            value,
            self.suggest(value)
        );
        let _ = writeln!(writer, "Valid values: {}", self.valid_values.join(", "));
        fallback
    }

    fn suggest(&self, value: &str) -> String {
        let input = value.trim().to_lowercase();
        self.valid_values
            .iter()
            .map(|valid| (*valid, levenshtein(&input, valid)))
            .min_by_key(|(_, dist)| *dist)
            .filter(|(_, dist)| (1..=2).contains(dist))
            .map(|(valid, _)| format!(". Did you mean '{}'?", valid))
            .unwrap_or_default()
    }
}

/// Levenshtein distance over bytes, for typo suggestions
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ac) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("ambient", "ambient"), 0);
        assert_eq!(levenshtein("ambiant", "ambient"), 1);
        assert_eq!(levenshtein("", "gcs"), 3);
        assert_eq!(levenshtein("regoin", "region"), 2);
    }

    #[test]
    fn test_env_validator_valid_value() {
        let validator = EnvVarValidator::new("RANKDEPLOY_AUTH_MODE", &["workload-identity", "ambient"]);
        let mut output = Vec::new();
        let result = validator.parse_with_writer(
            "ambient",
            |s| (s == "ambient").then_some(2),
            1,
            &mut output,
        );
        assert_eq!(result, 2);
        assert!(output.is_empty());
    }

    #[test]
    fn test_env_validator_invalid_value_warns_and_falls_back() {
        let validator = EnvVarValidator::new("STATE_STORAGE_METHOD", &["gcs", "local"]);
        let mut output = Vec::new();
        let result = validator.parse_with_writer("gsc", |_| None::<u8>, 7, &mut output);
        assert_eq!(result, 7);

        let msg = String::from_utf8(output).unwrap();
        assert!(msg.contains("Warning: Invalid STATE_STORAGE_METHOD value 'gsc'"), "{msg}");
        assert!(msg.contains("Did you mean 'gcs'?"), "{msg}");
        assert!(msg.contains("Valid values: gcs, local"), "{msg}");
    }

    #[test]
    fn test_env_validator_no_suggestion_for_distant_value() {
        let validator = EnvVarValidator::new("RANKDEPLOY_AUTH_MODE", &["workload-identity", "ambient"]);
        let mut output = Vec::new();
        validator.parse_with_writer("service-account-key", |_| None::<()>, (), &mut output);

        let msg = String::from_utf8(output).unwrap();
        assert!(!msg.contains("Did you mean"), "{msg}");
    }
}
