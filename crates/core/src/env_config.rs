//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Read a string environment variable, falling back to `default` when the
/// variable is unset or empty.
pub fn env_string_with_default(var: &str, default: &str) -> String {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test processes are single-threaded per variable here; each test uses a
    // unique variable name so set_var cannot race another test.
    fn set_var(var: &str, value: &str) {
        unsafe { std::env::set_var(var, value) };
    }

    fn remove_var(var: &str) {
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "SAHPAATHI_TEST_PARSE_VALID_55101";
        set_var(var_name, "8080");
        let result: u16 = env_parse_with_default(var_name, 5001);
        assert_eq!(result, 8080);
        remove_var(var_name);
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "SAHPAATHI_TEST_PARSE_INVALID_55102";
        set_var(var_name, "not-a-port");
        let result: u16 = env_parse_with_default(var_name, 5001);
        assert_eq!(result, 5001);
        remove_var(var_name);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "SAHPAATHI_TEST_PARSE_MISSING_55103";
        remove_var(var_name);
        let result: u16 = env_parse_with_default(var_name, 5001);
        assert_eq!(result, 5001);
    }

    #[test]
    fn test_env_string_empty_falls_back() {
        let var_name = "SAHPAATHI_TEST_STRING_EMPTY_55104";
        set_var(var_name, "   ");
        let result = env_string_with_default(var_name, "fallback");
        assert_eq!(result, "fallback");
        remove_var(var_name);
    }

    #[test]
    fn test_env_string_set_value() {
        let var_name = "SAHPAATHI_TEST_STRING_SET_55105";
        set_var(var_name, "custom");
        let result = env_string_with_default(var_name, "fallback");
        assert_eq!(result, "custom");
        remove_var(var_name);
    }
}
