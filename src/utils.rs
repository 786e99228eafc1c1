use std::env::var;

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else(var_name: &'static str, or_else: impl FnOnce() -> String) -> String {
    env_var(var_name).unwrap_or_else(or_else)
}

/// Get the value of ENV var, empty values count as unset
pub fn env_var(var_name: &'static str) -> Option<String> {
    var(var_name).ok().filter(|value| !value.trim().is_empty())
}

/// A supplied string, empty strings count as not supplied
pub fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Keep the value only when it differs from the current one
pub fn changed<T: PartialEq>(value: Option<T>, current: &T) -> Option<T> {
    value.filter(|value| value != current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplied() {
        assert_eq!(None, supplied(None));
        assert_eq!(None, supplied(Some(String::new())));
        assert_eq!(Some(" ".to_string()), supplied(Some(" ".to_string())));
        assert_eq!(Some("Work".to_string()), supplied(Some("Work".to_string())));
    }

    #[test]
    fn test_changed() {
        assert_eq!(None, changed(Some(3), &3));
        assert_eq!(Some(4), changed(Some(4), &3));
        assert_eq!(None, changed(None, &3));
    }
}
