//! Environment helpers

/// Read an optional variable, ignoring empty values.
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
