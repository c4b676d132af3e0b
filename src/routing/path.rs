//! Base-path composition.

/// Prefix `path` with `base_path`, inserting a `/` unless the path already
/// starts with one.
pub fn append_base_path(base_path: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base_path}{path}")
    } else {
        format!("{base_path}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_segment_gets_a_separator() {
        assert_eq!(append_base_path("/api", "user"), "/api/user");
    }

    #[test]
    fn leading_slash_concatenates_directly() {
        assert_eq!(append_base_path("/api", "/user"), "/api/user");
    }

    #[test]
    fn empty_path_keeps_the_trailing_slash() {
        assert_eq!(append_base_path("/api", ""), "/api/");
    }

    #[test]
    fn empty_base_path_yields_an_absolute_path() {
        assert_eq!(append_base_path("", "user"), "/user");
    }
}
