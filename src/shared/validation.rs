use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slugs.
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "direito-civil", "art123", "lei-8078-90"
    /// - Invalid: "-civil", "civil-", "direito--civil", "Direito", "direito_civil"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("direito-civil"));
        assert!(SLUG_REGEX.is_match("art123"));
        assert!(SLUG_REGEX.is_match("lei-8078-90"));
        assert!(SLUG_REGEX.is_match("a"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-civil")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("civil-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("direito--civil")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Direito")); // uppercase
        assert!(!SLUG_REGEX.is_match("direito_civil")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
        assert!(!SLUG_REGEX.is_match("direito civil")); // space
    }
}
