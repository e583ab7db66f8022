//! Derivation of code identifiers from human-readable application names.
//!
//! Display names are split on whitespace and hyphens, every token is stripped of
//! characters that are not alphanumeric, and tokens left empty are dropped.
//! Case folding relies on Rust's Unicode mappings, which do not depend on the
//! system locale.

use crate::error::{Error, Result};

/// Letter case used when joining display name tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    /// `testApp`
    LowerCamel,
    /// `TestApp`
    Pascal,
}

impl IdentifierCase {
    pub fn apply(self, display_name: &str) -> String {
        match self {
            IdentifierCase::LowerCamel => to_lower_camel(display_name),
            IdentifierCase::Pascal => to_pascal(display_name),
        }
    }
}

fn tokens(display_name: &str) -> Vec<String> {
    display_name
        .split(|c: char| c.is_whitespace() || c == '-')
        .map(|token| token.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect()
}

fn with_first(token: &str, upper: bool) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a display name to a lower camel identifier, e.g. `"Test App"` to `"testApp"`.
pub fn to_lower_camel(display_name: &str) -> String {
    tokens(display_name)
        .iter()
        .enumerate()
        .map(|(i, token)| with_first(token, i > 0))
        .collect()
}

/// Converts a display name to a Pascal identifier, e.g. `"My App-2"` to `"MyApp2"`.
pub fn to_pascal(display_name: &str) -> String {
    tokens(display_name).iter().map(|token| with_first(token, true)).collect()
}

/// Converts a display name to a single lowercase package segment, e.g. `"Test App"` to `"testapp"`.
pub fn to_package_segment(display_name: &str) -> String {
    tokens(display_name).concat().to_lowercase()
}

/// Converts a display name to kebab case, e.g. `"Test App"` to `"test-app"`.
pub fn to_endpoint(display_name: &str) -> String {
    cruet::to_kebab_case(display_name.trim())
}

/// Mangles a dotted package into the form used by JNI symbol names.
///
/// `com.example.my_app` becomes `com_example_my_1app`.
pub fn to_jni_package(package: &str) -> String {
    package
        .split('.')
        .map(|segment| segment.replace('_', "_1"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Derives the code identifier and fails when nothing usable is left of the name.
pub fn code_identifier(display_name: &str, case: IdentifierCase) -> Result<String> {
    let identifier = case.apply(display_name);
    if identifier.is_empty() {
        return Err(Error::ValidationError(format!(
            "application name '{}' does not contain any letters or digits",
            display_name
        )));
    }
    Ok(identifier)
}

/// An Android application ID segment: `[A-Za-z][A-Za-z0-9_]*`.
fn is_package_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Checks that `package` is a dotted Android package name and returns its segments.
pub fn validate_package(package: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = package.split('.').collect();
    if package.is_empty() || !segments.iter().all(|s| is_package_segment(s)) {
        return Err(Error::ValidationError(format!(
            "'{}' is not a valid package name",
            package
        )));
    }
    Ok(segments)
}

/// Checks that an endpoint name is usable both as a URL segment and a file name.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let valid = !endpoint.is_empty()
        && endpoint
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(Error::ValidationError(format!(
            "'{}' is not a valid endpoint name",
            endpoint
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_and_pascal() {
        assert_eq!(to_pascal("Test App"), "TestApp");
        assert_eq!(to_lower_camel("Test App"), "testApp");
        assert_eq!(to_pascal("My App-2"), "MyApp2");
        assert_eq!(to_lower_camel("My App-2"), "myApp2");
    }

    #[test]
    fn test_punctuation_tokens_dropped() {
        assert_eq!(to_pascal("Hello, World! -- & co."), "HelloWorldCo");
        assert_eq!(to_lower_camel("  ...  "), "");
        assert_eq!(to_pascal(""), "");
    }

    #[test]
    fn test_inner_letters_preserved() {
        assert_eq!(to_pascal("iOS bridge"), "IOSBridge");
        assert_eq!(to_lower_camel("HTML parser"), "hTMLParser");
    }

    #[test]
    fn test_unicode_letters() {
        assert_eq!(to_pascal("élan vital"), "ÉlanVital");
        assert_eq!(to_lower_camel("Über app"), "überApp");
    }

    #[test]
    fn test_package_forms() {
        assert_eq!(to_package_segment("Test App"), "testapp");
        assert_eq!(to_jni_package("com.example.test"), "com_example_test");
        assert_eq!(to_jni_package("com.example.my_app"), "com_example_my_1app");
        assert_eq!(to_endpoint("Test App"), "test-app");
    }

    #[test]
    fn test_code_identifier_rejects_empty() {
        assert!(code_identifier("!!!", IdentifierCase::Pascal).is_err());
        assert_eq!(
            code_identifier("Test App", IdentifierCase::LowerCamel).unwrap(),
            "testApp"
        );
    }

    #[test]
    fn test_validate_package() {
        assert_eq!(
            validate_package("com.example.test").unwrap(),
            vec!["com", "example", "test"]
        );
        assert!(validate_package("").is_err());
        assert!(validate_package("com..test").is_err());
        assert!(validate_package("com.1example").is_err());
        assert!(validate_package("com.exa-mple").is_err());
        assert!(validate_package("com.example.my_app").is_ok());
    }

    #[test]
    fn test_validate_package_rejects_non_ascii_and_dollar() {
        assert!(validate_package("com.example.café").is_err());
        assert!(validate_package("com.exam$ple").is_err());
        assert!(validate_package("com.$example").is_err());
        assert!(validate_package("com._example").is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("test-app").is_ok());
        assert!(validate_endpoint("test app").is_err());
        assert!(validate_endpoint("").is_err());
    }
}
