//! Identifier normalization for field and type names.
//!
//! Field labels are authored by humans ("Page Title", "hero_image",
//! "Street Address! (primary)") and must become valid GraphQL names.

use std::sync::LazyLock;

use regex::Regex;

/// Word separators when no extra characters are allowed.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("Invalid regex pattern"));

/// Converts an arbitrary label into a camelCase identifier.
///
/// Every run of characters that is not an ASCII letter, digit or one of
/// `extra_allowed` collapses into a single word break. Words are joined with
/// their first letter upper-cased, and the first letter of the result is
/// lower-cased. Letters inside a word are left untouched, so `pageTitle`
/// stays `pageTitle`.
///
/// An empty result means the label has no usable name. A non-empty result
/// may still start with a digit; check it with [`is_valid_graphql_name`].
pub fn camel_case(raw: &str, extra_allowed: &[char]) -> String {
    let custom;
    let separators = if extra_allowed.is_empty() {
        &*SEPARATORS
    } else {
        let extra: String = extra_allowed
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();

        // The class is built from escaped characters only.
        custom = match Regex::new(&format!("[^a-zA-Z0-9{extra}]+")) {
            Ok(re) => re,
            Err(_) => return String::new(),
        };
        &custom
    };

    let spaced = separators.replace_all(raw, " ");
    let joined: String = spaced
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(ucfirst)
        .collect();

    lcfirst(&joined)
}

/// Checks if a name is valid for GraphQL.
///
/// GraphQL names must match the pattern `[_a-zA-Z][_a-zA-Z0-9]*`:
/// - Must start with an underscore or letter (not a number)
/// - Can only contain underscores, letters, and numbers
pub fn is_valid_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Upper-cases the first character of a string.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lower-cases the first character of a string.
pub fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
    }
}
