//! Name casing shared by command names, long option names and help
//! placeholders.
//!
//! Identifiers are split at underscores, hyphens and case boundaries, then
//! re-joined with hyphens. Long names and command names use the lowercase
//! form; placeholders shown in help text use the uppercase form.

/// Splits an identifier into words at `_`/`-` and case boundaries.
///
/// An uppercase run followed by a lowercase letter ends one character early,
/// so acronyms stay together (`HTTPServer` → `HTTP`, `Server`).
///
/// # Examples
///
/// ```
/// use cmdtree_core::casing::split_words;
///
/// assert_eq!(split_words("URL_max_length"), vec!["URL", "max", "length"]);
/// assert_eq!(split_words("maxLength"), vec!["max", "Length"]);
/// assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
/// ```
pub fn split_words(ident: &str) -> Vec<String> {
    let chars: Vec<char> = ident.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Uppercase hyphenated form used for help placeholders.
///
/// ```
/// use cmdtree_core::casing::screaming_kebab;
///
/// assert_eq!(screaming_kebab("URL_max_length"), "URL-MAX-LENGTH");
/// assert_eq!(screaming_kebab("a"), "A");
/// ```
pub fn screaming_kebab(ident: &str) -> String {
    split_words(ident)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Lowercase hyphenated form used for command and long option names.
///
/// ```
/// use cmdtree_core::casing::kebab;
///
/// assert_eq!(kebab("withVisible"), "with-visible");
/// assert_eq!(kebab("dry_run"), "dry-run");
/// ```
pub fn kebab(ident: &str) -> String {
    split_words(ident)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
