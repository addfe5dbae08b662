//! URL and pattern normalization.
//!
//! # Responsibilities
//! - Strip a leading `scheme://authority` or `//authority` prefix
//! - Trim surrounding slashes so patterns compare against bare request paths
//! - Keep regex bodies valid inside `/.../` delimiters
//!
//! # Design Decisions
//! - Prefix detection is purely lexical; case and ports are preserved in
//!   whatever remains, and strings without an authority are never altered
//! - The authority (including userinfo and port) is stripped as one unit

/// Normalize a rule `from`/`to` value so it is comparable to a request path.
///
/// When `is_regex_body` is set, `\/` escapes are removed before the prefix
/// is inspected and every `/` is escaped again afterwards.
pub fn normalize(url: &str, is_regex_body: bool) -> String {
    let unescaped;
    let mut value = url;

    if is_regex_body {
        unescaped = value.replace("\\/", "/");
        value = &unescaped;
    }

    let stripped = strip_authority(value).trim_matches('/');

    if is_regex_body {
        stripped.replace('/', "\\/")
    } else {
        stripped.to_string()
    }
}

/// Whether `url` starts with `scheme://`.
pub(crate) fn is_absolute(url: &str) -> bool {
    scheme_len(url).is_some_and(|len| url[len..].starts_with("://"))
}

/// Remove `scheme://authority` or `//authority` from the start of `url`.
fn strip_authority(url: &str) -> &str {
    let rest = match url.strip_prefix("//") {
        Some(rest) => rest,
        None => match scheme_len(url) {
            Some(len) => match url[len..].strip_prefix("://") {
                Some(rest) => rest,
                None => return url,
            },
            None => return url,
        },
    };

    let end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());

    // `///path` carries no host
    if end == 0 {
        return url;
    }

    &rest[end..]
}

/// Length of a leading URI scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`).
fn scheme_len(url: &str) -> Option<usize> {
    let mut chars = url.char_indices();

    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }

    let len = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')))
        .map(|(i, _)| i)
        .unwrap_or(url.len());

    Some(len)
}
