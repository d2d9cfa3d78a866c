//! Internal scanning primitives shared by [`crate::parse`] and
//! [`crate::attributes`].

/// Reads the longest decimal number at the start of `s`.
///
/// Leading whitespace and a single sign are accepted, then digits with at
/// most one decimal point. Trailing text is ignored, so `"1.5 ct"` reads as
/// `1.5`. Returns `None` when no digit is found or the value is not finite.
pub(crate) fn parse_leading_float(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }

    let number = trimmed[..end].trim_end_matches('.');
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Upper-cases the first character and replaces `-` with a space, turning a
/// reference slug like `"lab-grown"` into `"Lab grown"`.
pub(crate) fn humanize_slug(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars)
            .collect::<String>()
            .replace('-', " "),
    }
}

/// Trims `s` and returns `None` when nothing is left.
pub(crate) fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
