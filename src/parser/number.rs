//! Numeric Prefix Scanner
//!
//! Reports how much of a string forms a signed decimal literal.

/// Length in bytes of the signed decimal number at the start of `text`.
///
/// Leading spaces and tabs are counted as part of the number. The literal is
/// an optional sign, digits and at most one decimal point, with at least one
/// digit somewhere. Returns 0 if `text` does not start with a number.
pub fn match_number(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    if pos < bytes.len() && matches!(bytes[pos], b'+' | b'-') {
        pos += 1;
    }

    let mut digits = 0;
    let mut seen_point = false;
    while pos < bytes.len() {
        match bytes[pos] {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        pos += 1;
    }

    if digits == 0 { 0 } else { pos }
}

/// Parse the number found by [`match_number`], returning the value and the
/// number of bytes consumed.
pub fn parse_number(text: &str) -> Option<(f64, usize)> {
    let len = match_number(text);
    if len == 0 {
        return None;
    }
    let value = text[..len].trim_start().parse::<f64>().ok()?;
    Some((value, len))
}
