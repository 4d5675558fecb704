//! Percent-encoding for URL path values and query components (RFC 3986).

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Encode every byte of `s` for which `keep` is false as `%XX`.
fn percent_encode(s: &str, keep: fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if keep(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

/// Encode a query key or value. Only unreserved characters pass through, so
/// `&`, `=` and `+` inside values cannot split or corrupt the query string.
pub fn query_component(s: &str) -> String {
    percent_encode(s, is_unreserved)
}

/// Encode a caller-supplied path value. Path characters (including `/`, so a
/// value may span segments) pass through. A segment that is exactly `.` or
/// `..` has its dots encoded so it cannot climb out of the template's path.
pub fn path_value(s: &str) -> String {
    let segments: Vec<String> = s
        .split('/')
        .map(|segment| match segment {
            "." | ".." => segment.replace('.', "%2E"),
            _ => percent_encode(segment, |b| is_unreserved(b) || is_pchar_extra(b)),
        })
        .collect();
    segments.join("/")
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

fn is_pchar_extra(b: u8) -> bool {
    matches!(
        b,
        b':' | b'@' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
    )
}
