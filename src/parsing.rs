//! Query-string helpers for the HTTP endpoints.
//!
//! Minimal, allocation-free parsing of `key=value&key=value` query strings.
//! Both HTTP front ends (axum and the ESP-IDF server) hand the raw query to
//! these helpers so parameter handling is identical on every platform.
//!
//! # Example
//!
//! ```
//! use rs_irrigation::parsing::{query_param, to_int};
//!
//! let query = "action=increase&value=55";
//! assert_eq!(query_param(query, "action").as_deref(), Some("increase"));
//! assert_eq!(to_int("55"), 55);
//! assert_eq!(to_int("abc"), 0);
//! ```

use heapless::String as HString;

/// Longest decoded parameter value kept; the rest is dropped.
pub const MAX_PARAM_LEN: usize = 32;

/// A decoded query parameter value.
pub type ParamValue = HString<MAX_PARAM_LEN>;

/// Finds `key` in a raw query string and returns its decoded value.
///
/// The first occurrence wins. A key with no `=` yields an empty value.
/// A leading `?` is ignored.
pub fn query_param(query: &str, key: &str) -> Option<ParamValue> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            if decode(k).as_str() == key {
                Some(decode(v))
            } else {
                None
            }
        })
}

/// Decodes `+` and `%XX` escapes. Malformed escapes are kept literally.
///
/// # Examples
///
/// ```
/// use rs_irrigation::parsing::decode;
///
/// assert_eq!(decode("%2D5").as_str(), "-5");
/// assert_eq!(decode("a+b").as_str(), "a b");
/// assert_eq!(decode("100%").as_str(), "100%");
/// ```
pub fn decode(raw: &str) -> ParamValue {
    let mut out = ParamValue::new();
    let bytes = raw.as_bytes();
    let mut buf = [0u8; MAX_PARAM_LEN];
    let mut len = 0;
    let mut i = 0;

    while i < bytes.len() && len < MAX_PARAM_LEN {
        let b = match bytes[i] {
            b'+' => b' ',
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        i += 2;
                        (hi << 4) | lo
                    }
                    _ => b'%',
                }
            }
            other => other,
        };
        buf[len] = b;
        len += 1;
        i += 1;
    }

    // Escapes can produce invalid UTF-8; keep the longest valid prefix
    let text = match core::str::from_utf8(&buf[..len]) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&buf[..e.valid_up_to()]).unwrap_or(""),
    };
    let _ = out.push_str(text);
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Lenient integer conversion, as Arduino's `String::toInt`.
///
/// Skips leading whitespace, accepts one optional sign, then reads decimal
/// digits up to the first non-digit. Anything else yields 0. Values beyond
/// the `i32` range saturate.
///
/// # Examples
///
/// ```
/// use rs_irrigation::parsing::to_int;
///
/// assert_eq!(to_int("42"), 42);
/// assert_eq!(to_int("  -7"), -7);
/// assert_eq!(to_int("12abc"), 12);
/// assert_eq!(to_int("abc"), 0);
/// assert_eq!(to_int("99999999999"), i32::MAX);
/// ```
pub fn to_int(text: &str) -> i32 {
    let rest = text.trim_start();
    let (negative, digits) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value * 10 + i64::from(b - b'0');
        // Past i32 range either way; stop before i64 could overflow
        if value > i64::from(i32::MAX) + 1 {
            break;
        }
    }

    let signed = if negative { -value } else { value };
    // clamp makes the cast lossless
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
