//! Charset extraction from `content` attribute values.

use memchr::memchr2;

/// Turns a raw `content` attribute value into a charset label.
pub trait CharsetResolver {
    fn extract_from_content<'v>(&self, value: &'v str) -> Option<&'v str>;
}

/// Extracts `charset=...` from a content-type style value such as
/// `text/html; charset=ISO-8859-1`.
///
/// Grammar:
/// - find `charset` (ASCII case-insensitive); if the next non-whitespace byte
///   is not `=`, keep searching after it
/// - after `=` and optional whitespace, a quoted value runs to the matching
///   quote (an unterminated quote yields nothing)
/// - an unquoted value runs to the first whitespace or `;`
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentTypeResolver;

impl CharsetResolver for ContentTypeResolver {
    fn extract_from_content<'v>(&self, value: &'v str) -> Option<&'v str> {
        extract_charset_from_content(value)
    }
}

pub fn extract_charset_from_content(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    let mut pos = 0usize;
    loop {
        let found = find_ignore_ascii_case(&bytes[pos..], b"charset")?;
        pos += found + b"charset".len();
        pos = skip_whitespace(bytes, pos);
        if bytes.get(pos) != Some(&b'=') {
            continue;
        }
        pos = skip_whitespace(bytes, pos + 1);
        return match *bytes.get(pos)? {
            quote @ (b'"' | b'\'') => {
                let start = pos + 1;
                let len = bytes[start..].iter().position(|&b| b == quote)?;
                Some(&value[start..start + len])
            }
            _ => {
                let end = bytes[pos..]
                    .iter()
                    .position(|&b| is_whitespace(b) || b == b';')
                    .map_or(bytes.len(), |len| pos + len);
                Some(&value[pos..end])
            }
        };
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|&b| is_whitespace(b)) {
        pos += 1;
    }
    pos
}

/// Offset of the first ASCII case-insensitive occurrence of `needle`.
///
/// `needle` must be lowercase ASCII.
fn find_ignore_ascii_case(hay: &[u8], needle: &[u8]) -> Option<usize> {
    let n = needle.len();
    let first = *needle.first()?;
    let upper = first.to_ascii_uppercase();
    let mut i = 0;
    while i + n <= hay.len() {
        let pos = i + memchr2(first, upper, &hay[i..])?;
        if pos + n <= hay.len() && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return Some(pos);
        }
        i = pos + 1;
    }
    None
}
