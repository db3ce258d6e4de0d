//! Shared helpers for `html_prescan` integration tests.

use html_prescan::{EncodingAcceptor, EncodingRsAcceptor};

pub mod chunker;
pub mod fixtures;

/// Render raw bytes for assertion messages: printable ASCII as-is,
/// everything else as `\xNN`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7E => out.push(char::from(byte)),
            _ => {
                let _ = write!(&mut out, "\\x{byte:02X}");
            }
        }
    }
    out
}

/// Side-by-side listing of two label sequences, marking the first mismatch.
pub fn diff_labels(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;
    let missing = "<missing>";
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    let first = (0..max).find(|&i| expected.get(i) != actual.get(i));
    for i in 0..max {
        let left = expected.get(i).map(String::as_str).unwrap_or(missing);
        let right = actual.get(i).map(String::as_str).unwrap_or(missing);
        let marker = if Some(i) == first { ">" } else { " " };
        let _ = writeln!(&mut out, "{marker} {i:>3}  expected: {left:?}  actual: {right:?}");
    }
    let _ = writeln!(
        &mut out,
        "expected {} labels, actual {} labels",
        expected.len(),
        actual.len()
    );
    out
}

pub fn parse_u64(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(hex) = trimmed.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse::<u64>().ok()
    }
}

/// Read a numeric knob from the environment; decimal or `0x` hex.
pub fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => parse_u64(&raw)
            .unwrap_or_else(|| panic!("unsupported {key} value '{raw}'; use decimal or 0x hex")),
        Err(_) => default,
    }
}

#[derive(Debug)]
enum AcceptMode {
    RejectAll,
    AcceptAll,
    EncodingRs(EncodingRsAcceptor),
}

/// Acceptor that records every label it is offered.
#[derive(Debug)]
pub struct RecordingAcceptor {
    labels: Vec<String>,
    mode: AcceptMode,
}

impl RecordingAcceptor {
    /// Rejects everything, so a scan reports every candidate in the input.
    pub fn rejecting() -> Self {
        Self::with_mode(AcceptMode::RejectAll)
    }

    pub fn accepting() -> Self {
        Self::with_mode(AcceptMode::AcceptAll)
    }

    /// Accepts what `encoding_rs` accepts.
    pub fn encoding_rs() -> Self {
        Self::with_mode(AcceptMode::EncodingRs(EncodingRsAcceptor::new()))
    }

    fn with_mode(mode: AcceptMode) -> Self {
        Self {
            labels: Vec::new(),
            mode,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn calls(&self) -> usize {
        self.labels.len()
    }

    pub fn accepted_encoding(&self) -> Option<&'static html_prescan::encoding_rs::Encoding> {
        match &self.mode {
            AcceptMode::EncodingRs(inner) => inner.accepted(),
            AcceptMode::RejectAll | AcceptMode::AcceptAll => None,
        }
    }
}

impl EncodingAcceptor for RecordingAcceptor {
    fn try_charset(&mut self, label: &str) -> bool {
        self.labels.push(label.to_string());
        match &mut self.mode {
            AcceptMode::RejectAll => false,
            AcceptMode::AcceptAll => true,
            AcceptMode::EncodingRs(inner) => inner.try_charset(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_bytes_keeps_ascii_and_hexes_the_rest() {
        assert_eq!(escape_bytes(b"<meta \"a\">"), "<meta \\\"a\\\">");
        assert_eq!(escape_bytes(b"\xEF\xBB\xBF\n"), "\\xEF\\xBB\\xBF\\n");
    }

    #[test]
    fn parse_u64_accepts_hex_and_decimal() {
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64(" 0x2a "), Some(42));
        assert_eq!(parse_u64(""), None);
        assert_eq!(parse_u64("x"), None);
    }

    #[test]
    fn recording_acceptor_modes() {
        let mut rejecting = RecordingAcceptor::rejecting();
        assert!(!rejecting.try_charset("utf-8"));
        let mut accepting = RecordingAcceptor::accepting();
        assert!(accepting.try_charset("nonsense"));
        let mut real = RecordingAcceptor::encoding_rs();
        assert!(!real.try_charset("nonsense"));
        assert!(real.try_charset("latin2"));
        assert_eq!(real.calls(), 2);
        assert_eq!(real.accepted_encoding().map(|e| e.name()), Some("ISO-8859-2"));
    }

    #[test]
    fn diff_marks_first_mismatch() {
        let expected = vec!["a".to_string(), "b".to_string()];
        let actual = vec!["a".to_string()];
        let diff = diff_labels(&expected, &actual);
        assert!(diff.contains(">   1  expected: \"b\"  actual: \"<missing>\""), "{diff}");
    }
}
