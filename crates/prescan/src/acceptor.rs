//! Deciding whether a declared charset label is usable.

use encoding_rs::{Encoding, REPLACEMENT, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252, X_USER_DEFINED};

/// Receives candidate labels from the scanner.
///
/// Returning `true` means the caller has already committed to the encoding;
/// the scanner stops and never re-delivers the label. `false` keeps scanning.
pub trait EncodingAcceptor {
    fn try_charset(&mut self, label: &str) -> bool;
}

impl<F> EncodingAcceptor for F
where
    F: FnMut(&str) -> bool,
{
    fn try_charset(&mut self, label: &str) -> bool {
        self(label)
    }
}

/// Apply the substitutions a `<meta>` declaration is subject to.
///
/// A document that could declare itself as UTF-16 in ASCII bytes is not
/// UTF-16, so those labels mean UTF-8; `x-user-defined` means windows-1252.
pub fn normalize_declared_encoding(encoding: &'static Encoding) -> &'static Encoding {
    if encoding == UTF_16BE || encoding == UTF_16LE {
        UTF_8
    } else if encoding == X_USER_DEFINED {
        WINDOWS_1252
    } else {
        encoding
    }
}

/// Acceptor resolving labels through `encoding_rs`.
///
/// Unknown labels and labels mapping to the `replacement` encoding are
/// rejected so scanning continues with the next declaration.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodingRsAcceptor {
    accepted: Option<&'static Encoding>,
}

impl EncodingRsAcceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepted(&self) -> Option<&'static Encoding> {
        self.accepted
    }
}

impl EncodingAcceptor for EncodingRsAcceptor {
    fn try_charset(&mut self, label: &str) -> bool {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            log::debug!(target: "html_prescan", "rejecting unknown charset label {label:?}");
            return false;
        };
        if encoding == REPLACEMENT {
            log::debug!(target: "html_prescan", "rejecting label {label:?}: maps to replacement");
            return false;
        }
        let encoding = normalize_declared_encoding(encoding);
        log::debug!(target: "html_prescan", "accepting label {label:?} as {}", encoding.name());
        self.accepted = Some(encoding);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, WINDOWS_1251};

    fn accept(label: &str) -> Option<&'static Encoding> {
        let mut acceptor = EncodingRsAcceptor::new();
        if acceptor.try_charset(label) {
            acceptor.accepted()
        } else {
            assert!(acceptor.accepted().is_none());
            None
        }
    }

    #[test]
    fn resolves_aliases_and_trims_whitespace() {
        assert_eq!(accept("utf8"), Some(UTF_8));
        assert_eq!(accept(" Shift_JIS "), Some(SHIFT_JIS));
        assert_eq!(accept("cp1251"), Some(WINDOWS_1251));
        assert_eq!(accept("latin1"), Some(WINDOWS_1252));
    }

    #[test]
    fn applies_meta_substitutions() {
        assert_eq!(accept("utf-16"), Some(UTF_8));
        assert_eq!(accept("UTF-16BE"), Some(UTF_8));
        assert_eq!(accept("x-user-defined"), Some(WINDOWS_1252));
    }

    #[test]
    fn rejects_unknown_and_replacement_labels() {
        assert_eq!(accept("no-such-charset"), None);
        assert_eq!(accept(""), None);
        assert_eq!(accept("iso-2022-kr"), None);
    }

    #[test]
    fn closures_are_acceptors() {
        let mut calls = 0;
        let mut acceptor = |label: &str| {
            calls += 1;
            label == "ok"
        };
        assert!(!acceptor.try_charset("nope"));
        assert!(acceptor.try_charset("ok"));
        assert_eq!(calls, 2);
    }
}
