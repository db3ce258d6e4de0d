//! Allocation-free partial matching of the three literals the prescan cares
//! about: the tag name `meta` and the attribute names `content`/`charset`.

const CONTENT: &[u8; 7] = b"content";
const CHARSET: &[u8; 7] = b"charset";

/// Progress toward the tag name `meta`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagNameMatch {
    #[default]
    None,
    M,
    Me,
    Met,
    Meta,
}

impl TagNameMatch {
    /// Advance by one tag-name byte. Any unexpected byte drops back to `None`.
    pub fn advance(self, byte: u8) -> Self {
        match (self, byte.to_ascii_lowercase()) {
            (Self::M, b'e') => Self::Me,
            (Self::Me, b't') => Self::Met,
            (Self::Met, b'a') => Self::Meta,
            _ => Self::None,
        }
    }

    pub fn is_meta(self) -> bool {
        self == Self::Meta
    }
}

/// Progress of one attribute-name counter.
///
/// `At(i)` means the first `i + 1` bytes of the literal matched; the leading
/// `c` is matched by the state machine before counting starts, so `At(0)` is
/// the starting point and `At(6)` is armed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameProgress {
    #[default]
    NotACandidate,
    At(u8),
}

impl NameProgress {
    pub const ARMED: Self = Self::At(6);

    fn advance(self, literal: &[u8; 7], byte: u8) -> Self {
        match self {
            Self::At(idx) if idx < 6 => {
                let next = usize::from(idx) + 1;
                if byte.to_ascii_lowercase() == literal[next] {
                    Self::At(idx + 1)
                } else {
                    Self::NotACandidate
                }
            }
            // Armed counters see a name byte past the literal's end.
            _ => Self::NotACandidate,
        }
    }

    pub fn is_armed(self) -> bool {
        self == Self::ARMED
    }
}

/// Both attribute-name counters for the attribute currently being scanned.
///
/// The name is not known to be `content` or `charset` until enough bytes have
/// been seen, so both advance independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttributeNameMatch {
    pub content: NameProgress,
    pub charset: NameProgress,
}

impl AttributeNameMatch {
    /// Start counting after a leading `c`/`C`.
    pub fn start(&mut self) {
        self.content = NameProgress::At(0);
        self.charset = NameProgress::At(0);
    }

    pub fn clear(&mut self) {
        self.content = NameProgress::NotACandidate;
        self.charset = NameProgress::NotACandidate;
    }

    pub fn advance(&mut self, byte: u8) {
        self.content = self.content.advance(CONTENT, byte);
        self.charset = self.charset.advance(CHARSET, byte);
    }

    /// Whether the attribute value is worth buffering.
    pub fn is_armed(&self) -> bool {
        self.content.is_armed() || self.charset.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_tag(name: &[u8]) -> TagNameMatch {
        let mut state = match name.first() {
            Some(b'm' | b'M') => TagNameMatch::M,
            _ => TagNameMatch::None,
        };
        for &byte in &name[1..] {
            state = state.advance(byte);
        }
        state
    }

    fn match_attr(name: &[u8]) -> AttributeNameMatch {
        let mut attr = AttributeNameMatch::default();
        if matches!(name.first(), Some(b'c' | b'C')) {
            attr.start();
        }
        for &byte in &name[1..] {
            attr.advance(byte);
        }
        attr
    }

    #[test]
    fn tag_name_matches_meta_case_insensitively() {
        assert!(match_tag(b"meta").is_meta());
        assert!(match_tag(b"MeTa").is_meta());
        assert_eq!(match_tag(b"met"), TagNameMatch::Met);
    }

    #[test]
    fn tag_name_rejects_near_misses() {
        assert_eq!(match_tag(b"metal"), TagNameMatch::None);
        assert_eq!(match_tag(b"metaa"), TagNameMatch::None);
        assert_eq!(match_tag(b"mmeta"), TagNameMatch::None);
        assert_eq!(match_tag(b"beta"), TagNameMatch::None);
    }

    #[test]
    fn attribute_counters_arm_on_full_names() {
        let attr = match_attr(b"charset");
        assert!(attr.charset.is_armed());
        assert_eq!(attr.content, NameProgress::NotACandidate);

        let attr = match_attr(b"CoNtEnT");
        assert!(attr.content.is_armed());
        assert_eq!(attr.charset, NameProgress::NotACandidate);
    }

    #[test]
    fn attribute_counters_share_the_leading_c() {
        let attr = match_attr(b"c");
        assert_eq!(attr.content, NameProgress::At(0));
        assert_eq!(attr.charset, NameProgress::At(0));
        let attr = match_attr(b"cha");
        assert_eq!(attr.charset, NameProgress::At(2));
        assert_eq!(attr.content, NameProgress::NotACandidate);
    }

    #[test]
    fn mismatch_is_sticky() {
        // A skipped byte must not let the rest of the literal line up again.
        assert!(!match_attr(b"cxontent").is_armed());
        assert!(!match_attr(b"chhharset").is_armed());
    }

    #[test]
    fn armed_counter_disarms_on_trailing_name_bytes() {
        assert!(!match_attr(b"charsets").is_armed());
        assert!(!match_attr(b"content-type").is_armed());
    }

    #[test]
    fn non_letters_never_match() {
        // 0x03 lowercases to itself; '@' and '`' sit next to letters in ASCII.
        assert!(!match_attr(b"c\x03arset").is_armed());
        assert!(!match_attr(b"ch@rset").is_armed());
        assert_eq!(match_tag(b"m`ta"), TagNameMatch::None);
    }
}
