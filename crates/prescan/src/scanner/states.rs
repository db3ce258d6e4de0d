//! Prescan state machine definitions.

/// Automaton states. Exactly one is active; the last one is retained when a
/// scan returns so the next `scan` call continues from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanState {
    #[default]
    Data,
    TagOpen,
    ScanUntilGt,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    MarkupDeclarationOpen,
    MarkupDeclarationHyphen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentEndDash,
    CommentEnd,
    SelfClosingStartTag,
}

impl ScanState {
    /// The single byte this state is waiting for, if every other byte is a
    /// self-loop. Lets the driver skip ahead through the source.
    pub(super) fn skip_target(self) -> Option<u8> {
        match self {
            ScanState::Data => Some(b'<'),
            ScanState::ScanUntilGt => Some(b'>'),
            ScanState::Comment => Some(b'-'),
            _ => None,
        }
    }
}
