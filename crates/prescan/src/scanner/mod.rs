//! `<meta>` charset prescan state machine.
//!
//! The scanner consumes raw bytes and only recognizes enough markup to find
//! `charset` and `content` attributes on `meta` tags. Everything else
//! (other tags, comments, processing instructions, end tags) is skipped.
//!
//! Invariants:
//! - Every byte has a transition in every state; malformed markup never
//!   errors, the worst case is scanning to end of stream.
//! - Resumable: calling `scan` again continues from the retained state, so
//!   feeding a document in chunks yields the same candidates as feeding it
//!   whole.
//! - Reconsumed bytes are held by the driver loop; sources are forward-only.
//! - Value bytes are buffered only for armed attributes on a `meta` tag.

use crate::acceptor::EncodingAcceptor;
use crate::buffer::AccumulationBuffer;
use crate::content::{CharsetResolver, ContentTypeResolver};
use crate::matcher::{AttributeNameMatch, TagNameMatch};
use crate::source::ByteSource;

mod states;

pub use states::ScanState;

/// Configuration for the scanner.
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// Initial capacity of the attribute value buffer.
    pub initial_buffer_capacity: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            initial_buffer_capacity: 36,
        }
    }
}

/// How a `scan` call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The acceptor took a candidate; scanning stopped right after it.
    Accepted,
    /// The source ran dry without an accepted candidate.
    Exhausted,
}

impl ScanOutcome {
    pub fn found(self) -> bool {
        self == ScanOutcome::Accepted
    }
}

/// Scanner instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub bytes_consumed: u64,
    pub state_transitions: u64,
    pub candidates_tried: u64,
    pub buffer_growths: u64,
}

/// Byte-level `<meta>` charset scanner.
#[derive(Debug)]
pub struct MetaScanner<R = ContentTypeResolver> {
    config: ScannerConfig,
    resolver: R,
    state: ScanState,
    tag: TagNameMatch,
    attr: AttributeNameMatch,
    buffer: AccumulationBuffer,
    stats: ScanStats,
}

impl MetaScanner<ContentTypeResolver> {
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_resolver(config, ContentTypeResolver)
    }

    /// Start a fresh session from a previously retained state.
    ///
    /// Matcher progress and buffered bytes are not carried over; only the
    /// automaton position is.
    pub fn with_state(config: ScannerConfig, state: ScanState) -> Self {
        let mut scanner = Self::new(config);
        scanner.state = state;
        scanner
    }
}

impl<R: CharsetResolver> MetaScanner<R> {
    pub fn with_resolver(config: ScannerConfig, resolver: R) -> Self {
        let buffer = AccumulationBuffer::with_capacity(config.initial_buffer_capacity);
        Self {
            config,
            resolver,
            state: ScanState::Data,
            tag: TagNameMatch::None,
            attr: AttributeNameMatch::default(),
            buffer,
            stats: ScanStats::default(),
        }
    }

    /// Current (or, after `scan` returned, last active) state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Return to the initial state for a new document. Keeps the buffer's
    /// allocation.
    pub fn reset(&mut self) {
        self.state = ScanState::Data;
        self.tag = TagNameMatch::None;
        self.attr.clear();
        self.buffer.clear();
        self.stats = ScanStats::default();
    }

    /// Consume bytes until the acceptor takes a candidate or the source ends.
    pub fn scan<S, A>(&mut self, source: &mut S, acceptor: &mut A) -> ScanOutcome
    where
        S: ByteSource + ?Sized,
        A: EncodingAcceptor + ?Sized,
    {
        let mut input = Input::Fresh;
        loop {
            let byte = match input {
                Input::Reconsume(byte) => byte,
                Input::Fresh => match self.next_input(source) {
                    Some(byte) => byte,
                    None => return ScanOutcome::Exhausted,
                },
            };
            input = match self.step(byte, acceptor) {
                Flow::Consumed => Input::Fresh,
                Flow::Reconsume => Input::Reconsume(byte),
                Flow::Accepted => return ScanOutcome::Accepted,
            };
        }
    }

    fn next_input<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<u8> {
        if let Some(needle) = self.state.skip_target() {
            let skipped = source.skip_past(needle);
            self.stats.bytes_consumed = self
                .stats
                .bytes_consumed
                .saturating_add(skipped.consumed as u64);
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(
                target: "html_prescan",
                "skip in {:?}: consumed={} found={}",
                self.state,
                skipped.consumed,
                skipped.found
            );
            return skipped.found.then_some(needle);
        }
        let byte = source.next_byte()?;
        self.stats.bytes_consumed = self.stats.bytes_consumed.saturating_add(1);
        Some(byte)
    }

    fn transition_to(&mut self, next: ScanState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html_prescan",
            "state {:?} -> {:?} @{}",
            self.state,
            next,
            self.stats.bytes_consumed
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    fn reconsume_in(&mut self, next: ScanState) -> Flow {
        self.transition_to(next);
        Flow::Reconsume
    }

    fn consume_into(&mut self, next: ScanState) -> Flow {
        self.transition_to(next);
        Flow::Consumed
    }

    fn step<A: EncodingAcceptor + ?Sized>(&mut self, byte: u8, acceptor: &mut A) -> Flow {
        match self.state {
            ScanState::Data => self.step_data(byte),
            ScanState::TagOpen => self.step_tag_open(byte),
            ScanState::TagName => self.step_tag_name(byte),
            ScanState::BeforeAttributeName => self.step_before_attribute_name(byte),
            ScanState::AttributeName => self.step_attribute_name(byte, acceptor),
            ScanState::AfterAttributeName => self.step_after_attribute_name(byte, acceptor),
            ScanState::BeforeAttributeValue => self.step_before_attribute_value(byte),
            ScanState::AttributeValueDoubleQuoted => self.step_quoted_value(byte, b'"', acceptor),
            ScanState::AttributeValueSingleQuoted => self.step_quoted_value(byte, b'\'', acceptor),
            ScanState::AttributeValueUnquoted => self.step_unquoted_value(byte, acceptor),
            ScanState::AfterAttributeValueQuoted => self.step_after_attribute_value_quoted(byte),
            ScanState::SelfClosingStartTag => self.step_self_closing_start_tag(byte),
            ScanState::MarkupDeclarationOpen => {
                self.step_markup_declaration(byte, ScanState::MarkupDeclarationHyphen)
            }
            ScanState::MarkupDeclarationHyphen => {
                self.step_markup_declaration(byte, ScanState::CommentStart)
            }
            ScanState::CommentStart | ScanState::CommentStartDash => self.step_comment_start(byte),
            ScanState::Comment => self.step_comment(byte),
            ScanState::CommentEndDash => self.step_comment_end_dash(byte),
            ScanState::CommentEnd => self.step_comment_end(byte),
            ScanState::ScanUntilGt => self.step_scan_until_gt(byte),
        }
    }

    fn step_data(&mut self, byte: u8) -> Flow {
        if byte == b'<' {
            return self.consume_into(ScanState::TagOpen);
        }
        Flow::Consumed
    }

    fn step_tag_open(&mut self, byte: u8) -> Flow {
        match byte {
            b'm' | b'M' => {
                self.tag = TagNameMatch::M;
                self.consume_into(ScanState::TagName)
            }
            b'!' => self.consume_into(ScanState::MarkupDeclarationOpen),
            b'?' | b'/' => self.consume_into(ScanState::ScanUntilGt),
            b'>' => self.consume_into(ScanState::Data),
            b if b.is_ascii_alphabetic() => {
                self.tag = TagNameMatch::None;
                self.consume_into(ScanState::TagName)
            }
            _ => self.reconsume_in(ScanState::Data),
        }
    }

    fn step_tag_name(&mut self, byte: u8) -> Flow {
        match byte {
            b if is_whitespace(b) => self.consume_into(ScanState::BeforeAttributeName),
            b'/' => self.consume_into(ScanState::SelfClosingStartTag),
            b'>' => self.consume_into(ScanState::Data),
            b => {
                self.tag = self.tag.advance(b);
                Flow::Consumed
            }
        }
    }

    fn step_before_attribute_name(&mut self, byte: u8) -> Flow {
        match byte {
            b if is_whitespace(b) => Flow::Consumed,
            b'/' => self.consume_into(ScanState::SelfClosingStartTag),
            b'>' => self.consume_into(ScanState::Data),
            b => self.begin_attribute_name(b),
        }
    }

    fn begin_attribute_name(&mut self, byte: u8) -> Flow {
        if matches!(byte, b'c' | b'C') {
            self.attr.start();
        } else {
            self.attr.clear();
        }
        // Value-less attributes resolve against whatever is buffered; keep
        // that empty rather than a previous attribute's value.
        self.buffer.clear();
        self.consume_into(ScanState::AttributeName)
    }

    fn step_attribute_name<A: EncodingAcceptor + ?Sized>(
        &mut self,
        byte: u8,
        acceptor: &mut A,
    ) -> Flow {
        match byte {
            b if is_whitespace(b) => self.consume_into(ScanState::AfterAttributeName),
            b'=' => {
                self.buffer.clear();
                self.consume_into(ScanState::BeforeAttributeValue)
            }
            b'/' => self.resolve_then(acceptor, ScanState::SelfClosingStartTag),
            b'>' => self.resolve_then(acceptor, ScanState::Data),
            b => {
                if self.tag.is_meta() {
                    self.attr.advance(b);
                }
                Flow::Consumed
            }
        }
    }

    fn step_after_attribute_name<A: EncodingAcceptor + ?Sized>(
        &mut self,
        byte: u8,
        acceptor: &mut A,
    ) -> Flow {
        match byte {
            b if is_whitespace(b) => Flow::Consumed,
            b'=' => {
                self.buffer.clear();
                self.consume_into(ScanState::BeforeAttributeValue)
            }
            b'/' => self.resolve_then(acceptor, ScanState::SelfClosingStartTag),
            b'>' => self.resolve_then(acceptor, ScanState::Data),
            b => self.begin_attribute_name(b),
        }
    }

    fn step_before_attribute_value(&mut self, byte: u8) -> Flow {
        match byte {
            b if is_whitespace(b) => Flow::Consumed,
            b'"' => self.consume_into(ScanState::AttributeValueDoubleQuoted),
            b'\'' => self.consume_into(ScanState::AttributeValueSingleQuoted),
            b'>' => self.consume_into(ScanState::Data),
            b => {
                self.buffer_value_byte(b);
                self.consume_into(ScanState::AttributeValueUnquoted)
            }
        }
    }

    fn step_quoted_value<A: EncodingAcceptor + ?Sized>(
        &mut self,
        byte: u8,
        quote: u8,
        acceptor: &mut A,
    ) -> Flow {
        if byte == quote {
            return self.resolve_then(acceptor, ScanState::AfterAttributeValueQuoted);
        }
        self.buffer_value_byte(byte);
        Flow::Consumed
    }

    fn step_unquoted_value<A: EncodingAcceptor + ?Sized>(
        &mut self,
        byte: u8,
        acceptor: &mut A,
    ) -> Flow {
        match byte {
            b if is_whitespace(b) => self.resolve_then(acceptor, ScanState::BeforeAttributeName),
            b'>' => self.resolve_then(acceptor, ScanState::Data),
            b => {
                self.buffer_value_byte(b);
                Flow::Consumed
            }
        }
    }

    fn step_after_attribute_value_quoted(&mut self, byte: u8) -> Flow {
        match byte {
            b if is_whitespace(b) => self.consume_into(ScanState::BeforeAttributeName),
            b'/' => self.consume_into(ScanState::SelfClosingStartTag),
            b'>' => self.consume_into(ScanState::Data),
            _ => self.reconsume_in(ScanState::BeforeAttributeName),
        }
    }

    fn step_self_closing_start_tag(&mut self, byte: u8) -> Flow {
        match byte {
            b'>' => self.consume_into(ScanState::Data),
            _ => self.reconsume_in(ScanState::BeforeAttributeName),
        }
    }

    /// `<!` and `<!-`: anything but another `-` is a bogus declaration.
    fn step_markup_declaration(&mut self, byte: u8, on_hyphen: ScanState) -> Flow {
        match byte {
            b'-' => self.consume_into(on_hyphen),
            _ => self.reconsume_in(ScanState::ScanUntilGt),
        }
    }

    fn step_comment_start(&mut self, byte: u8) -> Flow {
        let on_hyphen = match self.state {
            ScanState::CommentStart => ScanState::CommentStartDash,
            _ => ScanState::CommentEnd,
        };
        match byte {
            b'-' => self.consume_into(on_hyphen),
            b'>' => self.consume_into(ScanState::Data),
            _ => self.consume_into(ScanState::Comment),
        }
    }

    fn step_comment(&mut self, byte: u8) -> Flow {
        if byte == b'-' {
            return self.consume_into(ScanState::CommentEndDash);
        }
        Flow::Consumed
    }

    fn step_comment_end_dash(&mut self, byte: u8) -> Flow {
        match byte {
            b'-' => self.consume_into(ScanState::CommentEnd),
            _ => self.consume_into(ScanState::Comment),
        }
    }

    fn step_comment_end(&mut self, byte: u8) -> Flow {
        match byte {
            b'>' => self.consume_into(ScanState::Data),
            b'-' => Flow::Consumed,
            _ => self.consume_into(ScanState::Comment),
        }
    }

    fn step_scan_until_gt(&mut self, byte: u8) -> Flow {
        if byte == b'>' {
            return self.consume_into(ScanState::Data);
        }
        Flow::Consumed
    }

    fn is_buffering(&self) -> bool {
        self.tag.is_meta() && self.attr.is_armed()
    }

    fn buffer_value_byte(&mut self, byte: u8) {
        if !self.is_buffering() {
            return;
        }
        if self.buffer.push(byte) {
            self.stats.buffer_growths = self.stats.buffer_growths.saturating_add(1);
        }
    }

    fn resolve_then<A: EncodingAcceptor + ?Sized>(
        &mut self,
        acceptor: &mut A,
        next: ScanState,
    ) -> Flow {
        if self.try_resolve(acceptor) {
            return Flow::Accepted;
        }
        self.consume_into(next)
    }

    /// Offer the buffered value to the acceptor if it belongs to an armed
    /// attribute on a `meta` tag. Counters are cleared either way.
    fn try_resolve<A: EncodingAcceptor + ?Sized>(&mut self, acceptor: &mut A) -> bool {
        if !self.is_buffering() {
            self.attr.clear();
            return false;
        }
        let value = self.buffer.to_label();
        let candidate = if self.attr.content.is_armed() {
            self.resolver.extract_from_content(&value)
        } else {
            Some(&*value)
        };
        let accepted = match candidate {
            Some(label) if !label.is_empty() => {
                self.stats.candidates_tried = self.stats.candidates_tried.saturating_add(1);
                let accepted = acceptor.try_charset(label);
                log::debug!(
                    target: "html_prescan",
                    "candidate {label:?} {}",
                    if accepted { "accepted" } else { "rejected" }
                );
                accepted
            }
            _ => false,
        };
        self.attr.clear();
        accepted
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

/// Next byte for the dispatcher: pull from the source or re-examine the last
/// one under the new state.
#[derive(Clone, Copy, Debug)]
enum Input {
    Fresh,
    Reconsume(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Consumed,
    Reconsume,
    Accepted,
}
