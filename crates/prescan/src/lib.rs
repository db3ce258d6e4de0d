//! Byte-level `<meta>` charset prescan.
//!
//! Finds an encoding declaration in raw document bytes before any decoding
//! happens. The core is [`MetaScanner`]; [`EncodingSniffer`] wraps it with
//! BOM detection, a sniffing limit and a fallback for streamed input.

pub mod acceptor;
pub mod content;
pub mod perf_fixtures;
pub mod scanner;
pub mod sniffer;
pub mod source;

mod buffer;
mod error;
mod matcher;

use std::io::BufRead;

pub use encoding_rs;

pub use crate::acceptor::{EncodingAcceptor, EncodingRsAcceptor, normalize_declared_encoding};
pub use crate::content::{CharsetResolver, ContentTypeResolver};
pub use crate::error::PrescanError;
pub use crate::matcher::{AttributeNameMatch, NameProgress, TagNameMatch};
pub use crate::scanner::{MetaScanner, ScanOutcome, ScanState, ScanStats, ScannerConfig};
pub use crate::sniffer::{CharsetSource, EncodingSniffer, SniffResult, Sniffed, SnifferConfig};
pub use crate::source::{ByteSource, ReadSource, Skipped, SliceSource};

/// Run a one-shot prescan over an in-memory document.
pub fn prescan<A>(bytes: &[u8], acceptor: &mut A) -> ScanOutcome
where
    A: EncodingAcceptor + ?Sized,
{
    let mut scanner = MetaScanner::new(ScannerConfig::default());
    scanner.scan(&mut SliceSource::new(bytes), acceptor)
}

/// Run a one-shot prescan over a buffered reader.
///
/// A read error ends the scan and is returned in place of the outcome.
pub fn prescan_reader<R, A>(reader: R, acceptor: &mut A) -> Result<ScanOutcome, PrescanError>
where
    R: BufRead,
    A: EncodingAcceptor + ?Sized,
{
    let mut source = ReadSource::new(reader);
    let mut scanner = MetaScanner::new(ScannerConfig::default());
    let outcome = scanner.scan(&mut source, acceptor);
    if let Some(err) = source.take_error() {
        return Err(PrescanError::Io(err));
    }
    Ok(outcome)
}

/// Sniff the encoding of a complete in-memory document.
pub fn sniff_encoding(bytes: &[u8]) -> Sniffed {
    let mut sniffer = EncodingSniffer::new(SnifferConfig::default());
    match sniffer.push_bytes(bytes) {
        SniffResult::Done(sniffed) => sniffed,
        SniffResult::NeedMoreInput => sniffer.finish(),
    }
}
