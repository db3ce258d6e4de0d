//! Streaming encoding sniffer: BOM, then `<meta>` prescan, then fallback.
//!
//! Input arrives in arbitrary chunks. The sniffer holds back at most two
//! bytes while a byte order mark is still possible, replays them into the
//! scanner once it is ruled out, and gives up on the prescan after
//! `sniff_limit` bytes.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};

use crate::acceptor::EncodingRsAcceptor;
use crate::scanner::{MetaScanner, ScanOutcome, ScanStats, ScannerConfig};
use crate::source::SliceSource;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16BE_BOM: &[u8] = b"\xFE\xFF";

#[derive(Clone, Debug)]
pub struct SnifferConfig {
    /// Bytes examined by the `<meta>` prescan before falling back.
    pub sniff_limit: usize,
    /// Encoding used when neither a BOM nor a declaration is found.
    pub fallback: &'static Encoding,
    pub scanner: ScannerConfig,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            sniff_limit: 1024,
            fallback: WINDOWS_1252,
            scanner: ScannerConfig::default(),
        }
    }
}

/// Where the sniffed encoding came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharsetSource {
    ByteOrderMark,
    MetaPrescan,
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sniffed {
    pub encoding: &'static Encoding,
    pub source: CharsetSource,
    /// Length of the byte order mark the decoder should skip; 0 without one.
    pub bom_len: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SniffResult {
    NeedMoreInput,
    Done(Sniffed),
}

#[derive(Debug)]
pub struct EncodingSniffer {
    config: SnifferConfig,
    scanner: MetaScanner,
    acceptor: EncodingRsAcceptor,
    /// Leading bytes held while they are still a proper BOM prefix.
    held: Vec<u8>,
    bom_ruled_out: bool,
    fed: usize,
    outcome: Option<Sniffed>,
}

impl EncodingSniffer {
    pub fn new(config: SnifferConfig) -> Self {
        let scanner = MetaScanner::new(config.scanner.clone());
        Self {
            config,
            scanner,
            acceptor: EncodingRsAcceptor::new(),
            held: Vec::with_capacity(UTF8_BOM.len()),
            bom_ruled_out: false,
            fed: 0,
            outcome: None,
        }
    }

    /// Feed the next chunk. Once `Done` is returned, later calls return the
    /// same result and ignore their input.
    pub fn push_bytes(&mut self, mut chunk: &[u8]) -> SniffResult {
        if let Some(sniffed) = self.outcome {
            return SniffResult::Done(sniffed);
        }
        if !self.bom_ruled_out {
            while !chunk.is_empty() && could_be_bom(&self.held) {
                self.held.push(chunk[0]);
                chunk = &chunk[1..];
            }
            if let Some(sniffed) = self.match_bom() {
                return self.conclude(sniffed);
            }
            if could_be_bom(&self.held) {
                return SniffResult::NeedMoreInput;
            }
            if let Some(result) = self.replay_held() {
                return result;
            }
        }
        self.feed(chunk)
    }

    /// Signal end of input and settle on an encoding.
    pub fn finish(&mut self) -> Sniffed {
        if let Some(sniffed) = self.outcome {
            return sniffed;
        }
        if !self.bom_ruled_out {
            if let Some(sniffed) = self.match_bom() {
                self.conclude(sniffed);
                return sniffed;
            }
            if let Some(SniffResult::Done(sniffed)) = self.replay_held() {
                return sniffed;
            }
        }
        let sniffed = self.fallback();
        self.conclude(sniffed);
        sniffed
    }

    /// The settled result, if any.
    pub fn result(&self) -> Option<Sniffed> {
        self.outcome
    }

    /// Bytes handed to the `<meta>` prescan so far.
    pub fn bytes_examined(&self) -> usize {
        self.fed
    }

    pub fn scan_stats(&self) -> ScanStats {
        self.scanner.stats()
    }

    fn match_bom(&self) -> Option<Sniffed> {
        let encoding = if self.held.starts_with(UTF8_BOM) {
            UTF_8
        } else if self.held.starts_with(UTF16LE_BOM) {
            UTF_16LE
        } else if self.held.starts_with(UTF16BE_BOM) {
            UTF_16BE
        } else {
            return None;
        };
        let bom_len = if encoding == UTF_8 { 3 } else { 2 };
        Some(Sniffed {
            encoding,
            source: CharsetSource::ByteOrderMark,
            bom_len,
        })
    }

    fn replay_held(&mut self) -> Option<SniffResult> {
        self.bom_ruled_out = true;
        let held = std::mem::take(&mut self.held);
        match self.feed(&held) {
            SniffResult::NeedMoreInput => None,
            done => Some(done),
        }
    }

    fn feed(&mut self, chunk: &[u8]) -> SniffResult {
        let room = self.config.sniff_limit.saturating_sub(self.fed);
        let chunk = &chunk[..chunk.len().min(room)];
        let mut source = SliceSource::new(chunk);
        let outcome = self.scanner.scan(&mut source, &mut self.acceptor);
        self.fed += source.position();
        if outcome == ScanOutcome::Accepted {
            if let Some(encoding) = self.acceptor.accepted() {
                return self.conclude(Sniffed {
                    encoding,
                    source: CharsetSource::MetaPrescan,
                    bom_len: 0,
                });
            }
        }
        if self.fed >= self.config.sniff_limit {
            log::debug!(
                target: "html_prescan",
                "no declaration within {} bytes",
                self.config.sniff_limit
            );
            let sniffed = self.fallback();
            return self.conclude(sniffed);
        }
        SniffResult::NeedMoreInput
    }

    fn fallback(&self) -> Sniffed {
        Sniffed {
            encoding: self.config.fallback,
            source: CharsetSource::Default,
            bom_len: 0,
        }
    }

    fn conclude(&mut self, sniffed: Sniffed) -> SniffResult {
        log::debug!(
            target: "html_prescan",
            "sniffed {} from {:?} after {} bytes",
            sniffed.encoding.name(),
            sniffed.source,
            self.fed
        );
        self.outcome = Some(sniffed);
        SniffResult::Done(sniffed)
    }
}

/// `held` is a proper prefix of some byte order mark.
fn could_be_bom(held: &[u8]) -> bool {
    [UTF8_BOM, UTF16LE_BOM, UTF16BE_BOM]
        .iter()
        .any(|bom| held.len() < bom.len() && bom.starts_with(held))
}
