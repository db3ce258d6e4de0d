//! Forward-only byte sources feeding the scanner.

use std::io::{self, BufRead};

use memchr::memchr;

/// Result of [`ByteSource::skip_past`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skipped {
    /// Bytes consumed, including the needle when it was found.
    pub consumed: usize,
    pub found: bool,
}

/// Supplies document bytes one at a time.
///
/// Sources never push back; the scanner handles reconsumption itself.
pub trait ByteSource {
    /// Next byte, or `None` at end of stream.
    fn next_byte(&mut self) -> Option<u8>;

    /// Consume bytes up to and including the next `needle`.
    ///
    /// Must be observably equivalent to calling `next_byte` until it returns
    /// `needle` or `None`.
    fn skip_past(&mut self, needle: u8) -> Skipped {
        let mut consumed = 0usize;
        while let Some(byte) = self.next_byte() {
            consumed += 1;
            if byte == needle {
                return Skipped {
                    consumed,
                    found: true,
                };
            }
        }
        Skipped {
            consumed,
            found: false,
        }
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }

    fn skip_past(&mut self, needle: u8) -> Skipped {
        (**self).skip_past(needle)
    }
}

/// In-memory source over a byte slice.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_past(&mut self, needle: u8) -> Skipped {
        let rest = &self.bytes[self.pos..];
        match memchr(needle, rest) {
            Some(idx) => {
                self.pos += idx + 1;
                Skipped {
                    consumed: idx + 1,
                    found: true,
                }
            }
            None => {
                self.pos = self.bytes.len();
                Skipped {
                    consumed: rest.len(),
                    found: false,
                }
            }
        }
    }
}

/// Source over any buffered reader.
///
/// The first I/O error ends the stream from the scanner's point of view; it
/// is kept for the caller to inspect with [`ReadSource::take_error`].
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
    error: Option<io::Error>,
}

impl<R: BufRead> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> ByteSource for ReadSource<R> {
    fn next_byte(&mut self) -> Option<u8> {
        if self.error.is_some() {
            return None;
        }
        loop {
            let next = match self.reader.fill_buf() {
                Ok(buf) => Ok(buf.first().copied()),
                Err(err) => Err(err),
            };
            match next {
                Ok(Some(byte)) => {
                    self.reader.consume(1);
                    return Some(byte);
                }
                Ok(None) => return None,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.error = Some(err);
                    return None;
                }
            }
        }
    }

    fn skip_past(&mut self, needle: u8) -> Skipped {
        let mut consumed = 0usize;
        if self.error.is_some() {
            return Skipped {
                consumed,
                found: false,
            };
        }
        loop {
            let step = match self.reader.fill_buf() {
                Ok([]) => None,
                Ok(buf) => Some(match memchr(needle, buf) {
                    Some(idx) => (idx + 1, true),
                    None => (buf.len(), false),
                }),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.error = Some(err);
                    None
                }
            };
            let Some((len, found)) = step else {
                return Skipped {
                    consumed,
                    found: false,
                };
            };
            self.reader.consume(len);
            consumed += len;
            if found {
                return Skipped { consumed, found };
            }
        }
    }
}
