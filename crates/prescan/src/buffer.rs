//! Accumulation buffer for candidate attribute values.

use std::borrow::Cow;

/// Growable byte buffer; capacity grows to `2 * capacity + 1` when full.
///
/// Only values of armed `content`/`charset` attributes on a `meta` tag land
/// here, so growth is bounded by the longest such value, not by document size.
#[derive(Debug)]
pub(crate) struct AccumulationBuffer {
    bytes: Vec<u8>,
}

impl AccumulationBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Append a byte; returns `true` if the buffer had to grow.
    pub(crate) fn push(&mut self, byte: u8) -> bool {
        let grew = self.bytes.len() == self.bytes.capacity();
        if grew {
            let capacity = self.bytes.capacity();
            self.bytes.reserve_exact(capacity + 1);
        }
        self.bytes.push(byte);
        grew
    }

    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// The buffered value as a label string, one `char` per byte.
    ///
    /// Bytes are widened as Latin-1 so arbitrary input never fails to convert.
    /// ASCII values, which every real label is, are borrowed.
    pub(crate) fn to_label(&self) -> Cow<'_, str> {
        if self.bytes.is_ascii() {
            if let Ok(label) = std::str::from_utf8(&self.bytes) {
                return Cow::Borrowed(label);
            }
        }
        Cow::Owned(self.as_bytes().iter().map(|&byte| char::from(byte)).collect())
    }
}
