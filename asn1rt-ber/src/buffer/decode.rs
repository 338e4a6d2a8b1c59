//! Forward-reading decode buffer
//!
//! The buffer borrows the message; the codec never owns or copies it. Every
//! read is checked against both the logical message size and the physical
//! slice, so a corrupt length field can only produce an error.

use asn1rt_core::error::{CodecError, CodecResult, ErrorKind};

/// Snapshot of the cursor and flags, used to backtrack a failed match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    cursor: usize,
    constructed: bool,
    indefinite: bool,
}

/// Byte slice with a forward-moving read cursor
///
/// # Flags
///
/// - `constructed`: the form bit of the most recently parsed tag
/// - `indefinite`: the outermost message uses the indefinite length form
#[derive(Debug, Clone)]
pub struct DecodeBuffer<'a> {
    data: &'a [u8],
    cursor: usize,
    size: usize,
    constructed: bool,
    indefinite: bool,
}

impl<'a> DecodeBuffer<'a> {
    /// Create a buffer over the whole slice
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: 0,
            size: data.len(),
            constructed: false,
            indefinite: false,
        }
    }

    /// Create a buffer limited to the first `size` bytes of `data`
    ///
    /// A size of 0, or one larger than the slice, means the whole slice.
    pub fn with_size(data: &'a [u8], size: usize) -> Self {
        let mut buffer = Self::new(data);
        buffer.set_size(size);
        buffer
    }

    /// The underlying slice
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Current read position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Logical message size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Set the logical message size, clamped to the slice length
    pub fn set_size(&mut self, size: usize) {
        self.size = if size == 0 {
            self.data.len()
        } else {
            size.min(self.data.len())
        };
    }

    /// Move the cursor to an absolute position within the message
    pub fn seek(&mut self, position: usize) -> CodecResult<()> {
        if position > self.size {
            return Err(CodecError::new(ErrorKind::EndOfBuffer));
        }
        self.cursor = position;
        Ok(())
    }

    /// Bytes between the cursor and the end of the message
    pub fn remaining(&self) -> usize {
        self.size.saturating_sub(self.cursor)
    }

    /// Whether the cursor reached the end of the message
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.size
    }

    /// Look at the byte under the cursor without consuming it
    pub fn peek(&self) -> CodecResult<u8> {
        self.peek_at(0)
            .ok_or_else(|| CodecError::new(ErrorKind::EndOfBuffer))
    }

    /// Look at the byte `offset` positions past the cursor
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        let index = self.cursor.checked_add(offset)?;
        if index < self.size {
            self.data.get(index).copied()
        } else {
            None
        }
    }

    /// Consume one byte
    pub fn fetch(&mut self) -> CodecResult<u8> {
        let byte = self.peek()?;
        self.cursor += 1;
        Ok(byte)
    }

    /// Consume `count` bytes and borrow them
    ///
    /// # Errors
    /// [`ErrorKind::EndOfBuffer`] if fewer than `count` bytes remain; the
    /// cursor does not move in that case.
    pub fn read_n(&mut self, count: usize) -> CodecResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(CodecError::new(ErrorKind::EndOfBuffer));
        }
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.data[start..start + count])
    }

    /// Skip `count` bytes
    pub fn advance(&mut self, count: usize) -> CodecResult<()> {
        self.read_n(count).map(|_| ())
    }

    /// Borrow an already consumed range of the message
    pub fn consumed(&self, start: usize) -> CodecResult<&'a [u8]> {
        if start > self.cursor {
            return Err(CodecError::new(ErrorKind::OutOfBounds));
        }
        Ok(&self.data[start..self.cursor])
    }

    /// Whether the next two bytes are an end-of-contents marker
    pub fn at_eoc(&self) -> bool {
        self.peek_at(0) == Some(0) && self.peek_at(1) == Some(0)
    }

    /// Save the cursor and flags
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
            constructed: self.constructed,
            indefinite: self.indefinite,
        }
    }

    /// Return to a saved checkpoint
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.cursor;
        self.constructed = checkpoint.constructed;
        self.indefinite = checkpoint.indefinite;
    }

    /// Whether the last parsed tag had the constructed form
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Record the form of the last parsed tag
    pub fn set_constructed(&mut self, constructed: bool) {
        self.constructed = constructed;
    }

    /// Whether the outermost message has indefinite length
    pub fn is_indefinite(&self) -> bool {
        self.indefinite
    }

    /// Mark the outermost message as indefinite length
    pub fn set_indefinite(&mut self, indefinite: bool) {
        self.indefinite = indefinite;
    }
}

impl Default for DecodeBuffer<'_> {
    fn default() -> Self {
        DecodeBuffer::new(&[])
    }
}
