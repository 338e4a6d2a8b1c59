//! Back-to-front encode buffer
//!
//! Encoding writes from the end of the buffer toward the front: the content
//! of a value is written first, then its length, then its tag, each
//! prepended to what is already there. The finished message therefore always
//! ends at the last byte of the buffer and starts at the cursor.
//!
//! A dynamic buffer grows at the front. Growth copies the written suffix to
//! the tail of the new storage, so the distance of any written byte from the
//! end of the buffer never changes. Element locations recorded as such
//! distances (see [`crate::ber::types::BufLocDescr`]) stay valid across
//! growth.

use asn1rt_core::config::CodecConfig;
use asn1rt_core::error::{CodecError, CodecResult, ErrorKind};
use bytes::Bytes;

#[derive(Debug)]
enum Storage<'b> {
    /// Caller-supplied, fixed capacity
    Fixed(&'b mut [u8]),
    /// Owned, grows on demand
    Dynamic(Vec<u8>),
}

impl Storage<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Fixed(buf) => buf,
            Storage::Dynamic(buf) => buf,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Fixed(buf) => buf,
            Storage::Dynamic(buf) => buf,
        }
    }
}

/// Byte buffer with a backward-moving write cursor
#[derive(Debug)]
pub struct EncodeBuffer<'b> {
    storage: Storage<'b>,
    cursor: usize,
    extent: usize,
    max_size: Option<usize>,
}

impl<'b> EncodeBuffer<'b> {
    /// Create an empty dynamic buffer
    pub fn dynamic(config: &CodecConfig) -> Self {
        Self {
            storage: Storage::Dynamic(Vec::new()),
            cursor: 0,
            extent: config.encode_extent.max(1),
            max_size: config.max_encode_size,
        }
    }

    /// Wrap a caller-supplied buffer; writing past its start is
    /// [`ErrorKind::BufferOverflow`]
    pub fn fixed(buf: &'b mut [u8]) -> Self {
        let cursor = buf.len();
        Self {
            storage: Storage::Fixed(buf),
            cursor,
            extent: 0,
            max_size: None,
        }
    }

    /// Whether the buffer grows on demand
    pub fn is_dynamic(&self) -> bool {
        matches!(self.storage, Storage::Dynamic(_))
    }

    /// Total capacity of the storage
    pub fn capacity(&self) -> usize {
        self.storage.as_slice().len()
    }

    /// Index of the first written byte
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything written and move the cursor back to the end
    pub fn reset(&mut self) {
        self.cursor = self.capacity();
    }

    /// The written bytes, i.e. the message encoded so far
    pub fn written(&self) -> &[u8] {
        &self.storage.as_slice()[self.cursor..]
    }

    /// Mutable view of the written bytes
    pub fn written_mut(&mut self) -> &mut [u8] {
        let cursor = self.cursor;
        &mut self.storage.as_mut_slice()[cursor..]
    }

    /// Borrow `len` written bytes starting `offset` bytes before the end
    pub fn slice_from_end(&self, offset: usize, len: usize) -> CodecResult<&[u8]> {
        let capacity = self.capacity();
        let start = capacity
            .checked_sub(offset)
            .filter(|start| *start >= self.cursor)
            .ok_or_else(|| CodecError::new(ErrorKind::OutOfBounds))?;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= capacity)
            .ok_or_else(|| CodecError::new(ErrorKind::OutOfBounds))?;
        Ok(&self.storage.as_slice()[start..end])
    }

    /// Prepend one byte
    pub fn prepend_byte(&mut self, byte: u8) -> CodecResult<()> {
        self.reserve(1)?;
        self.cursor -= 1;
        let cursor = self.cursor;
        self.storage.as_mut_slice()[cursor] = byte;
        Ok(())
    }

    /// Prepend a run of bytes, keeping their order
    pub fn prepend_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.reserve(bytes.len())?;
        self.cursor -= bytes.len();
        let cursor = self.cursor;
        self.storage.as_mut_slice()[cursor..cursor + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Make room for `needed` bytes in front of the cursor
    ///
    /// # Errors
    /// - [`ErrorKind::BufferOverflow`] for a fixed buffer
    /// - [`ErrorKind::NoMemory`] if a dynamic buffer would exceed its size
    ///   limit or cannot be allocated
    pub fn reserve(&mut self, needed: usize) -> CodecResult<()> {
        if needed <= self.cursor {
            return Ok(());
        }

        let old = match &mut self.storage {
            Storage::Fixed(_) => return Err(CodecError::new(ErrorKind::BufferOverflow)),
            Storage::Dynamic(buf) => buf,
        };

        let used = old.len() - self.cursor;
        let required = used
            .checked_add(needed)
            .ok_or_else(|| CodecError::new(ErrorKind::NoMemory))?;
        let mut new_size = old
            .len()
            .checked_add(self.extent.max(needed))
            .ok_or_else(|| CodecError::new(ErrorKind::NoMemory))?;
        if let Some(max) = self.max_size {
            if required > max {
                return Err(CodecError::new(ErrorKind::NoMemory)
                    .with_param(format!("encode buffer limit {} bytes", max)));
            }
            new_size = new_size.min(max);
        }

        let mut grown = Vec::new();
        grown
            .try_reserve_exact(new_size)
            .map_err(|_| CodecError::new(ErrorKind::NoMemory))?;
        grown.resize(new_size - used, 0);
        grown.extend_from_slice(&old[self.cursor..]);
        self.cursor += new_size - old.len();
        *old = grown;

        log::debug!(
            "encode buffer grown to {} bytes ({} written)",
            new_size,
            used
        );
        Ok(())
    }

    /// Take the written bytes
    ///
    /// A dynamic buffer hands over its allocation without copying; a fixed
    /// buffer's bytes are copied.
    pub fn into_bytes(self) -> Bytes {
        match self.storage {
            Storage::Dynamic(buf) => Bytes::from(buf).slice(self.cursor..),
            Storage::Fixed(buf) => Bytes::copy_from_slice(&buf[self.cursor..]),
        }
    }
}
