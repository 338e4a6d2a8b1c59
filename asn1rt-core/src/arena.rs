//! Growable byte arena for decoded values
//!
//! Variable-size decoded data (octet and bit strings, character strings,
//! big-integer text, open types) is copied into an [`Arena`] owned by the
//! decoding session and addressed through [`ByteRef`] handles. Blocks are
//! appended to a single region and freed together by [`Arena::reset`].
//! [`Arena::release`] exists for rolling back a block that was allocated by
//! a multi-step decode which then failed; when the released block is the
//! newest one its space is reclaimed immediately.
//!
//! Handles carry the arena generation they were issued in. Using a handle
//! after a reset, or after it was released, yields [`ErrorKind::NullPtr`]
//! instead of reading another value's bytes.

use crate::error::{CodecError, CodecResult, ErrorKind};
use std::ops::Range;

/// Handle to a block of bytes held by an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRef {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    len: usize,
}

impl Span {
    fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Append-only byte arena with bulk teardown
#[derive(Debug, Default)]
pub struct Arena {
    data: Vec<u8>,
    blocks: Vec<Option<Span>>,
    generation: u32,
    live: usize,
    limit: Option<usize>,
}

impl Arena {
    /// Create an unbounded arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena holding at most `limit` live bytes
    ///
    /// `None` means unbounded.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Allocate a zero-filled block of `len` bytes
    ///
    /// # Errors
    /// [`ErrorKind::NoMemory`] if the arena limit would be exceeded or the
    /// region cannot grow.
    pub fn alloc(&mut self, len: usize) -> CodecResult<ByteRef> {
        self.reserve(len)?;
        let start = self.data.len();
        self.data.resize(start + len, 0);
        Ok(self.push_block(Span { start, len }))
    }

    /// Allocate a block holding a copy of `bytes`
    pub fn alloc_copy(&mut self, bytes: &[u8]) -> CodecResult<ByteRef> {
        self.reserve(bytes.len())?;
        let start = self.data.len();
        self.data.extend_from_slice(bytes);
        Ok(self.push_block(Span {
            start,
            len: bytes.len(),
        }))
    }

    /// Resize a block, preserving its leading content
    ///
    /// The newest block is resized in place and keeps its handle. Any other
    /// block is copied into a fresh block and the old one is released.
    pub fn realloc(&mut self, handle: ByteRef, new_len: usize) -> CodecResult<ByteRef> {
        let span = self.span(handle)?;
        if span.start + span.len == self.data.len() {
            if new_len > span.len {
                self.reserve(new_len - span.len)?;
            } else {
                self.live -= span.len - new_len;
            }
            self.data.resize(span.start + new_len, 0);
            self.blocks[handle.index] = Some(Span {
                start: span.start,
                len: new_len,
            });
            return Ok(handle);
        }

        let keep = span.len.min(new_len);
        let fresh = self.alloc(new_len)?;
        let fresh_start = self.span(fresh)?.start;
        self.data
            .copy_within(span.start..span.start + keep, fresh_start);
        self.release(handle)?;
        Ok(fresh)
    }

    /// Release a single block
    ///
    /// # Errors
    /// [`ErrorKind::NullPtr`] if the handle is stale or already released.
    pub fn release(&mut self, handle: ByteRef) -> CodecResult<()> {
        let span = self.span(handle)?;
        self.blocks[handle.index] = None;
        self.live -= span.len;
        if span.start + span.len == self.data.len() {
            self.data.truncate(span.start);
        }
        Ok(())
    }

    /// Release every block in `handles` and clear the list
    pub fn release_all(&mut self, handles: &mut Vec<ByteRef>) -> CodecResult<()> {
        for handle in handles.drain(..).rev() {
            self.release(handle)?;
        }
        Ok(())
    }

    /// Free all blocks at once
    ///
    /// Every handle issued before the reset becomes stale.
    pub fn reset(&mut self) {
        log::debug!(
            "arena reset: {} blocks, {} live bytes",
            self.blocks.len(),
            self.live
        );
        self.data.clear();
        self.blocks.clear();
        self.live = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Borrow the bytes of a block
    pub fn get(&self, handle: ByteRef) -> CodecResult<&[u8]> {
        let span = self.span(handle)?;
        Ok(&self.data[span.range()])
    }

    /// Mutably borrow the bytes of a block
    pub fn get_mut(&mut self, handle: ByteRef) -> CodecResult<&mut [u8]> {
        let span = self.span(handle)?;
        Ok(&mut self.data[span.range()])
    }

    /// Borrow a block as UTF-8 text
    ///
    /// # Errors
    /// [`ErrorKind::InvalidUtf8`] with the byte index of the first invalid
    /// sequence as parameter.
    pub fn get_str(&self, handle: ByteRef) -> CodecResult<&str> {
        let bytes = self.get(handle)?;
        std::str::from_utf8(bytes).map_err(|e| {
            CodecError::new(ErrorKind::InvalidUtf8).with_param(e.valid_up_to())
        })
    }

    /// Number of bytes in live blocks
    pub fn live_bytes(&self) -> usize {
        self.live
    }

    /// Whether no live block remains
    pub fn is_empty(&self) -> bool {
        self.live == 0 && self.blocks.iter().all(Option::is_none)
    }

    fn reserve(&mut self, len: usize) -> CodecResult<()> {
        let wanted = self
            .live
            .checked_add(len)
            .ok_or_else(|| CodecError::new(ErrorKind::NoMemory))?;
        if let Some(limit) = self.limit {
            if wanted > limit {
                return Err(CodecError::new(ErrorKind::NoMemory)
                    .with_param(format!("arena limit {} bytes", limit)));
            }
        }
        self.data
            .try_reserve(len)
            .map_err(|_| CodecError::new(ErrorKind::NoMemory))?;
        self.live = wanted;
        Ok(())
    }

    fn push_block(&mut self, span: Span) -> ByteRef {
        self.blocks.push(Some(span));
        ByteRef {
            index: self.blocks.len() - 1,
            generation: self.generation,
        }
    }

    fn span(&self, handle: ByteRef) -> CodecResult<Span> {
        if handle.generation != self.generation {
            return Err(CodecError::new(ErrorKind::NullPtr));
        }
        self.blocks
            .get(handle.index)
            .copied()
            .flatten()
            .ok_or_else(|| CodecError::new(ErrorKind::NullPtr))
    }
}
