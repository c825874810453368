// ## 📂 File: `src/stream/block.rs`

use std::io::Read;

use bytes::BytesMut;

use crate::stream::io::fill_chunk;
use crate::types::StreamError;

/// One chunk of input tagged with its stream position.
///
/// - `index` is unique and strictly increasing from 0 in stream order.
/// - `data.len()` is the number of valid bytes, 1..=L; only the final block
///   may be shorter than the key.
/// - Owned by exactly one stage at a time: coordinator, submission queue,
///   worker, result queue, coordinator again.
#[derive(Debug)]
pub struct Block {
    index: u64,
    data: BytesMut,
}

impl Block {
    pub fn new(index: u64, data: BytesMut) -> Self {
        Self { index, data }
    }

    /// Empty block with room for `block_len` bytes, for in-place reuse.
    pub fn with_capacity(index: u64, block_len: usize) -> Self {
        Self {
            index,
            data: BytesMut::with_capacity(block_len),
        }
    }

    /// Read the next chunk of up to `block_len` bytes.
    /// `None` on end of stream.
    pub fn read_from<R: Read + ?Sized>(
        reader: &mut R,
        index: u64,
        block_len: usize,
    ) -> Result<Option<Self>, StreamError> {
        let mut block = Self::with_capacity(index, block_len);
        match block.refill(reader, index, block_len)? {
            0 => Ok(None),
            _ => Ok(Some(block)),
        }
    }

    /// Overwrite this block with the next chunk, keeping its allocation.
    /// Returns the number of valid bytes (0 on end of stream).
    pub fn refill<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        index: u64,
        block_len: usize,
    ) -> Result<usize, StreamError> {
        self.index = index;
        self.data.clear();
        self.data.resize(block_len, 0);

        let n = fill_chunk(reader, &mut self.data)?;
        self.data.truncate(n);
        Ok(n)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True if this block has fewer valid bytes than a full block.
    pub fn is_short(&self, block_len: usize) -> bool {
        self.data.len() < block_len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
