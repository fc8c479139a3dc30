//! Word-addressed backing memory.
//!
//! `WordMemory` maps a contiguous array of 32-bit little-endian words at a
//! base address. Reads outside the mapped range return zero, the value an
//! unconnected bus would float to in this model.

use tracing::warn;

use super::BackingStore;
use crate::common::addr::FetchAddr;
use crate::common::constants::WORD_BYTES;
use crate::common::error::ImageError;

/// A read-only word array mapped at `base`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordMemory {
    base: FetchAddr,
    words: Vec<u32>,
}

impl WordMemory {
    /// Creates a zero-filled memory of `num_words` words.
    ///
    /// The low two bits of `base` are cleared.
    pub fn new(base: FetchAddr, num_words: usize) -> Self {
        Self::from_words(base, vec![0; num_words])
    }

    /// Creates a memory holding `words`, the first at `base`.
    pub fn from_words(base: FetchAddr, words: Vec<u32>) -> Self {
        Self {
            base: FetchAddr(base.val() & !(WORD_BYTES - 1)),
            words,
        }
    }

    /// Creates a memory sized to hold `image` exactly and loads it at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Misaligned`] if `base` is not word aligned and
    /// [`ImageError::RaggedLength`] if the image is not a whole number of words.
    pub fn from_image(base: FetchAddr, image: &[u8]) -> Result<Self, ImageError> {
        if base.val() % WORD_BYTES != 0 {
            return Err(ImageError::Misaligned(base.val()));
        }
        let mut memory = Self::new(base, image.len() / WORD_BYTES as usize);
        memory.load(base, image)?;
        Ok(memory)
    }

    /// Copies a little-endian image into memory starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Misaligned`], [`ImageError::RaggedLength`] or
    /// [`ImageError::OutOfBounds`]; memory is left untouched on error.
    pub fn load(&mut self, addr: FetchAddr, image: &[u8]) -> Result<(), ImageError> {
        if addr.val() % WORD_BYTES != 0 {
            return Err(ImageError::Misaligned(addr.val()));
        }
        if image.len() % WORD_BYTES as usize != 0 {
            return Err(ImageError::RaggedLength(image.len()));
        }

        let count = image.len() / WORD_BYTES as usize;
        let start = match addr.word_index().checked_sub(self.base.word_index()) {
            Some(start) if start as usize + count <= self.words.len() => start as usize,
            _ => {
                return Err(ImageError::OutOfBounds {
                    addr: addr.val(),
                    len: image.len(),
                });
            }
        };

        for (slot, chunk) in self.words[start..start + count]
            .iter_mut()
            .zip(image.chunks_exact(WORD_BYTES as usize))
        {
            *slot = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(())
    }

    /// Address of the first mapped word.
    pub const fn base(&self) -> FetchAddr {
        self.base
    }

    /// Number of mapped words.
    pub fn len_words(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if no words are mapped.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the word at `addr`, or `None` if it is not mapped.
    pub fn word(&self, addr: FetchAddr) -> Option<u32> {
        self.index_of(addr).map(|i| self.words[i])
    }

    fn index_of(&self, addr: FetchAddr) -> Option<usize> {
        let index = addr.word_index().checked_sub(self.base.word_index())? as usize;
        (index < self.words.len()).then_some(index)
    }
}

impl BackingStore for WordMemory {
    fn read_word(&mut self, addr: FetchAddr) -> u32 {
        self.word(addr).unwrap_or_else(|| {
            warn!(addr = %addr, "read outside mapped memory");
            0
        })
    }
}
