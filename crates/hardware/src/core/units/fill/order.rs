//! Word ordering within a line fill.
//!
//! The fill controller walks an [`OffsetSequence`] to choose which word to
//! read next and tags every delivered word with its offset. The cache writes
//! each word where its tag says and only uses [`FillOrder::offset_at`] to
//! report which word it expects next.

use crate::config::FillOrder;

impl FillOrder {
    /// Returns the block offset of the `step`-th word of a fill.
    ///
    /// # Arguments
    ///
    /// * `critical` - Offset of the word whose lookup missed.
    /// * `step` - Zero-based position in the delivery sequence.
    /// * `block_words` - Words per line.
    #[inline]
    pub const fn offset_at(self, critical: usize, step: usize, block_words: usize) -> usize {
        match self {
            Self::CriticalWordFirst => (critical + step) % block_words,
            Self::Sequential => step,
        }
    }

    /// Returns the full delivery sequence for a fill of a line with
    /// `block_words` words whose missed word sits at `critical`.
    pub const fn sequence(self, critical: usize, block_words: usize) -> OffsetSequence {
        OffsetSequence {
            order: self,
            critical,
            block_words,
            step: 0,
        }
    }
}

/// Iterator over the block offsets of one fill, in delivery order.
///
/// Yields every offset in `0..block_words` exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetSequence {
    order: FillOrder,
    critical: usize,
    block_words: usize,
    step: usize,
}

impl OffsetSequence {
    /// Offset the next call to `next` will yield, without advancing.
    pub const fn peek(&self) -> Option<usize> {
        if self.step < self.block_words {
            Some(self.order.offset_at(self.critical, self.step, self.block_words))
        } else {
            None
        }
    }

    /// Number of offsets already yielded.
    pub const fn position(&self) -> usize {
        self.step
    }

    /// Offset of the missed word.
    pub const fn critical(&self) -> usize {
        self.critical
    }
}

impl Iterator for OffsetSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let offset = self.peek()?;
        self.step += 1;
        Some(offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.block_words - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OffsetSequence {}
