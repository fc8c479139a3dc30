//! Cache lines and sets.

use crate::common::constants::NUM_WAYS;

/// One line of the cache: a tag, a valid bit and a block of words.
///
/// A line only becomes valid once every word of its fill has been written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheLine {
    valid: bool,
    tag: u32,
    words: Box<[u32]>,
}

impl CacheLine {
    /// Creates an invalid, zeroed line of `block_words` words.
    pub fn new(block_words: usize) -> Self {
        Self {
            valid: false,
            tag: 0,
            words: vec![0; block_words].into_boxed_slice(),
        }
    }

    /// Whether the line holds a complete block.
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Stored tag. Meaningful only while the line is valid or being filled.
    #[inline(always)]
    pub const fn tag(&self) -> u32 {
        self.tag
    }

    /// Returns `true` if the line is valid and holds `tag`.
    #[inline(always)]
    pub const fn matches(&self, tag: u32) -> bool {
        self.valid && self.tag == tag
    }

    /// Word at `offset`.
    #[inline(always)]
    pub fn word(&self, offset: usize) -> u32 {
        self.words[offset]
    }

    /// All words of the block.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Claims the line for a new fill: drops validity and installs the new tag.
    pub(crate) fn begin_fill(&mut self, tag: u32) {
        self.valid = false;
        self.tag = tag;
    }

    pub(crate) fn write_word(&mut self, offset: usize, data: u32) {
        self.words[offset] = data;
    }

    pub(crate) fn mark_valid(&mut self) {
        self.valid = true;
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }
}

/// A set of [`NUM_WAYS`] lines sharing one set index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    ways: [CacheLine; NUM_WAYS],
}

impl CacheSet {
    /// Creates a set of invalid lines.
    pub fn new(block_words: usize) -> Self {
        Self {
            ways: std::array::from_fn(|_| CacheLine::new(block_words)),
        }
    }

    /// Returns the lowest-indexed way holding a valid copy of `tag`.
    pub fn find(&self, tag: u32) -> Option<usize> {
        self.ways.iter().position(|line| line.matches(tag))
    }

    /// Number of valid ways holding `tag`. Never more than one.
    pub fn count_matches(&self, tag: u32) -> usize {
        self.ways.iter().filter(|line| line.matches(tag)).count()
    }

    /// Line in `way`.
    pub fn way(&self, way: usize) -> &CacheLine {
        &self.ways[way]
    }

    /// All lines of the set, by way index.
    pub const fn ways(&self) -> &[CacheLine; NUM_WAYS] {
        &self.ways
    }

    pub(crate) fn way_mut(&mut self, way: usize) -> &mut CacheLine {
        &mut self.ways[way]
    }

    pub(crate) fn invalidate_all(&mut self) {
        for line in &mut self.ways {
            line.invalidate();
        }
    }
}
