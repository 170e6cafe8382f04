//! Succinct bit vector with constant-time rank and indexed select.
//!
//! The vector owns a word array plus two auxiliary indices built once at
//! construction:
//! - a [`Rank9Index`] answering `rank` with three memory reads, and
//! - a [`Select9Index`] sampling every 512th 1-bit with density-adaptive
//!   refinement records.
//!
//! Nothing is mutated after construction, so shared references may query
//! from any number of threads.
//!
//! # Layout
//!
//! The logical bit vector has `words.len() * 64` bits in little-endian
//! bit order: bit `n` is bit `n % 64` of word `n / 64`. The rank index
//! adds 16 bytes per 512 bits (about 25%); the select inventory adds a
//! term proportional to the 1-bit count divided by 512.

use crate::error::{Error, Result};
use crate::rank9::Rank9Index;
use crate::select9::Select9Index;

/// An immutable succinct bit vector supporting `rank` and `select`.
pub struct BitVector {
    words: Vec<u64>,
    rank9: Rank9Index,
    select9: Select9Index,
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len())
            .field("ones", &self.count_ones())
            .finish()
    }
}

impl BitVector {
    /// Build a succinct bit vector, taking ownership of `words`.
    ///
    /// The logical length is `words.len() * 64`; an empty array yields
    /// the empty vector, for which every query at position 0 returns 0.
    pub fn new(words: Vec<u64>) -> Self {
        let rank9 = Rank9Index::build(&words);
        let select9 = Select9Index::build(&words, &rank9);
        Self {
            words,
            rank9,
            select9,
        }
    }

    /// Return the total number of bits in the vector.
    pub fn len(&self) -> usize {
        self.words.len() * 64
    }

    /// Return true if the bit vector has length 0.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Return the total number of set bits. O(1).
    pub fn count_ones(&self) -> usize {
        self.rank9.count_ones()
    }

    /// Return the bit at index `i`, or an error if `i` is out of range.
    pub fn get(&self, i: usize) -> Result<bool> {
        if i >= self.len() {
            return Err(Error::IndexOutOfBounds(i));
        }
        Ok(self.get_unchecked(i))
    }

    /// Return the bit at index `i` without a bounds check.
    ///
    /// The caller must guarantee `i < len()`; otherwise the call panics
    /// on the underlying slice access.
    #[inline]
    pub fn get_unchecked(&self, i: usize) -> bool {
        (self.words[i / 64] >> (i % 64)) & 1 != 0
    }

    /// Return the number of set bits in the range `[0, pos)`, or an
    /// error if `pos > len()`.
    pub fn rank(&self, pos: usize) -> Result<usize> {
        if pos > self.len() {
            return Err(Error::IndexOutOfBounds(pos));
        }
        Ok(self.rank_unchecked(pos))
    }

    /// Return the number of set bits in `[0, pos)` without a bounds
    /// check; for hot loops where `pos <= len()` is already proven.
    #[inline]
    pub fn rank_unchecked(&self, pos: usize) -> usize {
        self.rank9.rank(&self.words, pos)
    }

    /// Return the number of unset bits in the range `[0, pos)`, or an
    /// error if `pos > len()`.
    pub fn rank0(&self, pos: usize) -> Result<usize> {
        Ok(pos - self.rank(pos)?)
    }

    /// Return the position of the `n`-th set bit (0-indexed), or `None`
    /// if fewer than `n + 1` bits are set.
    pub fn select(&self, n: usize) -> Option<usize> {
        self.select9.select(&self.words, &self.rank9, n)
    }

    /// Borrow the underlying word array.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Borrow the rank index.
    pub fn rank_index(&self) -> &Rank9Index {
        &self.rank9
    }

    /// Borrow the select inventory.
    pub fn select_index(&self) -> &Select9Index {
        &self.select9
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.words.capacity() * 8 + self.rank9.heap_bytes() + self.select9.heap_bytes()
    }

    /// Serialize this vector to a stable binary encoding (little-endian).
    ///
    /// Format (versioned):
    /// - magic: 8 bytes (`RSBITSV1`)
    /// - num_words: u64
    /// - words: `num_words` u64
    ///
    /// Only the raw words are persisted; the indices are rebuilt on load.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.words.len() * 8);
        out.extend_from_slice(b"RSBITSV1");
        out.extend_from_slice(&(self.words.len() as u64).to_le_bytes());
        for &w in &self.words {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out
    }

    /// Deserialize a bit vector from `to_bytes()` output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        const MAGIC: &[u8; 8] = b"RSBITSV1";
        let mut off = 0usize;

        let mut take = |n: usize| -> Result<&[u8]> {
            if off + n > bytes.len() {
                return Err(Error::InvalidEncoding(
                    "unexpected end of input".to_string(),
                ));
            }
            let slice = &bytes[off..off + n];
            off += n;
            Ok(slice)
        };

        let magic = take(8)?;
        if magic != MAGIC {
            return Err(Error::InvalidEncoding("bad magic for BitVector".to_string()));
        }

        let num_words = u64::from_le_bytes(take(8)?.try_into().unwrap()) as usize;

        // Bound allocation against total input to prevent allocation bombs.
        if num_words.saturating_mul(8) > bytes.len() {
            return Err(Error::InvalidEncoding(format!(
                "num_words ({num_words}) too large for input ({} bytes)",
                bytes.len()
            )));
        }

        let mut words = Vec::with_capacity(num_words);
        for _ in 0..num_words {
            words.push(u64::from_le_bytes(take(8)?.try_into().unwrap()));
        }

        if off != bytes.len() {
            return Err(Error::InvalidEncoding(
                "trailing bytes after BitVector".to_string(),
            ));
        }

        Ok(Self::new(words))
    }
}
