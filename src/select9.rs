//! Select9 inventory: sampled 1-bit positions refined by density-adaptive
//! records.
//!
//! The primary inventory stores the position of every 512th 1-bit plus a
//! terminating sentinel equal to the bit length. For each consecutive
//! pair of samples, the secondary inventory holds a record of `2B` words,
//! where `B` is the number of 512-bit basic blocks the span touches. The
//! record encoding adapts to the span's density:
//!
//! | `B`            | record contents                                       |
//! |----------------|-------------------------------------------------------|
//! | `0`            | empty                                                 |
//! | `1..=7`        | coarse 16-bit rank deltas at block offsets 0, 4, .., 28 |
//! | `8..=63`       | coarse deltas, then per-block deltas for offsets 0..=63 |
//! | `64..=127`     | explicit 16-bit positions relative to the first sample |
//! | `128..=255`    | explicit 32-bit relative positions                    |
//! | `256..`        | explicit 64-bit absolute positions                    |
//!
//! Dense spans only need to be narrowed to a basic block; the rank
//! table's packed 9-bit fields and an in-word select finish the query.
//! Sparse spans store positions outright so a lookup never scans an
//! unbounded run of empty blocks.
//!
//! Records are addressed through an explicit prefix-sum offset table.

use crate::broadword::{popcount, select_in_word};
use crate::rank9::{Rank9Index, WORDS_PER_BLOCK};

const BITS_PER_BLOCK: usize = WORDS_PER_BLOCK * 64;

/// Marks a delta field whose block lies past the end of the bit data.
const DELTA_SENTINEL: u64 = 0xFFFF;

/// Primary and secondary select inventories over an external word array.
///
/// Like [`Rank9Index`], this structure assumes the word array it was
/// built from stays unchanged and takes it as a query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Select9Index {
    /// Position of every 512th 1-bit, terminated by the bit length.
    primary: Vec<usize>,
    /// Prefix sums of record lengths; record `k` spans
    /// `secondary[offsets[k]..offsets[k + 1]]`.
    offsets: Vec<usize>,
    /// Concatenated per-pair records.
    secondary: Vec<u64>,
}

impl Select9Index {
    /// Sampling rate of the primary inventory.
    pub const ONES_PER_SAMPLE: usize = 512;

    /// Build both inventories for `words`, reusing the rank table for
    /// the delta records.
    pub fn build(words: &[u64], rank9: &Rank9Index) -> Self {
        let size = words.len() * 64;

        let mut primary = Vec::with_capacity(rank9.count_ones() / Self::ONES_PER_SAMPLE + 2);
        let mut seen = 0usize;
        let mut next_sample = 0usize;
        for (i, &word) in words.iter().enumerate() {
            let pop = popcount(word) as usize;
            while seen + pop > next_sample {
                primary.push(i * 64 + select_in_word(word, next_sample - seen));
                next_sample += Self::ONES_PER_SAMPLE;
            }
            seen += pop;
        }
        primary.push(size);

        // Record lengths are known up front, so the records are emitted
        // straight into a pre-sized buffer.
        let pairs = primary.len() - 1;
        let mut offsets = Vec::with_capacity(pairs + 1);
        offsets.push(0);
        for k in 0..pairs {
            let span = primary[k + 1] / BITS_PER_BLOCK - primary[k] / BITS_PER_BLOCK;
            offsets.push(offsets[k] + 2 * span);
        }

        let mut secondary = vec![0u64; offsets[pairs]];
        for k in 0..pairs {
            fill_record(
                &mut secondary[offsets[k]..offsets[k + 1]],
                words,
                rank9,
                primary[k],
                primary[k + 1],
            );
        }

        Self {
            primary,
            offsets,
            secondary,
        }
    }

    /// Position of the `n`-th 1-bit (0-indexed), or `None` if fewer than
    /// `n + 1` bits are set.
    ///
    /// `words` and `rank9` must be the array and table the inventory was
    /// built from.
    pub fn select(&self, words: &[u64], rank9: &Rank9Index, n: usize) -> Option<usize> {
        if n >= rank9.count_ones() {
            return None;
        }
        let k = n / Self::ONES_PER_SAMPLE;
        let start = self.primary[k];
        let a = start / BITS_PER_BLOCK;
        let span = self.primary[k + 1] / BITS_PER_BLOCK - a;
        let rec = &self.secondary[self.offsets[k]..self.offsets[k + 1]];

        match span {
            0..=63 => {
                // Narrow to a basic block. All deltas below are relative
                // to the rank at the start of block `a` and monotone, so
                // a predecessor scan with early exit is exact; sentinel
                // fields compare larger than any reachable target.
                let t = n - rank9.absolute(a);
                let mut block = a;
                if span >= 1 {
                    let mut g = 0;
                    for f in 1..8 {
                        let d = ((rec[f / 4] >> (16 * (f % 4))) & 0xFFFF) as usize;
                        if d <= t {
                            g = f;
                        } else {
                            break;
                        }
                    }
                    block = a + 4 * g;
                    if span >= 8 {
                        for off in 4 * g + 1..64 {
                            let wi = 2 + off / 4;
                            if wi >= rec.len().min(18) {
                                break;
                            }
                            let d = ((rec[wi] >> (16 * (off % 4))) & 0xFFFF) as usize;
                            if d <= t {
                                block = a + off;
                            } else {
                                break;
                            }
                        }
                    } else {
                        // No per-block deltas in the record; the rank
                        // table refines the four-block group.
                        for j in block + 1..=a + span {
                            if rank9.absolute(j) - rank9.absolute(a) <= t {
                                block = j;
                            } else {
                                break;
                            }
                        }
                    }
                }

                let t = n - rank9.absolute(block);
                debug_assert!(t < 512);
                let mut w = 0;
                for i in 1..WORDS_PER_BLOCK {
                    if rank9.rel(block, i) <= t {
                        w = i;
                    } else {
                        break;
                    }
                }
                let skipped = if w == 0 { 0 } else { rank9.rel(block, w) };
                let word_idx = block * WORDS_PER_BLOCK + w;
                Some(word_idx * 64 + select_in_word(words[word_idx], t - skipped))
            }
            64..=127 => {
                let j = n % Self::ONES_PER_SAMPLE;
                let off = (rec[j / 4] >> (16 * (j % 4))) & 0xFFFF;
                Some(start + off as usize)
            }
            128..=255 => {
                let j = n % Self::ONES_PER_SAMPLE;
                let off = (rec[j / 2] >> (32 * (j % 2))) & 0xFFFF_FFFF;
                Some(start + off as usize)
            }
            _ => Some(rec[n % Self::ONES_PER_SAMPLE] as usize),
        }
    }

    /// Sampled 1-bit positions, including the terminating sentinel.
    pub fn primary(&self) -> &[usize] {
        &self.primary
    }

    /// Prefix sums addressing the secondary records.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Concatenated secondary records.
    pub fn secondary(&self) -> &[u64] {
        &self.secondary
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.primary.capacity() * 8 + self.offsets.capacity() * 8 + self.secondary.capacity() * 8
    }
}

/// Fill one secondary record for the span `[start, end)`.
fn fill_record(rec: &mut [u64], words: &[u64], rank9: &Rank9Index, start: usize, end: usize) {
    let a = start / BITS_PER_BLOCK;
    let span = end / BITS_PER_BLOCK - a;
    match span {
        0 => {}
        1..=63 => {
            let base = rank9.absolute(a);
            let nb = rank9.num_blocks();
            let delta = |off: usize| -> u64 {
                if a + off < nb {
                    (rank9.absolute(a + off) - base) as u64
                } else {
                    DELTA_SENTINEL
                }
            };
            for f in 0..8 {
                rec[f / 4] |= delta(4 * f) << (16 * (f % 4));
            }
            if span >= 8 {
                for i in 2..rec.len().min(18) {
                    for j in 0..4 {
                        rec[i] |= delta(4 * (i - 2) + j) << (16 * j);
                    }
                }
            }
        }
        _ => {
            // Walk the span's 1-bits with lowest-bit iteration, starting
            // at the sampled bit itself.
            let mut idx = 0usize;
            let mut w = start / 64;
            let bit = start % 64;
            let mut cur = (words[w] >> bit) << bit;
            loop {
                while cur != 0 {
                    let pos = w * 64 + cur.trailing_zeros() as usize;
                    if pos >= end || idx == Select9Index::ONES_PER_SAMPLE {
                        return;
                    }
                    let off = pos - start;
                    match span {
                        64..=127 => {
                            debug_assert!(off < 1 << 16);
                            rec[idx / 4] |= (off as u64) << (16 * (idx % 4));
                        }
                        128..=255 => {
                            debug_assert!(off < 1 << 32);
                            rec[idx / 2] |= (off as u64) << (32 * (idx % 2));
                        }
                        _ => rec[idx] = pos as u64,
                    }
                    idx += 1;
                    cur &= cur - 1;
                }
                w += 1;
                if w == words.len() {
                    return;
                }
                cur = words[w];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[u64]) -> (Rank9Index, Select9Index) {
        let r9 = Rank9Index::build(words);
        let s9 = Select9Index::build(words, &r9);
        (r9, s9)
    }

    #[test]
    fn test_empty_and_all_zeros() {
        let (_, s9) = build(&[]);
        assert_eq!(s9.primary(), &[0]);
        assert_eq!(s9.offsets(), &[0]);
        assert!(s9.secondary().is_empty());

        let words = vec![0u64; 100];
        let (r9, s9) = build(&words);
        assert_eq!(s9.primary(), &[6400]);
        assert_eq!(s9.offsets(), &[0]);
        assert_eq!(s9.select(&words, &r9, 0), None);
    }

    #[test]
    fn test_primary_sampling_dense() {
        let words = vec![u64::MAX; 32]; // 2048 ones
        let (r9, s9) = build(&words);
        assert_eq!(s9.primary(), &[0, 512, 1024, 1536, 2048]);
        assert_eq!(s9.offsets(), &[0, 2, 4, 6, 8]);
        for n in (0..2048).step_by(31) {
            assert_eq!(s9.select(&words, &r9, n), Some(n));
        }
        assert_eq!(s9.select(&words, &r9, 2048), None);
    }

    #[test]
    fn test_coarse_record_sentinels() {
        // 32 words = 4 blocks, so every coarse offset >= 4 points past
        // the data and must carry the sentinel.
        let words = vec![u64::MAX; 32];
        let (_, s9) = build(&words);
        let rec = &s9.secondary()[..2];
        assert_eq!(rec[0] & 0xFFFF, 0);
        for f in 1..4 {
            assert_eq!((rec[0] >> (16 * f)) & 0xFFFF, DELTA_SENTINEL);
        }
        for f in 0..4 {
            assert_eq!((rec[1] >> (16 * f)) & 0xFFFF, DELTA_SENTINEL);
        }
    }

    #[test]
    fn test_coarse_record_deltas_in_range() {
        // 64 blocks of full words: sample spans are one block wide, and
        // coarse offsets 4, 8, .. land on real blocks.
        let words = vec![u64::MAX; 512];
        let (_, s9) = build(&words);
        let rec = &s9.secondary()[..2];
        assert_eq!(rec[0] & 0xFFFF, 0);
        assert_eq!((rec[0] >> 16) & 0xFFFF, 4 * 512);
        assert_eq!((rec[0] >> 32) & 0xFFFF, 8 * 512);
        assert_eq!((rec[1] >> 16) & 0xFFFF, 20 * 512);
    }

    #[test]
    fn test_mid_record_per_block_deltas() {
        // 8 ones per word: 64 per block, so one sample span covers
        // exactly 8 blocks and gets the coarse + mid encoding.
        let words = vec![0xFFu64; 128];
        let (r9, s9) = build(&words);
        assert_eq!(s9.primary()[0], 0);
        assert_eq!(s9.primary()[1], 4096);
        let rec = &s9.secondary()[s9.offsets()[0]..s9.offsets()[1]];
        assert_eq!(rec.len(), 16);
        assert_eq!((rec[0] >> 16) & 0xFFFF, 4 * 64);
        for i in 2..16 {
            for j in 0..4 {
                let off = 4 * (i - 2) + j;
                let expect = if off < 16 { (off * 64) as u64 } else { DELTA_SENTINEL };
                assert_eq!((rec[i] >> (16 * j)) & 0xFFFF, expect, "word {i} field {j}");
            }
        }
        for n in 0..r9.count_ones() {
            assert_eq!(s9.select(&words, &r9, n), Some((n / 8) * 64 + n % 8));
        }
    }

    #[test]
    fn test_explicit_16_bit_record() {
        // One 1-bit per word: a 512-one span covers 64 blocks.
        let words = vec![1u64; 520];
        let (r9, s9) = build(&words);
        assert_eq!(s9.primary(), &[0, 512 * 64, 520 * 64]);

        let rec = &s9.secondary()[s9.offsets()[0]..s9.offsets()[1]];
        assert_eq!(rec.len(), 128);
        assert_eq!(rec[0], (64 << 16) | (128 << 32) | (192 << 48));
        for j in 0..512 {
            let off = (rec[j / 4] >> (16 * (j % 4))) & 0xFFFF;
            assert_eq!(off as usize, j * 64);
        }
        for n in 0..520 {
            assert_eq!(s9.select(&words, &r9, n), Some(n * 64));
        }
    }

    #[test]
    fn test_explicit_32_bit_record() {
        // One 1-bit per two words: a 512-one span covers 128 blocks.
        let mut words = vec![0u64; 1040];
        for w in (0..words.len()).step_by(2) {
            words[w] = 1;
        }
        let (r9, s9) = build(&words);
        let span = s9.primary()[1] / 512 - s9.primary()[0] / 512;
        assert_eq!(span, 128);

        let rec = &s9.secondary()[s9.offsets()[0]..s9.offsets()[1]];
        assert_eq!(rec.len(), 256);
        assert_eq!(rec[1], 256 | (384 << 32));
        for n in 0..r9.count_ones() {
            assert_eq!(s9.select(&words, &r9, n), Some(n * 128));
        }
    }

    #[test]
    fn test_explicit_64_bit_record() {
        // One 1-bit per four words: a 512-one span covers 256 blocks,
        // so positions are stored absolute.
        let mut words = vec![0u64; 2080];
        for w in (0..words.len()).step_by(4) {
            words[w] = 1 << 7;
        }
        let (r9, s9) = build(&words);
        let span = s9.primary()[1] / 512 - s9.primary()[0] / 512;
        assert_eq!(span, 256);

        let rec = &s9.secondary()[s9.offsets()[0]..s9.offsets()[1]];
        assert_eq!(rec.len(), 512);
        assert_eq!(rec[0], 7);
        assert_eq!(rec[3], 3 * 256 + 7);
        for n in 0..r9.count_ones() {
            assert_eq!(s9.select(&words, &r9, n), Some(n * 256 + 7));
        }
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let words: Vec<u64> = (0..600)
            .map(|i: u64| if i % 7 == 0 { u64::MAX } else { i & 0x11 })
            .collect();
        let (_, s9) = build(&words);
        let p = s9.primary();
        let o = s9.offsets();
        assert_eq!(o.len(), p.len());
        assert_eq!(o[0], 0);
        for k in 0..p.len() - 1 {
            assert!(p[k] < p[k + 1], "primary must be strictly increasing");
            let span = p[k + 1] / 512 - p[k] / 512;
            assert_eq!(o[k + 1] - o[k], 2 * span);
        }
        assert_eq!(*o.last().unwrap(), s9.secondary().len());
    }
}
