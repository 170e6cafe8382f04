//! # Succinct Rank/Select Bit Vectors
//!
//! *Constant-time bit counting over raw machine words.*
//!
//! ## Intuition First
//!
//! Picture a page of a phone book with every entry either marked or not.
//! Answering "how many marks appear before line 4,731?" by counting from
//! the top is linear work. Instead, pencil running subtotals into the
//! margin every few lines: now any count is one margin lookup plus a
//! short hand count. Rank9 is that margin, engineered so the "short hand
//! count" is a single 64-bit popcount.
//!
//! ## The Problem
//!
//! The two fundamental queries over a static bit sequence are:
//! - `rank(p)`: the number of 1s at positions strictly below $p$.
//! - `select(n)`: the position of the $n$-th 1 (0-indexed).
//!
//! Both admit $O(1)$ answers with $o(n)$ extra bits, but the constants
//! live and die by memory layout. This crate implements the broadword
//! design from Vigna's "Broadword Implementation of Rank/Select
//! Queries" (WEA 2008):
//!
//! - **Rank9**: per 512-bit block, one absolute counter plus seven 9-bit
//!   relative counters packed into a single word, so a rank is two index
//!   reads and one masked popcount.
//! - **Select9**: the position of every 512th 1-bit, refined by records
//!   whose encoding adapts to local density. Dense spans store rank
//!   deltas and finish inside one block; sparse spans store positions
//!   outright.
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(1)$ for `rank`, `select`, and single-bit access.
//! - **Space**: 25% overhead for the rank table, plus a select inventory
//!   proportional to the 1-bit count divided by 512.
//!
//! ## What Could Go Wrong
//!
//! 1. **Static only**: the structure is immutable after construction;
//!    changing a bit means rebuilding the indices.
//! 2. **Word granularity**: the logical length is always a multiple of
//!    64; callers pad their data to a whole word.
//!
//! ## References
//!
//! - Jacobson, G. (1989). "Succinct Static Data Structures."
//! - Vigna, S. (2008). "Broadword Implementation of Rank/Select Queries."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitvec;
pub mod broadword;
pub mod error;
pub mod rank9;
pub mod select9;

pub use bitvec::BitVector;
pub use error::Error;
pub use rank9::Rank9Index;
pub use select9::Select9Index;
