//! Matching, motif scanning and pairwise alignment over encoded nucleotide sequences:
//! single-pattern matchers and an Aho-Corasick trie for constant-width dictionaries on one
//! side, a Gotoh affine-gap aligner on the other, sharing the byte codecs, the range model
//! and the match-reporting substrate.

pub mod align;
pub mod alphabet;
pub mod io;
pub mod pdict;
pub mod ranges;
pub mod search;
pub mod seq;
pub mod utils;
