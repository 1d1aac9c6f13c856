//! Boyer-Moore exact matching with the bad-character and strong good-suffix rules.
//!
//! The shift tables assume literal byte comparison, so any mismatch budget or unfixed side
//! falls back to the sliding comparator, which honors IUPAC semantics.

use crate::search::naive::{Fixed, match_naive_inexact};
use crate::search::sink::MatchSink;
use crate::utils::error::{SeqError, SeqResult};

/// Rightmost occurrence of each byte in the pattern, or -1.
fn build_bad_character(pattern: &[u8]) -> [i32; 256] {
  let mut table = [-1i32; 256];
  for (index, &byte) in pattern.iter().enumerate() {
    table[byte as usize] = index as i32;
  }
  table
}

/// Shift table of the strong good-suffix rule, indexed by the mismatch position + 1
/// (index 0 is the full-match shift).
fn build_good_suffix(pattern: &[u8]) -> Vec<usize> {
  let m = pattern.len();
  let mut shift = vec![0usize; m + 1];
  let mut border = vec![0usize; m + 2];

  // Widest borders of the pattern suffixes.
  let mut i = m;
  let mut j = m + 1;
  border[i] = j;
  while i > 0 {
    while j <= m && pattern[i - 1] != pattern[j - 1] {
      if shift[j] == 0 {
        shift[j] = j - i;
      }
      j = border[j];
    }
    i -= 1;
    j -= 1;
    border[i] = j;
  }

  // Fill the remaining entries from the widest border of the whole pattern.
  let mut j = border[0];
  for (i, slot) in shift.iter_mut().enumerate() {
    if *slot == 0 {
      *slot = j;
    }
    if i == j {
      j = border[j];
    }
  }
  shift
}

pub fn match_boyer_moore(
  pattern: &[u8],
  subject: &[u8],
  max_mismatch: usize,
  fixed: Fixed,
  sink: &mut MatchSink,
) -> SeqResult<()> {
  if pattern.is_empty() {
    return Err(SeqError::EmptyPattern);
  }
  if max_mismatch > 0 || !fixed.pattern || !fixed.subject {
    return match_naive_inexact(pattern, subject, max_mismatch, fixed, sink);
  }
  let m = pattern.len();
  if m > subject.len() {
    return Ok(());
  }
  let bad_character = build_bad_character(pattern);
  let good_suffix = build_good_suffix(pattern);

  let mut start = 0usize;
  while start <= subject.len() - m {
    let mut j = m;
    while j > 0 && pattern[j - 1] == subject[start + j - 1] {
      j -= 1;
    }
    if j == 0 {
      sink.report(start as i32 + 1, m as i32);
      start += good_suffix[0];
    } else {
      let bad_shift = j as i32 - 1 - bad_character[subject[start + j - 1] as usize];
      start += good_suffix[j].max(bad_shift.max(1) as usize);
    }
  }
  Ok(())
}
