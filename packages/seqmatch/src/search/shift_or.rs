//! Bit-parallel matching (shift-or in its shift-and formulation).
//!
//! One machine word holds the set of active pattern prefixes; allowing up to 3 mismatches
//! replicates the state word once per tolerated mismatch. The automaton only sees
//! placements fully inside the subject, so the placements hanging off either subject end
//! are checked with the sliding comparator, and patterns wider than the word fall back to
//! it entirely. Either way the reported set equals the naive inexact one.

use crate::search::naive::{Fixed, match_naive_inexact, nmismatch_at};
use crate::search::sink::MatchSink;
use crate::utils::error::{SeqError, SeqResult};

const WORD_BITS: usize = u64::BITS as usize;

/// Highest mismatch count the replicated state vectors support.
pub const MAX_SHIFT_OR_MISMATCH: usize = 3;

pub fn match_shift_or(
  pattern: &[u8],
  subject: &[u8],
  max_mismatch: usize,
  fixed: Fixed,
  sink: &mut MatchSink,
) -> SeqResult<()> {
  if pattern.is_empty() {
    return Err(SeqError::EmptyPattern);
  }
  let plen = pattern.len();
  if plen > WORD_BITS || max_mismatch > MAX_SHIFT_OR_MISMATCH || plen <= max_mismatch {
    return match_naive_inexact(pattern, subject, max_mismatch, fixed, sink);
  }

  // Per-byte prefix-extension masks: bit k of `extend[c]` is set when the pattern letter at
  // position k accepts the subject letter c under the selected comparator.
  let mut extend = [0u64; 256];
  for (k, &p) in pattern.iter().enumerate() {
    for c in 0u8..=255 {
      if fixed.letters_match(p, c) {
        extend[c as usize] |= 1 << k;
      }
    }
  }

  let slen = subject.len() as i32;
  let min_pshift = -(max_mismatch as i32);

  // Placements hanging off the left end.
  for pshift in min_pshift..0 {
    if pshift + plen as i32 > slen + max_mismatch as i32 {
      break;
    }
    if nmismatch_at(pattern, subject, pshift, max_mismatch, fixed) <= max_mismatch {
      sink.report(pshift + 1, plen as i32);
    }
  }

  // Fully embedded placements.
  let mut states = [0u64; MAX_SHIFT_OR_MISMATCH + 1];
  let accept = 1u64 << (plen - 1);
  for (i, &c) in subject.iter().enumerate() {
    let mask = extend[c as usize];
    let mut carried = states[0];
    states[0] = ((states[0] << 1) | 1) & mask;
    for j in 1..=max_mismatch {
      let kept = states[j];
      states[j] = (((kept << 1) | 1) & mask) | ((carried << 1) | 1);
      carried = kept;
    }
    if states[max_mismatch] & accept != 0 {
      sink.report(i as i32 + 2 - plen as i32, plen as i32);
    }
  }

  // Placements hanging off the right end.
  let first_right = (slen - plen as i32 + 1).max(0);
  let max_pshift = slen - min_pshift - plen as i32;
  for pshift in first_right..=max_pshift {
    if nmismatch_at(pattern, subject, pshift, max_mismatch, fixed) <= max_mismatch {
      sink.report(pshift + 1, plen as i32);
    }
  }
  Ok(())
}
