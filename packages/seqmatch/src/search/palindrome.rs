//! Inverted-repeat palindrome discovery.
//!
//! Every position (and every position pair, for even palindromes) is treated as a center;
//! arms grow outwards while the left letter, pushed through the lookup table, equals the
//! right letter. An arm that reaches `min_arm` before the enclosed loop outgrows
//! `max_loop` is reported as the full `(start, width)` stem-loop range. With no lookup
//! table the letters must match literally (plain, non-complemented palindromes).

use crate::alphabet::LookupTable;
use crate::search::sink::MatchSink;

#[inline]
fn is_match(c1: u8, c2: u8, lookup: Option<&LookupTable>) -> bool {
  match lookup {
    None => c1 == c2,
    Some(table) => table[c1 as usize] == Some(c2),
  }
}

fn find_palindromes_at(
  subject: &[u8],
  mut i1: i64,
  mut i2: i64,
  max_loop1: i64,
  min_arm: usize,
  lookup: Option<&LookupTable>,
  sink: &mut MatchSink,
) {
  let len = subject.len() as i64;
  let mut arm_len = 0usize;
  loop {
    let valid_indices = i1 >= 0 && i2 < len;
    if !((valid_indices && i2 - i1 <= max_loop1) || arm_len != 0) {
      return;
    }
    if valid_indices && is_match(subject[i1 as usize], subject[i2 as usize], lookup) {
      arm_len += 1;
    } else {
      if arm_len >= min_arm {
        sink.report((i1 + 2) as i32, (i2 - i1 - 1) as i32);
      }
      arm_len = 0;
    }
    i1 -= 1;
    i2 += 1;
  }
}

/// Reports every palindrome with arms of at least `min_arm` letters around a loop of at
/// most `max_loop` letters.
pub fn find_palindromes(
  subject: &[u8],
  min_arm: usize,
  max_loop: usize,
  lookup: Option<&LookupTable>,
  sink: &mut MatchSink,
) {
  let min_arm = min_arm.max(1);
  let max_loop1 = max_loop as i64 + 1;
  for n in 0..subject.len() as i64 {
    // Palindromes centered on n, then on n + 0.5.
    find_palindromes_at(subject, n - 1, n + 1, max_loop1, min_arm, lookup, sink);
    find_palindromes_at(subject, n, n + 1, max_loop1, min_arm, lookup, sink);
  }
}

/// Longest prefix whose letters pair with the corresponding suffix letters.
pub fn palindrome_arm_length(seq: &[u8], lookup: Option<&LookupTable>) -> usize {
  let mut i1 = 0usize;
  let mut i2 = seq.len();
  while i1 + 1 < i2 {
    if !is_match(seq[i1], seq[i2 - 1], lookup) {
      break;
    }
    i1 += 1;
    i2 -= 1;
  }
  i1
}
