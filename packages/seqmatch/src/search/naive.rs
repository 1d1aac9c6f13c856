//! Sliding-window matching, exact and inexact.
//!
//! The exact matcher compares whole windows and exists mostly as the reference the smarter
//! algorithms are validated against. The inexact matcher slides the pattern across every
//! placement where at most `max_mismatch` letters can disagree, including placements that
//! hang off either subject end (out-of-subject positions count as mismatches).

use crate::alphabet::iupac::codes_compatible;
use crate::search::sink::MatchSink;
use crate::utils::error::{SeqError, SeqResult};

/// Which sides of a comparison are taken literally. When a side is not fixed, its IUPAC
/// ambiguity mask participates instead of the raw byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fixed {
  pub pattern: bool,
  pub subject: bool,
}

impl Default for Fixed {
  fn default() -> Self {
    Self { pattern: true, subject: true }
  }
}

impl Fixed {
  pub fn both() -> Self {
    Self::default()
  }

  #[inline]
  pub(crate) fn letters_match(self, pattern_code: u8, subject_code: u8) -> bool {
    if self.pattern && self.subject {
      pattern_code == subject_code
    } else {
      codes_compatible(pattern_code, subject_code)
    }
  }
}

/// Number of mismatching letters with the pattern placed at `pshift` (0-based shift
/// relative to the subject start). Counting stops early once `max_mismatch` is exceeded.
pub(crate) fn nmismatch_at(pattern: &[u8], subject: &[u8], pshift: i32, max_mismatch: usize, fixed: Fixed) -> usize {
  let subject_length = subject.len() as i32;
  let mut nmismatch = 0;
  for (k, &p) in pattern.iter().enumerate() {
    let j = pshift + k as i32;
    let matches = j >= 0 && j < subject_length && fixed.letters_match(p, subject[j as usize]);
    if !matches {
      nmismatch += 1;
      if nmismatch > max_mismatch {
        break;
      }
    }
  }
  nmismatch
}

pub fn match_naive_exact(pattern: &[u8], subject: &[u8], sink: &mut MatchSink) -> SeqResult<()> {
  if pattern.is_empty() {
    return Err(SeqError::EmptyPattern);
  }
  let plen = pattern.len();
  if plen > subject.len() {
    return Ok(());
  }
  for start in 0..=(subject.len() - plen) {
    if &subject[start..start + plen] == pattern {
      sink.report(start as i32 + 1, plen as i32);
    }
  }
  Ok(())
}

pub fn match_naive_inexact(
  pattern: &[u8],
  subject: &[u8],
  max_mismatch: usize,
  fixed: Fixed,
  sink: &mut MatchSink,
) -> SeqResult<()> {
  if pattern.is_empty() {
    return Err(SeqError::EmptyPattern);
  }
  let plen = pattern.len() as i32;
  let slen = subject.len() as i32;
  let min_pshift = if plen <= max_mismatch as i32 {
    1 - plen
  } else {
    -(max_mismatch as i32)
  };
  let max_pshift = slen - min_pshift - plen;
  for pshift in min_pshift..=max_pshift {
    if nmismatch_at(pattern, subject, pshift, max_mismatch, fixed) <= max_mismatch {
      sink.report(pshift + 1, plen);
    }
  }
  Ok(())
}

#[cfg(test)]
mod naive_tests {
  use super::*;
  use crate::alphabet::ByteCodec;
  use crate::search::sink::{MatchReport, ReportMode};
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  fn starts_of(sink: &MatchSink) -> Vec<i32> {
    match sink.materialize() {
      MatchReport::Ranges(ranges) => ranges.starts().to_vec(),
      MatchReport::Count(_) => panic!("expected ranges"),
    }
  }

  #[test]
  fn exact_finds_overlapping_occurrences() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pattern = codec.encode(b"AA")?;
    let subject = codec.encode(b"CAAAC")?;
    let mut sink = MatchSink::new(ReportMode::Ranges);
    match_naive_exact(&pattern, &subject, &mut sink)?;
    assert_eq!(starts_of(&sink), vec![2, 3]);
    Ok(())
  }

  #[test]
  fn exact_rejects_empty_pattern() {
    let mut sink = MatchSink::new(ReportMode::Ranges);
    let err = match_naive_exact(b"", b"ACGT", &mut sink).unwrap_err();
    assert_eq!(err, SeqError::EmptyPattern);
  }

  #[test]
  fn inexact_reports_overhanging_placements() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pattern = codec.encode(b"TTAC")?;
    let subject = codec.encode(b"TACGT")?;
    let mut sink = MatchSink::new(ReportMode::Ranges);
    // One mismatch allowed: the pattern may hang one letter off the left end.
    match_naive_inexact(&pattern, &subject, 1, Fixed::both(), &mut sink)?;
    assert_eq!(starts_of(&sink), vec![0]);
    Ok(())
  }

  #[rstest]
  #[case(b"ANG", b"ACGATGAAGCAG", &[1, 4, 7])]
  #[case(b"NNN", b"ACGT", &[1, 2])]
  fn inexact_expands_pattern_ambiguities(
    #[case] pattern: &[u8],
    #[case] subject: &[u8],
    #[case] expected: &[i32],
  ) -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pattern = codec.encode(pattern)?;
    let subject = codec.encode(subject)?;
    let mut sink = MatchSink::new(ReportMode::Ranges);
    let fixed = Fixed { pattern: false, subject: true };
    match_naive_inexact(&pattern, &subject, 0, fixed, &mut sink)?;
    assert_eq!(starts_of(&sink), expected.to_vec());
    Ok(())
  }

  #[test]
  fn fixed_subject_treats_its_ambiguities_literally() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pattern = codec.encode(b"AG")?;
    let subject = codec.encode(b"ANG")?;
    let mut sink = MatchSink::new(ReportMode::Ranges);
    match_naive_inexact(&pattern, &subject, 0, Fixed::both(), &mut sink)?;
    assert_eq!(starts_of(&sink), Vec::<i32>::new());
    // With an unfixed subject the N is compatible with anything, in both windows.
    let mut sink = MatchSink::new(ReportMode::Ranges);
    let fixed = Fixed { pattern: true, subject: false };
    match_naive_inexact(&pattern, &subject, 0, fixed, &mut sink)?;
    assert_eq!(starts_of(&sink), vec![1, 2]);
    Ok(())
  }

  #[test]
  fn pattern_longer_than_subject_plus_budget_never_matches() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pattern = codec.encode(b"ACGTACGT")?;
    let subject = codec.encode(b"ACG")?;
    let mut sink = MatchSink::new(ReportMode::Ranges);
    match_naive_inexact(&pattern, &subject, 2, Fixed::both(), &mut sink)?;
    assert_eq!(sink.count(), 0);
    Ok(())
  }
}
