pub mod boyer_moore;
pub mod naive;
pub mod palindrome;
pub mod pwm;
pub mod shift_or;
pub mod sink;

pub use naive::Fixed;
pub use sink::{MatchReport, MatchSink, ReportMode};

use crate::ranges::Ranges;
use crate::seq::CachedSeqSet;
use crate::seq::set::check_view;
use crate::utils::error::SeqResult;

/// Single-pattern matching algorithms. All of them report through the common sink with the
/// width of the pattern, and all agree on the reported set for a given comparator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Algorithm {
  NaiveExact,
  #[default]
  NaiveInexact,
  BoyerMoore,
  ShiftOr,
}

/// Mismatch budget and comparator selection for a scan.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchOptions {
  pub max_mismatch: usize,
  pub fixed: Fixed,
}

/// Runs `pattern` against `subject` with the selected algorithm.
///
/// A pattern wider than the subject plus the mismatch budget cannot match and returns
/// without reporting; a pattern no wider than the budget is handed to the sliding
/// comparator regardless of the requested algorithm.
pub fn match_pattern(
  pattern: &[u8],
  subject: &[u8],
  algorithm: Algorithm,
  options: MatchOptions,
  sink: &mut MatchSink,
) -> SeqResult<()> {
  if pattern.len() > options.max_mismatch + subject.len() {
    return Ok(());
  }
  if pattern.len() <= options.max_mismatch {
    return naive::match_naive_inexact(pattern, subject, options.max_mismatch, options.fixed, sink);
  }
  match algorithm {
    Algorithm::NaiveExact => naive::match_naive_exact(pattern, subject, sink),
    Algorithm::NaiveInexact => {
      naive::match_naive_inexact(pattern, subject, options.max_mismatch, options.fixed, sink)
    }
    Algorithm::BoyerMoore => {
      boyer_moore::match_boyer_moore(pattern, subject, options.max_mismatch, options.fixed, sink)
    }
    Algorithm::ShiftOr => shift_or::match_shift_or(pattern, subject, options.max_mismatch, options.fixed, sink),
  }
}

/// Scans `pattern` over `(start, width)` views of one subject, concatenating the reports in
/// view order with every start expressed in subject coordinates.
pub fn match_pattern_in_views(
  pattern: &[u8],
  subject: &[u8],
  views: &Ranges,
  algorithm: Algorithm,
  options: MatchOptions,
  sink: &mut MatchSink,
) -> SeqResult<()> {
  for (start, width) in views.iter() {
    check_view(start, width, subject.len())?;
    let offset = (start - 1) as usize;
    let view = &subject[offset..offset + width as usize];
    sink.set_shift(offset as i32);
    match_pattern(pattern, view, algorithm, options, sink)?;
  }
  sink.set_shift(0);
  Ok(())
}

/// Scans one pattern over every element of a set, materializing one report per element.
pub fn vmatch_pattern(
  pattern: &[u8],
  subjects: &CachedSeqSet,
  algorithm: Algorithm,
  options: MatchOptions,
  mode: ReportMode,
) -> SeqResult<Vec<MatchReport>> {
  let mut sink = MatchSink::new(mode);
  let mut reports = Vec::with_capacity(subjects.len());
  for subject in subjects.iter() {
    match_pattern(pattern, subject, algorithm, options, &mut sink)?;
    reports.push(sink.materialize());
    sink.drop_current();
  }
  Ok(reports)
}
