//! Batch alignment: a set of patterns against one subject, and all-vs-all distances.
//! Both reuse one `AlignBuffers` sized to the largest pair and poll the cancellation token
//! once per sequence.

use crate::align::buffers::AlignBuffers;
use crate::align::pairwise::{AlignedPair, align, align_score};
use crate::align::params::AlignmentParams;
use crate::align::scoring::{AlignInput, Scoring};
use crate::seq::CachedSeqSet;
use crate::utils::error::{SeqError, SeqResult};
use crate::utils::interrupt::{self, CancelToken};

fn input_at<'a>(
  seqs: &CachedSeqSet<'a>,
  qualities: Option<&CachedSeqSet<'a>>,
  index: usize,
) -> SeqResult<AlignInput<'a>> {
  let quality = match qualities {
    None => None,
    Some(qualities) => {
      if qualities.len() != seqs.len() {
        return Err(SeqError::InvalidRangeSpec {
          message: "quality set length must match the sequence set",
        });
      }
      Some(qualities.get(index))
    }
  };
  Ok(AlignInput { seq: seqs.get(index), quality })
}

/// Scores every pattern of the set against the subject.
pub fn align_set_scores(
  patterns: &CachedSeqSet,
  pattern_qualities: Option<&CachedSeqSet>,
  subject: &AlignInput,
  scoring: &Scoring,
  params: &AlignmentParams,
  buffers: &mut AlignBuffers,
  cancel: Option<&CancelToken>,
) -> SeqResult<Vec<f64>> {
  let mut scores = Vec::with_capacity(patterns.len());
  for index in 0..patterns.len() {
    interrupt::checkpoint(cancel)?;
    let pattern = input_at(patterns, pattern_qualities, index)?;
    scores.push(align_score(&pattern, subject, scoring, params, buffers, cancel)?);
  }
  Ok(scores)
}

/// Aligns every pattern of the set against the subject, with tracebacks.
pub fn align_set(
  patterns: &CachedSeqSet,
  pattern_qualities: Option<&CachedSeqSet>,
  subject: &AlignInput,
  scoring: &Scoring,
  params: &AlignmentParams,
  buffers: &mut AlignBuffers,
  cancel: Option<&CancelToken>,
) -> SeqResult<Vec<AlignedPair>> {
  let mut pairs = Vec::with_capacity(patterns.len());
  for index in 0..patterns.len() {
    interrupt::checkpoint(cancel)?;
    let pattern = input_at(patterns, pattern_qualities, index)?;
    pairs.push(align(&pattern, subject, scoring, params, buffers, cancel)?);
  }
  Ok(pairs)
}

/// Lower triangle of the pairwise score matrix over a set: the scores of the pairs
/// (1,0), (2,0), .., (n-1,0), (2,1), .. in that order, `n * (n - 1) / 2` in total.
pub fn align_distance(
  seqs: &CachedSeqSet,
  qualities: Option<&CachedSeqSet>,
  scoring: &Scoring,
  params: &AlignmentParams,
  buffers: &mut AlignBuffers,
  cancel: Option<&CancelToken>,
) -> SeqResult<Vec<f64>> {
  let n = seqs.len();
  let mut scores = Vec::with_capacity(n * (n.saturating_sub(1)) / 2);
  for j in 0..n {
    let subject = input_at(seqs, qualities, j)?;
    for i in j + 1..n {
      interrupt::checkpoint(cancel)?;
      let pattern = input_at(seqs, qualities, i)?;
      scores.push(align_score(&pattern, &subject, scoring, params, buffers, cancel)?);
    }
  }
  Ok(scores)
}

#[cfg(test)]
mod batch_tests {
  use super::*;
  use crate::align::params::AlignmentType;
  use eyre::Report;
  use pretty_assertions::assert_eq;

  fn unit_scoring() -> Scoring {
    Scoring::MatchMismatch { match_score: 1.0, mismatch_score: -1.0 }
  }

  #[test]
  fn set_scores_follow_element_order() -> Result<(), Report> {
    let patterns = CachedSeqSet::from_views(vec![b"ACGT", b"AGGT", b"TTTT"]);
    let subject = AlignInput::plain(b"ACGT");
    let mut buffers = AlignBuffers::new();
    let params = AlignmentParams::new(AlignmentType::Global, -2.0, -1.0);
    let scores = align_set_scores(&patterns, None, &subject, &unit_scoring(), &params, &mut buffers, None)?;
    assert_eq!(scores, vec![4.0, 2.0, -2.0]);
    Ok(())
  }

  #[test]
  fn set_alignment_returns_one_pair_per_pattern() -> Result<(), Report> {
    let patterns = CachedSeqSet::from_views(vec![b"ACT", b"CGT"]);
    let subject = AlignInput::plain(b"ACGT");
    let mut buffers = AlignBuffers::new();
    let params = AlignmentParams::new(AlignmentType::Global, -1.0, -1.0);
    let pairs = align_set(&patterns, None, &subject, &unit_scoring(), &params, &mut buffers, None)?;
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].score, 1.0);
    assert_eq!(pairs[1].score, 1.0);
    Ok(())
  }

  #[test]
  fn distance_produces_the_lower_triangle() -> Result<(), Report> {
    let seqs = CachedSeqSet::from_views(vec![b"ACGT", b"ACGT", b"AGGT"]);
    let mut buffers = AlignBuffers::new();
    let params = AlignmentParams::new(AlignmentType::Global, -2.0, -1.0);
    let scores = align_distance(&seqs, None, &unit_scoring(), &params, &mut buffers, None)?;
    // Pairs in order: (1,0), (2,0), (2,1).
    assert_eq!(scores, vec![4.0, 2.0, 2.0]);
    Ok(())
  }

  #[test]
  fn cancellation_stops_the_batch() {
    let token = CancelToken::new();
    token.cancel();
    let seqs = CachedSeqSet::from_views(vec![b"ACGT", b"TTTT"]);
    let mut buffers = AlignBuffers::new();
    let params = AlignmentParams::new(AlignmentType::Global, -2.0, -1.0);
    let err = align_distance(&seqs, None, &unit_scoring(), &params, &mut buffers, Some(&token)).unwrap_err();
    assert_eq!(err, SeqError::Cancelled);
  }
}
