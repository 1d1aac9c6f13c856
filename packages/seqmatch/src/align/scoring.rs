//! Substitution scoring for the aligner.
//!
//! Three flavors: a flat match/mismatch pair over raw bytes, a 2-D substitution matrix
//! indexed through a byte lookup on each sequence, and a quality-aware 3-D table whose
//! first two dimensions are quality indices and whose last ("fuzzy") dimension selects the
//! match or mismatch slice by IUPAC compatibility of the sequence letters.

use crate::alphabet::iupac::codes_compatible;
use crate::utils::error::{SeqError, SeqResult};

/// One sequence handed to the aligner, with its optional per-letter quality view. A
/// quality view of length 1 is recycled for every position.
#[derive(Clone, Copy, Debug)]
pub struct AlignInput<'a> {
  pub seq: &'a [u8],
  pub quality: Option<&'a [u8]>,
}

impl<'a> AlignInput<'a> {
  pub fn plain(seq: &'a [u8]) -> Self {
    Self { seq, quality: None }
  }

  pub fn with_quality(seq: &'a [u8], quality: &'a [u8]) -> Self {
    Self { seq, quality: Some(quality) }
  }
}

/// Byte to scoring-matrix index.
#[derive(Clone, Debug)]
pub struct IndexLookup {
  table: Vec<Option<u32>>,
}

impl IndexLookup {
  pub fn from_pairs(pairs: &[(u8, u32)]) -> Self {
    let mut table = vec![None; 256];
    for &(byte, index) in pairs {
      table[byte as usize] = Some(index);
    }
    Self { table }
  }

  pub fn get(&self, byte: u8) -> SeqResult<usize> {
    self.table[byte as usize]
      .map(|index| index as usize)
      .ok_or(SeqError::KeyNotInLookupTable { byte })
  }

  fn max_index(&self) -> Option<usize> {
    self.table.iter().flatten().map(|&index| index as usize).max()
  }
}

/// A 2-D substitution matrix indexed by the looked-up codes of the two letters.
#[derive(Clone, Debug)]
pub struct ConstantScoring {
  lookup: IndexLookup,
  matrix: Vec<f64>,
  n_cols: usize,
}

impl ConstantScoring {
  pub fn new(lookup: IndexLookup, matrix: Vec<f64>, n_rows: usize, n_cols: usize) -> SeqResult<Self> {
    if matrix.len() != n_rows * n_cols || n_rows == 0 || n_cols == 0 {
      return Err(SeqError::InvalidRangeSpec {
        message: "substitution matrix dimensions do not match its length",
      });
    }
    if lookup.max_index().is_none_or(|max| max >= n_rows.min(n_cols)) {
      return Err(SeqError::InvalidRangeSpec {
        message: "lookup table indexes outside the substitution matrix",
      });
    }
    Ok(Self { lookup, matrix, n_cols })
  }
}

/// The quality-aware 3-D table: `scores[a][b][fuzzy]` where `a` and `b` are quality
/// indices and `fuzzy` is 1 when the sequence letters are IUPAC-compatible.
#[derive(Clone, Debug)]
pub struct QualityScoring {
  lookup: IndexLookup,
  scores: Vec<f64>,
  n_indices: usize,
}

impl QualityScoring {
  pub fn new(lookup: IndexLookup, scores: Vec<f64>, n_indices: usize) -> SeqResult<Self> {
    if n_indices == 0 || scores.len() != n_indices * n_indices * 2 {
      return Err(SeqError::InvalidRangeSpec {
        message: "quality score table dimensions do not match its length",
      });
    }
    if lookup.max_index().is_none_or(|max| max >= n_indices) {
      return Err(SeqError::InvalidRangeSpec {
        message: "lookup table indexes outside the quality score table",
      });
    }
    Ok(Self { lookup, scores, n_indices })
  }
}

#[derive(Clone, Debug)]
pub enum Scoring {
  /// One score for equal bytes, another for unequal bytes.
  MatchMismatch { match_score: f64, mismatch_score: f64 },
  Constant(ConstantScoring),
  Quality(QualityScoring),
}

impl Scoring {
  /// Resolves the per-position lookups for one sequence pair so the DP inner loop is a
  /// plain table access.
  pub(crate) fn prepare<'p>(
    &'p self,
    pattern: &AlignInput<'p>,
    subject: &AlignInput<'p>,
  ) -> SeqResult<PreparedScoring<'p>> {
    match self {
      Self::MatchMismatch { match_score, mismatch_score } => Ok(PreparedScoring::MatchMismatch {
        match_score: *match_score,
        mismatch_score: *mismatch_score,
        seq1: pattern.seq,
        seq2: subject.seq,
      }),
      Self::Constant(scoring) => Ok(PreparedScoring::Constant {
        matrix: &scoring.matrix,
        n_cols: scoring.n_cols,
        e1: lookup_positions(&scoring.lookup, pattern.seq, pattern.seq.len())?,
        e2: lookup_positions(&scoring.lookup, subject.seq, subject.seq.len())?,
      }),
      Self::Quality(scoring) => {
        let q1 = pattern.quality.ok_or(SeqError::InvalidRangeSpec {
          message: "quality scoring requires a quality view on both sequences",
        })?;
        let q2 = subject.quality.ok_or(SeqError::InvalidRangeSpec {
          message: "quality scoring requires a quality view on both sequences",
        })?;
        Ok(PreparedScoring::Quality {
          scores: &scoring.scores,
          n_indices: scoring.n_indices,
          q1: lookup_positions(&scoring.lookup, q1, pattern.seq.len())?,
          q2: lookup_positions(&scoring.lookup, q2, subject.seq.len())?,
          seq1: pattern.seq,
          seq2: subject.seq,
        })
      }
    }
  }
}

/// Looks up every position of `bytes`, recycling a single element to `len` positions.
fn lookup_positions(lookup: &IndexLookup, bytes: &[u8], len: usize) -> SeqResult<Vec<usize>> {
  if bytes.len() == 1 && len != 1 {
    let index = lookup.get(bytes[0])?;
    return Ok(vec![index; len]);
  }
  if bytes.len() != len {
    return Err(SeqError::InvalidRangeSpec {
      message: "quality view length must match its sequence or be 1",
    });
  }
  bytes.iter().map(|&byte| lookup.get(byte)).collect()
}

#[derive(Debug)]
pub(crate) enum PreparedScoring<'p> {
  MatchMismatch {
    match_score: f64,
    mismatch_score: f64,
    seq1: &'p [u8],
    seq2: &'p [u8],
  },
  Constant {
    matrix: &'p [f64],
    n_cols: usize,
    e1: Vec<usize>,
    e2: Vec<usize>,
  },
  Quality {
    scores: &'p [f64],
    n_indices: usize,
    q1: Vec<usize>,
    q2: Vec<usize>,
    seq1: &'p [u8],
    seq2: &'p [u8],
  },
}

impl PreparedScoring<'_> {
  /// Substitution score of pattern position `i` against subject position `j` (0-based).
  #[inline]
  pub(crate) fn substitution(&self, i: usize, j: usize) -> f64 {
    match self {
      Self::MatchMismatch { match_score, mismatch_score, seq1, seq2 } => {
        if seq1[i] == seq2[j] { *match_score } else { *mismatch_score }
      }
      Self::Constant { matrix, n_cols, e1, e2 } => matrix[e1[i] * n_cols + e2[j]],
      Self::Quality { scores, n_indices, q1, q2, seq1, seq2 } => {
        let fuzzy = usize::from(codes_compatible(seq1[i], seq2[j]));
        scores[(q1[i] * n_indices + q2[j]) * 2 + fuzzy]
      }
    }
  }
}

#[cfg(test)]
mod scoring_tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;

  #[test]
  fn constant_scoring_resolves_through_the_lookup() -> Result<(), Report> {
    let lookup = IndexLookup::from_pairs(&[(b'A', 0), (b'C', 1)]);
    #[rustfmt::skip]
    let matrix = vec![
      1.0, -2.0,
      -2.0, 1.0,
    ];
    let scoring = Scoring::Constant(ConstantScoring::new(lookup, matrix, 2, 2)?);
    let pattern = AlignInput::plain(b"AC");
    let subject = AlignInput::plain(b"CA");
    let prepared = scoring.prepare(&pattern, &subject)?;
    assert_eq!(prepared.substitution(0, 0), -2.0);
    assert_eq!(prepared.substitution(0, 1), 1.0);
    Ok(())
  }

  #[test]
  fn unknown_letters_fail_the_lookup() -> Result<(), Report> {
    let lookup = IndexLookup::from_pairs(&[(b'A', 0)]);
    let scoring = Scoring::Constant(ConstantScoring::new(lookup, vec![1.0], 1, 1)?);
    let pattern = AlignInput::plain(b"AX");
    let subject = AlignInput::plain(b"A");
    let err = scoring.prepare(&pattern, &subject).unwrap_err();
    assert_eq!(err, SeqError::KeyNotInLookupTable { byte: b'X' });
    Ok(())
  }

  #[test]
  fn quality_scoring_recycles_scalar_views_and_applies_fuzzy() -> Result<(), Report> {
    use crate::alphabet::ByteCodec;
    let lookup = IndexLookup::from_pairs(&[(b'!', 0), (b'5', 1)]);
    // scores[a][b][fuzzy]: fuzzy=1 (compatible) rewards, fuzzy=0 penalizes, scaled by
    // quality index.
    #[rustfmt::skip]
    let scores = vec![
      -1.0, 1.0,  -1.0, 1.5,
      -1.5, 1.5,  -2.0, 2.0,
    ];
    let scoring = Scoring::Quality(QualityScoring::new(lookup, scores, 2)?);
    let codec = ByteCodec::dna();
    let seq1 = codec.encode(b"ANT")?;
    let seq2 = codec.encode(b"AGT")?;
    let pattern = AlignInput::with_quality(&seq1, b"5");
    let subject = AlignInput::with_quality(&seq2, b"!55");
    let prepared = scoring.prepare(&pattern, &subject)?;
    // A vs A, qualities (5, !): compatible -> scores[1][0][1]
    assert_eq!(prepared.substitution(0, 0), 1.5);
    // N vs G is compatible; T vs G is not, qualities (5, 5).
    assert_eq!(prepared.substitution(1, 1), 2.0);
    assert_eq!(prepared.substitution(2, 1), -2.0);
    Ok(())
  }

  #[test]
  fn mismatched_quality_lengths_are_rejected() -> Result<(), Report> {
    let lookup = IndexLookup::from_pairs(&[(b'!', 0)]);
    let scoring = Scoring::Quality(QualityScoring::new(lookup, vec![0.0, 0.0], 1)?);
    let pattern = AlignInput::with_quality(b"ACG", b"!!");
    let subject = AlignInput::with_quality(b"ACG", b"!!!");
    assert!(scoring.prepare(&pattern, &subject).is_err());
    Ok(())
  }
}
