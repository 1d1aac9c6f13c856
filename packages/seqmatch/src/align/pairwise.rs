//! Gotoh affine-gap dynamic programming over three score planes.
//!
//! M(i,j) is the best score ending in a substitution at (i,j); D(i,j) ends in a gap in the
//! subject (consuming a pattern letter); I(i,j) ends in a gap in the pattern. Score rows
//! roll (two per plane); the traceback works off one byte-tag matrix per plane, so the
//! score-only path allocates no quadratic storage at all. `f64::NEG_INFINITY` marks "no
//! path" and absorbs additions on its own.

use crate::align::buffers::AlignBuffers;
use crate::align::params::{AlignmentParams, AlignmentType};
use crate::align::scoring::{AlignInput, PreparedScoring, Scoring};
use crate::internal_error;
use crate::ranges::Ranges;
use crate::utils::error::SeqResult;
use crate::utils::interrupt::{self, CancelToken};
use std::mem;

const TRACE_SUBSTITUTION: u8 = b'S';
const TRACE_DELETION: u8 = b'D';
const TRACE_INSERTION: u8 = b'I';
const TRACE_TERMINATION: u8 = b'T';

/// One aligned side: the aligned `(start, width)` range in its sequence, plus mismatch
/// positions and the gap runs opened in this sequence, both 1-based within the aligned
/// range.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignedSeq {
  pub start: i32,
  pub width: i32,
  pub mismatches: Vec<i32>,
  pub indels: Ranges,
}

impl AlignedSeq {
  fn new(start: usize, width: usize, mismatches: Vec<i32>, indels: &[(i32, i32)]) -> Self {
    let mut ranges = Ranges::with_capacity(indels.len());
    for &(start, width) in indels {
      ranges.push(start, width);
    }
    Self {
      start: start as i32,
      width: width as i32,
      mismatches,
      indels: ranges,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlignedPair {
  pub score: f64,
  pub pattern: AlignedSeq,
  pub subject: AlignedSeq,
}

#[derive(Clone, Copy, Debug)]
struct Optimum {
  i: usize,
  j: usize,
  plane: u8,
  score: f64,
}

/// Optimal alignment score without any traceback storage.
pub fn align_score(
  pattern: &AlignInput,
  subject: &AlignInput,
  scoring: &Scoring,
  params: &AlignmentParams,
  buffers: &mut AlignBuffers,
  cancel: Option<&CancelToken>,
) -> SeqResult<f64> {
  let n1 = pattern.seq.len();
  let n2 = subject.seq.len();
  if n1 == 0 || n2 == 0 {
    return Ok(degenerate_pair(n1, n2, params).score);
  }
  let prepared = scoring.prepare(pattern, subject)?;
  let optimum = fill(&prepared, n1, n2, params, buffers, false, cancel)?;
  Ok(optimum.score)
}

/// Optimal alignment with the reconstructed ranges, mismatches and indels.
pub fn align(
  pattern: &AlignInput,
  subject: &AlignInput,
  scoring: &Scoring,
  params: &AlignmentParams,
  buffers: &mut AlignBuffers,
  cancel: Option<&CancelToken>,
) -> SeqResult<AlignedPair> {
  let n1 = pattern.seq.len();
  let n2 = subject.seq.len();
  if n1 == 0 || n2 == 0 {
    return Ok(degenerate_pair(n1, n2, params));
  }
  let prepared = scoring.prepare(pattern, subject)?;
  let optimum = fill(&prepared, n1, n2, params, buffers, true, cancel)?;
  traceback(pattern.seq, subject.seq, params, buffers, optimum)
}

/// Alignment against an empty sequence: nothing but boundary gaps, which cost the opened
/// gap over the non-empty length unless that boundary is free.
fn degenerate_pair(n1: usize, n2: usize, params: &AlignmentParams) -> AlignedPair {
  let empty = |width: usize| AlignedSeq::new(1, width, Vec::new(), &[]);
  if n1 == 0 && n2 == 0 {
    return AlignedPair { score: 0.0, pattern: empty(0), subject: empty(0) };
  }
  if n1 == 0 {
    if params.alignment_type.subject_boundary_free() {
      return AlignedPair { score: 0.0, pattern: empty(0), subject: empty(0) };
    }
    return AlignedPair {
      score: params.gap.opening + n2 as f64 * params.gap.extension,
      pattern: AlignedSeq::new(1, 0, Vec::new(), &[(1, n2 as i32)]),
      subject: empty(n2),
    };
  }
  if params.alignment_type.pattern_boundary_free() {
    return AlignedPair { score: 0.0, pattern: empty(0), subject: empty(0) };
  }
  AlignedPair {
    score: params.gap.opening + n1 as f64 * params.gap.extension,
    pattern: empty(n1),
    subject: AlignedSeq::new(1, 0, Vec::new(), &[(1, n1 as i32)]),
  }
}

/// Best predecessor plane in the M-then-I-then-D preference order.
#[inline]
fn pick_plane(m: f64, d: f64, i: f64) -> (f64, u8) {
  if m >= d.max(i) {
    (m, TRACE_SUBSTITUTION)
  } else if i >= d {
    (i, TRACE_INSERTION)
  } else {
    (d, TRACE_DELETION)
  }
}

fn fill(
  prepared: &PreparedScoring,
  n1: usize,
  n2: usize,
  params: &AlignmentParams,
  buffers: &mut AlignBuffers,
  with_traceback: bool,
  cancel: Option<&CancelToken>,
) -> SeqResult<Optimum> {
  let alignment_type = params.alignment_type;
  let local = alignment_type == AlignmentType::Local;
  let pattern_free = alignment_type.pattern_boundary_free();
  let subject_free = alignment_type.subject_boundary_free();
  let go = params.gap.opening;
  let ge = params.gap.extension;
  let goe = go + ge;
  let neg = f64::NEG_INFINITY;

  buffers.ensure(n1, n2, with_traceback);

  // Row 0 (written into the "current" rows; every row starts by swapping them away).
  buffers.m_curr[0] = 0.0;
  buffers.d_curr[0] = neg;
  buffers.i_curr[0] = neg;
  for j in 1..=n2 {
    buffers.m_curr[j] = neg;
    buffers.d_curr[j] = neg;
    buffers.i_curr[j] = if subject_free { 0.0 } else { go + j as f64 * ge };
  }

  let mut local_best = Optimum { i: 1, j: 1, plane: TRACE_SUBSTITUTION, score: neg };
  let mut col_best = Optimum { i: n1, j: n2, plane: TRACE_SUBSTITUTION, score: neg };
  let track_col = matches!(alignment_type, AlignmentType::Overlap | AlignmentType::PatternOverlap);

  for i in 1..=n1 {
    interrupt::checkpoint(cancel)?;
    mem::swap(&mut buffers.m_prev, &mut buffers.m_curr);
    mem::swap(&mut buffers.d_prev, &mut buffers.d_curr);
    mem::swap(&mut buffers.i_prev, &mut buffers.i_curr);
    buffers.m_curr[0] = neg;
    buffers.i_curr[0] = neg;
    buffers.d_curr[0] = if pattern_free { 0.0 } else { go + i as f64 * ge };

    for j in 1..=n2 {
      let substitution = prepared.substitution(i - 1, j - 1);

      let (best_prev, mut s_tag) =
        pick_plane(buffers.m_prev[j - 1], buffers.d_prev[j - 1], buffers.i_prev[j - 1]);
      let mut m_val = best_prev + substitution;

      let from_m = buffers.m_prev[j] + goe;
      let from_d = buffers.d_prev[j] + ge;
      let from_i = buffers.i_prev[j] + goe;
      let (d_val, mut d_tag) = if from_m >= from_d.max(from_i) {
        (from_m, TRACE_SUBSTITUTION)
      } else if from_d >= from_i {
        (from_d, TRACE_DELETION)
      } else {
        (from_i, TRACE_INSERTION)
      };

      let from_m = buffers.m_curr[j - 1] + goe;
      let from_d = buffers.d_curr[j - 1] + goe;
      let from_i = buffers.i_curr[j - 1] + ge;
      let (i_val, mut i_tag) = if from_m >= from_d.max(from_i) {
        (from_m, TRACE_SUBSTITUTION)
      } else if from_i >= from_d {
        (from_i, TRACE_INSERTION)
      } else {
        (from_d, TRACE_DELETION)
      };

      if local {
        if m_val <= 0.0 {
          m_val = 0.0;
          s_tag = TRACE_TERMINATION;
          d_tag = TRACE_TERMINATION;
          i_tag = TRACE_TERMINATION;
        }
        if m_val > local_best.score {
          local_best = Optimum { i, j, plane: TRACE_SUBSTITUTION, score: m_val };
        }
      }

      if with_traceback {
        let idx = (i - 1) * n2 + (j - 1);
        buffers.s_trace[idx] = s_tag;
        buffers.d_trace[idx] = d_tag;
        buffers.i_trace[idx] = i_tag;
      }

      buffers.m_curr[j] = m_val;
      buffers.d_curr[j] = d_val;
      buffers.i_curr[j] = i_val;
    }

    if track_col {
      let (score, plane) = pick_plane(buffers.m_curr[n2], buffers.d_curr[n2], buffers.i_curr[n2]);
      if score > col_best.score {
        col_best = Optimum { i, j: n2, plane, score };
      }
    }
  }

  // The current rows now hold row n1.
  let row_best = |buffers: &AlignBuffers| {
    let mut best = Optimum { i: n1, j: n2, plane: TRACE_SUBSTITUTION, score: neg };
    for j in 1..=n2 {
      let (score, plane) = pick_plane(buffers.m_curr[j], buffers.d_curr[j], buffers.i_curr[j]);
      if score > best.score {
        best = Optimum { i: n1, j, plane, score };
      }
    }
    best
  };

  Ok(match alignment_type {
    AlignmentType::Global => {
      let (score, plane) = pick_plane(buffers.m_curr[n2], buffers.d_curr[n2], buffers.i_curr[n2]);
      Optimum { i: n1, j: n2, plane, score }
    }
    AlignmentType::Local => local_best,
    AlignmentType::PatternOverlap => col_best,
    AlignmentType::SubjectOverlap => row_best(buffers),
    AlignmentType::Overlap => {
      let row = row_best(buffers);
      if row.score > col_best.score { row } else { col_best }
    }
  })
}

fn traceback(
  pattern_seq: &[u8],
  subject_seq: &[u8],
  params: &AlignmentParams,
  buffers: &AlignBuffers,
  optimum: Optimum,
) -> SeqResult<AlignedPair> {
  let n2 = subject_seq.len();
  let pattern_free = params.alignment_type.pattern_boundary_free();
  let subject_free = params.alignment_type.subject_boundary_free();

  let mut i = optimum.i;
  let mut j = optimum.j;
  let mut plane = optimum.plane;

  let mut pattern_mismatches: Vec<i32> = Vec::new();
  let mut subject_mismatches: Vec<i32> = Vec::new();
  // Indel runs collected right to left, keyed by the coordinate the gap run sits behind.
  let mut pattern_indels: Vec<(i32, i32)> = Vec::new();
  let mut subject_indels: Vec<(i32, i32)> = Vec::new();
  let mut ins_run: Option<(usize, i32)> = None;
  let mut del_run: Option<(usize, i32)> = None;

  loop {
    if i == 0 && j == 0 {
      break;
    }
    if j == 0 {
      // Only boundary gaps remain on the pattern side.
      if !pattern_free {
        if let Some((key, len)) = del_run.take() {
          subject_indels.push((key as i32 + 1, len));
        }
        subject_indels.push((1, i as i32));
        i = 0;
      }
      break;
    }
    if i == 0 {
      if !subject_free {
        if let Some((key, len)) = ins_run.take() {
          pattern_indels.push((key as i32 + 1, len));
        }
        pattern_indels.push((1, j as i32));
        j = 0;
      }
      break;
    }
    let idx = (i - 1) * n2 + (j - 1);
    match plane {
      TRACE_SUBSTITUTION => {
        let tag = buffers.s_trace[idx];
        if tag == TRACE_TERMINATION {
          break;
        }
        if let Some((key, len)) = del_run.take() {
          subject_indels.push((key as i32 + 1, len));
        }
        if let Some((key, len)) = ins_run.take() {
          pattern_indels.push((key as i32 + 1, len));
        }
        if pattern_seq[i - 1] != subject_seq[j - 1] {
          pattern_mismatches.push(i as i32);
          subject_mismatches.push(j as i32);
        }
        i -= 1;
        j -= 1;
        plane = tag;
      }
      TRACE_DELETION => {
        let tag = buffers.d_trace[idx];
        if tag == TRACE_TERMINATION {
          break;
        }
        if let Some((key, len)) = ins_run.take() {
          pattern_indels.push((key as i32 + 1, len));
        }
        del_run = Some(match del_run.take() {
          Some((key, len)) => (key, len + 1),
          None => (j, 1),
        });
        i -= 1;
        plane = tag;
      }
      TRACE_INSERTION => {
        let tag = buffers.i_trace[idx];
        if tag == TRACE_TERMINATION {
          break;
        }
        if let Some((key, len)) = del_run.take() {
          subject_indels.push((key as i32 + 1, len));
        }
        ins_run = Some(match ins_run.take() {
          Some((key, len)) => (key, len + 1),
          None => (i, 1),
        });
        j -= 1;
        plane = tag;
      }
      tag => {
        return Err(internal_error!("align", "unknown traceback code {tag}"));
      }
    }
  }
  if let Some((key, len)) = del_run.take() {
    subject_indels.push((key as i32 + 1, len));
  }
  if let Some((key, len)) = ins_run.take() {
    pattern_indels.push((key as i32 + 1, len));
  }

  let pattern_start = i + 1;
  let pattern_width = optimum.i - i;
  let subject_start = j + 1;
  let subject_width = optimum.j - j;

  // Walk order is right to left; flip everything and re-express positions within the
  // aligned ranges.
  pattern_mismatches.reverse();
  subject_mismatches.reverse();
  pattern_indels.reverse();
  subject_indels.reverse();
  for position in &mut pattern_mismatches {
    *position -= pattern_start as i32 - 1;
  }
  for position in &mut subject_mismatches {
    *position -= subject_start as i32 - 1;
  }
  for (start, _) in &mut pattern_indels {
    *start -= pattern_start as i32 - 1;
  }
  for (start, _) in &mut subject_indels {
    *start -= subject_start as i32 - 1;
  }

  Ok(AlignedPair {
    score: optimum.score,
    pattern: AlignedSeq::new(pattern_start, pattern_width, pattern_mismatches, &pattern_indels),
    subject: AlignedSeq::new(subject_start, subject_width, subject_mismatches, &subject_indels),
  })
}
