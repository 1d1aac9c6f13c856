//! Trusted-band derivation: cropping a user-specified prefix and/or suffix off every input
//! pattern to obtain the constant-width dictionary the tree indexes.
//!
//! `start` and `end` give the 1-based positions of the band within each pattern; negative
//! values count from the pattern end. Four combinations are supported:
//!
//! * `1 <= start <= end` — fixed-width head, variable-width tail; every input needs at
//!   least `end` letters;
//! * `start <= end <= -1` — fixed-width tail, variable-width head; every input needs at
//!   least `-start` letters;
//! * `1 <= start`, `end` missing — inputs must already be of constant width, no tail;
//! * `start` missing, `end <= -1` — inputs must already be of constant width, no head.

use crate::utils::error::{SeqError, SeqResult};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CroppingKind {
  FixedHead { start: i32, end: i32 },
  FixedTail { start: i32, end: i32 },
  HeadOnly { start: i32 },
  TailOnly { end: i32 },
}

fn cropping_kind(start: Option<i32>, end: Option<i32>) -> SeqResult<CroppingKind> {
  if start == Some(0) {
    return Err(SeqError::InvalidRangeSpec {
      message: "'start' must be a single >= 1, <= -1 or missing integer",
    });
  }
  if end == Some(0) {
    return Err(SeqError::InvalidRangeSpec {
      message: "'end' must be a single >= 1, <= -1 or missing integer",
    });
  }
  match (start, end) {
    (None, None) => Err(SeqError::InvalidRangeSpec {
      message: "'start' and 'end' cannot both be missing",
    }),
    (Some(start), None) => {
      if start < 0 {
        return Err(SeqError::InvalidRangeSpec {
          message: "'start' must be positive when 'end' is missing",
        });
      }
      Ok(CroppingKind::HeadOnly { start })
    }
    (None, Some(end)) => {
      if end > 0 {
        return Err(SeqError::InvalidRangeSpec {
          message: "'end' must be negative when 'start' is missing",
        });
      }
      Ok(CroppingKind::TailOnly { end })
    }
    (Some(start), Some(end)) => {
      if (start > 0) != (end > 0) {
        return Err(SeqError::InvalidRangeSpec {
          message: "'start' and 'end' must have the same sign",
        });
      }
      if end < start {
        return Err(SeqError::InvalidRangeSpec {
          message: "'end' must be >= 'start'",
        });
      }
      Ok(if start > 0 {
        CroppingKind::FixedHead { start, end }
      } else {
        CroppingKind::FixedTail { start, end }
      })
    }
  }
}

/// Width extremes of the variable-width head or tail dropped by the cropping; empty for the
/// modes that drop nothing variable.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CroppingStats {
  pub head_min_width: Option<usize>,
  pub head_max_width: Option<usize>,
  pub tail_min_width: Option<usize>,
  pub tail_max_width: Option<usize>,
}

impl CroppingStats {
  fn record_head(&mut self, width: usize) {
    self.head_min_width = Some(self.head_min_width.map_or(width, |w| w.min(width)));
    self.head_max_width = Some(self.head_max_width.map_or(width, |w| w.max(width)));
  }

  fn record_tail(&mut self, width: usize) {
    self.tail_min_width = Some(self.tail_min_width.map_or(width, |w| w.min(width)));
    self.tail_max_width = Some(self.tail_max_width.map_or(width, |w| w.max(width)));
  }
}

/// The constant-width sub-views of the input patterns, ready for preprocessing.
#[derive(Clone, Debug)]
pub struct CroppedDict<'a> {
  pub views: Vec<&'a [u8]>,
  pub width: usize,
  pub stats: CroppingStats,
}

pub fn crop_dictionary<'a>(
  patterns: &[&'a [u8]],
  start: Option<i32>,
  end: Option<i32>,
) -> SeqResult<CroppedDict<'a>> {
  if patterns.is_empty() {
    return Err(SeqError::EmptyDictionary);
  }
  let kind = cropping_kind(start, end)?;
  let mut stats = CroppingStats::default();
  let mut views = Vec::with_capacity(patterns.len());

  // For the constant-width-input modes the first pattern resolves the band width.
  let mut resolved_len: Option<usize> = None;
  let mut width = match kind {
    CroppingKind::FixedHead { start, end } | CroppingKind::FixedTail { start, end } => (end - start + 1) as usize,
    CroppingKind::HeadOnly { .. } | CroppingKind::TailOnly { .. } => 0,
  };

  for (pattern_offset, &pattern) in patterns.iter().enumerate() {
    if pattern.is_empty() {
      return Err(SeqError::EmptyPattern);
    }
    let plen = pattern.len();
    match kind {
      CroppingKind::FixedHead { start, end } => {
        let required = end as usize;
        if plen < required {
          return Err(SeqError::InputTooShort { pattern_offset, required });
        }
        stats.record_tail(plen - required);
        let head_start = (start - 1) as usize;
        views.push(&pattern[head_start..head_start + width]);
      }
      CroppingKind::FixedTail { start, .. } => {
        let required = (-start) as usize;
        if plen < required {
          return Err(SeqError::InputTooShort { pattern_offset, required });
        }
        let head_width = plen - required;
        stats.record_head(head_width);
        views.push(&pattern[head_width..head_width + width]);
      }
      CroppingKind::HeadOnly { start } => {
        match resolved_len {
          None => {
            resolved_len = Some(plen);
            let band = plen as i32 - start + 1;
            if band < 1 {
              return Err(SeqError::InputTooShort { pattern_offset, required: start as usize });
            }
            width = band as usize;
          }
          Some(first_len) => {
            if plen != first_len {
              return Err(SeqError::InconsistentWidth { pattern_offset });
            }
          }
        }
        let head_start = (start - 1) as usize;
        views.push(&pattern[head_start..head_start + width]);
      }
      CroppingKind::TailOnly { end } => {
        match resolved_len {
          None => {
            resolved_len = Some(plen);
            let band = end + plen as i32 + 1;
            if band < 1 {
              return Err(SeqError::InputTooShort { pattern_offset, required: (-end) as usize });
            }
            width = band as usize;
          }
          Some(first_len) => {
            if plen != first_len {
              return Err(SeqError::InconsistentWidth { pattern_offset });
            }
          }
        }
        views.push(&pattern[0..width]);
      }
    }
  }

  debug!("cropped {} patterns to a trusted band of width {width}", patterns.len());
  Ok(CroppedDict { views, width, stats })
}

#[cfg(test)]
mod cropping_tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[test]
  fn fixed_head_crops_a_variable_tail() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACGTAC", b"TTTTT", b"GGGGGGG"];
    let cropped = crop_dictionary(&patterns, Some(2), Some(4))?;
    assert_eq!(cropped.width, 3);
    assert_eq!(cropped.views, vec![&b"CGT"[..], b"TTT", b"GGG"]);
    assert_eq!(cropped.stats.tail_min_width, Some(1));
    assert_eq!(cropped.stats.tail_max_width, Some(3));
    assert_eq!(cropped.stats.head_min_width, None);
    Ok(())
  }

  #[test]
  fn fixed_tail_crops_a_variable_head() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACGTAC", b"TTTTT"];
    let cropped = crop_dictionary(&patterns, Some(-3), Some(-1))?;
    assert_eq!(cropped.width, 3);
    assert_eq!(cropped.views, vec![&b"TAC"[..], b"TTT"]);
    assert_eq!(cropped.stats.head_min_width, Some(2));
    assert_eq!(cropped.stats.head_max_width, Some(3));
    Ok(())
  }

  #[test]
  fn head_only_requires_constant_width() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACGTA", b"TTTTT"];
    let cropped = crop_dictionary(&patterns, Some(3), None)?;
    assert_eq!(cropped.width, 3);
    assert_eq!(cropped.views, vec![&b"GTA"[..], b"TTT"]);
    assert_eq!(cropped.stats, CroppingStats::default());

    let ragged: Vec<&[u8]> = vec![b"ACGTA", b"TTTT"];
    let err = crop_dictionary(&ragged, Some(3), None).unwrap_err();
    assert_eq!(err, SeqError::InconsistentWidth { pattern_offset: 1 });
    Ok(())
  }

  #[test]
  fn tail_only_keeps_the_leading_band() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACGTA", b"TTTTT"];
    let cropped = crop_dictionary(&patterns, None, Some(-2))?;
    assert_eq!(cropped.width, 4);
    assert_eq!(cropped.views, vec![&b"ACGT"[..], b"TTTT"]);
    Ok(())
  }

  #[test]
  fn too_short_patterns_fail_with_the_requirement() {
    let patterns: Vec<&[u8]> = vec![b"ACGTAC", b"AC"];
    let err = crop_dictionary(&patterns, Some(2), Some(4)).unwrap_err();
    assert_eq!(err, SeqError::InputTooShort { pattern_offset: 1, required: 4 });
  }

  #[rstest]
  #[case(None, None)]
  #[case(Some(0), Some(3))]
  #[case(Some(-2), None)]
  #[case(None, Some(2))]
  #[case(Some(2), Some(-2))]
  #[case(Some(4), Some(2))]
  fn invalid_specs_are_rejected(#[case] start: Option<i32>, #[case] end: Option<i32>) {
    let patterns: Vec<&[u8]> = vec![b"ACGT"];
    assert!(matches!(
      crop_dictionary(&patterns, start, end),
      Err(SeqError::InvalidRangeSpec { .. })
    ));
  }

  #[test]
  fn empty_dictionary_is_rejected() {
    let patterns: Vec<&[u8]> = vec![];
    assert_eq!(
      crop_dictionary(&patterns, Some(1), None).unwrap_err(),
      SeqError::EmptyDictionary
    );
  }
}
