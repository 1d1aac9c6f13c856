//! (start, width) range arrays and their algebra: narrowing, reduction and
//! adjacent-range construction. Starts are 1-based and may be non-positive for ranges that
//! hang off the left end of their subject; widths are never negative.

use crate::utils::error::{SeqError, SeqResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ranges {
  starts: Vec<i32>,
  widths: Vec<i32>,
}

impl Ranges {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      starts: Vec::with_capacity(capacity),
      widths: Vec::with_capacity(capacity),
    }
  }

  pub fn from_vecs(starts: Vec<i32>, widths: Vec<i32>) -> SeqResult<Self> {
    if starts.len() != widths.len() {
      return Err(SeqError::InvalidRangeSpec {
        message: "'starts' and 'widths' must have the same length",
      });
    }
    if widths.iter().any(|&w| w < 0) {
      return Err(SeqError::InvalidRangeSpec {
        message: "'widths' must be >= 0",
      });
    }
    Ok(Self { starts, widths })
  }

  pub fn push(&mut self, start: i32, width: i32) {
    debug_assert!(width >= 0);
    self.starts.push(start);
    self.widths.push(width);
  }

  pub fn len(&self) -> usize {
    self.starts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.starts.is_empty()
  }

  pub fn clear(&mut self) {
    self.starts.clear();
    self.widths.clear();
  }

  pub fn start(&self, index: usize) -> i32 {
    self.starts[index]
  }

  pub fn width(&self, index: usize) -> i32 {
    self.widths[index]
  }

  /// Last position covered by the range; one less than the start for zero-width ranges.
  pub fn end(&self, index: usize) -> i32 {
    self.starts[index] + self.widths[index] - 1
  }

  pub fn starts(&self) -> &[i32] {
    &self.starts
  }

  pub fn widths(&self) -> &[i32] {
    &self.widths
  }

  pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
    self.starts.iter().copied().zip(self.widths.iter().copied())
  }

  /// Extracts the `(start, end, width)`-specified sub-range of every range.
  ///
  /// Exactly as with sequence narrowing: negative `start`/`end` values index from the range
  /// end, at most one of the three may be left out together with `width`, and any range too
  /// small for the requested cut fails with `NarrowingUnderflow`.
  pub fn narrow(&self, start: Option<i32>, end: Option<i32>, width: Option<i32>) -> SeqResult<Self> {
    let solved = solve_start_end(start, end, width)?;
    let mut ans = Self::with_capacity(self.len());
    for (index, (old_start, old_width)) in self.iter().enumerate() {
      let shift1 = if solved.start > 0 {
        solved.start - 1
      } else {
        solved.start + old_width
      };
      let shift2 = if solved.end < 0 {
        solved.end + 1
      } else {
        solved.end - old_width
      };
      let new_width = old_width - shift1 + shift2;
      if shift1 < 0 || shift2 > 0 || new_width < 0 {
        return Err(SeqError::NarrowingUnderflow { index });
      }
      ans.push(old_start + shift1, new_width);
    }
    Ok(ans)
  }

  /// Sorts by start and merges overlapping or abutting ranges (a gap of zero merges, a gap
  /// of one or more keeps a seam).
  ///
  /// When `with_inframe_start` is set, also returns for every input range its start
  /// re-expressed after the gaps to its left have been removed from the frame.
  pub fn reduce(&self, with_inframe_start: bool) -> Reduced {
    let order = (0..self.len()).sorted_by_key(|&i| self.starts[i]).collect_vec();
    let mut reduced = Ranges::new();
    let mut inframe_starts = with_inframe_start.then(|| vec![0; self.len()]);
    let mut max_end = 0;
    let mut inframe_offset = 0;
    for &j in &order {
      let (start, width) = (self.starts[j], self.widths[j]);
      let end = start + width - 1;
      let gap = start - max_end - 1;
      if reduced.is_empty() || gap > 0 {
        if reduced.is_empty() {
          inframe_offset = start - 1;
        } else {
          inframe_offset += gap;
        }
        reduced.push(start, width);
        max_end = end;
      } else if end > max_end {
        let last = reduced.len() - 1;
        reduced.widths[last] += end - max_end;
        max_end = end;
      }
      if let Some(inframe) = inframe_starts.as_mut() {
        inframe[j] = start - inframe_offset;
      }
    }
    Reduced { ranges: reduced, inframe_starts }
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reduced {
  pub ranges: Ranges,
  pub inframe_starts: Option<Vec<i32>>,
}

/// Ranges laid end to end: the i-th start is the sum of the preceding widths plus one.
pub fn adjacent_from_widths(widths: &[i32]) -> Ranges {
  let mut ans = Ranges::with_capacity(widths.len());
  let mut start = 1;
  for &width in widths {
    ans.push(start, width);
    start += width;
  }
  ans
}

#[derive(Clone, Copy, Debug)]
struct StartEnd {
  start: i32,
  end: i32,
}

/// Checks and simplifies user-specified `start`, `end`, `width` values into a resolved
/// (start, end) pair where negative values index from the range end.
fn solve_start_end(start: Option<i32>, end: Option<i32>, width: Option<i32>) -> SeqResult<StartEnd> {
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
  match width {
    None => {
      let start = start.unwrap_or(1);
      let end = end.unwrap_or(-1);
      if (end > 0 || start < 0) && end < start {
        return Err(SeqError::InvalidRangeSpec {
          message: "invalid ('start', 'end') combination",
        });
      }
      Ok(StartEnd { start, end })
    }
    Some(width) if width < 0 => Err(SeqError::InvalidRangeSpec {
      message: "'width' must be a single >= 0 or missing integer",
    }),
    Some(width) => match (start, end) {
      (None, None) | (Some(_), Some(_)) => Err(SeqError::InvalidRangeSpec {
        message: "either 'start' or 'end' (but not both) must be missing when 'width' is given",
      }),
      (None, Some(end)) => {
        if 0 < end && end < width {
          return Err(SeqError::InvalidRangeSpec {
            message: "invalid ('end', 'width') combination",
          });
        }
        Ok(StartEnd { start: end - width + 1, end })
      }
      (Some(start), None) => {
        if start < 0 && -start < width {
          return Err(SeqError::InvalidRangeSpec {
            message: "invalid ('start', 'width') combination",
          });
        }
        Ok(StartEnd { start, end: start + width - 1 })
      }
    },
  }
}
