use crate::ranges::Ranges;
use crate::utils::error::{SeqError, SeqResult};

/// A set of zero-copy sequence views backed by one concatenated buffer, addressed by
/// per-element 1-based starts and widths. Element lookup is O(1) and order-stable.
#[derive(Clone, Debug)]
pub struct SeqSet<'a> {
  data: &'a [u8],
  ranges: Ranges,
}

impl<'a> SeqSet<'a> {
  pub fn new(data: &'a [u8], ranges: Ranges) -> SeqResult<Self> {
    for (start, width) in ranges.iter() {
      check_view(start, width, data.len())?;
    }
    Ok(Self { data, ranges })
  }

  /// The whole buffer as a single-element set.
  pub fn whole(data: &'a [u8]) -> Self {
    let mut ranges = Ranges::with_capacity(1);
    ranges.push(1, data.len() as i32);
    Self { data, ranges }
  }

  pub fn len(&self) -> usize {
    self.ranges.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ranges.is_empty()
  }

  pub fn get(&self, index: usize) -> &'a [u8] {
    let offset = (self.ranges.start(index) - 1) as usize;
    &self.data[offset..offset + self.ranges.width(index) as usize]
  }

  pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
    (0..self.len()).map(|index| self.get(index))
  }

  pub fn ranges(&self) -> &Ranges {
    &self.ranges
  }

  /// Applies a per-element `(start, width)` cut, yielding a set of sub-views over the same
  /// buffer. Starts are 1-based within each element.
  pub fn narrow(&self, starts: &[i32], widths: &[i32]) -> SeqResult<Self> {
    if starts.len() != self.len() || widths.len() != self.len() {
      return Err(SeqError::InvalidRangeSpec {
        message: "'starts' and 'widths' must have the same length as the set",
      });
    }
    let mut narrowed = Ranges::with_capacity(self.len());
    for index in 0..self.len() {
      let (start, width) = (starts[index], widths[index]);
      let elt_width = self.ranges.width(index);
      if start < 1 || width < 0 || start - 1 + width > elt_width {
        return Err(SeqError::ViewOutOfBounds {
          start,
          width,
          subject_length: elt_width as usize,
        });
      }
      narrowed.push(self.ranges.start(index) + start - 1, width);
    }
    Ok(Self { data: self.data, ranges: narrowed })
  }

  /// Precomputes one slice per element for hot loops.
  pub fn cached(&self) -> CachedSeqSet<'a> {
    CachedSeqSet { views: self.iter().collect() }
  }
}

/// A set of sequence views with every element's slice precomputed.
#[derive(Clone, Debug, Default)]
pub struct CachedSeqSet<'a> {
  views: Vec<&'a [u8]>,
}

impl<'a> CachedSeqSet<'a> {
  pub fn from_views(views: Vec<&'a [u8]>) -> Self {
    Self { views }
  }

  pub fn len(&self) -> usize {
    self.views.len()
  }

  pub fn is_empty(&self) -> bool {
    self.views.is_empty()
  }

  pub fn get(&self, index: usize) -> &'a [u8] {
    self.views[index]
  }

  pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
    self.views.iter().copied()
  }
}

pub(crate) fn check_view(start: i32, width: i32, subject_length: usize) -> SeqResult<()> {
  let offset = start - 1;
  if offset < 0 || width < 0 || (offset + width) as usize > subject_length {
    return Err(SeqError::ViewOutOfBounds { start, width, subject_length });
  }
  Ok(())
}
