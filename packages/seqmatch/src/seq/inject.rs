use crate::ranges::Ranges;
use crate::seq::set::check_view;
use crate::utils::error::SeqResult;

/// Copies `seq` and overwrites every `(start, width)` range with `code` (hard-masking).
pub fn inject_code(seq: &[u8], ranges: &Ranges, code: u8) -> SeqResult<Vec<u8>> {
  let mut ans = seq.to_vec();
  for (start, width) in ranges.iter() {
    check_view(start, width, seq.len())?;
    let offset = (start - 1) as usize;
    ans[offset..offset + width as usize].fill(code);
  }
  Ok(ans)
}

#[cfg(test)]
mod inject_tests {
  use super::*;
  use crate::utils::error::SeqError;
  use eyre::Report;
  use pretty_assertions::assert_eq;

  #[test]
  fn masks_the_given_ranges() -> Result<(), Report> {
    let mut ranges = Ranges::new();
    ranges.push(2, 3);
    ranges.push(7, 1);
    assert_eq!(inject_code(b"ACGTACGT", &ranges, b'N')?, b"ANNNACNT".to_vec());
    Ok(())
  }

  #[test]
  fn rejects_ranges_outside_the_sequence() {
    let mut ranges = Ranges::new();
    ranges.push(7, 3);
    let err = inject_code(b"ACGTACGT", &ranges, b'N').unwrap_err();
    assert_eq!(
      err,
      SeqError::ViewOutOfBounds { start: 7, width: 3, subject_length: 8 }
    );
  }
}
