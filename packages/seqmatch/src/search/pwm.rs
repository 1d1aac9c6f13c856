//! Position weight matrix scoring and thresholded scanning.

use crate::search::sink::MatchSink;
use crate::utils::error::{SeqError, SeqResult};

/// A 4 x width real matrix of per-position base weights, stored column by column.
#[derive(Clone, Debug, PartialEq)]
pub struct Pwm {
  weights: Vec<f64>,
  width: usize,
}

impl Pwm {
  /// `weights` holds the four row values of each column in turn (A, C, G, T row order of
  /// the base-code table the scanner is built with).
  pub fn new(weights: Vec<f64>, width: usize) -> SeqResult<Self> {
    if width == 0 || weights.len() != 4 * width {
      return Err(SeqError::InvalidRangeSpec {
        message: "'weights' must hold 4 rows for every matrix column",
      });
    }
    Ok(Self { weights, width })
  }

  pub fn width(&self) -> usize {
    self.width
  }

  #[inline]
  fn weight(&self, row: usize, column: usize) -> f64 {
    self.weights[4 * column + row]
  }
}

/// Scores a PWM across a subject of encoded letters.
///
/// Subject letters outside the four-base alphabet contribute 0 to a window score.
pub struct PwmScanner<'a> {
  pwm: &'a Pwm,
  byte2row: [Option<u8>; 256],
}

impl<'a> PwmScanner<'a> {
  /// `base_codes` maps row offsets 0..3 to the encoded bases occupying them.
  pub fn new(pwm: &'a Pwm, base_codes: [u8; 4]) -> Self {
    let mut byte2row = [None; 256];
    for (row, &code) in base_codes.iter().enumerate() {
      byte2row[code as usize] = Some(row as u8);
    }
    Self { pwm, byte2row }
  }

  /// Window score at a 0-based offset into the subject.
  pub fn score_at(&self, subject: &[u8], offset: usize) -> SeqResult<f64> {
    if subject.len() < offset + self.pwm.width() {
      return Err(SeqError::ViewOutOfBounds {
        start: offset as i32 + 1,
        width: self.pwm.width() as i32,
        subject_length: subject.len(),
      });
    }
    let mut score = 0.0;
    for (column, &code) in subject[offset..offset + self.pwm.width()].iter().enumerate() {
      if let Some(row) = self.byte2row[code as usize] {
        score += self.pwm.weight(row as usize, column);
      }
    }
    Ok(score)
  }

  /// Scores at caller-provided 1-based start positions.
  pub fn score_starting_at(&self, subject: &[u8], starts: &[i32]) -> SeqResult<Vec<f64>> {
    starts
      .iter()
      .map(|&start| {
        if start < 1 {
          return Err(SeqError::ViewOutOfBounds {
            start,
            width: self.pwm.width() as i32,
            subject_length: subject.len(),
          });
        }
        self.score_at(subject, (start - 1) as usize)
      })
      .collect()
  }

  /// Reports every window whose score reaches `min_score`.
  pub fn scan(&self, subject: &[u8], min_score: f64, sink: &mut MatchSink) -> SeqResult<()> {
    let width = self.pwm.width();
    if subject.len() < width {
      return Ok(());
    }
    for offset in 0..=(subject.len() - width) {
      if self.score_at(subject, offset)? >= min_score {
        sink.report(offset as i32 + 1, width as i32);
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod pwm_tests {
  use super::*;
  use crate::alphabet::ByteCodec;
  use crate::search::sink::{MatchReport, ReportMode};
  use eyre::Report;
  use pretty_assertions::assert_eq;

  // Columns strongly prefer A, C, G in turn.
  fn acg_pwm() -> Pwm {
    #[rustfmt::skip]
    let weights = vec![
      0.8, 0.1, 0.0, 0.1, // column 0
      0.1, 0.9, 0.0, 0.0, // column 1
      0.2, 0.0, 0.7, 0.1, // column 2
    ];
    Pwm::new(weights, 3).unwrap()
  }

  #[test]
  fn scores_windows_and_skips_non_bases() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pwm = acg_pwm();
    let scanner = PwmScanner::new(&pwm, codec.base_codes());
    let subject = codec.encode(b"ACGNCG")?;
    assert_eq!(scanner.score_at(&subject, 0)?, 0.8 + 0.9 + 0.7);
    // The N at offset 3 contributes nothing.
    assert_eq!(scanner.score_at(&subject, 3)?, 0.0 + 0.9 + 0.7);
    Ok(())
  }

  #[test]
  fn scan_reports_windows_reaching_the_threshold() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pwm = acg_pwm();
    let scanner = PwmScanner::new(&pwm, codec.base_codes());
    let subject = codec.encode(b"ACGACGT")?;
    let mut sink = MatchSink::new(ReportMode::Ranges);
    scanner.scan(&subject, 2.0, &mut sink)?;
    let MatchReport::Ranges(ranges) = sink.materialize() else {
      panic!("expected ranges");
    };
    assert_eq!(ranges.starts(), &[1, 4]);
    assert_eq!(ranges.widths(), &[3, 3]);
    Ok(())
  }

  #[test]
  fn rejects_invalid_starting_positions() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let pwm = acg_pwm();
    let scanner = PwmScanner::new(&pwm, codec.base_codes());
    let subject = codec.encode(b"ACGT")?;
    assert_eq!(
      scanner.score_starting_at(&subject, &[1, 2])?,
      vec![0.8 + 0.9 + 0.7, 0.1 + 0.0 + 0.1]
    );
    assert!(scanner.score_starting_at(&subject, &[3]).is_err());
    assert!(scanner.score_starting_at(&subject, &[0]).is_err());
    Ok(())
  }
}
