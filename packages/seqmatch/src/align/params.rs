use serde::{Deserialize, Serialize};

/// Which ends of the two sequences must be aligned.
///
/// `Overlap` leaves both sequences free to dangle past each other; `PatternOverlap` and
/// `SubjectOverlap` free only the named sequence's ends. Free boundary cells score 0
/// rather than the opened-gap penalty.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentType {
  Global,
  Local,
  Overlap,
  PatternOverlap,
  SubjectOverlap,
}

impl AlignmentType {
  /// Whether unaligned pattern flanks are free of gap penalties.
  pub(crate) fn pattern_boundary_free(self) -> bool {
    matches!(self, Self::Local | Self::Overlap | Self::PatternOverlap)
  }

  /// Whether unaligned subject flanks are free of gap penalties.
  pub(crate) fn subject_boundary_free(self) -> bool {
    matches!(self, Self::Local | Self::Overlap | Self::SubjectOverlap)
  }
}

/// Affine gap costs, both passed as non-positive numbers added to the score. A gap of
/// length L contributes `opening + L * extension`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapPenalties {
  /// One-time penalty for opening a gap.
  pub opening: f64,
  /// Penalty for every residue a gap spans. If zero, all gaps cost the same regardless of
  /// length.
  pub extension: f64,
}

impl Default for GapPenalties {
  fn default() -> Self {
    Self { opening: -10.0, extension: -4.0 }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentParams {
  pub alignment_type: AlignmentType,
  pub gap: GapPenalties,
}

impl Default for AlignmentParams {
  fn default() -> Self {
    Self {
      alignment_type: AlignmentType::Global,
      gap: GapPenalties::default(),
    }
  }
}

impl AlignmentParams {
  pub fn new(alignment_type: AlignmentType, opening: f64, extension: f64) -> Self {
    Self {
      alignment_type,
      gap: GapPenalties { opening, extension },
    }
  }
}
