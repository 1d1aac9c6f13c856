pub mod batch;
pub mod buffers;
pub mod pairwise;
pub mod params;
pub mod scoring;

pub use batch::{align_distance, align_set, align_set_scores};
pub use buffers::AlignBuffers;
pub use pairwise::{AlignedPair, AlignedSeq, align, align_score};
pub use params::{AlignmentParams, AlignmentType, GapPenalties};
pub use scoring::{AlignInput, ConstantScoring, IndexLookup, QualityScoring, Scoring};
