use thiserror::Error;

/// Errors raised by the matching, preprocessing and alignment operations.
///
/// Capacity errors abort the current operation but leave previously built state consistent;
/// alphabet errors abort the current scan or build and carry the offending offset.
/// `InvariantViolation` indicates a bug, not bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
  #[error("empty pattern")]
  EmptyPattern,

  #[error("empty subject")]
  EmptySubject,

  #[error("empty dictionary")]
  EmptyDictionary,

  #[error("pattern {pattern_offset} has a different length than the first pattern")]
  InconsistentWidth { pattern_offset: usize },

  #[error("pattern {pattern_offset} has less than {required} letters")]
  InputTooShort { pattern_offset: usize, required: usize },

  #[error("view ({start}, {width}) is out of limits for a sequence of length {subject_length}")]
  ViewOutOfBounds { start: i32, width: i32, subject_length: usize },

  #[error("width of range {index} is too small for this narrowing")]
  NarrowingUnderflow { index: usize },

  #[error("invalid range specification: {message}")]
  InvalidRangeSpec { message: &'static str },

  #[error("letter {byte:#04x} at offset {offset} is not in the alphabet")]
  AlphabetError { offset: usize, byte: u8 },

  #[error("non base letter found in the trusted band of pattern {pattern_id}")]
  NonBaseInTrustedBand { pattern_id: usize },

  #[error("key {byte} not in lookup table")]
  KeyNotInLookupTable { byte: u8 },

  #[error("dictionary is too large (reduce its length or its width)")]
  DictionaryTooLarge,

  #[error("pattern width exceeds the maximum supported tree depth")]
  WidthTooLarge,

  #[error("node arena exhausted")]
  NodeArenaExhausted,

  #[error("extension arena exhausted")]
  ExtensionArenaExhausted,

  #[error("malformed preprocessed dictionary record: {message}")]
  MalformedRecord { message: &'static str },

  #[error("operation cancelled")]
  Cancelled,

  #[error("internal error in {component}: {message}")]
  InvariantViolation { component: &'static str, message: String },
}

pub type SeqResult<T> = Result<T, SeqError>;

/// Builds an `InvariantViolation` for conditions that indicate a bug rather than bad input.
#[macro_export]
macro_rules! internal_error {
  ($component:expr, $($arg:tt)*) => {
    $crate::utils::error::SeqError::InvariantViolation {
      component: $component,
      message: format!($($arg)*),
    }
  };
}
