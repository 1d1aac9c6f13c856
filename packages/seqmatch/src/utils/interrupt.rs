use crate::utils::error::{SeqError, SeqResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between a caller and a long-running operation.
///
/// The aligner polls the token at the start of each outer DP row and once per sequence in
/// batch operations. Matchers never poll; they are expected to complete or to be abandoned
/// together with their sink.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
  flag: Arc<AtomicBool>,
}

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.flag.store(true, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.flag.load(Ordering::Relaxed)
  }

  /// Raises `Cancelled` when the token has been tripped.
  pub fn checkpoint(&self) -> SeqResult<()> {
    if self.is_cancelled() {
      Err(SeqError::Cancelled)
    } else {
      Ok(())
    }
  }
}

/// Checkpoint helper for operations that take an optional token.
pub(crate) fn checkpoint(token: Option<&CancelToken>) -> SeqResult<()> {
  match token {
    Some(token) => token.checkpoint(),
    None => Ok(()),
  }
}
