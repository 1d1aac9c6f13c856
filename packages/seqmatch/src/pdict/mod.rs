pub mod actree;
pub mod cropping;

pub use actree::{AcTree, AcTreeSummary};
pub use cropping::{CroppedDict, CroppingStats, crop_dictionary};

use crate::pdict::actree::MAX_CHILDREN_PER_NODE;
use crate::search::sink::MatchSink;
use crate::utils::error::{SeqError, SeqResult};
use serde::{Deserialize, Serialize};

/// A preprocessed constant-width dictionary: the packed trie plus the duplicate map and the
/// cropping statistics.
#[derive(Clone, Debug)]
pub struct PDict {
  tree: AcTree,
  dup2unq: Vec<Option<u32>>,
  stats: CroppingStats,
}

/// The serialized form of a preprocessed dictionary, suitable for snapshotting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessedDict {
  pub width: usize,
  /// Two 32-bit words per node.
  pub nodes: Vec<i32>,
  /// Five 32-bit words per extension; only the first `n_extensions` records are meaningful.
  pub extensions: Vec<i32>,
  pub n_extensions: usize,
  /// Encoded base occupying each of the four child slots.
  pub base_codes: [u8; MAX_CHILDREN_PER_NODE],
  /// Per input pattern, the id of the earlier identical pattern it duplicates, if any.
  pub dup2unq: Vec<Option<u32>>,
  pub stats: CroppingStats,
}

impl PDict {
  /// Crops the trusted band out of every pattern (when `start`/`end` are given) and builds
  /// the trie over the resulting constant-width dictionary. With neither bound given the
  /// patterns are indexed whole and must already be of constant width.
  pub fn preprocess(
    patterns: &[&[u8]],
    start: Option<i32>,
    end: Option<i32>,
    base_codes: [u8; MAX_CHILDREN_PER_NODE],
  ) -> SeqResult<Self> {
    if start.is_none() && end.is_none() {
      if patterns.is_empty() {
        return Err(SeqError::EmptyDictionary);
      }
      let (tree, dup2unq) = AcTree::build(patterns, base_codes)?;
      return Ok(Self { tree, dup2unq, stats: CroppingStats::default() });
    }
    let cropped = crop_dictionary(patterns, start, end)?;
    let (tree, dup2unq) = AcTree::build(&cropped.views, base_codes)?;
    Ok(Self { tree, dup2unq, stats: cropped.stats })
  }

  pub fn width(&self) -> usize {
    self.tree.depth()
  }

  pub fn tree(&self) -> &AcTree {
    &self.tree
  }

  pub fn stats(&self) -> &CroppingStats {
    &self.stats
  }

  pub fn dup2unq(&self) -> &[Option<u32>] {
    &self.dup2unq
  }

  /// The pattern ids a reported representative id stands for: itself plus its duplicates.
  pub fn expand_hit(&self, pattern_id: u32) -> Vec<u32> {
    let mut ids = vec![pattern_id];
    for (offset, unq) in self.dup2unq.iter().enumerate() {
      if *unq == Some(pattern_id) {
        ids.push(offset as u32 + 1);
      }
    }
    ids
  }

  /// Scans a subject, memoizing failure links in the trie as they are first needed.
  pub fn scan(&mut self, subject: &[u8], sink: &mut MatchSink, pattern_ids: &mut Vec<u32>) -> SeqResult<()> {
    self.tree.scan(subject, sink, pattern_ids)
  }

  /// Scans without mutating the trie; safe for concurrent readers of a shared dictionary.
  pub fn scan_readonly(&self, subject: &[u8], sink: &mut MatchSink, pattern_ids: &mut Vec<u32>) -> SeqResult<()> {
    self.tree.scan_readonly(subject, sink, pattern_ids)
  }

  pub fn summary(&self) -> AcTreeSummary {
    self.tree.summary()
  }

  /// Snapshots the dictionary into its serialized record.
  pub fn to_record(&self) -> PreprocessedDict {
    let (nodes, extensions) = self.tree.to_words();
    PreprocessedDict {
      width: self.tree.depth(),
      nodes,
      n_extensions: self.tree.n_extensions(),
      extensions,
      base_codes: self.tree.base_codes(),
      dup2unq: self.dup2unq.clone(),
      stats: self.stats,
    }
  }

  /// Rebuilds a dictionary from a snapshot record.
  pub fn from_record(record: &PreprocessedDict) -> SeqResult<Self> {
    let tree = AcTree::from_words(
      record.width,
      &record.nodes,
      &record.extensions,
      record.n_extensions,
      record.base_codes,
    )?;
    Ok(Self {
      tree,
      dup2unq: record.dup2unq.clone(),
      stats: record.stats,
    })
  }
}
