//! The Aho-Corasick 4-ary tree over a packed node arena.
//!
//! Every node occupies two 32-bit words. The attribs word holds the node depth (or the
//! pattern id for leaves) in its low 28 bits, the link tag of the single outgoing edge in
//! bits 28..29, a leaf bit and an extension bit. The payload word holds the single child's
//! node id, or the index of an extension record once the node needs more than one link.
//! A node that only needs one outgoing edge never pays for four: extension is triggered by
//! the second link or by the first failure-link write.
//!
//! Failure links are not computed at build time. The first time a transition needs one it
//! is derived by re-running the automaton from the root over the current window suffix,
//! then memoized in the node's extension. A read-only transition mode recomputes that
//! restart node on every miss instead, so concurrent readers never mutate the arena.

use crate::internal_error;
use crate::search::sink::MatchSink;
use crate::utils::error::{SeqError, SeqResult};
use log::debug;

pub const MAX_CHILDREN_PER_NODE: usize = 4;

const LINKTAG_BITSHIFT: u32 = 28;
const LINKTAG_BITMASK: u32 = 3 << LINKTAG_BITSHIFT;
/// Depths (pattern widths) are encoded on 28 bits.
pub const MAX_DEPTH: u32 = (1 << LINKTAG_BITSHIFT) - 1;
const ISLEAF_BIT: u32 = 1 << 30;
const ISEXTENDED_BIT: u32 = 1 << 31;
/// Pattern ids are encoded on 30 bits.
pub const MAX_PATTERN_ID: u32 = ISLEAF_BIT - 1;

const NO_NODE: i32 = -1;

pub(crate) const INTS_PER_NODE: usize = 2;
pub(crate) const INTS_PER_EXTENSION: usize = MAX_CHILDREN_PER_NODE + 1;
const MAX_NNODES: usize = i32::MAX as usize / INTS_PER_NODE;
const MAX_NEXTENSIONS: usize = i32::MAX as usize / INTS_PER_EXTENSION;

#[derive(Clone, Copy, Debug)]
struct AcNode {
  attribs: u32,
  payload: i32,
}

impl AcNode {
  fn interior(depth: u32) -> Self {
    Self { attribs: depth, payload: NO_NODE }
  }

  fn leaf(pattern_id: u32) -> Self {
    Self { attribs: ISLEAF_BIT | pattern_id, payload: NO_NODE }
  }

  #[inline]
  fn is_extended(self) -> bool {
    self.attribs & ISEXTENDED_BIT != 0
  }

  #[inline]
  fn is_leaf(self) -> bool {
    self.attribs & ISLEAF_BIT != 0
  }

  #[inline]
  fn depth(self) -> u32 {
    debug_assert!(!self.is_leaf());
    self.attribs & MAX_DEPTH
  }

  #[inline]
  fn pattern_id(self) -> u32 {
    debug_assert!(self.is_leaf());
    self.attribs & MAX_PATTERN_ID
  }

  /// Link tag of the single outgoing edge; meaningful only for non-extended nodes with a
  /// child.
  #[inline]
  fn single_link_tag(self) -> u8 {
    ((self.attribs & LINKTAG_BITMASK) >> LINKTAG_BITSHIFT) as u8
  }
}

#[derive(Clone, Copy, Debug)]
struct AcNodeExtension {
  link_nid: [i32; MAX_CHILDREN_PER_NODE],
  flink_nid: i32,
}

impl AcNodeExtension {
  fn new() -> Self {
    Self {
      link_nid: [NO_NODE; MAX_CHILDREN_PER_NODE],
      flink_nid: NO_NODE,
    }
  }
}

/// Link-count histogram and sizing bounds of a built tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AcTreeSummary {
  pub n_nodes: usize,
  pub n_leaves: usize,
  pub n_extensions: usize,
  /// Number of nodes with 0..=5 outgoing links (4 children + failure link).
  pub nodes_by_link_count: [usize; MAX_CHILDREN_PER_NODE + 2],
  pub max_needed_nnodes: usize,
  pub min_needed_nnodes: usize,
}

/// Upper bound on the node count for a dictionary of `n_leaves` unique patterns of width
/// `depth`: the sum over levels of min(4^level, n_leaves).
pub fn max_needed_nnodes(n_leaves: usize, depth: usize) -> usize {
  let mut nnodes = 0;
  let mut level_nodes = 1usize;
  for d in 0..=depth {
    if level_nodes >= n_leaves {
      return nnodes + (depth + 1 - d) * n_leaves;
    }
    nnodes += level_nodes;
    level_nodes *= MAX_CHILDREN_PER_NODE;
  }
  nnodes
}

/// Lower bound on the node count for the same dictionary shape.
pub fn min_needed_nnodes(n_leaves: usize, depth: usize) -> usize {
  let mut nnodes = 0;
  let mut level_nodes = n_leaves;
  for d in (0..=depth).rev() {
    if level_nodes == 1 {
      return nnodes + d + 1;
    }
    nnodes += level_nodes;
    level_nodes = level_nodes.div_ceil(MAX_CHILDREN_PER_NODE);
  }
  nnodes
}

/// Extensions that preprocessing itself can require: duplicated interior prefixes only
/// exist where the tree still branches, so 2^min(depth, log2(n_leaves) + 1) - 1 bounds
/// them.
fn max_needed_nextensions_at_pp_time(n_leaves: usize, depth: usize) -> usize {
  let mut nextensions = 1usize;
  for _ in 0..depth {
    if nextensions > n_leaves {
      break;
    }
    nextensions *= 2;
  }
  nextensions - 1
}

/// The packed trie. Built once from a constant-width dictionary, read-only afterwards
/// apart from failure links being filled in on demand.
#[derive(Clone, Debug)]
pub struct AcTree {
  depth: usize,
  nodes: Vec<AcNode>,
  extensions: Vec<AcNodeExtension>,
  char2linktag: [Option<u8>; 256],
  base_codes: [u8; MAX_CHILDREN_PER_NODE],
}

impl AcTree {
  /// Builds the tree from equal-width pattern views. Returns the tree together with the
  /// duplicate-to-unique map: entry `i` names the pattern id of the earlier identical
  /// pattern, if any.
  pub fn build(views: &[&[u8]], base_codes: [u8; MAX_CHILDREN_PER_NODE]) -> SeqResult<(Self, Vec<Option<u32>>)> {
    if views.is_empty() {
      return Err(SeqError::EmptyDictionary);
    }
    if views.len() > MAX_PATTERN_ID as usize {
      return Err(SeqError::DictionaryTooLarge);
    }
    let width = views[0].len();
    if width == 0 {
      return Err(SeqError::EmptyPattern);
    }
    if width > MAX_DEPTH as usize {
      return Err(SeqError::WidthTooLarge);
    }

    let n1 = max_needed_nnodes(views.len(), width);
    let n2 = max_needed_nextensions_at_pp_time(views.len(), width);
    if n1 >= MAX_NNODES || n2 >= MAX_NEXTENSIONS {
      return Err(SeqError::DictionaryTooLarge);
    }

    let mut char2linktag = [None; 256];
    for (tag, &code) in base_codes.iter().enumerate() {
      char2linktag[code as usize] = Some(tag as u8);
    }

    let mut tree = Self {
      depth: width,
      nodes: Vec::with_capacity(n1),
      extensions: Vec::with_capacity(n2),
      char2linktag,
      base_codes,
    };
    tree.nodes.push(AcNode::interior(0));

    let mut dup2unq = vec![None; views.len()];
    for (pattern_offset, &view) in views.iter().enumerate() {
      if view.len() != width {
        return Err(SeqError::InconsistentWidth { pattern_offset });
      }
      tree.add_pattern(view, pattern_offset, &mut dup2unq)?;
    }
    debug!(
      "built trie over {} patterns of width {width}: {} nodes, {} extensions",
      views.len(),
      tree.nodes.len(),
      tree.extensions.len()
    );
    Ok((tree, dup2unq))
  }

  fn add_pattern(&mut self, view: &[u8], pattern_offset: usize, dup2unq: &mut [Option<u32>]) -> SeqResult<()> {
    let pattern_id = pattern_offset as u32 + 1;
    let last = self.depth - 1;
    let mut nid = 0u32;
    for (depth, &byte) in view.iter().enumerate() {
      let Some(tag) = self.char2linktag[byte as usize] else {
        return Err(SeqError::NonBaseInTrustedBand { pattern_id: pattern_id as usize });
      };
      let child = self.link(nid, tag);
      if depth < last {
        nid = if child == NO_NODE {
          let new_nid = self.new_node(AcNode::interior(depth as u32 + 1))?;
          self.set_link(nid, tag, new_nid as i32)?;
          new_nid
        } else {
          child as u32
        };
      } else if child == NO_NODE {
        let leaf = self.new_node(AcNode::leaf(pattern_id))?;
        self.set_link(nid, tag, leaf as i32)?;
      } else {
        dup2unq[pattern_offset] = Some(self.nodes[child as usize].pattern_id());
      }
    }
    Ok(())
  }

  fn new_node(&mut self, node: AcNode) -> SeqResult<u32> {
    if self.nodes.len() >= MAX_NNODES {
      return Err(SeqError::NodeArenaExhausted);
    }
    self.nodes.push(node);
    Ok(self.nodes.len() as u32 - 1)
  }

  pub fn depth(&self) -> usize {
    self.depth
  }

  pub fn n_nodes(&self) -> usize {
    self.nodes.len()
  }

  pub fn n_extensions(&self) -> usize {
    self.extensions.len()
  }

  pub fn base_codes(&self) -> [u8; MAX_CHILDREN_PER_NODE] {
    self.base_codes
  }

  /// Child of `nid` along `tag`, or -1.
  fn link(&self, nid: u32, tag: u8) -> i32 {
    let node = self.nodes[nid as usize];
    if node.payload == NO_NODE {
      return NO_NODE;
    }
    if node.is_extended() {
      return self.extensions[node.payload as usize].link_nid[tag as usize];
    }
    // The node has no extension and is not a leaf (a leaf without an extension has no
    // payload).
    if tag == node.single_link_tag() {
      node.payload
    } else {
      NO_NODE
    }
  }

  fn set_link(&mut self, nid: u32, tag: u8, target: i32) -> SeqResult<()> {
    let node = self.nodes[nid as usize];
    if node.payload == NO_NODE && !node.is_leaf() {
      let node = &mut self.nodes[nid as usize];
      node.attribs |= u32::from(tag) << LINKTAG_BITSHIFT;
      node.payload = target;
      return Ok(());
    }
    if !node.is_extended() {
      self.extend_node(nid)?;
    }
    let eid = self.nodes[nid as usize].payload as usize;
    self.extensions[eid].link_nid[tag as usize] = target;
    Ok(())
  }

  fn flink(&self, nid: u32) -> i32 {
    let node = self.nodes[nid as usize];
    if !node.is_extended() {
      return NO_NODE;
    }
    self.extensions[node.payload as usize].flink_nid
  }

  fn set_flink(&mut self, nid: u32, target: i32) -> SeqResult<()> {
    if !self.nodes[nid as usize].is_extended() {
      self.extend_node(nid)?;
    }
    let eid = self.nodes[nid as usize].payload as usize;
    self.extensions[eid].flink_nid = target;
    Ok(())
  }

  /// Moves the node's single child (if any) into a fresh extension record.
  fn extend_node(&mut self, nid: u32) -> SeqResult<()> {
    if self.extensions.len() >= MAX_NEXTENSIONS {
      return Err(SeqError::ExtensionArenaExhausted);
    }
    let mut extension = AcNodeExtension::new();
    let node = self.nodes[nid as usize];
    debug_assert!(!node.is_extended());
    if node.payload != NO_NODE {
      // Only a non-leaf can carry a single child in its payload.
      extension.link_nid[node.single_link_tag() as usize] = node.payload;
    }
    self.extensions.push(extension);
    let eid = self.extensions.len() as i32 - 1;
    let node = &mut self.nodes[nid as usize];
    node.payload = eid;
    node.attribs |= ISEXTENDED_BIT;
    Ok(())
  }

  fn node_depth(&self, nid: u32) -> usize {
    let node = self.nodes[nid as usize];
    if node.is_leaf() {
      self.depth
    } else {
      node.depth() as usize
    }
  }

  /// One automaton step over the byte at `pos`, memoizing any failure link computed on the
  /// way. `nid` must be the state that matched the `depth(nid)` bytes before `pos`.
  fn transition(&mut self, mut nid: u32, subject: &[u8], pos: usize) -> SeqResult<u32> {
    let Some(tag) = self.char2linktag[subject[pos] as usize] else {
      // Letters outside the four bases have no transition anywhere: restart at the root.
      return Ok(0);
    };
    loop {
      let child = self.link(nid, tag);
      if child != NO_NODE {
        return Ok(child as u32);
      }
      if nid == 0 {
        return Ok(0);
      }
      nid = self.failure_target(nid, subject, pos)?;
    }
  }

  /// Failure link of `nid`, computed on first use by re-running the automaton from the
  /// root over the window suffix, then persisted in the node's extension.
  fn failure_target(&mut self, nid: u32, subject: &[u8], pos: usize) -> SeqResult<u32> {
    let memoized = self.flink(nid);
    if memoized != NO_NODE {
      return Ok(memoized as u32);
    }
    let depth = self.node_depth(nid);
    if depth == 0 || pos < depth {
      return Err(internal_error!(
        "actree",
        "failure link requested for node {nid} at depth {depth} with only {pos} scanned bytes"
      ));
    }
    let mut target = 0u32;
    for path_pos in pos + 1 - depth..pos {
      target = self.transition(target, subject, path_pos)?;
    }
    self.set_flink(nid, target as i32)?;
    Ok(target)
  }

  /// Non-mutating counterpart of `transition`: uses memoized failure links when present and
  /// otherwise recomputes the restart node from the root, without persisting it.
  fn transition_readonly(&self, mut nid: u32, subject: &[u8], pos: usize) -> SeqResult<u32> {
    let Some(tag) = self.char2linktag[subject[pos] as usize] else {
      return Ok(0);
    };
    loop {
      let child = self.link(nid, tag);
      if child != NO_NODE {
        return Ok(child as u32);
      }
      if nid == 0 {
        return Ok(0);
      }
      let memoized = self.flink(nid);
      if memoized != NO_NODE {
        nid = memoized as u32;
        continue;
      }
      let depth = self.node_depth(nid);
      if depth == 0 || pos < depth {
        return Err(internal_error!(
          "actree",
          "failure link requested for node {nid} at depth {depth} with only {pos} scanned bytes"
        ));
      }
      let mut target = 0u32;
      for path_pos in pos + 1 - depth..pos {
        target = self.transition_readonly(target, subject, path_pos)?;
      }
      nid = target;
    }
  }

  /// Scans `subject`, reporting a `(start, width)` range per hit into the sink and the
  /// representative pattern id of each hit into `pattern_ids`.
  pub fn scan(&mut self, subject: &[u8], sink: &mut MatchSink, pattern_ids: &mut Vec<u32>) -> SeqResult<()> {
    let width = self.depth as i32;
    let mut nid = 0u32;
    for pos in 0..subject.len() {
      nid = self.transition(nid, subject, pos)?;
      let node = self.nodes[nid as usize];
      if node.is_leaf() {
        pattern_ids.push(node.pattern_id());
        sink.report(pos as i32 + 2 - width, width);
      }
    }
    Ok(())
  }

  /// As `scan`, but never mutates the arena; safe for concurrent readers.
  pub fn scan_readonly(&self, subject: &[u8], sink: &mut MatchSink, pattern_ids: &mut Vec<u32>) -> SeqResult<()> {
    let width = self.depth as i32;
    let mut nid = 0u32;
    for pos in 0..subject.len() {
      nid = self.transition_readonly(nid, subject, pos)?;
      let node = self.nodes[nid as usize];
      if node.is_leaf() {
        pattern_ids.push(node.pattern_id());
        sink.report(pos as i32 + 2 - width, width);
      }
    }
    Ok(())
  }

  /// Descends from the root along encoded `path` letters without using failure links.
  /// Returns the reached node's pattern id when it is a leaf.
  pub fn lookup_pattern(&self, path: &[u8]) -> Option<u32> {
    let mut nid = 0u32;
    for &byte in path {
      let tag = self.char2linktag[byte as usize]?;
      let child = self.link(nid, tag);
      if child == NO_NODE {
        return None;
      }
      nid = child as u32;
    }
    let node = self.nodes[nid as usize];
    node.is_leaf().then(|| node.pattern_id())
  }

  fn node_link_count(&self, nid: u32) -> usize {
    let mut count = if self.flink(nid) == NO_NODE { 0 } else { 1 };
    for tag in 0..MAX_CHILDREN_PER_NODE as u8 {
      if self.link(nid, tag) != NO_NODE {
        count += 1;
      }
    }
    count
  }

  pub fn summary(&self) -> AcTreeSummary {
    let mut nodes_by_link_count = [0usize; MAX_CHILDREN_PER_NODE + 2];
    let mut n_leaves = 0;
    for nid in 0..self.nodes.len() as u32 {
      nodes_by_link_count[self.node_link_count(nid)] += 1;
      if self.nodes[nid as usize].is_leaf() {
        n_leaves += 1;
      }
    }
    AcTreeSummary {
      n_nodes: self.nodes.len(),
      n_leaves,
      n_extensions: self.extensions.len(),
      nodes_by_link_count,
      max_needed_nnodes: max_needed_nnodes(n_leaves, self.depth),
      min_needed_nnodes: min_needed_nnodes(n_leaves, self.depth),
    }
  }

  /// Flattens the arenas into the integer-vector layout of the serialized record.
  pub(crate) fn to_words(&self) -> (Vec<i32>, Vec<i32>) {
    let mut nodes = Vec::with_capacity(self.nodes.len() * INTS_PER_NODE);
    for node in &self.nodes {
      nodes.push(node.attribs as i32);
      nodes.push(node.payload);
    }
    let mut extensions = Vec::with_capacity(self.extensions.len() * INTS_PER_EXTENSION);
    for extension in &self.extensions {
      extensions.extend_from_slice(&extension.link_nid);
      extensions.push(extension.flink_nid);
    }
    (nodes, extensions)
  }

  /// Rebuilds the arenas from the integer-vector layout of the serialized record.
  pub(crate) fn from_words(
    depth: usize,
    node_words: &[i32],
    extension_words: &[i32],
    n_extensions: usize,
    base_codes: [u8; MAX_CHILDREN_PER_NODE],
  ) -> SeqResult<Self> {
    if depth == 0 || depth > MAX_DEPTH as usize {
      return Err(SeqError::MalformedRecord { message: "width out of range" });
    }
    if node_words.len() % INTS_PER_NODE != 0 || node_words.is_empty() {
      return Err(SeqError::MalformedRecord { message: "truncated node words" });
    }
    if extension_words.len() < n_extensions * INTS_PER_EXTENSION {
      return Err(SeqError::MalformedRecord { message: "truncated extension words" });
    }
    let nodes = node_words
      .chunks_exact(INTS_PER_NODE)
      .map(|chunk| AcNode { attribs: chunk[0] as u32, payload: chunk[1] })
      .collect();
    let extensions = extension_words[..n_extensions * INTS_PER_EXTENSION]
      .chunks_exact(INTS_PER_EXTENSION)
      .map(|chunk| AcNodeExtension {
        link_nid: [chunk[0], chunk[1], chunk[2], chunk[3]],
        flink_nid: chunk[4],
      })
      .collect();
    let mut char2linktag = [None; 256];
    for (tag, &code) in base_codes.iter().enumerate() {
      char2linktag[code as usize] = Some(tag as u8);
    }
    Ok(Self {
      depth,
      nodes,
      extensions,
      char2linktag,
      base_codes,
    })
  }
}

#[cfg(test)]
mod actree_tests {
  use super::*;
  use crate::alphabet::ByteCodec;
  use crate::search::sink::{MatchReport, ReportMode};
  use eyre::Report;
  use pretty_assertions::assert_eq;

  fn encode_views(patterns: &[&[u8]]) -> Result<Vec<Vec<u8>>, Report> {
    let codec = ByteCodec::dna();
    Ok(patterns.iter().map(|p| codec.encode(p)).collect::<Result<_, _>>()?)
  }

  fn build(patterns: &[&[u8]]) -> Result<(AcTree, Vec<Option<u32>>), Report> {
    let _ = env_logger::builder().is_test(true).try_init();
    let encoded = encode_views(patterns)?;
    let views: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
    Ok(AcTree::build(&views, ByteCodec::dna().base_codes())?)
  }

  fn scan_hits(tree: &mut AcTree, subject: &[u8]) -> Result<Vec<(i32, i32, u32)>, Report> {
    let encoded = ByteCodec::dna().encode(subject)?;
    let mut sink = MatchSink::new(ReportMode::Ranges);
    let mut ids = Vec::new();
    tree.scan(&encoded, &mut sink, &mut ids)?;
    let MatchReport::Ranges(ranges) = sink.materialize() else {
      panic!("expected ranges");
    };
    Ok(
      ranges
        .iter()
        .zip(ids)
        .map(|((start, width), id)| (start, width, id))
        .collect(),
    )
  }

  #[test]
  fn every_unique_pattern_descends_to_its_leaf() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACG", b"ACT", b"GCA"];
    let (tree, dup2unq) = build(&patterns)?;
    let codec = ByteCodec::dna();
    for (offset, pattern) in patterns.iter().enumerate() {
      let encoded = codec.encode(pattern)?;
      assert_eq!(tree.lookup_pattern(&encoded), Some(offset as u32 + 1));
    }
    assert_eq!(dup2unq, vec![None, None, None]);
    Ok(())
  }

  #[test]
  fn scan_reports_every_occurrence() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACG", b"ACT", b"GCA"];
    let (mut tree, _) = build(&patterns)?;
    let mut hits = scan_hits(&mut tree, b"ACGTACTGCA")?;
    hits.sort_unstable();
    assert_eq!(hits, vec![(1, 3, 1), (5, 3, 2), (8, 3, 3)]);
    Ok(())
  }

  #[test]
  fn overlapping_matches_use_failure_links() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"AA"];
    let (mut tree, _) = build(&patterns)?;
    let hits = scan_hits(&mut tree, b"AAAA")?;
    assert_eq!(hits, vec![(1, 2, 1), (2, 2, 1), (3, 2, 1)]);
    Ok(())
  }

  #[test]
  fn duplicates_map_to_the_representative() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACG", b"TTT", b"ACG"];
    let (mut tree, dup2unq) = build(&patterns)?;
    assert_eq!(dup2unq, vec![None, None, Some(1)]);
    let hits = scan_hits(&mut tree, b"ACG")?;
    assert_eq!(hits, vec![(1, 3, 1)]);
    Ok(())
  }

  #[test]
  fn scanning_each_member_against_itself_hits_position_one() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACGT", b"TGCA", b"GGGG"];
    let (mut tree, _) = build(&patterns)?;
    for (offset, pattern) in patterns.iter().enumerate() {
      let hits = scan_hits(&mut tree, pattern)?;
      assert_eq!(hits, vec![(1, 4, offset as u32 + 1)]);
    }
    Ok(())
  }

  #[test]
  fn unknown_subject_letters_reset_to_the_root() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACG"];
    let (mut tree, _) = build(&patterns)?;
    let hits = scan_hits(&mut tree, b"ACNACGT")?;
    assert_eq!(hits, vec![(4, 3, 1)]);
    Ok(())
  }

  #[test]
  fn readonly_scan_agrees_with_memoizing_scan() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACAC", b"CACA", b"TTTT"];
    let (mut tree, _) = build(&patterns)?;
    let codec = ByteCodec::dna();
    let subject = codec.encode(b"ACACACATTTTTACAC")?;

    let mut readonly_sink = MatchSink::new(ReportMode::Ranges);
    let mut readonly_ids = Vec::new();
    let extensions_before = tree.n_extensions();
    tree.scan_readonly(&subject, &mut readonly_sink, &mut readonly_ids)?;
    assert_eq!(tree.n_extensions(), extensions_before);

    let mut sink = MatchSink::new(ReportMode::Ranges);
    let mut ids = Vec::new();
    tree.scan(&subject, &mut sink, &mut ids)?;

    assert_eq!(readonly_sink.materialize(), sink.materialize());
    assert_eq!(readonly_ids, ids);
    Ok(())
  }

  #[test]
  fn non_base_letters_in_patterns_are_rejected() -> Result<(), Report> {
    let encoded = encode_views(&[b"ACG", b"ANT"])?;
    let views: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
    let err = AcTree::build(&views, ByteCodec::dna().base_codes()).unwrap_err();
    assert_eq!(err, SeqError::NonBaseInTrustedBand { pattern_id: 2 });
    Ok(())
  }

  #[test]
  fn ragged_and_empty_dictionaries_are_rejected() -> Result<(), Report> {
    let encoded = encode_views(&[b"ACG", b"AC"])?;
    let views: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
    assert_eq!(
      AcTree::build(&views, ByteCodec::dna().base_codes()).unwrap_err(),
      SeqError::InconsistentWidth { pattern_offset: 1 }
    );
    assert_eq!(
      AcTree::build(&[], ByteCodec::dna().base_codes()).unwrap_err(),
      SeqError::EmptyDictionary
    );
    let empty: Vec<&[u8]> = vec![b""];
    assert_eq!(
      AcTree::build(&empty, ByteCodec::dna().base_codes()).unwrap_err(),
      SeqError::EmptyPattern
    );
    Ok(())
  }

  #[test]
  fn single_chain_needs_no_extensions_until_scanned() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACGT"];
    let (tree, _) = build(&patterns)?;
    // A one-pattern dictionary is a bare chain: every node carries at most one link.
    assert_eq!(tree.n_extensions(), 0);
    assert_eq!(tree.n_nodes(), 5);
    let summary = tree.summary();
    assert_eq!(summary.n_leaves, 1);
    assert_eq!(summary.nodes_by_link_count[0], 1);
    assert_eq!(summary.nodes_by_link_count[1], 4);
    Ok(())
  }

  #[test]
  fn sizing_bounds_bracket_the_actual_node_count() -> Result<(), Report> {
    let patterns: Vec<&[u8]> = vec![b"ACG", b"ACT", b"GCA", b"GCT"];
    let (tree, _) = build(&patterns)?;
    let summary = tree.summary();
    assert!(summary.min_needed_nnodes <= summary.n_nodes);
    assert!(summary.n_nodes <= summary.max_needed_nnodes);
    Ok(())
  }
}
