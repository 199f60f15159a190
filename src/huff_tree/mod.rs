/*! Construction of a Huffman tree by greedy merging of the two lightest nodes.

The tree lives in an arena: nodes refer to their children by index, and the
root is the last node created. Symbols the caller marks as pass-through are
never counted and therefore never receive a leaf.
*/

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;
use thiserror::Error;

use crate::min_heap::{HeapError, MinHeap};

/// Index of a node within a `HuffTree`
pub type NodeId = usize;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HuffTreeError {
  #[error("Cannot build a Huffman tree: the input has no codable symbols")]
  EmptyInput,
  #[error("Priority queue failure: {0}")]
  Heap(#[from] HeapError),
}

/// Occurrence counts for each symbol, remembered in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqTable<S: Eq + Hash> {
  order: Vec<S>,
  counts: HashMap<S, usize>,
}

impl<S> FreqTable<S>
where
  S: Eq + Hash + Clone,
{
  /// Count the symbols in `src`, skipping any for which `is_passthrough` holds
  pub fn from_symbols(src: &[S], is_passthrough: impl Fn(&S) -> bool) -> Self {
    let mut order = Vec::new();
    let mut counts: HashMap<S, usize> = HashMap::new();
    for sym in src.iter().filter(|s| !is_passthrough(*s)) {
      let count = counts.entry(sym.clone()).or_insert_with(|| {
        order.push(sym.clone());
        0
      });
      *count += 1;
    }
    Self { order, counts }
  }

  pub fn get(&self, sym: &S) -> Option<usize> {
    self.counts.get(sym).copied()
  }

  /// Number of distinct symbols
  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub fn total(&self) -> usize {
    self.counts.values().sum()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&S, usize)> + '_ {
    self.order.iter().map(move |s| (s, self.counts[s]))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode<S> {
  Leaf {
    sym: S,
    weight: usize,
  },
  Internal {
    weight: usize,
    left: NodeId,
    right: NodeId,
  },
}

impl<S> HuffNode<S> {
  pub fn weight(&self) -> usize {
    match self {
      HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
    }
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self, HuffNode::Leaf { .. })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree<S> {
  nodes: Vec<HuffNode<S>>,
  root: NodeId,
}

/// A renderer-friendly projection of a tree, suitable for graph-drawing tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeView {
  pub name: String,
  pub weight: usize,
  pub children: Vec<TreeView>,
}

impl<S> HuffTree<S>
where
  S: Eq + Hash + Clone + Debug,
{
  /// Build a tree directly from input, ignoring pass-through symbols
  pub fn from_symbols(
    src: &[S],
    is_passthrough: impl Fn(&S) -> bool,
  ) -> Result<Self, HuffTreeError> {
    Self::from_freqs(&FreqTable::from_symbols(src, is_passthrough))
  }

  pub fn from_freqs(freqs: &FreqTable<S>) -> Result<Self, HuffTreeError> {
    if freqs.is_empty() {
      return Err(HuffTreeError::EmptyInput);
    }

    let mut nodes = Vec::with_capacity(2 * freqs.len() - 1);
    let mut heap = MinHeap::new();
    for (sym, weight) in freqs.iter() {
      heap.insert(weight, nodes.len());
      nodes.push(HuffNode::Leaf {
        sym: sym.clone(),
        weight,
      });
    }

    while heap.len() > 1 {
      let left = heap.extract_min()?;
      let right = heap.extract_min()?;
      let weight = left.weight + right.weight;
      log::trace!(
        "Merging nodes {} ({}) and {} ({}) into {}",
        left.payload,
        left.weight,
        right.payload,
        right.weight,
        nodes.len()
      );
      heap.insert(weight, nodes.len());
      nodes.push(HuffNode::Internal {
        weight,
        left: left.payload,
        right: right.payload,
      });
    }

    let root = heap.extract_min()?.payload;
    log::debug!(
      "Built Huffman tree over {} symbols with {} nodes",
      freqs.len(),
      nodes.len()
    );
    Ok(Self { nodes, root })
  }

  pub fn root(&self) -> NodeId {
    self.root
  }

  pub fn node(&self, id: NodeId) -> &HuffNode<S> {
    &self.nodes[id]
  }

  /// Total weight of the tree, i.e. the number of coded symbols in the input
  pub fn weight(&self) -> usize {
    self.nodes[self.root].weight()
  }

  pub fn num_nodes(&self) -> usize {
    self.nodes.len()
  }

  pub fn leaves(&self) -> impl Iterator<Item = (&S, usize)> + '_ {
    self.nodes.iter().filter_map(|n| match n {
      HuffNode::Leaf { sym, weight } => Some((sym, *weight)),
      HuffNode::Internal { .. } => None,
    })
  }

  /// Length of the longest root-to-leaf path. A lone leaf has depth zero.
  pub fn depth(&self) -> usize {
    let mut max = 0;
    let mut stack = vec![(self.root, 0usize)];
    while let Some((id, d)) = stack.pop() {
      match &self.nodes[id] {
        HuffNode::Leaf { .. } => max = max.max(d),
        HuffNode::Internal { left, right, .. } => {
          stack.push((*left, d + 1));
          stack.push((*right, d + 1));
        }
      }
    }
    max
  }

  /// Project the tree into nested `TreeView`s. Leaves are labelled with their
  /// symbol and weight, internal nodes with their weight alone.
  pub fn to_view(&self) -> TreeView
  where
    S: std::fmt::Display,
  {
    self.view_of(self.root)
  }

  fn view_of(&self, id: NodeId) -> TreeView
  where
    S: std::fmt::Display,
  {
    match &self.nodes[id] {
      HuffNode::Leaf { sym, weight } => TreeView {
        name: format!("{} ({})", sym, weight),
        weight: *weight,
        children: Vec::new(),
      },
      HuffNode::Internal {
        weight,
        left,
        right,
      } => TreeView {
        name: weight.to_string(),
        weight: *weight,
        children: vec![self.view_of(*left), self.view_of(*right)],
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use quickcheck_macros::quickcheck;

  fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  #[test]
  fn freqcount_skips_passthrough() {
    let text = chars("aa b cab");
    let freqs = FreqTable::from_symbols(&text, |c| *c == ' ');
    let counted: Vec<(char, usize)> = freqs.iter().map(|(c, n)| (*c, n)).collect();
    assert_eq!(counted, vec![('a', 3), ('b', 2), ('c', 1)]);
    assert_eq!(freqs.get(&' '), None);
    assert_eq!(freqs.total(), 6);
  }

  #[test]
  fn hufftree_1() {
    let tree = HuffTree::from_symbols(&chars("aaaaabbc"), |_| false).unwrap();
    // Leaves a(5), b(2), c(1): c and b merge first, then (3) with a
    let root = tree.node(tree.root());
    match root {
      HuffNode::Internal { weight, left, right } => {
        assert_eq!(*weight, 8);
        match tree.node(*left) {
          HuffNode::Internal { left, right, .. } => {
            assert_eq!(tree.node(*left), &HuffNode::Leaf { sym: 'c', weight: 1 });
            assert_eq!(tree.node(*right), &HuffNode::Leaf { sym: 'b', weight: 2 });
          }
          other => panic!("Expected internal node, found {:?}", other),
        }
        assert_eq!(tree.node(*right), &HuffNode::Leaf { sym: 'a', weight: 5 });
      }
      other => panic!("Expected internal root, found {:?}", other),
    }
    assert_eq!(tree.depth(), 2);
    assert_eq!(tree.num_nodes(), 5);
  }

  #[test]
  fn ties_follow_first_occurrence() {
    // All weights equal: the earliest symbols are merged first
    let tree = HuffTree::from_symbols(&chars("abcd"), |_| false).unwrap();
    let view = tree.to_view();
    let names: Vec<Vec<String>> = view
      .children
      .iter()
      .map(|c| c.children.iter().map(|g| g.name.clone()).collect())
      .collect();
    assert_eq!(
      names,
      vec![
        vec!["a (1)".to_string(), "b (1)".to_string()],
        vec!["c (1)".to_string(), "d (1)".to_string()]
      ]
    );
  }

  #[test]
  fn empty_input() {
    let empty: Vec<char> = Vec::new();
    assert_eq!(
      HuffTree::from_symbols(&empty, |_| false),
      Err(HuffTreeError::EmptyInput)
    );
    assert_eq!(
      HuffTree::from_symbols(&chars("   "), |c| *c == ' '),
      Err(HuffTreeError::EmptyInput)
    );
  }

  #[test]
  fn single_symbol_is_lone_leaf() {
    let tree = HuffTree::from_symbols(&chars("zzzz"), |_| false).unwrap();
    assert_eq!(tree.num_nodes(), 1);
    assert!(tree.node(tree.root()).is_leaf());
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.to_view().name, "z (4)");
  }

  #[test]
  fn view_serializes() {
    let tree = HuffTree::from_symbols(&chars("aab"), |_| false).unwrap();
    let json = serde_json::to_string(&tree.to_view()).unwrap();
    assert_eq!(
      json,
      r#"{"name":"3","weight":3,"children":[{"name":"b (1)","weight":1,"children":[]},{"name":"a (2)","weight":2,"children":[]}]}"#
    );
  }

  #[quickcheck]
  fn root_weight_is_symbol_count(xs: Vec<u8>) -> bool {
    let coded = xs.iter().filter(|b| **b != b' ').count();
    match HuffTree::from_symbols(&xs, |b| *b == b' ') {
      Ok(tree) => {
        tree.weight() == coded && tree.num_nodes() == 2 * tree.leaves().count() - 1
      }
      Err(e) => coded == 0 && e == HuffTreeError::EmptyInput,
    }
  }

  #[test]
  fn freq_tables_compare_by_content() {
    let a = FreqTable::from_symbols(&chars("abca"), |_| false);
    let b = FreqTable::from_symbols(&chars("abca"), |_| false);
    let c = FreqTable::from_symbols(&chars("acba"), |_| false);
    assert_eq!(a, b);
    // Same counts, different first-occurrence order
    assert_ne!(a, c);
  }
}
