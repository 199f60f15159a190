/*! An array-backed binary min-heap keyed by a weight, carrying an opaque payload.

The ordering of weights is supplied as a plain comparison function so that the
heap does not need to read an ordering off of the payload. Entries with equal
weights are extracted in the order they were inserted: every entry is stamped
with a monotonically increasing sequence number which breaks ties.
*/

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HeapError {
  #[error("Attempted to extract an element from an empty heap")]
  EmptyContainer,
}

/// Comparison used to order weights within the heap
pub type WeightOrder<W> = fn(&W, &W) -> Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapEntry<W, P> {
  pub weight: W,
  pub payload: P,
  seq: u64,
}

impl<W, P> HeapEntry<W, P> {
  /// Position of this entry in the insertion order of its heap
  pub fn seq(&self) -> u64 {
    self.seq
  }
}

#[derive(Debug, Clone)]
pub struct MinHeap<W, P> {
  elements: Vec<HeapEntry<W, P>>,
  order: WeightOrder<W>,
  next_seq: u64,
}

fn parent(i: usize) -> usize {
  (i - 1) / 2
}

fn left(i: usize) -> usize {
  2 * i + 1
}

fn right(i: usize) -> usize {
  2 * i + 2
}

impl<W: Ord, P> MinHeap<W, P> {
  pub fn new() -> Self {
    Self::with_order(W::cmp)
  }
}

impl<W: Ord, P> Default for MinHeap<W, P> {
  fn default() -> Self {
    Self::new()
  }
}

impl<W, P> MinHeap<W, P> {
  /// Create an empty heap which orders weights using `order`
  pub fn with_order(order: WeightOrder<W>) -> Self {
    Self {
      elements: Vec::new(),
      order,
      next_seq: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.elements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }

  pub fn peek(&self) -> Option<&HeapEntry<W, P>> {
    self.elements.first()
  }

  /// Does the entry at index `a` belong above the entry at index `b`?
  fn precedes(&self, a: usize, b: usize) -> bool {
    let (ea, eb) = (&self.elements[a], &self.elements[b]);
    match (self.order)(&ea.weight, &eb.weight) {
      Ordering::Less => true,
      Ordering::Greater => false,
      Ordering::Equal => ea.seq < eb.seq,
    }
  }

  /// Check that no element precedes its parent
  pub fn is_valid(&self) -> bool {
    (1..self.len()).all(|i| !self.precedes(i, parent(i)))
  }

  pub fn insert(&mut self, weight: W, payload: P) {
    let seq = self.next_seq;
    self.next_seq += 1;
    self.elements.push(HeapEntry {
      weight,
      payload,
      seq,
    });
    self.sift_up(self.len() - 1);
    debug_assert!(self.is_valid());
  }

  pub fn extract_min(&mut self) -> Result<HeapEntry<W, P>, HeapError> {
    if self.is_empty() {
      return Err(HeapError::EmptyContainer);
    }
    let last = self.len() - 1;
    self.elements.swap(0, last);
    let min = self.elements.pop().ok_or(HeapError::EmptyContainer)?;
    if !self.is_empty() {
      self.sift_down(0);
    }
    debug_assert!(self.is_valid());
    Ok(min)
  }

  fn sift_up(&mut self, mut i: usize) {
    while i > 0 {
      let p = parent(i);
      if !self.precedes(i, p) {
        break;
      }
      self.elements.swap(i, p);
      i = p;
    }
  }

  fn sift_down(&mut self, mut i: usize) {
    let n = self.len();
    loop {
      let (l, r) = (left(i), right(i));
      let mut smallest = i;
      if l < n && self.precedes(l, smallest) {
        smallest = l;
      }
      if r < n && self.precedes(r, smallest) {
        smallest = r;
      }
      if smallest == i {
        return;
      }
      self.elements.swap(i, smallest);
      i = smallest;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use quickcheck_macros::quickcheck;
  use rand::Rng;

  #[test]
  fn extract_from_empty() {
    let mut heap: MinHeap<usize, ()> = MinHeap::new();
    assert_eq!(heap.extract_min(), Err(HeapError::EmptyContainer));

    heap.insert(4, ());
    assert!(heap.extract_min().is_ok());
    assert_eq!(heap.extract_min(), Err(HeapError::EmptyContainer));
  }

  #[test]
  fn extracts_in_weight_order() {
    let mut heap = MinHeap::new();
    for (w, c) in [(5, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (4, 'e')].iter() {
      heap.insert(*w, *c);
    }
    assert_eq!(heap.len(), 5);
    let mut out = Vec::new();
    while let Ok(e) = heap.extract_min() {
      out.push(e.payload);
    }
    assert_eq!(out, vec!['b', 'd', 'c', 'e', 'a']);
  }

  #[test]
  fn equal_weights_are_fifo() {
    let mut heap = MinHeap::new();
    for (i, w) in [2, 1, 2, 1, 2, 1, 1].iter().enumerate() {
      heap.insert(*w, i);
    }
    let entries: Vec<HeapEntry<i32, usize>> =
      std::iter::from_fn(|| heap.extract_min().ok()).collect();
    let order: Vec<usize> = entries.iter().map(|e| e.payload).collect();
    assert_eq!(order, vec![1, 3, 5, 6, 0, 2, 4]);
    assert!(entries.iter().all(|e| e.seq() == e.payload as u64));
  }

  #[test]
  fn injected_order_makes_max_heap() {
    let mut heap = MinHeap::with_order(|a: &u32, b: &u32| b.cmp(a));
    for w in [3u32, 9, 1, 7].iter() {
      heap.insert(*w, ());
    }
    assert_eq!(heap.peek().map(|e| e.weight), Some(9));
    assert_eq!(heap.extract_min().unwrap().weight, 9);
    assert_eq!(heap.extract_min().unwrap().weight, 7);
  }

  #[test]
  fn random_operations_keep_invariant() {
    let mut rng = rand::thread_rng();
    let mut heap = MinHeap::new();
    let mut shadow: Vec<u32> = Vec::new();
    for _ in 0..2000 {
      if shadow.is_empty() || rng.gen::<f64>() < 0.6 {
        let w = rng.gen_range(0..50u32);
        heap.insert(w, ());
        shadow.push(w);
      } else {
        let e = heap.extract_min().unwrap();
        let min = *shadow.iter().min().unwrap();
        assert_eq!(e.weight, min);
        let pos = shadow.iter().position(|x| *x == min).unwrap();
        shadow.swap_remove(pos);
      }
      assert!(heap.is_valid());
      assert_eq!(heap.len(), shadow.len());
      if let Some(top) = heap.peek() {
        assert!(shadow.iter().all(|w| top.weight <= *w));
      }
    }
  }

  #[quickcheck]
  fn extraction_is_monotonic(weights: Vec<u32>) -> bool {
    let mut heap = MinHeap::new();
    for w in weights.iter() {
      heap.insert(*w, ());
    }
    let mut out = Vec::new();
    while let Ok(e) = heap.extract_min() {
      out.push(e.weight);
    }
    out.len() == weights.len() && out.windows(2).all(|w| w[0] <= w[1])
  }

  #[quickcheck]
  fn invariant_after_mixed_ops(ops: Vec<Option<u16>>) -> bool {
    let mut heap = MinHeap::new();
    for op in ops {
      match op {
        Some(w) => heap.insert(w, ()),
        None => {
          let _ = heap.extract_min();
        }
      }
      if !heap.is_valid() {
        return false;
      }
    }
    true
  }
}
